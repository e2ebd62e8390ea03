// ABOUTME: Elo difference from a winning proportion via table interpolation
// ABOUTME: 101 percentage points plus a clamp sentinel, piecewise linear between them

use crate::RatingError;

/// Elo difference at each whole winning percentage from 0 to 100,
/// with a trailing sentinel so interpolation at exactly 1.0 stays in
/// bounds. The extremes are clamped at +/-1000.
const ELO_TABLE: [i32; 102] = [
    -1000, -677, -589, -538, -501, -470, -444, -422, -401, -383, //
    -366, -351, -335, -322, -309, -296, -284, -273, -262, -251, //
    -240, -230, -220, -211, -202, -193, -184, -175, -166, -158, //
    -149, -141, -133, -125, -117, -110, -102, -95, -87, -80, //
    -72, -65, -57, -50, -43, -36, -29, -21, -14, -7, //
    0, 7, 14, 21, 29, 36, 43, 50, 57, 65, //
    72, 80, 87, 95, 102, 110, 117, 125, 133, 141, //
    149, 158, 166, 175, 184, 193, 202, 211, 220, 230, //
    240, 251, 262, 273, 284, 296, 309, 322, 335, 351, //
    366, 383, 401, 422, 444, 470, 501, 538, 589, 677, //
    1000, 1000,
];

/// Elo difference corresponding to a winning proportion in `[0, 1]`,
/// interpolated linearly between the two nearest table points and
/// truncated toward zero.
pub fn calc_elo(pwin: f64) -> Result<i32, RatingError> {
    if !(0.0..=1.0).contains(&pwin) {
        return Err(RatingError::OutOfRange(pwin));
    }
    let low = (pwin * 100.0) as usize;
    let high = low + 1;
    let p = pwin * 100.0 - low as f64;
    Ok((f64::from(ELO_TABLE[high]) * p + f64::from(ELO_TABLE[low]) * (1.0 - p)) as i32)
}
