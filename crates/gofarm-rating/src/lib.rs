// ABOUTME: Rating utilities at the farm's boundary
// ABOUTME: Elo from win proportion, and opponent pairing from running win counts

pub mod elo;
pub mod pair;

use thiserror::Error;

/// Errors from the rating utilities.
#[derive(Debug, Error)]
pub enum RatingError {
    #[error("win proportion {0} is outside [0, 1]")]
    OutOfRange(f64),

    #[error("no entries to pair from")]
    EmptyField,

    #[error("baseline index {baseline} out of range for {len} entries")]
    BaselineOutOfRange { baseline: usize, len: usize },

    #[error("every entry shares the baseline's name, nothing to pair against")]
    NoEligibleOpponent,
}
