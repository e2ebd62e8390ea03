// ABOUTME: Opponent pairing: sample an index preferring entries with similar win counts
// ABOUTME: Weights exp(-2 * |wins - baseline wins| / mean wins), uniform before any games

use crate::RatingError;
use rand::Rng;

/// Sharpness of the preference for similar win counts.
const PREFERENCE_SHARPNESS: f64 = 2.0;

/// One candidate opponent: a program name and its running win count.
#[derive(Debug, Clone)]
pub struct PairEntry {
    pub name: String,
    pub wins: u64,
}

impl PairEntry {
    pub fn new(name: impl Into<String>, wins: u64) -> Self {
        Self {
            name: name.into(),
            wins,
        }
    }
}

/// Select an opponent index for the baseline entry.
///
/// With no games recorded yet the choice is uniform. Otherwise each
/// candidate is weighted by how close its win count sits to the
/// baseline's, and entries sharing the baseline's name (including the
/// baseline itself) are excluded.
pub fn pair<R: Rng>(
    baseline: usize,
    entries: &[PairEntry],
    rng: &mut R,
) -> Result<usize, RatingError> {
    if entries.is_empty() {
        return Err(RatingError::EmptyField);
    }
    if baseline >= entries.len() {
        return Err(RatingError::BaselineOutOfRange {
            baseline,
            len: entries.len(),
        });
    }

    let total_wins: u64 = entries.iter().map(|e| e.wins).sum();
    if total_wins == 0 {
        // No information yet, select randomly.
        return Ok(rng.gen_range(0..entries.len()));
    }

    let probs = probabilities(baseline, entries)?;
    Ok(select_random(&probs, rng))
}

/// Normalized selection probabilities over all entries.
pub fn probabilities(baseline: usize, entries: &[PairEntry]) -> Result<Vec<f64>, RatingError> {
    let total_wins: u64 = entries.iter().map(|e| e.wins).sum();
    let mean_wins = total_wins as f64 / entries.len() as f64;

    let mut prefs = vec![0.0; entries.len()];
    let mut total_prefs = 0.0;
    for (i, entry) in entries.iter().enumerate() {
        if entry.name != entries[baseline].name {
            let diff = entry.wins.abs_diff(entries[baseline].wins) as f64;
            prefs[i] = (-PREFERENCE_SHARPNESS * diff / mean_wins).exp();
            total_prefs += prefs[i];
        }
    }
    if total_prefs == 0.0 {
        return Err(RatingError::NoEligibleOpponent);
    }

    Ok(prefs.into_iter().map(|p| p / total_prefs).collect())
}

/// Sample one index from a discrete probability distribution by
/// walking the cumulative sum.
pub fn select_random<R: Rng>(probs: &[f64], rng: &mut R) -> usize {
    let mut r: f64 = rng.gen();
    for (i, p) in probs.iter().enumerate() {
        r -= p;
        if r < 0.0 {
            return i;
        }
    }
    // Rounding left a sliver of probability unassigned.
    debug_assert!(r.abs() < 1e-3);
    probs.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entries(wins: &[u64]) -> Vec<PairEntry> {
        wins.iter()
            .enumerate()
            .map(|(i, &w)| PairEntry::new(format!("program-{i}"), w))
            .collect()
    }

    #[test]
    fn test_no_games_selects_uniformly() {
        let field = entries(&[0, 0, 0]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[pair(0, &field, &mut rng).unwrap()] += 1;
        }
        for count in counts {
            assert!(
                (800..=1200).contains(&count),
                "expected roughly uniform counts, got {counts:?}"
            );
        }
    }

    #[test]
    fn test_closer_win_counts_are_preferred() {
        // Baseline has 10 wins; the entry matching it exactly must be
        // strictly more likely than the distant one.
        let field = entries(&[10, 10, 0]);
        let probs = probabilities(0, &field).unwrap();
        assert_eq!(probs[0], 0.0, "baseline itself is excluded");
        assert!(probs[2] < probs[1]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_name_is_excluded() {
        let field = vec![
            PairEntry::new("alpha", 5),
            PairEntry::new("alpha", 9),
            PairEntry::new("beta", 6),
        ];
        let probs = probabilities(0, &field).unwrap();
        assert_eq!(probs[0], 0.0);
        assert_eq!(probs[1], 0.0, "same-name entry is never paired");
        assert!((probs[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_entries_share_baseline_name() {
        let field = vec![PairEntry::new("alpha", 5), PairEntry::new("alpha", 3)];
        assert!(matches!(
            probabilities(0, &field),
            Err(RatingError::NoEligibleOpponent)
        ));
    }

    #[test]
    fn test_select_random_honors_point_mass() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(select_random(&[0.0, 1.0, 0.0], &mut rng), 1);
        }
    }

    #[test]
    fn test_sampling_tracks_probabilities() {
        let field = entries(&[10, 10, 0]);
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0usize; 3];
        for _ in 0..5000 {
            counts[pair(0, &field, &mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[0], 0);
        assert!(
            counts[2] < counts[1],
            "distant entry drawn more often than the near one: {counts:?}"
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            pair(0, &[], &mut rng),
            Err(RatingError::EmptyField)
        ));
        assert!(matches!(
            pair(3, &entries(&[1, 2]), &mut rng),
            Err(RatingError::BaselineOutOfRange { .. })
        ));
    }
}
