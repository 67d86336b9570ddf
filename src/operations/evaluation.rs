//! Scoring detected onsets against ground truth.
//!
//! Evaluation works on onset *times* in seconds, keyed by recording name. The
//! [`OnsetEvaluator`] trait is the seam for plugging in an external scorer;
//! [`WindowedMatchEvaluator`] is the built-in one: an estimate counts as a hit when it
//! lies within a tolerance window of a reference onset, each reference matching at
//! most one estimate.

use std::collections::BTreeMap;

use crate::error::config_error;
use crate::{AudioSampleError, AudioSampleResult, ParameterError};

/// Precision, recall and F-measure of one recording.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationScore {
    /// Fraction of estimates that match a reference onset.
    pub precision: f64,
    /// Fraction of reference onsets that were matched.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f_measure: f64,
    /// Number of matched pairs.
    pub matches: usize,
    /// Number of reference onsets.
    pub reference_count: usize,
    /// Number of estimated onsets.
    pub estimate_count: usize,
}

impl EvaluationScore {
    /// Builds a score from match counts. With no references or no estimates every
    /// ratio is zero.
    pub fn from_counts(matches: usize, reference_count: usize, estimate_count: usize) -> Self {
        let (precision, recall) = if reference_count == 0 || estimate_count == 0 {
            (0.0, 0.0)
        } else {
            (
                matches as f64 / estimate_count as f64,
                matches as f64 / reference_count as f64,
            )
        };
        let f_measure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f_measure,
            matches,
            reference_count,
            estimate_count,
        }
    }
}

/// Scores estimated onset times against reference onset times.
pub trait OnsetEvaluator {
    /// Compares the onsets of one recording, both in seconds.
    ///
    /// # Errors
    /// Implementations return an error for inputs they cannot score, such as
    /// non-finite times.
    fn evaluate(&self, reference: &[f64], estimate: &[f64]) -> AudioSampleResult<EvaluationScore>;
}

/// One-to-one matching within a symmetric tolerance window.
///
/// Both lists are sorted and walked in time order; a reference and an estimate are
/// paired when `|reference - estimate| <= tolerance`, earliest first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowedMatchEvaluator {
    /// Half-width of the match window in seconds.
    pub tolerance: f64,
}

impl WindowedMatchEvaluator {
    /// The customary ±50 ms window.
    pub const fn new() -> Self {
        Self { tolerance: 0.05 }
    }

    /// Evaluator with a custom tolerance in seconds.
    pub const fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Validate the tolerance.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(format!(
                "Tolerance must be a positive number of seconds, got {}",
                self.tolerance
            ));
        }
        Ok(())
    }
}

impl Default for WindowedMatchEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl OnsetEvaluator for WindowedMatchEvaluator {
    fn evaluate(&self, reference: &[f64], estimate: &[f64]) -> AudioSampleResult<EvaluationScore> {
        self.validate().map_err(config_error("tolerance"))?;
        let reference = sorted_times("reference", reference)?;
        let estimate = sorted_times("estimate", estimate)?;

        let (mut r, mut e, mut matches) = (0, 0, 0);
        while r < reference.len() && e < estimate.len() {
            if estimate[e] < reference[r] - self.tolerance {
                e += 1;
            } else if estimate[e] > reference[r] + self.tolerance {
                r += 1;
            } else {
                matches += 1;
                r += 1;
                e += 1;
            }
        }

        Ok(EvaluationScore::from_counts(
            matches,
            reference.len(),
            estimate.len(),
        ))
    }
}

fn sorted_times(name: &str, times: &[f64]) -> AudioSampleResult<Vec<f64>> {
    if let Some(bad) = times.iter().find(|t| !t.is_finite()) {
        return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
            name,
            format!("Onset times must be finite, got {bad}"),
        )));
    }
    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// Scores every recording in `targets`.
///
/// A recording missing from `estimates` is scored against an empty estimate. Entries
/// of `estimates` without a target are ignored.
///
/// # Errors
/// Propagates the first error returned by `evaluator`.
///
/// # Examples
/// ```rust
/// use std::collections::BTreeMap;
/// use audio_onsets::operations::evaluation::evaluate_onsets;
/// use audio_onsets::WindowedMatchEvaluator;
///
/// let targets = BTreeMap::from([("drums".to_string(), vec![0.10, 0.60])]);
/// let estimates = BTreeMap::from([("drums".to_string(), vec![0.09, 0.35])]);
/// let scores = evaluate_onsets(&targets, &estimates, &WindowedMatchEvaluator::new()).unwrap();
/// assert_eq!(scores["drums"].matches, 1);
/// assert_eq!(scores["drums"].f_measure, 0.5);
/// ```
pub fn evaluate_onsets<E: OnsetEvaluator + ?Sized>(
    targets: &BTreeMap<String, Vec<f64>>,
    estimates: &BTreeMap<String, Vec<f64>>,
    evaluator: &E,
) -> AudioSampleResult<BTreeMap<String, EvaluationScore>> {
    targets
        .iter()
        .map(|(name, reference)| {
            let estimate = estimates.get(name).map_or(&[][..], Vec::as_slice);
            Ok((name.clone(), evaluator.evaluate(reference, estimate)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_perfect_and_partial_matches() {
        let evaluator = WindowedMatchEvaluator::new();
        let perfect = evaluator.evaluate(&[0.1, 0.5, 0.9], &[0.11, 0.49, 0.9]).unwrap();
        assert_eq!(perfect.matches, 3);
        assert_approx_eq!(perfect.f_measure, 1.0, 1e-12);

        let partial = evaluator.evaluate(&[0.1, 0.5], &[0.1, 0.3, 0.52, 0.8]).unwrap();
        assert_eq!(partial.matches, 2);
        assert_approx_eq!(partial.precision, 0.5, 1e-12);
        assert_approx_eq!(partial.recall, 1.0, 1e-12);
        assert_approx_eq!(partial.f_measure, 2.0 / 3.0, 1e-12);
    }

    #[test]
    fn test_matching_is_one_to_one() {
        // Two estimates inside one window only count once.
        let evaluator = WindowedMatchEvaluator::new();
        let score = evaluator.evaluate(&[0.5], &[0.48, 0.52]).unwrap();
        assert_eq!(score.matches, 1);
        assert_approx_eq!(score.precision, 0.5, 1e-12);

        // Unsorted input is handled.
        let score = evaluator.evaluate(&[0.9, 0.1], &[0.1, 0.9]).unwrap();
        assert_eq!(score.matches, 2);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let evaluator = WindowedMatchEvaluator::new();
        let score = evaluator.evaluate(&[0.1], &[]).unwrap();
        assert_eq!(score.matches, 0);
        assert!(score.f_measure.abs() < 1e-15);
        assert!(evaluator.evaluate(&[], &[]).unwrap().precision.abs() < 1e-15);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(
            WindowedMatchEvaluator::new()
                .evaluate(&[f64::NAN], &[0.1])
                .is_err()
        );
        assert!(
            WindowedMatchEvaluator::with_tolerance(0.0)
                .evaluate(&[0.1], &[0.1])
                .is_err()
        );
    }

    #[test]
    fn test_evaluate_onsets_by_name() {
        let targets = BTreeMap::from([
            ("a".to_string(), vec![0.1, 0.2]),
            ("b".to_string(), vec![1.0]),
        ]);
        let estimates = BTreeMap::from([
            ("a".to_string(), vec![0.1, 0.2]),
            ("extra".to_string(), vec![0.5]),
        ]);
        let scores = evaluate_onsets(&targets, &estimates, &WindowedMatchEvaluator::new()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_approx_eq!(scores["a"].f_measure, 1.0, 1e-12);
        assert_eq!(scores["b"].estimate_count, 0);
        assert!(!scores.contains_key("extra"));
    }
}
