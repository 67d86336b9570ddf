//! Unit conversions between milliseconds, samples, frames, and seconds.

use crate::{RealFloat, to_precision};

/// Converts a duration in milliseconds to a whole number of samples, rounding down.
///
/// Returns `None` if `ms` is not a positive finite number or if the result would be
/// zero samples.
///
/// # Examples
///
/// ```rust
/// use audio_onsets::utils::audio_math::ms_to_samples;
///
/// assert_eq!(ms_to_samples(16.0, 44100), Some(705));
/// assert_eq!(ms_to_samples(0.01, 44100), None);
/// ```
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> Option<usize> {
    if !ms.is_finite() || ms <= 0.0 {
        return None;
    }
    let samples = (ms * sample_rate as f64 / 1000.0).floor();
    if samples < 1.0 || samples > usize::MAX as f64 {
        return None;
    }
    Some(samples as usize)
}

/// Converts a sample index to time in seconds.
pub fn samples_to_seconds<F: RealFloat>(index: usize, sample_rate: F) -> F {
    to_precision::<F, _>(index) / sample_rate
}

/// Converts frame indices to time in seconds.
///
/// Useful for converting STFT frame indices to time positions.
///
/// # Arguments
/// * `frames` - Frame index
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size in samples between frames
///
/// # Examples
///
/// ```rust
/// use audio_onsets::utils::audio_math::frames_to_time;
///
/// let time: f64 = frames_to_time(100, 44100.0, 441);
/// assert!((time - 1.0).abs() < 1e-12);
/// ```
pub fn frames_to_time<F: RealFloat>(frames: usize, sample_rate: F, hop_size: usize) -> F {
    to_precision::<F, _>(frames * hop_size) / sample_rate
}

/// Frequencies of the one-sided DFT bins for a transform of length `n_fft`.
///
/// Returns `n_fft / 2 + 1` values spaced `sample_rate / n_fft` apart.
pub fn rfft_frequencies(n_fft: usize, sample_rate: f64) -> Vec<f64> {
    let resolution = sample_rate / n_fft as f64;
    (0..=n_fft / 2).map(|k| k as f64 * resolution).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(16.0, 44100), Some(705));
        assert_eq!(ms_to_samples(8.0, 44100), Some(352));
        assert_eq!(ms_to_samples(1000.0, 8000), Some(8000));
        assert_eq!(ms_to_samples(0.0, 44100), None);
        assert_eq!(ms_to_samples(-5.0, 44100), None);
        assert_eq!(ms_to_samples(f64::NAN, 44100), None);
    }

    #[test]
    fn test_time_conversions() {
        assert_approx_eq!(samples_to_seconds(22050, 44100.0f64), 0.5, 1e-12);
        assert_approx_eq!(frames_to_time(10, 44100.0f64, 441), 0.1, 1e-12);
        assert_approx_eq!(frames_to_time(10, 44100.0f32, 441) as f64, 0.1, 1e-6);
    }

    #[test]
    fn test_rfft_frequencies() {
        let freqs = rfft_frequencies(8, 8000.0);
        assert_eq!(freqs.len(), 5);
        assert_approx_eq!(freqs[1], 1000.0, 1e-12);
        assert_approx_eq!(freqs[4], 4000.0, 1e-12);

        let odd = rfft_frequencies(7, 7000.0);
        assert_eq!(odd.len(), 4);
        assert_approx_eq!(odd[3], 3000.0, 1e-12);
    }
}
