//! Synthetic signal generation.
//!
//! Deterministic test signals with known onset positions. Used by the test suites,
//! the demo, and the benchmark.

use std::f64::consts::PI;
use std::time::Duration;

use ndarray::Array1;

use crate::{AudioSampleError, AudioSampleResult, ParameterError, Signal};

fn num_samples(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * sample_rate as f64).round() as usize
}

/// Generates a sine wave.
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `duration` - Length of the signal
/// * `sample_rate` - Sample rate in Hz
/// * `amplitude` - Peak amplitude
///
/// # Errors
/// Returns an error if the sample rate is zero or the duration yields no samples.
///
/// # Examples
/// ```rust
/// use audio_onsets::sine_wave;
/// use std::time::Duration;
///
/// let tone = sine_wave(440.0, Duration::from_millis(500), 44100, 0.8).unwrap();
/// assert_eq!(tone.len(), 22050);
/// ```
pub fn sine_wave(
    frequency: f64,
    duration: Duration,
    sample_rate: u32,
    amplitude: f64,
) -> AudioSampleResult<Signal> {
    let sr = sample_rate as f64;
    let samples = Array1::from_iter(
        (0..num_samples(duration, sample_rate))
            .map(|i| amplitude * (2.0 * PI * frequency * i as f64 / sr).sin()),
    );
    Signal::new(samples, sample_rate)
}

/// Generates digital silence.
///
/// # Errors
/// Returns an error if the sample rate is zero or the duration yields no samples.
pub fn silence(duration: Duration, sample_rate: u32) -> AudioSampleResult<Signal> {
    Signal::new(Array1::zeros(num_samples(duration, sample_rate)), sample_rate)
}

/// Generates silence containing a single unit impulse at `position` seconds.
///
/// An impulse positioned past the end of the signal is dropped.
///
/// # Errors
/// Returns an error if the sample rate is zero or the duration yields no samples.
pub fn impulse(
    duration: Duration,
    sample_rate: u32,
    amplitude: f64,
    position: f64,
) -> AudioSampleResult<Signal> {
    let mut samples = Array1::zeros(num_samples(duration, sample_rate));
    let index = (position * sample_rate as f64).round();
    if index >= 0.0 && (index as usize) < samples.len() {
        samples[index as usize] = amplitude;
    }
    Signal::new(samples, sample_rate)
}

/// Concatenates signals end to end.
///
/// The result keeps the source identifier of the first signal.
///
/// # Errors
/// Returns an error if `signals` is empty or the sample rates differ.
pub fn concatenate(signals: &[Signal]) -> AudioSampleResult<Signal> {
    let first = signals.first().ok_or_else(|| {
        AudioSampleError::EmptyData("Nothing to concatenate".to_string())
    })?;
    if let Some(other) = signals
        .iter()
        .find(|s| s.sample_rate() != first.sample_rate())
    {
        return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
            "sample_rate",
            format!(
                "Cannot concatenate signals at {} Hz and {} Hz",
                first.sample_rate(),
                other.sample_rate()
            ),
        )));
    }

    let samples: Vec<f64> = signals.iter().flat_map(|s| s.samples().to_vec()).collect();
    Signal::with_source(Array1::from_vec(samples), first.sample_rate(), first.source())
}

/// Generates a sequence of sine bursts separated by silence.
///
/// Each entry of `bursts` is `(start_seconds, length_seconds)`. Returns the signal and
/// the sample index at which each burst starts.
///
/// # Errors
/// Returns an error if the sample rate is zero or `total` yields no samples.
pub fn tone_bursts(
    frequency: f64,
    bursts: &[(f64, f64)],
    total: Duration,
    sample_rate: u32,
    amplitude: f64,
) -> AudioSampleResult<(Signal, Vec<usize>)> {
    let sr = sample_rate as f64;
    let mut samples = Array1::zeros(num_samples(total, sample_rate));
    let mut starts = Vec::with_capacity(bursts.len());

    for &(start, length) in bursts {
        let first = (start * sr).round() as usize;
        let last = (((start + length) * sr).round() as usize).min(samples.len());
        for i in first..last {
            let t = (i - first) as f64 / sr;
            samples[i] = amplitude * (2.0 * PI * frequency * t).sin();
        }
        starts.push(first);
    }

    Ok((Signal::new(samples, sample_rate)?, starts))
}

/// Generates exponentially decaying sine bursts, a simple model of plucked or struck
/// notes.
///
/// Each burst starts at one of `starts` (in seconds) and follows
/// `amplitude * sin(2π f t) * exp(-t / decay)` until the end of the signal; overlapping
/// bursts are summed. Returns the signal and the sample index of every burst start.
///
/// # Errors
/// Returns an error if `decay` is not positive, the sample rate is zero, or `total`
/// yields no samples.
///
/// # Examples
/// ```rust
/// use audio_onsets::decaying_bursts;
/// use std::time::Duration;
///
/// let (signal, starts) =
///     decaying_bursts(440.0, &[0.1, 0.6], 0.02, Duration::from_secs(1), 44100, 1.0).unwrap();
/// assert_eq!(starts, vec![4410, 26460]);
/// assert_eq!(signal.len(), 44100);
/// ```
pub fn decaying_bursts(
    frequency: f64,
    starts: &[f64],
    decay: f64,
    total: Duration,
    sample_rate: u32,
    amplitude: f64,
) -> AudioSampleResult<(Signal, Vec<usize>)> {
    if !(decay.is_finite() && decay > 0.0) {
        return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
            "decay",
            format!("Decay time must be a positive number of seconds, got {decay}"),
        )));
    }

    let sr = sample_rate as f64;
    let mut samples = Array1::zeros(num_samples(total, sample_rate));
    let mut onsets = Vec::with_capacity(starts.len());

    for &start in starts {
        let first = (start * sr).round().max(0.0) as usize;
        for i in first..samples.len() {
            let t = (i - first) as f64 / sr;
            samples[i] += amplitude * (2.0 * PI * frequency * t).sin() * (-t / decay).exp();
        }
        onsets.push(first);
    }

    Ok((Signal::new(samples, sample_rate)?, onsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_decaying_bursts() {
        let (signal, starts) =
            decaying_bursts(100.0, &[0.1, 0.5], 0.01, Duration::from_secs(1), 1000, 1.0).unwrap();
        assert_eq!(starts, vec![100, 500]);
        assert_eq!(signal.samples()[99], 0.0);
        let expected = (2.0 * PI * 100.0 * 0.002).sin() * (-0.2f64).exp();
        assert_approx_eq!(signal.samples()[102], expected, 1e-9);
        // First burst has died away before the second starts.
        assert!(signal.samples()[490].abs() < 1e-10);

        assert!(decaying_bursts(100.0, &[0.1], 0.0, Duration::from_secs(1), 1000, 1.0).is_err());
    }

    #[test]
    fn test_sine_wave() {
        let tone = sine_wave(1000.0, Duration::from_millis(10), 8000, 0.5).unwrap();
        assert_eq!(tone.len(), 80);
        // Quarter period of 1 kHz at 8 kHz is two samples.
        assert_approx_eq!(tone.samples()[2], 0.5, 1e-12);
    }

    #[test]
    fn test_impulse_and_silence() {
        let click = impulse(Duration::from_secs(1), 100, 1.0, 0.25).unwrap();
        assert_eq!(click.samples()[25], 1.0);
        assert_eq!(click.samples().sum(), 1.0);

        let quiet = silence(Duration::from_secs(1), 100).unwrap();
        assert!(quiet.samples().iter().all(|&x| x == 0.0));
        assert!(silence(Duration::ZERO, 100).is_err());
    }

    #[test]
    fn test_concatenate() {
        let a = silence(Duration::from_secs(1), 100).unwrap();
        let b = impulse(Duration::from_secs(1), 100, 1.0, 0.0).unwrap();
        let joined = concatenate(&[a, b]).unwrap();
        assert_eq!(joined.len(), 200);
        assert_eq!(joined.samples()[100], 1.0);

        let c = silence(Duration::from_secs(1), 200).unwrap();
        assert!(concatenate(&[joined, c]).is_err());
        assert!(concatenate(&[]).is_err());
    }

    #[test]
    fn test_tone_bursts() {
        let (signal, starts) =
            tone_bursts(100.0, &[(0.1, 0.1), (0.5, 0.2)], Duration::from_secs(1), 1000, 1.0)
                .unwrap();
        assert_eq!(starts, vec![100, 500]);
        assert_eq!(signal.samples()[99], 0.0);
        assert_eq!(signal.samples()[250], 0.0);
        assert!(signal.samples()[102].abs() > 0.0);
    }
}
