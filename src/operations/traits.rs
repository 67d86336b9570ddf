//! Core trait definitions for onset detection operations.
//!
//! Each trait has a single responsibility. Both are implemented for [`Signal`]
//! next to the algorithms they dispatch to.

use super::onset_detection::{EntropyOnsetResult, FluxOnsetResult};
use super::transforms::{Spectrum, Stft};
use super::types::{EntropyOnsetConfig, FluxOnsetConfig, StftConfig, WindowType};
use crate::AudioSampleResult;
use ndarray::Array1;

// Complex numbers using num-complex crate
pub use num_complex::Complex;

/// Onset detection on a signal.
///
/// # Examples
/// ```rust
/// use audio_onsets::{AudioOnsetDetection, FluxOnsetConfig, Signal};
///
/// let signal = Signal::from_vec(vec![0.0; 4096], 44100).unwrap();
/// let result = signal.flux_onsets(&FluxOnsetConfig::sum_magnitude()).unwrap();
/// assert!(result.is_empty());
/// ```
pub trait AudioOnsetDetection {
    /// Detects onsets from phase-space entropy.
    ///
    /// See [`detect_entropy_onsets`](crate::detect_entropy_onsets).
    fn entropy_onsets(&self, config: &EntropyOnsetConfig) -> AudioSampleResult<EntropyOnsetResult>;

    /// Detects onsets from spectral flux.
    ///
    /// See [`detect_flux_onsets`](crate::detect_flux_onsets).
    fn flux_onsets(&self, config: &FluxOnsetConfig) -> AudioSampleResult<FluxOnsetResult>;
}

/// Spectral analysis of a signal.
pub trait AudioSpectralAnalysis {
    /// Computes the short-time Fourier transform.
    fn stft(&self, config: &StftConfig) -> AudioSampleResult<Stft>;

    /// Computes the one-sided DFT of the whole signal.
    ///
    /// `n` is the transform length (`None` for the signal length) and `window` an
    /// optional analysis window.
    fn spectrum(&self, n: Option<usize>, window: Option<WindowType>) -> AudioSampleResult<Spectrum>;

    /// Computes the analytic signal of the samples.
    fn analytic_signal(&self) -> AudioSampleResult<Array1<Complex<f64>>>;
}
