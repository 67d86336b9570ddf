//! Onset detection algorithms.
//!
//! Two detector families turn a [`Signal`] into an ordered set of onset sample
//! indices. Both are pure functions of the signal and a configuration and return an
//! immutable result record holding the onsets together with the intermediate arrays.
//!
//! ## Entropy onsets
//!
//! ```text
//! signal ─► frames ─► phase-space embedding ─► entropy H[i]
//!        ─► analytic signal of H ─► ODF = |Im| ─► local maxima ─► frame midpoints
//! ```
//!
//! Silence embeds into a single histogram cell (entropy 0) while tonal or noisy
//! material spreads over many cells, so the entropy curve steps up at note onsets.
//! The imaginary part of the analytic signal, the Hilbert transform, peaks at such
//! steps.
//!
//! ## Spectral flux onsets
//!
//! ```text
//! signal ─► STFT magnitude ─► rectified flux ─► [normalise] ─► [smooth]
//!        ─► adaptive peak picking ─► frame index × hop
//! ```
//!
//! [`FluxStrategy::SumMagnitude`] differences the per-frame magnitude sums while
//! [`FluxStrategy::StdNormalized`] rectifies every bin before summing. Both divide by
//! the previous frame's magnitude sum when normalising; a silent previous frame
//! divides by `epsilon` instead.
//!
//! ## References
//!
//! - Bello, J.P., et al. "A tutorial on onset detection in music signals." IEEE TSALP 2005.
//! - Dixon, S. "Onset detection revisited." DAFx 2006.

use std::time::SystemTime;

use ndarray::{Array1, ArrayView2, Axis};
use tracing::{debug, trace};

use super::peak_picking::{convolve_same, local_maxima, pick_peaks, standardize};
use super::phase_space::frame_entropy;
use super::traits::AudioOnsetDetection;
use super::transforms::{Stft, analytic_signal, rectified_difference};
use super::types::{EntropyOnsetConfig, FluxOnsetConfig, FluxStrategy};
use crate::error::config_error;
use crate::iterators::{Frame, Segmentation};
use crate::{AudioSampleResult, Signal};

/// Result of [`detect_entropy_onsets`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct EntropyOnsetResult {
    /// Source identifier of the analysed signal.
    pub source: String,
    /// Sample rate of the analysed signal.
    pub sample_rate: u32,
    /// Configuration the detector ran with.
    pub config: EntropyOnsetConfig,
    /// When the detection ran.
    pub created: SystemTime,
    /// Phase-space entropy of every frame.
    pub entropy: Array1<f64>,
    /// Onset detection function, `|Im(analytic(entropy))|`.
    pub odf: Array1<f64>,
    /// `(start, end)` sample bounds of every frame.
    pub frame_limits: Vec<(usize, usize)>,
    /// Frame indices selected by the local-maximum filter.
    pub peaks: Vec<usize>,
    /// Onset sample indices: the midpoints of the peak frames.
    pub onsets: Vec<usize>,
}

impl EntropyOnsetResult {
    /// Onset times in seconds.
    pub fn times(&self) -> Vec<f64> {
        to_seconds(&self.onsets, self.sample_rate)
    }

    /// Number of detected onsets.
    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    /// True if no onset was detected.
    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }
}

/// Result of [`detect_flux_onsets`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct FluxOnsetResult {
    /// Source identifier of the analysed signal.
    pub source: String,
    /// Sample rate of the analysed signal.
    pub sample_rate: u32,
    /// Configuration the detector ran with.
    pub config: FluxOnsetConfig,
    /// When the detection ran.
    pub created: SystemTime,
    /// Rectified (and, if configured, normalised) flux before smoothing; one value per
    /// pair of consecutive STFT frames. Never negative.
    pub raw_odf: Array1<f64>,
    /// The ODF the peak picker ran on: `raw_odf` after optional smoothing.
    pub odf: Array1<f64>,
    /// ODF indices selected by the peak picker.
    pub peaks: Vec<usize>,
    /// Onset sample indices, `peak × hop`.
    pub onsets: Vec<usize>,
}

impl FluxOnsetResult {
    /// Onset times in seconds.
    pub fn times(&self) -> Vec<f64> {
        to_seconds(&self.onsets, self.sample_rate)
    }

    /// Z-scored copy of [`odf`](Self::odf), for inspection and plotting.
    pub fn standardized_odf(&self) -> Array1<f64> {
        Array1::from_vec(standardize(&self.odf.to_vec()))
    }

    /// Number of detected onsets.
    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    /// True if no onset was detected.
    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }
}

/// Detects onsets from the phase-space entropy of short frames.
///
/// # Arguments
/// * `signal` - Mono input signal
/// * `config` - Phase-space, segmentation and peak-picking parameters
///
/// # Algorithm
/// 1. Cut the signal into `window_ms` frames every `hop_ms` (trailing samples that do
///    not fill a frame are ignored).
/// 2. Embed each frame and compute its histogram entropy.
/// 3. ODF = absolute imaginary part of the analytic signal of the entropy sequence.
/// 4. Keep frames whose ODF value strictly exceeds every other value within `order`
///    frames.
/// 5. Report the midpoint `(start + end) / 2` of each kept frame.
///
/// # Errors
/// Returns [`ParameterError`](crate::ParameterError) if the configuration is invalid or the
/// window is longer than the signal.
///
/// # Examples
/// ```rust
/// use audio_onsets::{EntropyOnsetConfig, detect_entropy_onsets, tone_bursts};
/// use std::time::Duration;
///
/// let (signal, _) =
///     tone_bursts(440.0, &[(0.2, 0.2), (0.6, 0.2)], Duration::from_secs(1), 44100, 1.0)?;
/// let result = detect_entropy_onsets(&signal, &EntropyOnsetConfig::new())?;
/// assert_eq!(result.entropy.len(), result.frame_limits.len());
/// assert!(result.onsets.windows(2).all(|w| w[0] < w[1]));
/// # Ok::<(), audio_onsets::AudioSampleError>(())
/// ```
pub fn detect_entropy_onsets(
    signal: &Signal,
    config: &EntropyOnsetConfig,
) -> AudioSampleResult<EntropyOnsetResult> {
    config.validate().map_err(config_error("entropy_onset_config"))?;

    let segmentation = Segmentation::by_ms(signal, config.window_ms, config.hop_ms)?;
    debug!(
        source = signal.source(),
        frames = segmentation.len(),
        frame_len = segmentation.frame_len(),
        hop = segmentation.hop(),
        "entropy onset detection"
    );

    // Step 1-2: per-frame entropy
    let frames: Vec<Frame<'_>> = segmentation.frames().collect();
    let phase_space = &config.phase_space;

    #[cfg(feature = "parallel-processing")]
    let entropy: Vec<f64> = {
        use rayon::prelude::*;
        frames
            .par_iter()
            .map(|frame| frame_entropy(frame.samples(), phase_space))
            .collect::<AudioSampleResult<_>>()?
    };
    #[cfg(not(feature = "parallel-processing"))]
    let entropy: Vec<f64> = frames
        .iter()
        .map(|frame| frame_entropy(frame.samples(), phase_space))
        .collect::<AudioSampleResult<_>>()?;
    let entropy = Array1::from_vec(entropy);

    // Step 3: Hilbert envelope
    let odf = analytic_signal(entropy.view())?.mapv(|z| z.im.abs());
    trace!(odf_len = odf.len(), "entropy ODF computed");

    // Step 4-5: peaks and frame midpoints
    let peaks = local_maxima(&odf.to_vec(), config.order)?;
    let onsets = segmentation
        .limits_of(&peaks)?
        .into_iter()
        .map(|(start, end)| (start + end) / 2)
        .collect::<Vec<_>>();

    debug!(onsets = onsets.len(), "entropy onset detection finished");

    Ok(EntropyOnsetResult {
        source: signal.source().to_string(),
        sample_rate: signal.sample_rate(),
        config: *config,
        created: SystemTime::now(),
        entropy,
        odf,
        frame_limits: segmentation.limits(),
        peaks,
        onsets,
    })
}

/// Detects onsets from the spectral flux of an STFT.
///
/// # Arguments
/// * `signal` - Mono input signal
/// * `config` - Strategy, STFT, normalisation, smoothing and peak-picking parameters
///
/// # Algorithm
/// 1. STFT magnitude `|X(f, t)|` with `config.stft`.
/// 2. Raw flux for `t = 0 .. frames - 2` per [`FluxStrategy`], rectified.
/// 3. If `normalize`, divide by `Σ_f |X(f, t)|`, substituting `epsilon` when that
///    sum is exactly zero.
/// 4. If a smoothing kernel is set, convolve ("same" length, zero padded).
/// 5. Adaptive peak picking; onset = peak index × hop.
///
/// # Errors
/// Returns [`ParameterError`](crate::ParameterError) if the configuration is invalid or the
/// STFT segment is longer than the signal.
///
/// # Examples
/// ```rust
/// use audio_onsets::{FluxOnsetConfig, decaying_bursts, detect_flux_onsets};
/// use std::time::Duration;
///
/// let (signal, starts) =
///     decaying_bursts(440.0, &[0.1, 0.6], 0.02, Duration::from_secs(1), 44100, 1.0)?;
/// let config = FluxOnsetConfig::std_normalized().unprocessed();
/// let result = detect_flux_onsets(&signal, &config)?;
/// assert_eq!(result.onsets.len(), starts.len());
/// # Ok::<(), audio_onsets::AudioSampleError>(())
/// ```
pub fn detect_flux_onsets(
    signal: &Signal,
    config: &FluxOnsetConfig,
) -> AudioSampleResult<FluxOnsetResult> {
    config.validate().map_err(config_error("flux_onset_config"))?;

    // Step 1
    let stft = Stft::compute(signal, &config.stft)?;
    debug!(
        source = signal.source(),
        strategy = ?config.strategy,
        bins = stft.num_bins(),
        frames = stft.num_frames(),
        "spectral flux onset detection"
    );
    let magnitude = stft.magnitude();

    // Step 2-3
    let raw_odf = spectral_flux(magnitude.view(), config);

    // Step 4
    let odf = match &config.smoothing {
        Some(kernel) => Array1::from_vec(convolve_same(&raw_odf.to_vec(), &kernel.taps())),
        None => raw_odf.clone(),
    };
    trace!(odf_len = odf.len(), "flux ODF computed");

    // Step 5
    let peaks = pick_peaks(&odf.to_vec(), &config.peak_picking)?;
    let onsets: Vec<usize> = peaks.iter().map(|&p| p * config.stft.hop).collect();

    debug!(onsets = onsets.len(), "spectral flux onset detection finished");

    Ok(FluxOnsetResult {
        source: signal.source().to_string(),
        sample_rate: signal.sample_rate(),
        config: *config,
        created: SystemTime::now(),
        raw_odf,
        odf,
        peaks,
        onsets,
    })
}

/// Rectified, optionally normalised flux of a magnitude spectrogram.
fn spectral_flux(magnitude: ArrayView2<'_, f64>, config: &FluxOnsetConfig) -> Array1<f64> {
    let frame_sums = magnitude.sum_axis(Axis(0));
    let frames = frame_sums.len();
    if frames < 2 {
        return Array1::zeros(0);
    }

    let mut flux: Array1<f64> = match config.strategy {
        FluxStrategy::SumMagnitude => (0..frames - 1)
            .map(|t| (frame_sums[t + 1] - frame_sums[t]).max(0.0))
            .collect(),
        FluxStrategy::StdNormalized => rectified_difference(magnitude).sum_axis(Axis(0)),
    };

    if config.normalize {
        for (value, &previous) in flux.iter_mut().zip(frame_sums.iter()) {
            let denominator = if previous == 0.0 {
                config.epsilon
            } else {
                previous
            };
            *value /= denominator;
        }
    }

    flux
}

fn to_seconds(onsets: &[usize], sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    onsets.iter().map(|&i| i as f64 / sr).collect()
}

impl AudioOnsetDetection for Signal {
    fn entropy_onsets(&self, config: &EntropyOnsetConfig) -> AudioSampleResult<EntropyOnsetResult> {
        detect_entropy_onsets(self, config)
    }

    fn flux_onsets(&self, config: &FluxOnsetConfig) -> AudioSampleResult<FluxOnsetResult> {
        detect_flux_onsets(self, config)
    }
}
