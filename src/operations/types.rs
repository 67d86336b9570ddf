//! Configuration types and enums used by the onset detectors.
//!
//! Every configuration struct follows the same shape: a `const fn new()` with the
//! standard defaults, named presets, setters, a [`Default`] impl, and a `validate()`
//! method returning a human readable reason on failure. Detector entry points call
//! `validate()` before any numeric work and wrap the reason in a
//! [`ParameterError`](crate::ParameterError).

use std::f64::consts::PI;

/// Window functions for spectral analysis and smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowType {
    /// Rectangular window (no windowing) - best frequency resolution but high leakage.
    Rectangular,
    /// Hann window - good general-purpose window with moderate leakage.
    Hanning,
    /// Hamming window - similar to Hann but does not reach zero at the edges.
    Hamming,
    /// Blackman window - low leakage but wider main lobe.
    Blackman,
}

impl WindowType {
    /// Generates `size` window coefficients.
    ///
    /// Periodic windows (`periodic = true`) are the DFT-even variant used for spectral
    /// analysis: the window of length `size + 1` with its last sample dropped.
    /// Symmetric windows are used as smoothing kernels.
    pub fn coefficients(self, size: usize, periodic: bool) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        if size == 1 {
            return vec![1.0];
        }
        let denom = (if periodic { size } else { size - 1 }) as f64;
        let phase = |i: usize| 2.0 * PI * i as f64 / denom;
        match self {
            WindowType::Rectangular => vec![1.0; size],
            WindowType::Hanning => (0..size).map(|i| 0.5 - 0.5 * phase(i).cos()).collect(),
            WindowType::Hamming => (0..size).map(|i| 0.54 - 0.46 * phase(i).cos()).collect(),
            WindowType::Blackman => (0..size)
                .map(|i| 0.42 - 0.5 * phase(i).cos() + 0.08 * (2.0 * phase(i)).cos())
                .collect(),
        }
    }
}

/// How delay vectors are formed near the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryMode {
    /// Indices before the frame start wrap around to its end; the embedding keeps the
    /// frame's length.
    #[default]
    Wrap,
    /// Missing history is zero; the embedding keeps the frame's length.
    Zero,
    /// Only fully defined delay vectors are kept; the embedding is
    /// `(dimension - 1) * tau` samples shorter than the frame.
    Valid,
}

/// Phase-space reconstruction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSpaceConfig {
    /// Delay between successive coordinates, in samples (>= 1).
    pub tau: usize,
    /// Embedding dimension (>= 1).
    pub dimension: usize,
    /// Histogram boxes per axis (>= 1).
    pub bins: usize,
    /// Boundary policy of the embedding.
    pub boundary: BoundaryMode,
}

impl PhaseSpaceConfig {
    /// Default phase space: `tau = 10`, three dimensions, 50 boxes per axis, wrapping.
    pub const fn new() -> Self {
        Self {
            tau: 10,
            dimension: 3,
            bins: 50,
            boundary: BoundaryMode::Wrap,
        }
    }

    /// Total number of histogram cells, `bins ^ dimension`, if it fits in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        u32::try_from(self.dimension)
            .ok()
            .and_then(|dim| self.bins.checked_pow(dim))
    }

    /// Upper bound of the entropy of any embedding under this configuration.
    pub fn max_entropy(&self) -> f64 {
        self.dimension as f64 * (self.bins as f64).ln()
    }

    /// Validate the phase-space configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tau == 0 {
            return Err("Delay tau must be at least 1 sample".to_string());
        }
        if self.dimension == 0 {
            return Err("Embedding dimension must be at least 1".to_string());
        }
        if self.bins == 0 {
            return Err("Number of bins must be at least 1".to_string());
        }
        if self.cell_count().is_none() {
            return Err(format!(
                "bins^dimension = {}^{} overflows the addressable cell count",
                self.bins, self.dimension
            ));
        }
        Ok(())
    }
}

impl Default for PhaseSpaceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the entropy onset detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct EntropyOnsetConfig {
    /// Embedding and histogram parameters.
    pub phase_space: PhaseSpaceConfig,
    /// Segmentation window length in milliseconds.
    pub window_ms: f64,
    /// Segmentation hop in milliseconds.
    pub hop_ms: f64,
    /// Half-width of the local-maximum filter, in frames.
    pub order: usize,
}

impl EntropyOnsetConfig {
    /// Defaults suited to percussive material: 16 ms windows every 8 ms, filter order 22.
    pub const fn new() -> Self {
        Self {
            phase_space: PhaseSpaceConfig::new(),
            window_ms: 16.0,
            hop_ms: 8.0,
            order: 22,
        }
    }

    /// Replace the phase-space parameters.
    pub const fn with_phase_space(mut self, phase_space: PhaseSpaceConfig) -> Self {
        self.phase_space = phase_space;
        self
    }

    /// Set window length and hop, both in milliseconds.
    pub fn set_segmentation(&mut self, window_ms: f64, hop_ms: f64) {
        self.window_ms = window_ms;
        self.hop_ms = hop_ms;
    }

    /// Set the local-maximum filter order.
    pub fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    /// Validate the entropy onset configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.phase_space.validate()?;
        if !(self.window_ms.is_finite() && self.window_ms > 0.0) {
            return Err(format!("Window length must be > 0 ms, got {}", self.window_ms));
        }
        if !(self.hop_ms.is_finite() && self.hop_ms > 0.0) {
            return Err(format!("Hop size must be > 0 ms, got {}", self.hop_ms));
        }
        if self.order == 0 {
            return Err("Peak picking order must be at least 1 frame".to_string());
        }
        Ok(())
    }
}

impl Default for EntropyOnsetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the adaptive peak picker.
///
/// The local window around index `n` spans `[n - pre_factor * window, n + window]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct PeakPickingConfig {
    /// Look-ahead half-width `w`, in ODF samples.
    pub window: usize,
    /// Look-behind multiplier `m`; the window reaches `m * w` samples back.
    pub pre_factor: usize,
    /// Decay rate of the adaptive threshold, in (0, 1).
    pub alpha: f64,
    /// Margin above the local mean a peak must clear.
    pub delta: f64,
}

impl PeakPickingConfig {
    /// Defaults: `w = 3`, `m = 3`, `alpha = 0.1`, `delta = 0.1`.
    pub const fn new() -> Self {
        Self {
            window: 3,
            pre_factor: 3,
            alpha: 0.1,
            delta: 0.1,
        }
    }

    /// Set the local window half-widths.
    pub fn set_window(&mut self, window: usize, pre_factor: usize) {
        self.window = window;
        self.pre_factor = pre_factor;
    }

    /// Set the decay rate and margin.
    pub fn set_threshold(&mut self, alpha: f64, delta: f64) {
        self.alpha = alpha;
        self.delta = delta;
    }

    /// Number of ODF samples in the local window.
    pub const fn window_len(&self) -> usize {
        self.pre_factor * self.window + self.window + 1
    }

    /// Validate the peak picking configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("Window half-width w must be at least 1".to_string());
        }
        if self.pre_factor == 0 {
            return Err("Look-behind multiplier m must be at least 1".to_string());
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("Alpha must lie in (0, 1), got {}", self.alpha));
        }
        if !(self.delta.is_finite() && self.delta >= 0.0) {
            return Err(format!("Delta must be finite and >= 0, got {}", self.delta));
        }
        Ok(())
    }
}

impl Default for PeakPickingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Short-time Fourier transform parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StftConfig {
    /// Analysis window.
    pub window: WindowType,
    /// Segment (window) length in samples.
    pub segment_len: usize,
    /// Distance between segment starts in samples; `segment_len - hop` is the overlap.
    pub hop: usize,
    /// FFT length; `None` uses `segment_len`. Longer transforms zero-pad each segment.
    pub fft_len: Option<usize>,
    /// Subtract each segment's mean before windowing.
    pub detrend: bool,
}

impl StftConfig {
    /// Default STFT: Hamming window, 256-sample segments, 50% overlap.
    pub const fn new() -> Self {
        Self {
            window: WindowType::Hamming,
            segment_len: 256,
            hop: 128,
            fft_len: None,
            detrend: false,
        }
    }

    /// STFT with a given window, segment length and hop.
    pub const fn with_segments(window: WindowType, segment_len: usize, hop: usize) -> Self {
        Self {
            window,
            segment_len,
            hop,
            fft_len: None,
            detrend: false,
        }
    }

    /// Resolution used by the flux detectors: 2048-sample Hamming segments every 441
    /// samples (10 ms at 44.1 kHz).
    pub const fn onset_detection() -> Self {
        Self::with_segments(WindowType::Hamming, 2048, 441)
    }

    /// Effective FFT length.
    pub fn effective_fft_len(&self) -> usize {
        self.fft_len.unwrap_or(self.segment_len)
    }

    /// Number of one-sided frequency bins, `fft_len / 2 + 1`.
    pub fn num_bins(&self) -> usize {
        self.effective_fft_len() / 2 + 1
    }

    /// Number of frames produced for a signal of `signal_len` samples.
    ///
    /// The signal is extended by `segment_len / 2` zeros on both sides and then padded
    /// at the end to a whole number of hops.
    pub fn num_frames(&self, signal_len: usize) -> usize {
        let extended = signal_len + 2 * (self.segment_len / 2);
        if extended < self.segment_len || self.hop == 0 {
            return 0;
        }
        (extended - self.segment_len).div_ceil(self.hop) + 1
    }

    /// Validate the STFT configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.segment_len == 0 {
            return Err("Segment length must be greater than 0".to_string());
        }
        if self.hop == 0 {
            return Err("Hop size must be greater than 0".to_string());
        }
        if self.hop > self.segment_len {
            return Err(format!(
                "Hop size ({}) cannot be larger than segment length ({})",
                self.hop, self.segment_len
            ));
        }
        if let Some(n) = self.fft_len {
            if n < self.segment_len {
                return Err(format!(
                    "FFT length ({n}) must be at least the segment length ({})",
                    self.segment_len
                ));
            }
        }
        Ok(())
    }
}

impl Default for StftConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Smoothing applied to a flux ODF before peak picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum SmoothingKernel {
    /// Symmetric Hamming window of the given length.
    Hamming(usize),
    /// Rectangular pulse of the given width, padded by the same number of zeros on
    /// each side (total length `3 * width`).
    RectangularPulse(usize),
}

impl SmoothingKernel {
    /// The kernel taps.
    pub fn taps(&self) -> Vec<f64> {
        match *self {
            SmoothingKernel::Hamming(len) => WindowType::Hamming.coefficients(len, false),
            SmoothingKernel::RectangularPulse(width) => {
                let mut taps = vec![0.0; 3 * width];
                taps[width..2 * width].fill(1.0);
                taps
            }
        }
    }

    /// Validate the kernel size.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            SmoothingKernel::Hamming(0) => {
                Err("Hamming smoothing length must be at least 1".to_string())
            }
            SmoothingKernel::RectangularPulse(0) => {
                Err("Rectangular pulse width must be at least 1".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// The two spectral flux formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum FluxStrategy {
    /// Difference of the per-frame magnitude sums:
    /// `ODF[t] = max(0, S[t+1] - S[t]) / S[t]` with `S[t] = Σ_f |X(f, t)|`.
    SumMagnitude,
    /// Sum of per-bin rectified magnitude increases, normalised by the previous
    /// frame's magnitude sum:
    /// `ODF[t] = Σ_f max(0, |X(f, t+1)| - |X(f, t)|) / Σ_f |X(f, t)|`.
    StdNormalized,
}

/// Configuration of the spectral flux onset detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct FluxOnsetConfig {
    /// Flux formulation.
    pub strategy: FluxStrategy,
    /// STFT parameters; `stft.hop` also maps ODF indices to samples.
    pub stft: StftConfig,
    /// Divide each flux value by the previous frame's magnitude sum.
    pub normalize: bool,
    /// Optional smoothing kernel.
    pub smoothing: Option<SmoothingKernel>,
    /// Replacement for a zero normalisation denominator.
    pub epsilon: f64,
    /// Peak picker parameters.
    pub peak_picking: PeakPickingConfig,
}

impl FluxOnsetConfig {
    /// Sum-magnitude flux: Hamming STFT (2048 / 441), normalised, smoothed with a
    /// 5-point Hamming window.
    pub const fn sum_magnitude() -> Self {
        Self {
            strategy: FluxStrategy::SumMagnitude,
            stft: StftConfig::onset_detection(),
            normalize: true,
            smoothing: Some(SmoothingKernel::Hamming(5)),
            epsilon: f64::EPSILON,
            peak_picking: PeakPickingConfig::new(),
        }
    }

    /// Std-normalised flux: Hann STFT (2048 / 441) with per-segment mean removal,
    /// normalised, smoothed with a rectangular pulse of width 10.
    pub const fn std_normalized() -> Self {
        Self {
            strategy: FluxStrategy::StdNormalized,
            stft: StftConfig {
                window: WindowType::Hanning,
                segment_len: 2048,
                hop: 441,
                fft_len: None,
                detrend: true,
            },
            normalize: true,
            smoothing: Some(SmoothingKernel::RectangularPulse(10)),
            epsilon: f64::EPSILON,
            peak_picking: PeakPickingConfig::new(),
        }
    }

    /// Same configuration without normalisation or smoothing.
    pub const fn unprocessed(mut self) -> Self {
        self.normalize = false;
        self.smoothing = None;
        self
    }

    /// Enable or disable normalisation.
    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    /// Set or clear the smoothing kernel.
    pub fn set_smoothing(&mut self, smoothing: Option<SmoothingKernel>) {
        self.smoothing = smoothing;
    }

    /// Validate the flux onset configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.stft.validate()?;
        self.peak_picking.validate()?;
        if let Some(kernel) = &self.smoothing {
            kernel.validate()?;
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(format!("Epsilon must be finite and > 0, got {}", self.epsilon));
        }
        Ok(())
    }
}

impl Default for FluxOnsetConfig {
    fn default() -> Self {
        Self::sum_magnitude()
    }
}
