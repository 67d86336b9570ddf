//! Spectral analysis and frequency domain transformations.
//!
//! This module provides the FFT-based building blocks of the onset detectors:
//!
//! - [`Stft`]: the short-time Fourier transform of a whole signal, with magnitude,
//!   power, phase, centroid and flux accessors.
//! - [`Spectrum`]: a single one-sided DFT of a signal.
//! - [`analytic_signal`]: the analytic signal via the FFT Hilbert transform.
//!
//! All transforms use `rustfft`. Spectral values are immutable; combining two of them
//! goes through the checked `add`/`sub`/`mul` methods, which refuse operands with a
//! different sample rate or transform length.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rustfft::{FftPlanner, num_complex::Complex};
use tracing::trace;

use super::traits::AudioSpectralAnalysis;
use super::types::{StftConfig, WindowType};
use crate::error::config_error;
use crate::utils::audio_math::rfft_frequencies;
use crate::{AudioSampleError, AudioSampleResult, ParameterError, Signal, SpectralError};

/// Complex short-time spectrum of a signal.
///
/// Bins are stored as a `(frequency, frame)` matrix with `fft_len / 2 + 1` rows.
/// Frame `i` is centred on sample `i * hop` of the original signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    bins: Array2<Complex<f64>>,
    sample_rate: u32,
    config: StftConfig,
}

impl Stft {
    /// Computes the STFT of `signal`.
    ///
    /// # Algorithm
    /// 1. Extend the signal by `segment_len / 2` zeros at both ends, then pad the end
    ///    with zeros to a whole number of hops.
    /// 2. Cut segments of `segment_len` samples every `hop` samples.
    /// 3. Optionally subtract each segment's mean (`detrend`), then multiply by the
    ///    periodic analysis window.
    /// 4. Take the one-sided FFT of length `fft_len` (zero-padding the segment) and
    ///    scale by `2 / Σ window`.
    ///
    /// The factor 2 compensates for the discarded negative frequencies. It is applied
    /// uniformly and so overstates the DC and Nyquist bins.
    ///
    /// # Errors
    /// Returns [`ParameterError`] if the configuration is invalid or `segment_len`
    /// exceeds the signal length.
    ///
    /// # Examples
    /// ```rust
    /// use audio_onsets::{Signal, Stft, StftConfig};
    ///
    /// let signal = Signal::from_vec(vec![0.0; 44100], 44100).unwrap();
    /// let stft = Stft::compute(&signal, &StftConfig::onset_detection()).unwrap();
    /// assert_eq!(stft.shape(), (1025, 101));
    /// ```
    pub fn compute(signal: &Signal, config: &StftConfig) -> AudioSampleResult<Self> {
        config.validate().map_err(config_error("stft"))?;
        if config.segment_len > signal.len() {
            return Err(AudioSampleError::Parameter(ParameterError::out_of_range(
                "segment_len",
                config.segment_len,
                1,
                signal.len(),
            )));
        }

        let seg = config.segment_len;
        let hop = config.hop;
        let n_fft = config.effective_fft_len();
        let n_bins = config.num_bins();
        let n_frames = config.num_frames(signal.len());

        // Step 1: boundary extension and end padding
        let half = seg / 2;
        let padded_len = (n_frames - 1) * hop + seg;
        let mut padded = vec![0.0; padded_len];
        for (dst, &src) in padded[half..].iter_mut().zip(signal.samples().iter()) {
            *dst = src;
        }

        let window = config.window.coefficients(seg, true);
        let scale = 2.0 / window.iter().sum::<f64>();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n_fft);

        // Steps 2-4, one column per frame
        let column = |frame: usize| -> Vec<Complex<f64>> {
            let segment = &padded[frame * hop..frame * hop + seg];
            let offset = if config.detrend {
                segment.iter().sum::<f64>() / seg as f64
            } else {
                0.0
            };
            let mut buffer = vec![Complex::new(0.0, 0.0); n_fft];
            for ((dst, &x), &w) in buffer.iter_mut().zip(segment).zip(&window) {
                *dst = Complex::new((x - offset) * w, 0.0);
            }
            fft.process(&mut buffer);
            buffer.truncate(n_bins);
            buffer.iter_mut().for_each(|c| *c *= scale);
            buffer
        };

        #[cfg(feature = "parallel-processing")]
        let columns: Vec<Vec<Complex<f64>>> = {
            use rayon::prelude::*;
            (0..n_frames).into_par_iter().map(column).collect()
        };
        #[cfg(not(feature = "parallel-processing"))]
        let columns: Vec<Vec<Complex<f64>>> = (0..n_frames).map(column).collect();

        let mut bins = Array2::zeros((n_bins, n_frames));
        for (frame, values) in columns.into_iter().enumerate() {
            bins.column_mut(frame).assign(&Array1::from_vec(values));
        }

        trace!(
            bins = n_bins,
            frames = n_frames,
            padded_len,
            "computed short-time spectrum"
        );

        Ok(Self {
            bins,
            sample_rate: signal.sample_rate(),
            config: *config,
        })
    }

    /// `(frequency bins, frames)`.
    pub fn shape(&self) -> (usize, usize) {
        self.bins.dim()
    }

    /// Number of one-sided frequency bins.
    pub fn num_bins(&self) -> usize {
        self.bins.nrows()
    }

    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.bins.ncols()
    }

    /// The complex bins, `(frequency, frame)`.
    pub fn bins(&self) -> ArrayView2<'_, Complex<f64>> {
        self.bins.view()
    }

    /// Sample rate of the analysed signal.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Configuration used to compute this STFT.
    pub const fn config(&self) -> &StftConfig {
        &self.config
    }

    /// Magnitude spectrogram `|X(f, t)|`.
    pub fn magnitude(&self) -> Array2<f64> {
        self.bins.mapv(|c| c.norm())
    }

    /// Power spectrogram `|X(f, t)|²`.
    pub fn power(&self) -> Array2<f64> {
        self.bins.mapv(|c| c.norm_sqr())
    }

    /// Phase spectrogram in radians.
    pub fn phase(&self) -> Array2<f64> {
        self.bins.mapv(|c| c.arg())
    }

    /// Centre frequency of every bin in Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        rfft_frequencies(self.config.effective_fft_len(), self.sample_rate as f64)
    }

    /// Time of every frame centre in seconds.
    pub fn times(&self) -> Vec<f64> {
        let sr = self.sample_rate as f64;
        (0..self.num_frames())
            .map(|i| (i * self.config.hop) as f64 / sr)
            .collect()
    }

    /// Power-weighted mean frequency of every frame. A silent frame has centroid 0.
    pub fn centroid(&self) -> Array1<f64> {
        let power = self.power();
        let freqs = Array1::from_vec(self.frequencies());
        power
            .axis_iter(Axis(1))
            .map(|column| weighted_mean(&freqs, column))
            .collect()
    }

    /// Per-bin rectified magnitude increase between consecutive frames, shape
    /// `(bins, frames - 1)`.
    pub fn flux(&self) -> Array2<f64> {
        rectified_difference(self.magnitude().view())
    }

    /// Bin-wise sum of two STFTs.
    ///
    /// # Errors
    /// See [`Stft::mul`].
    pub fn add(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a + b)
    }

    /// Bin-wise difference of two STFTs.
    ///
    /// # Errors
    /// See [`Stft::mul`].
    pub fn sub(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a - b)
    }

    /// Bin-wise product of two STFTs.
    ///
    /// # Errors
    /// - [`SpectralError::Incompatible`] if the sample rates or FFT lengths differ
    /// - [`SpectralError::ShapeMismatch`] if the frame counts differ
    pub fn mul(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a * b)
    }

    fn combine(
        &self,
        other: &Self,
        op: impl Fn(Complex<f64>, Complex<f64>) -> Complex<f64>,
    ) -> AudioSampleResult<Self> {
        check_compatible(
            (self.sample_rate, self.config.effective_fft_len()),
            (other.sample_rate, other.config.effective_fft_len()),
        )?;
        check_shape(self.bins.shape(), other.bins.shape())?;
        let bins = Zip::from(&self.bins)
            .and(&other.bins)
            .map_collect(|&a, &b| op(a, b));
        Ok(Self {
            bins,
            sample_rate: self.sample_rate,
            config: self.config,
        })
    }
}

/// One-sided DFT of a whole signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Array1<Complex<f64>>,
    sample_rate: u32,
    n: usize,
    window: Option<WindowType>,
}

impl Spectrum {
    /// Computes the one-sided DFT of `samples`.
    ///
    /// # Arguments
    /// * `samples` - Time-domain input
    /// * `sample_rate` - Sample rate in Hz, used for the frequency axis
    /// * `n` - Transform length; `None` uses the input length. Shorter transforms
    ///   truncate the input, longer ones zero-pad it
    /// * `window` - Optional periodic window applied before the transform
    ///
    /// # Returns
    /// `n / 2 + 1` bins scaled by `2 / samples.len()`, so a full-period sinusoid of
    /// amplitude `a` shows a peak of magnitude close to `a`.
    ///
    /// # Errors
    /// Returns an error for empty input, a zero sample rate, or `n == Some(0)`.
    pub fn fft(
        samples: ArrayView1<'_, f64>,
        sample_rate: u32,
        n: Option<usize>,
        window: Option<WindowType>,
    ) -> AudioSampleResult<Self> {
        let len = samples.len();
        if len == 0 {
            return Err(AudioSampleError::EmptyData(
                "Cannot transform an empty signal".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                "sample_rate",
                "Sample rate must be greater than 0",
            )));
        }
        let n = n.unwrap_or(len);
        if n == 0 {
            return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                "n",
                "Transform length must be greater than 0",
            )));
        }

        let coefficients = window.map(|w| w.coefficients(len, true));
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        for (i, (dst, &x)) in buffer.iter_mut().zip(samples.iter()).enumerate() {
            let w = coefficients.as_ref().map_or(1.0, |c| c[i]);
            *dst = Complex::new(x * w, 0.0);
        }

        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(n).process(&mut buffer);

        let scale = 2.0 / len as f64;
        let bins = buffer
            .into_iter()
            .take(n / 2 + 1)
            .map(|c| c * scale)
            .collect();

        Ok(Self {
            bins,
            sample_rate,
            n,
            window,
        })
    }

    /// The complex bins.
    pub fn bins(&self) -> ArrayView1<'_, Complex<f64>> {
        self.bins.view()
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True if the spectrum holds no bins.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Sample rate in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Transform length.
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Window applied before the transform, if any.
    pub const fn window(&self) -> Option<WindowType> {
        self.window
    }

    /// Frequency of every bin in Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        rfft_frequencies(self.n, self.sample_rate as f64)
    }

    /// Magnitude spectrum.
    pub fn magnitude(&self) -> Array1<f64> {
        self.bins.mapv(|c| c.norm())
    }

    /// Power spectrum.
    pub fn power(&self) -> Array1<f64> {
        self.bins.mapv(|c| c.norm_sqr())
    }

    /// Phase spectrum in radians.
    pub fn phase(&self) -> Array1<f64> {
        self.bins.mapv(|c| c.arg())
    }

    /// Power-weighted mean frequency; 0 for an all-zero spectrum.
    pub fn centroid(&self) -> f64 {
        let freqs = Array1::from_vec(self.frequencies());
        weighted_mean(&freqs, self.power().view())
    }

    /// Bin-wise sum.
    ///
    /// # Errors
    /// [`SpectralError::Incompatible`] if the sample rates or transform lengths differ.
    pub fn add(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a + b)
    }

    /// Bin-wise difference.
    ///
    /// # Errors
    /// [`SpectralError::Incompatible`] if the sample rates or transform lengths differ.
    pub fn sub(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a - b)
    }

    /// Bin-wise product.
    ///
    /// # Errors
    /// [`SpectralError::Incompatible`] if the sample rates or transform lengths differ.
    pub fn mul(&self, other: &Self) -> AudioSampleResult<Self> {
        self.combine(other, |a, b| a * b)
    }

    /// Adds a constant to every bin.
    pub fn add_scalar(&self, value: impl Into<Complex<f64>>) -> Self {
        let value = value.into();
        self.with_bins(self.bins.mapv(|c| c + value))
    }

    /// Multiplies every bin by a constant.
    pub fn mul_scalar(&self, value: impl Into<Complex<f64>>) -> Self {
        let value = value.into();
        self.with_bins(self.bins.mapv(|c| c * value))
    }

    fn combine(
        &self,
        other: &Self,
        op: impl Fn(Complex<f64>, Complex<f64>) -> Complex<f64>,
    ) -> AudioSampleResult<Self> {
        check_compatible((self.sample_rate, self.n), (other.sample_rate, other.n))?;
        let bins = Zip::from(&self.bins)
            .and(&other.bins)
            .map_collect(|&a, &b| op(a, b));
        Ok(self.with_bins(bins))
    }

    fn with_bins(&self, bins: Array1<Complex<f64>>) -> Self {
        Self {
            bins,
            sample_rate: self.sample_rate,
            n: self.n,
            window: self.window,
        }
    }
}

/// Computes the analytic signal `x + i·H{x}` of a real sequence.
///
/// Uses the FFT method with a transform as long as the input: the DC bin is kept,
/// positive frequencies are doubled, negative frequencies are zeroed and, for even
/// lengths, the Nyquist bin is kept. The imaginary part of the result is the Hilbert
/// transform of `x`.
///
/// # Errors
/// Returns [`AudioSampleError::EmptyData`] for an empty input.
///
/// # Examples
/// ```rust
/// use audio_onsets::operations::transforms::analytic_signal;
/// use ndarray::Array1;
/// use std::f64::consts::PI;
///
/// // The Hilbert transform of a whole-period cosine is the matching sine.
/// let x = Array1::from_shape_fn(64, |i| (2.0 * PI * 4.0 * i as f64 / 64.0).cos());
/// let z = analytic_signal(x.view()).unwrap();
/// let expected = (2.0 * PI * 4.0 * 3.0 / 64.0).sin();
/// assert!((z[3].im - expected).abs() < 1e-9);
/// ```
pub fn analytic_signal(x: ArrayView1<'_, f64>) -> AudioSampleResult<Array1<Complex<f64>>> {
    let n = x.len();
    if n == 0 {
        return Err(AudioSampleError::EmptyData(
            "Cannot compute the analytic signal of an empty sequence".to_string(),
        ));
    }

    let mut buffer: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    // Bins 1..positive_end are doubled, bins past the Nyquist are zeroed.
    let positive_end = n.div_ceil(2);
    let nyquist_end = if n % 2 == 0 { positive_end + 1 } else { positive_end };
    for c in &mut buffer[1..positive_end] {
        *c *= 2.0;
    }
    for c in &mut buffer[nyquist_end..] {
        *c = Complex::new(0.0, 0.0);
    }

    planner.plan_fft_inverse(n).process(&mut buffer);
    let norm = 1.0 / n as f64;
    Ok(buffer.into_iter().map(|c| c * norm).collect())
}

impl AudioSpectralAnalysis for Signal {
    fn stft(&self, config: &StftConfig) -> AudioSampleResult<Stft> {
        Stft::compute(self, config)
    }

    fn spectrum(
        &self,
        n: Option<usize>,
        window: Option<WindowType>,
    ) -> AudioSampleResult<Spectrum> {
        Spectrum::fft(self.samples(), self.sample_rate(), n, window)
    }

    fn analytic_signal(&self) -> AudioSampleResult<Array1<Complex<f64>>> {
        analytic_signal(self.samples())
    }
}

/// Rectified difference along the frame axis: `max(0, M[:, t+1] - M[:, t])`.
pub(crate) fn rectified_difference(magnitude: ArrayView2<'_, f64>) -> Array2<f64> {
    let frames = magnitude.ncols();
    if frames < 2 {
        return Array2::zeros((magnitude.nrows(), 0));
    }
    let earlier = magnitude.slice(ndarray::s![.., ..frames - 1]);
    let later = magnitude.slice(ndarray::s![.., 1..]);
    Zip::from(&later)
        .and(&earlier)
        .map_collect(|&b, &a| (b - a).max(0.0))
}

fn weighted_mean(values: &Array1<f64>, weights: ArrayView1<'_, f64>) -> f64 {
    let total: f64 = weights.sum();
    if total > 0.0 {
        values.dot(&weights) / total
    } else {
        0.0
    }
}

fn check_compatible(left: (u32, usize), right: (u32, usize)) -> AudioSampleResult<()> {
    if left != right {
        return Err(SpectralError::Incompatible {
            left_rate: left.0,
            right_rate: right.0,
            left_len: left.1,
            right_len: right.1,
        }
        .into());
    }
    Ok(())
}

fn check_shape(left: &[usize], right: &[usize]) -> AudioSampleResult<()> {
    if left != right {
        return Err(SpectralError::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generation::sine_wave;
    use approx_eq::assert_approx_eq;
    use std::f64::consts::PI;
    use std::time::Duration;

    #[test]
    fn test_stft_shape_matches_frame_formula() {
        let signal = Signal::from_vec(vec![0.0; 44100], 44100).unwrap();
        let config = StftConfig::onset_detection();
        let stft = Stft::compute(&signal, &config).unwrap();
        assert_eq!(stft.shape(), (1025, 101));
        assert_eq!(stft.frequencies().len(), 1025);
        assert_approx_eq!(stft.times()[100], 1.0, 1e-12);

        // Needs end padding: (1000 + 256 - 256) % 100 == 0, (1001 + ...) % 100 != 0
        let config = StftConfig::with_segments(WindowType::Hanning, 256, 100);
        let even = Signal::from_vec(vec![0.0; 1000], 1000).unwrap();
        let odd = Signal::from_vec(vec![0.0; 1001], 1000).unwrap();
        assert_eq!(Stft::compute(&even, &config).unwrap().num_frames(), 11);
        assert_eq!(Stft::compute(&odd, &config).unwrap().num_frames(), 12);
    }

    #[test]
    fn test_stft_sine_peak_bin_and_scaling() {
        // 1 kHz at 8 kHz with a 64-point FFT lands exactly in bin 8.
        let signal = sine_wave(1000.0, Duration::from_millis(200), 8000, 1.0).unwrap();
        let config = StftConfig::with_segments(WindowType::Hanning, 64, 32);
        let stft = Stft::compute(&signal, &config).unwrap();
        let mag = stft.magnitude();
        let frame = stft.num_frames() / 2;
        let column = mag.column(frame);
        let peak = column
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert_eq!(peak.0, 8);
        // Scaled by 2 / Σw: a unit sinusoid reads as amplitude 1.
        assert_approx_eq!(peak.1, 1.0, 1e-9);
        assert_approx_eq!(stft.centroid()[frame], 1000.0, 1e-6);
    }

    #[test]
    fn test_stft_detrend_removes_offset() {
        let signal = Signal::from_vec(vec![0.5; 512], 1000).unwrap();
        let mut config = StftConfig::with_segments(WindowType::Hanning, 64, 32);
        config.detrend = true;
        let stft = Stft::compute(&signal, &config).unwrap();
        // Interior frames see a constant segment which detrending zeroes.
        let mag = stft.magnitude();
        assert!(mag.column(8).iter().all(|&v| v < 1e-12));

        config.detrend = false;
        let plain = Stft::compute(&signal, &config).unwrap();
        assert!(plain.magnitude()[[0, 8]] > 0.5);
    }

    #[test]
    fn test_stft_rejects_short_signal() {
        let signal = Signal::from_vec(vec![0.0; 100], 1000).unwrap();
        let result = Stft::compute(&signal, &StftConfig::new());
        assert!(matches!(
            result,
            Err(AudioSampleError::Parameter(ParameterError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_stft_flux_is_rectified() {
        let signal = sine_wave(440.0, Duration::from_millis(100), 8000, 1.0).unwrap();
        let stft = Stft::compute(&signal, &StftConfig::new()).unwrap();
        let flux = stft.flux();
        assert_eq!(flux.dim(), (stft.num_bins(), stft.num_frames() - 1));
        assert!(flux.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_stft_combinations() {
        let a = sine_wave(440.0, Duration::from_millis(100), 8000, 1.0).unwrap();
        let config = StftConfig::new();
        let x = Stft::compute(&a, &config).unwrap();

        let doubled = x.add(&x).unwrap();
        assert_approx_eq!(doubled.bins()[[5, 2]].re, 2.0 * x.bins()[[5, 2]].re, 1e-12);
        let zero = x.sub(&x).unwrap();
        assert!(zero.magnitude().iter().all(|&v| v == 0.0));
        assert_eq!(x.mul(&x).unwrap().shape(), x.shape());

        let other_rate = Signal::from_vec(a.to_vec(), 16000).unwrap();
        let y = Stft::compute(&other_rate, &config).unwrap();
        assert!(matches!(
            x.add(&y),
            Err(AudioSampleError::Spectral(SpectralError::Incompatible { .. }))
        ));

        let longer = sine_wave(440.0, Duration::from_millis(200), 8000, 1.0).unwrap();
        let z = Stft::compute(&longer, &config).unwrap();
        assert!(matches!(
            x.mul(&z),
            Err(AudioSampleError::Spectral(SpectralError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_spectrum_fft_and_centroid() {
        // Eight whole periods in 64 samples: energy in bin 8 only.
        let x = Array1::from_shape_fn(64, |i| 0.5 * (2.0 * PI * 8.0 * i as f64 / 64.0).sin());
        let spectrum = Spectrum::fft(x.view(), 64, None, None).unwrap();
        assert_eq!(spectrum.len(), 33);
        assert_approx_eq!(spectrum.magnitude()[8], 0.5, 1e-12);
        assert_approx_eq!(spectrum.centroid(), 8.0, 1e-9);
        assert_approx_eq!(spectrum.frequencies()[32], 32.0, 1e-12);

        let padded = Spectrum::fft(x.view(), 64, Some(128), Some(WindowType::Hanning)).unwrap();
        assert_eq!(padded.len(), 65);
        assert_eq!(padded.window(), Some(WindowType::Hanning));

        let silent = Spectrum::fft(Array1::<f64>::zeros(16).view(), 16, None, None).unwrap();
        assert!(silent.centroid().abs() < 1e-15);

        assert!(Spectrum::fft(Array1::<f64>::zeros(0).view(), 16, None, None).is_err());
        assert!(Spectrum::fft(x.view(), 0, None, None).is_err());
        assert!(Spectrum::fft(x.view(), 64, Some(0), None).is_err());
    }

    #[test]
    fn test_spectrum_combinations() {
        let x = Array1::from_shape_fn(32, |i| (i as f64 * 0.3).sin());
        let a = Spectrum::fft(x.view(), 32, None, None).unwrap();
        let b = Spectrum::fft(x.view(), 32, Some(64), None).unwrap();
        let c = Spectrum::fft(x.view(), 44, None, None).unwrap();

        let sum = a.add(&a).unwrap();
        assert_approx_eq!(sum.bins()[3].im, 2.0 * a.bins()[3].im, 1e-12);
        assert!(a.sub(&a).unwrap().magnitude().iter().all(|&v| v == 0.0));
        assert!(a.mul(&a).is_ok());

        assert!(matches!(
            a.add(&b),
            Err(AudioSampleError::Spectral(SpectralError::Incompatible { .. }))
        ));
        assert!(a.mul(&c).is_err());

        let shifted = a.add_scalar(1.0);
        assert_approx_eq!(shifted.bins()[0].re, a.bins()[0].re + 1.0, 1e-12);
        let scaled = a.mul_scalar(3.0);
        assert_approx_eq!(scaled.magnitude()[2], 3.0 * a.magnitude()[2], 1e-12);
    }

    #[test]
    fn test_analytic_signal_even_and_odd() {
        for n in [64usize, 63] {
            let x = Array1::from_shape_fn(n, |i| (2.0 * PI * 5.0 * i as f64 / n as f64).cos());
            let z = analytic_signal(x.view()).unwrap();
            assert_eq!(z.len(), n);
            for i in 0..n {
                let expected_im = (2.0 * PI * 5.0 * i as f64 / n as f64).sin();
                assert!((z[i].re - x[i]).abs() < 1e-9);
                assert!((z[i].im - expected_im).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_signal_spectral_analysis_trait() {
        let signal = sine_wave(1000.0, Duration::from_millis(100), 8000, 1.0).unwrap();
        let stft = AudioSpectralAnalysis::stft(&signal, &StftConfig::new()).unwrap();
        assert_eq!(stft.sample_rate(), 8000);
        let spectrum = signal.spectrum(None, None).unwrap();
        assert_eq!(spectrum.len(), 401);
        assert_approx_eq!(spectrum.magnitude()[100], 1.0, 1e-9);
        assert_eq!(signal.analytic_signal().unwrap().len(), 800);
    }

    #[test]
    fn test_analytic_signal_of_constant_is_real() {
        let x = Array1::from_elem(10, 2.0);
        let z = analytic_signal(x.view()).unwrap();
        assert!(z.iter().all(|c| c.im.abs() < 1e-12));
        assert_approx_eq!(z[4].re, 2.0, 1e-12);
        assert!(analytic_signal(Array1::<f64>::zeros(0).view()).is_err());
    }
}
