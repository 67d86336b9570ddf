//! Peak picking and post-processing utilities for onset detection.
//!
//! This module turns an onset detection function (ODF) into discrete onset
//! positions, and provides the smoothing and standardisation helpers applied to an
//! ODF beforehand.
//!
//! ## Adaptive peak picking
//!
//! Index `n` of an ODF `x` is an onset when all three conditions hold:
//!
//! 1. **Local maximum**: `x[n] >= max(x[n - m·w ..= n + w])`
//! 2. **Margin above mean**: `x[n] >= mean(x[n - m·w ..= n + w]) + δ`
//! 3. **Adaptive threshold**: `x[n] >= g[n]`, with
//!    `g[n] = max(x[n], α·g[n-1] + (1-α)·x[n])` and `g[-1] = 0`
//!
//! Window indices outside the ODF are clamped to the nearest valid index, so edge
//! samples are counted more than once. The threshold recurrence makes the pass
//! strictly sequential; it is evaluated as a fold local to one call.
//!
//! ## Fixed-order local maxima
//!
//! The entropy detector uses a simpler filter: `n` is a peak when `x[n]` is strictly
//! greater than every other sample within `order` positions (again with clamped
//! indexing, which means the first and last samples never qualify).
//!
//! ## References
//!
//! - Bello, J.P., et al. "A tutorial on onset detection in music signals." IEEE TSALP 2005.
//! - Dixon, S. "Onset detection revisited." DAFx 2006.

use crate::error::config_error;
use crate::operations::types::PeakPickingConfig;
use crate::{AudioSampleError, AudioSampleResult, ParameterError, RealFloat, to_precision};

/// Computes the adaptive threshold trace `g` of an ODF.
///
/// `g[n] = max(x[n], α·g[n-1] + (1-α)·x[n])` with `g[-1] = 0`. For a non-negative ODF
/// the trace never decays faster than `α` per step: `g[n] >= α·g[n-1]`.
///
/// # Arguments
///
/// * `odf` - The onset detection function
/// * `alpha` - Decay rate in (0, 1)
///
/// # Returns
///
/// A vector of threshold values with the same length as the input
///
/// # Examples
///
/// ```rust
/// use audio_onsets::operations::peak_picking::adaptive_threshold;
///
/// let g = adaptive_threshold(&[0.0f64, 1.0, 0.0, 0.0], 0.5);
/// assert_eq!(g, vec![0.0, 1.0, 0.5, 0.25]);
/// ```
pub fn adaptive_threshold<F: RealFloat>(odf: &[F], alpha: F) -> Vec<F> {
    let one_minus = F::one() - alpha;
    odf.iter()
        .scan(F::zero(), |g, &x| {
            *g = x.max(alpha * *g + one_minus * x);
            Some(*g)
        })
        .collect()
}

/// Picks onsets from an ODF with the three-condition adaptive rule.
///
/// # Arguments
///
/// * `odf` - The onset detection function
/// * `config` - Window half-widths, threshold decay and margin
///
/// # Returns
///
/// Strictly increasing indices into `odf`. An empty ODF yields no peaks.
///
/// # Errors
///
/// Returns [`ParameterError`] if the configuration is invalid.
///
/// # Examples
///
/// ```rust
/// use audio_onsets::PeakPickingConfig;
/// use audio_onsets::operations::peak_picking::pick_peaks;
///
/// let mut odf = vec![0.0f64; 100];
/// odf[50] = 10.0;
/// let peaks = pick_peaks(&odf, &PeakPickingConfig::new()).unwrap();
/// assert_eq!(peaks, vec![50]);
/// ```
pub fn pick_peaks<F: RealFloat>(
    odf: &[F],
    config: &PeakPickingConfig,
) -> AudioSampleResult<Vec<usize>> {
    config.validate().map_err(config_error("peak_picking_config"))?;

    if odf.is_empty() {
        return Ok(Vec::new());
    }

    let last = odf.len() - 1;
    let behind = config.pre_factor * config.window;
    let ahead = config.window;
    let count = to_precision::<F, _>(config.window_len());
    let alpha = to_precision::<F, _>(config.alpha);
    let delta = to_precision::<F, _>(config.delta);
    let one_minus = F::one() - alpha;

    let mut peaks = Vec::new();
    let mut g = F::zero();

    for (n, &x) in odf.iter().enumerate() {
        // Clamped window [n - m·w, n + w]
        let (local_max, local_sum) = (0..=behind + ahead)
            .map(|k| odf[(n + k).saturating_sub(behind).min(last)])
            .fold((F::neg_infinity(), F::zero()), |(mx, sum), v| {
                (mx.max(v), sum + v)
            });

        g = x.max(alpha * g + one_minus * x);

        if x >= local_max && x >= local_sum / count + delta && x >= g {
            peaks.push(n);
        }
    }

    Ok(peaks)
}

/// Finds indices that are strict maxima within `order` samples on either side.
///
/// Comparisons use clamped indexing, so a sample is compared against the nearest
/// valid neighbour when the window leaves the sequence. The first and last samples are
/// therefore never reported, and neither are plateaus.
///
/// # Errors
///
/// Returns [`ParameterError`] if `order` is zero.
///
/// # Examples
///
/// ```rust
/// use audio_onsets::operations::peak_picking::local_maxima;
///
/// let x = [0.0f64, 2.0, 1.0, 3.0, 1.0, 1.0, 5.0];
/// assert_eq!(local_maxima(&x, 1).unwrap(), vec![1, 3]);
/// assert_eq!(local_maxima(&x, 2).unwrap(), vec![3]);
/// ```
pub fn local_maxima<F: RealFloat>(odf: &[F], order: usize) -> AudioSampleResult<Vec<usize>> {
    if order == 0 {
        return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
            "order",
            "Local maximum order must be at least 1",
        )));
    }
    if odf.is_empty() {
        return Ok(Vec::new());
    }

    let last = odf.len() - 1;
    Ok((0..odf.len())
        .filter(|&n| {
            (1..=order).all(|shift| {
                let left = odf[n.saturating_sub(shift)];
                let right = odf[(n + shift).min(last)];
                odf[n] > left && odf[n] > right
            })
        })
        .collect())
}

/// Convolves `signal` with `kernel`, returning the centred part of the full
/// convolution with the same length as `signal`.
///
/// Samples outside the signal are treated as zero. The output starts at offset
/// `(kernel.len() - 1) / 2` of the full convolution.
///
/// # Examples
///
/// ```rust
/// use audio_onsets::operations::peak_picking::convolve_same;
///
/// let y = convolve_same(&[0.0, 1.0, 0.0, 0.0], &[1.0, 2.0, 1.0]);
/// assert_eq!(y, vec![1.0, 2.0, 1.0, 0.0]);
/// ```
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return vec![0.0; signal.len()];
    }
    let offset = (kernel.len() - 1) / 2;
    (0..signal.len())
        .map(|i| {
            // Full-convolution index i + offset: Σ_k kernel[k] · signal[i + offset - k]
            let full = i + offset;
            kernel
                .iter()
                .enumerate()
                .filter_map(|(k, &h)| {
                    full.checked_sub(k)
                        .and_then(|j| signal.get(j))
                        .map(|&x| h * x)
                })
                .fold(0.0, |acc, v| acc + v)
        })
        .collect()
}

/// Z-score standardisation: `(x - mean) / std` with the population standard
/// deviation. A constant input standardises to all zeros.
pub fn standardize<F: RealFloat>(values: &[F]) -> Vec<F> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = to_precision::<F, _>(values.len());
    let mean = values.iter().fold(F::zero(), |acc, &x| acc + x) / n;
    let variance = values
        .iter()
        .fold(F::zero(), |acc, &x| acc + (x - mean) * (x - mean))
        / n;
    let std = variance.sqrt();
    if std > F::zero() {
        values.iter().map(|&x| (x - mean) / std).collect()
    } else {
        vec![F::zero(); values.len()]
    }
}
