//! Phase-space reconstruction and histogram entropy.
//!
//! A frame `x` of `N` samples is embedded as `dimension` delayed copies of itself.
//! Column `n` of the resulting matrix is one point in a `dimension`-dimensional
//! *phase space*:
//!
//! ```text
//! row 0:  x[n]
//! row 1:  x[n - tau]
//! row 2:  x[n - 2 tau]
//! ...
//! ```
//!
//! The [`BoundaryMode`] decides what happens for `n - k·tau < 0`. The points are then
//! binned into a regular grid of `bins` boxes per axis spanning each axis' own
//! `[min, max]`, and the Shannon entropy (natural log) of the cell occupation is
//! computed. A frame concentrated in few cells has low entropy; a frame spreading
//! across the grid has high entropy, bounded by `dimension · ln(bins)`.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::config_error;
use crate::operations::types::{BoundaryMode, PhaseSpaceConfig};
use crate::{AudioSampleError, AudioSampleResult, ParameterError};

/// A delay embedding: `dimension` rows, one column per phase-space point.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    points: Array2<f64>,
    tau: usize,
}

impl Embedding {
    /// Embedding dimension (number of rows).
    pub fn dimension(&self) -> usize {
        self.points.nrows()
    }

    /// Number of phase-space points (columns).
    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    /// True if the embedding holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.ncols() == 0
    }

    /// Delay used to build the embedding.
    pub const fn tau(&self) -> usize {
        self.tau
    }

    /// The `dimension × len` matrix of coordinates.
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Shannon entropy of the embedding with `bins` boxes per axis.
    ///
    /// # Errors
    /// See [`entropy`].
    pub fn entropy(&self, bins: usize) -> AudioSampleResult<f64> {
        entropy(self.points.view(), bins)
    }
}

/// Builds the delay embedding of `frame`.
///
/// # Arguments
/// * `frame` - Samples to embed
/// * `config` - Delay, dimension and boundary mode; `bins` is ignored here
///
/// # Returns
/// An [`Embedding`] with `config.dimension` rows. With [`BoundaryMode::Wrap`] and
/// [`BoundaryMode::Zero`] it has one column per sample; with [`BoundaryMode::Valid`]
/// it has `frame.len() - (dimension - 1) * tau` columns, and row `k` holds
/// `x[n + (dimension - 1 - k) * tau]`, so every row is still `tau` samples behind the
/// one above it.
///
/// # Errors
/// - [`AudioSampleError::EmptyData`] for an empty frame
/// - [`ParameterError`] for an invalid configuration, or in `Valid` mode when the
///   frame is too short to hold a single complete delay vector
///
/// # Examples
/// ```rust
/// use audio_onsets::operations::phase_space::embed;
/// use audio_onsets::{BoundaryMode, PhaseSpaceConfig};
/// use ndarray::array;
///
/// let config = PhaseSpaceConfig { tau: 1, dimension: 2, bins: 4, boundary: BoundaryMode::Wrap };
/// let frame = array![1.0, 2.0, 3.0];
/// let emb = embed(frame.view(), &config).unwrap();
/// assert_eq!(emb.points().row(1).to_vec(), vec![3.0, 1.0, 2.0]);
/// ```
pub fn embed(
    frame: ArrayView1<'_, f64>,
    config: &PhaseSpaceConfig,
) -> AudioSampleResult<Embedding> {
    config.validate().map_err(config_error("phase_space"))?;

    let n = frame.len();
    if n == 0 {
        return Err(AudioSampleError::EmptyData(
            "Cannot embed an empty frame".to_string(),
        ));
    }

    let m = config.dimension;
    let tau = config.tau;

    let points = match config.boundary {
        BoundaryMode::Wrap => Array2::from_shape_fn((m, n), |(k, i)| {
            let shift = (k * tau) % n;
            frame[(i + n - shift) % n]
        }),
        BoundaryMode::Zero => Array2::from_shape_fn((m, n), |(k, i)| {
            let delay = k * tau;
            if i >= delay { frame[i - delay] } else { 0.0 }
        }),
        BoundaryMode::Valid => {
            let span = (m - 1) * tau;
            if n <= span {
                return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                    "frame",
                    format!(
                        "Frame of {n} samples is too short for a complete delay vector spanning {} samples",
                        span + 1
                    ),
                )));
            }
            Array2::from_shape_fn((m, n - span), |(k, i)| frame[i + (m - 1 - k) * tau])
        }
    };

    Ok(Embedding { points, tau })
}

/// Shannon entropy (natural log) of the occupation of a regular grid.
///
/// Each row of `points` is one axis. The axis range `[min, max]` is split into `bins`
/// equal boxes, the maximum falling into the last box; an axis with `min == max` puts
/// every point in its first box.
///
/// # Returns
/// `H = -Σ p · ln(p)` over non-empty cells, with `p` the fraction of points in a cell.
/// The result lies in `[0, dimension · ln(bins)]`.
///
/// # Errors
/// - [`AudioSampleError::EmptyData`] if there are no points or no axes
/// - [`ParameterError`] if `bins` is zero or `bins ^ dimension` overflows
pub fn entropy(points: ArrayView2<'_, f64>, bins: usize) -> AudioSampleResult<f64> {
    let (dims, count) = points.dim();
    if dims == 0 || count == 0 {
        return Err(AudioSampleError::EmptyData(
            "Cannot compute the entropy of an empty embedding".to_string(),
        ));
    }
    if bins == 0 {
        return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
            "bins",
            "Number of bins must be at least 1",
        )));
    }
    let overflow = || {
        AudioSampleError::Parameter(ParameterError::invalid_value(
            "bins",
            format!("{bins}^{dims} histogram cells cannot be addressed"),
        ))
    };
    u32::try_from(dims)
        .ok()
        .and_then(|d| bins.checked_pow(d))
        .ok_or_else(overflow)?;

    // Flattened cell index per point: Σ_k box_k · bins^k.
    let mut cells = vec![0usize; count];
    let mut stride = 1usize;
    for axis in points.axis_iter(Axis(0)) {
        let (lo, hi) = axis
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let width = hi - lo;
        for (cell, &v) in cells.iter_mut().zip(axis.iter()) {
            let index = if width > 0.0 {
                (((v - lo) / width * bins as f64).floor() as usize).min(bins - 1)
            } else {
                0
            };
            *cell += index * stride;
        }
        stride = stride.saturating_mul(bins);
    }

    // Sorting keeps the summation order independent of hashing.
    cells.sort_unstable();
    let total = count as f64;
    let h = cells
        .chunk_by(|a, b| a == b)
        .map(|run| {
            let p = run.len() as f64 / total;
            -p * p.ln()
        })
        .fold(0.0, |acc, term| acc + term);

    Ok(h.max(0.0))
}

/// Embeds a frame and returns the entropy of its phase-space histogram.
///
/// # Errors
/// See [`embed`] and [`entropy`].
pub fn frame_entropy(
    frame: ArrayView1<'_, f64>,
    config: &PhaseSpaceConfig,
) -> AudioSampleResult<f64> {
    embed(frame, config)?.entropy(config.bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    fn config(
        tau: usize,
        dimension: usize,
        bins: usize,
        boundary: BoundaryMode,
    ) -> PhaseSpaceConfig {
        PhaseSpaceConfig {
            tau,
            dimension,
            bins,
            boundary,
        }
    }

    #[test]
    fn test_wrap_embedding_rotates_rows() {
        let frame = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let emb = embed(frame.view(), &config(2, 3, 10, BoundaryMode::Wrap)).unwrap();
        assert_eq!(emb.dimension(), 3);
        assert_eq!(emb.len(), 5);
        assert_eq!(emb.points().row(0).to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(emb.points().row(1).to_vec(), vec![3.0, 4.0, 0.0, 1.0, 2.0]);
        assert_eq!(emb.points().row(2).to_vec(), vec![1.0, 2.0, 3.0, 4.0, 0.0]);
    }

    #[test]
    fn test_wrap_with_delay_longer_than_frame() {
        let frame = array![0.0, 1.0, 2.0];
        let emb = embed(frame.view(), &config(4, 2, 10, BoundaryMode::Wrap)).unwrap();
        assert_eq!(emb.points().row(1).to_vec(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_embedding_fills_history() {
        let frame = array![1.0, 2.0, 3.0, 4.0];
        let emb = embed(frame.view(), &config(1, 3, 10, BoundaryMode::Zero)).unwrap();
        assert_eq!(emb.points().row(1).to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(emb.points().row(2).to_vec(), vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_valid_embedding_drops_incomplete_vectors() {
        let frame = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let emb = embed(frame.view(), &config(2, 2, 10, BoundaryMode::Valid)).unwrap();
        assert_eq!(emb.len(), 3);
        assert_eq!(emb.points().row(0).to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(emb.points().row(1).to_vec(), vec![1.0, 2.0, 3.0]);

        let short = array![1.0, 2.0];
        assert!(matches!(
            embed(short.view(), &config(2, 2, 10, BoundaryMode::Valid)),
            Err(AudioSampleError::Parameter(_))
        ));
    }

    #[test]
    fn test_embed_rejects_bad_input() {
        let empty: ndarray::Array1<f64> = array![];
        assert!(matches!(
            embed(empty.view(), &PhaseSpaceConfig::new()),
            Err(AudioSampleError::EmptyData(_))
        ));
        let frame = array![1.0, 2.0];
        assert!(embed(frame.view(), &config(0, 2, 10, BoundaryMode::Wrap)).is_err());
        assert!(embed(frame.view(), &config(1, 0, 10, BoundaryMode::Wrap)).is_err());
    }

    #[test]
    fn test_constant_frame_has_zero_entropy() {
        let frame = ndarray::Array1::from_elem(64, 0.25);
        let h = frame_entropy(frame.view(), &PhaseSpaceConfig::new()).unwrap();
        assert!(h.abs() < 1e-15);
        assert!(h >= 0.0);
    }

    #[test]
    fn test_uniform_occupation_reaches_maximum() {
        // Four points in four distinct boxes of a 4-box axis.
        let frame = array![0.0, 1.0, 2.0, 3.0];
        let h = frame_entropy(frame.view(), &config(1, 1, 4, BoundaryMode::Wrap)).unwrap();
        assert_approx_eq!(h, 4.0f64.ln(), 1e-12);

        // Points (0,1) (0,0) (1,0) (1,1) fill all 2^2 cells.
        let frame = array![0.0, 0.0, 1.0, 1.0];
        let cfg = config(1, 2, 2, BoundaryMode::Wrap);
        let h = frame_entropy(frame.view(), &cfg).unwrap();
        assert_approx_eq!(h, cfg.max_entropy(), 1e-12);
    }

    #[test]
    fn test_entropy_bounds() {
        let frame = ndarray::Array1::from_shape_fn(500, |i| ((i * i) as f64 * 0.37).sin());
        let cfg = PhaseSpaceConfig::new();
        let h = frame_entropy(frame.view(), &cfg).unwrap();
        assert!(h > 0.0);
        assert!(h <= cfg.max_entropy() + 1e-12);
        // Cannot exceed ln(number of points) either.
        assert!(h <= (500.0f64).ln() + 1e-12);
    }

    #[test]
    fn test_entropy_is_deterministic() {
        let frame =
            ndarray::Array1::from_shape_fn(300, |i| (i as f64 * 0.13).cos() * (i % 7) as f64);
        let cfg = config(3, 3, 8, BoundaryMode::Zero);
        let a = frame_entropy(frame.view(), &cfg).unwrap();
        let b = frame_entropy(frame.view(), &cfg).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_max_value_lands_in_last_box() {
        // Two points at the extremes and two in the middle box of 3.
        let points = array![[0.0, 1.5, 1.5, 3.0]];
        let h = entropy(points.view(), 3).unwrap();
        let expected = -(0.25f64 * 0.25f64.ln() * 2.0 + 0.5 * 0.5f64.ln());
        assert_approx_eq!(h, expected, 1e-12);
    }

    #[test]
    fn test_entropy_rejects_degenerate_histograms() {
        let points = array![[1.0, 2.0]];
        assert!(entropy(points.view(), 0).is_err());
        let empty = Array2::<f64>::zeros((2, 0));
        assert!(matches!(
            entropy(empty.view(), 4),
            Err(AudioSampleError::EmptyData(_))
        ));
        let wide = Array2::<f64>::zeros((8, 2));
        assert!(entropy(wide.view(), 1 << 20).is_err());
    }
}
