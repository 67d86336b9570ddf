// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)]
// Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![deny(missing_docs)] // Documentation is a must for release

//! # AudioOnsets
//!
//! Onset detection for mono audio signals. An *onset* is the instant a musical event
//! (a note, a drum hit) begins; this crate locates onsets as sample indices.
//!
//! ## Detectors
//!
//! Two families of detectors are provided:
//!
//! - **Entropy onsets**: the signal is cut into short frames, each frame is embedded in
//!   a phase space of delay vectors and the Shannon entropy of the embedding's
//!   histogram is computed. Peaks of the Hilbert envelope of the entropy curve mark
//!   onsets. See [`detect_entropy_onsets`].
//! - **Spectral flux onsets**: frame-to-frame increases in STFT magnitude form an onset
//!   detection function (ODF) that is optionally normalised and smoothed before an
//!   adaptive peak picker selects onsets. Two flux formulations are available through
//!   [`FluxStrategy`]. See [`detect_flux_onsets`].
//!
//! ## Example
//!
//! ```rust
//! use audio_onsets::{AudioOnsetDetection, FluxOnsetConfig, decaying_bursts};
//! use std::time::Duration;
//!
//! let (signal, _starts) =
//!     decaying_bursts(440.0, &[0.1, 0.6], 0.02, Duration::from_secs(1), 44100, 1.0)?;
//! let result = signal.flux_onsets(&FluxOnsetConfig::sum_magnitude().unprocessed())?;
//! assert_eq!(result.onsets.len(), 2);
//! # Ok::<(), audio_onsets::AudioSampleError>(())
//! ```
//!
//! ## Features
//!
//! - `parallel-processing`: per-frame entropy computation is distributed with `rayon`.
//! - `serialization`: `serde` derives on configuration types and result records.
//!
//! ## Logging
//!
//! Detectors emit `tracing` events at `debug` (configuration, result sizes) and
//! `trace` (intermediate array shapes) level. Install any `tracing` subscriber to see
//! them.

mod error;
pub mod io;
pub mod iterators;
pub mod operations;
mod repr;
pub mod utils;

use std::fmt::Debug;

use num_traits::{Float, FloatConst, NumCast};

pub use crate::error::{
    AudioSampleError, AudioSampleResult, ParameterError, PathError, SpectralError,
};
pub use crate::io::AudioPath;
pub use crate::iterators::{Frame, FrameIterator, Segmentation};
pub use crate::operations::{
    AudioOnsetDetection, AudioSpectralAnalysis, BoundaryMode, Embedding, EntropyOnsetConfig,
    EntropyOnsetResult, EvaluationScore, FluxOnsetConfig, FluxOnsetResult, FluxStrategy,
    OnsetEvaluator, PeakPickingConfig, PhaseSpaceConfig, SmoothingKernel, Spectrum, Stft,
    StftConfig, WindowType, WindowedMatchEvaluator, detect_entropy_onsets, detect_flux_onsets,
    evaluate_onsets,
};
pub use crate::repr::Signal;
pub use crate::utils::{
    audio_math::{frames_to_time, ms_to_samples, rfft_frequencies, samples_to_seconds},
    generation::{concatenate, decaying_bursts, impulse, silence, sine_wave, tone_bursts},
};

/// Marker trait for real floating-point types (f32, f64)
pub trait RealFloat: Float + FloatConst + NumCast + Debug + Send + Sync + 'static {}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Converts a numeric value into the floating-point precision `F`.
///
/// Abstracts over `f32`/`f64` in generic code without explicit `as` casts. A value
/// that `F` cannot represent converts to NaN.
///
/// # Examples
/// ```
/// use audio_onsets::to_precision;
///
/// let value_f32: f32 = to_precision(42usize);
/// assert_eq!(value_f32, 42.0);
///
/// let value_f64: f64 = to_precision(0.5f32);
/// assert_eq!(value_f64, 0.5);
/// ```
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat,
    T: NumCast,
{
    <F as NumCast>::from(value).unwrap_or_else(F::nan)
}
