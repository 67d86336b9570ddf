//! Onset detection operations and the transforms they are built from.
//!
//! ## Module Organization
//!
//! - [`traits`] - Trait definitions implemented for [`Signal`](crate::Signal)
//! - [`types`] - Configuration types and enums
//! - [`phase_space`] - Delay embedding and histogram entropy
//! - [`transforms`] - STFT, single-shot spectrum and analytic signal
//! - [`peak_picking`] - Adaptive peak picking, local maxima, smoothing
//! - [`onset_detection`] - Entropy and spectral flux onset detectors
//! - [`evaluation`] - Scoring detected onsets against ground truth
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_onsets::operations::*;
//! use audio_onsets::tone_bursts;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (signal, _) =
//!     tone_bursts(440.0, &[(0.2, 0.2)], Duration::from_millis(600), 44100, 0.8)?;
//!
//! // Entropy onsets
//! let entropy = signal.entropy_onsets(&EntropyOnsetConfig::new())?;
//!
//! // Spectral flux onsets, both strategies
//! let flux_a = signal.flux_onsets(&FluxOnsetConfig::sum_magnitude())?;
//! let flux_b = signal.flux_onsets(&FluxOnsetConfig::std_normalized())?;
//!
//! // Spectral analysis
//! let stft = signal.stft(&StftConfig::onset_detection())?;
//! let centroid = stft.centroid();
//! # let _ = (entropy, flux_a, flux_b, centroid);
//! # Ok(())
//! # }
//! ```

// Public module declarations
pub mod traits;
pub mod types;

pub mod evaluation;
pub mod onset_detection;
pub mod peak_picking;
pub mod phase_space;
pub mod transforms;

// Re-export main traits for convenience
pub use traits::{AudioOnsetDetection, AudioSpectralAnalysis};

// Re-export supporting types
pub use types::{
    BoundaryMode, EntropyOnsetConfig, FluxOnsetConfig, FluxStrategy, PeakPickingConfig,
    PhaseSpaceConfig, SmoothingKernel, StftConfig, WindowType,
};

pub use evaluation::{EvaluationScore, OnsetEvaluator, WindowedMatchEvaluator, evaluate_onsets};
pub use onset_detection::{
    EntropyOnsetResult, FluxOnsetResult, detect_entropy_onsets, detect_flux_onsets,
};
pub use phase_space::Embedding;
pub use transforms::{Spectrum, Stft};
