//! Utility functions for onset detection.
//!
//! # Modules
//!
//! - [`audio_math`] - Time, sample, and frame unit conversions
//! - [`generation`] - Synthetic signal generation for tests, demos, and benchmarks

pub mod audio_math;
pub mod generation;

pub use audio_math::*;
pub use generation::*;
