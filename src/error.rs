//! Error types and result utilities for onset detection.
//!
//! Errors are hierarchical: [`AudioSampleError`] is the single type returned by every
//! fallible operation in the crate, and wraps a more specific error describing the
//! failing concern (parameter validation, spectral arithmetic, file paths).
//!
//! Numeric degeneracies such as an all-zero spectral column are never reported as
//! errors. They are compensated locally by substituting a small epsilon.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience type alias for results that may contain an [`AudioSampleError`].
pub type AudioSampleResult<T> = Result<T, AudioSampleError>;

/// Top-level error type for all onset detection operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioSampleError {
    /// A configuration value or argument is outside its valid range.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Two spectral results could not be combined.
    #[error(transparent)]
    Spectral(#[from] SpectralError),

    /// A file path failed validation.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The operation received no data to work on.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Errors raised while validating parameters, before any numeric work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The parameter value is not acceptable.
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidValue {
        /// Name of the offending parameter.
        parameter: String,
        /// Human readable explanation, including the valid range.
        reason: String,
    },

    /// The parameter value lies outside a numeric range.
    #[error("Parameter '{parameter}' = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending parameter.
        parameter: String,
        /// The rejected value, formatted.
        value: String,
        /// Lower bound of the valid range, formatted.
        min: String,
        /// Upper bound of the valid range, formatted.
        max: String,
    },
}

impl ParameterError {
    /// Creates an [`ParameterError::InvalidValue`].
    pub fn invalid_value(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`ParameterError::OutOfRange`].
    pub fn out_of_range(
        parameter: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            parameter: parameter.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

/// Errors raised when combining spectral values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// Operands differ in sample rate or transform length.
    #[error(
        "Spectra not compatible: sample rates {left_rate} vs {right_rate}, transform lengths {left_len} vs {right_len}"
    )]
    Incompatible {
        /// Sample rate of the left operand.
        left_rate: u32,
        /// Sample rate of the right operand.
        right_rate: u32,
        /// Transform length of the left operand.
        left_len: usize,
        /// Transform length of the right operand.
        right_len: usize,
    },

    /// Operands agree on rate and length but their bin arrays differ in shape.
    #[error("Spectral shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Shape of the left operand.
        left: Vec<usize>,
        /// Shape of the right operand.
        right: Vec<usize>,
    },
}

/// Errors raised by [`crate::io::AudioPath`] validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Nothing exists at the path.
    #[error("`{0}` does not exist")]
    NotFound(PathBuf),

    /// The path exists but is a directory or another non-file entry.
    #[error("`{0}` is not a file")]
    NotAFile(PathBuf),

    /// The file has the wrong extension.
    #[error("`{path}` is not a .{expected} file")]
    WrongExtension {
        /// The offending path.
        path: PathBuf,
        /// Extension that was required.
        expected: String,
    },
}

/// Maps a config `validate()` message into a parameter error.
pub(crate) fn config_error(parameter: &str) -> impl FnOnce(String) -> AudioSampleError + '_ {
    move |reason| AudioSampleError::Parameter(ParameterError::invalid_value(parameter, reason))
}
