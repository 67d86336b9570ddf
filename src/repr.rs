//! Core signal representation.
//!
//! A [`Signal`] is a mono sequence of floating point samples together with its sample
//! rate and a source identifier used for provenance bookkeeping. Signals are owned by
//! the caller and every detector only borrows them.

use ndarray::{Array1, ArrayView1};
use std::fmt;

use crate::{AudioSampleError, AudioSampleResult, ParameterError};

/// A fully loaded mono audio signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Array1<f64>,
    sample_rate: u32,
    source: String,
}

impl Signal {
    /// Creates a new signal from samples and a sample rate.
    ///
    /// The source identifier defaults to `"<memory>"`.
    ///
    /// # Errors
    /// Returns an error if the sample rate is zero or `samples` is empty.
    ///
    /// # Examples
    /// ```rust
    /// use audio_onsets::Signal;
    /// use ndarray::array;
    ///
    /// let signal = Signal::new(array![0.0, 0.5, -0.5, 0.25], 44100).unwrap();
    /// assert_eq!(signal.len(), 4);
    /// ```
    pub fn new(samples: Array1<f64>, sample_rate: u32) -> AudioSampleResult<Self> {
        Self::with_source(samples, sample_rate, "<memory>")
    }

    /// Creates a new signal with an explicit source identifier (file name, URI, ...).
    ///
    /// # Errors
    /// Returns an error if the sample rate is zero or `samples` is empty.
    pub fn with_source(
        samples: Array1<f64>,
        sample_rate: u32,
        source: impl Into<String>,
    ) -> AudioSampleResult<Self> {
        if sample_rate == 0 {
            return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                "sample_rate",
                "Sample rate must be greater than 0",
            )));
        }
        if samples.is_empty() {
            return Err(AudioSampleError::EmptyData(
                "Signal must contain at least one sample".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
            source: source.into(),
        })
    }

    /// Creates a signal from a plain vector of samples.
    ///
    /// # Errors
    /// Same conditions as [`Signal::new`].
    pub fn from_vec(samples: Vec<f64>, sample_rate: u32) -> AudioSampleResult<Self> {
        Self::new(Array1::from_vec(samples), sample_rate)
    }

    /// Sample rate in Hz.
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed signal; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrowed view of the samples.
    pub fn samples(&self) -> ArrayView1<'_, f64> {
        self.samples.view()
    }

    /// Samples as a contiguous slice, if the underlying storage permits.
    pub fn as_slice(&self) -> Option<&[f64]> {
        self.samples.as_slice()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Converts a sample index to seconds at this signal's rate.
    pub fn index_to_seconds(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate as f64
    }

    /// Copies the samples into a vector.
    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.to_vec()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signal(source={}, samples={}, sample_rate={} Hz, duration={:.3}s)",
            self.source,
            self.len(),
            self.sample_rate,
            self.duration_seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use ndarray::array;

    #[test]
    fn test_signal_construction() {
        let signal = Signal::with_source(array![0.1, 0.2, 0.3, 0.4], 4, "test.wav").unwrap();
        assert_eq!(signal.len(), 4);
        assert_eq!(signal.sample_rate(), 4);
        assert_eq!(signal.source(), "test.wav");
        assert_approx_eq!(signal.duration_seconds(), 1.0, 1e-12);
        assert_approx_eq!(signal.index_to_seconds(2), 0.5, 1e-12);
    }

    #[test]
    fn test_signal_rejects_invalid_input() {
        assert!(matches!(
            Signal::from_vec(vec![], 44100),
            Err(AudioSampleError::EmptyData(_))
        ));
        assert!(matches!(
            Signal::from_vec(vec![1.0], 0),
            Err(AudioSampleError::Parameter(_))
        ));
    }

    #[test]
    fn test_display() {
        let signal = Signal::from_vec(vec![0.0; 44100], 44100).unwrap();
        let text = signal.to_string();
        assert!(text.contains("<memory>"));
        assert!(text.contains("1.000s"));
    }
}
