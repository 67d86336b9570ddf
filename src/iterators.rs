//! Segmentation of a signal into fixed-length, hop-spaced frames.
//!
//! A [`Segmentation`] describes how a [`Signal`] is cut into frames and hands out
//! borrowed [`Frame`]s with explicit `[start, end)` sample bounds. Frames never extend
//! past the end of the signal; a trailing remainder shorter than one frame is dropped.
//!
//! ```text
//! signal:  |--------------------------------------|
//! frame 0: |-------|
//! frame 1:     |-------|
//! frame 2:         |-------|
//!          <hop>
//!          <-len-->
//! ```

use ndarray::{ArrayView1, s};

use crate::utils::audio_math::ms_to_samples;
use crate::{AudioSampleError, AudioSampleResult, ParameterError, Signal};

/// One contiguous sub-range of a signal.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// Position of the frame within its segmentation.
    pub index: usize,
    /// First sample index (inclusive).
    pub start: usize,
    /// One past the last sample index (exclusive).
    pub end: usize,
    samples: ArrayView1<'a, f64>,
}

impl<'a> Frame<'a> {
    /// The frame's samples.
    pub fn samples(&self) -> ArrayView1<'a, f64> {
        self.samples
    }

    /// `(start, end)` bounds of the frame.
    pub const fn limits(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Midpoint of the bounds, rounded down.
    pub const fn center(&self) -> usize {
        (self.start + self.end) / 2
    }

    /// Number of samples in the frame.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length frame, which a [`Segmentation`] never produces.
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Splits a signal into frames of `frame_len` samples spaced `hop` samples apart.
#[derive(Debug, Clone, Copy)]
pub struct Segmentation<'a> {
    signal: &'a Signal,
    frame_len: usize,
    hop: usize,
    n_frames: usize,
}

impl<'a> Segmentation<'a> {
    /// Creates a segmentation with lengths given in samples.
    ///
    /// # Errors
    /// Returns [`ParameterError`] if `frame_len` or `hop` is zero, or if `frame_len`
    /// exceeds the signal length.
    pub fn new(signal: &'a Signal, frame_len: usize, hop: usize) -> AudioSampleResult<Self> {
        if frame_len == 0 {
            return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                "frame_len",
                "Frame length must be at least one sample",
            )));
        }
        if hop == 0 {
            return Err(AudioSampleError::Parameter(ParameterError::invalid_value(
                "hop",
                "Hop size must be at least one sample",
            )));
        }
        if frame_len > signal.len() {
            return Err(AudioSampleError::Parameter(ParameterError::out_of_range(
                "frame_len",
                frame_len,
                1,
                signal.len(),
            )));
        }

        let n_frames = (signal.len() - frame_len) / hop + 1;
        Ok(Self {
            signal,
            frame_len,
            hop,
            n_frames,
        })
    }

    /// Creates a segmentation with window length and hop given in milliseconds.
    ///
    /// Millisecond values are converted to samples at the signal's rate, rounding down.
    ///
    /// # Errors
    /// Returns [`ParameterError`] if either duration is non-positive, converts to zero
    /// samples, or the window is longer than the signal.
    ///
    /// # Examples
    /// ```rust
    /// use audio_onsets::{Signal, iterators::Segmentation};
    ///
    /// let signal = Signal::from_vec(vec![0.0; 1000], 1000).unwrap();
    /// let seg = Segmentation::by_ms(&signal, 16.0, 8.0).unwrap();
    /// assert_eq!(seg.frame_len(), 16);
    /// assert_eq!(seg.len(), (1000 - 16) / 8 + 1);
    /// ```
    pub fn by_ms(signal: &'a Signal, window_ms: f64, hop_ms: f64) -> AudioSampleResult<Self> {
        let frame_len = ms_to_samples(window_ms, signal.sample_rate()).ok_or_else(|| {
            ParameterError::invalid_value(
                "window_ms",
                format!("Window length {window_ms} ms must cover at least one sample"),
            )
        })?;
        let hop = ms_to_samples(hop_ms, signal.sample_rate()).ok_or_else(|| {
            ParameterError::invalid_value(
                "hop_ms",
                format!("Hop size {hop_ms} ms must cover at least one sample"),
            )
        })?;
        Self::new(signal, frame_len, hop)
    }

    /// Number of frames.
    pub const fn len(&self) -> usize {
        self.n_frames
    }

    /// Always false; a valid segmentation holds at least one frame.
    pub const fn is_empty(&self) -> bool {
        self.n_frames == 0
    }

    /// Frame length in samples.
    pub const fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Hop size in samples.
    pub const fn hop(&self) -> usize {
        self.hop
    }

    /// The segmented signal.
    pub const fn signal(&self) -> &'a Signal {
        self.signal
    }

    /// Returns frame `index`, or `None` if out of range.
    pub fn frame(&self, index: usize) -> Option<Frame<'a>> {
        if index >= self.n_frames {
            return None;
        }
        let (start, end) = self.bounds(index);
        let samples = self.signal.samples().slice_move(s![start..end]);
        Some(Frame {
            index,
            start,
            end,
            samples,
        })
    }

    /// Iterates over all frames in order.
    pub fn frames(&self) -> FrameIterator<'a> {
        FrameIterator {
            segmentation: *self,
            next: 0,
        }
    }

    /// `(start, end)` bounds of every frame.
    pub fn limits(&self) -> Vec<(usize, usize)> {
        (0..self.n_frames).map(|i| self.bounds(i)).collect()
    }

    /// `(start, end)` bounds of the given frames, in the order given.
    ///
    /// # Errors
    /// Returns [`ParameterError`] if any index is out of range.
    pub fn limits_of(&self, indices: &[usize]) -> AudioSampleResult<Vec<(usize, usize)>> {
        indices
            .iter()
            .map(|&i| {
                if i < self.n_frames {
                    Ok(self.bounds(i))
                } else {
                    Err(AudioSampleError::Parameter(ParameterError::out_of_range(
                        "frame_index",
                        i,
                        0,
                        self.n_frames.saturating_sub(1),
                    )))
                }
            })
            .collect()
    }

    const fn bounds(&self, index: usize) -> (usize, usize) {
        let start = index * self.hop;
        (start, start + self.frame_len)
    }
}

/// Iterator over the frames of a [`Segmentation`].
#[derive(Debug, Clone)]
pub struct FrameIterator<'a> {
    segmentation: Segmentation<'a>,
    next: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.segmentation.frame(self.next)?;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segmentation.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, sample_rate: u32) -> Signal {
        Signal::from_vec((0..len).map(|i| i as f64).collect(), sample_rate).unwrap()
    }

    #[test]
    fn test_frame_count_and_bounds() {
        let signal = ramp(10, 10);
        let seg = Segmentation::new(&signal, 4, 3).unwrap();
        // starts 0, 3, 6; a frame at 9 would overrun.
        assert_eq!(seg.len(), 3);
        assert_eq!(seg.limits(), vec![(0, 4), (3, 7), (6, 10)]);

        let frames: Vec<_> = seg.frames().collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].samples().to_vec(), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(frames[1].center(), 5);
        assert_eq!(seg.frames().len(), 3);
    }

    #[test]
    fn test_limits_of_bulk_lookup() {
        let signal = ramp(100, 100);
        let seg = Segmentation::new(&signal, 10, 5).unwrap();
        assert_eq!(seg.limits_of(&[0, 2, 1]).unwrap(), vec![(0, 10), (10, 20), (5, 15)]);
        assert!(seg.limits_of(&[seg.len()]).is_err());
    }

    #[test]
    fn test_by_ms() {
        let signal = ramp(44100, 44100);
        let seg = Segmentation::by_ms(&signal, 16.0, 8.0).unwrap();
        assert_eq!(seg.frame_len(), 705);
        assert_eq!(seg.hop(), 352);
        assert_eq!(seg.len(), (44100 - 705) / 352 + 1);
    }

    #[test]
    fn test_invalid_segmentation() {
        let signal = ramp(10, 10);
        assert!(Segmentation::new(&signal, 0, 1).is_err());
        assert!(Segmentation::new(&signal, 4, 0).is_err());
        // Window longer than signal.
        assert!(matches!(
            Segmentation::new(&signal, 11, 1),
            Err(AudioSampleError::Parameter(ParameterError::OutOfRange { .. }))
        ));
        assert!(Segmentation::by_ms(&signal, 0.0, 1.0).is_err());
        assert!(Segmentation::by_ms(&signal, 100.0, -1.0).is_err());
    }

    #[test]
    fn test_whole_signal_single_frame() {
        let signal = ramp(8, 8);
        let seg = Segmentation::new(&signal, 8, 8).unwrap();
        assert_eq!(seg.len(), 1);
        assert_eq!(seg.frame(0).unwrap().limits(), (0, 8));
        assert!(seg.frame(1).is_none());
    }
}
