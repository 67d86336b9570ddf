//! Validated audio file paths.
//!
//! Decoding audio files is outside the scope of this crate, but detectors record where
//! a signal came from. [`AudioPath`] performs the path checks once at construction time
//! and is immutable afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{AudioSampleResult, PathError};

/// Extension required by [`AudioPath::wav`].
pub const WAV_EXTENSION: &str = "wav";

/// An absolute path to an existing file with a required extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioPath {
    path: PathBuf,
}

impl AudioPath {
    /// Validates `path` and requires the given extension (without the leading dot,
    /// compared case-sensitively).
    ///
    /// # Errors
    /// - [`PathError::NotFound`] if nothing exists at `path`
    /// - [`PathError::NotAFile`] if `path` is a directory or similar
    /// - [`PathError::WrongExtension`] if the extension does not match
    pub fn new(path: impl AsRef<Path>, extension: &str) -> AudioSampleResult<Self> {
        let path = path.as_ref();
        let resolved = match path.canonicalize() {
            Ok(resolved) => resolved,
            Err(_) => return Err(PathError::NotFound(path.to_path_buf()).into()),
        };

        if !resolved.is_file() {
            return Err(PathError::NotAFile(resolved).into());
        }

        let expected = extension.trim_start_matches('.');
        if resolved.extension().and_then(|ext| ext.to_str()) != Some(expected) {
            return Err(PathError::WrongExtension {
                path: resolved,
                expected: expected.to_string(),
            }
            .into());
        }

        Ok(Self { path: resolved })
    }

    /// Validates a `.wav` path.
    ///
    /// # Errors
    /// See [`AudioPath::new`].
    pub fn wav(path: impl AsRef<Path>) -> AudioSampleResult<Self> {
        Self::new(path, WAV_EXTENSION)
    }

    /// The absolute path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, used as a recording name by evaluation.
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }
}

impl AsRef<Path> for AudioPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for AudioPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioSampleError;
    use std::fs::File;

    #[test]
    fn test_valid_wav_path_is_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("drums.wav");
        File::create(&file).unwrap();

        let path = AudioPath::wav(&file).unwrap();
        assert!(path.as_path().is_absolute());
        assert_eq!(path.stem(), Some("drums"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AudioPath::wav(dir.path().join("missing.wav"));
        assert!(matches!(
            result,
            Err(AudioSampleError::Path(PathError::NotFound(_)))
        ));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AudioPath::wav(dir.path());
        assert!(matches!(
            result,
            Err(AudioSampleError::Path(PathError::NotAFile(_)))
        ));
    }

    #[test]
    fn test_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        File::create(&file).unwrap();

        match AudioPath::wav(&file) {
            Err(AudioSampleError::Path(PathError::WrongExtension { expected, .. })) => {
                assert_eq!(expected, "wav");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // Custom extensions with or without a leading dot.
        assert!(AudioPath::new(&file, ".txt").is_ok());
        assert!(AudioPath::new(&file, "txt").is_ok());
    }
}
