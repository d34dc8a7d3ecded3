//! Voice cloning error types.

use std::path::{Path, PathBuf};

/// Errors that can occur in the voice cloning pipeline.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// File could not be read, written, or created.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File was readable but is not valid audio.
    #[error("Invalid audio in {}: {reason}", path.display())]
    AudioFormat { path: PathBuf, reason: String },

    /// Model weights not found at the configured path.
    #[error("Voice model not found at {0}")]
    ModelNotFound(PathBuf),

    /// Inference engine failed to initialise from the model artifact.
    #[error("Failed to load voice model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// Failure reported by the inference engine during synthesis.
    #[error("Voice synthesis failed: {0}")]
    Inference(String),

    /// Audio resampling error.
    #[error("Audio resampling failed: {0}")]
    Resample(String),

    /// Requested sample rate is not usable.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Configuration could not be parsed or is inconsistent.
    #[error("Invalid voice clone configuration: {0}")]
    InvalidConfig(String),

    /// Clone worker thread is no longer running.
    #[error("Voice clone worker thread died")]
    WorkerDied,
}

impl VoiceError {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map a `hound` error for `path` into the right variant.
    ///
    /// Underlying IO failures stay [`VoiceError::Io`]; everything else means
    /// the bytes were there but were not audio we understand.
    pub(crate) fn from_wav(path: &Path, err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(source) => Self::io(path, source),
            other => Self::AudioFormat {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }

    /// Whether this error means the model could not be brought up.
    pub const fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelNotFound(_) | Self::ModelLoad { .. })
    }

    /// Whether this error came from the filesystem or an audio file.
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::AudioFormat { .. })
    }
}

impl Clone for VoiceError {
    /// `std::io::Error` is not `Clone`; the copy keeps its kind and message.
    fn clone(&self) -> Self {
        match self {
            Self::Io { path, source } => Self::Io {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::AudioFormat { path, reason } => Self::AudioFormat {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ModelNotFound(path) => Self::ModelNotFound(path.clone()),
            Self::ModelLoad { path, reason } => Self::ModelLoad {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::Inference(msg) => Self::Inference(msg.clone()),
            Self::Resample(msg) => Self::Resample(msg.clone()),
            Self::InvalidSampleRate(rate) => Self::InvalidSampleRate(*rate),
            Self::InvalidConfig(msg) => Self::InvalidConfig(msg.clone()),
            Self::WorkerDied => Self::WorkerDied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_load_classification() {
        assert!(VoiceError::ModelNotFound(PathBuf::from("m.onnx")).is_model_load());
        assert!(
            VoiceError::ModelLoad {
                path: PathBuf::from("m.onnx"),
                reason: "bad header".into(),
            }
            .is_model_load()
        );
        assert!(!VoiceError::Inference("boom".into()).is_model_load());
    }

    #[test]
    fn clone_keeps_io_kind_and_message() {
        let err = VoiceError::io(
            "/nope/ref.wav",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let copy = err.clone();
        assert!(copy.is_io());
        assert_eq!(err.to_string(), copy.to_string());
        if let VoiceError::Io { source, .. } = copy {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
    }
}
