//! CLI-specific error types and exit code mapping.

use thiserror::Error;
use voxclone_voice::VoiceError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or missing arguments.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model weights missing or unusable.
    #[error("{0}")]
    Model(VoiceError),

    /// Input or output file problem.
    #[error("{0}")]
    Io(String),

    /// Input audio or document is not in a usable format.
    #[error("{0}")]
    Data(String),

    /// Anything else from the pipeline.
    #[error("{0}")]
    Voice(VoiceError),

    /// Some batch items failed; the rest were written.
    #[error("{failed} of {total} batch items failed")]
    BatchIncomplete { failed: usize, total: usize },
}

impl CliError {
    /// Map error to a process exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Voice(_) | Self::BatchIncomplete { .. } => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Data(_) => 65,     // EX_DATAERR
            Self::Model(_) => 69,    // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Io { .. } => Self::Io(err.to_string()),
            VoiceError::AudioFormat { .. } => Self::Data(err.to_string()),
            VoiceError::InvalidConfig(_) | VoiceError::InvalidSampleRate(_) => {
                Self::Config(err.to_string())
            }
            e if e.is_model_load() => Self::Model(e),
            e => Self::Voice(e),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn voice_errors_map_to_exit_codes() {
        let model: CliError = VoiceError::ModelNotFound(PathBuf::from("m.onnx")).into();
        assert_eq!(model.exit_code(), 69);

        let io: CliError = VoiceError::io(
            "ref.wav",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .into();
        assert_eq!(io.exit_code(), 74);

        let config: CliError = VoiceError::InvalidSampleRate(0).into();
        assert_eq!(config.exit_code(), 78);

        let inference: CliError = VoiceError::Inference("nan".into()).into();
        assert_eq!(inference.exit_code(), 1);
    }

    #[test]
    fn batch_incomplete_message() {
        let err = CliError::BatchIncomplete {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 batch items failed");
        assert_eq!(err.exit_code(), 1);
    }
}
