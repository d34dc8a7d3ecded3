//! Persisting synthesized waveforms as WAV files.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use crate::error::VoiceError;
use crate::waveform::Waveform;

/// Sample encoding of written WAV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    /// 32-bit IEEE float, samples written as produced.
    #[default]
    Float32,

    /// 16-bit signed PCM, samples clamped to \[-1.0, 1.0\].
    Pcm16,
}

impl SampleEncoding {
    const fn spec(self, channels: u16, sample_rate: u32) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            Self::Float32 => (32, SampleFormat::Float),
            Self::Pcm16 => (16, SampleFormat::Int),
        };
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Writes waveforms to disk as WAV.
///
/// The writer never creates directories: a missing parent is an
/// [`VoiceError::Io`]. Callers that want "always succeeds" semantics create
/// the directory first (see [`crate::paths::ensure_parent_dir`]).
///
/// Samples go to a hidden sibling file that is renamed over the destination
/// once complete, so a failed write never leaves a truncated WAV behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter {
    encoding: SampleEncoding,
}

impl OutputWriter {
    pub const fn new() -> Self {
        Self {
            encoding: SampleEncoding::Float32,
        }
    }

    pub const fn with_encoding(encoding: SampleEncoding) -> Self {
        Self { encoding }
    }

    pub const fn encoding(&self) -> SampleEncoding {
        self.encoding
    }

    /// Serialise `waveform` to `path`, stamping `sample_rate` in the header.
    ///
    /// The waveform is copied to host memory first if it lives elsewhere.
    pub fn write(&self, waveform: &Waveform, path: &Path, sample_rate: u32) -> Result<(), VoiceError> {
        if sample_rate == 0 {
            return Err(VoiceError::InvalidSampleRate(sample_rate));
        }

        let host;
        let waveform = if waveform.device().is_host() {
            waveform
        } else {
            host = waveform.to_host();
            &host
        };

        if waveform.sample_rate() != sample_rate {
            tracing::debug!(
                native = waveform.sample_rate(),
                header = sample_rate,
                "Waveform rate differs from output rate, writing header rate as-is"
            );
        }

        let channels = u16::try_from(waveform.channel_count().max(1)).map_err(|_| {
            VoiceError::AudioFormat {
                path: path.to_path_buf(),
                reason: format!("too many channels: {}", waveform.channel_count()),
            }
        })?;

        let spec = self.encoding.spec(channels, sample_rate);
        let encoding = self.encoding;
        write_replacing(path, spec, |writer| {
            for sample in waveform.interleaved() {
                match encoding {
                    SampleEncoding::Float32 => writer.write_sample(sample)?,
                    SampleEncoding::Pcm16 => writer.write_sample(quantize(sample))?,
                }
            }
            Ok(())
        })?;

        tracing::debug!(
            path = %path.display(),
            frames = waveform.frames(),
            channels,
            sample_rate,
            encoding = ?self.encoding,
            "Wrote WAV file"
        );
        Ok(())
    }
}

/// Hidden sibling of `path` that receives samples until the write completes.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.partial"))
}

/// Run `fill` against a WAV writer on a partial file, then rename it to
/// `path`. On any failure the partial file is removed and `path` is left
/// untouched.
fn write_replacing<F>(path: &Path, spec: WavSpec, fill: F) -> Result<(), VoiceError>
where
    F: FnOnce(&mut WavWriter<std::io::BufWriter<std::fs::File>>) -> Result<(), hound::Error>,
{
    let partial = partial_path(path);
    let mut writer = WavWriter::create(&partial, spec).map_err(|e| VoiceError::from_wav(path, e))?;

    let written = fill(&mut writer)
        .and_then(|()| writer.finalize())
        .map_err(|e| VoiceError::from_wav(path, e))
        .and_then(|()| std::fs::rename(&partial, path).map_err(|e| VoiceError::io(path, e)));

    if written.is_err() {
        if let Err(e) = std::fs::remove_file(&partial) {
            tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial WAV file");
        }
    }
    written
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}
