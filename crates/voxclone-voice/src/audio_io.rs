//! WAV decoding for reference audio.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::VoiceError;
use crate::waveform::Waveform;

/// Read a WAV file into a host-resident [`Waveform`] at its native rate.
///
/// Integer PCM of any bit depth is scaled into \[-1.0, 1.0\]; float PCM is
/// taken as-is. All channels are kept.
#[allow(clippy::cast_precision_loss)]
pub fn read_wav(path: &Path) -> Result<Waveform, VoiceError> {
    let reader = WavReader::open(path).map_err(|e| VoiceError::from_wav(path, e))?;
    let spec = reader.spec();
    let channel_count = usize::from(spec.channels);

    if channel_count == 0 || spec.sample_rate == 0 {
        return Err(VoiceError::AudioFormat {
            path: path.to_path_buf(),
            reason: format!(
                "unusable header: {} channels at {} Hz",
                spec.channels, spec.sample_rate
            ),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| VoiceError::from_wav(path, e))?,
        SampleFormat::Int => {
            let scale = (1_i64 << spec.bits_per_sample.saturating_sub(1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| VoiceError::from_wav(path, e))?
        }
    };

    tracing::debug!(
        path = %path.display(),
        channels = channel_count,
        sample_rate = spec.sample_rate,
        frames = interleaved.len() / channel_count,
        "Loaded reference audio"
    );

    Ok(Waveform::from_interleaved(
        &interleaved,
        channel_count,
        spec.sample_rate,
    ))
}
