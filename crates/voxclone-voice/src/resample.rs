//! FFT-based sample-rate conversion for multi-channel waveforms.

use rubato::{FftFixedIn, Resampler as _};

use crate::error::VoiceError;
use crate::waveform::Waveform;

/// Input frames handed to the resampler per call.
const CHUNK_SIZE: usize = 1024;

/// Sub-chunks per chunk (quality/latency trade-off inside rubato).
const SUB_CHUNKS: usize = 2;

/// Number of output frames that `frames` input frames map to.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn resampled_len(frames: usize, from_rate: u32, to_rate: u32) -> usize {
    (frames as f64 * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}

/// Convert `waveform` to `to_rate`, preserving channel count and device.
///
/// Equal rates return the input unchanged. The resampler's group delay is
/// trimmed, so output frame `i` lines up with input time `i / to_rate`.
pub fn resample(waveform: &Waveform, to_rate: u32) -> Result<Waveform, VoiceError> {
    if to_rate == 0 {
        return Err(VoiceError::InvalidSampleRate(to_rate));
    }
    let from_rate = waveform.sample_rate();
    if from_rate == 0 {
        return Err(VoiceError::InvalidSampleRate(from_rate));
    }
    if from_rate == to_rate {
        return Ok(waveform.clone());
    }

    let device = waveform.device();
    let channel_count = waveform.channel_count().max(1);
    if waveform.is_empty() {
        return Ok(Waveform::new(vec![Vec::new(); channel_count], to_rate).to_device(device));
    }

    let planes = resample_planes(waveform.channels(), from_rate, to_rate)?;
    Ok(Waveform::new(planes, to_rate).to_device(device))
}

fn resample_planes(
    planes: &[Vec<f32>],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<Vec<f32>>, VoiceError> {
    let frames = planes[0].len();
    let channel_count = planes.len();
    let wanted = resampled_len(frames, from_rate, to_rate);

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        channel_count,
    )
    .map_err(|e| VoiceError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut output = vec![Vec::with_capacity(wanted + delay); channel_count];
    let mut scratch = vec![vec![0.0f32; CHUNK_SIZE]; channel_count];
    let mut pos = 0;

    // Keep feeding (zero-padded once input runs out) until the delayed
    // tail of the real signal has come out.
    while output[0].len() < wanted + delay {
        for (dst, src) in scratch.iter_mut().zip(planes) {
            dst.fill(0.0);
            if pos < frames {
                let end = (pos + CHUNK_SIZE).min(frames);
                dst[..end - pos].copy_from_slice(&src[pos..end]);
            }
        }
        pos += CHUNK_SIZE;

        let chunk = resampler
            .process(&scratch[..], None)
            .map_err(|e| VoiceError::Resample(e.to_string()))?;
        for (out, produced) in output.iter_mut().zip(chunk) {
            out.extend_from_slice(&produced);
        }
    }

    Ok(output
        .into_iter()
        .map(|plane| plane[delay..delay + wanted].to_vec())
        .collect())
}
