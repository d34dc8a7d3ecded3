//! Device-tagged multi-channel sample buffers.

use std::time::Duration;

use crate::device::ComputeDevice;

/// Audio held as one `f32` plane per channel.
///
/// Samples are in \[-1.0, 1.0\]. Every plane has the same length. The
/// `device` tag records which memory space the buffer belongs to; engines
/// read it to decide where to run, and [`Waveform::to_host`] produces the
/// host copy that file writers need.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    device: ComputeDevice,
}

impl Waveform {
    /// Build a host-resident waveform from per-channel planes.
    ///
    /// Planes shorter than the longest one are zero-padded so the
    /// equal-length invariant always holds.
    pub fn new(mut channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        for plane in &mut channels {
            plane.resize(frames, 0.0);
        }
        Self {
            channels,
            sample_rate,
            device: ComputeDevice::Cpu,
        }
    }

    /// Single-channel convenience constructor.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(vec![samples], sample_rate)
    }

    /// De-interleave `frames × channels` samples.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Self {
        let channel_count = channel_count.max(1);
        let mut channels = vec![Vec::with_capacity(samples.len() / channel_count); channel_count];
        for (idx, sample) in samples.iter().enumerate() {
            channels[idx % channel_count].push(*sample);
        }
        Self::new(channels, sample_rate)
    }

    /// Re-tag the buffer as living on `device`.
    #[must_use]
    pub fn to_device(mut self, device: ComputeDevice) -> Self {
        self.device = device;
        self
    }

    /// Host-accessible copy of the samples.
    #[must_use]
    pub fn to_host(&self) -> Self {
        Self {
            channels: self.channels.clone(),
            sample_rate: self.sample_rate,
            device: ComputeDevice::Cpu,
        }
    }

    pub const fn device(&self) -> ComputeDevice {
        self.device
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Interleave planes into `frames × channels` order.
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channel_count());
        for idx in 0..frames {
            for plane in &self.channels {
                out.push(plane[idx]);
            }
        }
        out
    }

    /// Playback duration at the buffer's own sample rate.
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    /// Consume the buffer, returning its planes.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}
