//! Compute device selection.
//!
//! The device is an explicit configuration value injected at manager
//! construction. [`ComputeDevice::detect`] exists for front ends that want
//! an "auto" choice; the pipeline itself never probes hardware.

use std::fmt;
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where model inference runs and where waveforms live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// General-purpose processor (host memory).
    #[default]
    Cpu,

    /// NVIDIA accelerator with the given ordinal.
    Cuda(usize),
}

impl ComputeDevice {
    /// Whether data on this device is directly host-accessible.
    pub const fn is_host(self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Pick an accelerator if one is usable, otherwise the CPU.
    ///
    /// An accelerator only counts when this build can drive it (`cuda`
    /// feature) and NVIDIA hardware answers `nvidia-smi`.
    pub fn detect() -> Self {
        if cfg!(feature = "cuda") && nvidia_gpu_present() {
            tracing::debug!("NVIDIA GPU detected, selecting cuda:0");
            Self::Cuda(0)
        } else {
            Self::Cpu
        }
    }
}

fn nvidia_gpu_present() -> bool {
    Command::new("nvidia-smi")
        .arg("--list-gpus")
        .output()
        .map(|o| o.status.success() && !o.stdout.is_empty())
        .unwrap_or(false)
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

impl FromStr for ComputeDevice {
    type Err = String;

    /// Accepts `cpu`, `cuda`, and `cuda:N` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|n| n.parse().ok())
                .map(Self::Cuda)
                .ok_or_else(|| format!("unknown compute device '{s}' (expected cpu, cuda, cuda:N)")),
        }
    }
}
