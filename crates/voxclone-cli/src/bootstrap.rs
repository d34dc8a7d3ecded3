//! Composition root: turns global flags into a ready manager.
//!
//! Precedence, lowest first: built-in defaults, `--config` file, then
//! `--model` / `--device` flags (or their `VOXCLONE_*` env vars).

use std::fmt;
use std::str::FromStr;

use voxclone_voice::{ComputeDevice, VoiceCloneConfig, VoiceCloneManager};

use crate::error::CliError;
use crate::parser::Cli;

/// Device requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceChoice {
    /// Probe for an accelerator at startup.
    Auto,
    Fixed(ComputeDevice),
}

impl DeviceChoice {
    pub fn resolve(self) -> ComputeDevice {
        match self {
            Self::Auto => ComputeDevice::detect(),
            Self::Fixed(device) => device,
        }
    }
}

impl FromStr for DeviceChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Fixed)
        }
    }
}

impl fmt::Display for DeviceChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(device) => fmt::Display::fmt(device, f),
        }
    }
}

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<VoiceCloneConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => VoiceCloneConfig::from_json_file(path)?,
        None => VoiceCloneConfig::default(),
    };

    if let Some(model) = &cli.model {
        config.model_path.clone_from(model);
    }
    if let Some(choice) = cli.device {
        config.device = choice.resolve();
    }

    if config.model_path.as_os_str().is_empty() {
        return Err(CliError::Arguments(
            "no model given: pass --model, set VOXCLONE_MODEL, or set model_path in --config"
                .into(),
        ));
    }
    config.validate()?;

    tracing::debug!(
        model = %config.model_path.display(),
        device = %config.device,
        "Resolved voice clone configuration"
    );
    Ok(config)
}

/// Build a manager wired to the engine compiled into this binary.
pub fn build_manager(cli: &Cli) -> Result<VoiceCloneManager, CliError> {
    let config = resolve_config(cli)?;
    Ok(VoiceCloneManager::with_default_loader(config)?)
}
