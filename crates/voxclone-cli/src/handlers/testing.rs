//! Shared fixtures for handler tests: an in-process engine and a reference
//! clip, so handlers run end to end without model weights.

use std::path::{Path, PathBuf};

use voxclone_voice::{
    BackendLoader, CloneBackend, ComputeDevice, OutputWriter, VoiceCloneConfig,
    VoiceCloneManager, VoiceError, Waveform,
};

/// Echoes the reference back, or fails on the text "bad".
struct Echo;

impl CloneBackend for Echo {
    fn synthesize(&mut self, reference: &Waveform, text: &str) -> Result<Waveform, VoiceError> {
        if text == "bad" {
            return Err(VoiceError::Inference("engine rejected input".into()));
        }
        Ok(reference.clone())
    }

    fn sample_rate(&self) -> u32 {
        22_050
    }

    fn name(&self) -> &str {
        "echo"
    }
}

fn echo_loader() -> Box<dyn BackendLoader> {
    Box::new(
        |_: &Path, _: ComputeDevice| -> Result<Box<dyn CloneBackend>, VoiceError> {
            Ok(Box::new(Echo))
        },
    )
}

pub fn echo_manager() -> VoiceCloneManager {
    VoiceCloneManager::new(VoiceCloneConfig::new("echo.onnx"), echo_loader()).unwrap()
}

/// Write a short silent reference clip into `dir`.
pub fn reference_clip(dir: &Path) -> PathBuf {
    let path = dir.join("ref.wav");
    OutputWriter::new()
        .write(&Waveform::mono(vec![0.0; 2_205], 22_050), &path, 22_050)
        .unwrap();
    path
}
