//! Dedicated clone thread: serialises access to one manager.
//!
//! Inference engines want exclusive access while they run, and loading one
//! is expensive. Rather than wrapping the manager in a mutex, it is confined
//! to a single OS thread and every request travels there over a channel.
//! [`CloneWorker`] is the `Send + Sync` proxy callers hold.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::error::VoiceError;
use crate::manager::VoiceCloneManager;
use crate::model::ModelStatus;
use crate::request::{BatchReport, SynthesisRequest, SynthesisResult};

// ── Commands ───────────────────────────────────────────────────────

enum CloneCommand {
    LoadModel {
        reply: mpsc::Sender<Result<(), VoiceError>>,
    },

    Clone {
        request: SynthesisRequest,
        reply: mpsc::Sender<Result<SynthesisResult, VoiceError>>,
    },

    Batch {
        reference: PathBuf,
        texts: Vec<String>,
        output_dir: PathBuf,
        reply: mpsc::Sender<Result<BatchReport, VoiceError>>,
    },

    Status {
        reply: mpsc::Sender<ModelStatus>,
    },

    Shutdown,
}

// ── Handle ─────────────────────────────────────────────────────────

/// Handle to a thread that owns a [`VoiceCloneManager`].
///
/// Requests block the caller until the worker replies and are served one at
/// a time in arrival order. Dropping the handle stops the thread after the
/// request in flight, if any, completes.
pub struct CloneWorker {
    cmd_tx: mpsc::Sender<CloneCommand>,
    thread: Option<thread::JoinHandle<()>>,
}

impl CloneWorker {
    /// Move `manager` onto a new thread.
    pub fn spawn(manager: VoiceCloneManager) -> Result<Self, VoiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<CloneCommand>();

        let thread = thread::Builder::new()
            .name("voxclone-worker".into())
            .spawn(move || Self::run(manager, &cmd_rx))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to spawn clone worker thread");
                VoiceError::WorkerDied
            })?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }

    /// Load (or reload) the model on the worker.
    pub fn load_model(&self) -> Result<(), VoiceError> {
        self.send_and_recv(|reply| CloneCommand::LoadModel { reply })
    }

    pub fn clone_voice(&self, request: SynthesisRequest) -> Result<SynthesisResult, VoiceError> {
        self.send_and_recv(|reply| CloneCommand::Clone { request, reply })
    }

    pub fn batch_clone_voice(
        &self,
        reference: impl Into<PathBuf>,
        texts: Vec<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<BatchReport, VoiceError> {
        let reference = reference.into();
        let output_dir = output_dir.into();
        self.send_and_recv(|reply| CloneCommand::Batch {
            reference,
            texts,
            output_dir,
            reply,
        })
    }

    /// Current model state, or `WorkerDied` if the thread is gone.
    pub fn model_status(&self) -> Result<ModelStatus, VoiceError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(CloneCommand::Status { reply: tx })
            .map_err(|_| VoiceError::WorkerDied)?;
        rx.recv().map_err(|_| VoiceError::WorkerDied)
    }

    fn send_and_recv<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<Result<T, VoiceError>>) -> CloneCommand,
    ) -> Result<T, VoiceError> {
        let (tx, rx) = mpsc::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| VoiceError::WorkerDied)?;
        rx.recv().map_err(|_| VoiceError::WorkerDied)?
    }

    // ── Worker loop ────────────────────────────────────────────────

    fn run(mut manager: VoiceCloneManager, cmd_rx: &mpsc::Receiver<CloneCommand>) {
        tracing::debug!(device = %manager.device(), "Clone worker started");

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                CloneCommand::LoadModel { reply } => {
                    let _ = reply.send(manager.load_model());
                }

                CloneCommand::Clone { request, reply } => {
                    let _ = reply.send(manager.clone_request(&request));
                }

                CloneCommand::Batch {
                    reference,
                    texts,
                    output_dir,
                    reply,
                } => {
                    let _ = reply.send(manager.batch_clone_voice(&reference, texts.as_slice(), &output_dir));
                }

                CloneCommand::Status { reply } => {
                    let _ = reply.send(manager.model_status());
                }

                CloneCommand::Shutdown => break,
            }
        }

        // The engine is dropped here, on the worker thread.
        tracing::debug!("Clone worker shutting down");
    }
}

impl Drop for CloneWorker {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(CloneCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::backend::{BackendLoader, CloneBackend};
    use crate::config::VoiceCloneConfig;
    use crate::device::ComputeDevice;
    use crate::waveform::Waveform;

    struct Silence;

    impl CloneBackend for Silence {
        fn synthesize(&mut self, _reference: &Waveform, text: &str) -> Result<Waveform, VoiceError> {
            Ok(Waveform::mono(vec![0.0; text.len() * 10], 22_050))
        }
        fn sample_rate(&self) -> u32 {
            22_050
        }
        fn name(&self) -> &str {
            "silence"
        }
    }

    fn silence_loader() -> Box<dyn BackendLoader> {
        Box::new(
            |_: &Path, _: ComputeDevice| -> Result<Box<dyn CloneBackend>, VoiceError> {
                Ok(Box::new(Silence))
            },
        )
    }

    fn write_reference(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut w = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..512 {
            w.write_sample(0_i16).unwrap();
        }
        w.finalize().unwrap();
    }

    fn worker() -> CloneWorker {
        let manager =
            VoiceCloneManager::new(VoiceCloneConfig::new("m.onnx"), silence_loader()).unwrap();
        CloneWorker::spawn(manager).unwrap()
    }

    #[test]
    fn load_then_status() {
        let worker = worker();
        assert_eq!(worker.model_status().unwrap(), ModelStatus::Unloaded);
        worker.load_model().unwrap();
        assert_eq!(worker.model_status().unwrap(), ModelStatus::Loaded);
    }

    #[test]
    fn serves_requests_from_several_threads() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        write_reference(&reference);

        let worker = Arc::new(worker());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let worker = Arc::clone(&worker);
                let reference = reference.clone();
                thread::spawn(move || {
                    worker
                        .clone_voice(SynthesisRequest::new(reference, "x".repeat(i + 1)))
                        .unwrap()
                        .waveform
                        .frames()
                })
            })
            .collect();

        let mut frames: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        frames.sort_unstable();
        assert_eq!(frames, vec![10, 20, 30, 40]);
    }

    #[test]
    fn batch_runs_on_worker() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        write_reference(&reference);

        let worker = worker();
        let report = worker
            .batch_clone_voice(
                &reference,
                vec!["a".into(), "bb".into()],
                dir.path().join("out"),
            )
            .unwrap();
        assert!(report.all_succeeded());
        assert!(dir.path().join("out/cloned_1.wav").exists());
    }
}
