//! Lazily loaded, cached inference engine.
//!
//! A [`ModelHandle`] owns the weights path, the device, the loader, and a
//! three-state slot:
//!
//! ```text
//!   Unloaded ──load ok──▶ Loaded
//!      │                    ▲
//!   load err             load ok (retry / explicit reload)
//!      ▼                    │
//!    Failed ────────────────┘
//! ```
//!
//! A `Loaded` handle is never reloaded implicitly. What happens to a
//! `Failed` handle on the next request is decided by [`LoadRetryPolicy`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::{BackendLoader, CloneBackend};
use crate::device::ComputeDevice;
use crate::error::VoiceError;

/// What a synthesis request does when the previous load attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadRetryPolicy {
    /// Try loading again on the next request.
    #[default]
    Retry,

    /// Keep returning the recorded failure until `load` is called explicitly.
    Sticky,
}

/// Public view of the model slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Unloaded,
    Loaded,
    Failed,
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

enum Slot {
    Unloaded,
    Loaded(Box<dyn CloneBackend>),
    Failed(VoiceError),
}

/// Exclusive owner of one inference engine.
pub struct ModelHandle {
    model_path: PathBuf,
    device: ComputeDevice,
    loader: Box<dyn BackendLoader>,
    policy: LoadRetryPolicy,
    slot: Slot,
    load_attempts: usize,
}

impl ModelHandle {
    /// Create an unloaded handle. Nothing touches the disk until the first
    /// [`load`](Self::load) or [`ensure_loaded`](Self::ensure_loaded).
    pub fn new(
        model_path: impl Into<PathBuf>,
        device: ComputeDevice,
        loader: Box<dyn BackendLoader>,
        policy: LoadRetryPolicy,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            device,
            loader,
            policy,
            slot: Slot::Unloaded,
            load_attempts: 0,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub const fn device(&self) -> ComputeDevice {
        self.device
    }

    pub const fn policy(&self) -> LoadRetryPolicy {
        self.policy
    }

    pub fn status(&self) -> ModelStatus {
        match self.slot {
            Slot::Unloaded => ModelStatus::Unloaded,
            Slot::Loaded(_) => ModelStatus::Loaded,
            Slot::Failed(_) => ModelStatus::Failed,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.slot, Slot::Loaded(_))
    }

    /// How many times the loader has been invoked.
    pub const fn load_attempts(&self) -> usize {
        self.load_attempts
    }

    /// The failure recorded by the last load attempt, if it failed.
    pub fn last_error(&self) -> Option<&VoiceError> {
        match &self.slot {
            Slot::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Load (or reload) the engine unconditionally.
    ///
    /// Any previously loaded engine is dropped first. Failures are logged
    /// here and returned; the slot records them as `Failed`.
    pub fn load(&mut self) -> Result<(), VoiceError> {
        self.slot = Slot::Unloaded;
        self.load_attempts += 1;

        match self.loader.load(&self.model_path, self.device) {
            Ok(engine) => {
                tracing::info!(
                    model = %self.model_path.display(),
                    device = %self.device,
                    engine = engine.name(),
                    "Voice cloning model loaded"
                );
                self.slot = Slot::Loaded(engine);
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    model = %self.model_path.display(),
                    device = %self.device,
                    error = %err,
                    "Failed to load voice cloning model"
                );
                self.slot = Slot::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Return the loaded engine, loading it first if needed.
    ///
    /// `Unloaded` always triggers a load. `Failed` triggers one under
    /// [`LoadRetryPolicy::Retry`] and returns the recorded error under
    /// [`LoadRetryPolicy::Sticky`].
    pub fn ensure_loaded(&mut self) -> Result<&mut dyn CloneBackend, VoiceError> {
        let needs_load = match &self.slot {
            Slot::Loaded(_) => false,
            Slot::Failed(err) if self.policy == LoadRetryPolicy::Sticky => {
                tracing::debug!(error = %err, "Model load previously failed, not retrying");
                return Err(err.clone());
            }
            Slot::Failed(_) | Slot::Unloaded => true,
        };
        if needs_load {
            self.load()?;
        }

        match &mut self.slot {
            Slot::Loaded(engine) => Ok(engine.as_mut()),
            Slot::Failed(err) => Err(err.clone()),
            Slot::Unloaded => Err(VoiceError::ModelLoad {
                path: self.model_path.clone(),
                reason: "model slot empty after load".into(),
            }),
        }
    }

    /// Drop the engine and return to `Unloaded`.
    pub fn unload(&mut self) {
        if self.is_loaded() {
            tracing::debug!(model = %self.model_path.display(), "Unloading voice cloning model");
        }
        self.slot = Slot::Unloaded;
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_path", &self.model_path)
            .field("device", &self.device)
            .field("policy", &self.policy)
            .field("status", &self.status())
            .field("load_attempts", &self.load_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::waveform::Waveform;

    struct Echo;

    impl CloneBackend for Echo {
        fn synthesize(&mut self, reference: &Waveform, _text: &str) -> Result<Waveform, VoiceError> {
            Ok(reference.clone())
        }
        fn sample_rate(&self) -> u32 {
            22_050
        }
        fn name(&self) -> &str {
            "echo"
        }
    }

    /// Loader that fails the first `failures` calls, then succeeds.
    fn flaky_loader(failures: usize, calls: Arc<AtomicUsize>) -> Box<dyn BackendLoader> {
        Box::new(
            move |path: &Path, _: ComputeDevice| -> Result<Box<dyn CloneBackend>, VoiceError> {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    Err(VoiceError::ModelLoad {
                        path: path.to_path_buf(),
                        reason: format!("attempt {n} failed"),
                    })
                } else {
                    Ok(Box::new(Echo))
                }
            },
        )
    }

    #[test]
    fn starts_unloaded_and_loads_lazily() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = ModelHandle::new(
            "m.onnx",
            ComputeDevice::Cpu,
            flaky_loader(0, Arc::clone(&calls)),
            LoadRetryPolicy::Retry,
        );
        assert_eq!(handle.status(), ModelStatus::Unloaded);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        handle.ensure_loaded().unwrap();
        handle.ensure_loaded().unwrap();
        assert_eq!(handle.status(), ModelStatus::Loaded);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_load_always_reloads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = ModelHandle::new(
            "m.onnx",
            ComputeDevice::Cpu,
            flaky_loader(0, Arc::clone(&calls)),
            LoadRetryPolicy::Retry,
        );
        handle.load().unwrap();
        handle.load().unwrap();
        assert_eq!(handle.load_attempts(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retry_policy_retries_after_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = ModelHandle::new(
            "m.onnx",
            ComputeDevice::Cpu,
            flaky_loader(1, Arc::clone(&calls)),
            LoadRetryPolicy::Retry,
        );

        let err = handle.ensure_loaded().err().unwrap();
        assert!(err.is_model_load());
        assert_eq!(handle.status(), ModelStatus::Failed);
        assert!(handle.last_error().is_some());

        handle.ensure_loaded().unwrap();
        assert_eq!(handle.status(), ModelStatus::Loaded);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn sticky_policy_keeps_failure_until_explicit_load() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = ModelHandle::new(
            "m.onnx",
            ComputeDevice::Cpu,
            flaky_loader(1, Arc::clone(&calls)),
            LoadRetryPolicy::Sticky,
        );

        assert!(handle.ensure_loaded().is_err());
        assert!(handle.ensure_loaded().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        handle.load().unwrap();
        assert!(handle.ensure_loaded().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unload_returns_to_unloaded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = ModelHandle::new(
            "m.onnx",
            ComputeDevice::Cuda(0),
            flaky_loader(0, calls),
            LoadRetryPolicy::Retry,
        );
        handle.load().unwrap();
        handle.unload();
        assert_eq!(handle.status(), ModelStatus::Unloaded);
        assert_eq!(handle.device(), ComputeDevice::Cuda(0));
    }
}
