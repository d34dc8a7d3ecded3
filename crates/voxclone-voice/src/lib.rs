#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod audio_io;
pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod manager;
pub mod model;
pub mod paths;
pub mod preprocess;
pub mod request;
pub mod resample;
pub mod waveform;
pub mod worker;
pub mod writer;

// Re-export key types for convenience
pub use backend::{BackendLoader, CloneBackend, default_loader};
pub use config::VoiceCloneConfig;
pub use device::ComputeDevice;
pub use error::VoiceError;
pub use manager::VoiceCloneManager;
pub use model::{LoadRetryPolicy, ModelHandle, ModelStatus};
pub use preprocess::{AudioPreprocessor, MODEL_SAMPLE_RATE};
pub use request::{BatchItem, BatchReport, SynthesisRequest, SynthesisResult};
pub use waveform::Waveform;
pub use worker::CloneWorker;
pub use writer::{OutputWriter, SampleEncoding};
