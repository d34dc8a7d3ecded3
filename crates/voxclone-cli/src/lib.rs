#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

// Used by the binary only (logging setup, .env loading, error context)
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{DeviceChoice, resolve_config};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
