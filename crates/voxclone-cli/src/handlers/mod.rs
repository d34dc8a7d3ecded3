//! Command handlers.
//!
//! Each handler is a thin `execute` wrapper: validate CLI input, call the
//! library, format terminal output. Progress goes to the log; results go
//! to stdout.

pub mod batch;
pub mod clone;
pub mod pages;

#[cfg(test)]
mod testing;
