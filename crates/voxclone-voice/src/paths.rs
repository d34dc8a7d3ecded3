//! Output directory preparation.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::VoiceError;

/// Make sure `dir` exists as a directory, creating it and any parents.
///
/// An existing non-directory at `dir` is an error.
pub fn ensure_directory(dir: &Path) -> Result<(), VoiceError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        if !dir.is_dir() {
            return Err(VoiceError::io(
                dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|e| VoiceError::io(dir, e))?;
    tracing::debug!(dir = %dir.display(), "Created output directory");
    Ok(())
}

/// Make sure the directory that will hold `file` exists.
///
/// A bare file name (no parent component) refers to the working directory,
/// which needs nothing.
pub fn ensure_parent_dir(file: &Path) -> Result<(), VoiceError> {
    match file.parent() {
        Some(parent) => ensure_directory(parent),
        None => Ok(()),
    }
}
