//! `voxclone clone`

use std::path::Path;

use voxclone_voice::VoiceCloneManager;

use crate::error::CliError;

pub fn execute(
    manager: &mut VoiceCloneManager,
    reference: &Path,
    text: &str,
    output: Option<&Path>,
) -> Result<(), CliError> {
    if text.trim().is_empty() {
        return Err(CliError::Arguments("--text must not be empty".into()));
    }

    let result = manager.clone_voice(reference, text, output)?;
    let seconds = result.waveform.duration().as_secs_f64();

    match result.saved_to() {
        Some(path) => println!("{} ({seconds:.2}s)", path.display()),
        None => println!("synthesized {seconds:.2}s (not saved; pass --output to write a file)"),
    }
    Ok(())
}
