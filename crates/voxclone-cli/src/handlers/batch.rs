//! `voxclone batch`

use std::path::Path;

use voxclone_voice::{BatchReport, VoiceCloneManager};

use crate::error::CliError;

/// Texts from a file: one per line, blank lines skipped.
pub fn read_texts_file(path: &Path) -> Result<Vec<String>, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Cannot read {}: {e}", path.display())))?;
    Ok(parse_texts(&raw))
}

fn parse_texts(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn execute(
    manager: &mut VoiceCloneManager,
    reference: &Path,
    texts: &[String],
    output_dir: &Path,
) -> Result<(), CliError> {
    let report = manager.batch_clone_voice(reference, texts, output_dir)?;
    print_report(&report);

    let failed = report.len() - report.success_count();
    if failed > 0 {
        return Err(CliError::BatchIncomplete {
            failed,
            total: report.len(),
        });
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    for item in &report.items {
        match &item.result {
            Ok(_) => println!("ok    {:>3}  {}", item.index, item.output_path.display()),
            Err(e) => println!("FAIL  {:>3}  {e}", item.index),
        }
    }
    println!(
        "{}/{} written to {}",
        report.success_count(),
        report.len(),
        report.output_dir.display()
    );
}
