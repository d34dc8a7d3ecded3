//! `voxclone pages`

use std::path::Path;

use voxclone_docs::DocumentReader;

use crate::error::CliError;

pub fn execute(file: &Path) -> Result<(), CliError> {
    let mut reader = DocumentReader::pdf(file);
    if !reader.open() {
        return Err(CliError::Data(format!(
            "Cannot open {} as a PDF document",
            file.display()
        )));
    }
    println!("{}", reader.page_count());
    reader.close();
    Ok(())
}
