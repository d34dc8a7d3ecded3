//! PDF page counting backed by `lopdf`.
//!
//! The page count is the number of leaves in the document's page tree, as
//! resolved through the cross-reference table. Incremental updates and
//! objects packed into object streams are handled by the parser.

use std::path::{Path, PathBuf};

use lopdf::Document;

use crate::counter::PageCounter;
use crate::error::{DocumentError, DocumentResult};

/// PDF header: "%PDF-" followed by the version.
const PDF_MAGIC: &[u8; 5] = b"%PDF-";

/// An opened PDF with its page count already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    path: PathBuf,
    version: String,
    pages: usize,
}

impl PdfDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header version, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub const fn pages(&self) -> usize {
        self.pages
    }
}

/// Page counter for PDF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageScanner;

impl PdfPageScanner {
    pub const fn new() -> Self {
        Self
    }
}

impl PageCounter for PdfPageScanner {
    type Document = PdfDocument;

    fn open(&self, path: &Path) -> DocumentResult<PdfDocument> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !bytes.starts_with(PDF_MAGIC) {
            return Err(DocumentError::InvalidMagic {
                path: path.to_path_buf(),
            });
        }

        let document = Document::load_mem(&bytes).map_err(|e| DocumentError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if let Err(e) = document.catalog() {
            return Err(DocumentError::Malformed {
                path: path.to_path_buf(),
                reason: format!("no document catalog: {e}"),
            });
        }
        let pages = document.get_pages().len();

        tracing::debug!(
            path = %path.display(),
            version = %document.version,
            pages,
            "Opened PDF document"
        );

        Ok(PdfDocument {
            path: path.to_path_buf(),
            version: document.version,
            pages,
        })
    }

    fn page_count(&self, document: &PdfDocument) -> usize {
        document.pages
    }
}
