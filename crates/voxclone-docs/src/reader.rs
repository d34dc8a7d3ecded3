//! Forgiving document reader.
//!
//! Unlike the voice pipeline, this reader never returns errors: a failed
//! open is logged and reported as `false`, and a reader with nothing open
//! reports zero pages.

use std::path::{Path, PathBuf};

use crate::counter::PageCounter;
use crate::pdf::PdfPageScanner;

/// Holds at most one open document at a time.
pub struct DocumentReader<C: PageCounter = PdfPageScanner> {
    path: PathBuf,
    counter: C,
    document: Option<C::Document>,
}

impl DocumentReader<PdfPageScanner> {
    /// Reader for a PDF at `path`. Nothing is read until [`open`](Self::open).
    pub fn pdf(path: impl Into<PathBuf>) -> Self {
        Self::with_counter(path, PdfPageScanner::new())
    }
}

impl<C: PageCounter> DocumentReader<C> {
    pub fn with_counter(path: impl Into<PathBuf>, counter: C) -> Self {
        Self {
            path: path.into(),
            counter,
            document: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn is_open(&self) -> bool {
        self.document.is_some()
    }

    /// Open the document, replacing any handle already held.
    pub fn open(&mut self) -> bool {
        self.close();

        match self.counter.open(&self.path) {
            Ok(document) => {
                self.document = Some(document);
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to open document");
                false
            }
        }
    }

    /// Page count of the open document, or 0 when nothing is open.
    pub fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map_or(0, |document| self.counter.page_count(document))
    }

    /// Release the open document. Does nothing if none is open.
    pub fn close(&mut self) {
        if let Some(document) = self.document.take() {
            self.counter.close(document);
            tracing::debug!(path = %self.path.display(), "Closed document");
        }
    }
}

impl<C: PageCounter> Drop for DocumentReader<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C: PageCounter> std::fmt::Debug for DocumentReader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentReader")
            .field("path", &self.path)
            .field("is_open", &self.is_open())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::{DocumentError, DocumentResult};

    /// Counter that hands out numbered documents and tracks closes.
    #[derive(Default)]
    struct MockCounter {
        fail: bool,
        opened: Cell<usize>,
        closed: Rc<Cell<usize>>,
    }

    impl PageCounter for MockCounter {
        type Document = usize;

        fn open(&self, path: &Path) -> DocumentResult<usize> {
            if self.fail {
                return Err(DocumentError::InvalidMagic {
                    path: path.to_path_buf(),
                });
            }
            self.opened.set(self.opened.get() + 1);
            Ok(self.opened.get() * 10)
        }

        fn page_count(&self, document: &usize) -> usize {
            *document
        }

        fn close(&self, _document: usize) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    #[test]
    fn open_then_count() {
        let mut reader = DocumentReader::with_counter("book.pdf", MockCounter::default());
        assert_eq!(reader.page_count(), 0);
        assert!(reader.open());
        assert!(reader.is_open());
        assert_eq!(reader.page_count(), 10);
    }

    #[test]
    fn failed_open_reports_false_and_zero_pages() {
        let counter = MockCounter {
            fail: true,
            ..MockCounter::default()
        };
        let mut reader = DocumentReader::with_counter("broken.pdf", counter);
        assert!(!reader.open());
        assert!(!reader.is_open());
        assert_eq!(reader.page_count(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let closed = Rc::new(Cell::new(0));
        let counter = MockCounter {
            closed: Rc::clone(&closed),
            ..MockCounter::default()
        };
        let mut reader = DocumentReader::with_counter("book.pdf", counter);

        reader.close();
        assert!(reader.open());
        reader.close();
        reader.close();
        assert_eq!(closed.get(), 1);
        assert_eq!(reader.page_count(), 0);
    }

    #[test]
    fn reopen_closes_previous_handle() {
        let closed = Rc::new(Cell::new(0));
        let counter = MockCounter {
            closed: Rc::clone(&closed),
            ..MockCounter::default()
        };
        let mut reader = DocumentReader::with_counter("book.pdf", counter);

        assert!(reader.open());
        assert!(reader.open());
        assert_eq!(closed.get(), 1);
        assert_eq!(reader.page_count(), 20);
    }

    #[test]
    fn drop_closes_open_handle() {
        let closed = Rc::new(Cell::new(0));
        let counter = MockCounter {
            closed: Rc::clone(&closed),
            ..MockCounter::default()
        };
        {
            let mut reader = DocumentReader::with_counter("book.pdf", counter);
            assert!(reader.open());
        }
        assert_eq!(closed.get(), 1);
    }
}
