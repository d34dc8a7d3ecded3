//! Page counting backends.

use std::path::Path;

use crate::error::DocumentResult;

/// A document format that can be opened and asked for its page count.
///
/// `Document` is whatever handle the backend needs to keep open between
/// `open` and `close`.
pub trait PageCounter {
    type Document;

    fn open(&self, path: &Path) -> DocumentResult<Self::Document>;

    fn page_count(&self, document: &Self::Document) -> usize;

    /// Release `document`. The default just drops it.
    fn close(&self, document: Self::Document) {
        drop(document);
    }
}
