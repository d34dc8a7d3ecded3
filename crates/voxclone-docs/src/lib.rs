#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod counter;
mod error;
mod pdf;
mod reader;

pub use counter::PageCounter;
pub use error::{DocumentError, DocumentResult};
pub use pdf::{PdfDocument, PdfPageScanner};
pub use reader::DocumentReader;
