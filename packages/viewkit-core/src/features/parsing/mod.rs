//! Parsing Feature
//!
//! Reads view data files into the shared [`Document`](crate::shared::Document)
//! tree and writes them back with stable formatting.
//!
//! ## Structure
//! - `error` - XmlError
//! - `infrastructure/` - quick-xml reader and writer

pub mod error;
pub mod infrastructure;

pub use error::{XmlError, XmlResult};
pub use infrastructure::{parse_document, parse_fragment, write_document, write_fragment};
