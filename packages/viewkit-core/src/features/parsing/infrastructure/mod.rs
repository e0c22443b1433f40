//! XML infrastructure (quick-xml backed)

pub mod xml_reader;
pub mod xml_writer;

pub use xml_reader::{parse_document, parse_fragment};
pub use xml_writer::{write_document, write_fragment};
