//! Infrastructure layer: data file I/O

mod data_file;

pub use data_file::{append_to_data_file, write_data_file};
