//! Schema source implementations

mod directory_source;
mod http_source;

pub use directory_source::DirectorySchemaSource;
pub use http_source::HttpSchemaSource;
