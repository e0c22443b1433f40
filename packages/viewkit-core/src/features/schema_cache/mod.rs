//! Schema Cache/Fetcher Feature
//!
//! Retrieves RELAX NG schema text by category and memoizes it for the run.
//!
//! ## Structure
//! - `domain` - SchemaCategory key set and URL layout
//! - `ports` - SchemaSource trait
//! - `infrastructure/` - HTTP and local directory sources
//! - `cache` - SchemaCache (single-flight per key)

mod cache;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use cache::SchemaCache;
pub use domain::SchemaCategory;
pub use error::{SchemaFetchError, SchemaFetchResult};
pub use infrastructure::{DirectorySchemaSource, HttpSchemaSource};
pub use ports::SchemaSource;
