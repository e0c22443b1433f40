//! Schema source port

use crate::features::schema_cache::domain::SchemaCategory;
use crate::features::schema_cache::error::SchemaFetchResult;

/// Where raw schema text comes from
pub trait SchemaSource: Send + Sync {
    /// Retrieve the schema text for one category (one outbound retrieval)
    fn retrieve(&self, category: SchemaCategory) -> SchemaFetchResult<String>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}
