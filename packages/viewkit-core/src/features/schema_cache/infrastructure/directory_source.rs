//! Local directory schema source (offline runs, vendored schemas)

use crate::features::schema_cache::domain::SchemaCategory;
use crate::features::schema_cache::error::{SchemaFetchError, SchemaFetchResult};
use crate::features::schema_cache::ports::SchemaSource;
use std::path::PathBuf;

/// Reads `<dir>/<file_name>` for each category
pub struct DirectorySchemaSource {
    dir: PathBuf,
}

impl DirectorySchemaSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn retrieve(&self, category: SchemaCategory) -> SchemaFetchResult<String> {
        let path = self.dir.join(category.file_name());
        std::fs::read_to_string(&path).map_err(|e| SchemaFetchError::Local {
            category: category.key().to_string(),
            path: path.display().to_string(),
            cause: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
