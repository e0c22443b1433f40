//! In-memory schema sources

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use viewkit_core::features::schema_cache::{
    SchemaCategory, SchemaFetchError, SchemaFetchResult, SchemaSource,
};

/// Serves fixed schema texts and counts retrievals per category
#[derive(Default)]
pub struct StaticSource {
    schemas: HashMap<SchemaCategory, String>,
    calls: HashMap<SchemaCategory, AtomicUsize>,
    delay: Duration,
}

impl StaticSource {
    pub fn new() -> Self {
        Self {
            calls: SchemaCategory::ALL
                .iter()
                .map(|c| (*c, AtomicUsize::new(0)))
                .collect(),
            ..Default::default()
        }
    }

    /// Source serving the common and list fixture grammars
    pub fn list_schemas() -> Self {
        Self::new()
            .with(SchemaCategory::Common, super::COMMON_RNG)
            .with(SchemaCategory::List, super::LIST_RNG)
    }

    pub fn with(mut self, category: SchemaCategory, text: &str) -> Self {
        self.schemas.insert(category, text.to_string());
        self
    }

    /// Slow every retrieval down, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, category: SchemaCategory) -> usize {
        self.calls[&category].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl SchemaSource for StaticSource {
    fn retrieve(&self, category: SchemaCategory) -> SchemaFetchResult<String> {
        self.calls[&category].fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.schemas.get(&category).cloned().ok_or_else(|| SchemaFetchError::Transport {
            category: category.key().to_string(),
            url: format!("memory://{}", category.file_name()),
            cause: "connection refused".to_string(),
        })
    }

    fn describe(&self) -> String {
        "static fixtures".to_string()
    }
}
