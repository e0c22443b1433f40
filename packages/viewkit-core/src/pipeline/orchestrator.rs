//! Lint orchestrator
//!
//! Per-file pipeline: read → parse → ampersand check → classify →
//! conventions → schema validation. Files run concurrently on a bounded
//! rayon pool; a failure in one file never stops the others.

use super::error::PipelineResult;
use super::result::{FileReport, LintReport};
use crate::config::ToolkitConfig;
use crate::features::classification::classify;
use crate::features::conventions::{check_ampersands, lint};
use crate::features::parsing::parse_document;
use crate::features::schema_cache::{
    DirectorySchemaSource, HttpSchemaSource, SchemaCache, SchemaSource,
};
use crate::features::schema_validation::SchemaValidatorAdapter;
use crate::shared::models::{FindingKind, LintFinding, SourceLine};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Which checks run after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintMode {
    /// Classification, conventions and schema validation
    Views,
    /// Parse and ampersand check only
    Basic,
}

pub struct LintOrchestrator {
    mode: LintMode,
    validator: Option<Arc<SchemaValidatorAdapter>>,
    pool: ThreadPool,
}

impl LintOrchestrator {
    /// `validator` is `None` when schema validation is skipped
    pub fn new(
        mode: LintMode,
        parallelism: usize,
        validator: Option<Arc<SchemaValidatorAdapter>>,
    ) -> PipelineResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism.max(1))
            .thread_name(|i| format!("viewkit-lint-{}", i))
            .build()?;
        Ok(Self {
            mode,
            validator,
            pool,
        })
    }

    /// Wire the schema source, cache and adapter described by `config`
    pub fn from_config(config: &ToolkitConfig, mode: LintMode) -> PipelineResult<Self> {
        let validator = if mode == LintMode::Views && !config.lint.skip_schema {
            let source: Arc<dyn SchemaSource> = match &config.schema.local_dir {
                Some(dir) => Arc::new(DirectorySchemaSource::new(dir.clone())),
                None => Arc::new(HttpSchemaSource::new(
                    config.schema.base_url.clone(),
                    config.schema.timeout(),
                )?),
            };
            debug!("schema source: {}", source.describe());
            let cache = Arc::new(SchemaCache::new(source));
            Some(Arc::new(SchemaValidatorAdapter::new(cache)))
        } else {
            None
        };
        Self::new(mode, config.lint.parallelism, validator)
    }

    pub fn mode(&self) -> LintMode {
        self.mode
    }

    pub fn validator(&self) -> Option<&SchemaValidatorAdapter> {
        self.validator.as_deref()
    }

    /// Lint every file; the report is sorted by path
    pub fn lint_paths(&self, files: &[PathBuf]) -> LintReport {
        let start = Instant::now();
        let reports: Vec<FileReport> = self
            .pool
            .install(|| files.par_iter().map(|path| self.lint_file(path)).collect());
        let report = LintReport::new(reports);
        info!(
            files = report.files_checked(),
            findings = report.total_findings(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "lint run finished"
        );
        report
    }

    pub fn lint_file(&self, path: &Path) -> FileReport {
        match std::fs::read_to_string(path) {
            Ok(text) => self.lint_source(path, &text),
            Err(e) => FileReport::new(
                path,
                vec![LintFinding::new(
                    FindingKind::IoError,
                    SourceLine::Unknown,
                    format!("Could not read file: {}", e),
                )],
            ),
        }
    }

    /// Lint raw document text reported under `name`
    pub fn lint_source(&self, name: &Path, text: &str) -> FileReport {
        let start = Instant::now();
        let findings = self.findings_for(text);
        debug!(
            path = %name.display(),
            findings = findings.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "file linted"
        );
        FileReport::new(name, findings)
    }

    fn findings_for(&self, text: &str) -> Vec<LintFinding> {
        let document = match parse_document(text) {
            Ok(document) => document,
            Err(e) => {
                return vec![LintFinding::new(FindingKind::ParseError, e.line(), e.to_string())]
            }
        };

        let mut findings = check_ampersands(&document);
        if self.mode == LintMode::Basic {
            return findings;
        }

        let Some(view_type) = classify(&document) else {
            return findings;
        };
        findings.extend(lint(&document, view_type));
        if let Some(validator) = &self.validator {
            findings.extend(validator.validate(&document, view_type));
        }
        findings
    }
}
