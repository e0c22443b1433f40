//! Pipeline result types

use crate::shared::models::LintFinding;
use serde::Serialize;
use std::path::PathBuf;

/// Findings of one linted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<LintFinding>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>, findings: Vec<LintFinding>) -> Self {
        Self {
            path: path.into(),
            findings,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Aggregate of a lint run, files sorted by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    files: Vec<FileReport>,
    files_checked: usize,
    files_with_findings: usize,
    total_findings: usize,
}

impl LintReport {
    pub fn new(mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let files_with_findings = files.iter().filter(|f| !f.is_clean()).count();
        let total_findings = files.iter().map(|f| f.findings.len()).sum();
        Self {
            files_checked: files.len(),
            files,
            files_with_findings,
            total_findings,
        }
    }

    pub fn files(&self) -> &[FileReport] {
        &self.files
    }

    /// Reports that carry at least one finding
    pub fn failing_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_clean())
    }

    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    pub fn files_with_findings(&self) -> usize {
        self.files_with_findings
    }

    pub fn total_findings(&self) -> usize {
        self.total_findings
    }

    /// True when no file produced a finding of any kind
    pub fn passed(&self) -> bool {
        self.total_findings == 0
    }
}
