//! Lint findings
//!
//! Findings are immutable output values. Severity is implied by the kind.

use serde::{Serialize, Serializer};
use std::fmt;

/// Best-available source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceLine {
    Known(u32),
    Unknown,
}

impl From<Option<u32>> for SourceLine {
    fn from(line: Option<u32>) -> Self {
        line.map(SourceLine::Known).unwrap_or(SourceLine::Unknown)
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLine::Known(line) => write!(f, "{}", line),
            SourceLine::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for SourceLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceLine::Known(line) => serializer.serialize_u32(*line),
            SourceLine::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Finding category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    ParseError,
    IoError,
    DeprecatedTag,
    DeprecatedAttrs,
    DeprecatedStates,
    MissingRecordId,
    MissingRecordField,
    MissingViewString,
    FieldWithoutName,
    UnescapedAmpersand,
    SchemaViolation,
    SchemaSkipped,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::DeprecatedTag
            | FindingKind::DeprecatedAttrs
            | FindingKind::DeprecatedStates
            | FindingKind::MissingViewString
            | FindingKind::SchemaSkipped => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::ParseError => "parse-error",
            FindingKind::IoError => "io-error",
            FindingKind::DeprecatedTag => "deprecated-tag",
            FindingKind::DeprecatedAttrs => "deprecated-attrs",
            FindingKind::DeprecatedStates => "deprecated-states",
            FindingKind::MissingRecordId => "missing-record-id",
            FindingKind::MissingRecordField => "missing-record-field",
            FindingKind::MissingViewString => "missing-view-string",
            FindingKind::FieldWithoutName => "field-without-name",
            FindingKind::UnescapedAmpersand => "unescaped-ampersand",
            FindingKind::SchemaViolation => "schema-violation",
            FindingKind::SchemaSkipped => "schema-skipped",
        }
    }
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LintFinding {
    pub line: SourceLine,
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LintFinding {
    pub fn new(kind: FindingKind, line: impl Into<SourceLine>, message: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            kind,
            severity: kind.severity(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}: {}", self.line, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}
