//! Configuration I/O (YAML schema types)
//!
//! Every section and field is optional; absent values keep their defaults.
//! Merging into [`ToolkitConfig`](super::ToolkitConfig) lives in
//! `toolkit_config.rs`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Versions this build can read
pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<LintSection>,
}

/// `schema:` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Read schemas from this directory instead of fetching them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<PathBuf>,
}

/// `lint:` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_schema: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_parses() {
        let file: ConfigFileV1 = serde_yaml::from_str("version: 1\nlint:\n  parallelism: 2\n").unwrap();
        assert_eq!(file.version, Some(1));
        assert!(file.schema.is_none());
        assert_eq!(file.lint.unwrap().parallelism, Some(2));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ConfigFileV1, _> =
            serde_yaml::from_str("version: 1\nlint:\n  paralelism: 2\n");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("paralelism"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<ConfigFileV1, _> = serde_yaml::from_str("version: 1\noutput: {}\n");
        assert!(result.is_err());
    }
}
