//! Toolkit configuration
//!
//! Precedence, lowest first: built-in defaults, YAML file, `VIEWKIT_*`
//! environment variables, then CLI flags (applied by the caller).

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, LintSection, SchemaSection, SUPPORTED_VERSIONS};
use crate::shared::constants::{parallelism, schema};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_BASE_URL: &str = "VIEWKIT_SCHEMA_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "VIEWKIT_SCHEMA_TIMEOUT_SECS";
pub const ENV_PARALLELISM: &str = "VIEWKIT_PARALLELISM";

const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub local_dir: Option<PathBuf>,
}

impl SchemaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            base_url: schema::DEFAULT_BASE_URL.to_string(),
            timeout_secs: schema::DEFAULT_TIMEOUT_SECS,
            local_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintConfig {
    pub skip_schema: bool,
    /// Worker pool size
    pub parallelism: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            skip_schema: false,
            parallelism: default_parallelism(),
        }
    }
}

/// Available CPUs, capped to keep schema fetch bursts small
pub fn default_parallelism() -> usize {
    num_cpus::get().clamp(1, parallelism::DEFAULT_MAX_WORKERS)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolkitConfig {
    pub schema: SchemaConfig,
    pub lint: LintConfig,
}

impl ToolkitConfig {
    /// Defaults, or the YAML file at `path`, with environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(section) = file.schema {
            config.apply_schema_section(section);
        }
        if let Some(section) = file.lint {
            config.apply_lint_section(section);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(SUPPORTED_VERSIONS[0]),
            schema: Some(SchemaSection {
                base_url: Some(self.schema.base_url.clone()),
                timeout_secs: Some(self.schema.timeout_secs),
                local_dir: self.schema.local_dir.clone(),
            }),
            lint: Some(LintSection {
                skip_schema: Some(self.lint.skip_schema),
                parallelism: Some(self.lint.parallelism),
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Apply `VIEWKIT_*` variables from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply `VIEWKIT_*` overrides read through `lookup`
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.schema.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.schema.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::env(ENV_TIMEOUT_SECS, &raw, e))?;
        }
        if let Some(raw) = lookup(ENV_PARALLELISM) {
            self.lint.parallelism = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::env(ENV_PARALLELISM, &raw, e))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.schema.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation(
                "schema.base_url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "schema.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.schema.timeout_secs < 1 || self.schema.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::range_with_hint(
                "schema.timeout_secs",
                self.schema.timeout_secs,
                1,
                MAX_TIMEOUT_SECS,
                "Schema downloads need a bounded, non-zero timeout",
            ));
        }

        if self.lint.parallelism < 1 || self.lint.parallelism > parallelism::MAX_WORKERS {
            return Err(ConfigError::range_with_hint(
                "lint.parallelism",
                self.lint.parallelism,
                1,
                parallelism::MAX_WORKERS,
                "Number of lint workers must be reasonable",
            ));
        }
        Ok(())
    }

    fn apply_schema_section(&mut self, section: SchemaSection) {
        if let Some(url) = section.base_url {
            self.schema.base_url = url;
        }
        if let Some(secs) = section.timeout_secs {
            self.schema.timeout_secs = secs;
        }
        if section.local_dir.is_some() {
            self.schema.local_dir = section.local_dir;
        }
    }

    fn apply_lint_section(&mut self, section: LintSection) {
        if let Some(skip) = section.skip_schema {
            self.lint.skip_schema = skip;
        }
        if let Some(n) = section.parallelism {
            self.lint.parallelism = n;
        }
    }
}
