//! Configuration System
//!
//! Versioned YAML file (`version: 1`) with environment overrides.
//!
//! ```rust,ignore
//! use viewkit_core::config::ToolkitConfig;
//!
//! let config = ToolkitConfig::from_yaml("viewkit.yaml")?;
//! let config = ToolkitConfig::load(None)?; // defaults + VIEWKIT_* env
//! ```
//!
//! ```yaml
//! version: 1
//! schema:
//!   base_url: https://raw.githubusercontent.com/odoo/odoo/<rev>/odoo/addons/base/rng
//!   timeout_secs: 10
//!   local_dir: ./rng        # optional, skips the network
//! lint:
//!   skip_schema: false
//!   parallelism: 4
//! ```

pub mod error;
pub mod io;
pub mod toolkit_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, LintSection, SchemaSection};
pub use toolkit_config::{
    default_parallelism, LintConfig, SchemaConfig, ToolkitConfig, ENV_BASE_URL, ENV_PARALLELISM,
    ENV_TIMEOUT_SECS,
};
