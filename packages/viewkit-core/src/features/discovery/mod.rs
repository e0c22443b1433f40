//! Discovery Feature
//!
//! Locates the project root, addons paths, modules and the XML files to
//! lint or extend.

pub mod error;
mod files;
mod project;

pub use error::{DiscoveryError, DiscoveryResult};
pub use files::{collect_xml_files, module_view_files, view_files_of, views_dir};
pub use project::{find_addons_paths, find_module, find_project_root, modules_in, MANIFEST_FILE};
