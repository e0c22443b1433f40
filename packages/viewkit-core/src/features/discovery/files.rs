//! XML file collection

use super::error::{DiscoveryError, DiscoveryResult};
use super::project::{is_hidden, modules_in};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const VIEWS_DIR: &str = "views";

fn is_xml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

/// A file yields itself; a directory yields every `*.xml` below it
/// (hidden directories skipped), sorted
pub fn collect_xml_files(path: &Path) -> DiscoveryResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(DiscoveryError::NotFound(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| DiscoveryError::Walk {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_xml(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Every `*.xml` under each module's `views/` directory
pub fn view_files_of(addons_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for addons in addons_paths {
        for module in modules_in(addons) {
            let views = module.join(VIEWS_DIR);
            if !views.is_dir() {
                continue;
            }
            match collect_xml_files(&views) {
                Ok(found) => files.extend(found),
                Err(e) => debug!("skipping {}: {}", views.display(), e),
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Direct `*.xml` children of a module's `views/` directory, sorted
pub fn module_view_files(module_dir: &Path) -> Vec<PathBuf> {
    let views = module_dir.join(VIEWS_DIR);
    let mut files: Vec<PathBuf> = match std::fs::read_dir(&views) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_xml(p))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

/// Directory for new view files of a module
pub fn views_dir(module_dir: &Path) -> PathBuf {
    module_dir.join(VIEWS_DIR)
}
