//! Project layout discovery: project root, addons paths, modules

use super::error::{DiscoveryError, DiscoveryResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// File marking a directory as an addon module
pub const MANIFEST_FILE: &str = "__manifest__.py";

const PROJECT_MARKER_DIR: &str = ".git";
const PROJECT_MARKER_FILE: &str = "odoo.conf";

pub(super) fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Nearest ancestor of `start` (inclusive) holding a `.git` directory or an
/// `odoo.conf` file
pub fn find_project_root(start: &Path) -> DiscoveryResult<PathBuf> {
    let start = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());
    let found = start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER_DIR).is_dir() || dir.join(PROJECT_MARKER_FILE).is_file())
        .map(Path::to_path_buf);
    found.ok_or(DiscoveryError::NoProjectRoot(start))
}

/// Every directory that directly contains a module (a directory with a
/// manifest), deduplicated and sorted
pub fn find_addons_paths(root: &Path) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE {
            if let Some(addons) = entry.path().parent().and_then(Path::parent) {
                found.insert(addons.to_path_buf());
            }
        }
    }
    found.into_iter().collect()
}

/// First `<addons>/<name>` directory across `addons_paths`
pub fn find_module(addons_paths: &[PathBuf], name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return None;
    }
    addons_paths
        .iter()
        .map(|addons| addons.join(name))
        .find(|candidate| candidate.is_dir())
}

/// Module directories (children holding a manifest) of one addons path
pub fn modules_in(addons_path: &Path) -> Vec<PathBuf> {
    let mut modules: Vec<PathBuf> = match std::fs::read_dir(addons_path) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.join(MANIFEST_FILE).is_file())
            .collect(),
        Err(e) => {
            debug!("cannot list {}: {}", addons_path.display(), e);
            Vec::new()
        }
    };
    modules.sort();
    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn module(root: &Path, addons: &str, name: &str) -> PathBuf {
        let dir = root.join(addons).join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), "{}").unwrap();
        dir
    }

    #[test]
    fn test_find_project_root_by_conf() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("odoo.conf"), "").unwrap();
        let nested = tmp.path().join("addons/sale_ext/views");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(root, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_project_root_by_git_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        assert!(find_project_root(tmp.path()).is_ok());
    }

    #[test]
    fn test_find_addons_paths_dedups_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        module(tmp.path(), "custom", "b_mod");
        module(tmp.path(), "custom", "a_mod");
        module(tmp.path(), "enterprise", "x_mod");
        module(tmp.path(), ".hidden", "ignored");

        let paths = find_addons_paths(tmp.path());
        assert_eq!(
            paths,
            vec![tmp.path().join("custom"), tmp.path().join("enterprise")]
        );
    }

    #[test]
    fn test_find_module_first_match() {
        let tmp = tempfile::tempdir().unwrap();
        let first = module(tmp.path(), "a", "shared");
        module(tmp.path(), "b", "shared");
        let addons = vec![tmp.path().join("a"), tmp.path().join("b")];

        assert_eq!(find_module(&addons, "shared"), Some(first));
        assert_eq!(find_module(&addons, "missing"), None);
        assert_eq!(find_module(&addons, "../a"), None);
    }

    #[test]
    fn test_modules_in() {
        let tmp = tempfile::tempdir().unwrap();
        module(tmp.path(), "addons", "m2");
        module(tmp.path(), "addons", "m1");
        fs::create_dir_all(tmp.path().join("addons/not_a_module")).unwrap();

        let names: Vec<String> = modules_in(&tmp.path().join("addons"))
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["m1", "m2"]);
    }
}
