//! View Extension UseCase
//!
//! Finds the first record inheriting from the requested view among the
//! module's view files and appends the rendered fragment to its `arch`.
//! When no such record exists a new inherited view is written to
//! `views/{local}_inherit_{module}.xml`. At most one file is mutated per call.

use crate::features::classification::{view_record_mut, ViewIndex};
use crate::features::discovery::{find_module, module_view_files, views_dir};
use crate::features::parsing::{parse_document, write_fragment};
use crate::features::view_extension::domain::{
    append_to_arch, inherited_record, inherited_record_id, render_fragment, ExtensionRequest,
};
use crate::features::view_extension::error::{MergeError, MergeResult};
use crate::features::view_extension::infrastructure::{append_to_data_file, write_data_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which file an extension landed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// An existing inherited view gained the fragment
    Updated(PathBuf),
    /// No inherited view existed; a new file was written
    Created(PathBuf),
}

impl ExtensionOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ExtensionOutcome::Updated(p) | ExtensionOutcome::Created(p) => p,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, ExtensionOutcome::Created(_))
    }
}

/// View Extension UseCase Trait
pub trait ViewExtensionUseCase: Send + Sync {
    fn extend(&self, request: &ExtensionRequest) -> MergeResult<ExtensionOutcome>;
}

/// Resolves the hosting module through the addons paths
#[derive(Debug, Clone)]
pub struct ViewExtender {
    addons_paths: Vec<PathBuf>,
}

impl ViewExtender {
    pub fn new(addons_paths: Vec<PathBuf>) -> Self {
        Self { addons_paths }
    }

    pub fn addons_paths(&self) -> &[PathBuf] {
        &self.addons_paths
    }
}

impl ViewExtensionUseCase for ViewExtender {
    fn extend(&self, request: &ExtensionRequest) -> MergeResult<ExtensionOutcome> {
        request.validate()?;
        let module_dir = find_module(&self.addons_paths, &request.module)
            .ok_or_else(|| MergeError::ModuleNotFound(request.module.clone()))?;
        let candidates = module_view_files(&module_dir);
        debug!(
            module = %request.module,
            candidates = candidates.len(),
            "searching for inherited view"
        );
        extend_candidates(&module_dir, &candidates, request)
    }
}

/// Apply `request` to the first matching candidate, or create a new file
/// under `module_dir`
pub fn extend_candidates(
    module_dir: &Path,
    candidates: &[PathBuf],
    request: &ExtensionRequest,
) -> MergeResult<ExtensionOutcome> {
    request.validate()?;
    let target = request.target();
    let fragment = render_fragment(request);

    let mut sorted = candidates.to_vec();
    sorted.sort();
    let mut unreadable = 0usize;

    for path in &sorted {
        let source = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable view file");
                unreadable += 1;
                continue;
            }
        };
        let mut doc = match parse_document(&source) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unparseable view file");
                continue;
            }
        };

        let ordinal = ViewIndex::build(&doc.root, &request.module)
            .first_inheriting(&target)
            .map(|record| record.ordinal());
        let Some(record) = ordinal.and_then(|n| view_record_mut(&mut doc.root, n)) else {
            continue;
        };

        append_to_arch(record, fragment);
        write_data_file(path, &doc)?;
        info!(path = %path.display(), target = %target, "appended xpath to inherited view");
        return Ok(ExtensionOutcome::Updated(path.clone()));
    }

    if sorted.len() > 1 && unreadable == sorted.len() {
        return Err(MergeError::CandidatesUnreadable {
            count: sorted.len(),
        });
    }

    let dir = views_dir(module_dir);
    fs::create_dir_all(&dir).map_err(|e| MergeError::write(&dir, e))?;
    let path = dir.join(format!("{}.xml", inherited_record_id(request)));
    let record = inherited_record(request, fragment);
    append_to_data_file(&path, &write_fragment(&record)?)?;
    info!(path = %path.display(), target = %target, "created inherited view");
    Ok(ExtensionOutcome::Created(path))
}
