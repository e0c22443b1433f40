//! Schema validator adapter
//!
//! Turns cached schema text into a compiled validator per view type and
//! validates every extracted view subtree independently.

use super::error::{SchemaValidationError, SchemaValidationResult};
use super::extract::view_subtrees;
use crate::features::relaxng::RngValidator;
use crate::features::schema_cache::{SchemaCache, SchemaCategory};
use crate::shared::constants::schema::COMMON_INCLUDE;
use crate::shared::models::{Document, FindingKind, LintFinding, SourceLine, ViewType};
use moka::sync::Cache;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of preparing a view type's validator. A schema that does not
/// compile stays broken for the adapter's lifetime.
enum Prepared {
    Ready(RngValidator),
    Broken(String),
}

pub struct SchemaValidatorAdapter {
    schemas: Arc<SchemaCache>,
    validators: Cache<ViewType, Arc<Prepared>>,
}

impl SchemaValidatorAdapter {
    pub fn new(schemas: Arc<SchemaCache>) -> Self {
        Self {
            schemas,
            validators: Cache::new(ViewType::ALL.len() as u64 * 2),
        }
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Validate every `view_type` subtree of `document`.
    ///
    /// Types without a schema (form, kanban) yield nothing. When the schemas
    /// cannot be fetched or compiled, a single skip finding is returned.
    pub fn validate(&self, document: &Document, view_type: ViewType) -> Vec<LintFinding> {
        let Some(category) = SchemaCategory::for_view_type(view_type) else {
            return Vec::new();
        };

        let prepared = match self.validator_for(view_type, category) {
            Ok(prepared) => prepared,
            Err(e) => return vec![skipped(view_type, &e.to_string())],
        };
        let validator = match prepared.as_ref() {
            Prepared::Ready(validator) => validator,
            Prepared::Broken(cause) => return vec![skipped(view_type, cause)],
        };

        let mut findings = Vec::new();
        for subtree in view_subtrees(document, view_type) {
            for diagnostic in validator.validate(subtree) {
                findings.push(LintFinding::new(
                    FindingKind::SchemaViolation,
                    diagnostic.line.or(subtree.line),
                    format!("RNG validation error: {}", diagnostic.message),
                ));
            }
        }
        findings
    }

    fn validator_for(
        &self,
        view_type: ViewType,
        category: SchemaCategory,
    ) -> SchemaValidationResult<Arc<Prepared>> {
        self.validators
            .try_get_with(view_type, || {
                let common = self.schemas.fetch_category(SchemaCategory::Common)?;
                let specific = self.schemas.fetch_category(category)?;
                match compile(&common, &specific, category) {
                    Ok(validator) => {
                        debug!("compiled {} schema", category);
                        Ok(Arc::new(Prepared::Ready(validator)))
                    }
                    Err(e @ SchemaValidationError::Compile(_)) => {
                        warn!("{} schema is unusable: {}", category, e);
                        Ok(Arc::new(Prepared::Broken(e.to_string())))
                    }
                    Err(e) => Err(e),
                }
            })
            .map_err(|shared: Arc<SchemaValidationError>| (*shared).clone())
    }
}

/// Write the common schema next to the type schema, point the type schema's
/// include at it, and compile
fn compile(
    common: &str,
    specific: &str,
    category: SchemaCategory,
) -> SchemaValidationResult<RngValidator> {
    let dir = tempfile::tempdir()?;
    let common_path = dir.path().join(SchemaCategory::Common.file_name());
    std::fs::write(&common_path, common)?;

    let patched = specific.replace(
        COMMON_INCLUDE,
        &format!("include href=\"{}\"", common_path.display()),
    );
    let view_path = dir.path().join(category.file_name());
    std::fs::write(&view_path, patched)?;

    Ok(RngValidator::from_file(&view_path)?)
}

fn skipped(view_type: ViewType, cause: &str) -> LintFinding {
    LintFinding::new(
        FindingKind::SchemaSkipped,
        SourceLine::Unknown,
        format!(
            "Schema validation skipped for {} views: {}",
            view_type, cause
        ),
    )
}
