//! Convention rules for view documents
//!
//! Pure checks over a parsed tree, evaluated in a fixed order. Each rule
//! walks the whole document in document order, so the output is
//! deterministic for a given input.

use super::attrs;
use crate::features::classification::view_records;
use crate::shared::constants::data_format::{FIELD_TAG, REQUIRED_RECORD_FIELDS};
use crate::shared::models::{Document, FindingKind, LintFinding, ViewType};

/// Run every convention rule against `document`
pub fn lint(document: &Document, view_type: ViewType) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    deprecated_tree(document, view_type, &mut findings);
    deprecated_attributes(document, &mut findings);
    record_completeness(document, &mut findings);
    view_string(document, &mut findings);
    field_names(document, &mut findings);
    findings
}

fn deprecated_tree(document: &Document, view_type: ViewType, out: &mut Vec<LintFinding>) {
    if view_type != ViewType::List {
        return;
    }
    out.extend(document.elements().filter(|el| el.tag == "tree").map(|el| {
        LintFinding::new(
            FindingKind::DeprecatedTag,
            el.line,
            "Deprecated '<tree>' element found. Use '<list>' instead for modern versions.",
        )
    }));
}

/// `attrs` and `states`, reported together per element
fn deprecated_attributes(document: &Document, out: &mut Vec<LintFinding>) {
    for el in document.elements() {
        if let Some(value) = el.attr("attrs").filter(|v| !v.is_empty()) {
            out.push(
                LintFinding::new(
                    FindingKind::DeprecatedAttrs,
                    el.line,
                    format!(
                        "Deprecated 'attrs' attribute found in <{}>. Use direct attributes instead.",
                        el.tag
                    ),
                )
                .with_suggestion(attrs::suggest(value).to_string()),
            );
        }
        if let Some(value) = el.attr("states").filter(|v| !v.is_empty()) {
            out.push(LintFinding::new(
                FindingKind::DeprecatedStates,
                el.line,
                format!(
                    "Deprecated 'states' attribute found in <{}>. Use direct attributes like 'readonly', 'invisible', etc. instead of states='{}'",
                    el.tag, value
                ),
            ));
        }
    }
}

fn record_completeness(document: &Document, out: &mut Vec<LintFinding>) {
    for record in view_records(&document.root) {
        let id = record.id();
        if id.is_none() {
            out.push(LintFinding::new(
                FindingKind::MissingRecordId,
                record.line(),
                "View record missing required 'id' attribute",
            ));
        }
        for field in REQUIRED_RECORD_FIELDS {
            if record.element().descendant_field(field).is_some() {
                continue;
            }
            let message = match id {
                Some(id) => format!("View record '{}' missing required field '{}'", id, field),
                None => format!("View record missing required field '{}'", field),
            };
            out.push(LintFinding::new(
                FindingKind::MissingRecordField,
                record.line(),
                message,
            ));
        }
    }
}

fn view_string(document: &Document, out: &mut Vec<LintFinding>) {
    out.extend(
        document
            .elements()
            .filter(|el| ViewType::is_view_tag(&el.tag) && el.tag != "search")
            .filter(|el| el.attr("string").map_or(true, str::is_empty))
            .map(|el| {
                LintFinding::new(
                    FindingKind::MissingViewString,
                    el.line,
                    format!(
                        "<{}> element should have a 'string' attribute for better UX",
                        el.tag
                    ),
                )
            }),
    );
}

fn field_names(document: &Document, out: &mut Vec<LintFinding>) {
    out.extend(
        document
            .elements()
            .filter(|el| el.tag == FIELD_TAG)
            .filter(|el| el.attr("name").map_or(true, str::is_empty))
            .map(|el| {
                LintFinding::new(
                    FindingKind::FieldWithoutName,
                    el.line,
                    "<field> element missing required 'name' attribute",
                )
            }),
    );
}
