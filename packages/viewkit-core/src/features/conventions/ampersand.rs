//! Unescaped ampersand detection
//!
//! Text is inspected in its escaped source form: every `&` must begin a
//! named entity or a character reference.

use crate::shared::models::{Document, FindingKind, LintFinding};
use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:[A-Za-z_:][A-Za-z0-9_.:-]*|#[0-9]+|#x[0-9A-Fa-f]+);")
        .expect("entity reference pattern is a valid regex")
});

/// Whether `raw` contains an `&` that does not start a reference
pub fn has_unescaped_ampersand(raw: &str) -> bool {
    let ampersands = raw.matches('&').count();
    ampersands > 0 && REFERENCE.find_iter(raw).count() < ampersands
}

/// One finding per element whose own text holds an unescaped `&`
pub fn check_ampersands(document: &Document) -> Vec<LintFinding> {
    document
        .elements()
        .filter(|el| el.text_nodes().any(has_unescaped_ampersand))
        .map(|el| {
            LintFinding::new(
                FindingKind::UnescapedAmpersand,
                el.line,
                format!(
                    "Unescaped '&' found in element <{}>. Use '&amp;' instead.",
                    el.tag
                ),
            )
        })
        .collect()
}
