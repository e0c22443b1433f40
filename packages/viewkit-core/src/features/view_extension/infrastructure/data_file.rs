//! Data file persistence
//!
//! Every file written here keeps exactly one wrapper element (`<odoo>`, or
//! the legacy `<openerp>` when a file already uses it).

use crate::features::parsing::write_document;
use crate::features::view_extension::error::{MergeError, MergeResult};
use crate::shared::constants::data_format::{EMPTY_WRAPPER, LEGACY_WRAPPER_TAG, WRAPPER_TAG};
use crate::shared::models::Document;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// `<odoo/>`, `<odoo />`, `<odoo noupdate="1"/>` (and the legacy root)
static SELF_CLOSED_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"<({}|{})(\s[^<>]*?)?\s*/>",
        WRAPPER_TAG, LEGACY_WRAPPER_TAG
    ))
    .expect("self-closed wrapper pattern is a valid regex")
});

static WRAPPER_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"<({}|{})[\s>]", WRAPPER_TAG, LEGACY_WRAPPER_TAG))
        .expect("wrapper open pattern is a valid regex")
});

static WRAPPER_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"</({}|{})\s*>", WRAPPER_TAG, LEGACY_WRAPPER_TAG))
        .expect("wrapper close pattern is a valid regex")
});

/// Serialize `doc` and replace `path` with it
pub fn write_data_file(path: &Path, doc: &Document) -> MergeResult<()> {
    let rendered = write_document(doc)?;
    write_atomic(path, &rendered)
}

/// Insert `content` right before the wrapper's closing tag
///
/// A missing or blank file is initialized with an empty wrapper first, and a
/// self-closed wrapper is opened (attributes kept). A file that opens a
/// wrapper but never closes it gets the closing tag after the content; a
/// file with no wrapper at all is wrapped as a whole.
pub fn append_to_data_file(path: &Path, content: &str) -> MergeResult<()> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(MergeError::write(path, e)),
    };
    let updated = insert_into_wrapper(&existing, content);
    debug!(path = %path.display(), bytes = updated.len(), "appending to data file");
    write_atomic(path, &updated)
}

pub(crate) fn insert_into_wrapper(existing: &str, content: &str) -> String {
    let block = indent(content);

    let base = if existing.trim().is_empty() {
        EMPTY_WRAPPER.to_string()
    } else {
        SELF_CLOSED_WRAPPER
            .replacen(existing, 1, |caps: &Captures| {
                let tag = &caps[1];
                let attrs = caps.get(2).map_or("", |m| m.as_str().trim_end());
                format!("<{tag}{attrs}>\n</{tag}>")
            })
            .into_owned()
    };

    if let Some(close) = WRAPPER_CLOSE.find_iter(&base).last() {
        let at = close.start();
        let mut out = String::with_capacity(base.len() + block.len() + 1);
        out.push_str(&base[..at]);
        out.push_str(&block);
        out.push('\n');
        out.push_str(&base[at..]);
        return out;
    }

    if let Some(open) = WRAPPER_OPEN.captures(&base) {
        let mut out = base.trim_end().to_string();
        out.push('\n');
        out.push_str(&block);
        out.push('\n');
        out.push_str(&format!("</{}>\n", &open[1]));
        return out;
    }

    let (declaration, body) = split_declaration(&base);
    let mut out = String::new();
    if let Some(decl) = declaration {
        out.push_str(decl);
        out.push('\n');
    }
    out.push_str(&format!("<{}>\n", WRAPPER_TAG));
    if !body.trim().is_empty() {
        out.push_str(&indent(body.trim()));
        out.push('\n');
    }
    out.push_str(&block);
    out.push('\n');
    out.push_str(&format!("</{}>\n", WRAPPER_TAG));
    out
}

fn split_declaration(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return (Some(&trimmed[..end + 2]), &trimmed[end + 2..]);
        }
    }
    (None, text)
}

fn indent(content: &str) -> String {
    content
        .trim_end()
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// tmp file + rename so readers never see a half-written file
fn write_atomic(path: &Path, content: &str) -> MergeResult<()> {
    let tmp_path = path.with_extension("xml.tmp");
    {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| MergeError::write(&tmp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| MergeError::write(&tmp_path, e))?;
        file.sync_all().map_err(|e| MergeError::write(&tmp_path, e))?;
    }
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        MergeError::write(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::parse_document;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const RECORD: &str = "<record id=\"a\" model=\"ir.ui.view\">\n    <field name=\"name\">a</field>\n</record>\n";

    fn wrapper_count(text: &str) -> (usize, usize) {
        (text.matches("<odoo>").count(), text.matches("</odoo>").count())
    }

    #[test]
    fn test_empty_file_gets_wrapper() {
        let out = insert_into_wrapper("", RECORD);
        assert_eq!(
            out,
            "<odoo>\n\n    <record id=\"a\" model=\"ir.ui.view\">\n        <field name=\"name\">a</field>\n    </record>\n</odoo>\n"
        );
    }

    #[test]
    fn test_inserts_before_last_closing_tag() {
        let existing = "<?xml version=\"1.0\"?>\n<odoo>\n    <record id=\"x\"/>\n</odoo>\n";
        let out = insert_into_wrapper(existing, RECORD);
        assert_eq!(wrapper_count(&out), (1, 1));
        assert!(out.starts_with("<?xml version=\"1.0\"?>\n<odoo>\n    <record id=\"x\"/>\n    <record id=\"a\""));
        assert!(out.ends_with("    </record>\n</odoo>\n"));
    }

    #[test]
    fn test_self_closed_wrapper_is_opened() {
        for existing in [
            "<odoo/>\n",
            "<?xml version=\"1.0\"?>\n<odoo />\n",
            "<?xml version=\"1.0\"?>\n<odoo noupdate=\"1\"/>\n",
        ] {
            let out = insert_into_wrapper(existing, RECORD);
            assert_eq!(out.matches("</odoo>").count(), 1, "{}", out);
            let doc = parse_document(&out).unwrap();
            assert_eq!(doc.root.tag, "odoo");
            assert_eq!(doc.root.elements().count(), 1);
        }
    }

    #[test]
    fn test_self_closed_wrapper_keeps_attributes() {
        let out = insert_into_wrapper("<odoo noupdate=\"1\" />", RECORD);
        assert!(out.starts_with("<odoo noupdate=\"1\">\n"), "{}", out);
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.root.attr("noupdate"), Some("1"));
    }

    #[test]
    fn test_legacy_wrapper_is_reused() {
        let out = insert_into_wrapper(
            "<openerp>\n    <data>\n    </data>\n</openerp>\n",
            RECORD,
        );
        assert!(!out.contains("<odoo"), "{}", out);
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.root.tag, "openerp");
        let tags: Vec<&str> = doc.root.elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["data", "record"]);

        let closed = insert_into_wrapper("<openerp/>", RECORD);
        assert_eq!(parse_document(&closed).unwrap().root.tag, "openerp");
    }

    #[test]
    fn test_similar_tag_is_not_a_wrapper() {
        let out = insert_into_wrapper("<odoo_extra/>", RECORD);
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.root.tag, "odoo");
        assert_eq!(doc.root.elements().next().unwrap().tag, "odoo_extra");
    }

    #[test]
    fn test_unclosed_wrapper_is_closed() {
        let out = insert_into_wrapper("<odoo>\n    <record id=\"x\"/>\n", RECORD);
        assert_eq!(wrapper_count(&out), (1, 1));
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.root.elements().count(), 2);
    }

    #[test]
    fn test_bare_body_is_wrapped() {
        let out = insert_into_wrapper("<?xml version=\"1.0\"?>\n<record id=\"x\"/>\n", RECORD);
        assert!(out.starts_with("<?xml version=\"1.0\"?>\n<odoo>\n"));
        assert_eq!(wrapper_count(&out), (1, 1));
        let doc = parse_document(&out).unwrap();
        assert_eq!(doc.root.tag, "odoo");
        assert_eq!(doc.root.elements().count(), 2);
    }

    #[test]
    fn test_append_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.xml");
        append_to_data_file(&path, RECORD).unwrap();
        append_to_data_file(&path, "<record id=\"b\" model=\"ir.ui.view\"/>").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(wrapper_count(&text), (1, 1));
        assert_eq!(parse_document(&text).unwrap().root.elements().count(), 2);
        assert!(!path.with_extension("xml.tmp").exists());
    }

    #[test]
    fn test_write_data_file_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("views.xml");
        fs::write(&path, "<odoo><record id=\"old\"/></odoo>").unwrap();

        let doc = parse_document("<odoo><record id=\"new\"/></odoo>").unwrap();
        write_data_file(&path, &doc).unwrap();

        let reread = parse_document(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread.root.elements().next().unwrap().attr("id"), Some("new"));
    }
}
