//! Tree validation against a compiled grammar
//!
//! Walks the element tree feeding derivative events. On an error the
//! offending construct is reported and skipped so later siblings are still
//! checked; one tree can yield several diagnostics.

use super::compile::Grammar;
use super::error::RngResult;
use super::pattern::{Arena, PatternId, NOT_ALLOWED};
use crate::shared::models::{decode_lenient, local_name, Element, XmlNode};
use std::path::Path;

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngDiagnostic {
    pub line: Option<u32>,
    pub message: String,
}

/// Compiled, reusable validator. Validation works on a private copy of the
/// pattern arena, so a validator can be shared across threads.
#[derive(Debug, Clone)]
pub struct RngValidator {
    grammar: Grammar,
}

impl RngValidator {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn from_file(path: &Path) -> RngResult<Self> {
        Grammar::from_file(path).map(Self::new)
    }

    pub fn validate(&self, root: &Element) -> Vec<RngDiagnostic> {
        let mut session = Session {
            arena: self.grammar.arena.clone(),
            diagnostics: Vec::new(),
        };
        session.element(self.grammar.start, root);
        session.diagnostics
    }

    pub fn is_valid(&self, root: &Element) -> bool {
        self.validate(root).is_empty()
    }
}

struct Session {
    arena: Arena,
    diagnostics: Vec<RngDiagnostic>,
}

impl Session {
    fn report(&mut self, line: Option<u32>, message: String) {
        self.diagnostics.push(RngDiagnostic { line, message });
    }

    /// Consume `el` against `p`, returning the residual pattern for the
    /// following siblings
    fn element(&mut self, p: PatternId, el: &Element) -> PatternId {
        let name = el.local_name();
        let opened = self.arena.start_tag_open_deriv(p, name);
        if opened == NOT_ALLOWED {
            let expected = self.arena.expected_elements(p);
            let message = if expected.is_empty() {
                format!("Did not expect element {} there", name)
            } else {
                format!(
                    "Did not expect element {} there, expecting {}",
                    name,
                    expected.join(", ")
                )
            };
            self.report(el.line, message);
            return p;
        }

        let mut current = opened;
        for (key, value) in &el.attributes {
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let next = self.arena.att_deriv(current, local_name(key), value);
            if next == NOT_ALLOWED {
                self.report(
                    el.line,
                    format!("Invalid attribute {} for element {}", key, name),
                );
                continue;
            }
            current = next;
        }

        let mut content = self.arena.start_tag_close_deriv(current, false);
        if content == NOT_ALLOWED {
            self.report(
                el.line,
                format!("Element {} failed to validate attributes", name),
            );
            content = self.arena.start_tag_close_deriv(current, true);
            if content == NOT_ALLOWED {
                return self.arena.skip_content(opened);
            }
        }

        let content = self.children(content, el);
        let ended = self.arena.end_tag_deriv(content);
        if ended != NOT_ALLOWED {
            return ended;
        }

        let expected = self.arena.expected_elements(content);
        let message = if expected.is_empty() {
            format!("Element {} failed to validate content", name)
        } else {
            format!(
                "Element {} failed to validate content, expecting {}",
                name,
                expected.join(", ")
            )
        };
        self.report(el.line, message);
        self.arena.skip_content(opened)
    }

    fn children(&mut self, p: PatternId, el: &Element) -> PatternId {
        let has_elements = el.elements().next().is_some();
        if !has_elements {
            let text = el.text();
            if text.trim().is_empty() {
                let derived = self.arena.text_deriv(p, &text);
                return self.arena.choice(p, derived);
            }
            return self.text(p, el, &text);
        }

        let mut current = p;
        let mut pending = String::new();
        for node in &el.children {
            match node {
                XmlNode::Element(child) => {
                    current = self.flush_text(current, el, &mut pending);
                    current = self.element(current, child);
                }
                XmlNode::Text(t) => pending.push_str(&decode_lenient(t)),
                XmlNode::CData(c) => pending.push_str(c),
                XmlNode::Comment(_) => {}
            }
        }
        self.flush_text(current, el, &mut pending)
    }

    fn flush_text(&mut self, p: PatternId, parent: &Element, pending: &mut String) -> PatternId {
        let text = std::mem::take(pending);
        if text.trim().is_empty() {
            return p;
        }
        self.text(p, parent, &text)
    }

    fn text(&mut self, p: PatternId, parent: &Element, text: &str) -> PatternId {
        let derived = self.arena.text_deriv(p, text);
        if derived == NOT_ALLOWED {
            self.report(
                parent.line,
                format!("Element {} has invalid text content", parent.local_name()),
            );
            return p;
        }
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::parse_document;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"<rng:grammar xmlns:rng="http://relaxng.org/ns/structure/1.0"
        datatypeLibrary="http://www.w3.org/2001/XMLSchema-datatypes">
      <rng:define name="field">
        <rng:element name="field">
          <rng:attribute name="name"/>
          <rng:optional><rng:attribute name="invisible"/></rng:optional>
          <rng:optional>
            <rng:attribute name="optional">
              <rng:choice><rng:value>show</rng:value><rng:value>hide</rng:value></rng:choice>
            </rng:attribute>
          </rng:optional>
          <rng:empty/>
        </rng:element>
      </rng:define>
      <rng:start>
        <rng:element name="list">
          <rng:optional><rng:attribute name="string"/></rng:optional>
          <rng:optional><rng:attribute name="editable">
            <rng:choice><rng:value>top</rng:value><rng:value>bottom</rng:value></rng:choice>
          </rng:attribute></rng:optional>
          <rng:optional><rng:attribute name="limit"><rng:data type="int"/></rng:attribute></rng:optional>
          <rng:oneOrMore><rng:ref name="field"/></rng:oneOrMore>
        </rng:element>
      </rng:start>
    </rng:grammar>"#;

    fn validator() -> RngValidator {
        RngValidator::new(Grammar::from_str_with_base(SCHEMA, None).unwrap())
    }

    fn check(xml: &str) -> Vec<RngDiagnostic> {
        validator().validate(&parse_document(xml).unwrap().root)
    }

    #[test]
    fn test_valid_tree() {
        let diags = check(r#"<list string="Partners" limit="80"><field name="name"/><field name="email" optional="show"/></list>"#);
        assert_eq!(diags, vec![]);
    }

    #[test]
    fn test_unknown_attribute() {
        let diags = check("<list>\n<field name=\"a\" bogus=\"1\"/>\n</list>");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, Some(2));
        assert!(diags[0].message.contains("Invalid attribute bogus"));
    }

    #[test]
    fn test_bad_enumeration_value() {
        let diags = check(r#"<list editable="left"><field name="a"/></list>"#);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("editable"));
    }

    #[test]
    fn test_bad_datatype() {
        let diags = check(r#"<list limit="many"><field name="a"/></list>"#);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_missing_required_attribute() {
        let diags = check("<list><field/></list>");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("failed to validate attributes"));
    }

    #[test]
    fn test_missing_content() {
        let diags = check("<list/>");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("expecting field"));
    }

    #[test]
    fn test_recovers_and_reports_multiple() {
        let diags = check(
            "<list>\n<field name=\"a\" x=\"1\"/>\n<button/>\n<field name=\"b\" y=\"2\"/>\n</list>",
        );
        let lines: Vec<Option<u32>> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_text_not_allowed() {
        let diags = check("<list><field name=\"a\"/>stray</list>");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("invalid text"));
    }

    #[test]
    fn test_wrong_root() {
        let diags = check("<form/>");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Did not expect element form"));
    }

    #[test]
    fn test_include_with_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("common.rng"),
            r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
                <define name="item"><element name="item"><empty/></element></define>
                <define name="extra"><attribute name="extra"/></define>
            </grammar>"#,
        )
        .unwrap();
        let schema = r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
            <include href="common.rng">
                <define name="extra"><optional><attribute name="extra"/></optional></define>
            </include>
            <start><element name="box"><ref name="extra"/><zeroOrMore><ref name="item"/></zeroOrMore></element></start>
        </grammar>"#;
        let grammar = Grammar::from_str_with_base(schema, Some(dir.path())).unwrap();
        let validator = RngValidator::new(grammar);

        let ok = parse_document("<box><item/><item/></box>").unwrap();
        assert!(validator.is_valid(&ok.root));
        let bad = parse_document("<box><other/></box>").unwrap();
        assert!(!validator.is_valid(&bad.root));
    }

    #[test]
    fn test_define_combine_choice() {
        let schema = r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
            <start><element name="root"><zeroOrMore><ref name="node"/></zeroOrMore></element></start>
            <define name="node"><element name="a"><empty/></element></define>
            <define name="node" combine="choice"><element name="b"><empty/></element></define>
        </grammar>"#;
        let validator = RngValidator::new(Grammar::from_str_with_base(schema, None).unwrap());
        let doc = parse_document("<root><a/><b/><a/></root>").unwrap();
        assert!(validator.is_valid(&doc.root));
    }

    #[test]
    fn test_recursive_define_and_mixed() {
        let schema = r#"<grammar xmlns="http://relaxng.org/ns/structure/1.0">
            <start><ref name="group"/></start>
            <define name="group">
                <element name="group"><mixed><zeroOrMore><ref name="group"/></zeroOrMore></mixed></element>
            </define>
        </grammar>"#;
        let validator = RngValidator::new(Grammar::from_str_with_base(schema, None).unwrap());
        let doc = parse_document("<group>text<group><group/></group>more</group>").unwrap();
        assert!(validator.is_valid(&doc.root));
    }
}
