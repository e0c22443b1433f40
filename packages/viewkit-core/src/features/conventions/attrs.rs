//! Replacement suggestions for the deprecated `attrs` attribute
//!
//! Best-effort textual scans of the raw attribute value. The result is a
//! hint for a human, so the scans never fail; unrecognized input gets the
//! generic advice.

use std::fmt;

const GENERIC_ADVICE: &str = "Use direct attributes (invisible, readonly, required, column_invisible)";
const OR_NOTE: &str = "(Note: Use 'or' for '|' operators)";
const AND_NOTE: &str = "(Note: Use 'and' for '&' operators)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrsSuggestion {
    /// Direct attribute replacements, followed by operator notes
    Direct(Vec<String>),
    /// Nothing recognized
    Generic,
}

impl fmt::Display for AttrsSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrsSuggestion::Direct(parts) => f.write_str(&parts.join(" ")),
            AttrsSuggestion::Generic => f.write_str(GENERIC_ADVICE),
        }
    }
}

/// How a single key is set inside the `attrs` dictionary
enum KeyValue {
    True,
    False,
    Domain,
    Unknown,
}

fn key_value(attrs: &str, key: &str) -> KeyValue {
    let literal = |value: &str| attrs.contains(&format!("'{}': {}", key, value));
    if literal("1") || literal("True") {
        KeyValue::True
    } else if literal("0") || literal("False") {
        KeyValue::False
    } else if attrs.contains("[(") {
        KeyValue::Domain
    } else {
        KeyValue::Unknown
    }
}

pub fn suggest(attrs: &str) -> AttrsSuggestion {
    let mut parts = Vec::new();
    let has_state = attrs.contains("state");

    if attrs.contains("invisible") {
        match key_value(attrs, "invisible") {
            KeyValue::True => parts.push("invisible=\"True\"".to_string()),
            KeyValue::False => parts.push("invisible=\"False\"".to_string()),
            KeyValue::Domain if has_state && attrs.contains('=') => {
                parts.push("invisible=\"state == 'value'\"".to_string())
            }
            KeyValue::Domain => parts.push("invisible=\"condition\"".to_string()),
            KeyValue::Unknown => {}
        }
    }

    if attrs.contains("readonly") {
        match key_value(attrs, "readonly") {
            KeyValue::True => parts.push("readonly=\"True\"".to_string()),
            KeyValue::False => parts.push("readonly=\"False\"".to_string()),
            KeyValue::Domain if has_state && attrs.contains("!=") => {
                parts.push("readonly=\"state != 'draft'\"".to_string())
            }
            KeyValue::Domain if has_state && attrs.contains('=') => {
                parts.push("readonly=\"state == 'value'\"".to_string())
            }
            KeyValue::Domain => parts.push("readonly=\"condition\"".to_string()),
            KeyValue::Unknown => {}
        }
    }

    if attrs.contains("required") {
        match key_value(attrs, "required") {
            KeyValue::True => parts.push("required=\"True\"".to_string()),
            KeyValue::False => parts.push("required=\"False\"".to_string()),
            KeyValue::Domain => parts.push("required=\"condition\"".to_string()),
            KeyValue::Unknown => {}
        }
    }

    if parts.is_empty() {
        return AttrsSuggestion::Generic;
    }
    if attrs.contains('|') {
        parts.push(OR_NOTE.to_string());
    }
    if attrs.contains('&') {
        parts.push(AND_NOTE.to_string());
    }
    AttrsSuggestion::Direct(parts)
}
