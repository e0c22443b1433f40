//! Derivative-based matching
//!
//! Each function computes the residual pattern after consuming one event
//! (start tag, attribute, start-tag close, text, end tag). A residual of
//! notAllowed means the event was invalid at that point.

use super::pattern::{Arena, Pattern, PatternId, EMPTY, NOT_ALLOWED};
use std::collections::HashSet;

/// Deferred combinator applied to the continuation half of `After`
#[derive(Debug, Clone, Copy)]
enum AfterOp {
    InterleaveRight(PatternId),
    InterleaveLeft(PatternId),
    GroupWith(PatternId),
    AfterWith(PatternId),
}

impl Arena {
    pub fn nullable(&self, p: PatternId) -> bool {
        self.nullable_inner(p, &mut HashSet::new())
    }

    fn nullable_inner(&self, p: PatternId, seen: &mut HashSet<PatternId>) -> bool {
        if !seen.insert(p) {
            return false;
        }
        let result = match self.resolved(p) {
            Pattern::Empty | Pattern::Text => true,
            Pattern::Group(a, b) | Pattern::Interleave(a, b) => {
                self.nullable_inner(a, seen) && self.nullable_inner(b, seen)
            }
            Pattern::Choice(a, b) => self.nullable_inner(a, seen) || self.nullable_inner(b, seen),
            Pattern::OneOrMore(a) => self.nullable_inner(a, seen),
            _ => false,
        };
        seen.remove(&p);
        result
    }

    pub fn text_deriv(&mut self, p: PatternId, text: &str) -> PatternId {
        match self.resolved(p) {
            Pattern::Choice(a, b) => {
                let da = self.text_deriv(a, text);
                let db = self.text_deriv(b, text);
                self.choice(da, db)
            }
            Pattern::Interleave(a, b) => {
                let da = self.text_deriv(a, text);
                let left = self.interleave(da, b);
                let db = self.text_deriv(b, text);
                let right = self.interleave(a, db);
                self.choice(left, right)
            }
            Pattern::Group(a, b) => {
                let da = self.text_deriv(a, text);
                let first = self.group(da, b);
                if self.nullable(a) {
                    let db = self.text_deriv(b, text);
                    self.choice(first, db)
                } else {
                    first
                }
            }
            Pattern::After(a, b) => {
                let da = self.text_deriv(a, text);
                self.after(da, b)
            }
            Pattern::OneOrMore(a) => {
                let da = self.text_deriv(a, text);
                let rest = self.zero_or_more(a);
                self.group(da, rest)
            }
            Pattern::Text => p,
            Pattern::Value(datatype, expected) => {
                if datatype.equal(&expected, text) {
                    EMPTY
                } else {
                    NOT_ALLOWED
                }
            }
            Pattern::Data(datatype, except) => {
                let excluded = match except {
                    Some(except) => {
                        let d = self.text_deriv(except, text);
                        self.nullable(d)
                    }
                    None => false,
                };
                if datatype.allows(text) && !excluded {
                    EMPTY
                } else {
                    NOT_ALLOWED
                }
            }
            Pattern::List(inner) => {
                let mut current = inner;
                for token in text.split_whitespace() {
                    current = self.text_deriv(current, token);
                }
                if self.nullable(current) {
                    EMPTY
                } else {
                    NOT_ALLOWED
                }
            }
            _ => NOT_ALLOWED,
        }
    }

    /// Value match used for attributes and whitespace-only content
    fn value_matches(&mut self, p: PatternId, text: &str) -> bool {
        if self.nullable(p) && text.trim().is_empty() {
            return true;
        }
        let d = self.text_deriv(p, text);
        self.nullable(d)
    }

    pub fn start_tag_open_deriv(&mut self, p: PatternId, local: &str) -> PatternId {
        let key = (p, local.to_string());
        if let Some(hit) = self.memo_open.get(&key) {
            return *hit;
        }
        let result = self.start_tag_open_uncached(p, local);
        self.memo_open.insert(key, result);
        result
    }

    fn start_tag_open_uncached(&mut self, p: PatternId, local: &str) -> PatternId {
        match self.resolved(p) {
            Pattern::Choice(a, b) => {
                let da = self.start_tag_open_deriv(a, local);
                let db = self.start_tag_open_deriv(b, local);
                self.choice(da, db)
            }
            Pattern::Element(name, content) => {
                if name.contains(local) {
                    self.after(content, EMPTY)
                } else {
                    NOT_ALLOWED
                }
            }
            Pattern::Interleave(a, b) => {
                let da = self.start_tag_open_deriv(a, local);
                let left = self.apply_after(da, AfterOp::InterleaveRight(b));
                let db = self.start_tag_open_deriv(b, local);
                let right = self.apply_after(db, AfterOp::InterleaveLeft(a));
                self.choice(left, right)
            }
            Pattern::OneOrMore(a) => {
                let da = self.start_tag_open_deriv(a, local);
                let rest = self.zero_or_more(a);
                self.apply_after(da, AfterOp::GroupWith(rest))
            }
            Pattern::Group(a, b) => {
                let da = self.start_tag_open_deriv(a, local);
                let first = self.apply_after(da, AfterOp::GroupWith(b));
                if self.nullable(a) {
                    let db = self.start_tag_open_deriv(b, local);
                    self.choice(first, db)
                } else {
                    first
                }
            }
            Pattern::After(a, b) => {
                let da = self.start_tag_open_deriv(a, local);
                self.apply_after(da, AfterOp::AfterWith(b))
            }
            _ => NOT_ALLOWED,
        }
    }

    fn apply_after(&mut self, p: PatternId, op: AfterOp) -> PatternId {
        match self.get(p).clone() {
            Pattern::After(a, b) => {
                let continued = match op {
                    AfterOp::InterleaveRight(right) => self.interleave(b, right),
                    AfterOp::InterleaveLeft(left) => self.interleave(left, b),
                    AfterOp::GroupWith(rest) => self.group(b, rest),
                    AfterOp::AfterWith(outer) => self.after(b, outer),
                };
                self.after(a, continued)
            }
            Pattern::Choice(a, b) => {
                let da = self.apply_after(a, op);
                let db = self.apply_after(b, op);
                self.choice(da, db)
            }
            _ => NOT_ALLOWED,
        }
    }

    pub fn att_deriv(&mut self, p: PatternId, local: &str, value: &str) -> PatternId {
        match self.resolved(p) {
            Pattern::After(a, b) => {
                let da = self.att_deriv(a, local, value);
                self.after(da, b)
            }
            Pattern::Choice(a, b) => {
                let da = self.att_deriv(a, local, value);
                let db = self.att_deriv(b, local, value);
                self.choice(da, db)
            }
            Pattern::Group(a, b) => {
                let da = self.att_deriv(a, local, value);
                let left = self.group(da, b);
                let db = self.att_deriv(b, local, value);
                let right = self.group(a, db);
                self.choice(left, right)
            }
            Pattern::Interleave(a, b) => {
                let da = self.att_deriv(a, local, value);
                let left = self.interleave(da, b);
                let db = self.att_deriv(b, local, value);
                let right = self.interleave(a, db);
                self.choice(left, right)
            }
            Pattern::OneOrMore(a) => {
                let da = self.att_deriv(a, local, value);
                let rest = self.zero_or_more(a);
                self.group(da, rest)
            }
            Pattern::Attribute(name, content) => {
                if name.contains(local) && self.value_matches(content, value) {
                    EMPTY
                } else {
                    NOT_ALLOWED
                }
            }
            _ => NOT_ALLOWED,
        }
    }

    /// Close the start tag. With `lenient`, outstanding required attributes
    /// are dropped instead of failing, which lets validation carry on into
    /// the content after a missing attribute was reported.
    pub fn start_tag_close_deriv(&mut self, p: PatternId, lenient: bool) -> PatternId {
        if let Some(hit) = self.memo_close.get(&(p, lenient)) {
            return *hit;
        }
        let result = match self.resolved(p) {
            Pattern::After(a, b) => {
                let da = self.start_tag_close_deriv(a, lenient);
                self.after(da, b)
            }
            Pattern::Choice(a, b) => {
                let da = self.start_tag_close_deriv(a, lenient);
                let db = self.start_tag_close_deriv(b, lenient);
                self.choice(da, db)
            }
            Pattern::Group(a, b) => {
                let da = self.start_tag_close_deriv(a, lenient);
                let db = self.start_tag_close_deriv(b, lenient);
                self.group(da, db)
            }
            Pattern::Interleave(a, b) => {
                let da = self.start_tag_close_deriv(a, lenient);
                let db = self.start_tag_close_deriv(b, lenient);
                self.interleave(da, db)
            }
            Pattern::OneOrMore(a) => {
                let da = self.start_tag_close_deriv(a, lenient);
                self.one_or_more(da)
            }
            Pattern::Attribute(..) => {
                if lenient {
                    EMPTY
                } else {
                    NOT_ALLOWED
                }
            }
            _ => p,
        };
        self.memo_close.insert((p, lenient), result);
        result
    }

    pub fn end_tag_deriv(&mut self, p: PatternId) -> PatternId {
        if let Some(hit) = self.memo_end.get(&p) {
            return *hit;
        }
        let result = match self.get(p).clone() {
            Pattern::Choice(a, b) => {
                let da = self.end_tag_deriv(a);
                let db = self.end_tag_deriv(b);
                self.choice(da, db)
            }
            Pattern::After(a, b) => {
                if self.nullable(a) {
                    b
                } else {
                    NOT_ALLOWED
                }
            }
            _ => NOT_ALLOWED,
        };
        self.memo_end.insert(p, result);
        result
    }

    /// Continuation of an open element regardless of what remains of its
    /// content; used to resume after a content error
    pub fn skip_content(&mut self, p: PatternId) -> PatternId {
        match self.get(p).clone() {
            Pattern::Choice(a, b) => {
                let da = self.skip_content(a);
                let db = self.skip_content(b);
                self.choice(da, db)
            }
            Pattern::After(_, b) => b,
            _ => NOT_ALLOWED,
        }
    }

    /// Element names acceptable as the next child of `p`, for diagnostics
    pub fn expected_elements(&self, p: PatternId) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_expected(p, &mut HashSet::new(), &mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_expected(&self, p: PatternId, seen: &mut HashSet<PatternId>, out: &mut Vec<String>) {
        if !seen.insert(p) {
            return;
        }
        match self.resolved(p) {
            Pattern::Element(name, _) => out.push(name.to_string()),
            Pattern::Choice(a, b) | Pattern::Interleave(a, b) => {
                self.collect_expected(a, seen, out);
                self.collect_expected(b, seen, out);
            }
            Pattern::Group(a, b) => {
                self.collect_expected(a, seen, out);
                if self.nullable(a) {
                    self.collect_expected(b, seen, out);
                }
            }
            Pattern::OneOrMore(a) | Pattern::After(a, _) => self.collect_expected(a, seen, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::pattern::{NameClass, TEXT};
    use super::*;

    fn name(n: &str) -> NameClass {
        NameClass::Name(n.to_string())
    }

    #[test]
    fn test_element_sequence() {
        let mut arena = Arena::new();
        let a = arena.element(name("a"), EMPTY);
        let b = arena.element(name("b"), EMPTY);
        let seq = arena.group(a, b);

        let opened = arena.start_tag_open_deriv(seq, "a");
        assert_ne!(opened, NOT_ALLOWED);
        let closed = arena.start_tag_close_deriv(opened, false);
        let after_a = arena.end_tag_deriv(closed);
        assert!(!arena.nullable(after_a));
        assert_eq!(arena.start_tag_open_deriv(after_a, "a"), NOT_ALLOWED);
        assert_ne!(arena.start_tag_open_deriv(after_a, "b"), NOT_ALLOWED);
    }

    #[test]
    fn test_required_attribute() {
        let mut arena = Arena::new();
        let attr = arena.attribute(name("string"), TEXT);
        let el = arena.element(name("list"), attr);

        let opened = arena.start_tag_open_deriv(el, "list");
        assert_eq!(arena.start_tag_close_deriv(opened, false), NOT_ALLOWED);
        assert_ne!(arena.start_tag_close_deriv(opened, true), NOT_ALLOWED);

        let with_attr = arena.att_deriv(opened, "string", "Partners");
        assert_ne!(arena.start_tag_close_deriv(with_attr, false), NOT_ALLOWED);
        assert_eq!(arena.att_deriv(opened, "bogus", "x"), NOT_ALLOWED);
    }

    #[test]
    fn test_interleave_any_order() {
        let mut arena = Arena::new();
        let a = arena.element(name("a"), EMPTY);
        let b = arena.element(name("b"), EMPTY);
        let both = arena.interleave(a, b);

        for order in [["a", "b"], ["b", "a"]] {
            let mut p = both;
            for tag in order {
                let open = arena.start_tag_open_deriv(p, tag);
                let close = arena.start_tag_close_deriv(open, false);
                p = arena.end_tag_deriv(close);
                assert_ne!(p, NOT_ALLOWED);
            }
            assert!(arena.nullable(p));
        }
    }

    #[test]
    fn test_data_and_value() {
        let mut arena = Arena::new();
        let boolean = arena.data(super::super::pattern::Datatype::Boolean, None);
        assert_eq!(arena.text_deriv(boolean, "1"), EMPTY);
        assert_eq!(arena.text_deriv(boolean, "maybe"), NOT_ALLOWED);

        let v = arena.value(super::super::pattern::Datatype::Token, "top");
        assert_eq!(arena.text_deriv(v, " top "), EMPTY);
        assert_eq!(arena.text_deriv(v, "bottom"), NOT_ALLOWED);
    }

    #[test]
    fn test_expected_elements() {
        let mut arena = Arena::new();
        let a = arena.element(name("field"), EMPTY);
        let b = arena.element(name("button"), EMPTY);
        let either = arena.choice(a, b);
        let more = arena.one_or_more(either);
        assert_eq!(arena.expected_elements(more), vec!["button", "field"]);
    }
}
