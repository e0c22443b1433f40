//! Pattern arena
//!
//! Patterns are hash-consed into an arena and addressed by [`PatternId`].
//! Constructors apply the usual simplifications (notAllowed/empty
//! absorption, choice flattening and dedup) so derivatives stay small.
//! `Ref` nodes are resolved lazily through the define table, which is how
//! recursive grammars are represented without cyclic ownership.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(u32);

impl PatternId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

pub const EMPTY: PatternId = PatternId(0);
pub const NOT_ALLOWED: PatternId = PatternId(1);
pub const TEXT: PatternId = PatternId(2);

/// Name classes match on local names; namespaces are not distinguished
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameClass {
    Name(String),
    AnyName,
    AnyNameExcept(Box<NameClass>),
    Choice(Box<NameClass>, Box<NameClass>),
}

impl NameClass {
    pub fn contains(&self, local: &str) -> bool {
        match self {
            NameClass::Name(name) => name == local,
            NameClass::AnyName => true,
            NameClass::AnyNameExcept(except) => !except.contains(local),
            NameClass::Choice(a, b) => a.contains(local) || b.contains(local),
        }
    }
}

impl fmt::Display for NameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameClass::Name(name) => f.write_str(name),
            NameClass::AnyName | NameClass::AnyNameExcept(_) => f.write_str("*"),
            NameClass::Choice(a, b) => write!(f, "{} | {}", a, b),
        }
    }
}

/// Datatypes with a lexical check; everything else accepts any string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Token,
    String,
    Boolean,
    Integer,
    Decimal,
    Any,
}

impl Datatype {
    pub fn from_name(name: &str) -> Self {
        match name {
            "token" => Datatype::Token,
            "string" => Datatype::String,
            "boolean" => Datatype::Boolean,
            "int" | "integer" | "long" | "short" | "byte" | "nonNegativeInteger"
            | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" | "unsignedInt"
            | "unsignedLong" | "unsignedShort" | "unsignedByte" => Datatype::Integer,
            "decimal" | "float" | "double" => Datatype::Decimal,
            _ => Datatype::Any,
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        let trimmed = value.trim();
        match self {
            Datatype::Boolean => matches!(trimmed, "true" | "false" | "1" | "0"),
            Datatype::Integer => trimmed
                .strip_prefix('+')
                .unwrap_or(trimmed)
                .parse::<i128>()
                .is_ok(),
            Datatype::Decimal => trimmed.parse::<f64>().is_ok(),
            Datatype::Token | Datatype::String | Datatype::Any => true,
        }
    }

    /// Value equality: `string` compares exactly, other types compare
    /// whitespace-normalized
    pub fn equal(&self, expected: &str, actual: &str) -> bool {
        match self {
            Datatype::String => expected == actual,
            _ => normalize_whitespace(expected) == normalize_whitespace(actual),
        }
    }
}

pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Empty,
    NotAllowed,
    Text,
    Choice(PatternId, PatternId),
    Interleave(PatternId, PatternId),
    Group(PatternId, PatternId),
    OneOrMore(PatternId),
    List(PatternId),
    Data(Datatype, Option<PatternId>),
    Value(Datatype, String),
    Attribute(NameClass, PatternId),
    Element(NameClass, PatternId),
    After(PatternId, PatternId),
    /// Index into the define table
    Ref(usize),
}

/// Hash-consed pattern storage plus derivative memo tables
#[derive(Debug, Clone)]
pub struct Arena {
    patterns: Vec<Pattern>,
    index: HashMap<Pattern, PatternId>,
    /// Define bodies, indexed by `Pattern::Ref`
    refs: Vec<Option<PatternId>>,
    pub(super) memo_open: HashMap<(PatternId, String), PatternId>,
    pub(super) memo_close: HashMap<(PatternId, bool), PatternId>,
    pub(super) memo_end: HashMap<PatternId, PatternId>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    pub fn new() -> Self {
        let mut arena = Self {
            patterns: Vec::new(),
            index: HashMap::new(),
            refs: Vec::new(),
            memo_open: HashMap::new(),
            memo_close: HashMap::new(),
            memo_end: HashMap::new(),
        };
        arena.intern(Pattern::Empty);
        arena.intern(Pattern::NotAllowed);
        arena.intern(Pattern::Text);
        arena
    }

    fn intern(&mut self, pattern: Pattern) -> PatternId {
        if let Some(id) = self.index.get(&pattern) {
            return *id;
        }
        let id = PatternId(self.patterns.len() as u32);
        self.patterns.push(pattern.clone());
        self.index.insert(pattern, id);
        id
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.index()]
    }

    /// Pattern behind `id`, following `Ref` links. An unresolved ref behaves
    /// as notAllowed.
    pub fn resolved(&self, mut id: PatternId) -> Pattern {
        // Ref chains are acyclic after compilation; the bound guards against
        // a malformed define table
        for _ in 0..=self.refs.len() {
            match self.get(id) {
                Pattern::Ref(slot) => match self.refs.get(*slot).copied().flatten() {
                    Some(body) => id = body,
                    None => return Pattern::NotAllowed,
                },
                other => return other.clone(),
            }
        }
        Pattern::NotAllowed
    }

    /// Reserve a define slot and return its ref pattern
    pub fn new_ref(&mut self) -> (usize, PatternId) {
        let slot = self.refs.len();
        self.refs.push(None);
        (slot, self.intern(Pattern::Ref(slot)))
    }

    pub fn ref_pattern(&mut self, slot: usize) -> PatternId {
        self.intern(Pattern::Ref(slot))
    }

    pub fn set_ref(&mut self, slot: usize, body: PatternId) {
        self.refs[slot] = Some(body);
    }

    pub fn ref_body(&self, slot: usize) -> Option<PatternId> {
        self.refs.get(slot).copied().flatten()
    }

    // ── constructors ─────────────────────────────────────────────────────

    pub fn choice(&mut self, a: PatternId, b: PatternId) -> PatternId {
        if a == NOT_ALLOWED || a == b {
            return b;
        }
        if b == NOT_ALLOWED {
            return a;
        }
        let mut alternatives = BTreeSet::new();
        self.collect_alternatives(a, &mut alternatives);
        self.collect_alternatives(b, &mut alternatives);

        let mut iter = alternatives.into_iter().rev();
        let Some(mut acc) = iter.next() else {
            return NOT_ALLOWED;
        };
        for alt in iter {
            acc = self.intern(Pattern::Choice(alt, acc));
        }
        acc
    }

    fn collect_alternatives(&self, id: PatternId, out: &mut BTreeSet<PatternId>) {
        match self.get(id) {
            Pattern::Choice(a, b) => {
                let (a, b) = (*a, *b);
                self.collect_alternatives(a, out);
                self.collect_alternatives(b, out);
            }
            Pattern::NotAllowed => {}
            _ => {
                out.insert(id);
            }
        }
    }

    pub fn group(&mut self, a: PatternId, b: PatternId) -> PatternId {
        if a == NOT_ALLOWED || b == NOT_ALLOWED {
            return NOT_ALLOWED;
        }
        if a == EMPTY {
            return b;
        }
        if b == EMPTY {
            return a;
        }
        self.intern(Pattern::Group(a, b))
    }

    pub fn interleave(&mut self, a: PatternId, b: PatternId) -> PatternId {
        if a == NOT_ALLOWED || b == NOT_ALLOWED {
            return NOT_ALLOWED;
        }
        if a == EMPTY {
            return b;
        }
        if b == EMPTY {
            return a;
        }
        self.intern(Pattern::Interleave(a, b))
    }

    pub fn after(&mut self, a: PatternId, b: PatternId) -> PatternId {
        if a == NOT_ALLOWED || b == NOT_ALLOWED {
            return NOT_ALLOWED;
        }
        self.intern(Pattern::After(a, b))
    }

    pub fn one_or_more(&mut self, p: PatternId) -> PatternId {
        if p == NOT_ALLOWED || p == EMPTY {
            return p;
        }
        self.intern(Pattern::OneOrMore(p))
    }

    pub fn optional(&mut self, p: PatternId) -> PatternId {
        self.choice(p, EMPTY)
    }

    pub fn zero_or_more(&mut self, p: PatternId) -> PatternId {
        let more = self.one_or_more(p);
        self.choice(more, EMPTY)
    }

    pub fn list(&mut self, p: PatternId) -> PatternId {
        self.intern(Pattern::List(p))
    }

    pub fn data(&mut self, datatype: Datatype, except: Option<PatternId>) -> PatternId {
        self.intern(Pattern::Data(datatype, except))
    }

    pub fn value(&mut self, datatype: Datatype, value: impl Into<String>) -> PatternId {
        self.intern(Pattern::Value(datatype, value.into()))
    }

    pub fn attribute(&mut self, name: NameClass, content: PatternId) -> PatternId {
        self.intern(Pattern::Attribute(name, content))
    }

    pub fn element(&mut self, name: NameClass, content: PatternId) -> PatternId {
        self.intern(Pattern::Element(name, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_dedups() {
        let mut arena = Arena::new();
        let a = arena.element(NameClass::Name("a".into()), EMPTY);
        let b = arena.element(NameClass::Name("a".into()), EMPTY);
        assert_eq!(a, b);
    }

    #[test]
    fn test_choice_is_flattened_and_ordered() {
        let mut arena = Arena::new();
        let a = arena.element(NameClass::Name("a".into()), EMPTY);
        let b = arena.element(NameClass::Name("b".into()), EMPTY);
        let ab = arena.choice(a, b);
        let ba = arena.choice(b, a);
        assert_eq!(ab, ba);
        let again = arena.choice(ab, a);
        assert_eq!(again, ab);
    }

    #[test]
    fn test_absorption() {
        let mut arena = Arena::new();
        let a = arena.element(NameClass::Name("a".into()), EMPTY);
        assert_eq!(arena.group(EMPTY, a), a);
        assert_eq!(arena.group(NOT_ALLOWED, a), NOT_ALLOWED);
        assert_eq!(arena.choice(NOT_ALLOWED, a), a);
        assert_eq!(arena.after(a, NOT_ALLOWED), NOT_ALLOWED);
    }

    #[test]
    fn test_refs_resolve_lazily() {
        let mut arena = Arena::new();
        let (slot, r) = arena.new_ref();
        assert_eq!(arena.resolved(r), Pattern::NotAllowed);
        let a = arena.element(NameClass::Name("a".into()), r);
        arena.set_ref(slot, a);
        assert!(matches!(arena.resolved(r), Pattern::Element(..)));
    }

    #[test]
    fn test_datatypes() {
        assert!(Datatype::Boolean.allows(" True ".to_lowercase().as_str()));
        assert!(!Datatype::Boolean.allows("yes"));
        assert!(Datatype::Integer.allows("+42"));
        assert!(!Datatype::Integer.allows("4.2"));
        assert!(Datatype::Decimal.allows("4.2"));
        assert!(Datatype::Token.equal("a  b", " a b "));
        assert!(!Datatype::String.equal("a  b", "a b"));
    }

    #[test]
    fn test_name_class_except() {
        let nc = NameClass::AnyNameExcept(Box::new(NameClass::Name("x".into())));
        assert!(nc.contains("y"));
        assert!(!nc.contains("x"));
    }
}
