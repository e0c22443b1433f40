//! RELAX NG (XML syntax) grammar compilation
//!
//! Supports grammar/start/define (with `combine`), include with overrides,
//! div, and the full pattern vocabulary except nested grammars and
//! externalRef. Foreign-namespace elements are treated as annotations and
//! ignored.

use super::error::{RngError, RngResult};
use super::pattern::{Arena, Datatype, NameClass, PatternId, EMPTY, NOT_ALLOWED, TEXT};
use crate::features::parsing::parse_document;
use crate::shared::models::{local_name, Element};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const RNG_NAMESPACE: &str = "http://relaxng.org/ns/structure/1.0";

const MAX_INCLUDE_DEPTH: usize = 16;

/// Compiled grammar: pattern arena plus start pattern
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(super) arena: Arena,
    pub(super) start: PatternId,
}

impl Grammar {
    pub fn from_file(path: &Path) -> RngResult<Self> {
        let source = read(path)?;
        Self::from_str_with_base(&source, path.parent())
    }

    /// Compile schema text; relative `include` hrefs resolve against `base_dir`
    pub fn from_str_with_base(source: &str, base_dir: Option<&Path>) -> RngResult<Self> {
        let document = parse_document(source)?;
        let mut compiler = Compiler::new(base_dir.map(Path::to_path_buf));
        let scope = Scope::root().enter(&document.root);
        compiler.compile_root(&document.root, &scope)?;
        compiler.finish()
    }

    /// Number of interned patterns (diagnostics only)
    pub fn size(&self) -> usize {
        self.arena.len()
    }
}

fn read(path: &Path) -> RngResult<String> {
    std::fs::read_to_string(path).map_err(|e| RngError::Io {
        path: path.display().to_string(),
        cause: e.to_string(),
    })
}

/// In-scope namespace bindings
#[derive(Debug, Clone, Default)]
struct Scope {
    default_ns: Option<String>,
    prefixes: HashMap<String, String>,
}

impl Scope {
    fn root() -> Self {
        Self::default()
    }

    fn enter(&self, el: &Element) -> Self {
        let declares = el
            .attributes
            .iter()
            .any(|(k, _)| k == "xmlns" || k.starts_with("xmlns:"));
        if !declares {
            return self.clone();
        }
        let mut next = self.clone();
        for (key, value) in &el.attributes {
            if key == "xmlns" {
                next.default_ns = Some(value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                next.prefixes.insert(prefix.to_string(), value.clone());
            }
        }
        next
    }

    /// Whether `el` is in the RELAX NG namespace. Undeclared unprefixed
    /// elements count as RELAX NG so bare hand-written schemas work.
    fn is_rng(&self, el: &Element) -> bool {
        match el.tag.split_once(':') {
            Some((prefix, _)) => self.prefixes.get(prefix).map(String::as_str) == Some(RNG_NAMESPACE),
            None => match &self.default_ns {
                Some(ns) => ns == RNG_NAMESPACE,
                None => true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    Choice,
    Interleave,
}

#[derive(Debug)]
struct Define {
    slot: usize,
    body: Option<PatternId>,
    combine: Option<Combine>,
}

struct Compiler {
    arena: Arena,
    defines: HashMap<String, Define>,
    start: Option<PatternId>,
    start_combine: Option<Combine>,
    base_dir: Option<PathBuf>,
    include_depth: usize,
}

impl Compiler {
    fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            arena: Arena::new(),
            defines: HashMap::new(),
            start: None,
            start_combine: None,
            base_dir,
            include_depth: 0,
        }
    }

    fn finish(mut self) -> RngResult<Grammar> {
        let start = self.start.ok_or(RngError::MissingStart)?;
        let mut names: Vec<(&String, &Define)> = self.defines.iter().collect();
        names.sort_by_key(|(name, _)| name.as_str());
        for (name, define) in names {
            match define.body {
                Some(body) => self.arena.set_ref(define.slot, body),
                None => return Err(RngError::UndefinedRef(name.clone())),
            }
        }
        debug!(patterns = self.arena.len(), defines = self.defines.len(), "Compiled RELAX NG grammar");
        Ok(Grammar {
            arena: self.arena,
            start,
        })
    }

    fn compile_root(&mut self, root: &Element, scope: &Scope) -> RngResult<()> {
        if !scope.is_rng(root) {
            return Err(RngError::Syntax(format!(
                "root element <{}> is not a RELAX NG element",
                root.tag
            )));
        }
        if root.local_name() == "grammar" {
            self.grammar_content(root, scope, &HashSet::new())
        } else {
            let pattern = self.pattern(root, scope)?;
            self.start = Some(pattern);
            Ok(())
        }
    }

    /// Process grammar content. Components named in `overridden` (and
    /// `start`, when present there) are skipped; the including grammar
    /// supplies them.
    fn grammar_content(
        &mut self,
        grammar: &Element,
        scope: &Scope,
        overridden: &HashSet<String>,
    ) -> RngResult<()> {
        for child in grammar.elements() {
            let child_scope = scope.enter(child);
            if !child_scope.is_rng(child) {
                continue;
            }
            match child.local_name() {
                "start" => {
                    if overridden.contains("start") {
                        continue;
                    }
                    let body = self.group_of(child, &child_scope)?;
                    self.add_start(body, combine_attr(child)?);
                }
                "define" => {
                    let name = required_attr(child, "name")?;
                    if overridden.contains(name) {
                        continue;
                    }
                    let body = self.group_of(child, &child_scope)?;
                    self.add_define(name, body, combine_attr(child)?);
                }
                "include" => self.include(child, &child_scope)?,
                "div" => self.grammar_content(child, &child_scope, overridden)?,
                other => {
                    return Err(RngError::Syntax(format!(
                        "unexpected <{}> in grammar",
                        other
                    )))
                }
            }
        }
        Ok(())
    }

    fn include(&mut self, include: &Element, scope: &Scope) -> RngResult<()> {
        let href = required_attr(include, "href")?;
        if href.contains("://") {
            return Err(RngError::Unsupported(format!("remote include '{}'", href)));
        }
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(RngError::Syntax(format!("include nesting too deep at '{}'", href)));
        }

        let path = match &self.base_dir {
            Some(base) => base.join(href),
            None => PathBuf::from(href),
        };
        let source = read(&path)?;
        let document = parse_document(&source)?;
        let included_scope = Scope::root().enter(&document.root);
        if !included_scope.is_rng(&document.root) || document.root.local_name() != "grammar" {
            return Err(RngError::Syntax(format!(
                "included schema '{}' is not a grammar",
                href
            )));
        }

        let mut overridden = HashSet::new();
        collect_overrides(include, scope, &mut overridden);

        let saved_base = std::mem::replace(&mut self.base_dir, path.parent().map(Path::to_path_buf));
        self.include_depth += 1;
        let result = self.grammar_content(&document.root, &included_scope, &overridden);
        self.include_depth -= 1;
        self.base_dir = saved_base;
        result?;

        // Overriding components from the include element itself
        self.grammar_content(include, scope, &HashSet::new())
    }

    fn add_start(&mut self, body: PatternId, combine: Option<Combine>) {
        self.start = Some(match self.start {
            None => {
                self.start_combine = combine;
                body
            }
            Some(existing) => match combine.or(self.start_combine) {
                Some(Combine::Interleave) => self.arena.interleave(existing, body),
                _ => self.arena.choice(existing, body),
            },
        });
    }

    fn add_define(&mut self, name: &str, body: PatternId, combine: Option<Combine>) {
        self.slot_for(name);
        let (existing, prior) = match self.defines.get(name) {
            Some(define) => (define.body, define.combine),
            None => (None, None),
        };
        let combined = match existing {
            None => body,
            Some(existing) => {
                let mode = combine.or(prior);
                if mode.is_none() {
                    debug!(define = name, "Duplicate define without combine; treating as choice");
                }
                match mode {
                    Some(Combine::Interleave) => self.arena.interleave(existing, body),
                    _ => self.arena.choice(existing, body),
                }
            }
        };
        if let Some(define) = self.defines.get_mut(name) {
            define.body = Some(combined);
            define.combine = define.combine.or(combine);
        }
    }

    fn slot_for(&mut self, name: &str) -> usize {
        if let Some(define) = self.defines.get(name) {
            return define.slot;
        }
        let (slot, _) = self.arena.new_ref();
        self.defines.insert(
            name.to_string(),
            Define {
                slot,
                body: None,
                combine: None,
            },
        );
        slot
    }

    /// Group of all RELAX NG pattern children of `el`
    fn group_of(&mut self, el: &Element, scope: &Scope) -> RngResult<PatternId> {
        let patterns = self.child_patterns(el.elements(), scope)?;
        Ok(self.fold_group(patterns))
    }

    fn child_patterns<'e>(
        &mut self,
        children: impl Iterator<Item = &'e Element>,
        scope: &Scope,
    ) -> RngResult<Vec<PatternId>> {
        let mut out = Vec::new();
        for child in children {
            let child_scope = scope.enter(child);
            if child_scope.is_rng(child) {
                out.push(self.pattern(child, &child_scope)?);
            }
        }
        Ok(out)
    }

    fn fold_group(&mut self, patterns: Vec<PatternId>) -> PatternId {
        patterns
            .into_iter()
            .rev()
            .reduce(|acc, p| self.arena.group(p, acc))
            .unwrap_or(EMPTY)
    }

    fn pattern(&mut self, el: &Element, scope: &Scope) -> RngResult<PatternId> {
        match el.local_name() {
            "element" => {
                let (name, rest) = self.name_class_and_rest(el, scope)?;
                let content = self.child_patterns(rest.into_iter(), scope)?;
                let content = self.fold_group(content);
                Ok(self.arena.element(name, content))
            }
            "attribute" => {
                let (name, rest) = self.name_class_and_rest(el, scope)?;
                let content = self.child_patterns(rest.into_iter(), scope)?;
                let content = if content.is_empty() {
                    TEXT
                } else {
                    self.fold_group(content)
                };
                Ok(self.arena.attribute(name, content))
            }
            "group" => self.group_of(el, scope),
            "interleave" => {
                let patterns = self.child_patterns(el.elements(), scope)?;
                Ok(patterns
                    .into_iter()
                    .reduce(|acc, p| self.arena.interleave(acc, p))
                    .unwrap_or(EMPTY))
            }
            "choice" => {
                let patterns = self.child_patterns(el.elements(), scope)?;
                Ok(patterns
                    .into_iter()
                    .reduce(|acc, p| self.arena.choice(acc, p))
                    .unwrap_or(NOT_ALLOWED))
            }
            "optional" => {
                let inner = self.group_of(el, scope)?;
                Ok(self.arena.optional(inner))
            }
            "zeroOrMore" => {
                let inner = self.group_of(el, scope)?;
                Ok(self.arena.zero_or_more(inner))
            }
            "oneOrMore" => {
                let inner = self.group_of(el, scope)?;
                Ok(self.arena.one_or_more(inner))
            }
            "mixed" => {
                let inner = self.group_of(el, scope)?;
                Ok(self.arena.interleave(inner, TEXT))
            }
            "list" => {
                let inner = self.group_of(el, scope)?;
                Ok(self.arena.list(inner))
            }
            "text" => Ok(TEXT),
            "empty" => Ok(EMPTY),
            "notAllowed" => Ok(NOT_ALLOWED),
            "value" => {
                let datatype = Datatype::from_name(el.attr("type").unwrap_or("token"));
                Ok(self.arena.value(datatype, el.text()))
            }
            "data" => {
                let datatype = Datatype::from_name(required_attr(el, "type")?);
                let mut except = None;
                for child in el.elements() {
                    let child_scope = scope.enter(child);
                    if child_scope.is_rng(child) && child.local_name() == "except" {
                        let patterns = self.child_patterns(child.elements(), &child_scope)?;
                        except = patterns
                            .into_iter()
                            .reduce(|acc, p| self.arena.choice(acc, p));
                    }
                }
                Ok(self.arena.data(datatype, except))
            }
            "ref" => {
                let name = required_attr(el, "name")?;
                let slot = self.slot_for(name);
                Ok(self.arena.ref_pattern(slot))
            }
            "grammar" | "parentRef" | "externalRef" => {
                Err(RngError::Unsupported(format!("<{}>", el.local_name())))
            }
            other => Err(RngError::Syntax(format!("unknown pattern <{}>", other))),
        }
    }

    /// Name class from the `name` attribute or the first child, and the
    /// remaining pattern children
    fn name_class_and_rest<'e>(
        &mut self,
        el: &'e Element,
        scope: &Scope,
    ) -> RngResult<(NameClass, Vec<&'e Element>)> {
        let children: Vec<&Element> = el
            .elements()
            .filter(|c| scope.enter(c).is_rng(c))
            .collect();

        if let Some(name) = el.attr("name") {
            return Ok((NameClass::Name(local_name(name.trim()).to_string()), children));
        }
        let (first, rest) = children.split_first().ok_or_else(|| {
            RngError::Syntax(format!("<{}> without a name", el.local_name()))
        })?;
        let name = name_class(first, &scope.enter(first))?;
        Ok((name, rest.to_vec()))
    }
}

fn name_class(el: &Element, scope: &Scope) -> RngResult<NameClass> {
    match el.local_name() {
        "name" => Ok(NameClass::Name(local_name(el.text().trim()).to_string())),
        "anyName" | "nsName" => {
            let except = el
                .elements()
                .find(|c| scope.enter(c).is_rng(c) && c.local_name() == "except");
            match except {
                Some(except) => {
                    let inner = choice_of_name_classes(except, &scope.enter(except))?;
                    Ok(NameClass::AnyNameExcept(Box::new(inner)))
                }
                None => Ok(NameClass::AnyName),
            }
        }
        "choice" => choice_of_name_classes(el, scope),
        other => Err(RngError::Syntax(format!("unknown name class <{}>", other))),
    }
}

fn choice_of_name_classes(el: &Element, scope: &Scope) -> RngResult<NameClass> {
    let mut classes = Vec::new();
    for child in el.elements() {
        let child_scope = scope.enter(child);
        if child_scope.is_rng(child) {
            classes.push(name_class(child, &child_scope)?);
        }
    }
    classes
        .into_iter()
        .reduce(|a, b| NameClass::Choice(Box::new(a), Box::new(b)))
        .ok_or_else(|| RngError::Syntax("empty name class choice".to_string()))
}

fn collect_overrides(el: &Element, scope: &Scope, out: &mut HashSet<String>) {
    for child in el.elements() {
        let child_scope = scope.enter(child);
        if !child_scope.is_rng(child) {
            continue;
        }
        match child.local_name() {
            "start" => {
                out.insert("start".to_string());
            }
            "define" => {
                if let Some(name) = child.attr("name") {
                    out.insert(name.to_string());
                }
            }
            "div" => collect_overrides(child, &child_scope, out),
            _ => {}
        }
    }
}

fn combine_attr(el: &Element) -> RngResult<Option<Combine>> {
    match el.attr("combine") {
        None => Ok(None),
        Some("choice") => Ok(Some(Combine::Choice)),
        Some("interleave") => Ok(Some(Combine::Interleave)),
        Some(other) => Err(RngError::Syntax(format!("invalid combine '{}'", other))),
    }
}

fn required_attr<'e>(el: &'e Element, name: &str) -> RngResult<&'e str> {
    el.attr(name).ok_or_else(|| {
        RngError::Syntax(format!("<{}> requires a '{}' attribute", el.local_name(), name))
    })
}
