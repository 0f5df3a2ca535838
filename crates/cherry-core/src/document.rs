//! Document model and assembly driver
//!
//! A [`Document`] owns its [`Section`]s; a section owns its [`Entry`]s and
//! [`List`]s. Entries and lists live in separate namespaces, so a section
//! may hold an entry and a list under the same id.
//!
//! [`parse`] is the entry point: it pulls statements from the parser and
//! files them under the most recent section header. The model is only
//! built here; callers get a query-only view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostic, Error, Result};
use crate::parser::ast::Statement;
use crate::parser::tokenizer::Span;
use crate::parser::Parser;
use crate::value::{Coerced, Number, Value, ValueKind};

// ── Entry ─────────────────────────────────────────────────

/// A named scalar value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    id: String,
    value: Value,
    span: Span,
}

impl Entry {
    pub fn new(id: impl Into<String>, value: Value, span: Span) -> Self {
        Entry {
            id: id.into(),
            value,
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Position of the `set` keyword that declared this entry
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    pub fn as_boolean(&self) -> Coerced<bool> {
        self.value.as_boolean()
    }

    pub fn as_number<T: Number>(&self) -> Coerced<T> {
        self.value.as_number()
    }

    pub fn is_negative(&self) -> Coerced<bool> {
        self.value.is_negative()
    }
}

// ── List ──────────────────────────────────────────────────

/// A named, ordered, non-empty sequence of literals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    id: String,
    elements: Vec<Value>,
    span: Span,
}

impl List {
    pub fn new(id: impl Into<String>, elements: Vec<Value>, span: Span) -> Self {
        List {
            id: id.into(),
            elements,
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    pub fn element(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn element_as_string(&self, index: usize) -> Coerced<String> {
        match self.checked(index) {
            Ok(v) => Coerced::ok(v.raw.clone()),
            Err(d) => Coerced::failed(String::new(), d),
        }
    }

    pub fn element_as_number<T: Number>(&self, index: usize) -> Coerced<T> {
        match self.checked(index) {
            Ok(v) => v.as_number(),
            Err(d) => Coerced::failed(T::default(), d),
        }
    }

    pub fn element_as_boolean(&self, index: usize) -> Coerced<bool> {
        match self.checked(index) {
            Ok(v) => v.as_boolean(),
            Err(d) => Coerced::failed(false, d),
        }
    }

    pub fn element_is_negative(&self, index: usize) -> Coerced<bool> {
        match self.checked(index) {
            Ok(v) => v.is_negative(),
            Err(d) => Coerced::failed(false, d),
        }
    }

    fn checked(&self, index: usize) -> std::result::Result<&Value, Diagnostic> {
        self.elements.get(index).ok_or_else(|| {
            Diagnostic::coercion(
                "element",
                self.span,
                format!("an index below {} for list `{}`", self.len(), self.id),
            )
            .found(index.to_string())
        })
    }
}

// ── Section ───────────────────────────────────────────────

/// A named group of entries and lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: String,
    span: Span,
    entries: BTreeMap<String, Entry>,
    lists: BTreeMap<String, List>,
}

impl Section {
    pub fn new(id: impl Into<String>, span: Span) -> Self {
        Section {
            id: id.into(),
            span,
            entries: BTreeMap::new(),
            lists: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position of the `@` that opened this section
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.lists.get(id)
    }

    /// Entries in id order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Lists in id order
    pub fn lists(&self) -> impl Iterator<Item = &List> {
        self.lists.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.lists.is_empty()
    }

    fn add_entry(&mut self, entry: Entry) -> std::result::Result<(), Diagnostic> {
        if self.entries.contains_key(&entry.id) {
            return Err(Diagnostic::semantic(
                "assignment",
                entry.span,
                format!("an entry id not already used in section `{}`", self.id),
            )
            .found(entry.id));
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn add_list(&mut self, list: List) -> std::result::Result<(), Diagnostic> {
        if self.lists.contains_key(&list.id) {
            return Err(Diagnostic::semantic(
                "assignment",
                list.span,
                format!("a list id not already used in section `{}`", self.id),
            )
            .found(list.id));
        }
        self.lists.insert(list.id.clone(), list);
        Ok(())
    }
}

// ── Document ──────────────────────────────────────────────

/// Root of a parsed Cherry source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    sections: BTreeMap<String, Section>,
}

impl Document {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Sections in id order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Result of one parse pass
///
/// `document` holds everything assembled before the pass ended, even when
/// `error` is set. `rejected` lists statements that were skipped without
/// stopping the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub document: Document,
    pub error: Option<Diagnostic>,
    pub rejected: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// True if the whole source was accepted without diagnostics
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.rejected.is_empty()
    }

    /// All diagnostics in source order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.rejected.iter().chain(self.error.iter())
    }

    pub fn into_result(self) -> Result<Document> {
        if let Some(d) = self.error {
            return Err(Error::Parse(d));
        }
        match self.rejected.into_iter().next() {
            Some(d) => Err(Error::Rejected(d)),
            None => Ok(self.document),
        }
    }
}

// ── Assembly ──────────────────────────────────────────────

/// Parse Cherry source text into a document
///
/// Never fails outright: a lexical or syntax error ends the pass and is
/// returned in [`ParseOutcome::error`] next to the partial document.
pub fn parse(source: &str) -> ParseOutcome {
    let mut parser = Parser::new(source);
    let mut assembler = Assembler::default();

    loop {
        let statement = parser.next_statement();
        tracing::trace!(?statement, "statement");

        match statement {
            Statement::EndOfInput => return assembler.finish(None),
            Statement::SectionHeader { id, span } => assembler.install_section(id, span),
            Statement::ScalarAssignment(entry) => assembler.attach_entry(entry),
            Statement::ListAssignment(list) => assembler.attach_list(list),
            Statement::Invalid(diagnostic) => return assembler.finish(Some(diagnostic)),
        }
    }
}

/// Parse Cherry source text, failing on the first diagnostic of any kind
pub fn parse_strict(source: &str) -> Result<Document> {
    parse(source).into_result()
}

#[derive(Default)]
struct Assembler {
    document: Document,
    current: Option<String>,
    rejected: Vec<Diagnostic>,
}

impl Assembler {
    fn install_section(&mut self, id: String, span: Span) {
        let section = Section::new(id.clone(), span);
        if self.document.sections.insert(id.clone(), section).is_some() {
            tracing::debug!(section = %id, line = span.line, "section redeclared; replacing");
        } else {
            tracing::debug!(section = %id, line = span.line, "section opened");
        }
        self.current = Some(id);
    }

    fn attach_entry(&mut self, entry: Entry) {
        let result = match self.current_section() {
            Some(section) => section.add_entry(entry),
            None => Err(no_section(entry.span, &entry.id)),
        };
        self.record(result);
    }

    fn attach_list(&mut self, list: List) {
        let result = match self.current_section() {
            Some(section) => section.add_list(list),
            None => Err(no_section(list.span, &list.id)),
        };
        self.record(result);
    }

    fn current_section(&mut self) -> Option<&mut Section> {
        let id = self.current.as_ref()?;
        self.document.sections.get_mut(id)
    }

    fn record(&mut self, result: std::result::Result<(), Diagnostic>) {
        if let Err(diagnostic) = result {
            tracing::warn!(%diagnostic, "statement skipped");
            self.rejected.push(diagnostic);
        }
    }

    fn finish(self, error: Option<Diagnostic>) -> ParseOutcome {
        match error {
            Some(ref d) => tracing::debug!(error = %d, sections = self.document.len(), "parse stopped"),
            None => tracing::debug!(sections = self.document.len(), "parse complete"),
        }
        ParseOutcome {
            document: self.document,
            error,
            rejected: self.rejected,
        }
    }
}

fn no_section(span: Span, id: &str) -> Diagnostic {
    Diagnostic::semantic("assignment", span, "a section header before the first assignment")
        .found(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;

    const SAMPLE: &str = r#"
@ User:
set "Alice", name
set 18, age
@ Video:
set { 255, 255, 255, }, color
"#;

    #[test]
    fn test_end_to_end_sample() {
        let outcome = parse(SAMPLE);
        assert!(outcome.is_clean());
        let doc = outcome.document;
        assert_eq!(doc.len(), 2);

        let user = doc.section("User").unwrap();
        assert_eq!(user.entry("name").unwrap().as_str(), "Alice");
        assert_eq!(user.entry("age").unwrap().as_number::<i32>().value(), 18);

        let color = doc.section("Video").unwrap().list("color").unwrap();
        assert_eq!(color.len(), 3);
        assert_eq!(color.element_as_number::<i32>(0).value(), 255);
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let doc = parse(SAMPLE).document;
        assert!(doc.section("Audio").is_none());
        let user = doc.section("User").unwrap();
        assert!(user.entry("email").is_none());
        assert!(user.list("name").is_none());
    }

    #[test]
    fn test_entry_and_list_share_id() {
        let doc = parse_strict("@ S:\nset 1, x\nset { 2, 3 }, x").unwrap();
        let section = doc.section("S").unwrap();
        assert_eq!(section.entry("x").unwrap().as_str(), "1");
        assert_eq!(section.list("x").unwrap().len(), 2);
    }

    #[test]
    fn test_redeclared_section_replaces() {
        let doc = parse_strict("@ A:\nset 1, old\n@ B:\n@ A:\nset 2, new").unwrap();
        let a = doc.section("A").unwrap();
        assert!(a.entry("old").is_none());
        assert_eq!(a.entry("new").unwrap().as_number::<u8>().value(), 2);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_assignment_before_section_is_recovered() {
        let outcome = parse("set 1, stray\nset {1}, strays\n@ A:\nset 2, kept");
        assert!(outcome.error.is_none());
        assert_eq!(outcome.rejected.len(), 2);
        assert!(outcome
            .rejected
            .iter()
            .all(|d| d.kind == DiagnosticKind::Semantic));
        assert_eq!(outcome.rejected[0].found.as_deref(), Some("stray"));
        assert_eq!(outcome.rejected[1].span.line, 2);

        let a = outcome.document.section("A").unwrap();
        assert_eq!(a.entry("kept").unwrap().as_str(), "2");
    }

    #[test]
    fn test_duplicate_entry_is_recovered() {
        let outcome = parse("@ A:\nset 1, x\nset 2, x\nset 3, y");
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].span.line, 3);
        let a = outcome.document.section("A").unwrap();
        assert_eq!(a.entry("x").unwrap().as_str(), "1");
        assert!(a.entry("y").is_some());
    }

    #[test]
    fn test_duplicate_list_is_recovered() {
        let outcome = parse("@ A:\nset {1}, x\nset {2, 3}, x");
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.document.section("A").unwrap().list("x").unwrap().len(), 1);
    }

    #[test]
    fn test_syntax_error_keeps_partial_document() {
        let outcome = parse("@ A:\nset 1, x\n@ B:\nset {}, broken\nset 2, never");
        let error = outcome.error.clone().unwrap();
        assert_eq!(error.kind, DiagnosticKind::Syntax);
        assert_eq!(error.span.line, 4);

        let doc = &outcome.document;
        assert_eq!(doc.section("A").unwrap().entry("x").unwrap().as_str(), "1");
        let b = doc.section("B").unwrap();
        assert!(b.is_empty());
        assert!(b.entry("never").is_none());
    }

    #[test]
    fn test_lexical_error_stops_pass() {
        let outcome = parse("@ A:\nset 1.2.3, v\nset 4, w");
        assert_eq!(outcome.error.unwrap().kind, DiagnosticKind::Lexical);
        assert!(outcome.document.section("A").unwrap().is_empty());
    }

    #[test]
    fn test_parse_strict_errors() {
        match parse_strict("@ A:\nset 1 x") {
            Err(Error::Parse(d)) => assert_eq!(d.rule, "assignment"),
            other => panic!("unexpected {:?}", other),
        }
        match parse_strict("set 1, x\n@ A:") {
            Err(Error::Rejected(d)) => assert_eq!(d.kind, DiagnosticKind::Semantic),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_diagnostics_in_order() {
        let outcome = parse("set 1, x\n@ A:\nset 1, y\nset 1, y\n@");
        let lines: Vec<usize> = outcome.diagnostics().map(|d| d.span.line).collect();
        assert_eq!(lines, vec![1, 4, 5]);
    }

    #[test]
    fn test_empty_source() {
        let outcome = parse("  ; nothing\n");
        assert!(outcome.is_clean());
        assert!(outcome.document.is_empty());
    }

    #[test]
    fn test_list_index_out_of_range() {
        let doc = parse_strict("@ V:\nset { 1, 2 }, pair").unwrap();
        let pair = doc.section("V").unwrap().list("pair").unwrap();

        let c = pair.element_as_number::<i32>(2);
        assert_eq!(c.value, 0);
        let d = c.diagnostic.unwrap();
        assert_eq!(d.rule, "element");
        assert_eq!(d.found.as_deref(), Some("2"));

        let s = pair.element_as_string(5);
        assert_eq!(s.value, "");
        assert!(!s.is_ok());
        assert_eq!(pair.element_as_string(1).value(), "2");
    }

    #[test]
    fn test_list_element_coercions() {
        let doc = parse_strict("@ V:\nset { -3, yes, 'txt' }, mixed").unwrap();
        let mixed = doc.section("V").unwrap().list("mixed").unwrap();
        assert!(mixed.element_is_negative(0).value());
        assert!(mixed.element_as_boolean(1).value());
        assert!(!mixed.element_as_number::<i32>(2).is_ok());
        assert_eq!(mixed.element(2).unwrap().span.column, 16);
    }

    #[test]
    fn test_strings_decoded_per_quote_style() {
        let doc = parse_strict("@ S:\nset \"a\\tb\", dq\nset 'a\\tb', sq").unwrap();
        let s = doc.section("S").unwrap();
        assert_eq!(s.entry("dq").unwrap().as_str(), "a\tb");
        assert_eq!(s.entry("sq").unwrap().as_str(), "a\\tb");
    }

    #[test]
    fn test_document_serializes_to_json() {
        let doc = parse_strict(SAMPLE).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["sections"]["User"]["entries"]["age"]["value"]["kind"], "number");
        assert_eq!(json["sections"]["Video"]["lists"]["color"]["elements"][2]["raw"], "255");
    }
}
