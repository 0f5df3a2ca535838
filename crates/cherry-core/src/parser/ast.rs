//! Cherry statement types
//!
//! The parser produces one [`Statement`] per step. Statements are handed
//! straight to the assembly driver in [`crate::document`], which files the
//! entries and lists into their sections.

use crate::document::{Entry, List};
use crate::error::Diagnostic;
use crate::parser::tokenizer::Span;

/// A single top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Source exhausted
    EndOfInput,
    /// `@ id:`
    SectionHeader { id: String, span: Span },
    /// `set <literal>, id`
    ScalarAssignment(Entry),
    /// `set { <literal>, ... }, id`
    ListAssignment(List),
    /// Lexical or syntax error; ends the parse pass
    Invalid(Diagnostic),
}

impl Statement {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Statement::EndOfInput | Statement::Invalid(_))
    }
}
