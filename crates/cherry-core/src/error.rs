//! Error types for Cherry
//!
//! Scanning, parsing and coercion never fail hard. They hand back a
//! [`Diagnostic`] next to whatever value could still be produced. The
//! [`Error`] enum exists for callers that want an all-or-nothing answer
//! (see [`crate::parse_strict`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::tokenizer::Span;

/// Category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Malformed literal or unknown character
    Lexical,
    /// Token sequence does not match the grammar
    Syntax,
    /// Statement is well-formed but cannot be placed in the document
    Semantic,
    /// Stored literal cannot be represented in the requested type
    Coercion,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "lexical"),
            DiagnosticKind::Syntax => write!(f, "syntax"),
            DiagnosticKind::Semantic => write!(f, "semantic"),
            DiagnosticKind::Coercion => write!(f, "coercion"),
        }
    }
}

/// A structured, non-fatal error payload
///
/// `rule` names the scanner or grammar rule that failed (`number`,
/// `section_header`, `as_number`, ...). `found` holds the offending text
/// when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub rule: String,
    pub span: Span,
    pub expected: String,
    pub found: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, rule: &str, span: Span, expected: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            rule: rule.to_string(),
            span,
            expected: expected.into(),
            found: None,
        }
    }

    /// Attach the offending text
    pub fn found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn lexical(rule: &str, span: Span, expected: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Lexical, rule, span, expected)
    }

    pub fn syntax(rule: &str, span: Span, expected: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Syntax, rule, span, expected)
    }

    pub fn semantic(rule: &str, span: Span, expected: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Semantic, rule, span, expected)
    }

    pub fn coercion(rule: &str, span: Span, expected: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Coercion, rule, span, expected)
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} error in {} at {}: expected {}",
            self.kind, self.rule, self.span, self.expected
        )?;
        if let Some(ref found) = self.found {
            write!(f, ", found `{}`", found.escape_debug())?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Cherry error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A lexical or syntax error stopped the parse pass
    #[error("Parse error: {0}")]
    Parse(Diagnostic),

    /// A statement was skipped during assembly
    #[error("Rejected statement: {0}")]
    Rejected(Diagnostic),
}

impl Error {
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Error::Parse(d) | Error::Rejected(d) => d,
        }
    }
}

/// Result type alias for Cherry operations
pub type Result<T> = std::result::Result<T, Error>;
