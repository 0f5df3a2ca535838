//! Cherry Core - tokenizer, parser and document model for the Cherry
//! configuration language
//!
//! Cherry text is a sequence of section headers and assignments:
//!
//! ```text
//! ; comments run to end of line
//! @ User:
//! set "Alice", name
//! set 18, age
//! @ Video:
//! set { 255, 255, 255, }, color
//! set yes, vsync
//! ```
//!
//! # Architecture
//!
//! ```text
//! Cherry Text → Tokenizer → Parser → Statements → Assembly → Document
//!                                                               ↑
//!                                                  Coercion (on query)
//! ```
//!
//! # Guarantees
//!
//! - **Non-fatal**: no input makes the parser panic or abort; errors come
//!   back as [`Diagnostic`]s alongside whatever was assembled
//! - **Self-contained**: every [`parse`] call owns its tokenizer, parser and
//!   document, so independent sources can be parsed on separate threads
//! - **Lazy coercion**: literals are stored as written and converted on each
//!   query

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod document;
pub mod error;
pub mod format;
pub mod parser;
pub mod value;

pub use document::{parse, parse_strict, Document, Entry, List, ParseOutcome, Section};
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use parser::tokenizer::Span;
pub use value::{Coerced, Number, Value, ValueKind};
