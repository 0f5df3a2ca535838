//! Canonical Cherry text
//!
//! `Display` on [`Document`] writes source that parses back to the same
//! sections, entries and lists: sections, entries and lists in id order,
//! booleans lowercased, strings double-quoted and re-escaped.

use std::fmt;

use crate::document::{Document, Entry, List, Section};
use crate::value::{Value, ValueKind};

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, section) in self.sections().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "@ {}:", self.id())?;
        for entry in self.entries() {
            writeln!(f, "{}", entry)?;
        }
        for list in self.lists() {
            writeln!(f, "{}", list)?;
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "set {}, {}", self.value(), self.id())
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "set {{ ")?;
        for (i, value) in self.elements().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, " }}, {}", self.id())
    }
}

/// A value as a Cherry literal
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ValueKind::Number => f.write_str(&self.raw),
            ValueKind::Boolean => f.write_str(&self.raw.to_ascii_lowercase()),
            ValueKind::String => {
                f.write_str("\"")?;
                for c in self.raw.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\u{0B}' => f.write_str("\\v")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}
