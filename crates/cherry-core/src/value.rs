//! Literal values and on-demand coercion
//!
//! A [`Value`] keeps the literal exactly as the tokenizer accepted it. Every
//! typed read (`as_boolean`, `as_number::<T>`, `is_negative`) is computed
//! fresh from that text. A failed read does not error out: it yields the
//! target type's zero value together with a coercion [`Diagnostic`], wrapped
//! in [`Coerced`].

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::parser::tokenizer::Span;

/// Literal kind of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Boolean,
    Number,
    String,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
        }
    }
}

/// A literal as written in the source
///
/// For strings `raw` holds the decoded content; for numbers and booleans it
/// is the token text (`-12.5`, `YES`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub kind: ValueKind,
    pub raw: String,
    pub span: Span,
}

/// Outcome of a coercion: always a value, plus a diagnostic on failure
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub diagnostic: Option<Diagnostic>,
}

impl<T> Coerced<T> {
    pub fn ok(value: T) -> Self {
        Coerced {
            value,
            diagnostic: None,
        }
    }

    pub fn failed(value: T, diagnostic: Diagnostic) -> Self {
        tracing::debug!(%diagnostic, "coercion failed");
        Coerced {
            value,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostic.is_none()
    }

    /// The coerced value, or the zero value if coercion failed
    pub fn value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Option<Diagnostic>) {
        (self.value, self.diagnostic)
    }

    pub fn into_result(self) -> std::result::Result<T, Diagnostic> {
        match self.diagnostic {
            None => Ok(self.value),
            Some(d) => Err(d),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Native numeric types a number literal can be read as
pub trait Number: Copy + Default + sealed::Sealed {
    const TYPE_NAME: &'static str;
    const INTEGRAL: bool;

    fn parse_literal(text: &str) -> std::result::Result<Self, String>;

    fn is_finite(self) -> bool;

    fn is_zero(self) -> bool;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Number for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const INTEGRAL: bool = true;

            fn parse_literal(text: &str) -> std::result::Result<Self, String> {
                text.parse::<$t>().map_err(|e| e.to_string())
            }

            fn is_finite(self) -> bool {
                true
            }

            fn is_zero(self) -> bool {
                self == 0
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl sealed::Sealed for $t {}
        impl Number for $t {
            const TYPE_NAME: &'static str = stringify!($t);
            const INTEGRAL: bool = false;

            fn parse_literal(text: &str) -> std::result::Result<Self, String> {
                text.parse::<$t>().map_err(|e| e.to_string())
            }

            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            fn is_zero(self) -> bool {
                self == 0.0
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float!(f32, f64);

impl Value {
    pub fn new(kind: ValueKind, raw: impl Into<String>, span: Span) -> Self {
        Value {
            kind,
            raw: raw.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `yes` reads as true, `no` as false
    ///
    /// The keyword set is closed, so the length of the raw text decides.
    pub fn as_boolean(&self) -> Coerced<bool> {
        match self.expect_kind(ValueKind::Boolean, "as_boolean") {
            Ok(()) => Coerced::ok(self.raw.len() == 3),
            Err(d) => Coerced::failed(false, d),
        }
    }

    pub fn as_number<T: Number>(&self) -> Coerced<T> {
        if let Err(d) = self.expect_kind(ValueKind::Number, "as_number") {
            return Coerced::failed(T::default(), d);
        }

        if T::INTEGRAL && self.raw.contains('.') {
            let d = Diagnostic::coercion(
                "as_number",
                self.span,
                format!("an integer literal for {}", T::TYPE_NAME),
            )
            .found(&self.raw);
            return Coerced::failed(T::default(), d);
        }

        let nonzero = self.raw.bytes().any(|b| matches!(b, b'1'..=b'9'));
        // `-0` is zero for unsigned targets too
        let text = if T::INTEGRAL && !nonzero {
            self.raw.trim_start_matches('-')
        } else {
            self.raw.as_str()
        };

        match T::parse_literal(text) {
            Ok(v) if v.is_finite() && !(nonzero && v.is_zero()) => Coerced::ok(v),
            Ok(_) => Coerced::failed(
                T::default(),
                Diagnostic::coercion(
                    "as_number",
                    self.span,
                    format!("a value in range for {}", T::TYPE_NAME),
                )
                .found(&self.raw),
            ),
            Err(e) => Coerced::failed(
                T::default(),
                Diagnostic::coercion(
                    "as_number",
                    self.span,
                    format!("a value in range for {} ({})", T::TYPE_NAME, e),
                )
                .found(&self.raw),
            ),
        }
    }

    pub fn is_negative(&self) -> Coerced<bool> {
        match self.expect_kind(ValueKind::Number, "is_negative") {
            Ok(()) => Coerced::ok(self.raw.starts_with('-')),
            Err(d) => Coerced::failed(false, d),
        }
    }

    fn expect_kind(&self, kind: ValueKind, rule: &str) -> std::result::Result<(), Diagnostic> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(
                Diagnostic::coercion(rule, self.span, format!("a {} value", kind))
                    .found(format!("{} `{}`", self.kind, self.raw)),
            )
        }
    }
}
