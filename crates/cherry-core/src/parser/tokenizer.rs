//! Cherry Tokenizer - converts Cherry text into a token stream
//!
//! Handles: identifiers, the `set`/`yes`/`no` keywords (case-insensitive),
//! double-quoted strings with escapes, single-quoted raw strings, number
//! literals, and the symbols `: , { } @`.
//! Whitespace and `;` comments are discarded.
//!
//! The scanner never aborts. A malformed literal or an unknown character
//! comes back as a [`TokenKind::Invalid`] token carrying a [`Diagnostic`],
//! and the parser decides what to do with it.

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// Token kinds for Cherry syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    EndOfInput,
    Identifier,
    StringLiteral,
    NumberLiteral,
    Colon,       // :
    Comma,       // ,
    SectionSign, // @
    LeftBrace,   // {
    RightBrace,  // }
    SetKeyword,
    YesKeyword,
    NoKeyword,
    Invalid(Box<Diagnostic>),
}

/// Position in source text for error reporting
///
/// `line` and `column` are 1-based, `offset` counts characters from the
/// start of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with its text and source position
///
/// For string literals `text` is the decoded content, without quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Text shown in diagnostics when this token was not what the parser wanted
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::StringLiteral => format!("\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

/// Tokenizer for Cherry source text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input text
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the next token
    ///
    /// Once the input is exhausted every call returns `EndOfInput`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let span = self.current_span();
        let ch = match self.peek() {
            Some(c) => c,
            None => return Token::new(TokenKind::EndOfInput, "", span),
        };

        match ch {
            ':' => self.single(TokenKind::Colon, span),
            ',' => self.single(TokenKind::Comma, span),
            '@' => self.single(TokenKind::SectionSign, span),
            '{' => self.single(TokenKind::LeftBrace, span),
            '}' => self.single(TokenKind::RightBrace, span),
            '"' => self.read_string(span),
            '\'' => self.read_raw_string(span),
            c if c.is_ascii_digit() || c == '-' => self.read_number(span),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier_or_keyword(span),
            c => {
                self.advance();
                invalid(
                    Diagnostic::lexical("token", span, "a token").found(c.to_string()),
                    c.to_string(),
                )
            }
        }
    }

    /// Tokenize the whole input, stopping after `EndOfInput` or the first `Invalid`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = matches!(token.kind, TokenKind::EndOfInput | TokenKind::Invalid(_));
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    // ── Character helpers ──────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn single(&mut self, kind: TokenKind, span: Span) -> Token {
        let text = self.advance().map(String::from).unwrap_or_default();
        Token::new(kind, text, span)
    }

    // ── Whitespace & Comments ──────────────────────────────

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek() {
                if ch.is_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            // `;` runs to end of line
            if self.peek() == Some(';') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    // ── String literals ────────────────────────────────────

    fn read_string(&mut self, span: Span) -> Token {
        self.advance(); // consume opening "
        let mut value = String::new();

        loop {
            let escape_span = self.current_span();
            match self.advance() {
                None => {
                    return invalid(
                        Diagnostic::lexical("string", span, "closing '\"'").found(&value),
                        value,
                    );
                }
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('v') => value.push('\u{0B}'),
                    Some(c) => {
                        let text = format!("\\{}", c);
                        return invalid(
                            Diagnostic::lexical(
                                "escape",
                                escape_span,
                                "one of \\\\ \\' \\\" \\n \\t \\v",
                            )
                            .found(&text),
                            text,
                        );
                    }
                    None => {
                        return invalid(
                            Diagnostic::lexical("escape", escape_span, "an escape character")
                                .found("\\"),
                            "\\",
                        );
                    }
                },
                Some(c) => value.push(c),
            }
        }

        Token::new(TokenKind::StringLiteral, value, span)
    }

    fn read_raw_string(&mut self, span: Span) -> Token {
        self.advance(); // consume opening '
        let mut value = String::new();

        loop {
            match self.advance() {
                None => {
                    return invalid(
                        Diagnostic::lexical("raw_string", span, "closing \"'\"").found(&value),
                        value,
                    );
                }
                Some('\'') => break,
                Some(c) => value.push(c),
            }
        }

        Token::new(TokenKind::StringLiteral, value, span)
    }

    // ── Numbers ────────────────────────────────────────────

    fn read_number(&mut self, span: Span) -> Token {
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' || ch == '-' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();

        match check_number(&text) {
            Ok(()) => Token::new(TokenKind::NumberLiteral, text, span),
            Err(expected) => invalid(
                Diagnostic::lexical("number", span, expected).found(&text),
                text,
            ),
        }
    }

    // ── Identifiers & Keywords ─────────────────────────────

    fn read_identifier_or_keyword(&mut self, span: Span) -> Token {
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();

        let kind = if text.eq_ignore_ascii_case("set") {
            TokenKind::SetKeyword
        } else if text.eq_ignore_ascii_case("yes") {
            TokenKind::YesKeyword
        } else if text.eq_ignore_ascii_case("no") {
            TokenKind::NoKeyword
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, text, span)
    }
}

fn invalid(diagnostic: Diagnostic, text: impl Into<String>) -> Token {
    let span = diagnostic.span;
    Token::new(TokenKind::Invalid(Box::new(diagnostic)), text, span)
}

/// Validate the shape of a scanned number literal
///
/// Returns what was expected when the literal is malformed.
fn check_number(text: &str) -> std::result::Result<(), &'static str> {
    let body = text.strip_prefix('-').unwrap_or(text);

    if body.contains('-') {
        return Err("'-' only as the first character");
    }
    if body.is_empty() {
        return Err("a digit after '-'");
    }
    if body.matches('.').count() > 1 {
        return Err("at most one '.'");
    }
    if body.starts_with('.') {
        return Err("a digit before '.'");
    }
    if body.ends_with('.') {
        return Err("a digit after '.'");
    }

    let bytes = body.as_bytes();
    if bytes[0] == b'0' && bytes.get(1).map_or(false, u8::is_ascii_digit) {
        return Err("no leading zero");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        Tokenizer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    fn single(input: &str) -> Token {
        Tokenizer::new(input).next_token()
    }

    fn lex_err(input: &str) -> Diagnostic {
        match single(input).kind {
            TokenKind::Invalid(d) => *d,
            other => panic!("expected Invalid token for {:?}, got {:?}", input, other),
        }
    }

    // ── Keywords ───────────────────────────────────────

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("set yes no"),
            vec![
                TokenKind::SetKeyword,
                TokenKind::YesKeyword,
                TokenKind::NoKeyword,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive_text_preserved() {
        let tokens = Tokenizer::new("SET Yes nO").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::SetKeyword);
        assert_eq!(tokens[1].kind, TokenKind::YesKeyword);
        assert_eq!(tokens[1].text, "Yes");
        assert_eq!(tokens[2].kind, TokenKind::NoKeyword);
        assert_eq!(tokens[2].text, "nO");
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            kinds("settings yesterday none"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }

    // ── Identifiers ────────────────────────────────────

    #[test]
    fn test_tokenize_identifiers() {
        assert_eq!(
            texts("name _private Screen_Width2"),
            vec!["name", "_private", "Screen_Width2", ""]
        );
    }

    // ── Symbols ────────────────────────────────────────

    #[test]
    fn test_tokenize_symbols() {
        assert_eq!(
            kinds(": , @ { }"),
            vec![
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::SectionSign,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        let d = lex_err("#");
        assert_eq!(d.rule, "token");
        assert_eq!(d.found.as_deref(), Some("#"));
    }

    // ── Strings ────────────────────────────────────────

    #[test]
    fn test_double_quoted_escapes_decoded() {
        let t = single(r#""say \"hi\"\n\tand \\ \' \v""#);
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert_eq!(t.text, "say \"hi\"\n\tand \\ ' \u{0B}");
    }

    #[test]
    fn test_single_quoted_is_raw() {
        let t = single(r#"'C:\new\table "quoted"'"#);
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert_eq!(t.text, r#"C:\new\table "quoted""#);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(texts(r#""" ''"#), vec!["", "", ""]);
    }

    #[test]
    fn test_bad_escape() {
        let d = lex_err(r#""bad \q escape""#);
        assert_eq!(d.rule, "escape");
        assert_eq!(d.found.as_deref(), Some("\\q"));
        assert_eq!(d.column(), 6);
    }

    #[test]
    fn test_unterminated_strings() {
        assert_eq!(lex_err("\"open").rule, "string");
        assert_eq!(lex_err("'open").rule, "raw_string");
        assert_eq!(lex_err("\"trailing\\").rule, "escape");
    }

    // ── Numbers ────────────────────────────────────────

    #[test]
    fn test_valid_numbers() {
        for n in ["0", "7", "42", "-5", "-0", "0.5", "3.14", "-12.75", "1000"] {
            let t = single(n);
            assert_eq!(t.kind, TokenKind::NumberLiteral, "{} should lex", n);
            assert_eq!(t.text, n);
        }
    }

    #[test]
    fn test_leading_zero_rejected() {
        assert_eq!(lex_err("01").expected, "no leading zero");
        assert_eq!(lex_err("-007").expected, "no leading zero");
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert_eq!(lex_err("1.").expected, "a digit after '.'");
        assert_eq!(lex_err("1.2.3").expected, "at most one '.'");
        assert_eq!(lex_err("-").expected, "a digit after '-'");
        assert_eq!(lex_err("1-2").expected, "'-' only as the first character");
        assert_eq!(lex_err("--1").expected, "'-' only as the first character");
        assert_eq!(lex_err("-.5").expected, "a digit before '.'");
    }

    // ── Comments ───────────────────────────────────────

    #[test]
    fn test_skip_comments() {
        assert_eq!(
            kinds("; header\nset ; trailing\n; last"),
            vec![TokenKind::SetKeyword, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_semicolon_inside_string_is_content() {
        assert_eq!(single("\"a;b\"").text, "a;b");
    }

    // ── Span tracking ──────────────────────────────────

    #[test]
    fn test_span_tracking() {
        let tokens = Tokenizer::new("@ User:\n  set 18, age").tokenize();
        assert_eq!(tokens[0].span, Span { line: 1, column: 1, offset: 0 });
        assert_eq!(tokens[1].span, Span { line: 1, column: 3, offset: 2 });
        assert_eq!(tokens[2].span, Span { line: 1, column: 7, offset: 6 });
        assert_eq!(tokens[3].span, Span { line: 2, column: 3, offset: 10 });
        assert_eq!(tokens[4].span, Span { line: 2, column: 7, offset: 14 });
        assert_eq!(tokens[6].span, Span { line: 2, column: 11, offset: 18 });
    }

    // ── Edge cases ─────────────────────────────────────

    #[test]
    fn test_end_of_input_is_idempotent() {
        let mut tokenizer = Tokenizer::new("  ");
        for _ in 0..3 {
            assert_eq!(tokenizer.next_token().kind, TokenKind::EndOfInput);
        }
    }

    #[test]
    fn test_tokenize_stops_at_invalid() {
        let tokens = Tokenizer::new("set 01, x").tokenize();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[1].kind, TokenKind::Invalid(_)));
    }

    #[test]
    fn test_scanning_continues_after_invalid() {
        let mut tokenizer = Tokenizer::new("# set");
        assert!(matches!(tokenizer.next_token().kind, TokenKind::Invalid(_)));
        assert_eq!(tokenizer.next_token().kind, TokenKind::SetKeyword);
    }

    #[test]
    fn test_tokenize_statement_fragment() {
        assert_eq!(
            kinds("set { 255, 'x', yes, }, color"),
            vec![
                TokenKind::SetKeyword,
                TokenKind::LeftBrace,
                TokenKind::NumberLiteral,
                TokenKind::Comma,
                TokenKind::StringLiteral,
                TokenKind::Comma,
                TokenKind::YesKeyword,
                TokenKind::Comma,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }
}
