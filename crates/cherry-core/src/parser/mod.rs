//! Cherry Parser - tokenizer, statement types, and recursive descent parser
//!
//! One-token lookahead, no backtracking. Each call to
//! [`Parser::next_statement`] consumes exactly one statement:
//!
//! ```text
//! statement     := sectionHeader | assignment
//! sectionHeader := '@' Identifier ':'
//! assignment    := 'set' value ',' Identifier
//! value         := literal | list
//! list          := '{' literal (',' literal)* ','? '}'
//! literal       := StringLiteral | NumberLiteral | 'yes' | 'no'
//! ```
//!
//! Structural mismatches become [`Statement::Invalid`]; the parser itself
//! never fails.

pub mod ast;
pub mod tokenizer;

use crate::document::{Entry, List};
use crate::error::Diagnostic;
use crate::value::{Value, ValueKind};

use ast::Statement;
use tokenizer::{Token, TokenKind, Tokenizer};

type ParseResult<T> = std::result::Result<T, Diagnostic>;

/// Statement parser over a single source text
pub struct Parser {
    tokenizer: Tokenizer,
    current: Token,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer.next_token();
        Parser { tokenizer, current }
    }

    /// Parse the next top-level statement
    pub fn next_statement(&mut self) -> Statement {
        match self.statement() {
            Ok(statement) => statement,
            Err(diagnostic) => Statement::Invalid(diagnostic),
        }
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        match self.current.kind {
            TokenKind::EndOfInput => Ok(Statement::EndOfInput),
            TokenKind::SectionSign => self.section_header(),
            TokenKind::SetKeyword => self.assignment(),
            _ => Err(self.unexpected("statement", "'@' or 'set'")),
        }
    }

    // ── Token helpers ──────────────────────────────────────

    fn advance(&mut self) -> Token {
        let next = self.tokenizer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn expect(&mut self, kind: TokenKind, rule: &str, expected: &str) -> ParseResult<Token> {
        if self.current.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(rule, expected))
        }
    }

    /// Diagnostic for the current token, which is then skipped
    ///
    /// An invalid token already carries its lexical diagnostic, which is
    /// more precise than a syntax complaint about it.
    fn unexpected(&mut self, rule: &str, expected: &str) -> Diagnostic {
        let token = self.advance();
        match token.kind {
            TokenKind::Invalid(diagnostic) => *diagnostic,
            _ => Diagnostic::syntax(rule, token.span, expected).found(token.describe()),
        }
    }

    // ── Statements ─────────────────────────────────────────

    fn section_header(&mut self) -> ParseResult<Statement> {
        let sign = self.advance(); // consume @
        let id = self.expect(TokenKind::Identifier, "section_header", "a section name")?;
        self.expect(TokenKind::Colon, "section_header", "':'")?;

        Ok(Statement::SectionHeader {
            id: id.text,
            span: sign.span,
        })
    }

    fn assignment(&mut self) -> ParseResult<Statement> {
        let set = self.advance(); // consume set

        if self.current.kind == TokenKind::LeftBrace {
            let elements = self.list()?;
            let id = self.assignment_target()?;
            Ok(Statement::ListAssignment(List::new(id, elements, set.span)))
        } else {
            let value = self.literal("assignment")?;
            let id = self.assignment_target()?;
            Ok(Statement::ScalarAssignment(Entry::new(id, value, set.span)))
        }
    }

    /// `, Identifier` after the assigned value
    fn assignment_target(&mut self) -> ParseResult<String> {
        self.expect(TokenKind::Comma, "assignment", "','")?;
        let id = self.expect(TokenKind::Identifier, "assignment", "an identifier")?;
        Ok(id.text)
    }

    fn list(&mut self) -> ParseResult<Vec<Value>> {
        self.advance(); // consume {
        let mut elements = vec![self.literal("list")?];

        loop {
            match self.current.kind {
                TokenKind::RightBrace => {
                    self.advance();
                    break;
                }
                TokenKind::Comma => {
                    self.advance();
                    // trailing comma
                    if self.current.kind == TokenKind::RightBrace {
                        self.advance();
                        break;
                    }
                    elements.push(self.literal("list")?);
                }
                _ => return Err(self.unexpected("list", "',' or '}'")),
            }
        }

        Ok(elements)
    }

    fn literal(&mut self, rule: &str) -> ParseResult<Value> {
        let kind = match self.current.kind {
            TokenKind::StringLiteral => ValueKind::String,
            TokenKind::NumberLiteral => ValueKind::Number,
            TokenKind::YesKeyword | TokenKind::NoKeyword => ValueKind::Boolean,
            _ => return Err(self.unexpected(rule, "a literal")),
        };

        let token = self.advance();
        Ok(Value::new(kind, token.text, token.span))
    }
}
