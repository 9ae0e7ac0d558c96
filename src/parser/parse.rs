//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! token navigation helpers, diagnostic recording, and the main parse entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: Parsing statements (if, while, for, function, local, ...)
//! - `expressions`: Parsing expressions with one function per precedence level
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! # Error recovery
//!
//! No parse method returns early on bad input. A missing token is recorded and
//! replaced by a placeholder of the expected kind; a token that cannot start an
//! expression is recorded, skipped, and replaced by [`Expression::Error`]. The
//! cursor saturates at the final `Eof`, so recovery always terminates.
//!
//! Nesting is bounded by [`MAX_NESTING_DEPTH`]. Blocks, parenthesized and
//! bracketed expressions, prefix operators and each link of an operator or
//! postfix chain count as one level. Past the limit the parser records
//! [`DiagnosticKind::TooDeep`] once and skips the nested input, which keeps
//! both the parser and every recursive walk over the tree off the end of the
//! stack.

use crate::parser::ast::*;
use crate::parser::constants::{MAX_NESTING_DEPTH, UNTERMINATED_STRING};
use crate::parser::errors::{Diagnostic, DiagnosticKind, ParseError};
use crate::parser::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for the Lua subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) depth: usize,
}

/// What a too-deep region is skipped as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Expression,
    Block,
}

impl Parser {
    /// Tokenize `source` and create a parser over the full token array.
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        Self::from_tokens(lexer.tokenize_all())
    }

    /// Create a parser over an already tokenized input. An `Eof` token is
    /// appended when the array does not end with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenKind::Eof)) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }
        Self {
            tokens,
            position: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Parse the entire program.
    ///
    /// The program is always returned, even when diagnostics were recorded;
    /// the second element is `Err` exactly when at least one was. Each call
    /// starts from the first token and builds a fresh tree.
    pub fn parse(&mut self) -> (Program, Result<(), ParseError>) {
        self.position = 0;
        self.diagnostics.clear();
        self.depth = 0;

        let mut program = Program::new();
        while !self.is_at_end() {
            program.statements.push(self.parse_statement());
        }

        if self.diagnostics.is_empty() {
            (program, Ok(()))
        } else {
            (program, Err(ParseError::new(self.diagnostics.clone())))
        }
    }

    /// Diagnostics recorded by the most recent [`parse`](Self::parse).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The token array this parser works on, ending in `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // ===== Helper methods =====

    pub(crate) fn peek_token(&self) -> &Token {
        self.peek_ahead(0)
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek_token().kind
    }

    /// Token `n` positions past the cursor, saturating at `Eof`.
    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token and return it. Never moves past `Eof`.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek_token().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Current token ends a block (`end`, `else`, `elseif`, `until`, EOF).
    pub(crate) fn at_block_end(&self) -> bool {
        self.peek_kind().ends_block()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek_token().location
    }

    /// Consume a token of `kind`. On mismatch, record a diagnostic and return
    /// an empty placeholder of the expected kind without consuming anything.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Token {
        if self.check(kind) {
            return self.advance();
        }

        let found = self.peek_token().clone();
        self.error(
            DiagnosticKind::ExpectedToken {
                expected: kind,
                found: found.kind,
            },
            format!(
                "expected {} but got {} at line {}",
                kind,
                found.kind,
                found.line()
            ),
            found.location,
        );
        Token::new(kind, "", found.location)
    }

    /// Consume an identifier and return its name (empty on mismatch).
    pub(crate) fn expect_identifier(&mut self) -> String {
        self.expect(TokenKind::Ident).text
    }

    pub(crate) fn error(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        self.diagnostics.push(Diagnostic::new(kind, message, location));
    }

    /// Enter one nesting level. Returns false once the limit is exceeded;
    /// the level is counted either way and must be released with
    /// [`leave_levels`](Self::leave_levels).
    pub(crate) fn enter_level(&mut self) -> bool {
        self.depth += 1;
        self.depth <= MAX_NESTING_DEPTH
    }

    pub(crate) fn leave_levels(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Report the nesting limit and skip the rest of the current expression.
    pub(crate) fn too_deep(&mut self) {
        self.report_too_deep();
        self.skip_nested(Skip::Expression);
    }

    /// [`too_deep`](Self::too_deep) in place of an operand.
    pub(crate) fn nesting_error(&mut self) -> Expression {
        let location = self.current_location();
        self.too_deep();
        Expression::Error {
            message: "too deeply nested".to_string(),
            location,
        }
    }

    /// Report the nesting limit and skip a block body up to its terminator.
    pub(crate) fn nested_block_error(&mut self) -> Vec<Statement> {
        let location = self.current_location();
        self.report_too_deep();
        self.skip_nested(Skip::Block);
        vec![Statement::Error {
            message: "too deeply nested".to_string(),
            location,
        }]
    }

    fn report_too_deep(&mut self) {
        let token = self.peek_token().clone();
        self.error(
            DiagnosticKind::TooDeep,
            format!(
                "nesting too deep (more than {} levels) at line {}",
                MAX_NESTING_DEPTH,
                token.line()
            ),
            token.location,
        );
    }

    /// Skip tokens without recursing. Brackets and block keywords are
    /// balanced; at balance zero an expression ends at a closer, a statement
    /// keyword, `=`, `,`, or a name or literal that follows a complete
    /// operand. A block ends at `end`, `until`, `else` or `elseif`. The
    /// stopping token is not consumed.
    fn skip_nested(&mut self, mode: Skip) {
        let mut balance = 0usize;
        let mut after_operand = false;

        while !self.is_at_end() {
            let kind = self.peek_kind();
            if balance == 0 && Self::ends_skip(kind, mode, after_operand) {
                break;
            }

            match kind {
                TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Function
                | TokenKind::Do
                | TokenKind::If
                | TokenKind::Repeat => balance += 1,
                TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::End
                | TokenKind::Until => balance = balance.saturating_sub(1),
                _ => {}
            }

            after_operand = matches!(
                kind,
                TokenKind::Ident
                    | TokenKind::Int
                    | TokenKind::Float
                    | TokenKind::String
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Nil
                    | TokenKind::Ellipsis
                    | TokenKind::RParen
                    | TokenKind::RBracket
                    | TokenKind::RBrace
                    | TokenKind::End
            );
            self.advance();
        }
    }

    fn ends_skip(kind: TokenKind, mode: Skip, after_operand: bool) -> bool {
        match mode {
            Skip::Block => matches!(
                kind,
                TokenKind::End | TokenKind::Until | TokenKind::Else | TokenKind::Elseif
            ),
            Skip::Expression => {
                let closes_or_starts_statement = matches!(
                    kind,
                    TokenKind::RParen
                        | TokenKind::RBracket
                        | TokenKind::RBrace
                        | TokenKind::End
                        | TokenKind::Until
                        | TokenKind::Else
                        | TokenKind::Elseif
                        | TokenKind::Then
                        | TokenKind::Do
                        | TokenKind::In
                        | TokenKind::If
                        | TokenKind::While
                        | TokenKind::For
                        | TokenKind::Repeat
                        | TokenKind::Local
                        | TokenKind::Return
                        | TokenKind::Break
                        | TokenKind::Goto
                        | TokenKind::Semicolon
                        | TokenKind::DoubleColon
                        | TokenKind::Assign
                        | TokenKind::Comma
                );
                // `a b` or `f() function ...` begins a new statement
                let starts_operand = matches!(
                    kind,
                    TokenKind::Ident
                        | TokenKind::Int
                        | TokenKind::Float
                        | TokenKind::True
                        | TokenKind::False
                        | TokenKind::Nil
                        | TokenKind::Ellipsis
                        | TokenKind::Function
                );
                closes_or_starts_statement || (after_operand && starts_operand)
            }
        }
    }

    /// Record an illegal token produced by the lexer.
    pub(crate) fn lexical_error(&mut self, token: &Token) {
        let detail = if token.text == UNTERMINATED_STRING {
            UNTERMINATED_STRING.to_string()
        } else {
            format!("illegal character '{}'", token.text)
        };
        self.error(
            DiagnosticKind::Lexical,
            format!(
                "unexpected token: {} at line {}: {}",
                token.kind,
                token.line(),
                detail
            ),
            token.location,
        );
    }
}

/// Parse `source` in one call.
pub fn parse(source: &str) -> (Program, Result<(), ParseError>) {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_appends_eof() {
        let tokens = vec![Token::new(TokenKind::Break, "break", SourceLocation::new(1, 1))];
        let mut parser = Parser::from_tokens(tokens);
        assert_eq!(parser.tokens().len(), 2);

        let (program, result) = parser.parse();
        assert!(result.is_ok());
        assert!(matches!(program.statements[0], Statement::Break { .. }));
    }

    #[test]
    fn test_cursor_saturates_at_eof() {
        let mut parser = Parser::new("x");
        parser.advance();
        parser.advance();
        parser.advance();
        assert!(parser.is_at_end());
        assert!(parser.peek_ahead(10).is(TokenKind::Eof));
    }

    #[test]
    fn test_expect_records_placeholder() {
        let mut parser = Parser::new("x");
        let token = parser.expect(TokenKind::Then);

        assert!(token.is(TokenKind::Then));
        assert!(token.text.is_empty());
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics()[0].message,
            "expected then but got IDENT at line 1"
        );
        // Nothing consumed
        assert!(parser.check(TokenKind::Ident));
    }

    #[test]
    fn test_reparse_builds_fresh_result() {
        let mut parser = Parser::new("x = @");
        let (first, r1) = parser.parse();
        let (second, r2) = parser.parse();

        assert_eq!(first.statements.len(), second.statements.len());
        assert_eq!(r1.unwrap_err().len(), r2.unwrap_err().len());
    }

    #[test]
    fn test_nesting_levels_are_released() {
        let mut parser = Parser::new("x = ((1 + 2) * -f(a[1], {b}))\ndo while y do end end");
        let (_, result) = parser.parse();
        assert!(result.is_ok());
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_skip_stops_at_next_statement() {
        let mut parser = Parser::new("(a + (b) * c) d = 1");
        parser.advance();
        parser.skip_nested(Skip::Expression);
        assert!(parser.check(TokenKind::RParen));

        let mut parser = Parser::new("a + f(b) c = 1");
        parser.skip_nested(Skip::Expression);
        assert_eq!(parser.peek_token().text, "c");
    }

    #[test]
    fn test_block_skip_balances_keywords() {
        let mut parser = Parser::new("if a then f(function() end) end repeat until b end");
        parser.skip_nested(Skip::Block);
        assert!(parser.check(TokenKind::End));
        assert_eq!(parser.peek_token().location, SourceLocation::new(1, 48));
    }
}
