//! Parse diagnostics
//!
//! The parser never stops at the first problem. Each defect is recorded as a
//! [`Diagnostic`] and parsing continues with a placeholder; [`ParseError`]
//! bundles everything recorded during one `parse()` call.

use crate::parser::ast::SourceLocation;
use crate::parser::token::TokenKind;
use std::fmt;

/// What went wrong, in machine-readable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A token that cannot start an expression appeared in expression position.
    UnexpectedToken { found: TokenKind },

    /// A specific token kind was required but something else was found.
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },

    /// An illegal token from the lexer (unterminated string, stray character).
    Lexical,

    /// A numeric literal whose text does not convert to a number.
    InvalidNumber,

    /// The left side of `=` is not a name, member access or index.
    InvalidAssignmentTarget,

    /// Nesting exceeded `MAX_NESTING_DEPTH`; the nested part was skipped.
    TooDeep,
}

/// A single recorded, non-fatal parse defect
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parser error type: every diagnostic from one parse, in the order found.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
