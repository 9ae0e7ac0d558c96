//! Token model for the Lua lexer
//!
//! A [`Token`] pairs a [`TokenKind`] with the literal text it was scanned from
//! and the [`SourceLocation`] of its first character. The kind set is closed:
//! punctuation and operators, the reserved words, the four literal/name
//! classes, end-of-input, and an `Illegal` marker for input the lexer could
//! not classify.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Names and literals
    Ident,
    Int,
    Float,
    String,

    // Punctuation
    Comma,     // ,
    Dot,       // .
    Colon,     // :
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }

    // Assignment and comparison
    Assign, // =
    EqEq,   // ==
    NotEq,  // ~=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=

    // Arithmetic, length, string
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Caret,    // ^
    Hash,     // #
    Concat,   // ..
    Ellipsis, // ...
    Shl,      // <<
    Shr,      // >>

    DoubleColon, // ::

    // Keywords
    And,
    Or,
    Not,
    If,
    Then,
    Else,
    Elseif,
    End,
    Do,
    For,
    In,
    While,
    Repeat,
    Until,
    Function,
    Return,
    Local,
    Break,
    Goto,
    True,
    False,
    Nil,
}

impl TokenKind {
    /// Name used in diagnostics: the symbol or keyword itself, or an upper-case
    /// class name for names, literals and markers.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Assign => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "~=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::Hash => "#",
            TokenKind::Concat => "..",
            TokenKind::Ellipsis => "...",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::DoubleColon => "::",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::Elseif => "elseif",
            TokenKind::End => "end",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::While => "while",
            TokenKind::Repeat => "repeat",
            TokenKind::Until => "until",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Local => "local",
            TokenKind::Break => "break",
            TokenKind::Goto => "goto",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
        }
    }

    pub fn is_keyword(self) -> bool {
        keywords().values().any(|&kind| kind == self)
    }

    /// Tokens that close a block: `end`, `else`, `elseif`, `until`, EOF.
    pub fn ends_block(self) -> bool {
        matches!(
            self,
            TokenKind::End
                | TokenKind::Else
                | TokenKind::Elseif
                | TokenKind::Until
                | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const KEYWORDS: [(&str, TokenKind); 22] = [
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("if", TokenKind::If),
    ("then", TokenKind::Then),
    ("else", TokenKind::Else),
    ("elseif", TokenKind::Elseif),
    ("end", TokenKind::End),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("in", TokenKind::In),
    ("while", TokenKind::While),
    ("repeat", TokenKind::Repeat),
    ("until", TokenKind::Until),
    ("function", TokenKind::Function),
    ("return", TokenKind::Return),
    ("local", TokenKind::Local),
    ("break", TokenKind::Break),
    ("goto", TokenKind::Goto),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("nil", TokenKind::Nil),
];

fn keywords() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| KEYWORDS.iter().copied().collect())
}

/// Look up a scanned identifier in the reserved-word table.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    keywords().get(ident).copied()
}

/// A single lexical token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text. Unescaped contents for strings; the offending character
    /// or a message for `Illegal`.
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::Int | TokenKind::Float => write!(f, "number {}", self.text),
            TokenKind::String => write!(f, "string {:?}", self.text),
            TokenKind::Illegal => write!(f, "illegal token '{}'", self.text),
            TokenKind::Eof => write!(f, "end of file"),
            kind => write!(f, "'{}'", kind),
        }
    }
}
