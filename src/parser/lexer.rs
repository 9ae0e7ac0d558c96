//! Lexer (tokenizer) for Lua source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Whitespace and `--` line comments are skipped. Malformed input never stops
//! the lexer: an unterminated string or an unrecognized character becomes a
//! [`TokenKind::Illegal`] token and the parser reports it with position context.

use super::ast::SourceLocation;
use super::constants::UNTERMINATED_STRING;
pub use super::token::{Token, TokenKind};
use super::token::lookup_keyword;

/// Lexer for Lua source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The result always ends in exactly one
    /// `Eof` token.
    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    /// Scan and return the next token. Once the input is exhausted every call
    /// returns `Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, "", loc);
        };

        match ch {
            // String literals
            '"' | '\'' => self.string_literal(ch, loc),

            // Numeric literals
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => self.identifier_or_keyword(c, loc),

            '.' => {
                if self.peek() == Some('.') {
                    self.advance();
                    if self.peek() == Some('.') {
                        self.advance();
                        Token::new(TokenKind::Ellipsis, "...", loc)
                    } else {
                        Token::new(TokenKind::Concat, "..", loc)
                    }
                } else {
                    Token::new(TokenKind::Dot, ".", loc)
                }
            }
            '=' => self.one_or_two(loc, '=', TokenKind::EqEq, TokenKind::Assign),
            '~' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::NotEq, "~=", loc)
                } else {
                    // No unary or binary `~` in this grammar
                    Token::new(TokenKind::Illegal, "~", loc)
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Le, "<=", loc)
                } else if self.peek() == Some('<') {
                    self.advance();
                    Token::new(TokenKind::Shl, "<<", loc)
                } else {
                    Token::new(TokenKind::Lt, "<", loc)
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::Ge, ">=", loc)
                } else if self.peek() == Some('>') {
                    self.advance();
                    Token::new(TokenKind::Shr, ">>", loc)
                } else {
                    Token::new(TokenKind::Gt, ">", loc)
                }
            }
            ':' => self.one_or_two(loc, ':', TokenKind::DoubleColon, TokenKind::Colon),
            '+' => Token::new(TokenKind::Plus, "+", loc),
            '-' => Token::new(TokenKind::Minus, "-", loc),
            '*' => Token::new(TokenKind::Star, "*", loc),
            '/' => Token::new(TokenKind::Slash, "/", loc),
            '%' => Token::new(TokenKind::Percent, "%", loc),
            '^' => Token::new(TokenKind::Caret, "^", loc),
            '#' => Token::new(TokenKind::Hash, "#", loc),
            '(' => Token::new(TokenKind::LParen, "(", loc),
            ')' => Token::new(TokenKind::RParen, ")", loc),
            '{' => Token::new(TokenKind::LBrace, "{", loc),
            '}' => Token::new(TokenKind::RBrace, "}", loc),
            '[' => Token::new(TokenKind::LBracket, "[", loc),
            ']' => Token::new(TokenKind::RBracket, "]", loc),
            ';' => Token::new(TokenKind::Semicolon, ";", loc),
            ',' => Token::new(TokenKind::Comma, ",", loc),

            other => Token::new(TokenKind::Illegal, other.to_string(), loc),
        }
    }

    /// `first` has been consumed; take `second` too if it follows.
    fn one_or_two(
        &mut self,
        loc: SourceLocation,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Token {
        if self.peek() == Some(second) {
            self.advance();
            Token::new(double, double.as_str(), loc)
        } else {
            Token::new(single, single.as_str(), loc)
        }
    }

    /// Parse string literal; the opening quote has been consumed.
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Token {
        let mut string = String::new();

        loop {
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Illegal, UNTERMINATED_STRING, loc);
            };

            if ch == quote {
                return Token::new(TokenKind::String, string, loc);
            }

            if ch == '\\' {
                let Some(escaped) = self.advance() else {
                    return Token::new(TokenKind::Illegal, UNTERMINATED_STRING, loc);
                };
                string.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    // \\, \", \' and anything else pass through as written
                    other => other,
                });
            } else {
                string.push(ch);
            }
        }
    }

    /// Parse numeric literal. Only the shape is checked here; the parser
    /// converts the text and reports values that do not parse.
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut text = String::new();
        text.push(first);

        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            if let Some(x) = self.advance() {
                text.push(x);
            }
            while let Some(ch) = self.peek() {
                if !ch.is_ascii_hexdigit() {
                    break;
                }
                text.push(ch);
                self.advance();
            }
            return Token::new(TokenKind::Int, text, loc);
        }

        let mut has_dot = first == '.';
        let mut has_exp = false;

        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => {
                    text.push(ch);
                    self.advance();
                }
                '.' => {
                    // `1..2` is a concatenation, not a malformed float
                    if has_dot || has_exp || self.peek_ahead(1) == Some('.') {
                        break;
                    }
                    has_dot = true;
                    text.push(ch);
                    self.advance();
                }
                'e' | 'E' => {
                    if has_exp {
                        break;
                    }
                    has_exp = true;
                    text.push(ch);
                    self.advance();
                    if let Some(sign @ ('+' | '-')) = self.peek() {
                        text.push(sign);
                        self.advance();
                    }
                }
                _ => break,
            }
        }

        let kind = if has_dot || has_exp {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Token::new(kind, text, loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match lookup_keyword(&ident) {
            Some(kind) => Token::new(kind, ident, loc),
            None => Token::new(TokenKind::Ident, ident, loc),
        }
    }

    /// Skip whitespace and `--` comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('-') if self.peek_ahead(1) == Some('-') => {
                    self.skip_line_comment();
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (-- ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize_all()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("local x = 10").tokenize_all();

        assert!(matches!(tokens[0].kind, TokenKind::Local));
        assert!(tokens[1].is(TokenKind::Ident) && tokens[1].text == "x");
        assert!(matches!(tokens[2].kind, TokenKind::Assign));
        assert!(tokens[3].is(TokenKind::Int) && tokens[3].text == "10");
        assert!(matches!(tokens[4].kind, TokenKind::Eof));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("== ~= <= >= << >> :: .. ... < > = : ."),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Shl,
                TokenKind::Shr,
                TokenKind::DoubleColon,
                TokenKind::Concat,
                TokenKind::Ellipsis,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = Lexer::new("x = 1 -- trailing comment\ny = 2").tokenize_all();

        assert_eq!(tokens.len(), 7);
        assert!(tokens[3].is(TokenKind::Ident) && tokens[3].text == "y");
        assert_eq!(tokens[3].line(), 2);
        assert_eq!(tokens[3].column(), 1);
    }

    #[test]
    fn test_minus_is_not_a_comment() {
        assert_eq!(
            kinds("a - -b"),
            vec![
                TokenKind::Ident,
                TokenKind::Minus,
                TokenKind::Minus,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""a\nb\t\"q\" \z" 'it\'s' "\r\0\\""#).tokenize_all();

        assert!(tokens[0].is(TokenKind::String));
        assert_eq!(tokens[0].text, "a\nb\t\"q\" z");
        assert_eq!(tokens[1].text, "it's");
        assert_eq!(tokens[2].text, "\r\0\\");
        assert!(tokens[3].is(TokenKind::Eof));
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Lexer::new("s = \"abc").tokenize_all();

        assert!(tokens[2].is(TokenKind::Illegal));
        assert_eq!(tokens[2].text, UNTERMINATED_STRING);
        assert!(tokens[3].is(TokenKind::Eof));
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("0x1F 3.14 42 1e10 2.5E-3 .5").tokenize_all();

        assert!(tokens[0].is(TokenKind::Int) && tokens[0].text == "0x1F");
        assert!(tokens[1].is(TokenKind::Float) && tokens[1].text == "3.14");
        assert!(tokens[2].is(TokenKind::Int));
        assert!(tokens[3].is(TokenKind::Float) && tokens[3].text == "1e10");
        assert!(tokens[4].is(TokenKind::Float) && tokens[4].text == "2.5E-3");
        assert!(tokens[5].is(TokenKind::Float) && tokens[5].text == ".5");
    }

    #[test]
    fn test_number_followed_by_concat() {
        assert_eq!(
            kinds("1..2"),
            vec![TokenKind::Int, TokenKind::Concat, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn test_illegal_characters() {
        let tokens = Lexer::new("a ~ b @").tokenize_all();

        assert!(tokens[1].is(TokenKind::Illegal) && tokens[1].text == "~");
        assert!(tokens[3].is(TokenKind::Illegal) && tokens[3].text == "@");
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert!(lexer.next_token().is(TokenKind::Ident));
        assert!(lexer.next_token().is(TokenKind::Eof));
        assert!(lexer.next_token().is(TokenKind::Eof));
    }

    #[test]
    fn test_keywords_and_unicode_identifiers() {
        let tokens = Lexer::new("while größe do end").tokenize_all();

        assert!(tokens[0].is(TokenKind::While));
        assert!(tokens[1].is(TokenKind::Ident) && tokens[1].text == "größe");
        assert!(tokens[2].is(TokenKind::Do));
        assert!(tokens[3].is(TokenKind::End));
    }
}
