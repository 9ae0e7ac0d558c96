//! Expression parsing implementation
//!
//! This module handles parsing of Lua expressions using one function per
//! precedence level and recursive descent for the primary and postfix forms.
//!
//! # Supported Expressions
//!
//! - Literals: integers (decimal and hex), floats, strings, `true`, `false`, `nil`
//! - Identifiers and the vararg expression `...`
//! - Binary operators: logical, comparison, concatenation, shifts, arithmetic, `^`
//! - Unary operators: `not`, `-`, `#`
//! - Postfix: `.name`, `[expr]`, `:name(args)`, `(args)`, `f"str"`, `f{...}`
//! - Table constructors and function literals
//!
//! # Precedence
//!
//! Loosest to tightest:
//!
//! ```text
//! or
//! and
//! ==  ~=  <  <=  >  >=      left-associative
//! ..                        left-folded chain
//! <<  >>
//! +  -
//! *  /  %
//! not  -  #                 prefix, right-recursive
//! ^                         right-associative, right operand at unary level
//! postfix
//! primary
//! ```
//!
//! `or` and `and` bind only at their logical levels. `^` is only
//! exponentiation and `#` only the length prefix; this grammar has no `~`,
//! `&` or `|` tokens, so the bitwise levels reduce to the shift level.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::constants::VARARG_PARAM;
use crate::parser::errors::DiagnosticKind;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;

impl Parser {
    /// Parse expression (top-level entry point). Each entry is one nesting
    /// level, which covers parentheses, indexing, call arguments and table
    /// fields.
    pub(crate) fn parse_expression(&mut self) -> Expression {
        let expr = if self.enter_level() {
            self.parse_or()
        } else {
            self.nesting_error()
        };
        self.leave_levels(1);
        expr
    }

    /// Parse `expr {',' expr}`
    pub(crate) fn parse_expression_list(&mut self) -> Vec<Expression> {
        let mut exprs = vec![self.parse_expression()];

        while self.match_token(TokenKind::Comma) {
            exprs.push(self.parse_expression());
        }

        exprs
    }

    /// Parse logical OR (`or`)
    fn parse_or(&mut self) -> Expression {
        let mut left = self.parse_and();
        let mut levels = 0;

        while self.check(TokenKind::Or) {
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_and();
            left = Expression::binary(BinOp::Or, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse logical AND (`and`)
    fn parse_and(&mut self) -> Expression {
        let mut left = self.parse_comparison();
        let mut levels = 0;

        while self.check(TokenKind::And) {
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_comparison();
            left = Expression::binary(BinOp::And, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse comparison (`== ~= < <= > >=`), left-associative
    fn parse_comparison(&mut self) -> Expression {
        let mut left = self.parse_concat();
        let mut levels = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_concat();
            left = Expression::binary(op, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse concatenation (`..`)
    ///
    /// Operands are evaluated left to right and folded onto the running
    /// result: `a .. b .. c` becomes `(a .. b) .. c`.
    fn parse_concat(&mut self) -> Expression {
        let mut left = self.parse_shift();
        let mut levels = 0;

        while self.check(TokenKind::Concat) {
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_shift();
            left = Expression::binary(BinOp::Concat, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse shifts (`<< >>`)
    fn parse_shift(&mut self) -> Expression {
        let mut left = self.parse_additive();
        let mut levels = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_additive();
            left = Expression::binary(op, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse additive (`+ -`)
    fn parse_additive(&mut self) -> Expression {
        let mut left = self.parse_multiplicative();
        let mut levels = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_multiplicative();
            left = Expression::binary(op, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse multiplicative (`* / %`)
    fn parse_multiplicative(&mut self) -> Expression {
        let mut left = self.parse_unary();
        let mut levels = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            levels += 1;
            if !self.enter_level() {
                self.too_deep();
                break;
            }
            let loc = self.advance().location;
            let right = self.parse_unary();
            left = Expression::binary(op, left, right, loc);
        }

        self.leave_levels(levels);
        left
    }

    /// Parse prefix operators (`not - #`)
    fn parse_unary(&mut self) -> Expression {
        let op = match self.peek_kind() {
            TokenKind::Not => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            TokenKind::Hash => UnOp::Len,
            _ => return self.parse_power(),
        };

        let loc = self.advance().location;
        let operand = if self.enter_level() {
            self.parse_unary()
        } else {
            self.nesting_error()
        };
        self.leave_levels(1);
        Expression::Unary {
            op,
            operand: Box::new(operand),
            location: loc,
        }
    }

    /// Parse exponentiation (`^`). The right operand goes back through the
    /// unary level, which makes `a^b^c` parse as `a^(b^c)` and allows `2^-1`.
    fn parse_power(&mut self) -> Expression {
        let base = self.parse_postfix();

        if self.check(TokenKind::Caret) {
            let loc = self.advance().location;
            let exponent = if self.enter_level() {
                self.parse_unary()
            } else {
                self.nesting_error()
            };
            self.leave_levels(1);
            return Expression::binary(BinOp::Pow, base, exponent, loc);
        }

        base
    }

    /// Parse postfix chain: member access, indexing, calls
    fn parse_postfix(&mut self) -> Expression {
        let mut expr = self.parse_primary();
        let mut levels = 0;

        loop {
            if matches!(
                self.peek_kind(),
                TokenKind::Dot
                    | TokenKind::LBracket
                    | TokenKind::Colon
                    | TokenKind::LParen
                    | TokenKind::String
                    | TokenKind::LBrace
            ) {
                levels += 1;
                if !self.enter_level() {
                    self.too_deep();
                    break;
                }
            }

            match self.peek_kind() {
                TokenKind::Dot => {
                    let loc = self.advance().location;
                    let member = self.expect_identifier();
                    expr = Expression::Member {
                        object: Box::new(expr),
                        member,
                        location: loc,
                    };
                }
                TokenKind::LBracket => {
                    let loc = self.advance().location;
                    let index = self.parse_expression();
                    self.expect(TokenKind::RBracket);
                    expr = Expression::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        location: loc,
                    };
                }
                TokenKind::Colon => {
                    let loc = self.advance().location;
                    let method = self.expect_identifier();
                    let args = self.parse_call_arguments();
                    expr = Expression::Call(CallExpr {
                        callee: Box::new(expr),
                        method: Some(method),
                        args,
                        location: loc,
                    });
                }
                TokenKind::LParen | TokenKind::String | TokenKind::LBrace => {
                    let loc = self.current_location();
                    let args = self.parse_call_arguments();
                    expr = Expression::Call(CallExpr {
                        callee: Box::new(expr),
                        method: None,
                        args,
                        location: loc,
                    });
                }
                _ => break,
            }
        }

        self.leave_levels(levels);
        expr
    }

    /// Parse call arguments: `(exprlist)`, or a single string or table
    /// literal written directly after the callee.
    fn parse_call_arguments(&mut self) -> Vec<Expression> {
        match self.peek_kind() {
            TokenKind::String => {
                let token = self.advance();
                vec![Expression::String(token.text, token.location)]
            }
            TokenKind::LBrace => vec![Expression::Table(self.parse_table_constructor())],
            _ => {
                self.expect(TokenKind::LParen);
                let args = if self.check(TokenKind::RParen) {
                    Vec::new()
                } else {
                    self.parse_expression_list()
                };
                self.expect(TokenKind::RParen);
                args
            }
        }
    }

    /// Parse primary expression (literals, names, tables, functions, parens)
    fn parse_primary(&mut self) -> Expression {
        let token = self.peek_token().clone();
        let loc = token.location;

        match token.kind {
            TokenKind::Ident => {
                self.advance();
                Expression::Identifier(token.text, loc)
            }
            TokenKind::Int => {
                self.advance();
                Expression::Integer(self.integer_value(&token), loc)
            }
            TokenKind::Float => {
                self.advance();
                Expression::Float(self.float_value(&token), loc)
            }
            TokenKind::String => {
                self.advance();
                Expression::String(token.text, loc)
            }
            TokenKind::True => {
                self.advance();
                Expression::Boolean(true, loc)
            }
            TokenKind::False => {
                self.advance();
                Expression::Boolean(false, loc)
            }
            TokenKind::Nil => {
                self.advance();
                Expression::Nil { location: loc }
            }
            TokenKind::Ellipsis => {
                self.advance();
                Expression::Identifier(VARARG_PARAM.to_string(), loc)
            }
            TokenKind::LBrace => Expression::Table(self.parse_table_constructor()),
            TokenKind::Function => {
                self.advance();
                Expression::Function(self.parse_function_body(loc))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression();
                self.expect(TokenKind::RParen);
                expr
            }
            TokenKind::Illegal => {
                self.lexical_error(&token);
                self.advance();
                Expression::Error {
                    message: token.text,
                    location: loc,
                }
            }
            found => {
                self.error(
                    DiagnosticKind::UnexpectedToken { found },
                    format!("unexpected token: {} at line {}", found, token.line()),
                    loc,
                );
                self.advance();
                Expression::Error {
                    message: "unexpected token".to_string(),
                    location: loc,
                }
            }
        }
    }

    /// Parse `{ field {sep field} [sep] }` where sep is `,` or `;`
    pub(crate) fn parse_table_constructor(&mut self) -> TableConstructor {
        let loc = self.expect(TokenKind::LBrace).location;
        let mut fields = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            fields.push(self.parse_table_field());

            if !self.match_token(TokenKind::Comma) && !self.match_token(TokenKind::Semicolon) {
                break;
            }
        }

        self.expect(TokenKind::RBrace);

        TableConstructor {
            fields,
            location: loc,
        }
    }

    /// Parse `[key] = value`, `key = value`, or a positional `value`
    fn parse_table_field(&mut self) -> TableField {
        let loc = self.current_location();

        if self.match_token(TokenKind::LBracket) {
            let key = self.parse_expression();
            self.expect(TokenKind::RBracket);
            self.expect(TokenKind::Assign);
            let value = self.parse_expression();
            return TableField {
                key: Some(key),
                value,
                location: loc,
            };
        }

        let expr = self.parse_expression();
        if self.match_token(TokenKind::Assign) {
            // What was parsed is the key
            let value = self.parse_expression();
            return TableField {
                key: Some(expr),
                value,
                location: loc,
            };
        }

        TableField {
            key: None,
            value: expr,
            location: loc,
        }
    }

    /// Convert integer literal text. Hex literals wrap to `i64` the way Lua
    /// integers do; text that does not convert is reported and yields 0.
    fn integer_value(&mut self, token: &Token) -> i64 {
        let text = token.text.as_str();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) if !hex.is_empty() => hex
                .chars()
                .try_fold(0u64, |acc, c| {
                    c.to_digit(16)
                        .map(|d| acc.wrapping_mul(16).wrapping_add(u64::from(d)))
                })
                .map(|v| v as i64),
            Some(_) => None,
            None => text.parse::<i64>().ok(),
        };

        parsed.unwrap_or_else(|| {
            self.invalid_number(token);
            0
        })
    }

    fn float_value(&mut self, token: &Token) -> f64 {
        token.text.parse::<f64>().unwrap_or_else(|_| {
            self.invalid_number(token);
            0.0
        })
    }

    fn invalid_number(&mut self, token: &Token) {
        self.error(
            DiagnosticKind::InvalidNumber,
            format!(
                "invalid number literal '{}' at line {}",
                token.text,
                token.line()
            ),
            token.location,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::errors::DiagnosticKind;
    use crate::parser::parse::Parser;

    /// Parse `x = <expr>` and return the value expression.
    fn value_of(expr: &str) -> Expression {
        let source = format!("x = {}", expr);
        let (program, result) = Parser::new(&source).parse();
        assert!(result.is_ok(), "unexpected diagnostics: {:?}", result);
        match program.statements.into_iter().next() {
            Some(Statement::Assignment(mut assign)) => assign.values.remove(0),
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        match value_of("1 + 2 * 3") {
            Expression::Binary {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expression::Integer(1, _)));
                assert!(matches!(*right, Expression::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_or_is_loosest() {
        match value_of("a and b or c and d") {
            Expression::Binary {
                op: BinOp::Or,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expression::Binary { op: BinOp::And, .. }));
                assert!(matches!(*right, Expression::Binary { op: BinOp::And, .. }));
            }
            other => panic!("Expected or, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_is_looser_than_concat() {
        assert!(matches!(
            value_of("a .. b == c"),
            Expression::Binary { op: BinOp::Eq, .. }
        ));
    }

    #[test]
    fn test_unary_minus_applies_to_power() {
        match value_of("-2 ^ 2") {
            Expression::Unary {
                op: UnOp::Neg,
                operand,
                ..
            } => assert!(matches!(*operand, Expression::Binary { op: BinOp::Pow, .. })),
            other => panic!("Expected negation, got {:?}", other),
        }
    }

    #[test]
    fn test_power_with_negative_exponent() {
        match value_of("2 ^ -1") {
            Expression::Binary {
                op: BinOp::Pow,
                right,
                ..
            } => assert!(matches!(*right, Expression::Unary { op: UnOp::Neg, .. })),
            other => panic!("Expected power, got {:?}", other),
        }
    }

    #[test]
    fn test_not_and_length() {
        match value_of("not #t") {
            Expression::Unary {
                op: UnOp::Not,
                operand,
                ..
            } => assert!(matches!(*operand, Expression::Unary { op: UnOp::Len, .. })),
            other => panic!("Expected not, got {:?}", other),
        }
    }

    #[test]
    fn test_shift_between_concat_and_additive() {
        match value_of("1 << 2 + 3") {
            Expression::Binary {
                op: BinOp::Shl,
                right,
                ..
            } => assert!(matches!(*right, Expression::Binary { op: BinOp::Add, .. })),
            other => panic!("Expected shift, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert!(matches!(
            value_of("(1 + 2) * 3"),
            Expression::Binary { op: BinOp::Mul, .. }
        ));
    }

    #[test]
    fn test_call_sugar() {
        match value_of("require \"mod\"") {
            Expression::Call(call) => {
                assert!(call.method.is_none());
                assert!(matches!(&call.args[..], [Expression::String(s, _)] if s == "mod"));
            }
            other => panic!("Expected call, got {:?}", other),
        }

        match value_of("obj:configure { debug = true }") {
            Expression::Call(call) => {
                assert_eq!(call.method.as_deref(), Some("configure"));
                assert!(matches!(&call.args[..], [Expression::Table(_)]));
            }
            other => panic!("Expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_postfix_chain() {
        // a.b[1]:c()("d")
        match value_of("a.b[1]:c()(\"d\")") {
            Expression::Call(outer) => {
                assert!(outer.method.is_none());
                match *outer.callee {
                    Expression::Call(inner) => {
                        assert_eq!(inner.method.as_deref(), Some("c"));
                        assert!(matches!(*inner.callee, Expression::Index { .. }));
                    }
                    other => panic!("Expected method call, got {:?}", other),
                }
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_table_field_forms() {
        match value_of("{ [1 + 1] = 'two', name = 'n'; 'pos', }") {
            Expression::Table(table) => {
                assert_eq!(table.fields.len(), 3);
                assert!(matches!(
                    table.fields[0].key,
                    Some(Expression::Binary { op: BinOp::Add, .. })
                ));
                assert!(matches!(&table.fields[1].key, Some(Expression::Identifier(k, _)) if k == "name"));
                assert!(table.fields[2].is_positional());

                let positional: Vec<_> = table.positional().map(|(i, _)| i).collect();
                assert_eq!(positional, vec![1]);
                assert_eq!(table.keyed().count(), 2);
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_function_literal() {
        match value_of("function(a, b) return a + b end") {
            Expression::Function(function) => {
                assert_eq!(function.param_names(), vec!["a", "b"]);
                assert!(matches!(function.body[0], Statement::Return { .. }));
            }
            other => panic!("Expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_hex_and_float_values() {
        assert!(matches!(value_of("0x1F"), Expression::Integer(31, _)));
        assert!(matches!(value_of("0xffffffffffffffff"), Expression::Integer(-1, _)));
        // Digits past 64 bits wrap around
        assert!(matches!(value_of("0x1ffffffffffffffff"), Expression::Integer(-1, _)));
        assert!(matches!(value_of("0x10000000000000001"), Expression::Integer(1, _)));
        assert!(matches!(value_of("2.5e1"), Expression::Float(v, _) if v == 25.0));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut parser = Parser::new("x = 1e y = 0x");
        let (program, result) = parser.parse();

        let error = result.expect_err("malformed numbers must be reported");
        assert_eq!(error.len(), 2);
        assert!(error
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::InvalidNumber));
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(
            &program.statements[0],
            Statement::Assignment(a) if matches!(a.values[0], Expression::Float(v, _) if v == 0.0)
        ));
    }

    #[test]
    fn test_decimal_overflow_is_reported() {
        let (_, result) = Parser::new("x = 99999999999999999999").parse();
        let error = result.expect_err("overflowing integer must be reported");
        assert_eq!(error.diagnostics[0].kind, DiagnosticKind::InvalidNumber);
    }

    #[test]
    fn test_bare_hex_prefix_is_reported() {
        let (_, result) = Parser::new("x = 0x").parse();
        let error = result.expect_err("0x without digits must be reported");
        assert_eq!(error.diagnostics[0].message, "invalid number literal '0x' at line 1");
    }

    #[test]
    fn test_long_operator_chain_is_bounded() {
        let source = format!("x = 1{}", " + 1".repeat(500));
        let (program, result) = Parser::new(&source).parse();

        let error = result.expect_err("over-long chain must be reported");
        assert_eq!(error.len(), 1);
        assert_eq!(error.diagnostics[0].kind, DiagnosticKind::TooDeep);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_chain_within_limit_parses() {
        let source = format!("x = 1{}", " .. 1".repeat(150));
        let (_, result) = Parser::new(&source).parse();
        assert!(result.is_ok());
    }
}
