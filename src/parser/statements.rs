//! Statement parsing implementation
//!
//! This module handles parsing of all Lua statement types:
//!
//! - Assignments: `x = 1`, `a, t.k, t[i] = 1, 2, 3`
//! - Declarations: `local a, b = 1, 2`, `local function f() end`,
//!   `function a.b:m() end`
//! - Control flow: `if`, `while`, `repeat`, numeric and generic `for`, `do`
//! - Jumps: `return`, `break`, `goto`, `::label::`
//! - Call statements and the empty statement `;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= if_stmt | while_stmt | do_block | for_stmt | repeat_stmt
//!             | function_stmt | local_stmt | return_stmt | 'break'
//!             | 'goto' Name | '::' Name '::' | ';' | expr_stmt
//! expr_stmt ::= target {',' target} '=' exprlist | call
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::constants::VARARG_PARAM;
use crate::parser::errors::DiagnosticKind;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    /// Parse statements until a block terminator (`end`, `else`, `elseif`,
    /// `until`, EOF). The terminator itself is left for the caller.
    pub(crate) fn parse_block(&mut self) -> Vec<Statement> {
        if !self.enter_level() {
            let skipped = self.nested_block_error();
            self.leave_levels(1);
            return skipped;
        }

        let mut statements = Vec::new();
        while !self.at_block_end() {
            statements.push(self.parse_statement());
        }

        self.leave_levels(1);
        statements
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Statement {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Do => {
                self.advance();
                let body = self.parse_block();
                self.expect(TokenKind::End);
                Statement::Do {
                    body,
                    location: loc,
                }
            }
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Repeat => self.parse_repeat_statement(),
            TokenKind::Function => self.parse_function_statement(),
            TokenKind::Local => self.parse_local_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                self.advance();
                Statement::Break { location: loc }
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_identifier();
                Statement::Goto {
                    label,
                    location: loc,
                }
            }
            TokenKind::DoubleColon => {
                self.advance();
                let name = self.expect_identifier();
                self.expect(TokenKind::DoubleColon);
                Statement::Label {
                    name,
                    location: loc,
                }
            }
            TokenKind::Semicolon => {
                self.advance();
                Statement::Empty { location: loc }
            }
            // Only reachable outside any block
            found @ (TokenKind::End | TokenKind::Else | TokenKind::Elseif | TokenKind::Until) => {
                self.error(
                    DiagnosticKind::UnexpectedToken { found },
                    format!("unexpected token: {} at line {}", found, loc.line),
                    loc,
                );
                self.advance();
                Statement::Error {
                    message: "unexpected token".to_string(),
                    location: loc,
                }
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Parse `if cond then block {elseif cond then block} [else block] end`
    fn parse_if_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        let condition = self.parse_expression();
        self.expect(TokenKind::Then);
        let then_block = self.parse_block();

        let mut elseifs = Vec::new();
        while self.check(TokenKind::Elseif) {
            let elseif_loc = self.advance().location;
            let condition = self.parse_expression();
            self.expect(TokenKind::Then);
            let block = self.parse_block();
            elseifs.push(ElseIf {
                condition,
                block,
                location: elseif_loc,
            });
        }

        let else_block = if self.match_token(TokenKind::Else) {
            Some(self.parse_block())
        } else {
            None
        };

        self.expect(TokenKind::End);

        Statement::If {
            condition,
            then_block,
            elseifs,
            else_block,
            location: loc,
        }
    }

    /// Parse `while cond do block end`
    fn parse_while_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        let condition = self.parse_expression();
        self.expect(TokenKind::Do);
        let body = self.parse_block();
        self.expect(TokenKind::End);

        Statement::While {
            condition,
            body,
            location: loc,
        }
    }

    /// Parse `repeat block until cond`
    fn parse_repeat_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        let body = self.parse_block();
        self.expect(TokenKind::Until);
        let condition = self.parse_expression();

        Statement::Repeat {
            body,
            condition,
            location: loc,
        }
    }

    /// Parse either loop form:
    /// `for v = init, limit [, step] do block end` or
    /// `for n1, n2 in exprlist do block end`
    fn parse_for_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        if self.peek_ahead(1).is(TokenKind::Assign) {
            return self.parse_numeric_for(loc);
        }

        let mut names = vec![self.expect_identifier()];
        while self.match_token(TokenKind::Comma) {
            names.push(self.expect_identifier());
        }

        self.expect(TokenKind::In);
        let iterators = self.parse_expression_list();
        self.expect(TokenKind::Do);
        let body = self.parse_block();
        self.expect(TokenKind::End);

        Statement::GenericFor {
            names,
            iterators,
            body,
            location: loc,
        }
    }

    /// Numeric `for`, normalized into init assignment, limit condition and
    /// post step.
    fn parse_numeric_for(&mut self, loc: SourceLocation) -> Statement {
        let var = self.expect(TokenKind::Ident);
        let variable = Expression::Identifier(var.text, var.location);
        self.expect(TokenKind::Assign);

        let init_value = self.parse_expression();
        self.expect(TokenKind::Comma);
        let limit = self.parse_expression();

        let (step, step_loc) = if self.match_token(TokenKind::Comma) {
            let step_loc = self.current_location();
            (Some(self.parse_expression()), step_loc)
        } else {
            (None, loc)
        };

        self.expect(TokenKind::Do);
        let body = self.parse_block();
        self.expect(TokenKind::End);

        Statement::NumericFor {
            init: Assignment {
                targets: vec![AssignTarget::new(variable.clone())],
                values: vec![init_value],
                location: loc,
            },
            condition: limit,
            post: PostAssignment {
                target: AssignTarget::new(variable),
                value: step,
                location: step_loc,
            },
            body,
            location: loc,
        }
    }

    /// Parse `function a.b.c:m(params) block end`
    fn parse_function_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        let name = self.parse_function_name();
        let function = self.parse_function_body(loc);

        Statement::Function {
            name,
            function,
            location: loc,
        }
    }

    fn parse_function_name(&mut self) -> FunctionName {
        let mut path = vec![self.expect_identifier()];
        while self.match_token(TokenKind::Dot) {
            path.push(self.expect_identifier());
        }

        let method = if self.match_token(TokenKind::Colon) {
            Some(self.expect_identifier())
        } else {
            None
        };

        FunctionName { path, method }
    }

    /// Parse `(params) block end`, shared by declarations and literals.
    pub(crate) fn parse_function_body(&mut self, loc: SourceLocation) -> FunctionBody {
        self.expect(TokenKind::LParen);

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let token = self.peek_token().clone();
                match token.kind {
                    TokenKind::Ident => {
                        self.advance();
                        params.push(Param {
                            name: token.text,
                            location: token.location,
                        });
                    }
                    TokenKind::Ellipsis => {
                        self.advance();
                        params.push(Param {
                            name: VARARG_PARAM.to_string(),
                            location: token.location,
                        });
                        // Varargs must be last
                        break;
                    }
                    _ => {
                        self.expect(TokenKind::Ident);
                        break;
                    }
                }

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen);

        let body = self.parse_block();
        self.expect(TokenKind::End);

        FunctionBody {
            params,
            body,
            location: loc,
        }
    }

    /// Parse `local function f() end` or `local a, b [= exprlist]`
    fn parse_local_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        if self.match_token(TokenKind::Function) {
            let name = self.expect_identifier();
            let function = self.parse_function_body(loc);
            return Statement::LocalFunction {
                name,
                function,
                location: loc,
            };
        }

        let mut names = vec![self.expect_identifier()];
        while self.match_token(TokenKind::Comma) {
            names.push(self.expect_identifier());
        }

        let values = if self.match_token(TokenKind::Assign) {
            self.parse_expression_list()
        } else {
            Vec::new()
        };

        Statement::Local {
            names,
            values,
            location: loc,
        }
    }

    /// Parse `return [exprlist] [';']`
    fn parse_return_statement(&mut self) -> Statement {
        let loc = self.advance().location;

        let values = if self.at_block_end() || self.check(TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.parse_expression_list()
        };
        self.match_token(TokenKind::Semicolon);

        Statement::Return {
            values,
            location: loc,
        }
    }

    /// Parse an assignment, a call statement, or a bare expression.
    fn parse_expression_statement(&mut self) -> Statement {
        let loc = self.current_location();
        let first = self.parse_expression();

        if self.check(TokenKind::Assign) || self.check(TokenKind::Comma) {
            let mut targets = vec![self.assign_target(first)];
            while self.match_token(TokenKind::Comma) {
                let next = self.parse_expression();
                targets.push(self.assign_target(next));
            }

            self.expect(TokenKind::Assign);
            let values = self.parse_expression_list();

            return Statement::Assignment(Assignment {
                targets,
                values,
                location: loc,
            });
        }

        match first {
            Expression::Call(call) => Statement::Call(call),
            expr => Statement::Expression {
                expr,
                location: loc,
            },
        }
    }

    fn assign_target(&mut self, expr: Expression) -> AssignTarget {
        let target = AssignTarget::new(expr);
        // Error nodes were already reported where they were produced
        if !target.is_assignable() && !target.expr.is_error() {
            let location = target.location();
            self.error(
                DiagnosticKind::InvalidAssignmentTarget,
                format!(
                    "cannot assign to {} at line {}",
                    target.expr.kind_name(),
                    location.line
                ),
                location,
            );
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_ok(source: &str) -> Program {
        let (program, result) = Parser::new(source).parse();
        assert!(result.is_ok(), "unexpected diagnostics: {:?}", result);
        program
    }

    #[test]
    fn test_if_elseif_else() {
        let program = parse_ok("if a then x = 1 elseif b then x = 2 elseif c then else x = 4 end");

        match &program.statements[0] {
            Statement::If {
                then_block,
                elseifs,
                else_block,
                ..
            } => {
                assert_eq!(then_block.len(), 1);
                assert_eq!(elseifs.len(), 2);
                assert!(elseifs[1].block.is_empty());
                assert_eq!(else_block.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        let program = parse_ok("if a then end");
        assert!(matches!(
            &program.statements[0],
            Statement::If { else_block: None, elseifs, .. } if elseifs.is_empty()
        ));
    }

    #[test]
    fn test_numeric_for_without_step() {
        let program = parse_ok("for i = 1, n do end");

        match &program.statements[0] {
            Statement::NumericFor { init, post, .. } => {
                assert_eq!(init.targets[0].name().as_deref(), Some("i"));
                assert_eq!(post.target.name().as_deref(), Some("i"));
                assert!(post.value.is_none());
            }
            other => panic!("Expected numeric for, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_for() {
        let program = parse_ok("for k, v in pairs(t), extra do print(k) end");

        match &program.statements[0] {
            Statement::GenericFor {
                names,
                iterators,
                body,
                ..
            } => {
                assert_eq!(names, &["k", "v"]);
                assert_eq!(iterators.len(), 2);
                assert!(matches!(body[0], Statement::Call(_)));
            }
            other => panic!("Expected generic for, got {:?}", other),
        }
    }

    #[test]
    fn test_function_name_path_and_method() {
        let program = parse_ok("function a.b.c:m(x, ...) return x end");

        match &program.statements[0] {
            Statement::Function { name, function, .. } => {
                assert_eq!(name.path, vec!["a", "b", "c"]);
                assert_eq!(name.method.as_deref(), Some("m"));
                assert_eq!(name.to_string(), "a.b.c:m");
                assert_eq!(function.param_names(), vec!["x", "..."]);
                assert!(function.params[1].is_vararg());
            }
            other => panic!("Expected function statement, got {:?}", other),
        }
    }

    #[test]
    fn test_local_forms() {
        let program = parse_ok("local a, b = 1 local c local function f() end");

        assert!(matches!(
            &program.statements[0],
            Statement::Local { names, values, .. } if names.len() == 2 && values.len() == 1
        ));
        assert!(matches!(
            &program.statements[1],
            Statement::Local { values, .. } if values.is_empty()
        ));
        assert!(matches!(
            &program.statements[2],
            Statement::LocalFunction { name, .. } if name == "f"
        ));
    }

    #[test]
    fn test_jumps_and_labels() {
        let program = parse_ok("::top:: goto top; while true do break end return");

        assert!(matches!(&program.statements[0], Statement::Label { name, .. } if name == "top"));
        assert!(matches!(&program.statements[1], Statement::Goto { label, .. } if label == "top"));
        assert!(matches!(&program.statements[2], Statement::Empty { .. }));
        assert!(matches!(&program.statements[3], Statement::While { .. }));
        assert!(matches!(&program.statements[4], Statement::Return { values, .. } if values.is_empty()));
    }

    #[test]
    fn test_multiple_assignment_targets() {
        let program = parse_ok("a, t.k, t[1] = 1, 2");

        match &program.statements[0] {
            Statement::Assignment(assign) => {
                let names: Vec<_> = assign.targets.iter().map(|t| t.name()).collect();
                assert_eq!(
                    names,
                    vec![Some("a".to_string()), Some("t.k".to_string()), Some("t".to_string())]
                );
                assert_eq!(assign.values.len(), 2);
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_expression_statement() {
        let program = parse_ok("x + 1");
        assert!(matches!(
            &program.statements[0],
            Statement::Expression { expr: Expression::Binary { .. }, .. }
        ));
    }

    #[test]
    fn test_break_location_is_its_own_token() {
        let program = parse_ok("break\nx = 1");
        assert_eq!(program.statements[0].location().line, 1);
        assert_eq!(program.statements[1].location().line, 2);
    }
}
