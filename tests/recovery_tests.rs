// Error recovery tests: malformed input must produce diagnostics and a complete tree

use luaparse::parser::ast::*;
use luaparse::parser::lexer::{Lexer, Token, TokenKind};
use luaparse::parser::{parse, DiagnosticKind, Parser};

#[test]
fn test_illegal_character_in_value() {
    let (program, result) = parse("x = @");

    let error = result.expect_err("illegal character must be reported");
    assert!(!error.is_empty());
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::Lexical);
    assert_eq!(
        error.diagnostics[0].message,
        "unexpected token: ILLEGAL at line 1: illegal character '@'"
    );

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0] {
        Statement::Assignment(assign) => {
            assert_eq!(assign.targets[0].name().as_deref(), Some("x"));
            assert!(assign.values[0].is_error());
        }
        other => panic!("Expected assignment, got {:?}", other),
    }
}

#[test]
fn test_unterminated_string() {
    let (program, result) = parse("s = \"never closed");

    let error = result.expect_err("unterminated string must be reported");
    assert_eq!(error.len(), 1);
    assert_eq!(
        error.diagnostics[0].message,
        "unexpected token: ILLEGAL at line 1: unterminated string"
    );
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_lone_tilde() {
    let (_, result) = parse("x = a ~ b");
    let error = result.expect_err("lone ~ must be reported");
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::Lexical);
    assert!(error.diagnostics[0].message.ends_with("illegal character '~'"));
}

#[test]
fn test_missing_then_keeps_parsing() {
    let (program, result) = parse("if x y = 1 end\nz = 2");

    let error = result.expect_err("missing then must be reported");
    assert_eq!(error.len(), 1);
    assert_eq!(
        error.diagnostics[0].kind,
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::Then,
            found: TokenKind::Ident,
        }
    );
    assert_eq!(
        error.diagnostics[0].message,
        "expected then but got IDENT at line 1"
    );

    assert_eq!(program.statements.len(), 2);
    match &program.statements[0] {
        Statement::If { then_block, .. } => assert_eq!(then_block.len(), 1),
        other => panic!("Expected if, got {:?}", other),
    }
    assert!(program.find_assignment("z").is_some());
}

#[test]
fn test_missing_end_at_eof() {
    let (program, result) = parse("while true do x = 1");

    let error = result.expect_err("missing end must be reported");
    assert_eq!(error.diagnostics[0].message, "expected end but got EOF at line 1");
    assert!(matches!(program.statements[0], Statement::While { .. }));
}

#[test]
fn test_stray_terminator_is_skipped() {
    let (program, result) = parse("end x = 1");

    let error = result.expect_err("stray end must be reported");
    assert_eq!(
        error.diagnostics[0].kind,
        DiagnosticKind::UnexpectedToken {
            found: TokenKind::End
        }
    );
    assert_eq!(error.diagnostics[0].message, "unexpected token: end at line 1");
    assert!(matches!(
        &program.statements[0],
        Statement::Error { message, .. } if message == "unexpected token"
    ));
    assert!(program.find_assignment("x").is_some());
}

#[test]
fn test_every_error_is_collected() {
    let source = "a = )\nb = 1\nc = (2\nd = @\ne = 3";
    let (program, result) = parse(source);

    let error = result.expect_err("three problems expected");
    let lines: Vec<usize> = error.diagnostics.iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![1, 4, 4]);

    // Rendered error lists every message on its own line
    assert_eq!(error.to_string().lines().count(), 3);
    assert!(program.find_assignment("e").is_some());
}

#[test]
fn test_invalid_assignment_target() {
    let (program, result) = parse("f() = 1");

    let error = result.expect_err("call target must be reported");
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::InvalidAssignmentTarget);
    assert_eq!(error.diagnostics[0].message, "cannot assign to Call at line 1");
    assert!(matches!(program.statements[0], Statement::Assignment(_)));
}

#[test]
fn test_parse_from_prebuilt_tokens() {
    let mut tokens = Lexer::new("x = 1").tokenize_all();
    tokens.pop(); // drop Eof

    let mut parser = Parser::from_tokens(tokens);
    let (program, result) = parser.parse();
    assert!(result.is_ok());
    assert_eq!(program.statements.len(), 1);
    assert!(parser.tokens().last().is_some_and(|t: &Token| t.is(TokenKind::Eof)));
}

#[test]
fn test_diagnostics_do_not_leak_between_parsers() {
    let (_, bad) = parse("x = @");
    let (_, good) = parse("x = 1");
    assert!(bad.is_err());
    assert!(good.is_ok());
}

#[test]
fn test_garbage_input_terminates() {
    let (_, result) = parse(") ] } , = == .. end until else");
    let error = result.expect_err("garbage must be reported");
    assert!(error.len() >= 5);
}

#[test]
fn test_deeply_nested_parentheses() {
    let source = format!("x = {}1{}\ny = 2", "(".repeat(10_000), ")".repeat(10_000));
    let (program, result) = parse(&source);

    let error = result.expect_err("nesting limit must be reported");
    assert_eq!(error.len(), 1);
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::TooDeep);
    assert_eq!(
        error.diagnostics[0].message,
        "nesting too deep (more than 200 levels) at line 1"
    );

    assert_eq!(program.statements.len(), 2);
    assert!(program.find_assignment("x").is_some());
    assert!(program.find_assignment("y").is_some());
}

#[test]
fn test_deeply_nested_unary_operators() {
    let source = format!("x = {}1", "-".repeat(10_000));
    let (program, result) = parse(&source);

    let error = result.expect_err("nesting limit must be reported");
    assert_eq!(error.len(), 1);
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::TooDeep);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_deeply_nested_blocks() {
    let source = format!("{}{}z = 1", "do ".repeat(10_000), "end ".repeat(10_000));
    let (program, result) = parse(&source);

    let error = result.expect_err("nesting limit must be reported");
    assert_eq!(error.len(), 1);
    assert_eq!(error.diagnostics[0].kind, DiagnosticKind::TooDeep);
    assert_eq!(program.statements.len(), 2);
    assert!(program.find_assignment("z").is_some());

    // The innermost kept block holds the skipped remainder
    let mut statement = &program.statements[0];
    while let Statement::Do { body, .. } = statement {
        statement = &body[0];
    }
    assert!(matches!(statement, Statement::Error { message, .. } if message == "too deeply nested"));
}

#[test]
fn test_deep_nesting_in_tables_and_calls() {
    let tables = format!("t = {}{}", "{".repeat(5_000), "}".repeat(5_000));
    let calls = format!("f{}{}", "(g".repeat(5_000), ")".repeat(5_000));

    for source in [tables, calls] {
        let (_, result) = parse(&source);
        let error = result.expect_err("nesting limit must be reported");
        assert!(error
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::TooDeep));
    }
}
