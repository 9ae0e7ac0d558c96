//! Syntax tree outline printer
//!
//! Flattens a [`Program`] into indented rows for debugging output and the
//! tree pane of the explorer. Example:
//!
//! ```text
//! Program [1:1]
//! ├── Local t [1:1]
//! │   └── Table [1:11]
//! │       └── Field #1 [1:12]
//! │           └── Integer 1 [1:12]
//! └── Return [2:1]
//!     └── Identifier t [2:8]
//! ```
//!
//! Group rows such as `Condition`, `Body` or `Args` carry the location of the
//! node that owns them.

use crate::parser::ast::*;

/// One printed line of the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub depth: usize,
    /// Box-drawing prefix (`├── `, `│   └── `, ...). Empty for the root.
    pub prefix: String,
    pub label: String,
    pub location: SourceLocation,
}

impl OutlineRow {
    pub fn line(&self) -> usize {
        self.location.line
    }
}

struct Node {
    label: String,
    location: SourceLocation,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            label: label.into(),
            location,
            children: Vec::new(),
        }
    }

    fn with(label: impl Into<String>, location: SourceLocation, children: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            location,
            children,
        }
    }
}

/// Outline rows for `program`, root first, in source order.
pub fn outline(program: &Program) -> Vec<OutlineRow> {
    let root = Node::with(
        "Program",
        SourceLocation::new(1, 1),
        block(&program.statements),
    );

    let mut rows = Vec::new();
    flatten(&root, 0, "", None, &mut rows);
    rows
}

/// Outline as text, one row per line.
pub fn render(program: &Program) -> String {
    outline(program)
        .iter()
        .map(|row| format!("{}{} [{}]", row.prefix, row.label, row.location))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `is_last` is `None` for the root.
fn flatten(node: &Node, depth: usize, lead: &str, is_last: Option<bool>, rows: &mut Vec<OutlineRow>) {
    let (prefix, child_lead) = match is_last {
        None => (String::new(), String::new()),
        Some(true) => (format!("{}└── ", lead), format!("{}    ", lead)),
        Some(false) => (format!("{}├── ", lead), format!("{}│   ", lead)),
    };

    rows.push(OutlineRow {
        depth,
        prefix,
        label: node.label.clone(),
        location: node.location,
    });

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        flatten(child, depth + 1, &child_lead, Some(i + 1 == count), rows);
    }
}

fn block(statements: &[Statement]) -> Vec<Node> {
    statements.iter().map(statement).collect()
}

fn exprs(expressions: &[Expression]) -> Vec<Node> {
    expressions.iter().map(expression).collect()
}

fn target_names(targets: &[AssignTarget]) -> String {
    targets
        .iter()
        .map(|t| t.name().unwrap_or_else(|| "?".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn signature(function: &FunctionBody) -> String {
    format!("({})", function.param_names().join(", "))
}

fn statement(stmt: &Statement) -> Node {
    let loc = stmt.location();

    match stmt {
        Statement::Assignment(assign) => Node::with(
            format!("Assignment {}", target_names(&assign.targets)),
            loc,
            exprs(&assign.values),
        ),
        Statement::Local { names, values, .. } => {
            Node::with(format!("Local {}", names.join(", ")), loc, exprs(values))
        }
        Statement::LocalFunction { name, function, .. } => Node::with(
            format!("LocalFunction {}{}", name, signature(function)),
            loc,
            block(&function.body),
        ),
        Statement::Function { name, function, .. } => Node::with(
            format!("Function {}{}", name, signature(function)),
            loc,
            block(&function.body),
        ),
        Statement::Call(call) => call_node(call),
        Statement::If {
            condition,
            then_block,
            elseifs,
            else_block,
            ..
        } => {
            let mut children = vec![
                Node::with("Condition", loc, vec![expression(condition)]),
                Node::with("Then", loc, block(then_block)),
            ];
            for elseif in elseifs {
                children.push(Node::with(
                    "ElseIf",
                    elseif.location,
                    vec![
                        Node::with("Condition", elseif.location, vec![expression(&elseif.condition)]),
                        Node::with("Then", elseif.location, block(&elseif.block)),
                    ],
                ));
            }
            if let Some(else_block) = else_block {
                children.push(Node::with("Else", loc, block(else_block)));
            }
            Node::with("If", loc, children)
        }
        Statement::While {
            condition, body, ..
        } => Node::with(
            "While",
            loc,
            vec![
                Node::with("Condition", loc, vec![expression(condition)]),
                Node::with("Body", loc, block(body)),
            ],
        ),
        Statement::Repeat {
            body, condition, ..
        } => Node::with(
            "Repeat",
            loc,
            vec![
                Node::with("Body", loc, block(body)),
                Node::with("Until", loc, vec![expression(condition)]),
            ],
        ),
        Statement::NumericFor {
            init,
            condition,
            post,
            body,
            ..
        } => {
            let mut children = vec![
                Node::with("Init", loc, exprs(&init.values)),
                Node::with("Limit", loc, vec![expression(condition)]),
            ];
            if let Some(step) = &post.value {
                children.push(Node::with("Step", post.location, vec![expression(step)]));
            }
            children.push(Node::with("Body", loc, block(body)));
            Node::with(
                format!("NumericFor {}", target_names(&init.targets)),
                loc,
                children,
            )
        }
        Statement::GenericFor {
            names,
            iterators,
            body,
            ..
        } => Node::with(
            format!("GenericFor {}", names.join(", ")),
            loc,
            vec![
                Node::with("In", loc, exprs(iterators)),
                Node::with("Body", loc, block(body)),
            ],
        ),
        Statement::Return { values, .. } => Node::with("Return", loc, exprs(values)),
        Statement::Break { .. } => Node::leaf("Break", loc),
        Statement::Goto { label, .. } => Node::leaf(format!("Goto {}", label), loc),
        Statement::Label { name, .. } => Node::leaf(format!("Label ::{}::", name), loc),
        Statement::Do { body, .. } => Node::with("Do", loc, block(body)),
        Statement::Empty { .. } => Node::leaf("Empty", loc),
        Statement::Expression { expr, .. } => {
            Node::with("ExpressionStatement", loc, vec![expression(expr)])
        }
        Statement::Error { message, .. } => Node::leaf(format!("Error: {}", message), loc),
    }
}

fn call_node(call: &CallExpr) -> Node {
    let label = match &call.method {
        Some(method) => format!("MethodCall :{}", method),
        None => "Call".to_string(),
    };

    let mut children = vec![expression(&call.callee)];
    if !call.args.is_empty() {
        children.push(Node::with("Args", call.location, exprs(&call.args)));
    }
    Node::with(label, call.location, children)
}

fn expression(expr: &Expression) -> Node {
    let loc = expr.location();

    match expr {
        Expression::Identifier(name, _) => Node::leaf(format!("Identifier {}", name), loc),
        Expression::Integer(value, _) => Node::leaf(format!("Integer {}", value), loc),
        Expression::Float(value, _) => Node::leaf(format!("Float {:?}", value), loc),
        Expression::String(value, _) => Node::leaf(format!("String {:?}", value), loc),
        Expression::Boolean(value, _) => Node::leaf(format!("Boolean {}", value), loc),
        Expression::Nil { .. } => Node::leaf("Nil", loc),
        Expression::Table(table) => {
            let mut position = 0;
            let fields = table
                .fields
                .iter()
                .map(|field| match &field.key {
                    None => {
                        position += 1;
                        Node::with(
                            format!("Field #{}", position),
                            field.location,
                            vec![expression(&field.value)],
                        )
                    }
                    Some(key) => Node::with(
                        "Field",
                        field.location,
                        vec![
                            Node::with("Key", field.location, vec![expression(key)]),
                            Node::with("Value", field.location, vec![expression(&field.value)]),
                        ],
                    ),
                })
                .collect();
            Node::with("Table", loc, fields)
        }
        Expression::Function(function) => Node::with(
            format!("FunctionLiteral{}", signature(function)),
            loc,
            block(&function.body),
        ),
        Expression::Binary {
            op, left, right, ..
        } => Node::with(
            format!("Binary {}", op),
            loc,
            vec![expression(left), expression(right)],
        ),
        Expression::Unary { op, operand, .. } => {
            Node::with(format!("Unary {}", op), loc, vec![expression(operand)])
        }
        Expression::Index { object, index, .. } => {
            Node::with("Index", loc, vec![expression(object), expression(index)])
        }
        Expression::Member { object, member, .. } => {
            Node::with(format!("Member .{}", member), loc, vec![expression(object)])
        }
        Expression::Call(call) => call_node(call),
        Expression::Error { message, .. } => Node::leaf(format!("Error: {}", message), loc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;

    #[test]
    fn test_render_binary_assignment() {
        let (program, result) = parse("x = 1 + 2");
        assert!(result.is_ok());

        let expected = "\
Program [1:1]
└── Assignment x [1:1]
    └── Binary + [1:7]
        ├── Integer 1 [1:5]
        └── Integer 2 [1:9]";
        assert_eq!(render(&program), expected);
    }

    #[test]
    fn test_prefixes_continue_past_open_siblings() {
        let (program, _) = parse("local t = {1}\nreturn t");
        let rows = outline(&program);

        let text: Vec<String> = rows
            .iter()
            .map(|r| format!("{}{}", r.prefix, r.label))
            .collect();
        assert_eq!(
            text,
            vec![
                "Program",
                "├── Local t",
                "│   └── Table",
                "│       └── Field #1",
                "│           └── Integer 1",
                "└── Return",
                "    └── Identifier t",
            ]
        );
        assert_eq!(rows[5].line(), 2);
        assert_eq!(rows[4].depth, 4);
    }

    #[test]
    fn test_if_groups() {
        let (program, _) = parse("if a then b() elseif c then else d = 1 end");
        let labels: Vec<String> = outline(&program).into_iter().map(|r| r.label).collect();

        assert_eq!(
            labels,
            vec![
                "Program",
                "If",
                "Condition",
                "Identifier a",
                "Then",
                "Call",
                "Identifier b",
                "ElseIf",
                "Condition",
                "Identifier c",
                "Then",
                "Else",
                "Assignment d",
                "Integer 1",
            ]
        );
    }

    #[test]
    fn test_labels_for_declarations_and_calls() {
        let (program, _) = parse("function a.b:m(x, ...) obj:run(\"go\") end");
        let labels: Vec<String> = outline(&program).into_iter().map(|r| r.label).collect();

        assert_eq!(labels[1], "Function a.b:m(x, ...)");
        assert_eq!(labels[2], "MethodCall :run");
        assert_eq!(labels[3], "Identifier obj");
        assert_eq!(labels[4], "Args");
        assert_eq!(labels[5], "String \"go\"");
    }

    #[test]
    fn test_numeric_for_without_step() {
        let (program, _) = parse("for i = 1, 10 do end");
        let labels: Vec<String> = outline(&program).into_iter().map(|r| r.label).collect();

        assert_eq!(
            labels,
            vec![
                "Program",
                "NumericFor i",
                "Init",
                "Integer 1",
                "Limit",
                "Integer 10",
                "Body",
            ]
        );
    }

    #[test]
    fn test_error_nodes_are_listed() {
        let (program, result) = parse("x = )");
        assert!(result.is_err());
        assert!(render(&program).contains("Error: unexpected token"));
    }
}
