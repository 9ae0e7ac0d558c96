// Syntax tree definitions for the Lua front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Logical
    Or,
    And,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // String
    Concat,
    // Bitwise
    Shl,
    Shr,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinOp {
    /// The operator as written in Lua source.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Eq => "==",
            BinOp::Ne => "~=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Concat => "..",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not, // not x
    Neg, // -x
    Len, // #x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "not",
            UnOp::Neg => "-",
            UnOp::Len => "#",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Function parameter. A trailing `...` is stored under the name
/// [`VARARG_PARAM`](crate::parser::constants::VARARG_PARAM).
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub location: SourceLocation,
}

impl Param {
    pub fn is_vararg(&self) -> bool {
        self.name == crate::parser::constants::VARARG_PARAM
    }
}

/// Parameter list and body shared by function literals and declarations.
#[derive(Debug, Clone)]
pub struct FunctionBody {
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

impl FunctionBody {
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Name of a `function a.b.c:m() ... end` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionName {
    /// Dotted path, never empty after a successful parse (`["a", "b", "c"]`).
    pub path: Vec<String>,
    /// Method suffix after `:`.
    pub method: Option<String>,
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join("."))?;
        if let Some(method) = &self.method {
            write!(f, ":{}", method)?;
        }
        Ok(())
    }
}

/// Call expression: `callee(args)` or `callee:method(args)`.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expression>,
    pub method: Option<String>,
    pub args: Vec<Expression>,
    pub location: SourceLocation,
}

/// A single table constructor entry. Positional when `key` is `None`.
#[derive(Debug, Clone)]
pub struct TableField {
    pub key: Option<Expression>,
    pub value: Expression,
    pub location: SourceLocation,
}

impl TableField {
    pub fn is_positional(&self) -> bool {
        self.key.is_none()
    }
}

/// Table constructor `{ ... }`
#[derive(Debug, Clone)]
pub struct TableConstructor {
    pub fields: Vec<TableField>,
    pub location: SourceLocation,
}

impl TableConstructor {
    /// Positional fields paired with their implicit 1-based index.
    pub fn positional(&self) -> impl Iterator<Item = (usize, &Expression)> {
        self.fields
            .iter()
            .filter(|f| f.is_positional())
            .enumerate()
            .map(|(i, f)| (i + 1, &f.value))
    }

    /// Keyed fields as `(key, value)` pairs in source order.
    pub fn keyed(&self) -> impl Iterator<Item = (&Expression, &Expression)> {
        self.fields
            .iter()
            .filter_map(|f| f.key.as_ref().map(|k| (k, &f.value)))
    }
}

/// Left-hand side of an assignment.
///
/// Holds an identifier, member or index expression. The parser records a
/// diagnostic when anything else ends up on the left of `=`, but still keeps
/// the expression here so the tree stays complete.
#[derive(Debug, Clone)]
pub struct AssignTarget {
    pub expr: Expression,
}

impl AssignTarget {
    pub fn new(expr: Expression) -> Self {
        Self { expr }
    }

    /// Name used by consumers that match assignments by target name:
    /// `x` for an identifier, `a.b.c` for a member chain rooted at an
    /// identifier, `t` for `t[k]` when `t` is itself named.
    pub fn name(&self) -> Option<String> {
        dotted_name(&self.expr)
    }

    pub fn is_assignable(&self) -> bool {
        matches!(
            self.expr,
            Expression::Identifier(..) | Expression::Member { .. } | Expression::Index { .. }
        )
    }

    pub fn location(&self) -> SourceLocation {
        self.expr.location()
    }
}

fn dotted_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Identifier(name, _) => Some(name.clone()),
        Expression::Member { object, member, .. } => {
            dotted_name(object).map(|base| format!("{}.{}", base, member))
        }
        Expression::Index { object, .. } => dotted_name(object),
        _ => None,
    }
}

/// `targets = values`
#[derive(Debug, Clone)]
pub struct Assignment {
    pub targets: Vec<AssignTarget>,
    pub values: Vec<Expression>,
    pub location: SourceLocation,
}

/// Step of a numeric `for`. `value` is `None` when the loop header has no
/// explicit step; consumers treat that as an increment of 1.
#[derive(Debug, Clone)]
pub struct PostAssignment {
    pub target: AssignTarget,
    pub value: Option<Expression>,
    pub location: SourceLocation,
}

/// `elseif condition then block`
#[derive(Debug, Clone)]
pub struct ElseIf {
    pub condition: Expression,
    pub block: Vec<Statement>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Statement {
    Assignment(Assignment),
    Local {
        names: Vec<String>,
        values: Vec<Expression>,
        location: SourceLocation,
    },
    LocalFunction {
        name: String,
        function: FunctionBody,
        location: SourceLocation,
    },
    Function {
        name: FunctionName,
        function: FunctionBody,
        location: SourceLocation,
    },
    Call(CallExpr),
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        elseifs: Vec<ElseIf>,
        else_block: Option<Vec<Statement>>,
        location: SourceLocation,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Repeat {
        body: Vec<Statement>,
        condition: Expression,
        location: SourceLocation,
    },
    /// `for v = init, limit [, step] do ... end`
    NumericFor {
        init: Assignment,
        condition: Expression,
        post: PostAssignment,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    /// `for k, v in iterators do ... end`
    GenericFor {
        names: Vec<String>,
        iterators: Vec<Expression>,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Return {
        values: Vec<Expression>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Goto {
        label: String,
        location: SourceLocation,
    },
    Label {
        name: String,
        location: SourceLocation,
    },
    Do {
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
    /// A bare expression that is neither a call nor an assignment.
    Expression {
        expr: Expression,
        location: SourceLocation,
    },
    /// A stray block terminator at top level, or a block skipped for
    /// exceeding the nesting limit.
    Error {
        message: String,
        location: SourceLocation,
    },
}

impl Statement {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Assignment(assign) => assign.location,
            Statement::Call(call) => call.location,
            Statement::Local { location, .. }
            | Statement::LocalFunction { location, .. }
            | Statement::Function { location, .. }
            | Statement::If { location, .. }
            | Statement::While { location, .. }
            | Statement::Repeat { location, .. }
            | Statement::NumericFor { location, .. }
            | Statement::GenericFor { location, .. }
            | Statement::Return { location, .. }
            | Statement::Break { location }
            | Statement::Goto { location, .. }
            | Statement::Label { location, .. }
            | Statement::Do { location, .. }
            | Statement::Empty { location }
            | Statement::Expression { location, .. }
            | Statement::Error { location, .. } => *location,
        }
    }

    /// Variant name, for tooling that inspects nodes by type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Assignment(_) => "Assignment",
            Statement::Local { .. } => "Local",
            Statement::LocalFunction { .. } => "LocalFunction",
            Statement::Function { .. } => "Function",
            Statement::Call(_) => "CallStatement",
            Statement::If { .. } => "If",
            Statement::While { .. } => "While",
            Statement::Repeat { .. } => "Repeat",
            Statement::NumericFor { .. } => "NumericFor",
            Statement::GenericFor { .. } => "GenericFor",
            Statement::Return { .. } => "Return",
            Statement::Break { .. } => "Break",
            Statement::Goto { .. } => "Goto",
            Statement::Label { .. } => "Label",
            Statement::Do { .. } => "Do",
            Statement::Empty { .. } => "Empty",
            Statement::Expression { .. } => "ExpressionStatement",
            Statement::Error { .. } => "Error",
        }
    }
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(String, SourceLocation),
    Integer(i64, SourceLocation),
    Float(f64, SourceLocation),
    String(String, SourceLocation),
    Boolean(bool, SourceLocation),
    Nil {
        location: SourceLocation,
    },
    Table(TableConstructor),
    Function(FunctionBody),
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
        location: SourceLocation,
    },
    Unary {
        op: UnOp,
        operand: Box<Expression>,
        location: SourceLocation,
    },
    /// `object[index]`
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        location: SourceLocation,
    },
    /// `object.member`
    Member {
        object: Box<Expression>,
        member: String,
        location: SourceLocation,
    },
    Call(CallExpr),
    Error {
        message: String,
        location: SourceLocation,
    },
}

impl Expression {
    pub(crate) fn binary(
        op: BinOp,
        left: Expression,
        right: Expression,
        location: SourceLocation,
    ) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expression::Identifier(_, loc)
            | Expression::Integer(_, loc)
            | Expression::Float(_, loc)
            | Expression::String(_, loc)
            | Expression::Boolean(_, loc) => *loc,
            Expression::Table(table) => table.location,
            Expression::Function(function) => function.location,
            Expression::Call(call) => call.location,
            Expression::Nil { location }
            | Expression::Binary { location, .. }
            | Expression::Unary { location, .. }
            | Expression::Index { location, .. }
            | Expression::Member { location, .. }
            | Expression::Error { location, .. } => *location,
        }
    }

    /// Variant name, for tooling that inspects nodes by type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Identifier(..) => "Identifier",
            Expression::Integer(..) => "Integer",
            Expression::Float(..) => "Float",
            Expression::String(..) => "String",
            Expression::Boolean(..) => "Boolean",
            Expression::Nil { .. } => "Nil",
            Expression::Table(_) => "Table",
            Expression::Function(_) => "FunctionLiteral",
            Expression::Binary { .. } => "Binary",
            Expression::Unary { .. } => "Unary",
            Expression::Index { .. } => "Index",
            Expression::Member { .. } => "Member",
            Expression::Call(_) => "Call",
            Expression::Error { .. } => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expression::Error { .. })
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Top-level assignment statements in source order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Assignment(assign) => Some(assign),
            _ => None,
        })
    }

    /// First top-level single-target assignment to `name`, if any.
    pub fn find_assignment(&self, name: &str) -> Option<&Assignment> {
        self.assignments()
            .find(|a| a.targets.len() == 1 && a.targets[0].name().as_deref() == Some(name))
    }
}
