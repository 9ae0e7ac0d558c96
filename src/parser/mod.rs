//! Lua source code parser
//!
//! This module transforms Lua source text into a syntax tree:
//! - [`lexer`] / [`token`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`] and its navigation and recovery helpers
//! - `statements` / `expressions`: Recursive descent rules, split across `impl Parser` blocks
//! - [`ast`]: Syntax tree node definitions
//! - [`errors`]: Diagnostics collected while parsing
//! - [`outline`]: Indented tree printer for inspecting results
//!
//! # Supported Lua Subset
//!
//! - Statements: assignment (multi-target), `local`, `local function`,
//!   `function a.b:m`, `if`/`elseif`/`else`, `while`, `repeat`/`until`,
//!   numeric and generic `for`, `do ... end`, `return`, `break`, `goto`,
//!   `::label::`, call statements, `;`
//! - Expressions: literals, tables, function literals, calls and method
//!   calls, indexing, arithmetic, comparison, logical, `..`, `<<`, `>>`
//! - Line comments only (`--`); no long strings or block comments
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence
//! level. Parsing never aborts: problems are recorded as diagnostics and
//! the full tree is always returned.

pub mod ast;
pub mod constants;
pub mod errors;
mod expressions;
pub mod lexer;
pub mod outline;
pub mod parse;
mod statements;
pub mod token;

pub use errors::{Diagnostic, DiagnosticKind, ParseError};
pub use parse::{parse, Parser};
