//! # Introduction
//!
//! luaparse tokenizes and parses a subset of Lua into a syntax tree while
//! collecting every syntax problem it finds instead of stopping at the first.
//! The result can be printed as an outline or browsed in a terminal UI built
//! with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Program + Diagnostics → Outline / TUI
//! ```
//!
//! 1. [`parser::lexer`] turns source text into tokens. Malformed input becomes
//!    an `ILLEGAL` token rather than an error.
//! 2. [`parser::Parser`] builds a [`parser::ast::Program`] by recursive
//!    descent and records [`parser::Diagnostic`]s as it recovers.
//! 3. [`parser::outline`] flattens the tree into printable rows.
//! 4. [`ui`] is a ratatui explorer over source, tree, tokens and
//!    diagnostics; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use luaparse::parser::parse;
//!
//! let (program, result) = parse("config = { debug = true, level = 3 }");
//! assert!(result.is_ok());
//! assert!(program.find_assignment("config").is_some());
//! ```

pub mod parser;
pub mod ui;
