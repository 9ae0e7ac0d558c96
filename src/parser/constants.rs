// Constants shared by the lexer and parser

/// Parameter name recorded for a trailing `...` in a parameter list, and the
/// identifier name used for a `...` expression.
pub const VARARG_PARAM: &str = "...";

/// Text of the illegal token produced for a string with no closing quote.
pub const UNTERMINATED_STRING: &str = "unterminated string";

/// Deepest nesting of blocks, parenthesized expressions, operator chains and
/// postfix chains accepted before the parser reports `TooDeep` and skips.
pub const MAX_NESTING_DEPTH: usize = 200;
