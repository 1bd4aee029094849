//! Parser for the SQLite dialect of SQL.
//!
//! Hand-written recursive descent with Pratt precedence climbing for
//! expressions. [`parse`] turns source text into a list of [`Statement`]s
//! from `squeal-ast` plus the diagnostics collected along the way; it never
//! executes anything, touches no files, and keeps no state between calls
//! beyond monotonic metrics counters.
//!
//! ```
//! let (stmts, diags) = squeal_parser::parse("SELECT 1 + 2 * 3;");
//! assert_eq!(stmts.len(), 1);
//! assert!(diags.is_empty());
//! ```
//!
//! Syntax errors do not abort the whole input: the parser records a
//! diagnostic, skips to the next statement boundary, and keeps going, so a
//! script with one bad statement still yields all the good ones.

pub mod diagnostic;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod token;

use squeal_ast::Statement;

pub use diagnostic::{Diagnostic, Severity};
pub use lexer::{
    Lexer, TokenizeMetricsSnapshot, reset_tokenize_metrics, tokenize_metrics_snapshot,
};
pub use parser::{
    MAX_PARSE_DEPTH, ParseError, ParseMetricsSnapshot, Parser, parse_metrics_snapshot,
    reset_parse_metrics,
};
pub use token::{Token, TokenKind};

/// Parse SQL source text into statements plus diagnostics.
///
/// The statement list holds everything that parsed cleanly, in source
/// order; failed statements are skipped and reported. Both lists may be
/// non-empty at once (partial success). Parsing identical input always
/// produces structurally equal results.
#[must_use]
pub fn parse(source: &str) -> (Vec<Statement>, Vec<Diagnostic>) {
    let mut parser = Parser::from_sql(source);
    let (stmts, errors) = parser.parse_all();
    let diagnostics = errors
        .iter()
        .map(|e| Diagnostic::from_parse_error(e, source))
        .collect();
    (stmts, diagnostics)
}

/// Tokenize SQL source text, for debugging and tooling.
///
/// Uses the same lexer as [`parse`]. The result always ends with an `Eof`
/// token; lexing failures appear inline as `Error` tokens.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::tokenize(source)
}
