// User-facing diagnostics.
//
// A Diagnostic is a ParseError joined with the source text it points at:
// the offending line is reproduced with an underline covering the span's
// columns, so callers can print it as-is.

use std::fmt;

use squeal_ast::Span;

use crate::parser::ParseError;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// A location-aware diagnostic with a contextual source snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    /// The offending source line plus an underline of the span's columns;
    /// empty when the span does not land on a line (e.g. empty input).
    pub snippet: String,
}

impl Diagnostic {
    /// Build a diagnostic from a parse error against the source it came
    /// from.
    #[must_use]
    pub fn from_parse_error(err: &ParseError, source: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: err.message.clone(),
            span: err.span,
            snippet: render_snippet(source, err.span),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}, Column {}: {}",
            self.span.line, self.span.column, self.message
        )?;
        if !self.snippet.is_empty() {
            write!(f, "\n{}", self.snippet)?;
        }
        Ok(())
    }
}

/// The source line holding `span`, with `^` marks under the span's columns.
/// A zero-width span still gets a single caret.
fn render_snippet(source: &str, span: Span) -> String {
    let Some(line) = source.split('\n').nth(span.line.saturating_sub(1) as usize) else {
        return String::new();
    };
    let line = line.strip_suffix('\r').unwrap_or(line);

    let col = span.column.saturating_sub(1) as usize;
    let width = (span.len() as usize).clamp(1, line.len().saturating_sub(col).max(1));
    let mut snippet = String::with_capacity(line.len() + col + width + 1);
    snippet.push_str(line);
    snippet.push('\n');
    for _ in 0..col {
        snippet.push(' ');
    }
    for _ in 0..width {
        snippet.push('^');
    }
    snippet
}
