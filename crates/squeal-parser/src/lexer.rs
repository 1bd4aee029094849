// SQL lexer.
//
// Converts SQL text into a stream of tokens with source spans. Uses memchr
// for accelerated delimiter scanning inside strings, quoted identifiers, and
// blob literals. Whitespace and comments never reach the token stream.
//
// Lexing failures (unterminated regions, bad blob hex, stray characters) do
// not abort the scan: each produces a synthetic `Error` token and lexing
// resumes at the next plausible boundary.

use std::sync::atomic::{AtomicU64, Ordering};

use memchr::memchr;
use squeal_ast::Span;

use crate::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Tokenize metrics
// ---------------------------------------------------------------------------

/// Monotonic counter of tokens produced (EOF tokens included).
static SQUEAL_TOKENIZE_TOKENS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Point-in-time tokenize metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizeMetricsSnapshot {
    /// Total tokens produced across all lexer invocations.
    pub squeal_tokenize_tokens_total: u64,
}

/// Take a point-in-time snapshot of tokenize metrics.
#[must_use]
pub fn tokenize_metrics_snapshot() -> TokenizeMetricsSnapshot {
    TokenizeMetricsSnapshot {
        squeal_tokenize_tokens_total: SQUEAL_TOKENIZE_TOKENS_TOTAL.load(Ordering::Relaxed),
    }
}

/// Reset tokenize metrics (used by tests/diagnostics).
pub fn reset_tokenize_metrics() {
    SQUEAL_TOKENIZE_TOKENS_TOTAL.store(0, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// SQL lexer that produces a stream of tokens from source text.
pub struct Lexer<'a> {
    /// The source bytes (UTF-8).
    src: &'a [u8],
    /// Current byte offset into src.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given SQL source text.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenize the entire input into a Vec of tokens, terminated by a
    /// single `Eof` token.
    #[must_use]
    pub fn tokenize(source: &'a str) -> Vec<Token> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        SQUEAL_TOKENIZE_TOKENS_TOTAL.fetch_add(tokens.len() as u64, Ordering::Relaxed);
        tokens
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        if let Some(err) = self.skip_whitespace_and_comments() {
            return err;
        }

        let start = self.pos;
        let start_line = self.line;
        let start_col = self.col;

        if self.pos >= self.src.len() {
            return Token {
                kind: TokenKind::Eof,
                span: Span::new(start as u32, start as u32, start_line, start_col),
            };
        }

        let ch = self.src[self.pos];
        let kind = match ch {
            // String literal (single-quoted)
            b'\'' => self.lex_string(),

            // Delimited identifiers
            b'"' => self.lex_delimited_id(b'"'),
            b'`' => self.lex_delimited_id(b'`'),
            b'[' => self.lex_bracket_id(),

            // Blob literal
            b'X' | b'x' if self.peek_at(1) == Some(b'\'') => self.lex_blob(),

            // Numbers
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),

            // Identifiers and keywords
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(),

            // Bind parameters
            b'?' => self.lex_question(),
            b':' => self.lex_named_param(b':'),
            b'@' => self.lex_named_param(b'@'),
            b'$' => self.lex_dollar_param(),

            // Single-character operators and punctuation
            b'+' => {
                self.advance();
                TokenKind::Plus
            }
            b'*' => {
                self.advance();
                TokenKind::Star
            }
            b'/' => {
                self.advance();
                TokenKind::Slash
            }
            b'%' => {
                self.advance();
                TokenKind::Percent
            }
            b'&' => {
                self.advance();
                TokenKind::Ampersand
            }
            b'~' => {
                self.advance();
                TokenKind::Tilde
            }
            b',' => {
                self.advance();
                TokenKind::Comma
            }
            b';' => {
                self.advance();
                TokenKind::Semicolon
            }
            b'(' => {
                self.advance();
                TokenKind::LeftParen
            }
            b')' => {
                self.advance();
                TokenKind::RightParen
            }
            b'.' => {
                self.advance();
                TokenKind::Dot
            }

            // Multi-character operators (maximal munch)
            b'-' => self.lex_minus_or_arrow(),
            b'<' => self.lex_lt(),
            b'>' => self.lex_gt(),
            b'=' => self.lex_eq(),
            b'!' => self.lex_bang(),
            b'|' => self.lex_pipe(),

            _ => {
                self.advance();
                let s = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                TokenKind::Error(format!("unexpected character: {s}"))
            }
        };

        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32, start_line, start_col),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn advance(&mut self) -> u8 {
        let ch = self.src[self.pos];
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn advance_to_end(&mut self) {
        while self.pos < self.src.len() {
            self.advance();
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    /// Skip whitespace, line comments (`-- ...`), and block comments
    /// (`/* ... */`, not nested). An unterminated block comment yields an
    /// `Error` token spanning from the opening `/*` to EOF.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
                self.advance();
            }

            if self.pos >= self.src.len() {
                return None;
            }

            // Line comment: ends at newline or EOF.
            if self.src[self.pos] == b'-' && self.peek_at(1) == Some(b'-') {
                self.advance();
                self.advance();
                while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
                    self.advance();
                }
                continue;
            }

            // Block comment: ends at */ or EOF (no nesting).
            if self.src[self.pos] == b'/' && self.peek_at(1) == Some(b'*') {
                let start = self.pos;
                let start_line = self.line;
                let start_col = self.col;
                self.advance();
                self.advance();
                loop {
                    if self.pos >= self.src.len() {
                        return Some(Token {
                            kind: TokenKind::Error("unterminated block comment".to_owned()),
                            span: Span::new(start as u32, self.pos as u32, start_line, start_col),
                        });
                    }
                    if self.src[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            return None;
        }
    }

    // -----------------------------------------------------------------------
    // Literal tokenizers
    // -----------------------------------------------------------------------

    /// Lex a single-quoted string literal. `''` is an embedded quote.
    fn lex_string(&mut self) -> TokenKind {
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'\'', remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    self.advance_by(offset);
                    self.advance(); // the quote itself

                    if self.peek() == Some(b'\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        return TokenKind::String(value);
                    }
                }
                None => {
                    self.advance_to_end();
                    return TokenKind::Error("unterminated string literal".to_owned());
                }
            }
        }
    }

    /// Lex a double-quoted or backtick-quoted identifier. A doubled
    /// delimiter embeds one delimiter character.
    fn lex_delimited_id(&mut self, delim: u8) -> TokenKind {
        self.advance(); // opening delimiter

        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(delim, remaining) {
                Some(offset) => {
                    value.push_str(&String::from_utf8_lossy(
                        &self.src[self.pos..self.pos + offset],
                    ));
                    self.advance_by(offset);
                    self.advance(); // the delimiter

                    if self.peek() == Some(delim) {
                        value.push(delim as char);
                        self.advance();
                    } else {
                        return TokenKind::QuotedId(value);
                    }
                }
                None => {
                    self.advance_to_end();
                    let what = if delim == b'"' {
                        "double-quoted identifier"
                    } else {
                        "backtick-quoted identifier"
                    };
                    return TokenKind::Error(format!("unterminated {what}"));
                }
            }
        }
    }

    /// Lex a bracket-delimited identifier `[name]`. No embedded escapes.
    fn lex_bracket_id(&mut self) -> TokenKind {
        self.advance(); // [

        let remaining = &self.src[self.pos..];
        match memchr(b']', remaining) {
            Some(offset) => {
                let value =
                    String::from_utf8_lossy(&self.src[self.pos..self.pos + offset]).into_owned();
                self.advance_by(offset);
                self.advance(); // ]
                TokenKind::QuotedId(value)
            }
            None => {
                self.advance_to_end();
                TokenKind::Error("unterminated bracket identifier".to_owned())
            }
        }
    }

    /// Lex a blob literal `X'...'` / `x'...'`. Hex digits only, and an even
    /// number of them.
    fn lex_blob(&mut self) -> TokenKind {
        self.advance(); // X/x
        self.advance(); // '

        let hex_start = self.pos;
        let remaining = &self.src[self.pos..];
        match memchr(b'\'', remaining) {
            Some(offset) => {
                let hex_bytes = self.src[hex_start..hex_start + offset].to_vec();
                self.advance_by(offset);
                self.advance(); // closing '

                if let Some(bad) = hex_bytes.iter().find(|b| !b.is_ascii_hexdigit()) {
                    return TokenKind::Error(format!(
                        "invalid character in blob literal: {}",
                        *bad as char
                    ));
                }
                if hex_bytes.len() % 2 != 0 {
                    return TokenKind::Error(
                        "blob literal has an odd number of hex digits".to_owned(),
                    );
                }

                let mut bytes = Vec::with_capacity(hex_bytes.len() / 2);
                for pair in hex_bytes.chunks_exact(2) {
                    let hi = hex_value(pair[0]);
                    let lo = hex_value(pair[1]);
                    bytes.push((hi << 4) | lo);
                }
                TokenKind::Blob(bytes)
            }
            None => {
                self.advance_to_end();
                TokenKind::Error("unterminated blob literal".to_owned())
            }
        }
    }

    /// Lex a number, keeping the verbatim source text.
    ///
    /// Integer `[0-9]+`, hex `0x[0-9a-fA-F]+`, or float
    /// `[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?` / `[0-9]+[eE][+-]?[0-9]+`. The
    /// fractional dot is only consumed when a digit follows; `123.` is a
    /// `Number` then a `Dot`. Converting the text to a machine number is
    /// the caller's concern.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;

        // Hex integer.
        if self.src[self.pos] == b'0' && self.peek_at(1).is_some_and(|c| c == b'x' || c == b'X') {
            self.advance();
            self.advance();
            let digits_start = self.pos;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_hexdigit() {
                self.advance();
            }
            if self.pos == digits_start {
                return TokenKind::Error("hex literal has no digits".to_owned());
            }
            return TokenKind::Number(self.text_from(start));
        }

        // Integer part (may be empty for `.5`).
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
            self.advance();
        }

        // Fractional part: the dot belongs to the number only when a digit
        // follows it.
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // dot
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
        }

        // Exponent.
        if self.peek().is_some_and(|c| c == b'e' || c == b'E')
            && (self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
                || (self.peek_at(1).is_some_and(|c| c == b'+' || c == b'-')
                    && self.peek_at(2).is_some_and(|c| c.is_ascii_digit())))
        {
            self.advance(); // e/E
            if self.peek().is_some_and(|c| c == b'+' || c == b'-') {
                self.advance();
            }
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
        }

        TokenKind::Number(self.text_from(start))
    }

    /// Lex an identifier, reclassifying it as a keyword if it matches the
    /// reserved table (case-insensitively). Delimited identifiers never go
    /// through this path, so they are never reclassified.
    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance(); // first character already validated

        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$' {
                self.advance();
            } else {
                break;
            }
        }

        let text = self.text_from(start);
        match TokenKind::lookup_keyword(&text) {
            Some(kw) => kw,
            None => TokenKind::Id(text),
        }
    }

    /// Lex `?` or `?NNN`.
    fn lex_question(&mut self) -> TokenKind {
        self.advance(); // ?
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let num_start = self.pos;
            while self.pos < self.src.len() && self.src[self.pos].is_ascii_digit() {
                self.advance();
            }
            let text = self.text_from(num_start);
            match text.parse::<u32>() {
                Ok(n) => TokenKind::QuestionNum(n),
                Err(_) => TokenKind::Error(format!("parameter number out of range: ?{text}")),
            }
        } else {
            TokenKind::Question
        }
    }

    /// Lex `:name` or `@name`.
    fn lex_named_param(&mut self, prefix: u8) -> TokenKind {
        self.advance(); // prefix
        let name_start = self.pos;
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == name_start {
            return TokenKind::Error(format!("empty parameter name after '{}'", prefix as char));
        }
        let name = self.text_from(name_start);
        if prefix == b':' {
            TokenKind::ColonParam(name)
        } else {
            TokenKind::AtParam(name)
        }
    }

    /// Lex `$name`. Dollar parameters additionally permit `::` separators
    /// and one trailing tcl-style `(...)` suffix, all kept as part of the
    /// name.
    fn lex_dollar_param(&mut self) -> TokenKind {
        self.advance(); // $
        let name_start = self.pos;
        loop {
            while self.pos < self.src.len() {
                let ch = self.src[self.pos];
                if ch.is_ascii_alphanumeric() || ch == b'_' {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.peek() == Some(b':') && self.peek_at(1) == Some(b':') {
                self.advance();
                self.advance();
                continue;
            }
            break;
        }
        if self.pos == name_start {
            return TokenKind::Error("empty parameter name after '$'".to_owned());
        }
        if self.peek() == Some(b'(') {
            self.advance();
            loop {
                match self.peek() {
                    Some(b')') => {
                        self.advance();
                        break;
                    }
                    Some(_) => {
                        self.advance();
                    }
                    None => {
                        return TokenKind::Error(
                            "unterminated parameter name suffix".to_owned(),
                        );
                    }
                }
            }
        }
        TokenKind::DollarParam(self.text_from(name_start))
    }

    // -----------------------------------------------------------------------
    // Multi-character operator tokenizers
    // -----------------------------------------------------------------------

    /// Lex `-`, `->`, or `->>`.
    fn lex_minus_or_arrow(&mut self) -> TokenKind {
        self.advance(); // -
        if self.peek() == Some(b'>') {
            self.advance();
            if self.peek() == Some(b'>') {
                self.advance();
                TokenKind::DoubleArrow
            } else {
                TokenKind::Arrow
            }
        } else {
            TokenKind::Minus
        }
    }

    /// Lex `<`, `<=`, `<>`, or `<<`.
    fn lex_lt(&mut self) -> TokenKind {
        self.advance(); // <
        match self.peek() {
            Some(b'=') => {
                self.advance();
                TokenKind::Le
            }
            Some(b'>') => {
                self.advance();
                TokenKind::LtGt
            }
            Some(b'<') => {
                self.advance();
                TokenKind::ShiftLeft
            }
            _ => TokenKind::Lt,
        }
    }

    /// Lex `>`, `>=`, or `>>`.
    fn lex_gt(&mut self) -> TokenKind {
        self.advance(); // >
        match self.peek() {
            Some(b'=') => {
                self.advance();
                TokenKind::Ge
            }
            Some(b'>') => {
                self.advance();
                TokenKind::ShiftRight
            }
            _ => TokenKind::Gt,
        }
    }

    /// Lex `=` or `==`.
    fn lex_eq(&mut self) -> TokenKind {
        self.advance(); // =
        if self.peek() == Some(b'=') {
            self.advance();
            TokenKind::EqEq
        } else {
            TokenKind::Eq
        }
    }

    /// Lex `!=`. A bare `!` is not SQL.
    fn lex_bang(&mut self) -> TokenKind {
        self.advance(); // !
        if self.peek() == Some(b'=') {
            self.advance();
            TokenKind::Ne
        } else {
            TokenKind::Error("unexpected '!', did you mean '!='?".to_owned())
        }
    }

    /// Lex `|` or `||`.
    fn lex_pipe(&mut self) -> TokenKind {
        self.advance(); // |
        if self.peek() == Some(b'|') {
            self.advance();
            TokenKind::Concat
        } else {
            TokenKind::Pipe
        }
    }
}

const fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
