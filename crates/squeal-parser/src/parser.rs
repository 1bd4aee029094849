// Statement parsing.
//
// Hand-written recursive descent parser over the token stream. Expression
// parsing lives in expr.rs. The top-level driver recovers from syntax errors
// at statement boundaries: the failed statement's diagnostic is recorded and
// tokens are skipped until the next plausible statement start.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use squeal_ast::{
    AlterTableAction, AlterTableStatement, Assignment, AssignmentTarget, AttachStatement,
    BeginStatement, BinaryOp, ColumnConstraint, ColumnConstraintKind, ColumnDef, ColumnRef,
    CompoundOp, ConflictAction, CreateIndexStatement, CreateTableBody, CreateTableStatement,
    CreateTriggerStatement, CreateViewStatement, CreateVirtualTableStatement, Cte, CteMaterialized,
    DefaultValue, Deferrable, DeferrableInitially, DeleteStatement, Distinctness, DropObjectType,
    DropStatement, Expr, ForeignKeyAction, ForeignKeyActionType, ForeignKeyClause,
    ForeignKeyTrigger, FrameBound, FrameExclude, FrameSpec, FrameUnit, FromClause,
    GeneratedStorage, IndexHint, IndexedColumn, InSet, InsertSource, InsertStatement, JoinClause,
    JoinConstraint, JoinKind, JoinType, LimitClause, Literal, NullsOrder, OrderingTerm,
    PragmaStatement, PragmaValue, QualifiedName, QualifiedTableRef, ResultColumn,
    RollbackStatement, SelectBody, SelectCore, SelectStatement, SortDirection, Span, Statement,
    TableConstraint, TableConstraintKind, TableOrSubquery, TransactionMode, TriggerEvent,
    TriggerTiming, TypeName, UpdateStatement, UpsertAction, UpsertClause, UpsertTarget,
    VacuumStatement, WindowDef, WindowSpec, WithClause,
};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Parse metrics
// ---------------------------------------------------------------------------

/// Monotonic counter of successfully parsed statements.
static SQUEAL_PARSE_STATEMENTS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Point-in-time parse metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseMetricsSnapshot {
    /// Total statements successfully parsed.
    pub squeal_parse_statements_total: u64,
}

/// Take a point-in-time snapshot of parse metrics.
#[must_use]
pub fn parse_metrics_snapshot() -> ParseMetricsSnapshot {
    ParseMetricsSnapshot {
        squeal_parse_statements_total: SQUEAL_PARSE_STATEMENTS_TOTAL.load(Ordering::Relaxed),
    }
}

/// Reset parse metrics (used by tests/diagnostics).
pub fn reset_parse_metrics() {
    SQUEAL_PARSE_STATEMENTS_TOTAL.store(0, Ordering::Relaxed);
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A parse failure with the source span it points at.
///
/// The span's line/column locate the offending token; [`crate::Diagnostic`]
/// renders the user-facing form with a source snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    #[must_use]
    pub(crate) fn at(message: impl Into<String>, token: Option<&Token>) -> Self {
        Self {
            message: message.into(),
            span: token.map_or(Span::ZERO, |t| t.span),
        }
    }

    #[must_use]
    pub(crate) fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.span.line, self.span.column, self.message)
    }
}

impl Error for ParseError {}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursion limit for nested statements and expressions.
pub const MAX_PARSE_DEPTH: u32 = 1000;

pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) depth: u32,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn from_sql(sql: &str) -> Self {
        Self::new(Lexer::tokenize(sql))
    }

    pub(crate) fn enter_recursion(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(self.err_msg(format!(
                "statement tree is too deep (maximum depth {MAX_PARSE_DEPTH})"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn with_recursion_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.enter_recursion()?;
        let result = f(self);
        self.leave_recursion();
        result
    }

    /// Parse the whole token stream into a statement list plus the errors
    /// encountered along the way. Failed statements are skipped via
    /// panic-mode recovery; everything that parsed cleanly is returned.
    pub fn parse_all(&mut self) -> (Vec<Statement>, Vec<ParseError>) {
        let span = tracing::debug_span!(
            target: "squeal.parse",
            "parse",
            statement_count = tracing::field::Empty,
            parse_errors = tracing::field::Empty,
        );
        let _guard = span.enter();

        let mut stmts = Vec::new();
        while !self.at_eof() {
            if self.check(&TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            match self.parse_statement() {
                Ok(s) => {
                    SQUEAL_PARSE_STATEMENTS_TOTAL.fetch_add(1, Ordering::Relaxed);
                    stmts.push(s);
                    let _ = self.eat(&TokenKind::Semicolon);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "squeal.parse",
                        error = %e,
                        "parse recovery: skipping malformed statement"
                    );
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        let errors = std::mem::take(&mut self.errors);
        span.record("statement_count", stmts.len() as u64);
        span.record("parse_errors", errors.len() as u64);

        (stmts, errors)
    }

    /// Parse a single statement starting at the current token.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        self.parse_statement_inner()
    }

    /// Errors recorded so far (drained by [`Self::parse_all`]).
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    // -----------------------------------------------------------------------
    // Token navigation
    // -----------------------------------------------------------------------

    pub(crate) fn peek(&self) -> &TokenKind {
        self.current().map_or(&TokenKind::Eof, |t| &t.kind)
    }

    pub(crate) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
        t
    }

    /// Consume and return the current token (EOF is never consumed).
    pub(crate) fn advance_token(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Discriminant match: payload-carrying kinds match regardless of value.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    /// Exact keyword match.
    pub(crate) fn check_kw(&self, kw: &TokenKind) -> bool {
        self.peek() == kw
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: &TokenKind) -> bool {
        if self.peek() == kw {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_kw(&mut self, kw: &TokenKind) -> Result<Span, ParseError> {
        if self.peek() == kw {
            let sp = self.current_span();
            self.advance();
            Ok(sp)
        } else {
            Err(self.err_expected(kw.keyword_str().unwrap_or("keyword")))
        }
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            let sp = self.current_span();
            self.advance();
            Ok(sp)
        } else {
            Err(self.err_expected(&format!("'{}'", kind.to_sql())))
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.current().map_or(Span::ZERO, |t| t.span)
    }

    /// Span of the most recently consumed token.
    pub(crate) fn prev_span(&self) -> Span {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map_or(Span::ZERO, |t| t.span)
    }

    pub(crate) fn err_expected(&self, what: &str) -> ParseError {
        match self.peek() {
            TokenKind::Eof => {
                ParseError::at(format!("unexpected end of input, expected {what}"), self.current())
            }
            found => ParseError::at(
                format!("expected {what}, found {found:?}"),
                self.current(),
            ),
        }
    }

    pub(crate) fn err_msg(&self, msg: impl Into<String>) -> ParseError {
        ParseError::at(msg, self.current())
    }

    /// Panic-mode recovery: consume at least one token, then skip until a
    /// statement boundary — `;` at paren depth zero (consumed), a
    /// statement-start keyword at depth zero (left in place), or EOF.
    fn synchronize(&mut self) {
        let mut depth: u32 = 0;
        let mut consumed = false;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::LeftParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightParen => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                k if depth == 0 && consumed && k.is_statement_start() => return,
                _ => {
                    self.advance();
                }
            }
            consumed = true;
        }
    }

    // -----------------------------------------------------------------------
    // Identifiers and names
    // -----------------------------------------------------------------------

    /// Parse an identifier. Quoted identifiers and SQLite's non-reserved
    /// keywords are accepted; reserved grammar words are not.
    pub(crate) fn parse_identifier(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            TokenKind::Id(s) | TokenKind::QuotedId(s) => {
                self.advance();
                Ok(s)
            }
            ref k if is_nonreserved_kw(k) => {
                let s = kw_to_str(k);
                self.advance();
                Ok(s)
            }
            _ => Err(self.err_expected("identifier")),
        }
    }

    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let first = self.parse_identifier()?;
        if self.eat(&TokenKind::Dot) {
            let second = self.parse_identifier()?;
            Ok(QualifiedName::qualified(first, second))
        } else {
            Ok(QualifiedName::bare(first))
        }
    }

    fn parse_qualified_table_ref(&mut self) -> Result<QualifiedTableRef, ParseError> {
        let name = self.parse_qualified_name()?;
        let alias = self.try_alias()?;
        let index_hint = self.parse_index_hint()?;
        Ok(QualifiedTableRef {
            name,
            alias,
            index_hint,
        })
    }

    fn try_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_kw(&TokenKind::KwAs) {
            return Ok(Some(self.parse_identifier()?));
        }
        // An implicit alias is any identifier, including non-reserved
        // keywords that cannot begin the next clause in this position.
        match self.peek() {
            TokenKind::Id(_) | TokenKind::QuotedId(_) => Ok(Some(self.parse_identifier()?)),
            k if is_nonreserved_kw(k) && !is_alias_terminator_kw(k) => {
                Ok(Some(self.parse_identifier()?))
            }
            _ => Ok(None),
        }
    }

    fn parse_index_hint(&mut self) -> Result<Option<IndexHint>, ParseError> {
        if self.eat_kw(&TokenKind::KwIndexed) {
            self.expect_kw(&TokenKind::KwBy)?;
            Ok(Some(IndexHint::IndexedBy(self.parse_identifier()?)))
        } else if self.check_kw(&TokenKind::KwNot) && self.peek_nth(1) == &TokenKind::KwIndexed {
            self.advance();
            self.advance();
            Ok(Some(IndexHint::NotIndexed))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn parse_comma_sep<T>(
        &mut self,
        f: fn(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut v = vec![f(self)?];
        while self.eat(&TokenKind::Comma) {
            v.push(f(self)?);
        }
        Ok(v)
    }

    /// Matches a contextual word that is not in the reserved table
    /// (`ROWID`, `STRICT`, `STORED`).
    fn eat_contextual(&mut self, word: &str) -> bool {
        if matches!(self.peek(), TokenKind::Id(s) if s.eq_ignore_ascii_case(word)) {
            self.advance();
            true
        } else {
            false
        }
    }

    // -----------------------------------------------------------------------
    // Statement dispatch
    // -----------------------------------------------------------------------

    fn parse_statement_inner(&mut self) -> Result<Statement, ParseError> {
        self.with_recursion_guard(|parser| match parser.peek().clone() {
            TokenKind::KwSelect | TokenKind::KwValues => {
                Ok(Statement::Select(parser.parse_select_stmt(None)?))
            }
            TokenKind::KwWith => parser.parse_with_leading(),
            TokenKind::KwInsert | TokenKind::KwReplace => parser.parse_insert_stmt(None),
            TokenKind::KwUpdate => parser.parse_update_stmt(None),
            TokenKind::KwDelete => parser.parse_delete_stmt(None),
            TokenKind::KwCreate => parser.parse_create(),
            TokenKind::KwDrop => parser.parse_drop(),
            TokenKind::KwAlter => parser.parse_alter(),
            TokenKind::KwBegin => parser.parse_begin(),
            TokenKind::KwCommit | TokenKind::KwEnd => {
                let start = parser.current_span();
                parser.advance();
                let _ = parser.eat_kw(&TokenKind::KwTransaction);
                Ok(Statement::Commit(start.merge(parser.prev_span())))
            }
            TokenKind::KwRollback => parser.parse_rollback(),
            TokenKind::KwSavepoint => {
                let start = parser.current_span();
                parser.advance();
                let name = parser.parse_identifier()?;
                Ok(Statement::Savepoint {
                    name,
                    span: start.merge(parser.prev_span()),
                })
            }
            TokenKind::KwRelease => {
                let start = parser.current_span();
                parser.advance();
                let _ = parser.eat_kw(&TokenKind::KwSavepoint);
                let name = parser.parse_identifier()?;
                Ok(Statement::Release {
                    name,
                    span: start.merge(parser.prev_span()),
                })
            }
            TokenKind::KwAttach => parser.parse_attach(),
            TokenKind::KwDetach => {
                let start = parser.current_span();
                parser.advance();
                let _ = parser.eat_kw(&TokenKind::KwDatabase);
                let name = parser.parse_identifier()?;
                Ok(Statement::Detach {
                    name,
                    span: start.merge(parser.prev_span()),
                })
            }
            TokenKind::KwPragma => parser.parse_pragma(),
            TokenKind::KwVacuum => parser.parse_vacuum(),
            TokenKind::KwReindex => {
                let start = parser.current_span();
                parser.advance();
                let target = parser.parse_optional_target()?;
                Ok(Statement::Reindex {
                    target,
                    span: start.merge(parser.prev_span()),
                })
            }
            TokenKind::KwAnalyze => {
                let start = parser.current_span();
                parser.advance();
                let target = parser.parse_optional_target()?;
                Ok(Statement::Analyze {
                    target,
                    span: start.merge(parser.prev_span()),
                })
            }
            TokenKind::KwExplain => parser.parse_explain(),
            TokenKind::Error(msg) => Err(parser.err_msg(msg)),
            _ => Err(parser.err_msg("unexpected token at start of statement")),
        })
    }

    /// The optional `[name[.name]]` tail of ANALYZE/REINDEX.
    fn parse_optional_target(&mut self) -> Result<Option<QualifiedName>, ParseError> {
        if self.at_eof() || self.check(&TokenKind::Semicolon) {
            Ok(None)
        } else {
            Ok(Some(self.parse_qualified_name()?))
        }
    }

    // -----------------------------------------------------------------------
    // WITH ... (SELECT | INSERT | UPDATE | DELETE)
    // -----------------------------------------------------------------------

    fn parse_with_leading(&mut self) -> Result<Statement, ParseError> {
        let with = self.parse_with_clause()?;
        match self.peek() {
            TokenKind::KwSelect | TokenKind::KwValues => {
                Ok(Statement::Select(self.parse_select_stmt(Some(with))?))
            }
            TokenKind::KwInsert | TokenKind::KwReplace => self.parse_insert_stmt(Some(with)),
            TokenKind::KwUpdate => self.parse_update_stmt(Some(with)),
            TokenKind::KwDelete => self.parse_delete_stmt(Some(with)),
            _ => Err(self.err_expected("SELECT, INSERT, UPDATE, or DELETE after WITH")),
        }
    }

    pub(crate) fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        let start = self.expect_kw(&TokenKind::KwWith)?;
        let recursive = self.eat_kw(&TokenKind::KwRecursive);
        let ctes = self.parse_comma_sep(Self::parse_cte)?;
        Ok(WithClause {
            recursive,
            ctes,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParseError> {
        let start = self.current_span();
        let name = self.parse_identifier()?;
        let columns = if self.eat(&TokenKind::LeftParen) {
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };
        self.expect_kw(&TokenKind::KwAs)?;
        let materialized = if self.check_kw(&TokenKind::KwNot) {
            self.advance();
            self.expect_kw(&TokenKind::KwMaterialized)?;
            Some(CteMaterialized::NotMaterialized)
        } else if self.eat_kw(&TokenKind::KwMaterialized) {
            Some(CteMaterialized::Materialized)
        } else {
            None
        };
        self.expect_token(&TokenKind::LeftParen)?;
        let query = self.parse_select_stmt(None)?;
        self.expect_token(&TokenKind::RightParen)?;
        Ok(Cte {
            name,
            columns,
            materialized,
            query,
            span: start.merge(self.prev_span()),
        })
    }

    // -----------------------------------------------------------------------
    // SELECT
    // -----------------------------------------------------------------------

    pub(crate) fn parse_select_stmt(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStatement, ParseError> {
        self.with_recursion_guard(|parser| parser.parse_select_stmt_inner(with))
    }

    fn parse_select_stmt_inner(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<SelectStatement, ParseError> {
        let start = with
            .as_ref()
            .map_or_else(|| self.current_span(), |w| w.span);
        let body = self.parse_select_body()?;
        let order_by = if self.eat_kw(&TokenKind::KwOrder) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_ordering_term)?
        } else {
            vec![]
        };
        let limit = self.parse_limit()?;
        Ok(SelectStatement {
            with,
            body,
            order_by,
            limit,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_select_body(&mut self) -> Result<SelectBody, ParseError> {
        let select = self.parse_select_core()?;
        let mut compounds = Vec::new();
        loop {
            let op = if self.eat_kw(&TokenKind::KwUnion) {
                if self.eat_kw(&TokenKind::KwAll) {
                    CompoundOp::UnionAll
                } else {
                    CompoundOp::Union
                }
            } else if self.eat_kw(&TokenKind::KwIntersect) {
                CompoundOp::Intersect
            } else if self.eat_kw(&TokenKind::KwExcept) {
                CompoundOp::Except
            } else {
                break;
            };
            compounds.push((op, self.parse_select_core()?));
        }
        Ok(SelectBody { select, compounds })
    }

    fn parse_select_core(&mut self) -> Result<SelectCore, ParseError> {
        let start = self.current_span();
        if self.eat_kw(&TokenKind::KwValues) {
            return self.parse_values_rows().map(|rows| SelectCore::Values {
                rows,
                span: start.merge(self.prev_span()),
            });
        }
        self.expect_kw(&TokenKind::KwSelect)?;
        let distinct = if self.eat_kw(&TokenKind::KwDistinct) {
            Distinctness::Distinct
        } else {
            let _ = self.eat_kw(&TokenKind::KwAll);
            Distinctness::All
        };
        let columns = self.parse_comma_sep(Self::parse_result_column)?;
        let from = if self.eat_kw(&TokenKind::KwFrom) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let where_clause = if self.eat_kw(&TokenKind::KwWhere) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let group_by = if self.eat_kw(&TokenKind::KwGroup) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_expr)?
        } else {
            vec![]
        };
        let having = if self.eat_kw(&TokenKind::KwHaving) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let windows = if self.eat_kw(&TokenKind::KwWindow) {
            self.parse_comma_sep(Self::parse_window_def)?
        } else {
            vec![]
        };
        Ok(SelectCore::Select {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            windows,
            span: start.merge(self.prev_span()),
        })
    }

    /// The `(row), (row), ...` tail after VALUES.
    fn parse_values_rows(&mut self) -> Result<Vec<Vec<Expr>>, ParseError> {
        let mut rows = Vec::new();
        loop {
            self.expect_token(&TokenKind::LeftParen)?;
            let row = if self.check(&TokenKind::RightParen) {
                vec![]
            } else {
                self.parse_comma_sep(Self::parse_expr)?
            };
            self.expect_token(&TokenKind::RightParen)?;
            rows.push(row);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(rows)
    }

    fn parse_result_column(&mut self) -> Result<ResultColumn, ParseError> {
        let start = self.current_span();
        if self.eat(&TokenKind::Star) {
            return Ok(ResultColumn::Star(start));
        }
        // table.* needs two tokens of lookahead past the identifier.
        if matches!(self.peek(), TokenKind::Id(_) | TokenKind::QuotedId(_))
            && self.peek_nth(1) == &TokenKind::Dot
            && self.peek_nth(2) == &TokenKind::Star
        {
            let table = self.parse_identifier()?;
            self.advance(); // dot
            self.advance(); // star
            return Ok(ResultColumn::TableStar {
                table,
                span: start.merge(self.prev_span()),
            });
        }
        let expr = self.parse_expr()?;
        let alias = self.try_alias()?;
        Ok(ResultColumn::Expr {
            expr,
            alias,
            span: start.merge(self.prev_span()),
        })
    }

    // -----------------------------------------------------------------------
    // FROM clause & JOINs
    // -----------------------------------------------------------------------

    fn parse_from_clause(&mut self) -> Result<FromClause, ParseError> {
        let source = self.parse_table_or_subquery()?;
        let mut joins = Vec::new();
        loop {
            let join_start = self.current_span();
            if let Some(jt) = self.try_join_type()? {
                let table = self.parse_table_or_subquery()?;
                let constraint = self.parse_join_constraint()?;
                joins.push(JoinClause {
                    join_type: jt,
                    table,
                    constraint,
                    span: join_start.merge(self.prev_span()),
                });
            } else if self.eat(&TokenKind::Comma) {
                let table = self.parse_table_or_subquery()?;
                joins.push(JoinClause {
                    join_type: JoinType {
                        natural: false,
                        kind: JoinKind::Cross,
                    },
                    table,
                    constraint: None,
                    span: join_start.merge(self.prev_span()),
                });
            } else {
                break;
            }
        }
        let span = source.span().merge(self.prev_span());
        Ok(FromClause {
            source,
            joins,
            span,
        })
    }

    fn parse_table_or_subquery(&mut self) -> Result<TableOrSubquery, ParseError> {
        let start = self.current_span();
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if matches!(
                self.peek(),
                TokenKind::KwSelect | TokenKind::KwWith | TokenKind::KwValues
            ) {
                let with = if self.check_kw(&TokenKind::KwWith) {
                    Some(self.parse_with_clause()?)
                } else {
                    None
                };
                let q = self.parse_select_stmt(with)?;
                self.expect_token(&TokenKind::RightParen)?;
                let alias = self.try_alias()?;
                return Ok(TableOrSubquery::Subquery {
                    query: Box::new(q),
                    alias,
                    span: start.merge(self.prev_span()),
                });
            }
            // Parenthesized join tree.
            let fc = self.parse_from_clause()?;
            self.expect_token(&TokenKind::RightParen)?;
            return Ok(TableOrSubquery::ParenJoin {
                join: Box::new(fc),
                span: start.merge(self.prev_span()),
            });
        }

        let name = self.parse_qualified_name()?;

        // Table-valued function: name(args).
        if self.check(&TokenKind::LeftParen) && name.schema.is_none() {
            self.advance();
            let args = if self.check(&TokenKind::RightParen) {
                vec![]
            } else {
                self.parse_comma_sep(Self::parse_expr)?
            };
            self.expect_token(&TokenKind::RightParen)?;
            let alias = self.try_alias()?;
            return Ok(TableOrSubquery::TableFunction {
                name: name.name,
                args,
                alias,
                span: start.merge(self.prev_span()),
            });
        }

        let alias = self.try_alias()?;
        let index_hint = self.parse_index_hint()?;
        Ok(TableOrSubquery::Table {
            name,
            alias,
            index_hint,
            span: start.merge(self.prev_span()),
        })
    }

    fn try_join_type(&mut self) -> Result<Option<JoinType>, ParseError> {
        let natural = self.eat_kw(&TokenKind::KwNatural);
        let kind = if self.eat_kw(&TokenKind::KwJoin) {
            Some(JoinKind::Inner)
        } else if self.eat_kw(&TokenKind::KwInner) {
            self.expect_kw(&TokenKind::KwJoin)?;
            Some(JoinKind::Inner)
        } else if self.eat_kw(&TokenKind::KwCross) {
            self.expect_kw(&TokenKind::KwJoin)?;
            Some(JoinKind::Cross)
        } else if self.eat_kw(&TokenKind::KwLeft) {
            let _ = self.eat_kw(&TokenKind::KwOuter);
            self.expect_kw(&TokenKind::KwJoin)?;
            Some(JoinKind::Left)
        } else if self.eat_kw(&TokenKind::KwRight) {
            let _ = self.eat_kw(&TokenKind::KwOuter);
            self.expect_kw(&TokenKind::KwJoin)?;
            Some(JoinKind::Right)
        } else if self.eat_kw(&TokenKind::KwFull) {
            let _ = self.eat_kw(&TokenKind::KwOuter);
            self.expect_kw(&TokenKind::KwJoin)?;
            Some(JoinKind::Full)
        } else {
            None
        };
        match kind {
            Some(k) => Ok(Some(JoinType { natural, kind: k })),
            None if natural => Err(self.err_expected("JOIN after NATURAL")),
            None => Ok(None),
        }
    }

    fn parse_join_constraint(&mut self) -> Result<Option<JoinConstraint>, ParseError> {
        if self.eat_kw(&TokenKind::KwOn) {
            Ok(Some(JoinConstraint::On(self.parse_expr()?)))
        } else if self.eat_kw(&TokenKind::KwUsing) {
            self.expect_token(&TokenKind::LeftParen)?;
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            Ok(Some(JoinConstraint::Using(cols)))
        } else {
            Ok(None)
        }
    }

    // -----------------------------------------------------------------------
    // ORDER BY / LIMIT / RETURNING
    // -----------------------------------------------------------------------

    pub(crate) fn parse_ordering_term(&mut self) -> Result<OrderingTerm, ParseError> {
        // The expression grammar owns postfix COLLATE, so a trailing
        // collation arrives wrapped around the expression; unwrap it into
        // the term.
        let (expr, collation) = match self.parse_expr()? {
            Expr::Collate {
                expr, collation, ..
            } => (*expr, Some(collation)),
            e => (e, None),
        };
        let direction = if self.eat_kw(&TokenKind::KwAsc) {
            Some(SortDirection::Asc)
        } else if self.eat_kw(&TokenKind::KwDesc) {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let nulls = if self.eat_kw(&TokenKind::KwNulls) {
            if self.eat_kw(&TokenKind::KwFirst) {
                Some(NullsOrder::First)
            } else {
                self.expect_kw(&TokenKind::KwLast)?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        let span = expr.span().merge(self.prev_span());
        Ok(OrderingTerm {
            expr,
            collation,
            direction,
            nulls,
            span,
        })
    }

    pub(crate) fn parse_limit(&mut self) -> Result<Option<LimitClause>, ParseError> {
        if !self.check_kw(&TokenKind::KwLimit) {
            return Ok(None);
        }
        let start = self.current_span();
        self.advance();
        let first = self.parse_expr()?;
        if self.eat_kw(&TokenKind::KwOffset) {
            let offset = self.parse_expr()?;
            return Ok(Some(LimitClause {
                limit: first,
                offset: Some(offset),
                span: start.merge(self.prev_span()),
            }));
        }

        if self.eat(&TokenKind::Comma) {
            // LIMIT offset, count — compatibility form.
            let second = self.parse_expr()?;
            return Ok(Some(LimitClause {
                limit: second,
                offset: Some(first),
                span: start.merge(self.prev_span()),
            }));
        }

        Ok(Some(LimitClause {
            limit: first,
            offset: None,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_returning(&mut self) -> Result<Vec<ResultColumn>, ParseError> {
        if self.eat_kw(&TokenKind::KwReturning) {
            self.parse_comma_sep(Self::parse_result_column)
        } else {
            Ok(vec![])
        }
    }

    // -----------------------------------------------------------------------
    // INSERT
    // -----------------------------------------------------------------------

    fn parse_insert_stmt(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        let start = with
            .as_ref()
            .map_or_else(|| self.current_span(), |w| w.span);
        let or_conflict = if self.eat_kw(&TokenKind::KwReplace) {
            Some(ConflictAction::Replace)
        } else {
            self.expect_kw(&TokenKind::KwInsert)?;
            if self.eat_kw(&TokenKind::KwOr) {
                Some(self.parse_conflict_action()?)
            } else {
                None
            }
        };
        self.expect_kw(&TokenKind::KwInto)?;
        let table = self.parse_qualified_name()?;
        let alias = if self.eat_kw(&TokenKind::KwAs) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let columns = if self.check(&TokenKind::LeftParen)
            && !matches!(self.peek_nth(1), TokenKind::KwSelect | TokenKind::KwWith)
        {
            self.advance();
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };
        let source = if self.eat_kw(&TokenKind::KwDefault) {
            self.expect_kw(&TokenKind::KwValues)?;
            InsertSource::DefaultValues
        } else if self.eat_kw(&TokenKind::KwValues) {
            InsertSource::Values(self.parse_values_rows()?)
        } else {
            let inner_with = if self.check_kw(&TokenKind::KwWith) {
                Some(self.parse_with_clause()?)
            } else {
                None
            };
            InsertSource::Select(Box::new(self.parse_select_stmt(inner_with)?))
        };
        let upsert = self.parse_upsert_clauses()?;
        let returning = self.parse_returning()?;
        Ok(Statement::Insert(InsertStatement {
            with,
            or_conflict,
            table,
            alias,
            columns,
            source,
            upsert,
            returning,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_conflict_action(&mut self) -> Result<ConflictAction, ParseError> {
        if self.eat_kw(&TokenKind::KwRollback) {
            Ok(ConflictAction::Rollback)
        } else if self.eat_kw(&TokenKind::KwAbort) {
            Ok(ConflictAction::Abort)
        } else if self.eat_kw(&TokenKind::KwFail) {
            Ok(ConflictAction::Fail)
        } else if self.eat_kw(&TokenKind::KwIgnore) {
            Ok(ConflictAction::Ignore)
        } else if self.eat_kw(&TokenKind::KwReplace) {
            Ok(ConflictAction::Replace)
        } else {
            Err(self.err_expected("conflict action"))
        }
    }

    fn parse_upsert_clauses(&mut self) -> Result<Vec<UpsertClause>, ParseError> {
        let mut clauses = Vec::new();
        while self.check_kw(&TokenKind::KwOn) && self.peek_nth(1) == &TokenKind::KwConflict {
            let start = self.current_span();
            self.advance(); // ON
            self.advance(); // CONFLICT
            let target = if self.check(&TokenKind::LeftParen) {
                self.advance();
                let columns = self.parse_comma_sep(Self::parse_indexed_column)?;
                self.expect_token(&TokenKind::RightParen)?;
                let wh = if self.eat_kw(&TokenKind::KwWhere) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                Some(UpsertTarget {
                    columns,
                    where_clause: wh,
                })
            } else {
                None
            };
            self.expect_kw(&TokenKind::KwDo)?;
            let action = if self.eat_kw(&TokenKind::KwNothing) {
                UpsertAction::Nothing
            } else {
                self.expect_kw(&TokenKind::KwUpdate)?;
                self.expect_kw(&TokenKind::KwSet)?;
                let assignments = self.parse_comma_sep(Self::parse_assignment)?;
                let wh = if self.eat_kw(&TokenKind::KwWhere) {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                UpsertAction::Update {
                    assignments,
                    where_clause: wh,
                }
            };
            clauses.push(UpsertClause {
                target,
                action,
                span: start.merge(self.prev_span()),
            });
        }
        Ok(clauses)
    }

    // -----------------------------------------------------------------------
    // UPDATE
    // -----------------------------------------------------------------------

    fn parse_update_stmt(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        let start = with
            .as_ref()
            .map_or_else(|| self.current_span(), |w| w.span);
        self.expect_kw(&TokenKind::KwUpdate)?;
        let or_conflict = if self.eat_kw(&TokenKind::KwOr) {
            Some(self.parse_conflict_action()?)
        } else {
            None
        };
        let table = self.parse_qualified_table_ref()?;
        self.expect_kw(&TokenKind::KwSet)?;
        let assignments = self.parse_comma_sep(Self::parse_assignment)?;
        let from = if self.eat_kw(&TokenKind::KwFrom) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let where_clause = if self.eat_kw(&TokenKind::KwWhere) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = self.parse_returning()?;
        let order_by = if self.eat_kw(&TokenKind::KwOrder) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_ordering_term)?
        } else {
            vec![]
        };
        let limit = self.parse_limit()?;
        Ok(Statement::Update(UpdateStatement {
            with,
            or_conflict,
            table,
            assignments,
            from,
            where_clause,
            returning,
            order_by,
            limit,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let start = self.current_span();
        let target = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            AssignmentTarget::ColumnList(cols)
        } else {
            AssignmentTarget::Column(self.parse_identifier()?)
        };
        self.expect_token(&TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span());
        Ok(Assignment {
            target,
            value,
            span,
        })
    }

    // -----------------------------------------------------------------------
    // DELETE
    // -----------------------------------------------------------------------

    fn parse_delete_stmt(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        let start = with
            .as_ref()
            .map_or_else(|| self.current_span(), |w| w.span);
        self.expect_kw(&TokenKind::KwDelete)?;
        self.expect_kw(&TokenKind::KwFrom)?;
        let table = self.parse_qualified_table_ref()?;
        let where_clause = if self.eat_kw(&TokenKind::KwWhere) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = self.parse_returning()?;
        let order_by = if self.eat_kw(&TokenKind::KwOrder) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_ordering_term)?
        } else {
            vec![]
        };
        let limit = self.parse_limit()?;
        Ok(Statement::Delete(DeleteStatement {
            with,
            table,
            where_clause,
            returning,
            order_by,
            limit,
            span: start.merge(self.prev_span()),
        }))
    }

    // -----------------------------------------------------------------------
    // CREATE
    // -----------------------------------------------------------------------

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwCreate)?;
        let temporary = self.eat_kw(&TokenKind::KwTemp) || self.eat_kw(&TokenKind::KwTemporary);
        let unique = self.eat_kw(&TokenKind::KwUnique);

        if unique {
            self.expect_kw(&TokenKind::KwIndex)?;
            return self.parse_create_index(start, true);
        }
        if self.eat_kw(&TokenKind::KwTable) {
            return self.parse_create_table(start, temporary);
        }
        if self.eat_kw(&TokenKind::KwIndex) {
            return self.parse_create_index(start, false);
        }
        if self.eat_kw(&TokenKind::KwView) {
            return self.parse_create_view(start, temporary);
        }
        if self.eat_kw(&TokenKind::KwTrigger) {
            return self.parse_create_trigger(start, temporary);
        }
        if self.eat_kw(&TokenKind::KwVirtual) {
            self.expect_kw(&TokenKind::KwTable)?;
            return self.parse_create_virtual_table(start);
        }
        Err(self.err_expected("TABLE, INDEX, VIEW, TRIGGER, or VIRTUAL"))
    }

    fn parse_if_not_exists(&mut self) -> bool {
        if self.check_kw(&TokenKind::KwIf)
            && self.peek_nth(1) == &TokenKind::KwNot
            && self.peek_nth(2) == &TokenKind::KwExists
        {
            self.advance();
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_create_table(&mut self, start: Span, temporary: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        let body = if self.eat_kw(&TokenKind::KwAs) {
            let with = if self.check_kw(&TokenKind::KwWith) {
                Some(self.parse_with_clause()?)
            } else {
                None
            };
            CreateTableBody::AsSelect(Box::new(self.parse_select_stmt(with)?))
        } else {
            self.expect_token(&TokenKind::LeftParen)?;
            let mut columns = Vec::new();
            let mut constraints = Vec::new();
            loop {
                if self.is_table_constraint_start() {
                    constraints.push(self.parse_table_constraint()?);
                } else {
                    columns.push(self.parse_column_def()?);
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenKind::RightParen)?;
            CreateTableBody::Columns {
                columns,
                constraints,
            }
        };
        // Table options after the closing paren: WITHOUT ROWID, STRICT.
        let mut without_rowid = false;
        let mut strict = false;
        loop {
            if self.check_kw(&TokenKind::KwWithout) {
                self.advance();
                if !self.eat_contextual("ROWID") {
                    return Err(self.err_expected("ROWID after WITHOUT"));
                }
                without_rowid = true;
            } else if self.eat_contextual("STRICT") {
                strict = true;
            } else {
                break;
            }
            let _ = self.eat(&TokenKind::Comma);
        }
        Ok(Statement::CreateTable(CreateTableStatement {
            if_not_exists,
            temporary,
            name,
            body,
            without_rowid,
            strict,
            span: start.merge(self.prev_span()),
        }))
    }

    fn is_table_constraint_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::KwPrimary
                | TokenKind::KwUnique
                | TokenKind::KwCheck
                | TokenKind::KwForeign
                | TokenKind::KwConstraint
        )
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let start = self.current_span();
        let name = self.parse_identifier()?;
        let type_name = self.try_type_name()?;
        let mut constraints = Vec::new();
        while let Some(c) = self.try_column_constraint()? {
            constraints.push(c);
        }
        Ok(ColumnDef {
            name,
            type_name,
            constraints,
            span: start.merge(self.prev_span()),
        })
    }

    /// A type name is one or more identifier words optionally followed by
    /// `(n)` or `(n, m)`. Constraint keywords end the word run.
    fn try_type_name(&mut self) -> Result<Option<TypeName>, ParseError> {
        if self.is_column_constraint_start()
            || matches!(
                self.peek(),
                TokenKind::Comma | TokenKind::RightParen | TokenKind::Eof
            )
        {
            return Ok(None);
        }
        let start = self.current_span();
        let mut words = Vec::new();
        loop {
            match self.peek() {
                TokenKind::Id(_) | TokenKind::QuotedId(_) => {
                    words.push(self.parse_identifier()?);
                }
                k if is_nonreserved_kw(k) => {
                    words.push(self.parse_identifier()?);
                }
                _ => break,
            }
            if self.is_column_constraint_start()
                || matches!(
                    self.peek(),
                    TokenKind::Comma | TokenKind::RightParen | TokenKind::LeftParen
                )
            {
                break;
            }
        }
        if words.is_empty() {
            return Ok(None);
        }
        let name = words.join(" ");
        let (arg1, arg2) = if self.eat(&TokenKind::LeftParen) {
            let a1 = self.parse_signed_number_str()?;
            let a2 = if self.eat(&TokenKind::Comma) {
                Some(self.parse_signed_number_str()?)
            } else {
                None
            };
            self.expect_token(&TokenKind::RightParen)?;
            (Some(a1), a2)
        } else {
            (None, None)
        };
        Ok(Some(TypeName {
            name,
            arg1,
            arg2,
            span: start.merge(self.prev_span()),
        }))
    }

    pub(crate) fn parse_signed_number_str(&mut self) -> Result<String, ParseError> {
        let neg = self.eat(&TokenKind::Minus);
        if !neg {
            let _ = self.eat(&TokenKind::Plus);
        }
        match self.peek().clone() {
            TokenKind::Number(text) => {
                self.advance();
                Ok(if neg { format!("-{text}") } else { text })
            }
            _ => Err(self.err_expected("number")),
        }
    }

    fn is_column_constraint_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::KwPrimary
                | TokenKind::KwNot
                | TokenKind::KwNull
                | TokenKind::KwUnique
                | TokenKind::KwCheck
                | TokenKind::KwDefault
                | TokenKind::KwCollate
                | TokenKind::KwReferences
                | TokenKind::KwGenerated
                | TokenKind::KwConstraint
                | TokenKind::KwAs
        )
    }

    fn try_column_constraint(&mut self) -> Result<Option<ColumnConstraint>, ParseError> {
        let start = self.current_span();
        let name = if self.eat_kw(&TokenKind::KwConstraint) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let kind = if self.eat_kw(&TokenKind::KwPrimary) {
            self.expect_kw(&TokenKind::KwKey)?;
            let direction = if self.eat_kw(&TokenKind::KwAsc) {
                Some(SortDirection::Asc)
            } else if self.eat_kw(&TokenKind::KwDesc) {
                Some(SortDirection::Desc)
            } else {
                None
            };
            let conflict = self.parse_on_conflict()?;
            let autoincrement = self.eat_kw(&TokenKind::KwAutoincrement);
            ColumnConstraintKind::PrimaryKey {
                direction,
                conflict,
                autoincrement,
            }
        } else if self.check_kw(&TokenKind::KwNot) && self.peek_nth(1) == &TokenKind::KwNull {
            self.advance();
            self.advance();
            let conflict = self.parse_on_conflict()?;
            ColumnConstraintKind::NotNull { conflict }
        } else if self.eat_kw(&TokenKind::KwNull) {
            ColumnConstraintKind::Null
        } else if self.eat_kw(&TokenKind::KwUnique) {
            let conflict = self.parse_on_conflict()?;
            ColumnConstraintKind::Unique { conflict }
        } else if self.eat_kw(&TokenKind::KwCheck) {
            self.expect_token(&TokenKind::LeftParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            ColumnConstraintKind::Check(expr)
        } else if self.eat_kw(&TokenKind::KwDefault) {
            if self.eat(&TokenKind::LeftParen) {
                let expr = self.parse_expr()?;
                self.expect_token(&TokenKind::RightParen)?;
                ColumnConstraintKind::Default(DefaultValue::ParenExpr(expr))
            } else {
                ColumnConstraintKind::Default(DefaultValue::Expr(self.parse_default_literal()?))
            }
        } else if self.eat_kw(&TokenKind::KwCollate) {
            ColumnConstraintKind::Collate(self.parse_identifier()?)
        } else if self.eat_kw(&TokenKind::KwReferences) {
            ColumnConstraintKind::ForeignKey(self.parse_fk_clause()?)
        } else if self.eat_kw(&TokenKind::KwGenerated) {
            let _ = self.eat_kw(&TokenKind::KwAlways);
            self.expect_kw(&TokenKind::KwAs)?;
            self.parse_generated_tail()?
        } else if self.eat_kw(&TokenKind::KwAs) {
            self.parse_generated_tail()?
        } else if name.is_some() {
            return Err(self.err_expected("constraint kind after CONSTRAINT name"));
        } else {
            return Ok(None);
        };
        Ok(Some(ColumnConstraint {
            name,
            kind,
            span: start.merge(self.prev_span()),
        }))
    }

    /// `(expr) [STORED | VIRTUAL]` after `[GENERATED ALWAYS] AS`.
    fn parse_generated_tail(&mut self) -> Result<ColumnConstraintKind, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_token(&TokenKind::RightParen)?;
        let storage = if self.eat_contextual("STORED") {
            Some(GeneratedStorage::Stored)
        } else if self.eat_kw(&TokenKind::KwVirtual) {
            Some(GeneratedStorage::Virtual)
        } else {
            None
        };
        Ok(ColumnConstraintKind::Generated { expr, storage })
    }

    /// Un-parenthesized DEFAULT values admit literals and signed numbers
    /// only; anything richer must be wrapped in parentheses.
    fn parse_default_literal(&mut self) -> Result<Expr, ParseError> {
        let tok = self.current().cloned();
        match self.peek().clone() {
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Blob(_)
            | TokenKind::KwNull
            | TokenKind::KwCurrentTime
            | TokenKind::KwCurrentDate
            | TokenKind::KwCurrentTimestamp => {
                let t = self.advance_token();
                Ok(match t.kind {
                    TokenKind::Number(text) => Expr::Literal(Literal::Number(text), t.span),
                    TokenKind::String(s) => Expr::Literal(Literal::String(s), t.span),
                    TokenKind::Blob(b) => Expr::Literal(Literal::Blob(b), t.span),
                    TokenKind::KwNull => Expr::Literal(Literal::Null, t.span),
                    TokenKind::KwCurrentTime => Expr::Literal(Literal::CurrentTime, t.span),
                    TokenKind::KwCurrentDate => Expr::Literal(Literal::CurrentDate, t.span),
                    _ => Expr::Literal(Literal::CurrentTimestamp, t.span),
                })
            }
            TokenKind::Minus | TokenKind::Plus => {
                let op_tok = self.advance_token();
                let op = if op_tok.kind == TokenKind::Minus {
                    squeal_ast::UnaryOp::Negate
                } else {
                    squeal_ast::UnaryOp::Plus
                };
                match self.peek().clone() {
                    TokenKind::Number(text) => {
                        let t = self.advance_token();
                        let span = op_tok.span.merge(t.span);
                        Ok(Expr::UnaryOp {
                            op,
                            expr: Box::new(Expr::Literal(Literal::Number(text), t.span)),
                            span,
                        })
                    }
                    _ => Err(self.err_expected("number after sign in DEFAULT")),
                }
            }
            TokenKind::Id(s) if s.eq_ignore_ascii_case("true") => {
                let t = self.advance_token();
                Ok(Expr::Literal(Literal::Boolean(true), t.span))
            }
            TokenKind::Id(s) if s.eq_ignore_ascii_case("false") => {
                let t = self.advance_token();
                Ok(Expr::Literal(Literal::Boolean(false), t.span))
            }
            _ => Err(ParseError::at(
                "expected literal value, signed number, or parenthesized expression in DEFAULT",
                tok.as_ref(),
            )),
        }
    }

    fn parse_on_conflict(&mut self) -> Result<Option<ConflictAction>, ParseError> {
        if self.check_kw(&TokenKind::KwOn) && self.peek_nth(1) == &TokenKind::KwConflict {
            self.advance();
            self.advance();
            Ok(Some(self.parse_conflict_action()?))
        } else {
            Ok(None)
        }
    }

    fn parse_fk_clause(&mut self) -> Result<ForeignKeyClause, ParseError> {
        let start = self.current_span();
        let table = self.parse_identifier()?;
        let columns = if self.eat(&TokenKind::LeftParen) {
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };
        let mut actions = Vec::new();
        let mut deferrable = None;
        loop {
            if self.check_kw(&TokenKind::KwOn) {
                self.advance();
                let trigger = if self.eat_kw(&TokenKind::KwDelete) {
                    ForeignKeyTrigger::OnDelete
                } else {
                    self.expect_kw(&TokenKind::KwUpdate)?;
                    ForeignKeyTrigger::OnUpdate
                };
                let action = self.parse_fk_action_type()?;
                actions.push(ForeignKeyAction { trigger, action });
            } else if (self.check_kw(&TokenKind::KwNot)
                && self.peek_nth(1) == &TokenKind::KwDeferrable)
                || self.check_kw(&TokenKind::KwDeferrable)
            {
                // Plain NOT here belongs to a following NOT NULL column
                // constraint, not to this clause.
                let not = self.eat_kw(&TokenKind::KwNot);
                self.expect_kw(&TokenKind::KwDeferrable)?;
                let initially = if self.eat_kw(&TokenKind::KwInitially) {
                    if self.eat_kw(&TokenKind::KwDeferred) {
                        Some(DeferrableInitially::Deferred)
                    } else {
                        self.expect_kw(&TokenKind::KwImmediate)?;
                        Some(DeferrableInitially::Immediate)
                    }
                } else {
                    None
                };
                deferrable = Some(Deferrable { not, initially });
            } else if self.eat_kw(&TokenKind::KwMatch) {
                // MATCH name is parsed and ignored, as SQLite does.
                self.parse_identifier()?;
            } else {
                break;
            }
        }
        Ok(ForeignKeyClause {
            table,
            columns,
            actions,
            deferrable,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_fk_action_type(&mut self) -> Result<ForeignKeyActionType, ParseError> {
        if self.eat_kw(&TokenKind::KwSet) {
            if self.eat_kw(&TokenKind::KwNull) {
                Ok(ForeignKeyActionType::SetNull)
            } else {
                self.expect_kw(&TokenKind::KwDefault)?;
                Ok(ForeignKeyActionType::SetDefault)
            }
        } else if self.eat_kw(&TokenKind::KwCascade) {
            Ok(ForeignKeyActionType::Cascade)
        } else if self.eat_kw(&TokenKind::KwRestrict) {
            Ok(ForeignKeyActionType::Restrict)
        } else if self.check_kw(&TokenKind::KwNo) {
            self.advance();
            self.expect_kw(&TokenKind::KwAction)?;
            Ok(ForeignKeyActionType::NoAction)
        } else {
            Err(self.err_expected("foreign key action"))
        }
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let start = self.current_span();
        let name = if self.eat_kw(&TokenKind::KwConstraint) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let kind = if self.eat_kw(&TokenKind::KwPrimary) {
            self.expect_kw(&TokenKind::KwKey)?;
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_sep(Self::parse_indexed_column)?;
            self.expect_token(&TokenKind::RightParen)?;
            let conflict = self.parse_on_conflict()?;
            TableConstraintKind::PrimaryKey { columns, conflict }
        } else if self.eat_kw(&TokenKind::KwUnique) {
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_sep(Self::parse_indexed_column)?;
            self.expect_token(&TokenKind::RightParen)?;
            let conflict = self.parse_on_conflict()?;
            TableConstraintKind::Unique { columns, conflict }
        } else if self.eat_kw(&TokenKind::KwCheck) {
            self.expect_token(&TokenKind::LeftParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            TableConstraintKind::Check(expr)
        } else if self.eat_kw(&TokenKind::KwForeign) {
            self.expect_kw(&TokenKind::KwKey)?;
            self.expect_token(&TokenKind::LeftParen)?;
            let columns = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            self.expect_kw(&TokenKind::KwReferences)?;
            let clause = self.parse_fk_clause()?;
            TableConstraintKind::ForeignKey { columns, clause }
        } else {
            return Err(self.err_expected("table constraint"));
        };
        Ok(TableConstraint {
            name,
            kind,
            span: start.merge(self.prev_span()),
        })
    }

    fn parse_indexed_column(&mut self) -> Result<IndexedColumn, ParseError> {
        // As in parse_ordering_term, postfix COLLATE belongs to the
        // expression grammar; unwrap it into the indexed-column slot.
        let (expr, collation) = match self.parse_expr()? {
            Expr::Collate {
                expr, collation, ..
            } => (*expr, Some(collation)),
            e => (e, None),
        };
        let direction = if self.eat_kw(&TokenKind::KwAsc) {
            Some(SortDirection::Asc)
        } else if self.eat_kw(&TokenKind::KwDesc) {
            Some(SortDirection::Desc)
        } else {
            None
        };
        let span = expr.span().merge(self.prev_span());
        Ok(IndexedColumn {
            expr,
            collation,
            direction,
            span,
        })
    }

    fn parse_create_index(&mut self, start: Span, unique: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        self.expect_kw(&TokenKind::KwOn)?;
        let table = self.parse_identifier()?;
        self.expect_token(&TokenKind::LeftParen)?;
        let columns = self.parse_comma_sep(Self::parse_indexed_column)?;
        self.expect_token(&TokenKind::RightParen)?;
        let where_clause = if self.eat_kw(&TokenKind::KwWhere) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Statement::CreateIndex(CreateIndexStatement {
            unique,
            if_not_exists,
            name,
            table,
            columns,
            where_clause,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_create_view(&mut self, start: Span, temporary: bool) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.advance();
            let cols = self.parse_comma_sep(Self::parse_identifier)?;
            self.expect_token(&TokenKind::RightParen)?;
            cols
        } else {
            vec![]
        };
        self.expect_kw(&TokenKind::KwAs)?;
        let with = if self.check_kw(&TokenKind::KwWith) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        let query = self.parse_select_stmt(with)?;
        Ok(Statement::CreateView(CreateViewStatement {
            if_not_exists,
            temporary,
            name,
            columns,
            query,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_create_trigger(
        &mut self,
        start: Span,
        temporary: bool,
    ) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        let timing = if self.eat_kw(&TokenKind::KwBefore) {
            TriggerTiming::Before
        } else if self.eat_kw(&TokenKind::KwAfter) {
            TriggerTiming::After
        } else if self.eat_kw(&TokenKind::KwInstead) {
            self.expect_kw(&TokenKind::KwOf)?;
            TriggerTiming::InsteadOf
        } else {
            // SQLite defaults to BEFORE when no timing is given.
            TriggerTiming::Before
        };
        let event = if self.eat_kw(&TokenKind::KwInsert) {
            TriggerEvent::Insert
        } else if self.eat_kw(&TokenKind::KwDelete) {
            TriggerEvent::Delete
        } else {
            self.expect_kw(&TokenKind::KwUpdate)?;
            let cols = if self.eat_kw(&TokenKind::KwOf) {
                self.parse_comma_sep(Self::parse_identifier)?
            } else {
                vec![]
            };
            TriggerEvent::Update(cols)
        };
        self.expect_kw(&TokenKind::KwOn)?;
        let table = self.parse_identifier()?;
        let for_each_row = if self.eat_kw(&TokenKind::KwFor) {
            self.expect_kw(&TokenKind::KwEach)?;
            self.expect_kw(&TokenKind::KwRow)?;
            true
        } else {
            false
        };
        let when = if self.eat_kw(&TokenKind::KwWhen) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_kw(&TokenKind::KwBegin)?;
        let mut body = Vec::new();
        loop {
            if self.check_kw(&TokenKind::KwEnd) {
                break;
            }
            if self.at_eof() {
                return Err(self.err_expected("END to close trigger body"));
            }
            let stmt = self.parse_trigger_body_stmt()?;
            body.push(stmt);
            self.expect_token(&TokenKind::Semicolon)?;
        }
        self.expect_kw(&TokenKind::KwEnd)?;
        Ok(Statement::CreateTrigger(CreateTriggerStatement {
            if_not_exists,
            temporary,
            name,
            timing,
            event,
            table,
            for_each_row,
            when,
            body,
            span: start.merge(self.prev_span()),
        }))
    }

    /// Trigger bodies admit DML only.
    fn parse_trigger_body_stmt(&mut self) -> Result<Statement, ParseError> {
        let stmt = self.parse_statement_inner()?;
        match &stmt {
            Statement::Select(_)
            | Statement::Insert(_)
            | Statement::Update(_)
            | Statement::Delete(_) => Ok(stmt),
            other => Err(ParseError::with_span(
                "only SELECT, INSERT, UPDATE, and DELETE statements are allowed in a \
                 trigger body",
                other.span(),
            )),
        }
    }

    fn parse_create_virtual_table(&mut self, start: Span) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        self.expect_kw(&TokenKind::KwUsing)?;
        let module = self.parse_identifier()?;
        let args = if self.eat(&TokenKind::LeftParen) {
            if self.check(&TokenKind::RightParen) {
                self.advance();
                vec![]
            } else {
                self.parse_module_args()?
            }
        } else {
            vec![]
        };
        Ok(Statement::CreateVirtualTable(CreateVirtualTableStatement {
            if_not_exists,
            name,
            module,
            args,
            span: start.merge(self.prev_span()),
        }))
    }

    /// Module arguments are opaque: collect raw token slices until the
    /// matching close paren, splitting on top-level commas.
    fn parse_module_args(&mut self) -> Result<Vec<String>, ParseError> {
        let mut args = Vec::new();
        let mut depth = 0u32;
        let mut current_arg = String::new();
        loop {
            match self.peek() {
                TokenKind::RightParen if depth == 0 => {
                    self.advance();
                    args.push(current_arg.trim().to_owned());
                    return Ok(args);
                }
                TokenKind::LeftParen => {
                    depth += 1;
                    current_arg.push('(');
                    self.advance();
                }
                TokenKind::RightParen => {
                    depth -= 1;
                    current_arg.push(')');
                    self.advance();
                }
                TokenKind::Comma if depth == 0 => {
                    args.push(current_arg.trim().to_owned());
                    current_arg = String::new();
                    self.advance();
                }
                TokenKind::Eof => return Err(self.err_expected("')' to close module arguments")),
                _ => {
                    let text = self.peek().to_sql();
                    if !current_arg.is_empty() && !current_arg.ends_with('(') && !text.is_empty() {
                        current_arg.push(' ');
                    }
                    current_arg.push_str(&text);
                    self.advance();
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // DROP
    // -----------------------------------------------------------------------

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwDrop)?;
        let object_type = if self.eat_kw(&TokenKind::KwTable) {
            DropObjectType::Table
        } else if self.eat_kw(&TokenKind::KwView) {
            DropObjectType::View
        } else if self.eat_kw(&TokenKind::KwIndex) {
            DropObjectType::Index
        } else if self.eat_kw(&TokenKind::KwTrigger) {
            DropObjectType::Trigger
        } else {
            return Err(self.err_expected("TABLE, VIEW, INDEX, or TRIGGER"));
        };
        let if_exists =
            if self.check_kw(&TokenKind::KwIf) && self.peek_nth(1) == &TokenKind::KwExists {
                self.advance();
                self.advance();
                true
            } else {
                false
            };
        let name = self.parse_qualified_name()?;
        Ok(Statement::Drop(DropStatement {
            object_type,
            if_exists,
            name,
            span: start.merge(self.prev_span()),
        }))
    }

    // -----------------------------------------------------------------------
    // ALTER TABLE
    // -----------------------------------------------------------------------

    fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwAlter)?;
        self.expect_kw(&TokenKind::KwTable)?;
        let table = self.parse_qualified_name()?;
        let action = if self.eat_kw(&TokenKind::KwRename) {
            if self.eat_kw(&TokenKind::KwTo) {
                AlterTableAction::RenameTo(self.parse_identifier()?)
            } else {
                let _ = self.eat_kw(&TokenKind::KwColumn);
                let old = self.parse_identifier()?;
                self.expect_kw(&TokenKind::KwTo)?;
                let new = self.parse_identifier()?;
                AlterTableAction::RenameColumn { old, new }
            }
        } else if self.eat_kw(&TokenKind::KwAdd) {
            let _ = self.eat_kw(&TokenKind::KwColumn);
            let def = self.parse_column_def()?;
            // STORED generated columns cannot be added after the fact.
            if def.constraints.iter().any(|c| {
                matches!(
                    c.kind,
                    ColumnConstraintKind::Generated {
                        storage: Some(GeneratedStorage::Stored),
                        ..
                    }
                )
            }) {
                return Err(ParseError::with_span(
                    "cannot add a STORED generated column to an existing table",
                    def.span,
                ));
            }
            AlterTableAction::AddColumn(def)
        } else if self.eat_kw(&TokenKind::KwDrop) {
            let _ = self.eat_kw(&TokenKind::KwColumn);
            AlterTableAction::DropColumn(self.parse_identifier()?)
        } else {
            return Err(self.err_expected("RENAME, ADD, or DROP"));
        };
        Ok(Statement::AlterTable(AlterTableStatement {
            table,
            action,
            span: start.merge(self.prev_span()),
        }))
    }

    // -----------------------------------------------------------------------
    // Transaction control
    // -----------------------------------------------------------------------

    fn parse_begin(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwBegin)?;
        let mode = if self.eat_kw(&TokenKind::KwDeferred) {
            Some(TransactionMode::Deferred)
        } else if self.eat_kw(&TokenKind::KwImmediate) {
            Some(TransactionMode::Immediate)
        } else if self.eat_kw(&TokenKind::KwExclusive) {
            Some(TransactionMode::Exclusive)
        } else {
            None
        };
        let _ = self.eat_kw(&TokenKind::KwTransaction);
        Ok(Statement::Begin(BeginStatement {
            mode,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_rollback(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwRollback)?;
        let _ = self.eat_kw(&TokenKind::KwTransaction);
        let to_savepoint = if self.eat_kw(&TokenKind::KwTo) {
            let _ = self.eat_kw(&TokenKind::KwSavepoint);
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(Statement::Rollback(RollbackStatement {
            to_savepoint,
            span: start.merge(self.prev_span()),
        }))
    }

    // -----------------------------------------------------------------------
    // ATTACH / PRAGMA / VACUUM / EXPLAIN
    // -----------------------------------------------------------------------

    fn parse_attach(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwAttach)?;
        let _ = self.eat_kw(&TokenKind::KwDatabase);
        let expr = self.parse_expr()?;
        self.expect_kw(&TokenKind::KwAs)?;
        let schema = self.parse_identifier()?;
        Ok(Statement::Attach(AttachStatement {
            expr,
            schema,
            span: start.merge(self.prev_span()),
        }))
    }

    /// PRAGMA values are uninterpreted names more often than expressions:
    /// `ON` maps to TRUE, other bare keywords (`DELETE`, `FULL`, ...) become
    /// plain names, and everything else parses as an expression.
    fn parse_pragma_value_expr(&mut self) -> Result<Expr, ParseError> {
        let kind = self.peek().clone();
        match kind {
            TokenKind::KwOn => {
                let sp = self.current_span();
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true), sp))
            }
            TokenKind::KwNull
            | TokenKind::KwNot
            | TokenKind::KwCase
            | TokenKind::KwCast
            | TokenKind::KwExists
            | TokenKind::KwCurrentTime
            | TokenKind::KwCurrentDate
            | TokenKind::KwCurrentTimestamp => self.parse_expr(),
            k if k.keyword_str().is_some() => {
                let sp = self.current_span();
                self.advance();
                Ok(Expr::Column(ColumnRef::bare(kw_to_str(&k)), sp))
            }
            _ => self.parse_expr(),
        }
    }

    fn parse_pragma(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwPragma)?;
        let name = self.parse_qualified_name()?;
        let value = if self.eat(&TokenKind::Eq) || self.eat(&TokenKind::EqEq) {
            Some(PragmaValue::Assign(self.parse_pragma_value_expr()?))
        } else if self.eat(&TokenKind::LeftParen) {
            let v = self.parse_pragma_value_expr()?;
            self.expect_token(&TokenKind::RightParen)?;
            Some(PragmaValue::Call(v))
        } else {
            None
        };
        Ok(Statement::Pragma(PragmaStatement {
            name,
            value,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_vacuum(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwVacuum)?;
        let schema = if !self.at_eof()
            && !self.check(&TokenKind::Semicolon)
            && !self.check_kw(&TokenKind::KwInto)
        {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let into = if self.eat_kw(&TokenKind::KwInto) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Statement::Vacuum(VacuumStatement {
            schema,
            into,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_explain(&mut self) -> Result<Statement, ParseError> {
        let start = self.current_span();
        self.expect_kw(&TokenKind::KwExplain)?;
        let query_plan = if self.eat_kw(&TokenKind::KwQuery) {
            self.expect_kw(&TokenKind::KwPlan)?;
            true
        } else {
            false
        };
        let stmt = self.parse_statement_inner()?;
        let span = start.merge(stmt.span());
        Ok(Statement::Explain {
            query_plan,
            stmt: Box::new(stmt),
            span,
        })
    }

    // -----------------------------------------------------------------------
    // Window definitions (SELECT ... WINDOW clause and OVER)
    // -----------------------------------------------------------------------

    fn parse_window_def(&mut self) -> Result<WindowDef, ParseError> {
        let start = self.current_span();
        let name = self.parse_identifier()?;
        self.expect_kw(&TokenKind::KwAs)?;
        self.expect_token(&TokenKind::LeftParen)?;
        let spec = self.parse_window_spec()?;
        self.expect_token(&TokenKind::RightParen)?;
        Ok(WindowDef {
            name,
            spec,
            span: start.merge(self.prev_span()),
        })
    }

    pub(crate) fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        let start = self.current_span();
        // Optional base window name.
        let has_base_window = match self.peek() {
            TokenKind::Id(_) | TokenKind::QuotedId(_) => true,
            k if is_nonreserved_kw(k) => !matches!(
                k,
                TokenKind::KwPartition
                    | TokenKind::KwOrder
                    | TokenKind::KwRange
                    | TokenKind::KwRows
                    | TokenKind::KwGroups
                    | TokenKind::KwExclude
            ),
            _ => false,
        };
        let base_window = if has_base_window {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let partition_by = if self.eat_kw(&TokenKind::KwPartition) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_expr)?
        } else {
            vec![]
        };
        let order_by = if self.eat_kw(&TokenKind::KwOrder) {
            self.expect_kw(&TokenKind::KwBy)?;
            self.parse_comma_sep(Self::parse_ordering_term)?
        } else {
            vec![]
        };
        let frame = self.try_frame_spec()?;
        let span = start.merge(self.prev_span());
        Ok(WindowSpec {
            base_window,
            partition_by,
            order_by,
            frame,
            span,
        })
    }

    fn try_frame_spec(&mut self) -> Result<Option<FrameSpec>, ParseError> {
        let start = self.current_span();
        let unit = if self.eat_kw(&TokenKind::KwRows) {
            FrameUnit::Rows
        } else if self.eat_kw(&TokenKind::KwRange) {
            FrameUnit::Range
        } else if self.eat_kw(&TokenKind::KwGroups) {
            FrameUnit::Groups
        } else {
            return Ok(None);
        };
        let (frame_start, frame_end) = if self.eat_kw(&TokenKind::KwBetween) {
            let s = self.parse_frame_bound()?;
            self.expect_kw(&TokenKind::KwAnd)?;
            let e = self.parse_frame_bound()?;
            (s, Some(e))
        } else {
            // Without BETWEEN the single bound is the start; the frame ends
            // at the current row.
            (self.parse_frame_bound()?, None)
        };
        if matches!(frame_start, FrameBound::UnboundedFollowing) {
            return Err(self.err_msg("UNBOUNDED FOLLOWING is not a valid frame start"));
        }
        if matches!(frame_end, Some(FrameBound::UnboundedPreceding)) {
            return Err(self.err_msg("UNBOUNDED PRECEDING is not a valid frame end"));
        }
        let exclude = if self.eat_kw(&TokenKind::KwExclude) {
            if self.check_kw(&TokenKind::KwNo) {
                self.advance();
                self.expect_kw(&TokenKind::KwOthers)?;
                Some(FrameExclude::NoOthers)
            } else if self.eat_kw(&TokenKind::KwTies) {
                Some(FrameExclude::Ties)
            } else if self.eat_kw(&TokenKind::KwGroup) {
                Some(FrameExclude::Group)
            } else if self.eat_kw(&TokenKind::KwCurrent) {
                self.expect_kw(&TokenKind::KwRow)?;
                Some(FrameExclude::CurrentRow)
            } else {
                return Err(
                    self.err_expected("NO OTHERS, TIES, GROUP, or CURRENT ROW after EXCLUDE")
                );
            }
        } else {
            None
        };
        Ok(Some(FrameSpec {
            unit,
            start: frame_start,
            end: frame_end,
            exclude,
            span: start.merge(self.prev_span()),
        }))
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_kw(&TokenKind::KwUnbounded) {
            if self.eat_kw(&TokenKind::KwPreceding) {
                Ok(FrameBound::UnboundedPreceding)
            } else {
                self.expect_kw(&TokenKind::KwFollowing)?;
                Ok(FrameBound::UnboundedFollowing)
            }
        } else if self.eat_kw(&TokenKind::KwCurrent) {
            self.expect_kw(&TokenKind::KwRow)?;
            Ok(FrameBound::CurrentRow)
        } else {
            let expr = self.parse_expr()?;
            if self.eat_kw(&TokenKind::KwPreceding) {
                Ok(FrameBound::Preceding(Box::new(expr)))
            } else {
                self.expect_kw(&TokenKind::KwFollowing)?;
                Ok(FrameBound::Following(Box::new(expr)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword classification helpers
// ---------------------------------------------------------------------------

/// Keywords SQLite does not reserve: these may appear as plain identifiers
/// (table, column, alias names) without quoting.
pub(crate) fn is_nonreserved_kw(k: &TokenKind) -> bool {
    matches!(
        k,
        TokenKind::KwAbort
            | TokenKind::KwAction
            | TokenKind::KwAfter
            | TokenKind::KwAlways
            | TokenKind::KwAnalyze
            | TokenKind::KwAsc
            | TokenKind::KwBefore
            | TokenKind::KwCascade
            | TokenKind::KwColumn
            | TokenKind::KwConflict
            | TokenKind::KwCurrent
            | TokenKind::KwDatabase
            | TokenKind::KwDeferred
            | TokenKind::KwDesc
            | TokenKind::KwDo
            | TokenKind::KwEach
            | TokenKind::KwEnd
            | TokenKind::KwExclude
            | TokenKind::KwExclusive
            | TokenKind::KwFail
            | TokenKind::KwFilter
            | TokenKind::KwFirst
            | TokenKind::KwFollowing
            | TokenKind::KwFull
            | TokenKind::KwGenerated
            | TokenKind::KwGroups
            | TokenKind::KwIf
            | TokenKind::KwIgnore
            | TokenKind::KwImmediate
            | TokenKind::KwIndex
            | TokenKind::KwInitially
            | TokenKind::KwInstead
            | TokenKind::KwKey
            | TokenKind::KwLast
            | TokenKind::KwMatch
            | TokenKind::KwMaterialized
            | TokenKind::KwNo
            | TokenKind::KwNothing
            | TokenKind::KwNulls
            | TokenKind::KwOf
            | TokenKind::KwOffset
            | TokenKind::KwOthers
            | TokenKind::KwOver
            | TokenKind::KwPartition
            | TokenKind::KwPlan
            | TokenKind::KwPragma
            | TokenKind::KwPreceding
            | TokenKind::KwQuery
            | TokenKind::KwRange
            | TokenKind::KwRecursive
            | TokenKind::KwReindex
            | TokenKind::KwRelease
            | TokenKind::KwRename
            | TokenKind::KwReplace
            | TokenKind::KwRestrict
            | TokenKind::KwReturning
            | TokenKind::KwRow
            | TokenKind::KwRows
            | TokenKind::KwSavepoint
            | TokenKind::KwTable
            | TokenKind::KwTemp
            | TokenKind::KwTemporary
            | TokenKind::KwTies
            | TokenKind::KwTransaction
            | TokenKind::KwTrigger
            | TokenKind::KwUnbounded
            | TokenKind::KwVacuum
            | TokenKind::KwView
            | TokenKind::KwVirtual
            | TokenKind::KwWindow
            | TokenKind::KwWithout
    )
}

/// Keywords that must never be consumed as implicit aliases because they
/// begin or continue the next clause in alias position.
fn is_alias_terminator_kw(k: &TokenKind) -> bool {
    matches!(
        k,
        TokenKind::KwCross
            | TokenKind::KwExcept
            | TokenKind::KwFull
            | TokenKind::KwGroup
            | TokenKind::KwHaving
            | TokenKind::KwInner
            | TokenKind::KwIntersect
            | TokenKind::KwJoin
            | TokenKind::KwLeft
            | TokenKind::KwLimit
            | TokenKind::KwNatural
            | TokenKind::KwOffset
            | TokenKind::KwOn
            | TokenKind::KwOrder
            | TokenKind::KwOuter
            | TokenKind::KwReturning
            | TokenKind::KwRight
            | TokenKind::KwUnion
            | TokenKind::KwUsing
            | TokenKind::KwWhere
            | TokenKind::KwWindow
    )
}

/// Identifier text for a keyword consumed in identifier position.
pub(crate) fn kw_to_str(k: &TokenKind) -> String {
    k.keyword_str()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(sql: &str) -> Vec<Statement> {
        let mut p = Parser::from_sql(sql);
        let (stmts, errs) = p.parse_all();
        assert!(errs.is_empty(), "unexpected errors for `{sql}`: {errs:?}");
        stmts
    }

    fn parse_one(sql: &str) -> Statement {
        let stmts = parse_ok(sql);
        assert_eq!(stmts.len(), 1, "expected 1 statement, got {}", stmts.len());
        stmts.into_iter().next().unwrap()
    }

    fn parse_err(sql: &str) -> Vec<ParseError> {
        let mut p = Parser::from_sql(sql);
        let (_, errs) = p.parse_all();
        assert!(!errs.is_empty(), "expected errors for `{sql}`");
        errs
    }

    fn select_core(stmt: &Statement) -> &SelectCore {
        match stmt {
            Statement::Select(s) => &s.body.select,
            other => unreachable!("expected SELECT, got {other:?}"),
        }
    }

    fn number(text: &str) -> Literal {
        Literal::Number(text.to_owned())
    }

    // -----------------------------------------------------------------------
    // Recursion guard
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_depth_overflow_does_not_poison_following_statement() {
        let mut parser = Parser::from_sql("SELECT 1; SELECT 42;");
        parser.depth = MAX_PARSE_DEPTH - 1;

        let first = parser.parse_statement();
        assert!(first.is_err(), "first statement should hit depth guard");
        assert_eq!(
            parser.depth,
            MAX_PARSE_DEPTH - 1,
            "depth must not leak upward on recursion-limit error"
        );

        let _ = parser.eat(&TokenKind::Semicolon);
        let second = parser.parse_statement();
        assert!(second.is_err());
        assert_eq!(parser.depth, MAX_PARSE_DEPTH - 1);
    }

    #[test]
    fn test_deeply_nested_parens_fail_cleanly() {
        let sql = format!("SELECT {}1{}", "(".repeat(2000), ")".repeat(2000));
        let mut p = Parser::from_sql(&sql);
        let (stmts, errs) = p.parse_all();
        assert!(stmts.is_empty());
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("too deep"));
    }

    // -----------------------------------------------------------------------
    // SELECT
    // -----------------------------------------------------------------------

    #[test]
    fn select_literal() {
        let stmt = parse_one("SELECT 1");
        if let SelectCore::Select { columns, from, .. } = select_core(&stmt) {
            assert_eq!(columns.len(), 1);
            assert!(from.is_none());
            assert!(matches!(
                &columns[0],
                ResultColumn::Expr { expr: Expr::Literal(l, _), .. } if *l == number("1")
            ));
        } else {
            unreachable!("expected Select core");
        }
    }

    #[test]
    fn select_arithmetic_precedence_in_result_column() {
        // SELECT 1 + 2 * 3 → Binary(+, 1, Binary(*, 2, 3))
        let stmt = parse_one("SELECT 1 + 2 * 3;");
        let SelectCore::Select { columns, .. } = select_core(&stmt) else {
            unreachable!("expected Select core");
        };
        let ResultColumn::Expr { expr, .. } = &columns[0] else {
            unreachable!("expected expression column");
        };
        let Expr::BinaryOp {
            op: BinaryOp::Add,
            left,
            right,
            ..
        } = expr
        else {
            unreachable!("expected Add at top, got {expr:?}");
        };
        assert!(matches!(left.as_ref(), Expr::Literal(l, _) if *l == number("1")));
        assert!(matches!(
            right.as_ref(),
            Expr::BinaryOp {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn select_star_from() {
        let stmt = parse_one("SELECT * FROM t");
        if let SelectCore::Select { columns, from, .. } = select_core(&stmt) {
            assert!(matches!(columns[0], ResultColumn::Star(_)));
            assert!(from.is_some());
        } else {
            unreachable!("expected Select core");
        }
    }

    #[test]
    fn select_table_star_and_alias() {
        let stmt = parse_one("SELECT t.*, a AS x, b y FROM t");
        if let SelectCore::Select { columns, .. } = select_core(&stmt) {
            assert!(matches!(&columns[0], ResultColumn::TableStar { table, .. } if table == "t"));
            assert!(
                matches!(&columns[1], ResultColumn::Expr { alias: Some(a), .. } if a == "x")
            );
            assert!(
                matches!(&columns[2], ResultColumn::Expr { alias: Some(a), .. } if a == "y")
            );
        } else {
            unreachable!("expected Select core");
        }
    }

    #[test]
    fn select_distinct_group_having() {
        let stmt = parse_one("SELECT DISTINCT a, count(*) FROM t GROUP BY a HAVING count(*) > 1");
        if let SelectCore::Select {
            distinct,
            group_by,
            having,
            ..
        } = select_core(&stmt)
        {
            assert_eq!(*distinct, Distinctness::Distinct);
            assert_eq!(group_by.len(), 1);
            assert!(having.is_some());
        } else {
            unreachable!("expected Select core");
        }
    }

    #[test]
    fn select_where_between_and_binds_right() {
        // WHERE a BETWEEN 1 AND 2 AND b = 3 → AND(Between(a,1,2), Eq(b,3))
        let stmt = parse_one("SELECT * FROM t WHERE a BETWEEN 1 AND 2 AND b = 3;");
        let SelectCore::Select {
            where_clause: Some(wh),
            ..
        } = select_core(&stmt)
        else {
            unreachable!("expected WHERE");
        };
        let Expr::BinaryOp {
            op: BinaryOp::And,
            left,
            right,
            ..
        } = wh.as_ref()
        else {
            unreachable!("expected AND at top, got {wh:?}");
        };
        assert!(matches!(
            left.as_ref(),
            Expr::Between { not: false, .. }
        ));
        assert!(matches!(
            right.as_ref(),
            Expr::BinaryOp {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn select_where_order_limit() {
        let stmt = parse_one("SELECT a FROM t WHERE a > 1 ORDER BY a LIMIT 10 OFFSET 5");
        if let Statement::Select(s) = &stmt {
            assert_eq!(s.order_by.len(), 1);
            let limit = s.limit.as_ref().expect("LIMIT clause");
            assert!(matches!(&limit.limit, Expr::Literal(l, _) if *l == number("10")));
            assert!(matches!(&limit.offset, Some(Expr::Literal(l, _)) if *l == number("5")));
        } else {
            unreachable!("expected Select");
        }
    }

    #[test]
    fn select_limit_comma_form_swaps_offset() {
        let stmt = parse_one("SELECT a FROM t LIMIT 5, 10");
        if let Statement::Select(s) = &stmt {
            let limit = s.limit.as_ref().expect("LIMIT clause");
            assert!(matches!(&limit.limit, Expr::Literal(l, _) if *l == number("10")));
            assert!(matches!(&limit.offset, Some(Expr::Literal(l, _)) if *l == number("5")));
        } else {
            unreachable!("expected Select");
        }
    }

    #[test]
    fn select_ordering_term_collate_direction_nulls() {
        let stmt =
            parse_one("SELECT a FROM t ORDER BY a COLLATE NOCASE ASC NULLS FIRST, b DESC NULLS LAST");
        if let Statement::Select(s) = &stmt {
            assert_eq!(s.order_by.len(), 2);
            assert_eq!(s.order_by[0].collation.as_deref(), Some("NOCASE"));
            assert_eq!(s.order_by[0].direction, Some(SortDirection::Asc));
            assert_eq!(s.order_by[0].nulls, Some(NullsOrder::First));
            assert_eq!(s.order_by[1].direction, Some(SortDirection::Desc));
            assert_eq!(s.order_by[1].nulls, Some(NullsOrder::Last));
        } else {
            unreachable!("expected Select");
        }
    }

    #[test]
    fn select_values_statement() {
        let stmt = parse_one("VALUES (1, 2), (3, 4)");
        match select_core(&stmt) {
            SelectCore::Values { rows, .. } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].len(), 2);
            }
            other => unreachable!("expected VALUES core, got {other:?}"),
        }
    }

    #[test]
    fn select_compound_union_intersect() {
        let stmt = parse_one("SELECT a FROM t UNION ALL SELECT b FROM u INTERSECT SELECT c FROM v");
        if let Statement::Select(s) = &stmt {
            assert_eq!(s.body.compounds.len(), 2);
            assert_eq!(s.body.compounds[0].0, CompoundOp::UnionAll);
            assert_eq!(s.body.compounds[1].0, CompoundOp::Intersect);
        } else {
            unreachable!("expected Select");
        }
    }

    #[test]
    fn select_compound_order_limit_attach_to_whole() {
        let stmt = parse_one("SELECT a FROM t UNION SELECT b FROM u ORDER BY 1 LIMIT 3");
        if let Statement::Select(s) = &stmt {
            assert_eq!(s.body.compounds.len(), 1);
            assert_eq!(s.order_by.len(), 1);
            assert!(s.limit.is_some());
        } else {
            unreachable!("expected Select");
        }
    }

    #[test]
    fn select_recursive_cte_compound() {
        // Scenario: WITH RECURSIVE counter built from VALUES UNION ALL SELECT.
        let stmt = parse_one(
            "WITH RECURSIVE c(n) AS (VALUES(1) UNION ALL SELECT n+1 FROM c WHERE n<5) \
             SELECT * FROM c;",
        );
        let Statement::Select(s) = &stmt else {
            unreachable!("expected Select");
        };
        let with = s.with.as_ref().expect("WITH clause");
        assert!(with.recursive);
        assert_eq!(with.ctes.len(), 1);
        let cte = &with.ctes[0];
        assert_eq!(cte.name, "c");
        assert_eq!(cte.columns, vec!["n".to_owned()]);
        assert!(matches!(
            cte.query.body.select,
            SelectCore::Values { .. }
        ));
        assert_eq!(cte.query.body.compounds.len(), 1);
        assert_eq!(cte.query.body.compounds[0].0, CompoundOp::UnionAll);
        assert!(matches!(
            cte.query.body.compounds[0].1,
            SelectCore::Select { .. }
        ));
    }

    #[test]
    fn select_cte_materialization_hints() {
        let stmt = parse_one("WITH c AS MATERIALIZED (SELECT 1) SELECT * FROM c");
        if let Statement::Select(s) = &stmt {
            assert_eq!(
                s.with.as_ref().unwrap().ctes[0].materialized,
                Some(CteMaterialized::Materialized)
            );
        }
        let stmt = parse_one("WITH c AS NOT MATERIALIZED (SELECT 1) SELECT * FROM c");
        if let Statement::Select(s) = &stmt {
            assert_eq!(
                s.with.as_ref().unwrap().ctes[0].materialized,
                Some(CteMaterialized::NotMaterialized)
            );
        }
    }

    // -----------------------------------------------------------------------
    // FROM / JOIN
    // -----------------------------------------------------------------------

    fn from_clause(stmt: &Statement) -> &FromClause {
        match select_core(stmt) {
            SelectCore::Select { from: Some(f), .. } => f,
            other => unreachable!("expected FROM clause, got {other:?}"),
        }
    }

    #[test]
    fn from_join_kinds() {
        let stmt = parse_one(
            "SELECT * FROM a JOIN b ON a.x = b.x LEFT OUTER JOIN c USING (y) \
             NATURAL INNER JOIN d CROSS JOIN e, f",
        );
        let from = from_clause(&stmt);
        assert_eq!(from.joins.len(), 5);
        assert_eq!(from.joins[0].join_type.kind, JoinKind::Inner);
        assert!(matches!(
            from.joins[0].constraint,
            Some(JoinConstraint::On(_))
        ));
        assert_eq!(from.joins[1].join_type.kind, JoinKind::Left);
        assert!(matches!(
            &from.joins[1].constraint,
            Some(JoinConstraint::Using(cols)) if cols == &vec!["y".to_owned()]
        ));
        assert!(from.joins[2].join_type.natural);
        assert_eq!(from.joins[2].join_type.kind, JoinKind::Inner);
        assert_eq!(from.joins[3].join_type.kind, JoinKind::Cross);
        // The bare comma folds as a cross join.
        assert_eq!(from.joins[4].join_type.kind, JoinKind::Cross);
        assert!(from.joins[4].constraint.is_none());
    }

    #[test]
    fn from_right_and_full_outer_join() {
        let stmt = parse_one("SELECT * FROM a RIGHT JOIN b ON a.x = b.x FULL OUTER JOIN c ON 1");
        let from = from_clause(&stmt);
        assert_eq!(from.joins[0].join_type.kind, JoinKind::Right);
        assert_eq!(from.joins[1].join_type.kind, JoinKind::Full);
    }

    #[test]
    fn from_index_hints() {
        let stmt = parse_one("SELECT * FROM t INDEXED BY idx_t");
        match &from_clause(&stmt).source {
            TableOrSubquery::Table {
                index_hint: Some(IndexHint::IndexedBy(name)),
                ..
            } => assert_eq!(name, "idx_t"),
            other => unreachable!("expected indexed table, got {other:?}"),
        }
        let stmt = parse_one("SELECT * FROM t NOT INDEXED");
        assert!(matches!(
            &from_clause(&stmt).source,
            TableOrSubquery::Table {
                index_hint: Some(IndexHint::NotIndexed),
                ..
            }
        ));
    }

    #[test]
    fn from_subquery_and_paren_join() {
        let stmt = parse_one("SELECT * FROM (SELECT a FROM t) AS sub");
        assert!(matches!(
            &from_clause(&stmt).source,
            TableOrSubquery::Subquery { alias: Some(a), .. } if a == "sub"
        ));
        let stmt = parse_one("SELECT * FROM (a JOIN b ON a.x = b.x)");
        assert!(matches!(
            &from_clause(&stmt).source,
            TableOrSubquery::ParenJoin { .. }
        ));
    }

    #[test]
    fn from_table_valued_function() {
        let stmt = parse_one("SELECT * FROM generate_series(1, 100) AS gs");
        match &from_clause(&stmt).source {
            TableOrSubquery::TableFunction { name, args, alias, .. } => {
                assert_eq!(name, "generate_series");
                assert_eq!(args.len(), 2);
                assert_eq!(alias.as_deref(), Some("gs"));
            }
            other => unreachable!("expected table function, got {other:?}"),
        }
    }

    #[test]
    fn from_schema_qualified_table() {
        let stmt = parse_one("SELECT * FROM main.users u");
        match &from_clause(&stmt).source {
            TableOrSubquery::Table { name, alias, .. } => {
                assert_eq!(name.schema.as_deref(), Some("main"));
                assert_eq!(name.name, "users");
                assert_eq!(alias.as_deref(), Some("u"));
            }
            other => unreachable!("expected table, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Window functions
    // -----------------------------------------------------------------------

    #[test]
    fn window_inline_over_with_frame() {
        // Scenario: row_number() with PARTITION BY / ORDER BY / ROWS frame.
        let stmt = parse_one(
            "SELECT row_number() OVER (PARTITION BY x ORDER BY y \
             ROWS BETWEEN 1 PRECEDING AND CURRENT ROW) FROM t;",
        );
        let SelectCore::Select { columns, .. } = select_core(&stmt) else {
            unreachable!("expected Select core");
        };
        let ResultColumn::Expr {
            expr: Expr::FunctionCall {
                over: Some(over), ..
            },
            ..
        } = &columns[0]
        else {
            unreachable!("expected window function column");
        };
        assert_eq!(over.partition_by.len(), 1);
        assert_eq!(over.order_by.len(), 1);
        let frame = over.frame.as_ref().expect("frame spec");
        assert_eq!(frame.unit, FrameUnit::Rows);
        assert!(matches!(
            &frame.start,
            FrameBound::Preceding(e) if matches!(e.as_ref(), Expr::Literal(l, _) if *l == number("1"))
        ));
        assert!(matches!(frame.end, Some(FrameBound::CurrentRow)));
    }

    #[test]
    fn window_named_definition_and_reference() {
        let stmt = parse_one(
            "SELECT sum(x) OVER win FROM t WINDOW win AS (PARTITION BY y ORDER BY z)",
        );
        let SelectCore::Select {
            columns, windows, ..
        } = select_core(&stmt)
        else {
            unreachable!("expected Select core");
        };
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].name, "win");
        assert_eq!(windows[0].spec.partition_by.len(), 1);
        match &columns[0] {
            ResultColumn::Expr {
                expr: Expr::FunctionCall {
                    over: Some(over), ..
                },
                ..
            } => assert_eq!(over.base_window.as_deref(), Some("win")),
            other => unreachable!("expected windowed call, got {other:?}"),
        }
    }

    #[test]
    fn window_frame_units_and_exclude() {
        for (sql, unit) in [
            ("SELECT f() OVER (ROWS UNBOUNDED PRECEDING) FROM t", FrameUnit::Rows),
            ("SELECT f() OVER (RANGE CURRENT ROW) FROM t", FrameUnit::Range),
            ("SELECT f() OVER (GROUPS 2 PRECEDING) FROM t", FrameUnit::Groups),
        ] {
            let stmt = parse_one(sql);
            let SelectCore::Select { columns, .. } = select_core(&stmt) else {
                unreachable!();
            };
            let ResultColumn::Expr {
                expr: Expr::FunctionCall {
                    over: Some(over), ..
                },
                ..
            } = &columns[0]
            else {
                unreachable!("expected windowed call");
            };
            let frame = over.frame.as_ref().unwrap();
            assert_eq!(frame.unit, unit);
            // Single-bound form: end defaults to the current row.
            assert!(frame.end.is_none());
        }

        let stmt = parse_one(
            "SELECT f() OVER (ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING \
             EXCLUDE TIES) FROM t",
        );
        let SelectCore::Select { columns, .. } = select_core(&stmt) else {
            unreachable!();
        };
        if let ResultColumn::Expr {
            expr: Expr::FunctionCall {
                over: Some(over), ..
            },
            ..
        } = &columns[0]
        {
            assert_eq!(over.frame.as_ref().unwrap().exclude, Some(FrameExclude::Ties));
        }

        for (sql, exclude) in [
            ("EXCLUDE NO OTHERS", FrameExclude::NoOthers),
            ("EXCLUDE CURRENT ROW", FrameExclude::CurrentRow),
            ("EXCLUDE GROUP", FrameExclude::Group),
        ] {
            let full = format!("SELECT f() OVER (ROWS CURRENT ROW {sql}) FROM t");
            let stmt = parse_one(&full);
            let SelectCore::Select { columns, .. } = select_core(&stmt) else {
                unreachable!();
            };
            if let ResultColumn::Expr {
                expr: Expr::FunctionCall {
                    over: Some(over), ..
                },
                ..
            } = &columns[0]
            {
                assert_eq!(over.frame.as_ref().unwrap().exclude, Some(exclude));
            }
        }
    }

    #[test]
    fn window_frame_rejects_invalid_bounds() {
        let errs = parse_err("SELECT f() OVER (ROWS UNBOUNDED FOLLOWING) FROM t");
        assert!(errs[0].message.contains("UNBOUNDED FOLLOWING"));

        let errs = parse_err(
            "SELECT f() OVER (ROWS BETWEEN CURRENT ROW AND UNBOUNDED PRECEDING) FROM t",
        );
        assert!(errs[0].message.contains("UNBOUNDED PRECEDING"));
    }

    // -----------------------------------------------------------------------
    // INSERT
    // -----------------------------------------------------------------------

    #[test]
    fn insert_values() {
        let stmt = parse_one("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
        let Statement::Insert(ins) = &stmt else {
            unreachable!("expected Insert");
        };
        assert_eq!(ins.columns, vec!["a".to_owned(), "b".to_owned()]);
        assert!(matches!(&ins.source, InsertSource::Values(rows) if rows.len() == 2));
    }

    #[test]
    fn insert_select_and_default_values() {
        let stmt = parse_one("INSERT INTO t SELECT * FROM u");
        assert!(matches!(
            &stmt,
            Statement::Insert(ins) if matches!(ins.source, InsertSource::Select(_))
        ));
        let stmt = parse_one("INSERT INTO t DEFAULT VALUES");
        assert!(matches!(
            &stmt,
            Statement::Insert(ins) if matches!(ins.source, InsertSource::DefaultValues)
        ));
    }

    #[test]
    fn insert_or_action_and_replace() {
        let stmt = parse_one("INSERT OR IGNORE INTO t VALUES (1)");
        assert!(matches!(
            &stmt,
            Statement::Insert(ins) if ins.or_conflict == Some(ConflictAction::Ignore)
        ));
        let stmt = parse_one("REPLACE INTO t VALUES (1)");
        assert!(matches!(
            &stmt,
            Statement::Insert(ins) if ins.or_conflict == Some(ConflictAction::Replace)
        ));
    }

    #[test]
    fn insert_upsert_do_update_with_returning() {
        // Scenario: upsert with DO UPDATE plus RETURNING *.
        let stmt = parse_one(
            "INSERT INTO t(a,b) VALUES(1,2) ON CONFLICT(a) DO UPDATE SET b=excluded.b \
             WHERE excluded.b>t.b RETURNING *;",
        );
        let Statement::Insert(ins) = &stmt else {
            unreachable!("expected Insert");
        };
        assert_eq!(ins.upsert.len(), 1);
        let clause = &ins.upsert[0];
        let target = clause.target.as_ref().expect("conflict target");
        assert_eq!(target.columns.len(), 1);
        match &clause.action {
            UpsertAction::Update {
                assignments,
                where_clause,
            } => {
                assert_eq!(assignments.len(), 1);
                assert!(matches!(
                    &assignments[0].target,
                    AssignmentTarget::Column(c) if c == "b"
                ));
                assert!(where_clause.is_some());
            }
            UpsertAction::Nothing => unreachable!("expected DO UPDATE"),
        }
        assert_eq!(ins.returning.len(), 1);
        assert!(matches!(ins.returning[0], ResultColumn::Star(_)));
    }

    #[test]
    fn insert_upsert_do_nothing_chain() {
        let stmt = parse_one(
            "INSERT INTO t VALUES (1) \
             ON CONFLICT(a) WHERE a > 0 DO NOTHING ON CONFLICT DO NOTHING",
        );
        let Statement::Insert(ins) = &stmt else {
            unreachable!("expected Insert");
        };
        assert_eq!(ins.upsert.len(), 2);
        assert!(ins.upsert[0].target.as_ref().unwrap().where_clause.is_some());
        assert!(ins.upsert[1].target.is_none());
        assert!(matches!(ins.upsert[1].action, UpsertAction::Nothing));
    }

    #[test]
    fn insert_with_alias_and_cte() {
        let stmt = parse_one("WITH c AS (SELECT 1) INSERT INTO t AS tt SELECT * FROM c");
        let Statement::Insert(ins) = &stmt else {
            unreachable!("expected Insert");
        };
        assert!(ins.with.is_some());
        assert_eq!(ins.alias.as_deref(), Some("tt"));
    }

    // -----------------------------------------------------------------------
    // UPDATE / DELETE
    // -----------------------------------------------------------------------

    #[test]
    fn update_set_where() {
        let stmt = parse_one("UPDATE t SET a = 1, b = 2 WHERE id = 3");
        let Statement::Update(up) = &stmt else {
            unreachable!("expected Update");
        };
        assert_eq!(up.assignments.len(), 2);
        assert!(up.where_clause.is_some());
    }

    #[test]
    fn update_or_action_from_returning_order_limit() {
        let stmt = parse_one(
            "UPDATE OR ABORT t SET (a, b) = (1, 2) FROM u WHERE t.id = u.id \
             RETURNING a ORDER BY a LIMIT 1",
        );
        let Statement::Update(up) = &stmt else {
            unreachable!("expected Update");
        };
        assert_eq!(up.or_conflict, Some(ConflictAction::Abort));
        assert!(matches!(
            &up.assignments[0].target,
            AssignmentTarget::ColumnList(cols) if cols.len() == 2
        ));
        assert!(up.from.is_some());
        assert_eq!(up.returning.len(), 1);
        assert_eq!(up.order_by.len(), 1);
        assert!(up.limit.is_some());
    }

    #[test]
    fn update_indexed_by_table() {
        let stmt = parse_one("UPDATE t INDEXED BY idx SET a = 1");
        let Statement::Update(up) = &stmt else {
            unreachable!("expected Update");
        };
        assert!(matches!(
            up.table.index_hint,
            Some(IndexHint::IndexedBy(_))
        ));
    }

    #[test]
    fn delete_where_returning_order_limit() {
        let stmt = parse_one("DELETE FROM t WHERE id = 1 RETURNING * ORDER BY id LIMIT 2");
        let Statement::Delete(del) = &stmt else {
            unreachable!("expected Delete");
        };
        assert!(del.where_clause.is_some());
        assert_eq!(del.returning.len(), 1);
        assert_eq!(del.order_by.len(), 1);
        assert!(del.limit.is_some());
    }

    #[test]
    fn delete_with_cte() {
        let stmt = parse_one("WITH doomed AS (SELECT id FROM t) DELETE FROM t WHERE id IN (SELECT id FROM doomed)");
        assert!(matches!(&stmt, Statement::Delete(del) if del.with.is_some()));
    }

    // -----------------------------------------------------------------------
    // CREATE TABLE
    // -----------------------------------------------------------------------

    fn create_table(stmt: &Statement) -> &CreateTableStatement {
        match stmt {
            Statement::CreateTable(ct) => ct,
            other => unreachable!("expected CREATE TABLE, got {other:?}"),
        }
    }

    #[test]
    fn create_table_basic() {
        let stmt = parse_one("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)");
        let ct = create_table(&stmt);
        assert_eq!(ct.name.name, "t");
        let CreateTableBody::Columns { columns, .. } = &ct.body else {
            unreachable!("expected column body");
        };
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].type_name.as_ref().unwrap().name, "INTEGER");
        assert!(matches!(
            columns[0].constraints[0].kind,
            ColumnConstraintKind::PrimaryKey { .. }
        ));
        assert!(matches!(
            columns[1].constraints[0].kind,
            ColumnConstraintKind::NotNull { .. }
        ));
    }

    #[test]
    fn create_table_full_column_constraint_stack() {
        // The standard grammar accepts a sized type followed by several
        // constraints on one column.
        let stmt = parse_one(
            "CREATE TABLE t (col VARCHAR(10) PRIMARY KEY ASC ON CONFLICT ROLLBACK \
             AUTOINCREMENT NOT NULL ON CONFLICT FAIL DEFAULT 0)",
        );
        let ct = create_table(&stmt);
        let CreateTableBody::Columns { columns, .. } = &ct.body else {
            unreachable!("expected column body");
        };
        let col = &columns[0];
        let ty = col.type_name.as_ref().unwrap();
        assert_eq!(ty.name, "VARCHAR");
        assert_eq!(ty.arg1.as_deref(), Some("10"));
        assert_eq!(col.constraints.len(), 3);
        assert!(matches!(
            col.constraints[0].kind,
            ColumnConstraintKind::PrimaryKey {
                direction: Some(SortDirection::Asc),
                conflict: Some(ConflictAction::Rollback),
                autoincrement: true,
            }
        ));
        assert!(matches!(
            col.constraints[1].kind,
            ColumnConstraintKind::NotNull {
                conflict: Some(ConflictAction::Fail)
            }
        ));
        assert!(matches!(
            &col.constraints[2].kind,
            ColumnConstraintKind::Default(DefaultValue::Expr(Expr::Literal(l, _)))
                if *l == number("0")
        ));
    }

    #[test]
    fn create_table_default_forms() {
        let stmt = parse_one(
            "CREATE TABLE t (a TEXT DEFAULT 'x', b INT DEFAULT -1, c ANY DEFAULT NULL, \
             d TEXT DEFAULT CURRENT_TIMESTAMP, e INT DEFAULT (1 + 2))",
        );
        let CreateTableBody::Columns { columns, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        assert!(matches!(
            &columns[1].constraints[0].kind,
            ColumnConstraintKind::Default(DefaultValue::Expr(Expr::UnaryOp { .. }))
        ));
        assert!(matches!(
            &columns[3].constraints[0].kind,
            ColumnConstraintKind::Default(DefaultValue::Expr(Expr::Literal(
                Literal::CurrentTimestamp,
                _
            )))
        ));
        assert!(matches!(
            &columns[4].constraints[0].kind,
            ColumnConstraintKind::Default(DefaultValue::ParenExpr(Expr::BinaryOp { .. }))
        ));
    }

    #[test]
    fn create_table_default_rejects_bare_expression() {
        // Un-parenthesized DEFAULT admits literals and signed numbers only.
        parse_err("CREATE TABLE t (a INT DEFAULT 1 + 2)");
    }

    #[test]
    fn create_table_check_collate_named_constraint() {
        let stmt = parse_one(
            "CREATE TABLE t (a INT CONSTRAINT positive CHECK (a > 0), b TEXT COLLATE NOCASE)",
        );
        let CreateTableBody::Columns { columns, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        assert_eq!(columns[0].constraints[0].name.as_deref(), Some("positive"));
        assert!(matches!(
            columns[0].constraints[0].kind,
            ColumnConstraintKind::Check(_)
        ));
        assert!(matches!(
            &columns[1].constraints[0].kind,
            ColumnConstraintKind::Collate(c) if c == "NOCASE"
        ));
    }

    #[test]
    fn create_table_generated_columns() {
        let stmt = parse_one(
            "CREATE TABLE t (a INT, b INT GENERATED ALWAYS AS (a * 2) STORED, \
             c INT AS (a + 1) VIRTUAL, d INT AS (a))",
        );
        let CreateTableBody::Columns { columns, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        assert!(matches!(
            columns[1].constraints[0].kind,
            ColumnConstraintKind::Generated {
                storage: Some(GeneratedStorage::Stored),
                ..
            }
        ));
        assert!(matches!(
            columns[2].constraints[0].kind,
            ColumnConstraintKind::Generated {
                storage: Some(GeneratedStorage::Virtual),
                ..
            }
        ));
        assert!(matches!(
            columns[3].constraints[0].kind,
            ColumnConstraintKind::Generated { storage: None, .. }
        ));
    }

    #[test]
    fn create_table_foreign_key_column_constraint() {
        let stmt = parse_one(
            "CREATE TABLE t (uid INTEGER REFERENCES users(id) ON DELETE CASCADE \
             ON UPDATE SET NULL MATCH simple NOT DEFERRABLE INITIALLY DEFERRED)",
        );
        let CreateTableBody::Columns { columns, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        let ColumnConstraintKind::ForeignKey(fk) = &columns[0].constraints[0].kind else {
            unreachable!("expected foreign key");
        };
        assert_eq!(fk.table, "users");
        assert_eq!(fk.columns, vec!["id".to_owned()]);
        assert_eq!(fk.actions.len(), 2);
        assert_eq!(fk.actions[0].trigger, ForeignKeyTrigger::OnDelete);
        assert_eq!(fk.actions[0].action, ForeignKeyActionType::Cascade);
        assert_eq!(fk.actions[1].action, ForeignKeyActionType::SetNull);
        assert_eq!(
            fk.deferrable,
            Some(Deferrable {
                not: true,
                initially: Some(DeferrableInitially::Deferred)
            })
        );
    }

    #[test]
    fn create_table_table_constraints() {
        let stmt = parse_one(
            "CREATE TABLE t (a INT, b INT, \
             CONSTRAINT pk PRIMARY KEY (a, b DESC) ON CONFLICT IGNORE, \
             UNIQUE (b), CHECK (a < b), \
             FOREIGN KEY (a, b) REFERENCES u(x, y) ON DELETE NO ACTION)",
        );
        let CreateTableBody::Columns { constraints, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        assert_eq!(constraints.len(), 4);
        assert_eq!(constraints[0].name.as_deref(), Some("pk"));
        assert!(matches!(
            &constraints[0].kind,
            TableConstraintKind::PrimaryKey {
                columns,
                conflict: Some(ConflictAction::Ignore)
            } if columns.len() == 2
        ));
        assert!(matches!(
            &constraints[1].kind,
            TableConstraintKind::Unique { .. }
        ));
        assert!(matches!(&constraints[2].kind, TableConstraintKind::Check(_)));
        let TableConstraintKind::ForeignKey { columns, clause } = &constraints[3].kind else {
            unreachable!("expected foreign key");
        };
        assert_eq!(columns.len(), 2);
        assert_eq!(clause.actions[0].action, ForeignKeyActionType::NoAction);
    }

    #[test]
    fn create_table_options_and_modifiers() {
        let stmt = parse_one("CREATE TEMP TABLE IF NOT EXISTS s.t (a INT) WITHOUT ROWID, STRICT");
        let ct = create_table(&stmt);
        assert!(ct.temporary);
        assert!(ct.if_not_exists);
        assert_eq!(ct.name.schema.as_deref(), Some("s"));
        assert!(ct.without_rowid);
        assert!(ct.strict);
    }

    #[test]
    fn create_table_as_select() {
        let stmt = parse_one("CREATE TABLE t AS SELECT a, b FROM u WHERE a > 0");
        assert!(matches!(
            &create_table(&stmt).body,
            CreateTableBody::AsSelect(_)
        ));
    }

    #[test]
    fn create_table_keyword_column_names() {
        // Non-reserved keywords work as column names without quoting.
        let stmt = parse_one("CREATE TABLE t (key TEXT, action TEXT, \"select\" TEXT)");
        let CreateTableBody::Columns { columns, .. } = &create_table(&stmt).body else {
            unreachable!("expected column body");
        };
        assert_eq!(columns[0].name, "key");
        assert_eq!(columns[1].name, "action");
        assert_eq!(columns[2].name, "select");
    }

    // -----------------------------------------------------------------------
    // CREATE INDEX / VIEW / TRIGGER / VIRTUAL TABLE
    // -----------------------------------------------------------------------

    #[test]
    fn create_index_unique_partial() {
        let stmt = parse_one(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx ON t (a COLLATE NOCASE DESC, b + 1) \
             WHERE a IS NOT NULL",
        );
        let Statement::CreateIndex(ci) = &stmt else {
            unreachable!("expected CreateIndex");
        };
        assert!(ci.unique);
        assert!(ci.if_not_exists);
        assert_eq!(ci.table, "t");
        assert_eq!(ci.columns.len(), 2);
        assert_eq!(ci.columns[0].collation.as_deref(), Some("NOCASE"));
        assert_eq!(ci.columns[0].direction, Some(SortDirection::Desc));
        assert!(matches!(ci.columns[1].expr, Expr::BinaryOp { .. }));
        assert!(ci.where_clause.is_some());
    }

    #[test]
    fn create_view_with_columns() {
        let stmt = parse_one("CREATE TEMP VIEW IF NOT EXISTS v (a, b) AS SELECT 1, 2");
        let Statement::CreateView(cv) = &stmt else {
            unreachable!("expected CreateView");
        };
        assert!(cv.temporary);
        assert!(cv.if_not_exists);
        assert_eq!(cv.columns, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn create_trigger_before_insert() {
        let stmt = parse_one(
            "CREATE TRIGGER tr BEFORE INSERT ON t FOR EACH ROW WHEN NEW.a > 0 BEGIN \
             INSERT INTO log VALUES (NEW.a); END",
        );
        let Statement::CreateTrigger(tr) = &stmt else {
            unreachable!("expected CreateTrigger");
        };
        assert_eq!(tr.timing, TriggerTiming::Before);
        assert_eq!(tr.event, TriggerEvent::Insert);
        assert_eq!(tr.table, "t");
        assert!(tr.for_each_row);
        assert!(tr.when.is_some());
        assert_eq!(tr.body.len(), 1);
        assert!(matches!(tr.body[0], Statement::Insert(_)));
    }

    #[test]
    fn create_trigger_after_update_of_multi_statement_body() {
        let stmt = parse_one(
            "CREATE TRIGGER tr AFTER UPDATE OF a, b ON t BEGIN \
             UPDATE u SET x = 1; DELETE FROM v WHERE id = OLD.id; SELECT 1; END",
        );
        let Statement::CreateTrigger(tr) = &stmt else {
            unreachable!("expected CreateTrigger");
        };
        assert_eq!(tr.timing, TriggerTiming::After);
        assert_eq!(
            tr.event,
            TriggerEvent::Update(vec!["a".to_owned(), "b".to_owned()])
        );
        assert_eq!(tr.body.len(), 3);
    }

    #[test]
    fn create_trigger_instead_of_with_raise() {
        let stmt = parse_one(
            "CREATE TRIGGER tr INSTEAD OF DELETE ON v BEGIN \
             SELECT RAISE(ABORT, 'no deletes'); END",
        );
        let Statement::CreateTrigger(tr) = &stmt else {
            unreachable!("expected CreateTrigger");
        };
        assert_eq!(tr.timing, TriggerTiming::InsteadOf);
        assert_eq!(tr.event, TriggerEvent::Delete);
    }

    #[test]
    fn create_trigger_body_rejects_ddl() {
        let errs = parse_err("CREATE TRIGGER tr AFTER DELETE ON t BEGIN DROP TABLE u; END");
        assert!(errs[0].message.contains("trigger body"));
    }

    #[test]
    fn create_virtual_table_args() {
        let stmt = parse_one(
            "CREATE VIRTUAL TABLE docs USING fts5(title, body, tokenize = 'porter')",
        );
        let Statement::CreateVirtualTable(vt) = &stmt else {
            unreachable!("expected CreateVirtualTable");
        };
        assert_eq!(vt.module, "fts5");
        assert_eq!(vt.args.len(), 3);
        assert_eq!(vt.args[0], "title");
        assert_eq!(vt.args[2], "tokenize = 'porter'");
    }

    #[test]
    fn create_virtual_table_no_args_and_empty_args() {
        let stmt = parse_one("CREATE VIRTUAL TABLE vt USING module");
        assert!(matches!(
            &stmt,
            Statement::CreateVirtualTable(vt) if vt.args.is_empty()
        ));
        let stmt = parse_one("CREATE VIRTUAL TABLE IF NOT EXISTS vt USING module()");
        assert!(matches!(
            &stmt,
            Statement::CreateVirtualTable(vt) if vt.args.is_empty() && vt.if_not_exists
        ));
    }

    // -----------------------------------------------------------------------
    // ALTER / DROP
    // -----------------------------------------------------------------------

    #[test]
    fn alter_table_actions() {
        let stmt = parse_one("ALTER TABLE t RENAME TO u");
        assert!(matches!(
            &stmt,
            Statement::AlterTable(a) if matches!(&a.action, AlterTableAction::RenameTo(n) if n == "u")
        ));
        let stmt = parse_one("ALTER TABLE t RENAME COLUMN a TO b");
        assert!(matches!(
            &stmt,
            Statement::AlterTable(a)
                if matches!(&a.action, AlterTableAction::RenameColumn { old, new } if old == "a" && new == "b")
        ));
        let stmt = parse_one("ALTER TABLE t RENAME a TO b");
        assert!(matches!(
            &stmt,
            Statement::AlterTable(a) if matches!(&a.action, AlterTableAction::RenameColumn { .. })
        ));
        let stmt = parse_one("ALTER TABLE s.t ADD COLUMN c TEXT DEFAULT 'x'");
        assert!(matches!(
            &stmt,
            Statement::AlterTable(a) if matches!(&a.action, AlterTableAction::AddColumn(_))
        ));
        let stmt = parse_one("ALTER TABLE t DROP COLUMN c");
        assert!(matches!(
            &stmt,
            Statement::AlterTable(a) if matches!(&a.action, AlterTableAction::DropColumn(c) if c == "c")
        ));
    }

    #[test]
    fn alter_table_add_rejects_stored_generated() {
        let errs =
            parse_err("ALTER TABLE t ADD COLUMN c INT GENERATED ALWAYS AS (a * 2) STORED");
        assert!(errs[0].message.contains("STORED"));
        // VIRTUAL generated columns are fine.
        parse_one("ALTER TABLE t ADD COLUMN c INT GENERATED ALWAYS AS (a * 2) VIRTUAL");
    }

    #[test]
    fn drop_statements() {
        for (sql, ty) in [
            ("DROP TABLE t", DropObjectType::Table),
            ("DROP VIEW IF EXISTS v", DropObjectType::View),
            ("DROP INDEX s.i", DropObjectType::Index),
            ("DROP TRIGGER tr", DropObjectType::Trigger),
        ] {
            let stmt = parse_one(sql);
            let Statement::Drop(d) = &stmt else {
                unreachable!("expected Drop");
            };
            assert_eq!(d.object_type, ty);
        }
        let stmt = parse_one("DROP VIEW IF EXISTS v");
        assert!(matches!(&stmt, Statement::Drop(d) if d.if_exists));
    }

    // -----------------------------------------------------------------------
    // Transactions & database management
    // -----------------------------------------------------------------------

    #[test]
    fn transaction_statements() {
        assert!(matches!(
            parse_one("BEGIN"),
            Statement::Begin(BeginStatement { mode: None, .. })
        ));
        assert!(matches!(
            parse_one("BEGIN EXCLUSIVE TRANSACTION"),
            Statement::Begin(BeginStatement {
                mode: Some(TransactionMode::Exclusive),
                ..
            })
        ));
        assert!(matches!(
            parse_one("BEGIN DEFERRED"),
            Statement::Begin(BeginStatement {
                mode: Some(TransactionMode::Deferred),
                ..
            })
        ));
        assert!(matches!(
            parse_one("BEGIN IMMEDIATE"),
            Statement::Begin(BeginStatement {
                mode: Some(TransactionMode::Immediate),
                ..
            })
        ));
        assert!(matches!(parse_one("COMMIT"), Statement::Commit(_)));
        assert!(matches!(parse_one("END TRANSACTION"), Statement::Commit(_)));
        assert!(matches!(
            parse_one("ROLLBACK"),
            Statement::Rollback(RollbackStatement {
                to_savepoint: None,
                ..
            })
        ));
        let stmt = parse_one("ROLLBACK TRANSACTION TO SAVEPOINT sp");
        assert!(matches!(
            &stmt,
            Statement::Rollback(r) if r.to_savepoint.as_deref() == Some("sp")
        ));
        assert!(matches!(
            parse_one("SAVEPOINT sp"),
            Statement::Savepoint { .. }
        ));
        let stmt = parse_one("RELEASE SAVEPOINT sp");
        assert!(matches!(&stmt, Statement::Release { name, .. } if name == "sp"));
    }

    #[test]
    fn attach_detach() {
        let stmt = parse_one("ATTACH DATABASE 'file.db' AS aux");
        let Statement::Attach(at) = &stmt else {
            unreachable!("expected Attach");
        };
        assert_eq!(at.schema, "aux");
        assert!(matches!(
            &at.expr,
            Expr::Literal(Literal::String(s), _) if s == "file.db"
        ));
        parse_one("ATTACH 'other.db' AS other");
        let stmt = parse_one("DETACH DATABASE aux");
        assert!(matches!(&stmt, Statement::Detach { name, .. } if name == "aux"));
        parse_one("DETACH aux");
    }

    #[test]
    fn analyze_reindex_vacuum() {
        assert!(matches!(
            parse_one("ANALYZE"),
            Statement::Analyze { target: None, .. }
        ));
        let stmt = parse_one("ANALYZE main.t");
        assert!(matches!(
            &stmt,
            Statement::Analyze { target: Some(n), .. } if n.schema.as_deref() == Some("main")
        ));
        assert!(matches!(
            parse_one("REINDEX"),
            Statement::Reindex { target: None, .. }
        ));
        assert!(matches!(
            parse_one("REINDEX t"),
            Statement::Reindex { target: Some(_), .. }
        ));

        assert!(matches!(
            parse_one("VACUUM"),
            Statement::Vacuum(VacuumStatement {
                schema: None,
                into: None,
                ..
            })
        ));
        let stmt = parse_one("VACUUM main INTO 'backup.db'");
        let Statement::Vacuum(v) = &stmt else {
            unreachable!("expected Vacuum");
        };
        assert_eq!(v.schema.as_deref(), Some("main"));
        assert!(v.into.is_some());
    }

    #[test]
    fn explain_wraps_any_statement() {
        let stmt = parse_one("EXPLAIN SELECT 1");
        let Statement::Explain {
            query_plan, stmt, ..
        } = &stmt
        else {
            unreachable!("expected Explain");
        };
        assert!(!query_plan);
        assert!(matches!(stmt.as_ref(), Statement::Select(_)));

        let stmt = parse_one("EXPLAIN QUERY PLAN DELETE FROM t");
        assert!(matches!(
            &stmt,
            Statement::Explain {
                query_plan: true,
                ..
            }
        ));
    }

    #[test]
    fn pragma_forms() {
        let stmt = parse_one("PRAGMA cache_size");
        assert!(matches!(
            &stmt,
            Statement::Pragma(p) if p.value.is_none() && p.name.name == "cache_size"
        ));

        let stmt = parse_one("PRAGMA main.user_version = 5");
        let Statement::Pragma(p) = &stmt else {
            unreachable!("expected Pragma");
        };
        assert_eq!(p.name.schema.as_deref(), Some("main"));
        assert!(matches!(&p.value, Some(PragmaValue::Assign(_))));

        let stmt = parse_one("PRAGMA table_info(users)");
        assert!(matches!(
            &stmt,
            Statement::Pragma(p) if matches!(&p.value, Some(PragmaValue::Call(_)))
        ));

        let stmt = parse_one("PRAGMA cache_size = -2000");
        assert!(matches!(
            &stmt,
            Statement::Pragma(p)
                if matches!(&p.value, Some(PragmaValue::Assign(Expr::UnaryOp { .. })))
        ));
    }

    #[test]
    fn pragma_keyword_values() {
        // ON reads as TRUE; other bare keywords become plain names.
        let stmt = parse_one("PRAGMA foreign_keys = ON");
        let Statement::Pragma(p) = &stmt else {
            unreachable!("expected Pragma");
        };
        assert!(matches!(
            &p.value,
            Some(PragmaValue::Assign(Expr::Literal(Literal::Boolean(true), _)))
        ));

        let stmt = parse_one("PRAGMA journal_mode = DELETE");
        let Statement::Pragma(p) = &stmt else {
            unreachable!("expected Pragma");
        };
        assert!(matches!(
            &p.value,
            Some(PragmaValue::Assign(Expr::Column(c, _))) if c.column == "delete"
        ));
    }

    // -----------------------------------------------------------------------
    // Error recovery & boundaries
    // -----------------------------------------------------------------------

    #[test]
    fn empty_input_yields_nothing() {
        let mut p = Parser::from_sql("");
        let (stmts, errs) = p.parse_all();
        assert!(stmts.is_empty());
        assert!(errs.is_empty());
    }

    #[test]
    fn comments_only_yield_nothing() {
        let mut p = Parser::from_sql("-- just a comment\n/* and a block */\n;;");
        let (stmts, errs) = p.parse_all();
        assert!(stmts.is_empty());
        assert!(errs.is_empty());
    }

    #[test]
    fn unterminated_string_is_one_lex_error() {
        let mut p = Parser::from_sql("'oops");
        let (stmts, errs) = p.parse_all();
        assert!(stmts.is_empty());
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("unterminated string"));
    }

    #[test]
    fn invalid_first_statement_still_parses_second() {
        // Scenario: SELEC typo, then a valid statement.
        let mut p = Parser::from_sql("SELEC * FROM t; SELECT 1;");
        let (stmts, errs) = p.parse_all();
        assert_eq!(stmts.len(), 1);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].span.start, 0);
        if let SelectCore::Select { columns, .. } = select_core(&stmts[0]) {
            assert!(matches!(
                &columns[0],
                ResultColumn::Expr { expr: Expr::Literal(l, _), .. } if *l == number("1")
            ));
        }
    }

    #[test]
    fn recovery_skips_to_statement_keyword_without_semicolon() {
        let mut p = Parser::from_sql("CREATE TABLE ( busted SELECT 2;");
        let (stmts, errs) = p.parse_all();
        // The paren-aware skip must not stop inside the open paren group; it
        // reaches the `;` and nothing parses, or recovers at a boundary.
        assert_eq!(stmts.len(), 0);
        assert_eq!(errs.len(), 1);

        let mut p = Parser::from_sql("DROP; SELECT 1");
        let (stmts, errs) = p.parse_all();
        assert_eq!(stmts.len(), 1);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn recovery_ignores_semicolon_inside_parens() {
        // The failure happens at the open paren; the skip counts the group
        // and must not resync on the semicolon inside it.
        let mut p = Parser::from_sql("INSERT INTO (SELECT 1; SELECT 2) x; SELECT 3;");
        let (stmts, errs) = p.parse_all();
        assert_eq!(errs.len(), 1);
        assert_eq!(stmts.len(), 1);
        if let SelectCore::Select { columns, .. } = select_core(&stmts[0]) {
            assert!(matches!(
                &columns[0],
                ResultColumn::Expr { expr: Expr::Literal(l, _), .. } if *l == number("3")
            ));
        }
    }

    #[test]
    fn recovery_makes_progress_on_garbage() {
        let mut p = Parser::from_sql("%%% ((( &&& SELECT 1");
        let (stmts, errs) = p.parse_all();
        assert!(!errs.is_empty());
        // No hang, and the trailing statement is unreachable inside the
        // unbalanced parens, so nothing more is required than termination.
        let _ = stmts;
    }

    #[test]
    fn multiple_errors_collected() {
        let mut p = Parser::from_sql("SELEC 1; FROB 2; SELECT 3;");
        let (stmts, errs) = p.parse_all();
        assert_eq!(stmts.len(), 1);
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn extra_semicolons_are_fine() {
        let mut p = Parser::from_sql(";;SELECT 1;;;SELECT 2;;");
        let (stmts, errs) = p.parse_all();
        assert_eq!(stmts.len(), 2);
        assert!(errs.is_empty());
    }

    #[test]
    fn missing_from_table_reports_eof() {
        let errs = parse_err("SELECT * FROM");
        assert!(errs[0].message.contains("identifier"));
    }

    // -----------------------------------------------------------------------
    // Determinism, spans, case-insensitivity
    // -----------------------------------------------------------------------

    #[test]
    fn parse_is_deterministic() {
        let sql = "WITH c AS (SELECT 1) SELECT * FROM c WHERE x BETWEEN 1 AND 2; \
                   INSERT INTO t VALUES (1) ON CONFLICT DO NOTHING; BOGUS;";
        let first = crate::parse(sql);
        let second = crate::parse(sql);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1.len(), second.1.len());
    }

    #[test]
    fn keyword_case_flip_produces_equal_ast() {
        let lower = parse_ok("select a from t where a between 1 and 2 order by a desc");
        let upper = parse_ok("SELECT a FROM t WHERE a BETWEEN 1 AND 2 ORDER BY a DESC");
        let mixed = parse_ok("SeLeCt a FrOm t WhErE a BeTwEeN 1 AnD 2 oRdEr By a DeSc");
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn statement_spans_cover_source() {
        let sql = "SELECT 1; UPDATE t SET a = 2;";
        let stmts = parse_ok(sql);
        assert_eq!(stmts[0].span().start, 0);
        assert_eq!(stmts[0].span().end, 8);
        assert_eq!(stmts[1].span().start, 10);
        assert_eq!(stmts[1].span().end, u32::try_from(sql.len()).unwrap() - 1);
        for s in &stmts {
            assert!(s.span().start <= s.span().end);
            assert_eq!(s.span().line, 1);
        }
    }

    #[test]
    fn clause_spans_nest_within_statement() {
        let sql = "SELECT a FROM t WHERE a > 1 ORDER BY a LIMIT 3";
        let stmt = parse_one(sql);
        let Statement::Select(s) = &stmt else {
            unreachable!("expected Select");
        };
        let outer = s.span;
        assert!(outer.contains(s.body.select.span()));
        if let SelectCore::Select {
            from: Some(from),
            where_clause: Some(wh),
            ..
        } = &s.body.select
        {
            assert!(outer.contains(from.span));
            assert!(outer.contains(wh.span()));
            assert!(from.span.contains(from.source.span()));
        }
        assert!(outer.contains(s.order_by[0].span));
        assert!(outer.contains(s.limit.as_ref().unwrap().span));
    }

    #[test]
    fn explain_span_contains_inner_statement() {
        let stmt = parse_one("EXPLAIN QUERY PLAN SELECT 1");
        let Statement::Explain { stmt: inner, span, .. } = &stmt else {
            unreachable!("expected Explain");
        };
        assert!(span.contains(inner.span()));
        assert_eq!(span.start, 0);
    }

    #[test]
    fn metrics_count_statements() {
        reset_parse_metrics();
        let before = parse_metrics_snapshot().squeal_parse_statements_total;
        parse_ok("SELECT 1; SELECT 2; SELECT 3");
        let after = parse_metrics_snapshot().squeal_parse_statements_total;
        assert!(after >= before + 3);
    }

    // -----------------------------------------------------------------------
    // Property tests
    // -----------------------------------------------------------------------

    mod proptest_properties {
        use super::*;
        use proptest::prelude::*;

        use crate::lexer::Lexer;

        fn is_keyword(s: &str) -> bool {
            TokenKind::lookup_keyword(s).is_some()
        }

        /// A random identifier that is neither a keyword nor a boolean
        /// literal spelling.
        fn arb_ident() -> BoxedStrategy<String> {
            prop::string::string_regex("[a-z][a-z0-9]{0,5}")
                .expect("valid regex")
                .prop_filter("must not be keyword", |s| {
                    !is_keyword(s) && s != "true" && s != "false"
                })
                .boxed()
        }

        fn arb_literal() -> BoxedStrategy<String> {
            prop_oneof![
                any::<i32>().prop_map(|n| n.to_string()),
                (1i32..1000).prop_map(|n| format!("{n}.{}", n % 100)),
                arb_ident().prop_map(|s| format!("'{s}'")),
                Just("NULL".to_string()),
                Just("TRUE".to_string()),
                Just("FALSE".to_string()),
            ]
            .boxed()
        }

        fn arb_expr(depth: u32) -> BoxedStrategy<String> {
            if depth == 0 {
                prop_oneof![
                    arb_literal(),
                    arb_ident(),
                    (arb_ident(), arb_ident()).prop_map(|(t, c)| format!("{t}.{c}")),
                ]
                .boxed()
            } else {
                let leaf = arb_expr(0);
                prop_oneof![
                    4 => leaf,
                    2 => (arb_expr(depth - 1), prop_oneof![
                        Just("+"), Just("-"), Just("*"), Just("/"),
                        Just("="), Just("!="), Just("<"), Just("<="),
                        Just(">"), Just(">="), Just("AND"), Just("OR"),
                        Just("||"),
                    ], arb_expr(depth - 1))
                        .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
                    1 => arb_expr(depth - 1).prop_map(|e| format!("(-{e})")),
                    1 => arb_expr(depth - 1).prop_map(|e| format!("(NOT {e})")),
                    1 => arb_expr(depth - 1).prop_map(|e| format!("{e} IS NULL")),
                    1 => (arb_expr(depth - 1), arb_expr(0), arb_expr(0))
                        .prop_map(|(e, lo, hi)| format!("{e} BETWEEN {lo} AND {hi}")),
                    1 => (arb_expr(depth - 1), proptest::collection::vec(arb_expr(0), 1..4))
                        .prop_map(|(e, items)| format!("{e} IN ({})", items.join(", "))),
                    1 => (arb_expr(depth - 1), arb_ident())
                        .prop_map(|(e, p)| format!("{e} LIKE '{p}'")),
                    1 => arb_expr(depth - 1).prop_map(|e| format!("CAST({e} AS TEXT)")),
                    1 => (arb_expr(depth - 1), arb_expr(0), arb_expr(0))
                        .prop_map(|(c, t, el)| format!("CASE WHEN {c} THEN {t} ELSE {el} END")),
                    1 => (arb_ident(), proptest::collection::vec(arb_expr(0), 0..3))
                        .prop_map(|(name, args)| format!("{name}({})", args.join(", "))),
                    1 => arb_expr(0).prop_map(|e| format!("(SELECT {e})")),
                ]
                .boxed()
            }
        }

        fn arb_select() -> BoxedStrategy<String> {
            use std::fmt::Write as _;

            let cols =
                proptest::collection::vec(arb_expr(1), 1..4).prop_map(|cols| cols.join(", "));
            let table = arb_ident();
            let where_clause = prop::option::of(arb_expr(1));
            let order_by = prop::option::of(arb_ident());
            let limit = prop::option::of(1u32..100);

            (cols, table, where_clause, order_by, limit)
                .prop_map(|(cols, tbl, wh, ord, lim)| {
                    let mut sql = format!("SELECT {cols} FROM {tbl}");
                    if let Some(w) = wh {
                        write!(sql, " WHERE {w}").expect("write to String");
                    }
                    if let Some(o) = ord {
                        write!(sql, " ORDER BY {o}").expect("write to String");
                    }
                    if let Some(l) = lim {
                        write!(sql, " LIMIT {l}").expect("write to String");
                    }
                    sql
                })
                .boxed()
        }

        fn arb_insert() -> BoxedStrategy<String> {
            (1usize..4)
                .prop_flat_map(|n| {
                    let tbl = arb_ident();
                    let cols = proptest::collection::vec(arb_ident(), n..=n);
                    let vals = proptest::collection::vec(arb_literal(), n..=n);
                    (tbl, cols, vals).prop_map(
                        |(t, cs, vs): (String, Vec<String>, Vec<String>)| {
                            format!(
                                "INSERT INTO {t} ({}) VALUES ({})",
                                cs.join(", "),
                                vs.join(", ")
                            )
                        },
                    )
                })
                .boxed()
        }

        fn arb_statement() -> BoxedStrategy<String> {
            prop_oneof![
                6 => arb_select(),
                3 => arb_insert(),
                1 => arb_expr(2).prop_map(|e| format!("SELECT {e}")),
                1 => (arb_ident(), arb_expr(1))
                    .prop_map(|(t, w)| format!("DELETE FROM {t} WHERE {w}")),
                1 => (arb_ident(), arb_ident(), arb_literal(), arb_expr(1))
                    .prop_map(|(t, c, v, w)| format!("UPDATE {t} SET {c} = {v} WHERE {w}")),
            ]
            .boxed()
        }

        /// Walk an expression tree checking that child spans nest inside
        /// their parents and that BETWEEN bounds carry no top-level AND.
        fn check_expr_invariants(e: &Expr) {
            let span = e.span();
            let mut children: Vec<&Expr> = Vec::new();
            match e {
                Expr::Literal(..) | Expr::Column(..) | Expr::Placeholder(..) => {}
                Expr::BinaryOp { left, right, .. } => {
                    children.push(left);
                    children.push(right);
                }
                Expr::UnaryOp { expr, .. } | Expr::Collate { expr, .. } => children.push(expr),
                Expr::Between {
                    expr, low, high, ..
                } => {
                    assert!(
                        !matches!(
                            low.as_ref(),
                            Expr::BinaryOp {
                                op: BinaryOp::And,
                                ..
                            }
                        ),
                        "BETWEEN low bound holds a top-level AND"
                    );
                    assert!(
                        !matches!(
                            high.as_ref(),
                            Expr::BinaryOp {
                                op: BinaryOp::And,
                                ..
                            }
                        ),
                        "BETWEEN high bound holds a top-level AND"
                    );
                    children.push(expr);
                    children.push(low);
                    children.push(high);
                }
                Expr::In { expr, set, .. } => {
                    children.push(expr);
                    if let InSet::List(items) = set {
                        children.extend(items.iter());
                    }
                }
                Expr::Like {
                    expr,
                    pattern,
                    escape,
                    ..
                } => {
                    children.push(expr);
                    children.push(pattern);
                    if let Some(esc) = escape {
                        children.push(esc);
                    }
                }
                Expr::Case {
                    operand,
                    whens,
                    else_expr,
                    ..
                } => {
                    if let Some(op) = operand {
                        children.push(op);
                    }
                    for (w, t) in whens {
                        children.push(w);
                        children.push(t);
                    }
                    if let Some(el) = else_expr {
                        children.push(el);
                    }
                }
                Expr::Cast { expr, .. } | Expr::IsNull { expr, .. } => children.push(expr),
                Expr::JsonAccess { expr, path, .. } => {
                    children.push(expr);
                    children.push(path);
                }
                Expr::RowValue(items, _) => children.extend(items.iter()),
                Expr::FunctionCall { args, filter, .. } => {
                    if let squeal_ast::FunctionArgs::List(items) = args {
                        children.extend(items.iter());
                    }
                    if let Some(f) = filter {
                        children.push(f);
                    }
                }
                Expr::Exists { .. } | Expr::Subquery(..) | Expr::Raise { .. } => {}
            }
            for child in children {
                assert!(
                    span.contains(child.span()),
                    "child span {:?} escapes parent {:?}",
                    child.span(),
                    span
                );
                check_expr_invariants(child);
            }
        }

        proptest::proptest! {
            #![proptest_config(proptest::prelude::ProptestConfig::with_cases(512))]

            #[test]
            fn generated_statements_parse_cleanly(sql in arb_statement()) {
                let mut p = Parser::from_sql(&sql);
                let (stmts, errs) = p.parse_all();
                prop_assert!(errs.is_empty(), "errors for `{sql}`: {errs:?}");
                prop_assert_eq!(stmts.len(), 1);
            }

            #[test]
            fn parse_is_deterministic_on_arbitrary_statements(sql in arb_statement()) {
                let (a, ea) = crate::parse(&sql);
                let (b, eb) = crate::parse(&sql);
                prop_assert_eq!(a, b);
                prop_assert_eq!(ea.len(), eb.len());
            }

            #[test]
            fn expression_spans_nest_and_between_bounds_are_clean(sql in arb_expr(3)) {
                if let Ok(expr) = crate::expr::parse_expr(&sql) {
                    check_expr_invariants(&expr);
                }
            }

            #[test]
            fn tokenize_spans_are_ordered_and_tight(sql in arb_statement()) {
                let tokens = Lexer::tokenize(&sql);
                prop_assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
                let mut last_end = 0u32;
                for tok in &tokens {
                    prop_assert!(tok.span.start >= last_end, "overlapping spans in `{sql}`");
                    prop_assert!(tok.span.end as usize <= sql.len());
                    if tok.kind != TokenKind::Eof {
                        let slice = &sql[tok.span.start as usize..tok.span.end as usize];
                        prop_assert!(!slice.is_empty());
                        prop_assert!(!slice.starts_with(char::is_whitespace));
                        prop_assert!(!slice.ends_with(char::is_whitespace));
                    }
                    last_end = tok.span.end;
                }
            }

            #[test]
            fn parser_never_hangs_on_mangled_input(sql in arb_statement(), cut in 0usize..40) {
                // Truncating mid-statement must still terminate with a
                // diagnostic, never loop or panic.
                let cut = cut.min(sql.len());
                let mangled = &sql[..cut];
                let _ = crate::parse(mangled);
            }
        }
    }
}
