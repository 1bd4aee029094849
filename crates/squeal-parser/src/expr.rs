// Expression parsing.
//
// Pratt precedence climbing over the token stream. The binding-power table
// mirrors SQLite's operator precedence, lowest to highest:
//
//   OR
//   AND
//   NOT (prefix)
//   = == != <> IS [NOT] [DISTINCT FROM] IN LIKE GLOB MATCH REGEXP
//     BETWEEN ISNULL NOTNULL
//   < <= > >=
//   & | << >> (bitwise)
//   + - (binary)
//   * / %
//   || -> ->> (concat / extract)
//   COLLATE (postfix)
//   ~ - + (unary prefix)
//
// All binary operators are left-associative. Negated forms (NOT IN, NOT
// LIKE, NOT BETWEEN, ...) become a flag on the node, not a unary NOT.

use squeal_ast::{
    BinaryOp, ColumnRef, Expr, FunctionArgs, InSet, JsonArrow, LikeOp, Literal, PlaceholderType,
    RaiseAction, SelectStatement, Span, TypeName, UnaryOp, WindowSpec,
};

use crate::parser::{is_nonreserved_kw, kw_to_str, ParseError, Parser};
use crate::token::TokenKind;

// Binding powers: higher = tighter binding.
// Left BP is checked against min_bp; right BP is passed to the recursive call.
mod bp {
    // Infix: (left, right)
    pub const OR: (u8, u8) = (1, 2);
    pub const AND: (u8, u8) = (3, 4);
    // Prefix NOT right BP:
    pub const NOT_PREFIX: u8 = 5;
    // Equality / pattern / membership:
    pub const EQUALITY: (u8, u8) = (7, 8);
    // Relational comparison:
    pub const COMPARISON: (u8, u8) = (9, 10);
    // Bitwise operators (all share one level):
    pub const BITWISE: (u8, u8) = (13, 14);
    // Addition / subtraction:
    pub const ADD: (u8, u8) = (15, 16);
    // Multiplication / division / modulo:
    pub const MUL: (u8, u8) = (17, 18);
    // String concatenation and JSON extraction:
    pub const CONCAT: (u8, u8) = (19, 20);
    // COLLATE (postfix left BP):
    pub const COLLATE: u8 = 21;
    // Unary prefix (- + ~) right BP:
    pub const UNARY: u8 = 23;
}

impl Parser {
    /// Parse a single SQL expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    // ── Pratt core ──────────────────────────────────────────────────────

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        // Every nesting level (parens, unary chains, operand recursion)
        // passes through here, so this is where stack depth is bounded.
        self.with_recursion_guard(|parser| parser.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Postfix: COLLATE, ISNULL, NOTNULL
            if let Some(l_bp) = self.postfix_bp() {
                if l_bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            // Infix: binary operators, IS, LIKE, BETWEEN, IN, etc.
            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }
                lhs = self.parse_infix(lhs, r_bp)?;
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    // ── Prefix (nud) ────────────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance_token();
        match &tok.kind {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Number(text) => {
                Ok(Expr::Literal(Literal::Number(text.clone()), tok.span))
            }
            TokenKind::String(s) => Ok(Expr::Literal(Literal::String(s.clone()), tok.span)),
            TokenKind::Blob(b) => Ok(Expr::Literal(Literal::Blob(b.clone()), tok.span)),
            TokenKind::KwNull => Ok(Expr::Literal(Literal::Null, tok.span)),
            TokenKind::KwCurrentTime => Ok(Expr::Literal(Literal::CurrentTime, tok.span)),
            TokenKind::KwCurrentDate => Ok(Expr::Literal(Literal::CurrentDate, tok.span)),
            TokenKind::KwCurrentTimestamp => {
                Ok(Expr::Literal(Literal::CurrentTimestamp, tok.span))
            }

            // ── Bind parameters ─────────────────────────────────────────
            TokenKind::Question => Ok(Expr::Placeholder(PlaceholderType::Anonymous, tok.span)),
            TokenKind::QuestionNum(n) => {
                Ok(Expr::Placeholder(PlaceholderType::Numbered(*n), tok.span))
            }
            TokenKind::ColonParam(s) => Ok(Expr::Placeholder(
                PlaceholderType::ColonNamed(s.clone()),
                tok.span,
            )),
            TokenKind::AtParam(s) => Ok(Expr::Placeholder(
                PlaceholderType::AtNamed(s.clone()),
                tok.span,
            )),
            TokenKind::DollarParam(s) => Ok(Expr::Placeholder(
                PlaceholderType::DollarNamed(s.clone()),
                tok.span,
            )),

            // ── Unary prefix: - + ~ ─────────────────────────────────────
            TokenKind::Minus => self.parse_unary(UnaryOp::Negate, tok.span),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus, tok.span),
            TokenKind::Tilde => self.parse_unary(UnaryOp::BitNot, tok.span),

            // ── Prefix NOT ──────────────────────────────────────────────
            TokenKind::KwNot => {
                // NOT EXISTS (subquery)
                if self.check_kw(&TokenKind::KwExists) {
                    self.advance();
                    self.expect_token(&TokenKind::LeftParen)?;
                    let subquery = self.parse_subquery_body()?;
                    let end = self.expect_token(&TokenKind::RightParen)?;
                    let span = tok.span.merge(end);
                    return Ok(Expr::Exists {
                        subquery: Box::new(subquery),
                        not: true,
                        span,
                    });
                }
                let inner = self.parse_expr_bp(bp::NOT_PREFIX)?;
                let span = tok.span.merge(inner.span());
                Ok(Expr::UnaryOp {
                    op: UnaryOp::Not,
                    expr: Box::new(inner),
                    span,
                })
            }

            // ── EXISTS (subquery) ───────────────────────────────────────
            TokenKind::KwExists => {
                self.expect_token(&TokenKind::LeftParen)?;
                let subquery = self.parse_subquery_body()?;
                let end = self.expect_token(&TokenKind::RightParen)?;
                let span = tok.span.merge(end);
                Ok(Expr::Exists {
                    subquery: Box::new(subquery),
                    not: false,
                    span,
                })
            }

            // ── CAST(expr AS type_name) ─────────────────────────────────
            TokenKind::KwCast => {
                self.expect_token(&TokenKind::LeftParen)?;
                let inner = self.parse_expr()?;
                self.expect_kw(&TokenKind::KwAs)?;
                let type_name = self.parse_type_name()?;
                let end = self.expect_token(&TokenKind::RightParen)?;
                let span = tok.span.merge(end);
                Ok(Expr::Cast {
                    expr: Box::new(inner),
                    type_name,
                    span,
                })
            }

            // ── CASE [operand] WHEN ... THEN ... [ELSE ...] END ────────
            TokenKind::KwCase => self.parse_case_expr(tok.span),

            // ── RAISE(action, message) ──────────────────────────────────
            TokenKind::KwRaise => {
                self.expect_token(&TokenKind::LeftParen)?;
                let (action, message) = self.parse_raise_args()?;
                let end = self.expect_token(&TokenKind::RightParen)?;
                let span = tok.span.merge(end);
                Ok(Expr::Raise {
                    action,
                    message,
                    span,
                })
            }

            // ── Parenthesized expr / subquery / row-value ───────────────
            TokenKind::LeftParen => {
                if matches!(
                    self.peek(),
                    TokenKind::KwSelect | TokenKind::KwValues | TokenKind::KwWith
                ) {
                    let subquery = self.parse_subquery_body()?;
                    let end = self.expect_token(&TokenKind::RightParen)?;
                    let span = tok.span.merge(end);
                    return Ok(Expr::Subquery(Box::new(subquery), span));
                }
                let first = self.parse_expr()?;
                if self.eat(&TokenKind::Comma) {
                    let mut exprs = vec![first];
                    loop {
                        exprs.push(self.parse_expr()?);
                        if !self.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                    let end = self.expect_token(&TokenKind::RightParen)?;
                    let span = tok.span.merge(end);
                    Ok(Expr::RowValue(exprs, span))
                } else {
                    self.expect_token(&TokenKind::RightParen)?;
                    Ok(first)
                }
            }

            // ── Identifier: literal keyword, column ref, or call ────────
            TokenKind::Id(name) => {
                // TRUE/FALSE are not reserved words; unquoted spellings act
                // as boolean literals unless they name a function or table.
                if !matches!(self.peek(), TokenKind::LeftParen | TokenKind::Dot) {
                    if name.eq_ignore_ascii_case("true") {
                        return Ok(Expr::Literal(Literal::Boolean(true), tok.span));
                    }
                    if name.eq_ignore_ascii_case("false") {
                        return Ok(Expr::Literal(Literal::Boolean(false), tok.span));
                    }
                }
                let name = name.clone();
                self.parse_ident_expr(name, tok.span)
            }
            TokenKind::QuotedId(name) => {
                let name = name.clone();
                self.parse_ident_expr(name, tok.span)
            }

            // ── Keywords usable as function names ───────────────────────
            TokenKind::KwReplace if self.check(&TokenKind::LeftParen) => {
                self.parse_function_call("replace".to_owned(), tok.span)
            }

            // ── Non-reserved keywords in identifier position ────────────
            k if is_nonreserved_kw(k) => {
                let name = kw_to_str(k);
                self.parse_ident_expr(name, tok.span)
            }

            TokenKind::Error(msg) => Err(ParseError::at(msg.clone(), Some(&tok))),

            _ => Err(ParseError::at(
                format!("unexpected token in expression: {:?}", tok.kind),
                Some(&tok),
            )),
        }
    }

    /// A complete subquery after an opening paren: optional WITH prefix,
    /// then SELECT or VALUES.
    fn parse_subquery_body(&mut self) -> Result<SelectStatement, ParseError> {
        let with = if self.check_kw(&TokenKind::KwWith) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        self.parse_select_stmt(with)
    }

    fn parse_unary(&mut self, op: UnaryOp, start: Span) -> Result<Expr, ParseError> {
        let inner = self.parse_expr_bp(bp::UNARY)?;
        let span = start.merge(inner.span());
        Ok(Expr::UnaryOp {
            op,
            expr: Box::new(inner),
            span,
        })
    }

    /// Parse `name`, `name(args)`, `name.column`, or `schema.table.column`.
    fn parse_ident_expr(&mut self, first: String, start: Span) -> Result<Expr, ParseError> {
        // Function call: name(...)
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(first, start);
        }
        if !self.eat(&TokenKind::Dot) {
            return Ok(Expr::Column(ColumnRef::bare(first), start));
        }
        let (second, second_span) = self.parse_column_part()?;
        if second != "*" && self.eat(&TokenKind::Dot) {
            let (third, third_span) = self.parse_column_part()?;
            let span = start.merge(third_span);
            return Ok(Expr::Column(
                ColumnRef::schema_qualified(first, second, third),
                span,
            ));
        }
        let span = start.merge(second_span);
        Ok(Expr::Column(ColumnRef::qualified(first, second), span))
    }

    /// One component after a `.` in a column reference. Accepts `*` so that
    /// `t.*` survives expression positions where it is meaningful.
    fn parse_column_part(&mut self) -> Result<(String, Span), ParseError> {
        let tok = self.advance_token();
        match &tok.kind {
            TokenKind::Id(s) | TokenKind::QuotedId(s) => Ok((s.clone(), tok.span)),
            TokenKind::Star => Ok(("*".to_owned(), tok.span)),
            k if is_nonreserved_kw(k) => Ok((kw_to_str(k), tok.span)),
            _ => Err(ParseError::at(
                format!("expected column name after '.', got {:?}", tok.kind),
                Some(&tok),
            )),
        }
    }

    // ── Postfix ─────────────────────────────────────────────────────────

    fn postfix_bp(&self) -> Option<u8> {
        match self.peek() {
            TokenKind::KwCollate => Some(bp::COLLATE),
            TokenKind::KwIsnull | TokenKind::KwNotnull => Some(bp::EQUALITY.0),
            _ => None,
        }
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let tok = self.advance_token();
        match &tok.kind {
            TokenKind::KwCollate => {
                let collation = self.parse_identifier()?;
                let span = lhs.span().merge(self.prev_span());
                Ok(Expr::Collate {
                    expr: Box::new(lhs),
                    collation,
                    span,
                })
            }
            TokenKind::KwIsnull => {
                let span = lhs.span().merge(tok.span);
                Ok(Expr::IsNull {
                    expr: Box::new(lhs),
                    not: false,
                    span,
                })
            }
            TokenKind::KwNotnull => {
                let span = lhs.span().merge(tok.span);
                Ok(Expr::IsNull {
                    expr: Box::new(lhs),
                    not: true,
                    span,
                })
            }
            other => Err(ParseError::at(
                format!("unexpected postfix token: {other:?}"),
                Some(&tok),
            )),
        }
    }

    // ── Infix ───────────────────────────────────────────────────────────

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.peek() {
            TokenKind::KwOr => Some(bp::OR),
            TokenKind::KwAnd => Some(bp::AND),

            TokenKind::Eq
            | TokenKind::EqEq
            | TokenKind::Ne
            | TokenKind::LtGt
            | TokenKind::KwIs
            | TokenKind::KwLike
            | TokenKind::KwGlob
            | TokenKind::KwMatch
            | TokenKind::KwRegexp
            | TokenKind::KwBetween
            | TokenKind::KwIn => Some(bp::EQUALITY),

            // NOT LIKE / NOT GLOB / NOT MATCH / NOT REGEXP / NOT BETWEEN / NOT IN
            TokenKind::KwNot => match self.peek_nth(1) {
                TokenKind::KwLike
                | TokenKind::KwGlob
                | TokenKind::KwMatch
                | TokenKind::KwRegexp
                | TokenKind::KwBetween
                | TokenKind::KwIn => Some(bp::EQUALITY),
                _ => None,
            },

            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => Some(bp::COMPARISON),

            TokenKind::Ampersand
            | TokenKind::Pipe
            | TokenKind::ShiftLeft
            | TokenKind::ShiftRight => Some(bp::BITWISE),

            TokenKind::Plus | TokenKind::Minus => Some(bp::ADD),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(bp::MUL),
            TokenKind::Concat | TokenKind::Arrow | TokenKind::DoubleArrow => Some(bp::CONCAT),

            _ => None,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn parse_infix(&mut self, lhs: Expr, r_bp: u8) -> Result<Expr, ParseError> {
        let tok = self.advance_token();
        match &tok.kind {
            // ── Simple binary operators ──────────────────────────────────
            TokenKind::Plus => self.make_binop(lhs, BinaryOp::Add, r_bp),
            TokenKind::Minus => self.make_binop(lhs, BinaryOp::Subtract, r_bp),
            TokenKind::Star => self.make_binop(lhs, BinaryOp::Multiply, r_bp),
            TokenKind::Slash => self.make_binop(lhs, BinaryOp::Divide, r_bp),
            TokenKind::Percent => self.make_binop(lhs, BinaryOp::Modulo, r_bp),
            TokenKind::Concat => self.make_binop(lhs, BinaryOp::Concat, r_bp),
            TokenKind::Eq | TokenKind::EqEq => self.make_binop(lhs, BinaryOp::Eq, r_bp),
            TokenKind::Ne | TokenKind::LtGt => self.make_binop(lhs, BinaryOp::Ne, r_bp),
            TokenKind::Lt => self.make_binop(lhs, BinaryOp::Lt, r_bp),
            TokenKind::Le => self.make_binop(lhs, BinaryOp::Le, r_bp),
            TokenKind::Gt => self.make_binop(lhs, BinaryOp::Gt, r_bp),
            TokenKind::Ge => self.make_binop(lhs, BinaryOp::Ge, r_bp),
            TokenKind::Ampersand => self.make_binop(lhs, BinaryOp::BitAnd, r_bp),
            TokenKind::Pipe => self.make_binop(lhs, BinaryOp::BitOr, r_bp),
            TokenKind::ShiftLeft => self.make_binop(lhs, BinaryOp::ShiftLeft, r_bp),
            TokenKind::ShiftRight => self.make_binop(lhs, BinaryOp::ShiftRight, r_bp),
            TokenKind::KwOr => self.make_binop(lhs, BinaryOp::Or, r_bp),
            TokenKind::KwAnd => self.make_binop(lhs, BinaryOp::And, r_bp),

            // ── IS [NOT] [DISTINCT FROM] [NULL | expr] ──────────────────
            TokenKind::KwIs => {
                let not = self.eat_kw(&TokenKind::KwNot);
                if self.eat_kw(&TokenKind::KwDistinct) {
                    self.expect_kw(&TokenKind::KwFrom)?;
                    let rhs = self.parse_expr_bp(r_bp)?;
                    let span = lhs.span().merge(rhs.span());
                    let op = if not {
                        BinaryOp::IsNotDistinctFrom
                    } else {
                        BinaryOp::IsDistinctFrom
                    };
                    return Ok(Expr::BinaryOp {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(rhs),
                        span,
                    });
                }
                if self.check_kw(&TokenKind::KwNull) {
                    let end = self.advance_token().span;
                    let span = lhs.span().merge(end);
                    return Ok(Expr::IsNull {
                        expr: Box::new(lhs),
                        not,
                        span,
                    });
                }
                let rhs = self.parse_expr_bp(r_bp)?;
                let span = lhs.span().merge(rhs.span());
                let op = if not { BinaryOp::IsNot } else { BinaryOp::Is };
                Ok(Expr::BinaryOp {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(rhs),
                    span,
                })
            }

            // ── LIKE / GLOB / MATCH / REGEXP ────────────────────────────
            TokenKind::KwLike => self.parse_like(lhs, LikeOp::Like, false),
            TokenKind::KwGlob => self.parse_like(lhs, LikeOp::Glob, false),
            TokenKind::KwMatch => self.parse_like(lhs, LikeOp::Match, false),
            TokenKind::KwRegexp => self.parse_like(lhs, LikeOp::Regexp, false),

            // ── BETWEEN ─────────────────────────────────────────────────
            TokenKind::KwBetween => self.parse_between(lhs, false),

            // ── IN ──────────────────────────────────────────────────────
            TokenKind::KwIn => self.parse_in(lhs, false),

            // ── JSON -> / ->> ───────────────────────────────────────────
            TokenKind::Arrow => self.make_json(lhs, JsonArrow::Arrow, r_bp),
            TokenKind::DoubleArrow => self.make_json(lhs, JsonArrow::DoubleArrow, r_bp),

            // ── NOT LIKE / GLOB / MATCH / REGEXP / BETWEEN / IN ─────────
            TokenKind::KwNot => {
                let next = self.advance_token();
                match &next.kind {
                    TokenKind::KwLike => self.parse_like(lhs, LikeOp::Like, true),
                    TokenKind::KwGlob => self.parse_like(lhs, LikeOp::Glob, true),
                    TokenKind::KwMatch => self.parse_like(lhs, LikeOp::Match, true),
                    TokenKind::KwRegexp => self.parse_like(lhs, LikeOp::Regexp, true),
                    TokenKind::KwBetween => self.parse_between(lhs, true),
                    TokenKind::KwIn => self.parse_in(lhs, true),
                    _ => Err(ParseError::at(
                        format!(
                            "expected LIKE, GLOB, MATCH, REGEXP, BETWEEN, or IN after NOT, \
                             got {:?}",
                            next.kind
                        ),
                        Some(&next),
                    )),
                }
            }

            other => Err(ParseError::at(
                format!("unexpected infix token: {other:?}"),
                Some(&tok),
            )),
        }
    }

    fn make_binop(&mut self, lhs: Expr, op: BinaryOp, r_bp: u8) -> Result<Expr, ParseError> {
        let rhs = self.parse_expr_bp(r_bp)?;
        let span = lhs.span().merge(rhs.span());
        Ok(Expr::BinaryOp {
            left: Box::new(lhs),
            op,
            right: Box::new(rhs),
            span,
        })
    }

    fn make_json(&mut self, lhs: Expr, arrow: JsonArrow, r_bp: u8) -> Result<Expr, ParseError> {
        let rhs = self.parse_expr_bp(r_bp)?;
        let span = lhs.span().merge(rhs.span());
        Ok(Expr::JsonAccess {
            expr: Box::new(lhs),
            path: Box::new(rhs),
            arrow,
            span,
        })
    }

    // ── Special expression forms ────────────────────────────────────────

    fn parse_like(&mut self, lhs: Expr, op: LikeOp, not: bool) -> Result<Expr, ParseError> {
        let pattern = self.parse_expr_bp(bp::EQUALITY.1)?;
        let escape = if self.eat_kw(&TokenKind::KwEscape) {
            Some(Box::new(self.parse_expr_bp(bp::EQUALITY.1)?))
        } else {
            None
        };
        let end = escape.as_ref().map_or_else(|| pattern.span(), |e| e.span());
        let span = lhs.span().merge(end);
        Ok(Expr::Like {
            expr: Box::new(lhs),
            pattern: Box::new(pattern),
            escape,
            op,
            not,
            span,
        })
    }

    /// `lhs [NOT] BETWEEN low AND high`. The bounds parse at comparison
    /// level and above so the separating AND is never consumed by a bound;
    /// neither bound can contain a top-level AND.
    fn parse_between(&mut self, lhs: Expr, not: bool) -> Result<Expr, ParseError> {
        let low = self.parse_expr_bp(bp::COMPARISON.0)?;
        if !self.eat_kw(&TokenKind::KwAnd) {
            return Err(self.err_msg("expected AND in BETWEEN expression"));
        }
        let high = self.parse_expr_bp(bp::COMPARISON.0)?;
        let span = lhs.span().merge(high.span());
        Ok(Expr::Between {
            expr: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            not,
            span,
        })
    }

    fn parse_in(&mut self, lhs: Expr, not: bool) -> Result<Expr, ParseError> {
        let start = lhs.span();

        // `IN table` shorthand.
        if !self.check(&TokenKind::LeftParen) {
            let name = self.parse_qualified_name()?;
            let span = start.merge(self.prev_span());
            return Ok(Expr::In {
                expr: Box::new(lhs),
                set: InSet::Table(name),
                not,
                span,
            });
        }

        self.advance(); // (
        if matches!(
            self.peek(),
            TokenKind::KwSelect | TokenKind::KwValues | TokenKind::KwWith
        ) {
            let subquery = self.parse_subquery_body()?;
            let end = self.expect_token(&TokenKind::RightParen)?;
            let span = start.merge(end);
            return Ok(Expr::In {
                expr: Box::new(lhs),
                set: InSet::Subquery(Box::new(subquery)),
                not,
                span,
            });
        }

        // Value list; may be empty.
        let mut exprs = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            exprs.push(self.parse_expr()?);
            while self.eat(&TokenKind::Comma) {
                exprs.push(self.parse_expr()?);
            }
        }
        let end = self.expect_token(&TokenKind::RightParen)?;
        let span = start.merge(end);
        Ok(Expr::In {
            expr: Box::new(lhs),
            set: InSet::List(exprs),
            not,
            span,
        })
    }

    fn parse_case_expr(&mut self, start: Span) -> Result<Expr, ParseError> {
        let operand = if self.check_kw(&TokenKind::KwWhen) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut whens = Vec::new();
        while self.eat_kw(&TokenKind::KwWhen) {
            let condition = self.parse_expr()?;
            self.expect_kw(&TokenKind::KwThen)?;
            let result = self.parse_expr()?;
            whens.push((condition, result));
        }
        if whens.is_empty() {
            return Err(self.err_msg("CASE requires at least one WHEN clause"));
        }

        let else_expr = if self.eat_kw(&TokenKind::KwElse) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        let end = self.expect_kw(&TokenKind::KwEnd)?;
        let span = start.merge(end);
        Ok(Expr::Case {
            operand,
            whens,
            else_expr,
            span,
        })
    }

    fn parse_function_call(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        self.expect_token(&TokenKind::LeftParen)?;

        let (args, distinct) = if self.check(&TokenKind::Star) {
            self.advance();
            (FunctionArgs::Star, false)
        } else {
            let distinct = self.eat_kw(&TokenKind::KwDistinct);
            let args = if self.check(&TokenKind::RightParen) {
                FunctionArgs::List(Vec::new())
            } else {
                let mut list = vec![self.parse_expr()?];
                while self.eat(&TokenKind::Comma) {
                    list.push(self.parse_expr()?);
                }
                FunctionArgs::List(list)
            };
            (args, distinct)
        };

        let mut end = self.expect_token(&TokenKind::RightParen)?;
        let filter = if self.eat_kw(&TokenKind::KwFilter) {
            self.expect_token(&TokenKind::LeftParen)?;
            self.expect_kw(&TokenKind::KwWhere)?;
            let predicate = self.parse_expr()?;
            let filter_end = self.expect_token(&TokenKind::RightParen)?;
            end = end.merge(filter_end);
            Some(Box::new(predicate))
        } else {
            None
        };
        let over = if self.eat_kw(&TokenKind::KwOver) {
            if self.eat(&TokenKind::LeftParen) {
                let spec = self.parse_window_spec()?;
                let over_end = self.expect_token(&TokenKind::RightParen)?;
                end = end.merge(over_end);
                Some(spec)
            } else {
                let name_start = self.current_span();
                let base_window = self.parse_identifier()?;
                end = end.merge(self.prev_span());
                Some(WindowSpec {
                    base_window: Some(base_window),
                    partition_by: Vec::new(),
                    order_by: Vec::new(),
                    frame: None,
                    span: name_start.merge(self.prev_span()),
                })
            }
        } else {
            None
        };

        // DISTINCT aggregates cannot be windowed.
        if distinct && over.is_some() {
            return Err(self.err_msg(format!(
                "DISTINCT is not supported for window function {name}"
            )));
        }

        let span = start.merge(end);
        Ok(Expr::FunctionCall {
            name,
            args,
            distinct,
            filter,
            over,
            span,
        })
    }

    fn parse_raise_args(&mut self) -> Result<(RaiseAction, Option<String>), ParseError> {
        let action_tok = self.advance_token();
        let action = match &action_tok.kind {
            TokenKind::KwIgnore => RaiseAction::Ignore,
            TokenKind::KwRollback => RaiseAction::Rollback,
            TokenKind::KwAbort => RaiseAction::Abort,
            TokenKind::KwFail => RaiseAction::Fail,
            _ => {
                return Err(ParseError::at(
                    "expected IGNORE, ROLLBACK, ABORT, or FAIL in RAISE",
                    Some(&action_tok),
                ));
            }
        };
        if matches!(action, RaiseAction::Ignore) {
            return Ok((action, None));
        }
        self.expect_token(&TokenKind::Comma)?;
        let msg_tok = self.advance_token();
        let message = match &msg_tok.kind {
            TokenKind::String(s) => s.clone(),
            _ => {
                return Err(ParseError::at(
                    "expected string message in RAISE",
                    Some(&msg_tok),
                ));
            }
        };
        Ok((action, Some(message)))
    }

    /// Type name inside CAST: one or more identifier words, optionally
    /// followed by one or two size arguments.
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let start = self.current_span();
        let mut words = Vec::new();
        while matches!(self.peek(), TokenKind::Id(_) | TokenKind::QuotedId(_))
            || is_nonreserved_kw(self.peek())
        {
            words.push(self.parse_identifier()?);
        }
        if words.is_empty() {
            return Err(self.err_msg("expected type name"));
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

        Ok(TypeName {
            name,
            arg1,
            arg2,
            span: start.merge(self.prev_span()),
        })
    }
}

/// Parse a single expression from raw SQL text.
pub fn parse_expr(sql: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::from_sql(sql);
    let expr = parser.parse_expr()?;
    if !matches!(parser.peek(), TokenKind::Eof | TokenKind::Semicolon) {
        return Err(parser.err_msg(format!(
            "unexpected token after expression: {:?}",
            parser.peek()
        )));
    }
    Ok(expr)
}
