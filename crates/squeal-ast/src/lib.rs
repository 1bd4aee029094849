//! SQL Abstract Syntax Tree node types for squeal.
//!
//! This crate defines the complete AST type hierarchy for the SQLite SQL
//! dialect. Every SQL statement parsed by `squeal-parser` produces a tree of
//! these nodes. Every node carries a [`Span`] pointing back at the source
//! text it was parsed from.
//!
//! The tree is immutable and fully owned: nodes own their children, there is
//! no sharing and there are no cycles. Name resolution, typing, and planning
//! are deliberately out of scope.

use std::fmt;

// ---------------------------------------------------------------------------
// Span — source location tracking
// ---------------------------------------------------------------------------

/// A byte-offset range into the original SQL source text, together with the
/// 1-based line and column of its first byte.
///
/// Every token and every AST node carries a `Span` so that error messages
/// and debugging tools can point back to the exact source location. Child
/// spans always nest inside their parents' spans.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character (inclusive).
    pub start: u32,
    /// Byte offset one past the last character (exclusive).
    pub end: u32,
    /// Line number of `start` (1-based).
    pub line: u32,
    /// Column number of `start` (1-based).
    pub column: u32,
}

impl Span {
    /// Create a new span from start (inclusive) to end (exclusive) byte
    /// offsets, located at the given 1-based line and column.
    #[must_use]
    pub const fn new(start: u32, end: u32, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// A zero-length span at position 0, used as a placeholder.
    pub const ZERO: Self = Self {
        start: 0,
        end: 0,
        line: 1,
        column: 1,
    };

    /// Merge two spans into one that covers both. The line/column of the
    /// earlier start wins.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let (start, line, column) = if self.start <= other.start {
            (self.start, self.line, self.column)
        } else {
            (other.start, other.line, other.column)
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Top-level statement
// ---------------------------------------------------------------------------

/// A single parsed SQL statement.
///
/// This is the top-level AST node. The parser produces one `Statement` per
/// semicolon-delimited SQL command.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    // DML
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),

    // DDL
    CreateTable(CreateTableStatement),
    CreateIndex(CreateIndexStatement),
    CreateView(CreateViewStatement),
    CreateTrigger(CreateTriggerStatement),
    CreateVirtualTable(CreateVirtualTableStatement),
    Drop(DropStatement),
    AlterTable(AlterTableStatement),

    // Transaction control
    Begin(BeginStatement),
    Commit(Span),
    Rollback(RollbackStatement),
    Savepoint { name: String, span: Span },
    Release { name: String, span: Span },

    // Database operations
    Attach(AttachStatement),
    Detach { name: String, span: Span },
    Pragma(PragmaStatement),
    Vacuum(VacuumStatement),

    // Meta / utility
    Reindex { target: Option<QualifiedName>, span: Span },
    Analyze { target: Option<QualifiedName>, span: Span },
    Explain { query_plan: bool, stmt: Box<Self>, span: Span },
}

impl Statement {
    /// Return the span of this statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span,
            Self::Insert(s) => s.span,
            Self::Update(s) => s.span,
            Self::Delete(s) => s.span,
            Self::CreateTable(s) => s.span,
            Self::CreateIndex(s) => s.span,
            Self::CreateView(s) => s.span,
            Self::CreateTrigger(s) => s.span,
            Self::CreateVirtualTable(s) => s.span,
            Self::Drop(s) => s.span,
            Self::AlterTable(s) => s.span,
            Self::Begin(s) => s.span,
            Self::Rollback(s) => s.span,
            Self::Attach(s) => s.span,
            Self::Pragma(s) => s.span,
            Self::Vacuum(s) => s.span,
            Self::Commit(span)
            | Self::Savepoint { span, .. }
            | Self::Release { span, .. }
            | Self::Detach { span, .. }
            | Self::Reindex { span, .. }
            | Self::Analyze { span, .. }
            | Self::Explain { span, .. } => *span,
        }
    }
}

// ---------------------------------------------------------------------------
// Qualified names
// ---------------------------------------------------------------------------

/// A possibly-schema-qualified name like `main.users` or just `users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Optional schema name (e.g. `main`, `temp`).
    pub schema: Option<String>,
    /// The object name.
    pub name: String,
}

impl QualifiedName {
    /// Create an unqualified name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Create a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref s) = self.schema {
            write!(f, "{s}.{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

// ---------------------------------------------------------------------------
// Type name
// ---------------------------------------------------------------------------

/// A column type name as written in DDL (e.g. `VARCHAR(255)`, `INTEGER`).
///
/// SQLite does not enforce column types strictly; they only determine
/// affinity. The size arguments are kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// The type name words joined (e.g. `"UNSIGNED BIG INT"`).
    pub name: String,
    /// Optional first size parameter (e.g. `255` in `VARCHAR(255)`).
    pub arg1: Option<String>,
    /// Optional second size parameter (e.g. `2` in `DECIMAL(10,2)`).
    pub arg2: Option<String>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// A literal value in SQL source.
///
/// Numeric literals keep their verbatim source text; converting them to
/// machine numbers is a consumer's concern, not the parser's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, verbatim (`42`, `3.14`, `1e10`, `0xFF`, `.5`).
    Number(String),
    /// String literal (single-quoted), escapes resolved.
    String(String),
    /// Blob literal (`X'CAFE'`), hex-decoded.
    Blob(Vec<u8>),
    /// The keyword `NULL`.
    Null,
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// The keyword `CURRENT_TIME`.
    CurrentTime,
    /// The keyword `CURRENT_DATE`.
    CurrentDate,
    /// The keyword `CURRENT_TIMESTAMP`.
    CurrentTimestamp,
}

// ---------------------------------------------------------------------------
// Column references
// ---------------------------------------------------------------------------

/// A reference to a column with up to two qualifiers:
/// `column`, `table.column`, or `schema.table.column`.
///
/// Invariant: `schema` is only present when `table` is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Optional schema qualifier (only with a table qualifier).
    pub schema: Option<String>,
    /// Optional table (or alias) qualifier.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Create an unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: None,
            column: column.into(),
        }
    }

    /// Create a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: Some(table.into()),
            column: column.into(),
        }
    }

    /// Create a fully qualified `schema.table.column` reference.
    #[must_use]
    pub fn schema_qualified(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema: Some(schema.into()),
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // String
    Concat,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    IsDistinctFrom,
    IsNotDistinctFrom,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Concat => "||",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::IsDistinctFrom => "IS DISTINCT FROM",
            Self::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
            Self::And => "AND",
            Self::Or => "OR",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
        })
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Unary minus (`-expr`).
    Negate,
    /// Unary plus (`+expr`).
    Plus,
    /// Bitwise NOT (`~expr`).
    BitNot,
    /// Logical NOT (`NOT expr`).
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::Not => "NOT",
        })
    }
}

/// LIKE-family operator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeOp {
    Like,
    Glob,
    Match,
    Regexp,
}

/// JSON access arrow types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonArrow {
    /// `->` extracts as JSON.
    Arrow,
    /// `->>` extracts as text.
    DoubleArrow,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// An expression node in the AST.
///
/// Every variant carries a [`Span`]. Negated operator forms (`NOT IN`,
/// `NOT LIKE`, `NOT BETWEEN`) are encoded as a `not` flag on the node, not
/// as a wrapping unary NOT.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal(Literal, Span),

    /// A column reference (possibly qualified).
    Column(ColumnRef, Span),

    /// A binary operation: `left op right`.
    BinaryOp {
        left: Box<Self>,
        op: BinaryOp,
        right: Box<Self>,
        span: Span,
    },

    /// A unary operation: `op expr`.
    UnaryOp {
        op: UnaryOp,
        expr: Box<Self>,
        span: Span,
    },

    /// `expr [NOT] BETWEEN low AND high`.
    ///
    /// `low` and `high` never contain a top-level `AND`.
    Between {
        expr: Box<Self>,
        low: Box<Self>,
        high: Box<Self>,
        not: bool,
        span: Span,
    },

    /// `expr [NOT] IN (...)`.
    In {
        expr: Box<Self>,
        set: InSet,
        not: bool,
        span: Span,
    },

    /// `expr [NOT] LIKE/GLOB/MATCH/REGEXP pattern [ESCAPE escape]`.
    Like {
        expr: Box<Self>,
        pattern: Box<Self>,
        escape: Option<Box<Self>>,
        op: LikeOp,
        not: bool,
        span: Span,
    },

    /// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    Case {
        operand: Option<Box<Self>>,
        whens: Vec<(Self, Self)>,
        else_expr: Option<Box<Self>>,
        span: Span,
    },

    /// `CAST(expr AS type_name)`.
    Cast {
        expr: Box<Self>,
        type_name: TypeName,
        span: Span,
    },

    /// `[NOT] EXISTS (subquery)`.
    Exists {
        subquery: Box<SelectStatement>,
        not: bool,
        span: Span,
    },

    /// A scalar subquery: `(SELECT ...)`.
    Subquery(Box<SelectStatement>, Span),

    /// A function call, optionally with DISTINCT, FILTER, and a window.
    ///
    /// A call carrying a window never also carries `distinct`.
    FunctionCall {
        name: String,
        args: FunctionArgs,
        distinct: bool,
        filter: Option<Box<Self>>,
        over: Option<WindowSpec>,
        span: Span,
    },

    /// `expr COLLATE collation_name`.
    Collate {
        expr: Box<Self>,
        collation: String,
        span: Span,
    },

    /// `expr IS [NOT] NULL` / `expr ISNULL` / `expr NOTNULL`.
    IsNull {
        expr: Box<Self>,
        not: bool,
        span: Span,
    },

    /// `RAISE(action, message)` — meaningful inside trigger bodies.
    Raise {
        action: RaiseAction,
        message: Option<String>,
        span: Span,
    },

    /// `expr -> path` or `expr ->> path` (JSON access).
    JsonAccess {
        expr: Box<Self>,
        path: Box<Self>,
        arrow: JsonArrow,
        span: Span,
    },

    /// A row value `(a, b, c)` for multi-column comparisons.
    RowValue(Vec<Self>, Span),

    /// A bind parameter (`?`, `?NNN`, `:name`, `@name`, `$name`).
    Placeholder(PlaceholderType, Span),
}

impl Expr {
    /// Return the span of this expression node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, s)
            | Self::Column(_, s)
            | Self::Subquery(_, s)
            | Self::RowValue(_, s)
            | Self::Placeholder(_, s) => *s,
            Self::BinaryOp { span, .. }
            | Self::UnaryOp { span, .. }
            | Self::Between { span, .. }
            | Self::In { span, .. }
            | Self::Like { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::Exists { span, .. }
            | Self::FunctionCall { span, .. }
            | Self::Collate { span, .. }
            | Self::IsNull { span, .. }
            | Self::Raise { span, .. }
            | Self::JsonAccess { span, .. } => *span,
        }
    }
}

/// The set of values for an IN expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    /// `IN (expr, expr, ...)` — may be empty.
    List(Vec<Expr>),
    /// `IN (SELECT ...)`
    Subquery(Box<SelectStatement>),
    /// `IN table_name` — shorthand for `IN (SELECT * FROM table_name)`.
    Table(QualifiedName),
}

/// Function argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArgs {
    /// `func(*)` — used for `COUNT(*)`.
    Star,
    /// `func(arg1, arg2, ...)` or `func()`.
    List(Vec<Expr>),
}

/// Bind parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    /// `?` — anonymous positional.
    Anonymous,
    /// `?NNN` — numbered positional.
    Numbered(u32),
    /// `:name` — colon-prefixed named parameter.
    ColonNamed(String),
    /// `@name` — at-prefixed named parameter.
    AtNamed(String),
    /// `$name` — dollar-prefixed named parameter (tcl-style suffixes kept
    /// as part of the name).
    DollarNamed(String),
}

/// RAISE action for trigger bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaiseAction {
    Ignore,
    Rollback,
    Abort,
    Fail,
}

// ---------------------------------------------------------------------------
// Window specifications
// ---------------------------------------------------------------------------

/// Window specification for window functions.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Optional base window name.
    pub base_window: Option<String>,
    /// PARTITION BY expressions.
    pub partition_by: Vec<Expr>,
    /// ORDER BY terms within the window.
    pub order_by: Vec<OrderingTerm>,
    /// Frame specification.
    pub frame: Option<FrameSpec>,
    pub span: Span,
}

/// Window frame specification.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    /// Frame unit: ROWS, RANGE, or GROUPS.
    pub unit: FrameUnit,
    /// Frame start bound. Never `UnboundedFollowing`.
    pub start: FrameBound,
    /// Frame end bound (`None` means the frame ends at the current row,
    /// i.e. the BETWEEN-less syntax). Never `UnboundedPreceding`.
    pub end: Option<FrameBound>,
    /// EXCLUDE clause.
    pub exclude: Option<FrameExclude>,
    pub span: Span,
}

/// Window frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    Rows,
    Range,
    Groups,
}

/// Window frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`.
    UnboundedPreceding,
    /// `expr PRECEDING`.
    Preceding(Box<Expr>),
    /// `CURRENT ROW`.
    CurrentRow,
    /// `expr FOLLOWING`.
    Following(Box<Expr>),
    /// `UNBOUNDED FOLLOWING`.
    UnboundedFollowing,
}

/// Window frame EXCLUDE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameExclude {
    NoOthers,
    CurrentRow,
    Group,
    Ties,
}

// ---------------------------------------------------------------------------
// SELECT statement
// ---------------------------------------------------------------------------

/// A full SELECT statement, including WITH, ORDER BY, and LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Optional common table expressions.
    pub with: Option<WithClause>,
    /// The SELECT body (core + compound operators).
    pub body: SelectBody,
    /// ORDER BY clause (only on the outermost compound).
    pub order_by: Vec<OrderingTerm>,
    /// LIMIT clause (only on the outermost compound).
    pub limit: Option<LimitClause>,
    pub span: Span,
}

/// WITH clause for common table expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    /// Whether this is `WITH RECURSIVE`.
    pub recursive: bool,
    /// The CTE definitions.
    pub ctes: Vec<Cte>,
    pub span: Span,
}

/// A single Common Table Expression definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cte {
    /// CTE name.
    pub name: String,
    /// Optional column name list.
    pub columns: Vec<String>,
    /// Materialization hint.
    pub materialized: Option<CteMaterialized>,
    /// The CTE body query.
    pub query: SelectStatement,
    pub span: Span,
}

/// CTE materialization hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CteMaterialized {
    Materialized,
    NotMaterialized,
}

/// The body of a SELECT: one or more SELECT cores connected by compound
/// operators, folded left-associatively. The arms are bare cores; ORDER BY
/// and LIMIT live on the enclosing [`SelectStatement`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectBody {
    /// The first SELECT core.
    pub select: SelectCore,
    /// Zero or more compound operations (UNION, INTERSECT, EXCEPT).
    pub compounds: Vec<(CompoundOp, SelectCore)>,
}

/// Compound SELECT operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

/// A single SELECT core or VALUES clause.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectCore {
    /// `SELECT [DISTINCT|ALL] columns FROM ... WHERE ... GROUP BY ...
    /// HAVING ... WINDOW ...`
    Select {
        distinct: Distinctness,
        columns: Vec<ResultColumn>,
        from: Option<FromClause>,
        where_clause: Option<Box<Expr>>,
        group_by: Vec<Expr>,
        having: Option<Box<Expr>>,
        windows: Vec<WindowDef>,
        span: Span,
    },
    /// `VALUES (row), (row), ...` — first-class in SQLite.
    Values { rows: Vec<Vec<Expr>>, span: Span },
}

impl SelectCore {
    /// Return the span of this core.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select { span, .. } | Self::Values { span, .. } => *span,
        }
    }
}

/// DISTINCT / ALL modifier on SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Distinctness {
    #[default]
    All,
    Distinct,
}

/// A single column in the SELECT result list.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultColumn {
    /// `*` — all columns from all tables.
    Star(Span),
    /// `table.*` — all columns from a specific table.
    TableStar { table: String, span: Span },
    /// `expr [AS alias]`.
    Expr {
        expr: Expr,
        alias: Option<String>,
        span: Span,
    },
}

impl ResultColumn {
    /// Return the span of this result column.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Star(span) | Self::TableStar { span, .. } | Self::Expr { span, .. } => *span,
        }
    }
}

/// The FROM clause: the first source plus zero or more joins, folded
/// left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    /// The leftmost table source.
    pub source: TableOrSubquery,
    /// JOIN clauses applied in order.
    pub joins: Vec<JoinClause>,
    pub span: Span,
}

/// A table source in a FROM clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableOrSubquery {
    /// A named table: `[schema.]table [AS alias] [INDEXED BY idx | NOT INDEXED]`.
    Table {
        name: QualifiedName,
        alias: Option<String>,
        index_hint: Option<IndexHint>,
        span: Span,
    },
    /// A subquery: `(SELECT ...) [AS alias]`.
    Subquery {
        query: Box<SelectStatement>,
        alias: Option<String>,
        span: Span,
    },
    /// A table-valued function call: `func(args) [AS alias]`.
    TableFunction {
        name: String,
        args: Vec<Expr>,
        alias: Option<String>,
        span: Span,
    },
    /// Parenthesized join: `(table JOIN table ...)`.
    ParenJoin { join: Box<FromClause>, span: Span },
}

impl TableOrSubquery {
    /// Return the span of this table source.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Table { span, .. }
            | Self::Subquery { span, .. }
            | Self::TableFunction { span, .. }
            | Self::ParenJoin { span, .. } => *span,
        }
    }
}

/// Index hint on a FROM table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexHint {
    /// `INDEXED BY index_name`.
    IndexedBy(String),
    /// `NOT INDEXED`.
    NotIndexed,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Join type (INNER, LEFT, CROSS, NATURAL, etc.).
    pub join_type: JoinType,
    /// The right-hand table source.
    pub table: TableOrSubquery,
    /// Join constraint (ON or USING).
    pub constraint: Option<JoinConstraint>,
    pub span: Span,
}

/// Join type modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JoinType {
    /// Whether this is a NATURAL join.
    pub natural: bool,
    /// The join kind.
    pub kind: JoinKind,
}

/// The kind of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `,` or `CROSS JOIN`.
    Cross,
    /// `[INNER] JOIN`.
    Inner,
    /// `LEFT [OUTER] JOIN`.
    Left,
    /// `RIGHT [OUTER] JOIN`.
    Right,
    /// `FULL [OUTER] JOIN`.
    Full,
}

/// Join constraint: ON expression or USING column list.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<String>),
}

/// Named window definition in the WINDOW clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDef {
    /// Window name.
    pub name: String,
    /// Window specification.
    pub spec: WindowSpec,
    pub span: Span,
}

/// ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingTerm {
    /// The expression to order by.
    pub expr: Expr,
    /// Optional collation override.
    pub collation: Option<String>,
    /// Sort direction.
    pub direction: Option<SortDirection>,
    /// NULLS FIRST or NULLS LAST.
    pub nulls: Option<NullsOrder>,
    pub span: Span,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// NULLS ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// LIMIT clause: `LIMIT expr [OFFSET expr]` or `LIMIT expr, expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitClause {
    pub limit: Expr,
    pub offset: Option<Expr>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// INSERT statement
// ---------------------------------------------------------------------------

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Optional WITH clause.
    pub with: Option<WithClause>,
    /// `REPLACE` or `INSERT OR conflict_action`.
    pub or_conflict: Option<ConflictAction>,
    /// Target table name.
    pub table: QualifiedName,
    /// Optional alias for the target table.
    pub alias: Option<String>,
    /// Optional column name list.
    pub columns: Vec<String>,
    /// The source of values.
    pub source: InsertSource,
    /// ON CONFLICT (upsert) clauses.
    pub upsert: Vec<UpsertClause>,
    /// RETURNING clause.
    pub returning: Vec<ResultColumn>,
    pub span: Span,
}

/// Source of values for INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (row), (row), ...`
    Values(Vec<Vec<Expr>>),
    /// `SELECT ...`
    Select(Box<SelectStatement>),
    /// `DEFAULT VALUES`
    DefaultValues,
}

/// Conflict resolution action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictAction {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

/// An ON CONFLICT (upsert) clause.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertClause {
    /// Conflict target columns.
    pub target: Option<UpsertTarget>,
    /// The DO action.
    pub action: UpsertAction,
    pub span: Span,
}

/// Upsert conflict target.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertTarget {
    /// Indexed columns.
    pub columns: Vec<IndexedColumn>,
    /// Optional WHERE clause for partial index matching.
    pub where_clause: Option<Expr>,
}

/// Upsert action: DO NOTHING or DO UPDATE SET ...
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertAction {
    Nothing,
    Update {
        assignments: Vec<Assignment>,
        where_clause: Option<Box<Expr>>,
    },
}

// ---------------------------------------------------------------------------
// UPDATE statement
// ---------------------------------------------------------------------------

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Optional WITH clause.
    pub with: Option<WithClause>,
    /// `UPDATE OR conflict_action`.
    pub or_conflict: Option<ConflictAction>,
    /// Target table.
    pub table: QualifiedTableRef,
    /// SET assignments.
    pub assignments: Vec<Assignment>,
    /// Optional FROM clause.
    pub from: Option<FromClause>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING clause.
    pub returning: Vec<ResultColumn>,
    /// ORDER BY (optional-feature tail, always accepted).
    pub order_by: Vec<OrderingTerm>,
    /// LIMIT clause.
    pub limit: Option<LimitClause>,
    pub span: Span,
}

/// A SET assignment: `column = expr` or `(col1, col2) = expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Target column(s).
    pub target: AssignmentTarget,
    /// Value expression.
    pub value: Expr,
    pub span: Span,
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    /// Single column name.
    Column(String),
    /// Column name list: `(col1, col2, ...)`.
    ColumnList(Vec<String>),
}

/// A table reference with optional alias and index hint (for UPDATE/DELETE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTableRef {
    pub name: QualifiedName,
    pub alias: Option<String>,
    pub index_hint: Option<IndexHint>,
}

// ---------------------------------------------------------------------------
// DELETE statement
// ---------------------------------------------------------------------------

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Optional WITH clause.
    pub with: Option<WithClause>,
    /// Target table.
    pub table: QualifiedTableRef,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING clause.
    pub returning: Vec<ResultColumn>,
    /// ORDER BY (optional-feature tail, always accepted).
    pub order_by: Vec<OrderingTerm>,
    /// LIMIT clause.
    pub limit: Option<LimitClause>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// DDL: CREATE TABLE
// ---------------------------------------------------------------------------

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CreateTableStatement {
    /// `IF NOT EXISTS` flag.
    pub if_not_exists: bool,
    /// `CREATE TEMP TABLE`.
    pub temporary: bool,
    /// Table name.
    pub name: QualifiedName,
    /// Table definition body.
    pub body: CreateTableBody,
    /// `WITHOUT ROWID` flag.
    pub without_rowid: bool,
    /// `STRICT` flag.
    pub strict: bool,
    pub span: Span,
}

/// The body of a CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateTableBody {
    /// Column and constraint definitions.
    Columns {
        columns: Vec<ColumnDef>,
        constraints: Vec<TableConstraint>,
    },
    /// `AS SELECT ...`
    AsSelect(Box<SelectStatement>),
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Optional type name.
    pub type_name: Option<TypeName>,
    /// Column constraints.
    pub constraints: Vec<ColumnConstraint>,
    pub span: Span,
}

/// A constraint on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConstraint {
    /// Optional constraint name.
    pub name: Option<String>,
    /// The constraint kind.
    pub kind: ColumnConstraintKind,
    pub span: Span,
}

/// Column constraint variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraintKind {
    PrimaryKey {
        direction: Option<SortDirection>,
        conflict: Option<ConflictAction>,
        autoincrement: bool,
    },
    NotNull {
        conflict: Option<ConflictAction>,
    },
    /// Bare `NULL` constraint (accepted and ignored by SQLite).
    Null,
    Unique {
        conflict: Option<ConflictAction>,
    },
    Check(Expr),
    Default(DefaultValue),
    Collate(String),
    ForeignKey(ForeignKeyClause),
    Generated {
        expr: Expr,
        storage: Option<GeneratedStorage>,
    },
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// `DEFAULT literal` or `DEFAULT signed-number`.
    Expr(Expr),
    /// Parenthesized expression: `DEFAULT (expr)`.
    ParenExpr(Expr),
}

/// Generated column storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratedStorage {
    Stored,
    Virtual,
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
    /// Optional constraint name.
    pub name: Option<String>,
    /// The constraint kind.
    pub kind: TableConstraintKind,
    pub span: Span,
}

/// Table constraint variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraintKind {
    PrimaryKey {
        columns: Vec<IndexedColumn>,
        conflict: Option<ConflictAction>,
    },
    Unique {
        columns: Vec<IndexedColumn>,
        conflict: Option<ConflictAction>,
    },
    Check(Expr),
    ForeignKey {
        columns: Vec<String>,
        clause: ForeignKeyClause,
    },
}

/// An indexed column specification (for PRIMARY KEY, UNIQUE, CREATE INDEX,
/// and upsert conflict targets).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedColumn {
    /// The column expression (usually just a column name).
    pub expr: Expr,
    /// Optional collation.
    pub collation: Option<String>,
    /// Optional sort direction.
    pub direction: Option<SortDirection>,
    pub span: Span,
}

/// A REFERENCES clause for foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
    /// Referenced table.
    pub table: String,
    /// Referenced columns (empty = implicit primary key).
    pub columns: Vec<String>,
    /// ON DELETE / ON UPDATE actions.
    pub actions: Vec<ForeignKeyAction>,
    /// DEFERRABLE clause.
    pub deferrable: Option<Deferrable>,
    pub span: Span,
}

/// Foreign key ON DELETE/UPDATE action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeyAction {
    pub trigger: ForeignKeyTrigger,
    pub action: ForeignKeyActionType,
}

/// When the foreign key action fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKeyTrigger {
    OnDelete,
    OnUpdate,
}

/// Foreign key action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignKeyActionType {
    SetNull,
    SetDefault,
    Cascade,
    Restrict,
    NoAction,
}

/// Deferrable constraint specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deferrable {
    pub not: bool,
    pub initially: Option<DeferrableInitially>,
}

/// INITIALLY DEFERRED or INITIALLY IMMEDIATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferrableInitially {
    Deferred,
    Immediate,
}

// ---------------------------------------------------------------------------
// DDL: CREATE INDEX
// ---------------------------------------------------------------------------

/// A CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStatement {
    /// `CREATE UNIQUE INDEX`.
    pub unique: bool,
    /// `IF NOT EXISTS` flag.
    pub if_not_exists: bool,
    /// Index name.
    pub name: QualifiedName,
    /// Table the index is on.
    pub table: String,
    /// Indexed columns.
    pub columns: Vec<IndexedColumn>,
    /// Optional partial index WHERE clause.
    pub where_clause: Option<Expr>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// DDL: CREATE VIEW
// ---------------------------------------------------------------------------

/// A CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    /// `IF NOT EXISTS` flag.
    pub if_not_exists: bool,
    /// `CREATE TEMP VIEW`.
    pub temporary: bool,
    /// View name.
    pub name: QualifiedName,
    /// Optional column name list.
    pub columns: Vec<String>,
    /// The view's SELECT query.
    pub query: SelectStatement,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// DDL: CREATE TRIGGER
// ---------------------------------------------------------------------------

/// A CREATE TRIGGER statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTriggerStatement {
    /// `IF NOT EXISTS` flag.
    pub if_not_exists: bool,
    /// `CREATE TEMP TRIGGER`.
    pub temporary: bool,
    /// Trigger name.
    pub name: QualifiedName,
    /// When the trigger fires.
    pub timing: TriggerTiming,
    /// What event triggers it.
    pub event: TriggerEvent,
    /// Table the trigger is on.
    pub table: String,
    /// `FOR EACH ROW` (SQLite only supports row-level triggers).
    pub for_each_row: bool,
    /// Optional WHEN condition.
    pub when: Option<Expr>,
    /// Trigger body statements. Every entry is a `Select`, `Insert`,
    /// `Update`, or `Delete` variant.
    pub body: Vec<Statement>,
    pub span: Span,
}

/// Trigger timing: BEFORE, AFTER, or INSTEAD OF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

/// Trigger event: INSERT, DELETE, or UPDATE [OF columns].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Insert,
    Delete,
    Update(Vec<String>),
}

// ---------------------------------------------------------------------------
// DDL: CREATE VIRTUAL TABLE
// ---------------------------------------------------------------------------

/// A CREATE VIRTUAL TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVirtualTableStatement {
    /// `IF NOT EXISTS` flag.
    pub if_not_exists: bool,
    /// Table name.
    pub name: QualifiedName,
    /// Module name (e.g. `fts5`, `rtree`).
    pub module: String,
    /// Module arguments (opaque comma-separated token slices).
    pub args: Vec<String>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// DDL: DROP
// ---------------------------------------------------------------------------

/// A DROP statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStatement {
    /// What kind of object to drop.
    pub object_type: DropObjectType,
    /// `IF EXISTS` flag.
    pub if_exists: bool,
    /// Object name.
    pub name: QualifiedName,
    pub span: Span,
}

/// DROP target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropObjectType {
    Table,
    View,
    Index,
    Trigger,
}

// ---------------------------------------------------------------------------
// DDL: ALTER TABLE
// ---------------------------------------------------------------------------

/// An ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    /// Table name.
    pub table: QualifiedName,
    /// The alteration to perform.
    pub action: AlterTableAction,
    pub span: Span,
}

/// ALTER TABLE action variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    /// `RENAME TO new_name`.
    RenameTo(String),
    /// `RENAME COLUMN old TO new`.
    RenameColumn { old: String, new: String },
    /// `ADD COLUMN column_def`. The column may not be `GENERATED ... STORED`.
    AddColumn(ColumnDef),
    /// `DROP COLUMN column_name`.
    DropColumn(String),
}

// ---------------------------------------------------------------------------
// Transaction control
// ---------------------------------------------------------------------------

/// A BEGIN statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeginStatement {
    /// Transaction mode.
    pub mode: Option<TransactionMode>,
    pub span: Span,
}

/// Transaction mode for BEGIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionMode {
    Deferred,
    Immediate,
    Exclusive,
}

/// A ROLLBACK statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackStatement {
    /// Optional savepoint name to roll back to.
    pub to_savepoint: Option<String>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// ATTACH / PRAGMA / VACUUM
// ---------------------------------------------------------------------------

/// An ATTACH statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachStatement {
    /// The database file expression.
    pub expr: Expr,
    /// The schema name.
    pub schema: String,
    pub span: Span,
}

/// A PRAGMA statement.
#[derive(Debug, Clone, PartialEq)]
pub struct PragmaStatement {
    /// Pragma name (possibly schema-qualified).
    pub name: QualifiedName,
    /// Pragma value or call argument.
    pub value: Option<PragmaValue>,
    pub span: Span,
}

/// PRAGMA value form.
#[derive(Debug, Clone, PartialEq)]
pub enum PragmaValue {
    /// `PRAGMA name = value`.
    Assign(Expr),
    /// `PRAGMA name(value)`.
    Call(Expr),
}

/// A VACUUM statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VacuumStatement {
    /// Optional schema name.
    pub schema: Option<String>,
    /// Optional INTO filename.
    pub into: Option<Expr>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
