// SQL token types.
//
// Every token carries a discriminant and a Span. Keywords are their own
// variants for O(1) matching in the parser; the reserved-word table below is
// the single source of truth for keyword classification.

use squeal_ast::Span;

/// A single token produced by the lexer.
///
/// Decoded values live inside [`TokenKind`]: strings have their quotes
/// stripped and escapes resolved, blobs are hex-decoded, numbers keep their
/// verbatim source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token discriminant (and decoded value, where meaningful).
    pub kind: TokenKind,
    /// Source span, including the 1-based line/column of the token start.
    pub span: Span,
}

/// Token discriminant.
///
/// Organized by category: literals, identifiers, bind parameters, operators,
/// punctuation, keywords (one variant per reserved word), and specials.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Numeric literal, verbatim text: `42`, `3.14`, `1e10`, `0xFF`, `.5`.
    Number(String),
    /// String literal (single-quoted), escapes resolved: `'it''s'` → `it's`.
    String(String),
    /// Blob literal: `X'CAFE'`, hex-decoded.
    Blob(Vec<u8>),

    // === Identifiers ===
    /// Unquoted identifier.
    Id(String),
    /// Delimited identifier (`"name"`, `[name]`, `` `name` ``). Never
    /// reclassified as a keyword.
    QuotedId(String),

    // === Bind parameters ===
    /// `?` anonymous positional.
    Question,
    /// `?NNN` numbered positional.
    QuestionNum(u32),
    /// `:name` colon-prefixed named.
    ColonParam(String),
    /// `@name` at-prefixed named.
    AtParam(String),
    /// `$name` dollar-prefixed named (may include `::` and a `(...)` suffix).
    DollarParam(String),

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Tilde,
    ShiftLeft,
    ShiftRight,
    Eq,          // `=`
    EqEq,        // `==`
    Ne,          // `!=`
    LtGt,        // `<>`
    Lt,
    Le,
    Gt,
    Ge,
    Concat,      // `||`
    Arrow,       // `->`
    DoubleArrow, // `->>`

    // === Punctuation ===
    Dot,
    Comma,
    Semicolon,
    LeftParen,
    RightParen,

    // === Keywords (the 147 reserved words) ===
    KwAbort,
    KwAction,
    KwAdd,
    KwAfter,
    KwAll,
    KwAlter,
    KwAlways,
    KwAnalyze,
    KwAnd,
    KwAs,
    KwAsc,
    KwAttach,
    KwAutoincrement,
    KwBefore,
    KwBegin,
    KwBetween,
    KwBy,
    KwCascade,
    KwCase,
    KwCast,
    KwCheck,
    KwCollate,
    KwColumn,
    KwCommit,
    KwConflict,
    KwConstraint,
    KwCreate,
    KwCross,
    KwCurrent,
    KwCurrentDate,
    KwCurrentTime,
    KwCurrentTimestamp,
    KwDatabase,
    KwDefault,
    KwDeferrable,
    KwDeferred,
    KwDelete,
    KwDesc,
    KwDetach,
    KwDistinct,
    KwDo,
    KwDrop,
    KwEach,
    KwElse,
    KwEnd,
    KwEscape,
    KwExcept,
    KwExclude,
    KwExclusive,
    KwExists,
    KwExplain,
    KwFail,
    KwFilter,
    KwFirst,
    KwFollowing,
    KwFor,
    KwForeign,
    KwFrom,
    KwFull,
    KwGenerated,
    KwGlob,
    KwGroup,
    KwGroups,
    KwHaving,
    KwIf,
    KwIgnore,
    KwImmediate,
    KwIn,
    KwIndex,
    KwIndexed,
    KwInitially,
    KwInner,
    KwInsert,
    KwInstead,
    KwIntersect,
    KwInto,
    KwIs,
    KwIsnull,
    KwJoin,
    KwKey,
    KwLast,
    KwLeft,
    KwLike,
    KwLimit,
    KwMatch,
    KwMaterialized,
    KwNatural,
    KwNo,
    KwNot,
    KwNothing,
    KwNotnull,
    KwNull,
    KwNulls,
    KwOf,
    KwOffset,
    KwOn,
    KwOr,
    KwOrder,
    KwOthers,
    KwOuter,
    KwOver,
    KwPartition,
    KwPlan,
    KwPragma,
    KwPreceding,
    KwPrimary,
    KwQuery,
    KwRaise,
    KwRange,
    KwRecursive,
    KwReferences,
    KwRegexp,
    KwReindex,
    KwRelease,
    KwRename,
    KwReplace,
    KwRestrict,
    KwReturning,
    KwRight,
    KwRollback,
    KwRow,
    KwRows,
    KwSavepoint,
    KwSelect,
    KwSet,
    KwTable,
    KwTemp,
    KwTemporary,
    KwThen,
    KwTies,
    KwTo,
    KwTransaction,
    KwTrigger,
    KwUnbounded,
    KwUnion,
    KwUnique,
    KwUpdate,
    KwUsing,
    KwVacuum,
    KwValues,
    KwView,
    KwVirtual,
    KwWhen,
    KwWhere,
    KwWindow,
    KwWith,
    KwWithout,

    // === Special ===
    /// End of input.
    Eof,
    /// Lexer error (invalid input); the payload is the error message.
    Error(String),
}

/// The reserved-word table, sorted by keyword for binary search.
static KEYWORDS: &[(&str, TokenKind)] = &[
    ("ABORT", TokenKind::KwAbort),
    ("ACTION", TokenKind::KwAction),
    ("ADD", TokenKind::KwAdd),
    ("AFTER", TokenKind::KwAfter),
    ("ALL", TokenKind::KwAll),
    ("ALTER", TokenKind::KwAlter),
    ("ALWAYS", TokenKind::KwAlways),
    ("ANALYZE", TokenKind::KwAnalyze),
    ("AND", TokenKind::KwAnd),
    ("AS", TokenKind::KwAs),
    ("ASC", TokenKind::KwAsc),
    ("ATTACH", TokenKind::KwAttach),
    ("AUTOINCREMENT", TokenKind::KwAutoincrement),
    ("BEFORE", TokenKind::KwBefore),
    ("BEGIN", TokenKind::KwBegin),
    ("BETWEEN", TokenKind::KwBetween),
    ("BY", TokenKind::KwBy),
    ("CASCADE", TokenKind::KwCascade),
    ("CASE", TokenKind::KwCase),
    ("CAST", TokenKind::KwCast),
    ("CHECK", TokenKind::KwCheck),
    ("COLLATE", TokenKind::KwCollate),
    ("COLUMN", TokenKind::KwColumn),
    ("COMMIT", TokenKind::KwCommit),
    ("CONFLICT", TokenKind::KwConflict),
    ("CONSTRAINT", TokenKind::KwConstraint),
    ("CREATE", TokenKind::KwCreate),
    ("CROSS", TokenKind::KwCross),
    ("CURRENT", TokenKind::KwCurrent),
    ("CURRENT_DATE", TokenKind::KwCurrentDate),
    ("CURRENT_TIME", TokenKind::KwCurrentTime),
    ("CURRENT_TIMESTAMP", TokenKind::KwCurrentTimestamp),
    ("DATABASE", TokenKind::KwDatabase),
    ("DEFAULT", TokenKind::KwDefault),
    ("DEFERRABLE", TokenKind::KwDeferrable),
    ("DEFERRED", TokenKind::KwDeferred),
    ("DELETE", TokenKind::KwDelete),
    ("DESC", TokenKind::KwDesc),
    ("DETACH", TokenKind::KwDetach),
    ("DISTINCT", TokenKind::KwDistinct),
    ("DO", TokenKind::KwDo),
    ("DROP", TokenKind::KwDrop),
    ("EACH", TokenKind::KwEach),
    ("ELSE", TokenKind::KwElse),
    ("END", TokenKind::KwEnd),
    ("ESCAPE", TokenKind::KwEscape),
    ("EXCEPT", TokenKind::KwExcept),
    ("EXCLUDE", TokenKind::KwExclude),
    ("EXCLUSIVE", TokenKind::KwExclusive),
    ("EXISTS", TokenKind::KwExists),
    ("EXPLAIN", TokenKind::KwExplain),
    ("FAIL", TokenKind::KwFail),
    ("FILTER", TokenKind::KwFilter),
    ("FIRST", TokenKind::KwFirst),
    ("FOLLOWING", TokenKind::KwFollowing),
    ("FOR", TokenKind::KwFor),
    ("FOREIGN", TokenKind::KwForeign),
    ("FROM", TokenKind::KwFrom),
    ("FULL", TokenKind::KwFull),
    ("GENERATED", TokenKind::KwGenerated),
    ("GLOB", TokenKind::KwGlob),
    ("GROUP", TokenKind::KwGroup),
    ("GROUPS", TokenKind::KwGroups),
    ("HAVING", TokenKind::KwHaving),
    ("IF", TokenKind::KwIf),
    ("IGNORE", TokenKind::KwIgnore),
    ("IMMEDIATE", TokenKind::KwImmediate),
    ("IN", TokenKind::KwIn),
    ("INDEX", TokenKind::KwIndex),
    ("INDEXED", TokenKind::KwIndexed),
    ("INITIALLY", TokenKind::KwInitially),
    ("INNER", TokenKind::KwInner),
    ("INSERT", TokenKind::KwInsert),
    ("INSTEAD", TokenKind::KwInstead),
    ("INTERSECT", TokenKind::KwIntersect),
    ("INTO", TokenKind::KwInto),
    ("IS", TokenKind::KwIs),
    ("ISNULL", TokenKind::KwIsnull),
    ("JOIN", TokenKind::KwJoin),
    ("KEY", TokenKind::KwKey),
    ("LAST", TokenKind::KwLast),
    ("LEFT", TokenKind::KwLeft),
    ("LIKE", TokenKind::KwLike),
    ("LIMIT", TokenKind::KwLimit),
    ("MATCH", TokenKind::KwMatch),
    ("MATERIALIZED", TokenKind::KwMaterialized),
    ("NATURAL", TokenKind::KwNatural),
    ("NO", TokenKind::KwNo),
    ("NOT", TokenKind::KwNot),
    ("NOTHING", TokenKind::KwNothing),
    ("NOTNULL", TokenKind::KwNotnull),
    ("NULL", TokenKind::KwNull),
    ("NULLS", TokenKind::KwNulls),
    ("OF", TokenKind::KwOf),
    ("OFFSET", TokenKind::KwOffset),
    ("ON", TokenKind::KwOn),
    ("OR", TokenKind::KwOr),
    ("ORDER", TokenKind::KwOrder),
    ("OTHERS", TokenKind::KwOthers),
    ("OUTER", TokenKind::KwOuter),
    ("OVER", TokenKind::KwOver),
    ("PARTITION", TokenKind::KwPartition),
    ("PLAN", TokenKind::KwPlan),
    ("PRAGMA", TokenKind::KwPragma),
    ("PRECEDING", TokenKind::KwPreceding),
    ("PRIMARY", TokenKind::KwPrimary),
    ("QUERY", TokenKind::KwQuery),
    ("RAISE", TokenKind::KwRaise),
    ("RANGE", TokenKind::KwRange),
    ("RECURSIVE", TokenKind::KwRecursive),
    ("REFERENCES", TokenKind::KwReferences),
    ("REGEXP", TokenKind::KwRegexp),
    ("REINDEX", TokenKind::KwReindex),
    ("RELEASE", TokenKind::KwRelease),
    ("RENAME", TokenKind::KwRename),
    ("REPLACE", TokenKind::KwReplace),
    ("RESTRICT", TokenKind::KwRestrict),
    ("RETURNING", TokenKind::KwReturning),
    ("RIGHT", TokenKind::KwRight),
    ("ROLLBACK", TokenKind::KwRollback),
    ("ROW", TokenKind::KwRow),
    ("ROWS", TokenKind::KwRows),
    ("SAVEPOINT", TokenKind::KwSavepoint),
    ("SELECT", TokenKind::KwSelect),
    ("SET", TokenKind::KwSet),
    ("TABLE", TokenKind::KwTable),
    ("TEMP", TokenKind::KwTemp),
    ("TEMPORARY", TokenKind::KwTemporary),
    ("THEN", TokenKind::KwThen),
    ("TIES", TokenKind::KwTies),
    ("TO", TokenKind::KwTo),
    ("TRANSACTION", TokenKind::KwTransaction),
    ("TRIGGER", TokenKind::KwTrigger),
    ("UNBOUNDED", TokenKind::KwUnbounded),
    ("UNION", TokenKind::KwUnion),
    ("UNIQUE", TokenKind::KwUnique),
    ("UPDATE", TokenKind::KwUpdate),
    ("USING", TokenKind::KwUsing),
    ("VACUUM", TokenKind::KwVacuum),
    ("VALUES", TokenKind::KwValues),
    ("VIEW", TokenKind::KwView),
    ("VIRTUAL", TokenKind::KwVirtual),
    ("WHEN", TokenKind::KwWhen),
    ("WHERE", TokenKind::KwWhere),
    ("WINDOW", TokenKind::KwWindow),
    ("WITH", TokenKind::KwWith),
    ("WITHOUT", TokenKind::KwWithout),
];

impl TokenKind {
    /// Look up an identifier to see if it is a reserved word.
    ///
    /// Matching is ASCII case-insensitive. Returns the keyword variant if
    /// found, else `None`.
    #[must_use]
    pub fn lookup_keyword(s: &str) -> Option<Self> {
        let upper = s.to_ascii_uppercase();
        KEYWORDS
            .binary_search_by(|(kw, _)| kw.cmp(&upper.as_str()))
            .ok()
            .map(|idx| KEYWORDS[idx].1.clone())
    }

    /// The canonical (uppercase) spelling of a keyword variant.
    #[must_use]
    pub fn keyword_str(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(kw, _)| *kw)
    }

    /// Returns true if this keyword can begin a top-level statement.
    ///
    /// This is the synchronization set used by the parser's panic-mode
    /// recovery: skipping stops at one of these (at paren depth zero).
    #[must_use]
    pub fn is_statement_start(&self) -> bool {
        matches!(
            self,
            Self::KwSelect
                | Self::KwInsert
                | Self::KwUpdate
                | Self::KwDelete
                | Self::KwCreate
                | Self::KwAlter
                | Self::KwDrop
                | Self::KwBegin
                | Self::KwCommit
                | Self::KwEnd
                | Self::KwRollback
                | Self::KwSavepoint
                | Self::KwRelease
                | Self::KwAttach
                | Self::KwDetach
                | Self::KwAnalyze
                | Self::KwVacuum
                | Self::KwReindex
                | Self::KwExplain
                | Self::KwPragma
                | Self::KwWith
                | Self::KwReplace
        )
    }

    /// Reconstruct SQL text for this token.
    ///
    /// Used to flatten opaque regions (virtual table module arguments) back
    /// into strings. Keywords render in their canonical uppercase form;
    /// quoted identifiers re-quote with double quotes.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Number(text) => text.clone(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
            Self::Id(s) => s.clone(),
            Self::QuotedId(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Self::Question => "?".to_owned(),
            Self::QuestionNum(n) => format!("?{n}"),
            Self::ColonParam(s) => format!(":{s}"),
            Self::AtParam(s) => format!("@{s}"),
            Self::DollarParam(s) => format!("${s}"),
            Self::Plus => "+".to_owned(),
            Self::Minus => "-".to_owned(),
            Self::Star => "*".to_owned(),
            Self::Slash => "/".to_owned(),
            Self::Percent => "%".to_owned(),
            Self::Ampersand => "&".to_owned(),
            Self::Pipe => "|".to_owned(),
            Self::Tilde => "~".to_owned(),
            Self::ShiftLeft => "<<".to_owned(),
            Self::ShiftRight => ">>".to_owned(),
            Self::Eq => "=".to_owned(),
            Self::EqEq => "==".to_owned(),
            Self::Ne => "!=".to_owned(),
            Self::LtGt => "<>".to_owned(),
            Self::Lt => "<".to_owned(),
            Self::Le => "<=".to_owned(),
            Self::Gt => ">".to_owned(),
            Self::Ge => ">=".to_owned(),
            Self::Concat => "||".to_owned(),
            Self::Arrow => "->".to_owned(),
            Self::DoubleArrow => "->>".to_owned(),
            Self::Dot => ".".to_owned(),
            Self::Comma => ",".to_owned(),
            Self::Semicolon => ";".to_owned(),
            Self::LeftParen => "(".to_owned(),
            Self::RightParen => ")".to_owned(),
            Self::Eof | Self::Error(_) => String::new(),
            kw => kw.keyword_str().unwrap_or("").to_owned(),
        }
    }
}
