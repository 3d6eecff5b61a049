//! Identifier policy.
//!
//! Declared names become table names, column names, struct members and
//! object properties in generated code, so they may not collide with the
//! keywords of the storage query language or of the common target languages.
//! All comparisons are ASCII case-insensitive and locale-independent.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Keywords of the target C API.
const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "enum",
    "extern", "float", "goto", "long", "register", "short", "signed", "static", "struct",
    "typedef", "union", "unsigned", "void", "volatile",
];

/// Keywords of the SQLite query language.
const SQL_KEYWORDS: &[&str] = &[
    "abort",
    "action",
    "add",
    "after",
    "all",
    "alter",
    "analyze",
    "and",
    "as",
    "asc",
    "attach",
    "autoincrement",
    "before",
    "begin",
    "between",
    "by",
    "cascade",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "commit",
    "conflict",
    "constraint",
    "create",
    "cross",
    "current_date",
    "current_time",
    "current_timestamp",
    "database",
    "default",
    "deferrable",
    "deferred",
    "delete",
    "desc",
    "detach",
    "distinct",
    "drop",
    "each",
    "else",
    "end",
    "escape",
    "except",
    "exclusive",
    "exists",
    "explain",
    "fail",
    "for",
    "foreign",
    "from",
    "full",
    "glob",
    "group",
    "having",
    "if",
    "ignore",
    "immediate",
    "in",
    "index",
    "indexed",
    "initially",
    "inner",
    "insert",
    "instead",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "key",
    "left",
    "like",
    "limit",
    "match",
    "natural",
    "not",
    "notnull",
    "null",
    "of",
    "offset",
    "on",
    "or",
    "order",
    "outer",
    "plan",
    "pragma",
    "primary",
    "query",
    "raise",
    "recursive",
    "references",
    "regexp",
    "reindex",
    "release",
    "rename",
    "replace",
    "restrict",
    "right",
    "rollback",
    "row",
    "savepoint",
    "select",
    "set",
    "table",
    "temp",
    "temporary",
    "then",
    "to",
    "transaction",
    "trigger",
    "union",
    "unique",
    "update",
    "using",
    "vacuum",
    "values",
    "view",
    "virtual",
    "when",
    "where",
    "with",
    "without",
];

/// Reserved words of the generated JavaScript/TypeScript bindings.
const JS_KEYWORDS: &[&str] = &[
    "await",
    "catch",
    "class",
    "debugger",
    "export",
    "extends",
    "false",
    "finally",
    "function",
    "implements",
    "import",
    "instanceof",
    "interface",
    "let",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "while",
    "yield",
];

/// The full reserved set, lower-cased.
static RESERVED: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    C_KEYWORDS
        .iter()
        .chain(SQL_KEYWORDS)
        .chain(JS_KEYWORDS)
        .copied()
        .collect()
});

/// Longest reserved word; anything longer cannot be reserved.
static MAX_RESERVED_LEN: LazyLock<usize> =
    LazyLock::new(|| RESERVED.iter().map(|w| w.len()).max().unwrap_or(0));

/// Returns true if `name` matches a reserved word, ignoring ASCII case.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    if name.len() > *MAX_RESERVED_LEN {
        return false;
    }
    RESERVED.contains(name.to_ascii_lowercase().as_str())
}

/// ASCII case-insensitive name comparison.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Returns the canonical (upper-cased) form of a declared name.
#[must_use]
pub fn canonical(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Returns an iterator over every reserved word, lower-cased.
pub fn reserved_words() -> impl Iterator<Item = &'static str> {
    RESERVED.iter().copied()
}
