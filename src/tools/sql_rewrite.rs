//! Statement preparation and schema qualification.
//!
//! Every statement the tool runs goes through [`prepare_statement`] first:
//! backticks are removed, everything after the first `;` is dropped, and bare
//! table names that follow `FROM`, `JOIN`, `UPDATE` or `INTO` are prefixed
//! with the configured schema.
//!
//! This is a token heuristic, not a parser. A word following one of those
//! keywords is treated as a table reference even when it is not (for example
//! `FROM (SELECT ...)` or `EXTRACT(YEAR FROM created_at)`), and statements
//! starting with `EXPLAIN` or `WITH` are left untouched because their table
//! references cannot be located this way.

/// Keywords whose following token is treated as a table reference.
const TABLE_KEYWORDS: &[&str] = &["from", "join", "update", "into"];

/// Statement prefixes that disable qualification entirely.
const PASSTHROUGH_PREFIXES: &[&str] = &["explain", "with"];

/// Quote an identifier for PostgreSQL (`orders` -> `"orders"`).
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a string literal for PostgreSQL (`it's` -> `'it''s'`).
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Strip backticks and keep only the first `;`-delimited statement.
pub fn first_statement(sql: &str) -> String {
    let stripped = sql.replace('`', "");
    stripped.split(';').next().unwrap_or_default().to_string()
}

/// True when the statement is passed through without qualification.
pub fn skips_qualification(sql: &str) -> bool {
    let lower = sql.trim_start().to_lowercase();
    PASSTHROUGH_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Prefix unqualified table references with `"<schema>".`.
///
/// References already containing a `.` or starting with `"` are kept as-is.
/// When qualification applies the statement is re-joined with single spaces.
pub fn qualify_tables(sql: &str, schema: &str) -> String {
    if skips_qualification(sql) {
        return sql.to_string();
    }

    let prefix = format!("{}.", quote_ident(schema));
    let mut words: Vec<String> = sql.split_whitespace().map(String::from).collect();

    for i in 1..words.len() {
        let follows_keyword = TABLE_KEYWORDS.contains(&words[i - 1].to_lowercase().as_str());
        let word = &words[i];
        if follows_keyword && !word.contains('.') && !word.starts_with('"') {
            words[i] = format!("{prefix}{word}");
        }
    }

    words.join(" ")
}

/// Full preparation applied before any statement reaches the database.
pub fn prepare_statement(sql: &str, schema: &str) -> String {
    qualify_tables(&first_statement(sql), schema)
}
