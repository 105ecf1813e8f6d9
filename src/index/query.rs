//! Search parameters and the parameterized filter they compile to.
//!
//! Every user-supplied value reaches SQLite as a bound parameter; the SQL
//! text only ever contains fixed fragments.

use rusqlite::types::Value;

use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

/// Escape character used in `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

/// Search request with explicit optional fields and documented defaults.
///
/// - `term`: substring matched against name or relative path, absent = all
/// - `type_filter`: exact type label, absent = all
/// - `limit`: page size, default [`DEFAULT_SEARCH_LIMIT`]
/// - `offset`: rows to skip, default 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub term: Option<String>,
    pub type_filter: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            term: None,
            type_filter: None,
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    #[must_use]
    pub fn type_filter(mut self, label: impl Into<String>) -> Self {
        self.type_filter = Some(label.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Clamp pagination and drop empty strings instead of rejecting input.
    ///
    /// A negative limit falls back to the default page size, a negative
    /// offset to 0, and oversized limits are capped at [`MAX_SEARCH_LIMIT`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let limit = if self.limit < 0 {
            DEFAULT_SEARCH_LIMIT
        } else {
            self.limit.min(MAX_SEARCH_LIMIT)
        };
        Self {
            term: self.term.filter(|t| !t.is_empty()),
            type_filter: self.type_filter.filter(|t| !t.is_empty()),
            limit,
            offset: self.offset.max(0),
        }
    }

    /// Compile the predicates into a `WHERE` clause and its parameters.
    pub fn filter(&self) -> SqlFilter {
        let mut filter = SqlFilter::default();
        if let Some(term) = self.term.as_deref().filter(|t| !t.is_empty()) {
            let pattern = like_pattern(term);
            filter.push(
                "(name LIKE ? ESCAPE '\\' OR relative_path LIKE ? ESCAPE '\\')",
                [Value::Text(pattern.clone()), Value::Text(pattern)],
            );
        }
        if let Some(label) = self.type_filter.as_deref().filter(|t| !t.is_empty()) {
            filter.push("type_label = ?", [Value::Text(label.to_string())]);
        }
        filter
    }
}

/// Composable `WHERE` predicates with positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    clauses: Vec<&'static str>,
    params: Vec<Value>,
}

impl SqlFilter {
    fn push(&mut self, clause: &'static str, params: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause);
        self.params.extend(params);
    }

    /// `" WHERE a AND b"`, or an empty string when nothing is filtered.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// `%term%` with `%`, `_` and the escape character matched literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
