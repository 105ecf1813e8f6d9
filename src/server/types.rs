//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEARCH_LIMIT;
use crate::index::SearchParams;

/// Query string for `GET /api/search`.
///
/// Everything arrives as optional text so a malformed number never turns
/// into a 400; unparseable pagination falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            term: self.q,
            type_filter: self.file_type,
            limit: parse_int(self.limit.as_deref()).unwrap_or(DEFAULT_SEARCH_LIMIT),
            offset: parse_int(self.offset.as_deref()).unwrap_or(0),
        }
        .normalized()
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: Option<&str>, limit: Option<&str>, offset: Option<&str>) -> SearchQuery {
        SearchQuery {
            q: q.map(String::from),
            file_type: None,
            limit: limit.map(String::from),
            offset: offset.map(String::from),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = SearchQuery::default().into_params();
        assert_eq!(params, SearchParams::default());
    }

    #[test]
    fn test_garbage_pagination_falls_back() {
        let params = query(None, Some("lots"), Some("1.5")).into_params();
        assert_eq!(params.limit, 100);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_numbers_are_parsed_and_clamped() {
        let params = query(Some("x"), Some(" 25 "), Some("-3")).into_params();
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset, 0);
        assert_eq!(params.term.as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_term_means_all() {
        let params = query(Some(""), None, None).into_params();
        assert!(params.term.is_none());
    }
}
