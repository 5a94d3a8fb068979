//! Catalogue products and the product search query.

use serde::{Deserialize, Serialize};

/// Maximum accepted search query length, in characters.
pub const SEARCH_QUERY_MAX: usize = 200;

/// Catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

/// Validation errors for [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchQueryError {
    #[error("search query must be at most {max} characters")]
    TooLong { max: usize },
}

/// Free-text product search term.
///
/// The term is matched literally: SQL wildcard characters are escaped by the
/// repository, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Validate a raw query string. An empty query is allowed and matches
    /// every product.
    pub fn new(raw: impl Into<String>) -> Result<Self, SearchQueryError> {
        let raw = raw.into();
        if raw.chars().count() > SEARCH_QUERY_MAX {
            return Err(SearchQueryError::TooLong {
                max: SEARCH_QUERY_MAX,
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `LIKE` pattern with `%`, `_` and the escape character itself escaped
    /// using `\`.
    ///
    /// # Examples
    /// ```
    /// use bastion::domain::SearchQuery;
    ///
    /// let query = SearchQuery::new("50%_off").unwrap();
    /// assert_eq!(query.like_pattern(), r"%50\%\_off%");
    /// ```
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
