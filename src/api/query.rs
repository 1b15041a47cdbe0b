//! Common query parameter structs for pagination and filtering

use crate::neo4j::models::UserFilter;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Helper to deserialize optional numbers from query string
fn deserialize_option_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    use serde::de::Error;
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.is_empty() => s.parse().map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Page parameters for list endpoints (`?page=2&page_size=20`).
///
/// Missing values fall back to page 1 and the configured default size;
/// validation happens in `Config::page_request`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PageParams {
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_from_str")]
    pub page_size: Option<i64>,
}

/// User directory filter: `?title=Engineer&skills=rust,go`
#[derive(Debug, Deserialize, Default, Clone)]
pub struct UserDirectoryQuery {
    pub title: Option<String>,
    /// Comma-separated skill names; users matching any of them are kept
    pub skills: Option<String>,
}

impl UserDirectoryQuery {
    /// Convert comma-separated skills to Vec<String>
    pub fn skills_vec(&self) -> Option<Vec<String>> {
        self.skills.as_ref().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    pub fn to_filter(&self) -> UserFilter {
        UserFilter {
            title: self
                .title
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            skills: self.skills_vec().filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(flatten)]
        page: PageParams,
    }

    #[test]
    fn test_page_params_from_query_strings() {
        let parsed: Wrapper =
            serde_json::from_value(serde_json::json!({"page": "3", "page_size": "25"})).unwrap();
        assert_eq!(parsed.page.page, Some(3));
        assert_eq!(parsed.page.page_size, Some(25));
    }

    #[test]
    fn test_page_params_missing_or_empty() {
        let parsed: PageParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.page.is_none());
        assert!(parsed.page_size.is_none());

        let parsed: PageParams =
            serde_json::from_value(serde_json::json!({"page": ""})).unwrap();
        assert!(parsed.page.is_none());
    }

    #[test]
    fn test_page_params_rejects_garbage() {
        let parsed: Result<PageParams, _> =
            serde_json::from_value(serde_json::json!({"page": "abc"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_directory_query_to_filter() {
        let query = UserDirectoryQuery {
            title: Some(" Engineer ".to_string()),
            skills: Some("rust, go,,".to_string()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.title.as_deref(), Some("Engineer"));
        assert_eq!(
            filter.skills,
            Some(vec!["rust".to_string(), "go".to_string()])
        );

        let empty = UserDirectoryQuery {
            title: Some("".to_string()),
            skills: Some(",".to_string()),
        };
        let filter = empty.to_filter();
        assert!(filter.title.is_none());
        assert!(filter.skills.is_none());
    }
}
