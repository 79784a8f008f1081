use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::{check_len, TEXT_MAX, TITLE_MAX};

/// Classified advertisement as held by the ad store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub author_id: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ad {
    /// Fresh unpublished ad; both timestamps start at `now`.
    pub fn new(id: i64, title: &str, text: &str, author_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.to_string(),
            text: text.to_string(),
            author_id,
            published: false,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    check_len("title", title, TITLE_MAX)
}

pub fn validate_text(text: &str) -> Result<(), ModelError> {
    check_len("text", text, TEXT_MAX)
}

/// Title must be 1..=100 chars and text 1..=500 chars.
pub fn validate_ad_fields(title: &str, text: &str) -> Result<(), ModelError> {
    validate_title(title)?;
    validate_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ad_is_unpublished() {
        let now = Utc::now();
        let ad = Ad::new(3, "hello", "world", 7, now);
        assert_eq!(ad.id, 3);
        assert_eq!(ad.author_id, 7);
        assert!(!ad.published);
        assert_eq!(ad.created_at, ad.updated_at);
    }

    #[test]
    fn ad_fields_limits() {
        assert!(validate_ad_fields("hello", "world").is_ok());
        assert!(validate_ad_fields("", "world").is_err());
        assert!(validate_ad_fields("hello", "").is_err());
        assert!(validate_ad_fields(&"t".repeat(101), "world").is_err());
        assert!(validate_ad_fields("hello", &"t".repeat(501)).is_err());
        assert!(validate_ad_fields(&"t".repeat(100), &"t".repeat(500)).is_ok());
    }

    #[test]
    fn serializes_timestamps_as_rfc3339() {
        let ad = Ad::new(0, "a", "b", 0, Utc::now());
        let json = serde_json::to_value(&ad).unwrap();
        let created = json["created_at"].as_str().unwrap();
        assert!(created.parse::<DateTime<Utc>>().is_ok());
    }
}
