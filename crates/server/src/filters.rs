//! Strict parsing of filter parameters into typed predicates.
//!
//! Both transports go through here so an unknown key or a value of the wrong
//! JSON type is rejected the same way everywhere.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use service::{AdFilter, AdPredicate, FilterKey, ServiceError};

pub fn parse_filter(params: &Map<String, Value>) -> Result<AdFilter, ServiceError> {
    let mut filter = AdFilter::new();
    for (name, value) in params {
        let key = FilterKey::parse(name)
            .ok_or_else(|| ServiceError::Validation(format!("bad parameters: unknown filter `{name}`")))?;
        filter.insert(parse_predicate(key, value)?);
    }
    Ok(filter)
}

fn parse_predicate(key: FilterKey, value: &Value) -> Result<AdPredicate, ServiceError> {
    let bad = || ServiceError::Validation(format!("bad parameters: wrong type for `{}`", key.as_str()));
    match key {
        FilterKey::Published => value.as_bool().map(AdPredicate::Published).ok_or_else(bad),
        FilterKey::AuthorId => value.as_i64().map(AdPredicate::AuthorId).ok_or_else(bad),
        FilterKey::CreatedAt => value
            .as_str()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
            .map(AdPredicate::CreatedAt)
            .ok_or_else(bad),
    }
}
