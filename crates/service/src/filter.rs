//! Typed predicates for narrowing the published-ad listing.

use chrono::{DateTime, Utc};
use models::Ad;

/// Keys a filter may constrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Published,
    AuthorId,
    CreatedAt,
}

impl FilterKey {
    /// Wire name used by both transports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Published => "published",
            FilterKey::AuthorId => "author_id",
            FilterKey::CreatedAt => "created_at",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "published" => Some(FilterKey::Published),
            "author_id" => Some(FilterKey::AuthorId),
            "created_at" => Some(FilterKey::CreatedAt),
            _ => None,
        }
    }
}

/// One equality constraint on an ad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdPredicate {
    Published(bool),
    AuthorId(i64),
    CreatedAt(DateTime<Utc>),
}

impl AdPredicate {
    pub fn key(&self) -> FilterKey {
        match self {
            AdPredicate::Published(_) => FilterKey::Published,
            AdPredicate::AuthorId(_) => FilterKey::AuthorId,
            AdPredicate::CreatedAt(_) => FilterKey::CreatedAt,
        }
    }

    pub fn matches(&self, ad: &Ad) -> bool {
        match self {
            AdPredicate::Published(p) => ad.published == *p,
            AdPredicate::AuthorId(id) => ad.author_id == *id,
            AdPredicate::CreatedAt(ts) => ad.created_at == *ts,
        }
    }
}

/// Set of predicates, at most one per key. An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdFilter {
    predicates: Vec<AdPredicate>,
}

impl AdFilter {
    pub fn new() -> Self { Self::default() }

    /// Add a predicate, replacing any earlier one with the same key.
    pub fn insert(&mut self, predicate: AdPredicate) {
        self.predicates.retain(|p| p.key() != predicate.key());
        self.predicates.push(predicate);
    }

    pub fn with(mut self, predicate: AdPredicate) -> Self {
        self.insert(predicate);
        self
    }

    pub fn predicates(&self) -> &[AdPredicate] { &self.predicates }

    pub fn is_empty(&self) -> bool { self.predicates.is_empty() }

    /// True when every predicate holds for `ad`.
    pub fn matches(&self, ad: &Ad) -> bool {
        self.predicates.iter().all(|p| p.matches(ad))
    }
}

impl FromIterator<AdPredicate> for AdFilter {
    fn from_iter<I: IntoIterator<Item = AdPredicate>>(iter: I) -> Self {
        let mut filter = AdFilter::new();
        for p in iter { filter.insert(p); }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(author_id: i64, published: bool) -> Ad {
        let mut ad = Ad::new(0, "t", "x", author_id, Utc::now());
        ad.published = published;
        ad
    }

    #[test]
    fn empty_filter_matches_all() {
        assert!(AdFilter::new().matches(&sample(1, false)));
    }

    #[test]
    fn all_predicates_must_hold() {
        let ad = sample(3, true);
        let f = AdFilter::new().with(AdPredicate::AuthorId(3)).with(AdPredicate::Published(true));
        assert!(f.matches(&ad));
        let f = f.with(AdPredicate::CreatedAt(ad.created_at + chrono::Duration::seconds(1)));
        assert!(!f.matches(&ad));
    }

    #[test]
    fn same_key_replaces() {
        let f: AdFilter = [AdPredicate::AuthorId(1), AdPredicate::AuthorId(2)].into_iter().collect();
        assert_eq!(f.predicates(), &[AdPredicate::AuthorId(2)]);
    }

    #[test]
    fn key_names_round_trip() {
        for key in [FilterKey::Published, FilterKey::AuthorId, FilterKey::CreatedAt] {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(FilterKey::parse("date_create"), None);
    }
}
