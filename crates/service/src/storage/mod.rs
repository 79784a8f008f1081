//! Storage abstractions for the service layer
//!
//! Defines the capability contracts the board service relies on and the
//! volatile in-memory stores that implement them. Every store owns its map
//! and id counter behind a single reader/writer lock; nothing is persisted.

use thiserror::Error;

use models::{Ad, User};

pub mod ad_store;
pub mod user_store;

pub use ad_store::InMemoryAdStore;
pub use user_store::InMemoryUserStore;

/// Outcomes a store can report besides success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0} store lock poisoned")]
    Poisoned(&'static str),
}

/// Repository contract for ads.
///
/// Reads may run concurrently with each other; every mutation is exclusive
/// for its full duration, id assignment included.
pub trait AdRepository: Send + Sync {
    fn create(&self, title: &str, text: &str, author_id: i64) -> Result<Ad, StoreError>;
    fn get(&self, id: i64) -> Result<Ad, StoreError>;
    /// First ad with an exactly matching title in map iteration order.
    /// When several ads share a title the winner is unspecified.
    fn get_by_title(&self, title: &str) -> Result<Ad, StoreError>;
    fn list_published(&self) -> Result<Vec<Ad>, StoreError>;
    fn update_content(&self, id: i64, title: &str, text: &str) -> Result<Ad, StoreError>;
    fn update_status(&self, id: i64, published: bool) -> Result<Ad, StoreError>;
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Repository contract for users.
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is taken; the check and the
    /// insert happen under one exclusive section.
    fn create(&self, nickname: &str, email: &str) -> Result<User, StoreError>;
    fn get(&self, id: i64) -> Result<User, StoreError>;
    fn delete(&self, id: i64) -> Result<(), StoreError>;
    /// Snapshot copy of every user.
    fn list_all(&self) -> Result<Vec<User>, StoreError>;
}
