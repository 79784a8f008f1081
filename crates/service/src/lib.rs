//! Service layer for the ads board.
//! - `storage`: volatile, lock-guarded repositories for ads and users.
//! - `board`: business operations (validation, authorship checks, filtering).
//! - `filter`: typed predicates accepted by the filtered listing.

pub mod errors;
pub mod filter;
pub mod storage;
pub mod board;
#[cfg(test)]
pub mod test_support;

pub use board::{AdBoardService, InMemoryBoard};
pub use errors::ServiceError;
pub use filter::{AdFilter, AdPredicate, FilterKey};
