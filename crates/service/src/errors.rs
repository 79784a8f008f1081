use thiserror::Error;

use models::errors::ModelError;

use crate::storage::StoreError;

/// Failure kinds surfaced by every board operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthorized(_) => 1004,
            ServiceError::Internal(_) => 1200,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(entity) => ServiceError::not_found(entity),
            // duplicate email is reported to callers as a plain validation failure
            StoreError::Conflict(msg) => ServiceError::Validation(msg),
            StoreError::Poisoned(entity) => ServiceError::Internal(format!("{} store lock poisoned", entity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_translate() {
        assert_eq!(ServiceError::from(StoreError::NotFound("ad")), ServiceError::NotFound("ad not found".into()));
        assert!(matches!(ServiceError::from(StoreError::Conflict("user already exists".into())), ServiceError::Validation(_)));
        assert!(matches!(ServiceError::from(StoreError::Poisoned("user")), ServiceError::Internal(_)));
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            ServiceError::Validation(String::new()).code(),
            ServiceError::NotFound(String::new()).code(),
            ServiceError::Unauthorized(String::new()).code(),
            ServiceError::Internal(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] { assert_ne!(a, b); }
        }
    }
}
