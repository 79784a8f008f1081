//! Field-length rules shared by ads and users.
//!
//! Lengths count Unicode scalar values, so a title of 100 Cyrillic letters is
//! accepted even though it is 200 bytes long.

use crate::errors::ModelError;

pub const TITLE_MAX: usize = 100;
pub const TEXT_MAX: usize = 500;
pub const NICKNAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 100;

/// Check that `value` holds between 1 and `max` characters.
pub fn check_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    if len > max {
        return Err(ModelError::Validation(format!("{field} exceeds {max} characters")));
    }
    Ok(())
}
