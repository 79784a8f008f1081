use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::{check_len, EMAIL_MAX, NICKNAME_MAX};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
}

impl User {
    pub fn new(id: i64, nickname: &str, email: &str) -> Self {
        Self { id, nickname: nickname.to_string(), email: email.to_string() }
    }
}

pub fn validate_nickname(nickname: &str) -> Result<(), ModelError> {
    check_len("nickname", nickname, NICKNAME_MAX)
}

/// Only the length is checked; the address format is not.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    check_len("email", email, EMAIL_MAX)
}

pub fn validate_user_fields(nickname: &str, email: &str) -> Result<(), ModelError> {
    validate_nickname(nickname)?;
    validate_email(email)
}
