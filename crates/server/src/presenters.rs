//! Wire shapes of the HTTP surface.

use chrono::{DateTime, Utc};
use models::{Ad, User};
use serde::{Deserialize, Serialize};

/// `{"data": ..., "error": ...}`; exactly one side is non-null.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self { Self { data: Some(data), error: None } }
}

impl Envelope<()> {
    pub fn empty() -> Self { Self { data: None, error: None } }

    pub fn error(msg: impl Into<String>) -> Self { Self { data: None, error: Some(msg.into()) } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    pub ad_id: i64,
    pub title: String,
    pub text: String,
    pub author_id: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Ad> for AdResponse {
    fn from(ad: Ad) -> Self {
        Self {
            ad_id: ad.id,
            title: ad.title,
            text: ad.text,
            author_id: ad.author_id,
            published: ad.published,
            created_at: ad.created_at,
            updated_at: ad.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub nickname: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self { user_id: u.id, nickname: u.nickname, email: u.email }
    }
}

pub fn ads_response(ads: Vec<Ad>) -> Vec<AdResponse> {
    ads.into_iter().map(AdResponse::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub text: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChangeAdStatusRequest {
    pub published: bool,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdRequest {
    pub title: String,
    pub text: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAdRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct FilterAdsRequest {
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nickname: String,
    pub email: String,
}
