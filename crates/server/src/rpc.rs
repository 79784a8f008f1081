//! RPC surface: one method per board operation.
//!
//! Calls are `POST /rpc/AdService/{Method}` with a JSON request message. A
//! success returns the bare response message; a failure returns
//! `{"code": "...", "message": "..."}` with an HTTP status matching the code.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use models::{Ad, User};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use service::{InMemoryBoard, ServiceError};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{info, warn};

use crate::filters::parse_filter;
use crate::routes::{panic_response, trace_layer};
use crate::state::ServerState;

pub const SERVICE_PREFIX: &str = "/rpc/AdService";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RpcCode {
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Internal,
    Unimplemented,
}

impl RpcCode {
    pub fn http_status(self) -> StatusCode {
        match self {
            RpcCode::InvalidArgument => StatusCode::BAD_REQUEST,
            RpcCode::NotFound => StatusCode::NOT_FOUND,
            RpcCode::PermissionDenied => StatusCode::FORBIDDEN,
            RpcCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            RpcCode::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl From<&ServiceError> for RpcCode {
    fn from(e: &ServiceError) -> Self {
        match e {
            ServiceError::Validation(_) => RpcCode::InvalidArgument,
            ServiceError::NotFound(_) => RpcCode::NotFound,
            ServiceError::Unauthorized(_) => RpcCode::PermissionDenied,
            ServiceError::Internal(_) => RpcCode::Internal,
        }
    }
}

/// Error status returned by every RPC method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: RpcCode,
    pub message: String,
}

impl RpcStatus {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<ServiceError> for RpcStatus {
    fn from(e: ServiceError) -> Self {
        Self::new(RpcCode::from(&e), e.to_string())
    }
}

impl IntoResponse for RpcStatus {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub title: String,
    pub text: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ChangeAdStatusRequest {
    pub ad_id: i64,
    pub user_id: i64,
    pub published: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAdRequest {
    pub ad_id: i64,
    pub title: String,
    pub text: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GetAdRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GetAdByTitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ListAdsByFilterRequest {
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAdRequest {
    pub ad_id: i64,
    pub author_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct GetUserRequest {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    pub id: i64,
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
            id: ad.id,
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
pub struct ListAdResponse {
    pub list: Vec<AdResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub nickname: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self { id: u.id, nickname: u.nickname, email: u.email }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListUserResponse {
    pub list: Vec<UserResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Empty {}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RpcStatus> {
    // an absent body is the empty message
    let body: &[u8] = if body.is_empty() { b"{}" } else { body };
    serde_json::from_slice(body).map_err(|e| RpcStatus::new(RpcCode::InvalidArgument, e.to_string()))
}

fn reply<T: Serialize>(msg: T) -> Result<Value, RpcStatus> {
    serde_json::to_value(msg).map_err(|e| RpcStatus::new(RpcCode::Internal, e.to_string()))
}

fn list_ads(ads: Vec<Ad>) -> ListAdResponse {
    ListAdResponse { list: ads.into_iter().map(AdResponse::from).collect() }
}

/// Route a decoded call to the board.
pub fn dispatch(board: &InMemoryBoard, method: &str, body: &[u8]) -> Result<Value, RpcStatus> {
    match method {
        "CreateAd" => {
            let req: CreateAdRequest = decode(body)?;
            reply(AdResponse::from(board.create_ad(&req.title, &req.text, req.user_id)?))
        }
        "ChangeAdStatus" => {
            let req: ChangeAdStatusRequest = decode(body)?;
            reply(AdResponse::from(board.change_ad_status(req.ad_id, req.user_id, req.published)?))
        }
        "UpdateAd" => {
            let req: UpdateAdRequest = decode(body)?;
            reply(AdResponse::from(board.update_ad(req.ad_id, req.user_id, &req.title, &req.text)?))
        }
        "GetAd" => {
            let req: GetAdRequest = decode(body)?;
            reply(AdResponse::from(board.get_ad(req.id)?))
        }
        "GetAdByTitle" => {
            let req: GetAdByTitleRequest = decode(body)?;
            reply(AdResponse::from(board.get_ad_by_title(&req.title)?))
        }
        "ListAds" => {
            let _: Empty = decode(body)?;
            reply(list_ads(board.list_published_ads()?))
        }
        "ListAdsByFilter" => {
            let req: ListAdsByFilterRequest = decode(body)?;
            let filter = parse_filter(&req.params)?;
            reply(list_ads(board.list_ads_by_filter(&filter)?))
        }
        "DeleteAd" => {
            let req: DeleteAdRequest = decode(body)?;
            board.delete_ad(req.ad_id, req.author_id)?;
            reply(Empty {})
        }
        "CreateUser" => {
            let req: CreateUserRequest = decode(body)?;
            reply(UserResponse::from(board.create_user(&req.nickname, &req.email)?))
        }
        "GetUser" => {
            let req: GetUserRequest = decode(body)?;
            reply(UserResponse::from(board.get_user(req.id)?))
        }
        "DeleteUser" => {
            let req: DeleteUserRequest = decode(body)?;
            board.delete_user(req.id)?;
            reply(Empty {})
        }
        "ListUsers" => {
            let _: Empty = decode(body)?;
            let list = board.list_users()?.into_iter().map(UserResponse::from).collect();
            reply(ListUserResponse { list })
        }
        other => Err(RpcStatus::new(RpcCode::Unimplemented, format!("unknown method AdService/{other}"))),
    }
}

async fn call(State(state): State<ServerState>, Path(method): Path<String>, body: Bytes) -> Response {
    let started = Instant::now();
    let result = dispatch(&state.board, &method, &body);
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(msg) => {
            info!(%method, elapsed_ms, "rpc ok");
            (StatusCode::OK, Json(msg)).into_response()
        }
        Err(status) => {
            warn!(%method, elapsed_ms, code = ?status.code, error = %status.message, "rpc failed");
            status.into_response()
        }
    }
}

/// Build the RPC router; it shares the board with the HTTP router through `state`.
pub fn build_rpc_router(state: ServerState) -> Router {
    Router::new()
        .route(&format!("{SERVICE_PREFIX}/:method"), post(call))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer())
}
