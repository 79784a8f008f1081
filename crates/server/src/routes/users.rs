use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    Json,
};

use crate::errors::ApiError;
use crate::presenters::{CreateUserRequest, Envelope, UserResponse};
use crate::state::ServerState;

type UserResult = Result<Json<Envelope<UserResponse>>, ApiError>;

/// POST /users
pub async fn create_user(
    State(state): State<ServerState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> UserResult {
    let Json(req) = payload?;
    let user = state.board.create_user(&req.nickname, &req.email)?;
    Ok(Json(Envelope::data(user.into())))
}

/// GET /users
pub async fn list_users(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<UserResponse>>>, ApiError> {
    let users = state.board.list_users()?;
    Ok(Json(Envelope::data(users.into_iter().map(UserResponse::from).collect())))
}

/// GET /users/:user_id
pub async fn get_user(State(state): State<ServerState>, user_id: Result<Path<i64>, PathRejection>) -> UserResult {
    let Path(user_id) = user_id?;
    let user = state.board.get_user(user_id)?;
    Ok(Json(Envelope::data(user.into())))
}

/// DELETE /users/:user_id
pub async fn delete_user(
    State(state): State<ServerState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Path(user_id) = user_id?;
    state.board.delete_user(user_id)?;
    Ok(Json(Envelope::empty()))
}
