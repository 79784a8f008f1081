use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use common::types::Health;

use crate::presenters::Envelope;
use crate::state::ServerState;

pub mod ads;
pub mod users;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Turn a handler panic into a 500 envelope instead of dropping the connection.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::error("internal server error"))).into_response()
}

/// Request span per call; 5xx logged at ERROR.
pub(crate) fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

/// Ad and user routes, relative to the API prefix.
pub fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/ads", post(ads::create_ad).get(ads::list_ads))
        .route("/ads/filter", post(ads::filter_ads))
        .route("/ads/title/:title", get(ads::get_ad_by_title))
        .route("/ads/:ad_id", get(ads::get_ad).put(ads::update_ad).delete(ads::delete_ad))
        .route("/ads/:ad_id/status", put(ads::change_ad_status))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/:user_id", get(users::get_user).delete(users::delete_user))
}

/// Build the full HTTP router: health check plus the versioned API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(trace_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn panics_become_500_envelopes() -> Result<(), anyhow::Error> {
        async fn boom() -> &'static str { panic!("boom") }
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));

        let res = app.oneshot(Request::builder().uri("/boom").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(res.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["error"], "internal server error");
        assert!(json["data"].is_null());
        Ok(())
    }

    #[tokio::test]
    async fn health_is_ok() -> Result<(), anyhow::Error> {
        let app = build_router(ServerState::in_memory(), CorsLayer::very_permissive());
        let res = app.oneshot(Request::builder().uri("/health").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn bad_path_id_is_400_envelope() -> Result<(), anyhow::Error> {
        let app = build_router(ServerState::in_memory(), CorsLayer::very_permissive());
        let res = app.oneshot(Request::builder().uri("/api/v1/ads/abc").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(res.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert!(json["error"].is_string());
        Ok(())
    }
}
