use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    Json,
};
use tracing::info;

use crate::errors::ApiError;
use crate::filters::parse_filter;
use crate::presenters::{
    ads_response, AdResponse, ChangeAdStatusRequest, CreateAdRequest, DeleteAdRequest, Envelope,
    FilterAdsRequest, UpdateAdRequest,
};
use crate::state::ServerState;

type AdResult = Result<Json<Envelope<AdResponse>>, ApiError>;
type AdsResult = Result<Json<Envelope<Vec<AdResponse>>>, ApiError>;

/// POST /ads
pub async fn create_ad(
    State(state): State<ServerState>,
    payload: Result<Json<CreateAdRequest>, JsonRejection>,
) -> AdResult {
    let Json(req) = payload?;
    let ad = state.board.create_ad(&req.title, &req.text, req.user_id)?;
    Ok(Json(Envelope::data(ad.into())))
}

/// PUT /ads/:ad_id/status
pub async fn change_ad_status(
    State(state): State<ServerState>,
    ad_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ChangeAdStatusRequest>, JsonRejection>,
) -> AdResult {
    let Path(ad_id) = ad_id?;
    let Json(req) = payload?;
    let ad = state.board.change_ad_status(ad_id, req.user_id, req.published)?;
    Ok(Json(Envelope::data(ad.into())))
}

/// PUT /ads/:ad_id
pub async fn update_ad(
    State(state): State<ServerState>,
    ad_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateAdRequest>, JsonRejection>,
) -> AdResult {
    let Path(ad_id) = ad_id?;
    let Json(req) = payload?;
    let ad = state.board.update_ad(ad_id, req.user_id, &req.title, &req.text)?;
    Ok(Json(Envelope::data(ad.into())))
}

/// GET /ads/:ad_id
pub async fn get_ad(State(state): State<ServerState>, ad_id: Result<Path<i64>, PathRejection>) -> AdResult {
    let Path(ad_id) = ad_id?;
    let ad = state.board.get_ad(ad_id)?;
    Ok(Json(Envelope::data(ad.into())))
}

/// GET /ads/title/:title
pub async fn get_ad_by_title(
    State(state): State<ServerState>,
    title: Result<Path<String>, PathRejection>,
) -> AdResult {
    let Path(title) = title?;
    let ad = state.board.get_ad_by_title(&title)?;
    Ok(Json(Envelope::data(ad.into())))
}

/// GET /ads — published ads only
pub async fn list_ads(State(state): State<ServerState>) -> AdsResult {
    let ads = state.board.list_published_ads()?;
    Ok(Json(Envelope::data(ads_response(ads))))
}

/// POST /ads/filter
pub async fn filter_ads(
    State(state): State<ServerState>,
    payload: Result<Json<FilterAdsRequest>, JsonRejection>,
) -> AdsResult {
    let Json(req) = payload?;
    let filter = parse_filter(&req.params)?;
    let ads = state.board.list_ads_by_filter(&filter)?;
    info!(count = ads.len(), "filtered ads");
    Ok(Json(Envelope::data(ads_response(ads))))
}

/// DELETE /ads/:ad_id
pub async fn delete_ad(
    State(state): State<ServerState>,
    ad_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteAdRequest>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Path(ad_id) = ad_id?;
    let Json(req) = payload?;
    state.board.delete_ad(ad_id, req.user_id)?;
    Ok(Json(Envelope::empty()))
}
