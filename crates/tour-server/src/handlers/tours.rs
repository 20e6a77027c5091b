//! Tour authoring and catalogue endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tour_core::{CreateTour, Id, KeyPoint, KeyPointInput, Tour, UpdateTour};

use super::TourList;
use crate::{
    error::ApiError,
    extract::{ApiJson, ApiPath},
    identity::{Caller, Role},
    AppState,
};

type ApiResult<T> = Result<T, ApiError>;

/// `POST /tours`
pub async fn create_tour(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(params): ApiJson<CreateTour>,
) -> ApiResult<(StatusCode, Json<Tour>)> {
    let author = caller.require(Role::Guide)?;
    let tour = state.service.create_tour(&params, author).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

/// `GET /tours`
pub async fn list_published(
    State(state): State<AppState>,
    _caller: Caller,
) -> ApiResult<Json<TourList>> {
    let tours = state.service.list_published_tours().await?;
    Ok(Json(tours.into()))
}

/// `GET /tours/mine`
pub async fn list_mine(State(state): State<AppState>, caller: Caller) -> ApiResult<Json<TourList>> {
    let author = caller.require(Role::Guide)?;
    let tours = state.service.list_tours_by_author(author).await?;
    Ok(Json(tours.into()))
}

/// `GET /tours/purchased`
pub async fn list_purchased(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<TourList>> {
    let tourist = caller.require(Role::Tourist)?;
    let tours = state.service.list_purchased_tours(tourist).await?;
    Ok(Json(tours.into()))
}

/// `GET /tours/:id`
pub async fn get_tour(
    State(state): State<AppState>,
    _caller: Caller,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<Json<Tour>> {
    let tour = state.service.get_tour(&Id { id }).await?;
    Ok(Json(tour))
}

/// `PUT /tours/:id`
pub async fn update_tour(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(params): ApiJson<UpdateTour>,
) -> ApiResult<Json<Tour>> {
    let author = caller.require(Role::Guide)?;
    let tour = state.service.update_tour(&Id { id }, &params, author).await?;
    Ok(Json(tour))
}

/// `POST /tours/:id/key-points`
pub async fn add_key_point(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(input): ApiJson<KeyPointInput>,
) -> ApiResult<(StatusCode, Json<KeyPoint>)> {
    let author = caller.require(Role::Guide)?;
    let key_point = state
        .service
        .add_key_point(&Id { id }, &input, author)
        .await?;
    Ok((StatusCode::CREATED, Json(key_point)))
}

/// `PUT /tours/:id/publish`
pub async fn publish_tour(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<StatusCode> {
    let author = caller.require(Role::Guide)?;
    state.service.publish_tour(&Id { id }, author).await?;
    Ok(StatusCode::OK)
}

/// `PUT /tours/:id/archive`
pub async fn archive_tour(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<StatusCode> {
    let author = caller.require(Role::Guide)?;
    state.service.archive_tour(&Id { id }, author).await?;
    Ok(StatusCode::OK)
}

/// `PUT /tours/:id/unarchive`
pub async fn unarchive_tour(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
) -> ApiResult<StatusCode> {
    let author = caller.require(Role::Guide)?;
    state.service.unarchive_tour(&Id { id }, author).await?;
    Ok(StatusCode::OK)
}
