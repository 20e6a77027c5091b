//! Tour execution endpoints. All of them are for tourists only.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tour_core::{EndExecution, Id, Position, ProximityResult, StartExecution, TourExecution};

use crate::{
    error::ApiError,
    extract::{ApiJson, ApiPath},
    identity::{Caller, Role},
    AppState,
};

type ApiResult<T> = Result<T, ApiError>;

/// `POST /tours/executions`
pub async fn start_execution(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(params): ApiJson<StartExecution>,
) -> ApiResult<(StatusCode, Json<TourExecution>)> {
    let tourist = caller.require(Role::Tourist)?;
    let execution = state.service.start_execution(&params, tourist).await?;
    Ok((StatusCode::CREATED, Json(execution)))
}

/// `GET /tours/executions/active`
pub async fn active_execution(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<TourExecution>> {
    let tourist = caller.require(Role::Tourist)?;
    let execution = state.service.active_execution(tourist).await?;
    Ok(Json(execution))
}

/// `POST /tours/executions/:id/check-proximity`
pub async fn check_proximity(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(position): ApiJson<Position>,
) -> ApiResult<Json<ProximityResult>> {
    let tourist = caller.require(Role::Tourist)?;
    let result = state
        .service
        .check_proximity(&Id { id }, position, tourist)
        .await?;
    Ok(Json(result))
}

/// `PUT /tours/executions/:id/end`
pub async fn end_execution(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<u64>,
    ApiJson(params): ApiJson<EndExecution>,
) -> ApiResult<Json<TourExecution>> {
    let tourist = caller.require(Role::Tourist)?;
    let execution = state
        .service
        .end_execution(&Id { id }, &params, tourist)
        .await?;
    Ok(Json(execution))
}
