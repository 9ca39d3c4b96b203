use crate::model::{
    area::{AreasResponse, AreaResponse, CreateAreaRequest},
    availability::{AvailabilityQuery, AvailabilityResponse},
    conflict::{ConflictQuery, ConflictsResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::AreaId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_area(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateAreaRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    registry
        .area_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_area_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AreasResponse>> {
    registry
        .area_repository()
        .find_all()
        .await
        .map(AreasResponse::from)
        .map(Json)
}

pub async fn show_area(
    Path(area_id): Path<AreaId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AreaResponse>> {
    registry
        .area_repository()
        .find_by_id(area_id)
        .await?
        .map(AreaResponse::from)
        .map(Json)
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("共用エリア（{area_id}）が見つかりませんでした。"))
        })
}

// 指定期間の空き状況を日単位で返す
pub async fn show_area_availability(
    Path(area_id): Path<AreaId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let days = registry
        .availability_engine()
        .get_availability(area_id, query.from, query.to)
        .await?;

    Ok(Json(AvailabilityResponse {
        area_id,
        days: days.into_iter().map(Into::into).collect(),
    }))
}

// 指定区間と重なる予約（PENDING / APPROVED）を開始時刻順に返す
pub async fn show_area_conflicts(
    Path(area_id): Path<AreaId>,
    Query(query): Query<ConflictQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ConflictsResponse>> {
    let conflicts = registry
        .conflict_detector()
        .find_conflicts(area_id, query.from, query.to, query.exclude)
        .await?;

    Ok(Json(ConflictsResponse {
        area_id,
        conflicts: conflicts.into_iter().map(Into::into).collect(),
    }))
}
