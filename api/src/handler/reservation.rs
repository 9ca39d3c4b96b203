use crate::model::reservation::{
    ApproveReservationRequest, CancelReservationRequest, CreateReservationRequest,
    RejectReservationRequest, ReservationResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{AreaId, ReservationId},
    reservation::event::{
        ApproveReservation, CancelReservation, CreateReservation, RejectReservation,
    },
};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn reserve_area(
    Path(area_id): Path<AreaId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    let create_reservation = CreateReservation::new(
        area_id,
        req.reserved_by,
        req.property_id,
        req.title,
        req.description,
        req.start_at,
        req.end_at,
        req.attendees,
    );

    registry
        .reservation_lifecycle()
        .create(create_reservation)
        .await
        .map(|reservation| (StatusCode::CREATED, Json(reservation.into())))
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_lifecycle()
        .find_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn approve_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ApproveReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    registry
        .reservation_lifecycle()
        .approve(ApproveReservation::new(reservation_id, req.approved_by))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn reject_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RejectReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    registry
        .reservation_lifecycle()
        .reject(RejectReservation::new(
            reservation_id,
            req.rejected_by,
            req.reason,
        ))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CancelReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    registry
        .reservation_lifecycle()
        .cancel(CancelReservation::new(
            reservation_id,
            req.requested_by,
            req.reason,
            req.override_capable,
        ))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn complete_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_lifecycle()
        .complete(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}
