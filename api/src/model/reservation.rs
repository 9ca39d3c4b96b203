use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{AreaId, PropertyId, ReservationId, UserId},
    reservation::{PaymentStatus, Reservation, ReservationArea, ReservationStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub reserved_by: UserId,
    #[garde(skip)]
    pub property_id: PropertyId,
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub start_at: DateTime<Utc>,
    #[garde(skip)]
    pub end_at: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub attendees: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveReservationRequest {
    #[garde(skip)]
    pub approved_by: UserId,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectReservationRequest {
    #[garde(skip)]
    pub rejected_by: UserId,
    // 却下理由は必須。通知の文面にそのまま使われる
    #[garde(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[garde(skip)]
    pub requested_by: UserId,
    #[garde(skip)]
    pub reason: Option<String>,
    // 管理者によるキャンセル。キャンセルポリシーと本人確認を省略する
    #[garde(skip)]
    #[serde(default)]
    pub override_capable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub area: ReservationAreaResponse,
    pub reserved_by: UserId,
    pub property_id: PropertyId,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: ReservationStatus,
    pub attendees: i32,
    pub requires_payment: bool,
    pub payment_amount: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            area,
            reserved_by,
            property_id,
            title,
            description,
            start_at,
            end_at,
            status,
            attendees,
            requires_payment,
            payment_amount,
            payment_status,
            rejection_reason,
            approved_by,
            approved_at,
            cancellation_reason,
            cancelled_at,
            created_at,
            updated_at,
        } = value;
        Self {
            reservation_id: id,
            area: area.into(),
            reserved_by,
            property_id,
            title,
            description,
            start_at,
            end_at,
            status,
            attendees,
            requires_payment,
            payment_amount,
            payment_status,
            rejection_reason,
            approved_by,
            approved_at,
            cancellation_reason,
            cancelled_at,
            created_at,
            updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationAreaResponse {
    pub area_id: AreaId,
    pub name: String,
}

impl From<ReservationArea> for ReservationAreaResponse {
    fn from(value: ReservationArea) -> Self {
        let ReservationArea { area_id, name } = value;
        Self { area_id, name }
    }
}
