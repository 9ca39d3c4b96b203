use crate::model::id::{AreaId, PropertyId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new, Debug, Clone)]
pub struct CreateReservation {
    pub area_id: AreaId,
    pub reserved_by: UserId,
    pub property_id: PropertyId,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub attendees: i32,
}

#[derive(new, Debug, Clone)]
pub struct ApproveReservation {
    pub reservation_id: ReservationId,
    pub approved_by: UserId,
}

#[derive(new, Debug, Clone)]
pub struct RejectReservation {
    pub reservation_id: ReservationId,
    pub rejected_by: UserId,
    pub reason: String,
}

#[derive(new, Debug, Clone)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub requested_by: UserId,
    pub reason: Option<String>,
    // 管理者向けの明示的なオーバーライド。キャンセルポリシーの確認を省略する
    pub override_capable: bool,
}
