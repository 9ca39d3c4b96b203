use crate::model::id::{AreaId, PropertyId, ReservationId, UserId};
use crate::model::interval::TimeSlot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod event;

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub area: ReservationArea,
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

impl Reservation {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.start_at,
            end: self.end_at,
        }
    }
}

// 予約に紐づく共用エリアの要約
#[derive(Debug, Clone)]
pub struct ReservationArea {
    pub area_id: AreaId,
    pub name: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    // 予約枠を塞ぐ（重複判定の対象になる）ステータス
    pub const BLOCKING: [ReservationStatus; 2] = [Self::Pending, Self::Approved];

    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }

    // 許可されるステータス遷移:
    //   PENDING  -> APPROVED / REJECTED / CANCELLED
    //   APPROVED -> CANCELLED / COMPLETED
    // 終端ステータスからの遷移は一切認めない
    pub fn can_transition(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Approved, Cancelled)
                | (Approved, Completed)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}
