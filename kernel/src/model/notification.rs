use crate::model::id::{NotificationId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Confirmation,
    Rejection,
    Reminder,
    Cancellation,
}

// ステータス変化の副作用として作成される通知レコード。
// 既読管理や配信は通知面の責務であり、ここでは作成のみを扱う
#[derive(Debug, Clone)]
pub struct ReservationNotification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub reservation_id: ReservationId,
    pub notification_type: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}
