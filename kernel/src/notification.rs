use crate::model::{
    id::{ReservationId, UserId},
    notification::NotificationType,
};
use async_trait::async_trait;
use shared::error::AppResult;

// 予約のステータス変化をユーザーへ通知するための口。
// 通知の失敗を予約処理の成否に影響させてはならない（呼び出し側でログに留める）
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn notify(
        &self,
        recipient: UserId,
        reservation_id: ReservationId,
        notification_type: NotificationType,
        message: String,
    ) -> AppResult<()>;
}
