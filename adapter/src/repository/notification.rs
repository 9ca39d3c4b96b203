use crate::database::ConnectionPool;
use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    id::{NotificationId, ReservationId, UserId},
    notification::NotificationType,
};
use kernel::notification::NotificationEmitter;
use shared::error::{AppError, AppResult};

// 通知をデータベースのレコードとして積む実装。
// 配信（アプリ内表示やメール送信）は通知面の別プロセスが担う
#[derive(new)]
pub struct NotificationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl NotificationEmitter for NotificationRepositoryImpl {
    async fn notify(
        &self,
        recipient: UserId,
        reservation_id: ReservationId,
        notification_type: NotificationType,
        message: String,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                INSERT INTO reservation_notifications
                (notification_id, recipient_id, reservation_id,
                notification_type, message, is_read, sent_at)
                VALUES ($1, $2, $3, $4, $5, FALSE, $6)
                ;
            "#,
        )
        .bind(NotificationId::new())
        .bind(recipient)
        .bind(reservation_id)
        .bind(notification_type.to_string())
        .bind(&message)
        .bind(Utc::now())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No notification record has been created".into(),
            ));
        }

        Ok(())
    }
}
