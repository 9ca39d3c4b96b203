use crate::model::{
    area::CommonArea,
    id::{AreaId, ReservationId},
    notification::NotificationType,
    reservation::{
        event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
        Reservation, ReservationStatus,
    },
};
use crate::notification::NotificationEmitter;
use crate::repository::{area::AreaRepository, reservation::ReservationRepository};
use crate::service::{availability, conflict::ConflictDetector, policy};
use chrono::Utc;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

// 予約のライフサイクル（作成・承認・却下・キャンセル・完了）を束ねるサービス。
// ここでの重複チェックは利用者に正確なエラーを返すための事前確認であり、
// 最終的な整合性はリポジトリ側のトランザクションが保証する
pub struct ReservationLifecycle {
    area_repository: Arc<dyn AreaRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    conflict_detector: ConflictDetector,
    notification_emitter: Arc<dyn NotificationEmitter>,
}

impl ReservationLifecycle {
    pub fn new(
        area_repository: Arc<dyn AreaRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        notification_emitter: Arc<dyn NotificationEmitter>,
    ) -> Self {
        let conflict_detector = ConflictDetector::new(reservation_repository.clone());
        Self {
            area_repository,
            reservation_repository,
            conflict_detector,
            notification_emitter,
        }
    }

    pub async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let area = self.find_area(event.area_id).await?;

        policy::validate(
            &area,
            event.start_at,
            event.end_at,
            event.attendees,
            Utc::now(),
        )?;

        if !availability::within_operating_hours(
            area.availability.as_ref(),
            event.start_at,
            event.end_at,
        ) {
            return Err(AppError::UnprocessableEntity(format!(
                "共用エリア「{}」の営業時間外のため予約できません",
                area.name
            )));
        }

        if let Some(conflicting) = self
            .conflict_detector
            .find_conflicts(event.area_id, event.start_at, event.end_at, None)
            .await?
            .first()
        {
            return Err(AppError::SchedulingConflict {
                conflicting_id: conflicting.id.raw(),
                area_name: area.name,
            });
        }

        let reservation = self.reservation_repository.create(event).await?;

        let message = match reservation.status {
            ReservationStatus::Pending => format!(
                "「{}」の予約リクエストを受け付けました。承認をお待ちください",
                area.name
            ),
            _ => format!("「{}」の予約が確定しました", area.name),
        };
        self.notify(&reservation, NotificationType::Confirmation, message)
            .await;

        Ok(reservation)
    }

    pub async fn approve(&self, event: ApproveReservation) -> AppResult<Reservation> {
        let current = self.find_reservation(event.reservation_id).await?;
        ensure_transition(current.status, ReservationStatus::Approved)?;

        // 申請後に別の予約が確定している可能性があるため、承認前にも重複を確認する
        if let Some(conflicting) = self
            .conflict_detector
            .find_conflicts(
                current.area.area_id,
                current.start_at,
                current.end_at,
                Some(current.id),
            )
            .await?
            .first()
        {
            return Err(AppError::SchedulingConflict {
                conflicting_id: conflicting.id.raw(),
                area_name: current.area.name,
            });
        }

        let reservation = self.reservation_repository.approve(event).await?;

        let message = format!("「{}」の予約が承認されました", reservation.area.name);
        self.notify(&reservation, NotificationType::Confirmation, message)
            .await;

        Ok(reservation)
    }

    pub async fn reject(&self, event: RejectReservation) -> AppResult<Reservation> {
        let current = self.find_reservation(event.reservation_id).await?;
        ensure_transition(current.status, ReservationStatus::Rejected)?;

        let reservation = self.reservation_repository.reject(event).await?;

        let message = format!(
            "「{}」の予約が却下されました。理由: {}",
            reservation.area.name,
            reservation.rejection_reason.as_deref().unwrap_or("-")
        );
        self.notify(&reservation, NotificationType::Rejection, message)
            .await;

        Ok(reservation)
    }

    pub async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation> {
        let current = self.find_reservation(event.reservation_id).await?;
        ensure_transition(current.status, ReservationStatus::Cancelled)?;

        if !event.override_capable && event.requested_by != current.reserved_by {
            return Err(AppError::UnprocessableEntity(
                "予約者本人のみキャンセルできます".into(),
            ));
        }

        let area = self.find_area(current.area.area_id).await?;
        policy::can_cancel(&area.rules, &current, Utc::now(), event.override_capable)?;

        let reservation = self.reservation_repository.cancel(event).await?;

        let message = format!("「{}」の予約がキャンセルされました", reservation.area.name);
        self.notify(&reservation, NotificationType::Cancellation, message)
            .await;

        Ok(reservation)
    }

    pub async fn complete(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let current = self.find_reservation(reservation_id).await?;
        ensure_transition(current.status, ReservationStatus::Completed)?;

        self.reservation_repository.complete(reservation_id).await
    }

    pub async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.find_reservation(reservation_id).await
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<CommonArea> {
        self.area_repository
            .find_by_id(area_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("共用エリア（{area_id}）が見つかりませんでした。"))
            })
    }

    async fn find_reservation(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.reservation_repository
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("予約（{reservation_id}）が見つかりませんでした。"))
            })
    }

    // 通知の失敗は予約処理の成否に影響させず、ログに残すだけにする
    async fn notify(
        &self,
        reservation: &Reservation,
        notification_type: NotificationType,
        message: String,
    ) {
        if let Err(e) = self
            .notification_emitter
            .notify(
                reservation.reserved_by,
                reservation.id,
                notification_type,
                message,
            )
            .await
        {
            tracing::warn!(
                error.cause_chain = ?e,
                reservation_id = %reservation.id,
                "通知の送信に失敗しました"
            );
        }
    }
}

fn ensure_transition(current: ReservationStatus, requested: ReservationStatus) -> AppResult<()> {
    if !current.can_transition(requested) {
        return Err(AppError::InvalidStateTransition {
            current: current.to_string(),
            requested: requested.to_string(),
        });
    }
    Ok(())
}
