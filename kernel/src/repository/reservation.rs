use crate::model::{
    id::{AreaId, ReservationId},
    reservation::{
        event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
        Reservation, ReservationStatus,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を作成する。
    // 重複チェックと書き込みは単一のトランザクションとして実行すること
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    // PENDING の予約を承認する。承認の直前にも重複を再確認すること
    async fn approve(&self, event: ApproveReservation) -> AppResult<Reservation>;
    // PENDING の予約を却下する
    async fn reject(&self, event: RejectReservation) -> AppResult<Reservation>;
    // PENDING / APPROVED の予約をキャンセルする
    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation>;
    // APPROVED の予約を完了にする
    async fn complete(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // 予約 ID から予約を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // 指定エリア・指定範囲と交差する予約を、指定ステータスに絞って取得する
    async fn find_by_area_and_range(
        &self,
        area_id: AreaId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>>;
}
