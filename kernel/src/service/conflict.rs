use crate::model::{
    id::{AreaId, ReservationId},
    interval,
    reservation::{Reservation, ReservationStatus},
};
use crate::repository::reservation::ReservationRepository;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

// 指定区間と重なる予約を列挙する。
// 判定対象は PENDING / APPROVED のみで、端が接するだけの予約は重複とみなさない
#[derive(new)]
pub struct ConflictDetector {
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl ConflictDetector {
    pub async fn find_conflicts(
        &self,
        area_id: AreaId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<ReservationId>,
    ) -> AppResult<Vec<Reservation>> {
        if end <= start {
            return Err(AppError::InvalidInterval);
        }
        let mut conflicts: Vec<Reservation> = self
            .reservation_repository
            .find_by_area_and_range(area_id, start, end, &ReservationStatus::BLOCKING)
            .await?
            .into_iter()
            .filter(|r| exclude != Some(r.id))
            .filter(|r| interval::overlaps(r.start_at, r.end_at, start, end))
            .collect();
        conflicts.sort_by_key(|r| r.start_at);
        Ok(conflicts)
    }
}
