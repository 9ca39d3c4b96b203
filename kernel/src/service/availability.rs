use crate::model::{
    area::AvailabilityConfig,
    id::AreaId,
    interval::{self, TimeSlot},
    reservation::{Reservation, ReservationStatus},
};
use crate::repository::{area::AreaRepository, reservation::ReservationRepository};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

// 1 日分の空き状況
#[derive(Debug)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub free: Vec<TimeSlot>,
    pub occupied: Vec<TimeSlot>,
}

// その日の営業時間帯を UTC の時刻範囲として返す。
// 利用可能設定が未登録のエリアは終日利用可能、
// 設定はあるが該当曜日の枠がない日は休業として None を返す
pub fn operating_window(
    config: Option<&AvailabilityConfig>,
    date: NaiveDate,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match config {
        None => {
            let open = date.and_time(NaiveTime::MIN).and_utc();
            let close = date
                .checked_add_days(Days::new(1))?
                .and_time(NaiveTime::MIN)
                .and_utc();
            Some((open, close))
        }
        Some(config) => {
            let (open, close) = config.window_for(date.weekday())?;
            Some((date.and_time(open).and_utc(), date.and_time(close).and_utc()))
        }
    }
}

// 予約作成時の営業時間チェック。日をまたぐ指定は許可しない
pub fn within_operating_hours(
    config: Option<&AvailabilityConfig>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    if start.date_naive() != end.date_naive() {
        return false;
    }
    let Some((open_at, close_at)) = operating_window(config, start.date_naive()) else {
        return false;
    };
    open_at <= start && end <= close_at
}

// 営業時間帯から予約済みの区間を差し引いて 1 日分の空き状況を組み立てる。
// 日をまたぐ予約はその日の枠に切り詰めて計上する
pub fn day_availability(
    date: NaiveDate,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    reservations: &[Reservation],
) -> DayAvailability {
    let Some((open_at, close_at)) = window else {
        // 休業日は空き・埋まりのどちらも計上しない
        return DayAvailability {
            date,
            free: Vec::new(),
            occupied: Vec::new(),
        };
    };

    let mut occupied: Vec<TimeSlot> = reservations
        .iter()
        .filter(|r| r.status.is_blocking())
        .filter(|r| interval::overlaps(r.start_at, r.end_at, open_at, close_at))
        .map(|r| TimeSlot {
            start: r.start_at.max(open_at),
            end: r.end_at.min(close_at),
        })
        .collect();
    occupied.sort_by_key(|slot| (slot.start, slot.end));

    let mut free = Vec::new();
    let mut cursor = open_at;
    for slot in &occupied {
        if slot.start > cursor {
            free.push(TimeSlot {
                start: cursor,
                end: slot.start,
            });
        }
        cursor = cursor.max(slot.end);
    }
    if cursor < close_at {
        free.push(TimeSlot {
            start: cursor,
            end: close_at,
        });
    }

    DayAvailability {
        date,
        free,
        occupied,
    }
}

// 共用エリアの空き状況を日単位で計算するエンジン。
// 内部に状態を持たず、呼び出しのたびに最新の予約から計算し直す
#[derive(new)]
pub struct AvailabilityEngine {
    area_repository: Arc<dyn AreaRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    max_range_days: i64,
}

impl AvailabilityEngine {
    pub async fn get_availability(
        &self,
        area_id: AreaId,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> AppResult<Vec<DayAvailability>> {
        if range_end < range_start {
            return Err(AppError::InvalidInterval);
        }
        let span_days = (range_end - range_start).num_days() + 1;
        if span_days > self.max_range_days {
            return Err(AppError::UnprocessableEntity(format!(
                "取得範囲が長すぎます: 一度に取得できるのは {} 日までです",
                self.max_range_days
            )));
        }

        let area = self
            .area_repository
            .find_by_id(area_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("共用エリア（{area_id}）が見つかりませんでした。"))
            })?;

        // 範囲全体と交差する予約を一度だけ取得し、日ごとに切り出す
        let fetch_start = range_start.and_time(NaiveTime::MIN).and_utc();
        let fetch_end = range_end
            .checked_add_days(Days::new(1))
            .ok_or(AppError::InvalidInterval)?
            .and_time(NaiveTime::MIN)
            .and_utc();
        let reservations = self
            .reservation_repository
            .find_by_area_and_range(area_id, fetch_start, fetch_end, &ReservationStatus::BLOCKING)
            .await?;

        let mut days = Vec::with_capacity(span_days as usize);
        let mut date = range_start;
        while date <= range_end {
            let window = operating_window(area.availability.as_ref(), date);
            days.push(day_availability(date, window, &reservations));
            date = date.succ_opt().ok_or(AppError::InvalidInterval)?;
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        area::{event::CreateArea, CommonArea},
        id::{PropertyId, ReservationId, UserId},
        reservation::{
            event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
            ReservationArea,
        },
    };
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FixedArea(Option<CommonArea>);

    #[async_trait]
    impl AreaRepository for FixedArea {
        async fn create(&self, _event: CreateArea) -> AppResult<crate::model::id::AreaId> {
            unimplemented!()
        }
        async fn find_all(&self) -> AppResult<Vec<CommonArea>> {
            Ok(self.0.clone().into_iter().collect())
        }
        async fn find_by_id(
            &self,
            _area_id: crate::model::id::AreaId,
        ) -> AppResult<Option<CommonArea>> {
            Ok(self.0.clone())
        }
    }

    struct NoReservations;

    #[async_trait]
    impl ReservationRepository for NoReservations {
        async fn create(&self, _event: CreateReservation) -> AppResult<Reservation> {
            unimplemented!()
        }
        async fn approve(&self, _event: ApproveReservation) -> AppResult<Reservation> {
            unimplemented!()
        }
        async fn reject(&self, _event: RejectReservation) -> AppResult<Reservation> {
            unimplemented!()
        }
        async fn cancel(&self, _event: CancelReservation) -> AppResult<Reservation> {
            unimplemented!()
        }
        async fn complete(&self, _reservation_id: ReservationId) -> AppResult<Reservation> {
            unimplemented!()
        }
        async fn find_by_id(
            &self,
            _reservation_id: ReservationId,
        ) -> AppResult<Option<Reservation>> {
            unimplemented!()
        }
        async fn find_by_area_and_range(
            &self,
            _area_id: AreaId,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
            _statuses: &[crate::model::reservation::ReservationStatus],
        ) -> AppResult<Vec<Reservation>> {
            Ok(Vec::new())
        }
    }

    // 2026-08-31 は月曜日
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
    }

    fn monday_config() -> AvailabilityConfig {
        AvailabilityConfig {
            monday_open: NaiveTime::from_hms_opt(8, 0, 0),
            monday_close: NaiveTime::from_hms_opt(20, 0, 0),
            ..Default::default()
        }
    }

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, min, 0).unwrap()
    }

    fn reservation(start: DateTime<Utc>, end: DateTime<Utc>, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            area: ReservationArea {
                area_id: AreaId::new(),
                name: "パーティールーム".into(),
            },
            reserved_by: UserId::new(),
            property_id: PropertyId::new(),
            title: "test".into(),
            description: None,
            start_at: start,
            end_at: end,
            status,
            attendees: 1,
            requires_payment: false,
            payment_amount: None,
            payment_status: None,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn open_day_without_reservations_is_one_free_slot() {
        let window = operating_window(Some(&monday_config()), monday());
        let day = day_availability(monday(), window, &[]);

        assert_eq!(day.occupied.len(), 0);
        assert_eq!(day.free.len(), 1);
        assert_eq!(day.free[0].start, at(31, 8, 0));
        assert_eq!(day.free[0].end, at(31, 20, 0));
    }

    #[test]
    fn closed_day_has_neither_free_nor_occupied_slots() {
        // 月曜以外の設定がないので火曜は休業
        let tuesday = monday().succ_opt().unwrap();
        let window = operating_window(Some(&monday_config()), tuesday);
        let existing = reservation(at(31, 10, 0), at(31, 12, 0), ReservationStatus::Approved);
        let day = day_availability(tuesday, window, &[existing]);

        assert!(day.free.is_empty());
        assert!(day.occupied.is_empty());
    }

    #[test]
    fn missing_config_means_open_around_the_clock() {
        let window = operating_window(None, monday()).unwrap();
        assert_eq!(window.0, at(31, 0, 0));
        assert_eq!(
            window.1,
            Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn occupied_slots_split_the_operating_window() {
        let window = operating_window(Some(&monday_config()), monday());
        let existing = vec![
            reservation(at(31, 10, 0), at(31, 12, 0), ReservationStatus::Approved),
            reservation(at(31, 15, 0), at(31, 16, 0), ReservationStatus::Pending),
        ];
        let day = day_availability(monday(), window, &existing);

        assert_eq!(day.occupied.len(), 2);
        assert_eq!(day.free.len(), 3);
        assert_eq!((day.free[0].start, day.free[0].end), (at(31, 8, 0), at(31, 10, 0)));
        assert_eq!((day.free[1].start, day.free[1].end), (at(31, 12, 0), at(31, 15, 0)));
        assert_eq!((day.free[2].start, day.free[2].end), (at(31, 16, 0), at(31, 20, 0)));
    }

    #[test]
    fn non_blocking_reservations_do_not_occupy_slots() {
        let window = operating_window(Some(&monday_config()), monday());
        let existing = vec![
            reservation(at(31, 10, 0), at(31, 12, 0), ReservationStatus::Cancelled),
            reservation(at(31, 13, 0), at(31, 14, 0), ReservationStatus::Rejected),
            reservation(at(31, 15, 0), at(31, 16, 0), ReservationStatus::Completed),
        ];
        let day = day_availability(monday(), window, &existing);

        assert!(day.occupied.is_empty());
        assert_eq!(day.free.len(), 1);
    }

    #[test]
    fn midnight_spanning_reservation_is_clipped_to_the_window() {
        // 前日 23:00 から月曜 9:30 までの予約は、月曜の枠では 8:00-9:30 に切り詰められる
        let window = operating_window(Some(&monday_config()), monday());
        let existing = reservation(at(30, 23, 0), at(31, 9, 30), ReservationStatus::Approved);
        let day = day_availability(monday(), window, &[existing]);

        assert_eq!(day.occupied.len(), 1);
        assert_eq!((day.occupied[0].start, day.occupied[0].end), (at(31, 8, 0), at(31, 9, 30)));
        assert_eq!(day.free.len(), 1);
        assert_eq!((day.free[0].start, day.free[0].end), (at(31, 9, 30), at(31, 20, 0)));
    }

    #[test]
    fn free_slots_never_intersect_occupied_slots() {
        let window = operating_window(Some(&monday_config()), monday());
        let existing = vec![
            reservation(at(31, 9, 0), at(31, 11, 0), ReservationStatus::Approved),
            reservation(at(31, 10, 0), at(31, 12, 0), ReservationStatus::Pending),
            reservation(at(31, 12, 0), at(31, 13, 0), ReservationStatus::Approved),
            reservation(at(31, 19, 30), at(31, 21, 0), ReservationStatus::Approved),
        ];
        let day = day_availability(monday(), window, &existing);

        for free in &day.free {
            for occupied in &day.occupied {
                assert!(!free.overlaps(occupied), "{free:?} overlaps {occupied:?}");
            }
        }
    }

    fn engine(area: Option<CommonArea>, max_range_days: i64) -> AvailabilityEngine {
        AvailabilityEngine::new(
            Arc::new(FixedArea(area)),
            Arc::new(NoReservations),
            max_range_days,
        )
    }

    fn test_area() -> CommonArea {
        CommonArea {
            id: AreaId::new(),
            name: "パーティールーム".into(),
            description: None,
            capacity: 30,
            requires_approval: false,
            has_fee: false,
            fee_amount: None,
            is_active: true,
            availability: Some(monday_config()),
            rules: Vec::new(),
        }
    }

    #[tokio::test]
    async fn engine_returns_one_entry_per_day_in_the_range() {
        let area = test_area();
        let area_id = area.id;
        let engine = engine(Some(area), 90);

        // 月曜から水曜までの 3 日分
        let days = engine
            .get_availability(area_id, monday(), monday().succ_opt().unwrap().succ_opt().unwrap())
            .await
            .unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].free.len(), 1);
        // 火曜・水曜は設定がないため休業
        assert!(days[1].free.is_empty());
        assert!(days[2].free.is_empty());
    }

    #[tokio::test]
    async fn engine_rejects_ranges_beyond_the_horizon() {
        let area = test_area();
        let area_id = area.id;
        let engine = engine(Some(area), 7);

        let too_far = monday()
            .checked_add_days(Days::new(7))
            .unwrap();
        let err = engine
            .get_availability(area_id, monday(), too_far)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let reversed = engine
            .get_availability(area_id, monday(), monday().pred_opt().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(reversed, AppError::InvalidInterval));
    }

    #[tokio::test]
    async fn engine_reports_unknown_areas() {
        let engine = engine(None, 90);
        let err = engine
            .get_availability(AreaId::new(), monday(), monday())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[test]
    fn operating_hours_check_rejects_out_of_window_and_multi_day_requests() {
        let config = monday_config();
        assert!(within_operating_hours(
            Some(&config),
            at(31, 9, 0),
            at(31, 11, 0)
        ));
        // 開始が営業開始前
        assert!(!within_operating_hours(
            Some(&config),
            at(31, 7, 0),
            at(31, 9, 0)
        ));
        // 終了が営業終了後
        assert!(!within_operating_hours(
            Some(&config),
            at(31, 19, 0),
            at(31, 21, 0)
        ));
        // 日をまたぐ指定
        assert!(!within_operating_hours(None, at(30, 23, 0), at(31, 1, 0)));
        // 設定なしは終日利用可能
        assert!(within_operating_hours(None, at(31, 0, 0), at(31, 23, 0)));
    }
}
