use crate::model::id::{AreaId, RuleId};
use chrono::{NaiveTime, Weekday};

pub mod event;

// 予約対象となる共用エリア（パーティールーム・プール・ジムなど）
#[derive(Debug, Clone)]
pub struct CommonArea {
    pub id: AreaId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub requires_approval: bool,
    pub has_fee: bool,
    pub fee_amount: Option<f64>,
    pub is_active: bool,
    // 未登録の場合は終日利用可能として扱う
    pub availability: Option<AvailabilityConfig>,
    // アクティブな予約ルールのみを保持する
    pub rules: Vec<ReservationRule>,
}

// 曜日ごとの営業時間設定。開始・終了のどちらかが欠けている曜日は休業扱い
#[derive(Debug, Clone, Default)]
pub struct AvailabilityConfig {
    pub monday_open: Option<NaiveTime>,
    pub monday_close: Option<NaiveTime>,
    pub tuesday_open: Option<NaiveTime>,
    pub tuesday_close: Option<NaiveTime>,
    pub wednesday_open: Option<NaiveTime>,
    pub wednesday_close: Option<NaiveTime>,
    pub thursday_open: Option<NaiveTime>,
    pub thursday_close: Option<NaiveTime>,
    pub friday_open: Option<NaiveTime>,
    pub friday_close: Option<NaiveTime>,
    pub saturday_open: Option<NaiveTime>,
    pub saturday_close: Option<NaiveTime>,
    pub sunday_open: Option<NaiveTime>,
    pub sunday_close: Option<NaiveTime>,
}

impl AvailabilityConfig {
    // 指定曜日の営業時間帯を返す。開始 >= 終了になっている設定は不正として休業扱い
    pub fn window_for(&self, weekday: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        let (open, close) = match weekday {
            Weekday::Mon => (self.monday_open, self.monday_close),
            Weekday::Tue => (self.tuesday_open, self.tuesday_close),
            Weekday::Wed => (self.wednesday_open, self.wednesday_close),
            Weekday::Thu => (self.thursday_open, self.thursday_close),
            Weekday::Fri => (self.friday_open, self.friday_close),
            Weekday::Sat => (self.saturday_open, self.saturday_close),
            Weekday::Sun => (self.sunday_open, self.sunday_close),
        };
        match (open, close) {
            (Some(open), Some(close)) if open < close => Some((open, close)),
            _ => None,
        }
    }
}

// 共用エリアごとの予約ルール。複数ある場合はすべてを満たす必要がある
#[derive(Debug, Clone)]
pub struct ReservationRule {
    pub id: RuleId,
    pub area_id: AreaId,
    pub allow_cancellation: bool,
    pub cancellation_hours: i32,
    pub min_duration_minutes: Option<i32>,
    pub max_duration_minutes: Option<i32>,
    pub max_advance_days: Option<i32>,
    pub max_attendees: Option<i32>,
    pub is_active: bool,
}
