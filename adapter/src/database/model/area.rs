use kernel::model::{
    area::{AvailabilityConfig, CommonArea, ReservationRule},
    id::{AreaId, RuleId},
};
use sqlx::types::chrono::NaiveTime;

// common_areas テーブルのレコード
#[derive(sqlx::FromRow)]
pub struct AreaRow {
    pub area_id: AreaId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub requires_approval: bool,
    pub has_fee: bool,
    pub fee_amount: Option<f64>,
    pub is_active: bool,
}

impl AreaRow {
    // 利用可能設定とアクティブな予約ルールを合わせてドメインモデルを組み立てる
    pub fn into_common_area(
        self,
        availability: Option<AvailabilityConfigRow>,
        rules: Vec<RuleRow>,
    ) -> CommonArea {
        let AreaRow {
            area_id,
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
            is_active,
        } = self;
        CommonArea {
            id: area_id,
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
            is_active,
            availability: availability.map(AvailabilityConfig::from),
            rules: rules.into_iter().map(ReservationRule::from).collect(),
        }
    }
}

// availability_configs テーブルのレコード。共用エリアと 1 対 1
#[derive(sqlx::FromRow)]
pub struct AvailabilityConfigRow {
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

impl From<AvailabilityConfigRow> for AvailabilityConfig {
    fn from(value: AvailabilityConfigRow) -> Self {
        let AvailabilityConfigRow {
            monday_open,
            monday_close,
            tuesday_open,
            tuesday_close,
            wednesday_open,
            wednesday_close,
            thursday_open,
            thursday_close,
            friday_open,
            friday_close,
            saturday_open,
            saturday_close,
            sunday_open,
            sunday_close,
        } = value;
        AvailabilityConfig {
            monday_open,
            monday_close,
            tuesday_open,
            tuesday_close,
            wednesday_open,
            wednesday_close,
            thursday_open,
            thursday_close,
            friday_open,
            friday_close,
            saturday_open,
            saturday_close,
            sunday_open,
            sunday_close,
        }
    }
}

// reservation_rules テーブルのレコード
#[derive(sqlx::FromRow)]
pub struct RuleRow {
    pub rule_id: RuleId,
    pub area_id: AreaId,
    pub allow_cancellation: bool,
    pub cancellation_hours: i32,
    pub min_duration_minutes: Option<i32>,
    pub max_duration_minutes: Option<i32>,
    pub max_advance_days: Option<i32>,
    pub max_attendees: Option<i32>,
    pub is_active: bool,
}

impl From<RuleRow> for ReservationRule {
    fn from(value: RuleRow) -> Self {
        let RuleRow {
            rule_id,
            area_id,
            allow_cancellation,
            cancellation_hours,
            min_duration_minutes,
            max_duration_minutes,
            max_advance_days,
            max_attendees,
            is_active,
        } = value;
        ReservationRule {
            id: rule_id,
            area_id,
            allow_cancellation,
            cancellation_hours,
            min_duration_minutes,
            max_duration_minutes,
            max_advance_days,
            max_attendees,
            is_active,
        }
    }
}
