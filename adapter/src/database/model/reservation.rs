use kernel::model::{
    id::{AreaId, PropertyId, ReservationId, UserId},
    reservation::{PaymentStatus, Reservation, ReservationArea, ReservationStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

// 予約一覧・詳細を取得する際に使う型。
// common_areas テーブルと INNER JOIN し、エリア名も一緒に抽出する
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub area_id: AreaId,
    pub area_name: String,
    pub reserved_by: UserId,
    pub property_id: PropertyId,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub attendees: i32,
    pub requires_payment: bool,
    pub payment_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    // ステータスは TEXT で保存しているため、ここで列挙型に読み替える
    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            area_id,
            area_name,
            reserved_by,
            property_id,
            title,
            description,
            start_at,
            end_at,
            status,
            attendees,
            requires_payment,
            payment_amount,
            payment_status,
            rejection_reason,
            approved_by,
            approved_at,
            cancellation_reason,
            cancelled_at,
            created_at,
            updated_at,
        } = value;
        Ok(Reservation {
            id: reservation_id,
            area: ReservationArea {
                area_id,
                name: area_name,
            },
            reserved_by,
            property_id,
            title,
            description,
            start_at,
            end_at,
            status: status.parse::<ReservationStatus>()?,
            attendees,
            requires_payment,
            payment_amount,
            payment_status: payment_status
                .map(|s| s.parse::<PaymentStatus>())
                .transpose()?,
            rejection_reason,
            approved_by,
            approved_at,
            cancellation_reason,
            cancelled_at,
            created_at,
            updated_at,
        })
    }
}
