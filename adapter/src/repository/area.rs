use crate::database::{
    model::area::{AreaRow, AvailabilityConfigRow, RuleRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    area::{event::CreateArea, CommonArea},
    id::AreaId,
};
use kernel::repository::area::AreaRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct AreaRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AreaRepository for AreaRepositoryImpl {
    async fn create(&self, event: CreateArea) -> AppResult<AreaId> {
        let area_id = AreaId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO common_areas
                (area_id, name, description, capacity,
                requires_approval, has_fee, fee_amount, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ;
            "#,
        )
        .bind(area_id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.capacity)
        .bind(event.requires_approval)
        .bind(event.has_fee)
        .bind(event.fee_amount)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No common area record has been created".into(),
            ));
        }

        Ok(area_id)
    }

    // 一覧表示用。利用可能設定と予約ルールは読み込まない
    async fn find_all(&self) -> AppResult<Vec<CommonArea>> {
        let rows = sqlx::query_as::<_, AreaRow>(
            r#"
                SELECT
                area_id, name, description, capacity,
                requires_approval, has_fee, fee_amount, is_active
                FROM common_areas
                ORDER BY name ASC
                ;
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_common_area(None, Vec::new()))
            .collect())
    }

    async fn find_by_id(&self, area_id: AreaId) -> AppResult<Option<CommonArea>> {
        let row = sqlx::query_as::<_, AreaRow>(
            r#"
                SELECT
                area_id, name, description, capacity,
                requires_approval, has_fee, fee_amount, is_active
                FROM common_areas
                WHERE area_id = $1
                ;
            "#,
        )
        .bind(area_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let availability = sqlx::query_as::<_, AvailabilityConfigRow>(
            r#"
                SELECT
                monday_open, monday_close,
                tuesday_open, tuesday_close,
                wednesday_open, wednesday_close,
                thursday_open, thursday_close,
                friday_open, friday_close,
                saturday_open, saturday_close,
                sunday_open, sunday_close
                FROM availability_configs
                WHERE area_id = $1
                ;
            "#,
        )
        .bind(area_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        // ポリシー検証の対象になるのはアクティブなルールのみ
        let rules = sqlx::query_as::<_, RuleRow>(
            r#"
                SELECT
                rule_id, area_id, allow_cancellation, cancellation_hours,
                min_duration_minutes, max_duration_minutes,
                max_advance_days, max_attendees, is_active
                FROM reservation_rules
                WHERE area_id = $1 AND is_active = TRUE
                ;
            "#,
        )
        .bind(area_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(row.into_common_area(availability, rules)))
    }
}
