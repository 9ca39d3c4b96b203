use crate::database::{
    model::{area::AreaRow, reservation::ReservationRow},
    ConnectionPool,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::id::{AreaId, ReservationId};
use kernel::model::reservation::{
    event::{ApproveReservation, CancelReservation, CreateReservation, RejectReservation},
    PaymentStatus, Reservation, ReservationArea, ReservationStatus,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

fn status_texts(statuses: &[ReservationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約作成操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のエリア ID をもつ共用エリアが存在するか
        // - 存在した場合、そのエリアは利用可能か
        // - その時間帯に PENDING / APPROVED の予約が存在しないか
        //
        // 上記のすべてが Yes だった場合、このブロック以降の処理に進む

        //
        // ① 共用エリアの存在確認 ＋ is_active チェック
        //
        let area_row = sqlx::query_as::<_, AreaRow>(
            r#"
            SELECT
            area_id, name, description, capacity,
            requires_approval, has_fee, fee_amount, is_active
            FROM common_areas
            WHERE area_id = $1
            "#,
        )
        .bind(event.area_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let area = match area_row {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "共用エリア（{}）が見つかりませんでした。",
                    event.area_id
                )))
            }
            Some(a) => a,
        };

        if !area.is_active {
            return Err(AppError::ResourceInactive(area.name));
        }

        //
        // ② 希望予約時間帯が既存予約と重なっていないか確認
        //    重複条件：
        //        existing.start < new.end AND new.start < existing.end
        //    端が接するだけの予約は重複とみなさない
        //
        let conflicting = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT reservation_id
            FROM reservations
            WHERE area_id = $1
              AND status = ANY($2)
              AND start_at < $4
              AND $3 < end_at
            LIMIT 1;
            "#,
        )
        .bind(event.area_id)
        .bind(status_texts(&ReservationStatus::BLOCKING))
        .bind(event.start_at)
        .bind(event.end_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(conflicting_id) = conflicting {
            return Err(AppError::SchedulingConflict {
                conflicting_id,
                area_name: area.name,
            });
        }

        // ここまでのチェックを通過すれば予約を作成する。
        // 初期ステータスと支払い情報はエリアの設定から導出する
        let status = if area.requires_approval {
            ReservationStatus::Pending
        } else {
            ReservationStatus::Approved
        };
        let payment_amount = area.has_fee.then_some(area.fee_amount).flatten();
        let payment_status = area.has_fee.then_some(PaymentStatus::Pending);

        let reservation_id = ReservationId::new();
        let now = Utc::now();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, area_id, reserved_by, property_id,
                title, description, start_at, end_at, status, attendees,
                requires_payment, payment_amount, payment_status,
                created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
                ;
            "#,
        )
        .bind(reservation_id)
        .bind(event.area_id)
        .bind(event.reserved_by)
        .bind(event.property_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_at)
        .bind(event.end_at)
        .bind(status.to_string())
        .bind(event.attendees)
        .bind(area.has_fee)
        .bind(payment_amount)
        .bind(payment_status.map(|s| s.to_string()))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            id: reservation_id,
            area: ReservationArea {
                area_id: event.area_id,
                name: area.name,
            },
            reserved_by: event.reserved_by,
            property_id: event.property_id,
            title: event.title,
            description: event.description,
            start_at: event.start_at,
            end_at: event.end_at,
            status,
            attendees: event.attendees,
            requires_payment: area.has_fee,
            payment_amount,
            payment_status,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    // 予約承認操作を行う
    async fn approve(&self, event: ApproveReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        let current = self
            .fetch_in_tx(&mut tx, event.reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "予約（{}）が見つかりませんでした。",
                    event.reservation_id
                ))
            })?;

        ensure_transition(current.status, ReservationStatus::Approved)?;

        // 申請から承認までの間に別の予約が確定している可能性があるため、
        // コミット直前にも重複を再確認する
        let conflicting = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT reservation_id
            FROM reservations
            WHERE area_id = $1
              AND reservation_id <> $2
              AND status = ANY($3)
              AND start_at < $5
              AND $4 < end_at
            LIMIT 1;
            "#,
        )
        .bind(current.area.area_id)
        .bind(current.id)
        .bind(status_texts(&ReservationStatus::BLOCKING))
        .bind(current.start_at)
        .bind(current.end_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if let Some(conflicting_id) = conflicting {
            return Err(AppError::SchedulingConflict {
                conflicting_id,
                area_name: current.area.name,
            });
        }

        let now = Utc::now();
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    approved_by = $3,
                    approved_at = $4,
                    updated_at = $4
                WHERE reservation_id = $1 AND status = $5
            "#,
        )
        .bind(current.id)
        .bind(ReservationStatus::Approved.to_string())
        .bind(event.approved_by)
        .bind(now)
        .bind(ReservationStatus::Pending.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been approved".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            status: ReservationStatus::Approved,
            approved_by: Some(event.approved_by),
            approved_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    // 予約却下操作を行う
    async fn reject(&self, event: RejectReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let current = self
            .fetch_in_tx(&mut tx, event.reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "予約（{}）が見つかりませんでした。",
                    event.reservation_id
                ))
            })?;

        ensure_transition(current.status, ReservationStatus::Rejected)?;

        let now = Utc::now();
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    rejection_reason = $3,
                    updated_at = $4
                WHERE reservation_id = $1 AND status = $5
            "#,
        )
        .bind(current.id)
        .bind(ReservationStatus::Rejected.to_string())
        .bind(&event.reason)
        .bind(now)
        .bind(ReservationStatus::Pending.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been rejected".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            status: ReservationStatus::Rejected,
            rejection_reason: Some(event.reason),
            updated_at: now,
            ..current
        })
    }

    // 予約キャンセル操作を行う
    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let current = self
            .fetch_in_tx(&mut tx, event.reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "予約（{}）が見つかりませんでした。",
                    event.reservation_id
                ))
            })?;

        ensure_transition(current.status, ReservationStatus::Cancelled)?;

        let now = Utc::now();
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    cancellation_reason = $3,
                    cancelled_at = $4,
                    updated_at = $4
                WHERE reservation_id = $1 AND status = $5
            "#,
        )
        .bind(current.id)
        .bind(ReservationStatus::Cancelled.to_string())
        .bind(&event.reason)
        .bind(now)
        .bind(current.status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been cancelled".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            status: ReservationStatus::Cancelled,
            cancellation_reason: event.reason,
            cancelled_at: Some(now),
            updated_at: now,
            ..current
        })
    }

    // 予約完了操作を行う
    async fn complete(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let current = self
            .fetch_in_tx(&mut tx, reservation_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "予約（{reservation_id}）が見つかりませんでした。"
                ))
            })?;

        ensure_transition(current.status, ReservationStatus::Completed)?;

        let now = Utc::now();
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    status = $2,
                    updated_at = $3
                WHERE reservation_id = $1 AND status = $4
            "#,
        )
        .bind(current.id)
        .bind(ReservationStatus::Completed.to_string())
        .bind(now)
        .bind(ReservationStatus::Approved.to_string())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been completed".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            status: ReservationStatus::Completed,
            updated_at: now,
            ..current
        })
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                r.reservation_id,
                r.area_id,
                a.name AS area_name,
                r.reserved_by,
                r.property_id,
                r.title,
                r.description,
                r.start_at,
                r.end_at,
                r.status,
                r.attendees,
                r.requires_payment,
                r.payment_amount,
                r.payment_status,
                r.rejection_reason,
                r.approved_by,
                r.approved_at,
                r.cancellation_reason,
                r.cancelled_at,
                r.created_at,
                r.updated_at
                FROM reservations AS r
                INNER JOIN common_areas AS a ON r.area_id = a.area_id
                WHERE r.reservation_id = $1
                ;
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Reservation::try_from)
        .transpose()
    }

    // 指定エリア・指定範囲と交差する予約を取得する。
    // 出力するレコードは、開始時刻の早い順に並べる
    async fn find_by_area_and_range(
        &self,
        area_id: AreaId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[ReservationStatus],
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                r.reservation_id,
                r.area_id,
                a.name AS area_name,
                r.reserved_by,
                r.property_id,
                r.title,
                r.description,
                r.start_at,
                r.end_at,
                r.status,
                r.attendees,
                r.requires_payment,
                r.payment_amount,
                r.payment_status,
                r.rejection_reason,
                r.approved_by,
                r.approved_at,
                r.cancellation_reason,
                r.cancelled_at,
                r.created_at,
                r.updated_at
                FROM reservations AS r
                INNER JOIN common_areas AS a ON r.area_id = a.area_id
                WHERE r.area_id = $1
                  AND r.status = ANY($2)
                  AND r.start_at < $4
                  AND $3 < r.end_at
                ORDER BY r.start_at ASC
                ;
            "#,
        )
        .bind(area_id)
        .bind(status_texts(statuses))
        .bind(start)
        .bind(end)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }
}

impl ReservationRepositoryImpl {
    // 各操作でトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // ステータス遷移系の操作で、更新前の予約をトランザクション内で取得するために
    // 内部的に使うメソッド
    async fn fetch_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(
            r#"
                SELECT
                r.reservation_id,
                r.area_id,
                a.name AS area_name,
                r.reserved_by,
                r.property_id,
                r.title,
                r.description,
                r.start_at,
                r.end_at,
                r.status,
                r.attendees,
                r.requires_payment,
                r.payment_amount,
                r.payment_status,
                r.rejection_reason,
                r.approved_by,
                r.approved_at,
                r.cancellation_reason,
                r.cancelled_at,
                r.created_at,
                r.updated_at
                FROM reservations AS r
                INNER JOIN common_areas AS a ON r.area_id = a.area_id
                WHERE r.reservation_id = $1
                ;
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Reservation::try_from)
        .transpose()
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
