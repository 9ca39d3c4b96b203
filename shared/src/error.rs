use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("時間帯の指定が不正です: 終了時刻は開始時刻より後にしてください")]
    InvalidInterval,
    #[error("共用エリア「{0}」は現在利用できません")]
    ResourceInactive(String),
    #[error(transparent)]
    PolicyViolation(#[from] PolicyViolation),
    #[error("共用エリア「{area_name}」の指定時間帯にはすでに予約（{conflicting_id}）が存在します")]
    SchedulingConflict {
        conflicting_id: Uuid,
        area_name: String,
    },
    #[error("予約ステータスを {current} から {requested} に変更することはできません")]
    InvalidStateTransition { current: String, requested: String },
    #[error("この共用エリアではキャンセルが許可されていません")]
    CancellationNotAllowed,
    #[error("キャンセル期限を過ぎています: 開始 {required_hours} 時間前までにキャンセルしてください")]
    CancellationWindowExpired { required_hours: i64 },
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error(transparent)]
    ConversionEntityError(#[from] strum::ParseError),
}

// 予約ルール違反の内訳
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("予約時間（{actual_minutes} 分）が許可された範囲外です")]
    DurationOutOfRange {
        actual_minutes: i64,
        min_minutes: Option<i64>,
        max_minutes: Option<i64>,
    },
    #[error("参加人数（{attendees} 人）が不正です: 1 人以上を指定してください")]
    InvalidAttendeeCount { attendees: i32 },
    #[error("参加人数（{attendees} 人）が上限（{max_attendees} 人）を超えています")]
    AttendeeLimitExceeded { attendees: i32, max_attendees: i32 },
    #[error("予約開始は {max_advance_days} 日先までの日時を指定してください")]
    AdvanceWindowExceeded { max_advance_days: i64 },
    #[error("過去の日時には予約できません")]
    StartInPast,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SchedulingConflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidInterval
            | AppError::ResourceInactive(_)
            | AppError::PolicyViolation(_)
            | AppError::InvalidStateTransition { .. }
            | AppError::CancellationNotAllowed
            | AppError::CancellationWindowExpired { .. }
            | AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}
