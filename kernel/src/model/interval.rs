use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::error::{AppError, AppResult};

// 半開区間 [start, end) として扱う時間帯
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

// 半開区間同士の重なり判定。
// 端点が接しているだけの場合（A の終了 = B の開始）は重ならない扱いとする
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

// 区間の長さを分単位で返す
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<i64> {
    if end <= start {
        return Err(AppError::InvalidInterval);
    }
    Ok((end - start).num_minutes())
}
