use chrono::{DateTime, Utc};
use kernel::model::id::{AreaId, ReservationId};
use serde::{Deserialize, Serialize};

use crate::model::reservation::ReservationResponse;

#[derive(Debug, Deserialize)]
pub struct ConflictQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    // 変更プレビューなどで自分自身を除外したい場合に指定する
    pub exclude: Option<ReservationId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictsResponse {
    pub area_id: AreaId,
    pub conflicts: Vec<ReservationResponse>,
}
