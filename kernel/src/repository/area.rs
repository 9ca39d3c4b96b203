use crate::model::{
    area::{event::CreateArea, CommonArea},
    id::AreaId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AreaRepository: Send + Sync {
    // 共用エリアを登録する
    async fn create(&self, event: CreateArea) -> AppResult<AreaId>;
    // すべての共用エリアを取得する（予約ルールは読み込まない）
    async fn find_all(&self) -> AppResult<Vec<CommonArea>>;
    // 共用エリアを利用可能設定・アクティブな予約ルールと合わせて取得する
    async fn find_by_id(&self, area_id: AreaId) -> AppResult<Option<CommonArea>>;
}
