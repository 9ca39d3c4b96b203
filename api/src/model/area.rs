use garde::Validate;
use kernel::model::{
    area::{event::CreateArea, CommonArea},
    id::AreaId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAreaRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    pub requires_approval: bool,
    #[garde(skip)]
    pub has_fee: bool,
    #[garde(skip)]
    pub fee_amount: Option<f64>,
}

impl From<CreateAreaRequest> for CreateArea {
    fn from(value: CreateAreaRequest) -> Self {
        let CreateAreaRequest {
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
        } = value;
        CreateArea {
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
            // 登録直後から予約を受け付ける
            is_active: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreasResponse {
    pub items: Vec<AreaResponse>,
}

impl From<Vec<CommonArea>> for AreasResponse {
    fn from(value: Vec<CommonArea>) -> Self {
        Self {
            items: value.into_iter().map(AreaResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaResponse {
    pub area_id: AreaId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub requires_approval: bool,
    pub has_fee: bool,
    pub fee_amount: Option<f64>,
    pub is_active: bool,
}

impl From<CommonArea> for AreaResponse {
    fn from(value: CommonArea) -> Self {
        let CommonArea {
            id,
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
            is_active,
            availability: _,
            rules: _,
        } = value;
        Self {
            area_id: id,
            name,
            description,
            capacity,
            requires_approval,
            has_fee,
            fee_amount,
            is_active,
        }
    }
}
