use chrono::NaiveDate;
use kernel::model::{id::AreaId, interval::TimeSlot};
use kernel::service::availability::DayAvailability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub area_id: AreaId,
    pub days: Vec<DayAvailabilityResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailabilityResponse {
    pub date: NaiveDate,
    pub free: Vec<TimeSlot>,
    pub occupied: Vec<TimeSlot>,
}

impl From<DayAvailability> for DayAvailabilityResponse {
    fn from(value: DayAvailability) -> Self {
        let DayAvailability {
            date,
            free,
            occupied,
        } = value;
        Self {
            date,
            free,
            occupied,
        }
    }
}
