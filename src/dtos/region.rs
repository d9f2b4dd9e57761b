//! Region DTOs

use crate::entities::Region;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct RegionDTO {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub province_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Region> for RegionDTO {
    fn from(value: Region) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            province_id: value.province_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateRegionDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: String,
    #[validate(range(min = 1, message = "Province is required"))]
    pub province_id: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateRegionDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: Option<String>,
    #[validate(range(min = 1, message = "Province id must be positive"))]
    pub province_id: Option<i32>,
}
