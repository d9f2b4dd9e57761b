//! Province DTOs

use crate::entities::Province;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct ProvinceDTO {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Province> for ProvinceDTO {
    fn from(value: Province) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProvinceDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateProvinceDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    pub code: Option<String>,
}
