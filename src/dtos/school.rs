//! School DTOs

use crate::dtos::validation::validate_phone_number;
use crate::entities::School;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct SchoolDTO {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub region_id: Option<i32>,
    pub province_id: Option<i32>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<School> for SchoolDTO {
    fn from(value: School) -> Self {
        Self {
            id: value.id,
            name: value.name,
            code: value.code,
            region_id: value.region_id,
            province_id: value.province_id,
            address: value.address,
            phone_number: value.phone_number,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateSchoolDTO {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: String,
    #[validate(range(min = 1))]
    pub region_id: Option<i32>,
    #[validate(range(min = 1))]
    pub province_id: Option<i32>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateSchoolDTO {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    #[validate(range(min = 1))]
    pub region_id: Option<i32>,
    #[validate(range(min = 1))]
    pub province_id: Option<i32>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}
