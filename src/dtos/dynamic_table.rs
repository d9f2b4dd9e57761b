//! DynamicTable DTOs

use crate::entities::DynamicTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct DynamicTableDTO {
    pub id: i32,
    pub table_name: String,
    pub code: String,
    pub value: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<DynamicTable> for DynamicTableDTO {
    fn from(value: DynamicTable) -> Self {
        Self {
            id: value.id,
            table_name: value.table_name,
            code: value.code,
            value: value.value,
            description: value.description,
            display_order: value.display_order,
            is_active: value.is_active,
            parent_id: value.parent_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateDynamicTableDTO {
    #[validate(length(min = 1, max = 100, message = "Table name must be between 1 and 100 characters"))]
    pub table_name: String,
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 500, message = "Value must be between 1 and 500 characters"))]
    pub value: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[validate(range(min = 1))]
    pub parent_id: Option<i32>,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateDynamicTableDTO {
    #[validate(length(min = 1, max = 100, message = "Table name must be between 1 and 100 characters"))]
    pub table_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Code must be between 1 and 50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Value must be between 1 and 500 characters"))]
    pub value: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    #[validate(range(min = 1))]
    pub parent_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ByTableQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
