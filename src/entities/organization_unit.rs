//! OrganizationUnit entity - Nodo dell'albero organizzativo

use super::enums::UnitType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct OrganizationUnit {
    pub id: i32,
    pub name: String,
    pub unit_type: UnitType,
    pub code: Option<String>,
    pub parent_unit_id: Option<i32>,
    pub province_id: Option<i32>,
    pub region_id: Option<i32>,
    pub school_id: Option<i32>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
