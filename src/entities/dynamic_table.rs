//! DynamicTable entity - Voce di enumerazione chiave/valore
//!
//! Ogni riga appartiene a una "tabella" logica identificata da `table_name`;
//! la coppia (table_name, code) è unica tra le righe non cancellate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct DynamicTable {
    pub id: i32,
    pub table_name: String,
    pub code: String,
    pub value: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
