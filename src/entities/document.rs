//! DocumentMetadata entity - Metadati dei file caricati

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct DocumentMetadata {
    pub id: i32,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    /// Path relative to the storage root, e.g. `2025-01/<uuid>.pdf`
    pub file_path: String,
    pub event_id: Option<i32>,
    pub task_id: Option<i32>,
    pub task_reply_id: Option<i32>,
    pub uploaded_by: i32,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
