//! Comment entity - Commento su evento o attività, eventualmente in risposta a un altro

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    pub event_id: Option<i32>,
    pub task_id: Option<i32>,
    pub content: String,
    pub commented_by: i32,
    pub parent_comment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
