//! TaskReply entity - Azione registrata su un'attività

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TaskReply {
    pub id: i32,
    pub task_id: i32,
    pub content: String,
    pub action_date_time: DateTime<Utc>,
    pub responded_by_user_id: i32,
    pub registered_date: DateTime<Utc>,
    pub supervisor_unit_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
