//! UserActivityLog entity - Traccia delle attività di autenticazione

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct UserActivityLog {
    pub id: i32,
    pub user_id: Option<i32>,
    pub activity_type: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_successful: bool,
    pub error_message: Option<String>,
    pub activity_date_time: DateTime<Utc>,
}
