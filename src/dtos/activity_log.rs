//! ActivityLog DTOs

use crate::entities::UserActivityLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ActivityLogDTO {
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

impl From<UserActivityLog> for ActivityLogDTO {
    fn from(value: UserActivityLog) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            activity_type: value.activity_type,
            description: value.description,
            ip_address: value.ip_address,
            user_agent: value.user_agent,
            is_successful: value.is_successful,
            error_message: value.error_message,
            activity_date_time: value.activity_date_time,
        }
    }
}

/// DTO per scrivere una nuova riga di log (senza id)
#[derive(Debug, Clone)]
pub struct CreateActivityLogDTO {
    pub user_id: Option<i32>,
    pub activity_type: &'static str,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub is_successful: bool,
    pub error_message: Option<String>,
}
