//! Dashboard DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StatusCountDTO {
    pub status_id: i32,
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct RecentEventDTO {
    pub id: i32,
    pub title: String,
    pub status_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DashboardStatsDTO {
    pub total_events: i64,
    pub total_tasks: i64,
    pub total_users: i64,
    pub events_by_status: Vec<StatusCountDTO>,
    pub tasks_by_status: Vec<StatusCountDTO>,
    pub average_progress: f64,
    pub recent_events: Vec<RecentEventDTO>,
}
