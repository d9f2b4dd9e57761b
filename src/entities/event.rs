//! Event entity - Evento registrato che richiede un seguito

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default status of a freshly registered event.
pub const EVENT_STATUS_REGISTERED: i32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_source_id: i32,
    pub event_subject_id: i32,
    pub urgency_id: i32,
    pub scope_id: i32,
    /// JSON text
    pub scope_details: Option<String>,
    pub impact_scope_id: i32,
    pub impact_scope_details: Option<String>,
    pub impact_range_id: i32,
    pub event_start_date: DateTime<Utc>,
    pub event_end_date: Option<DateTime<Utc>>,
    pub action_unit_id: i32,
    pub status_id: i32,
    pub registered_by: i32,
    pub reviewed_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}
