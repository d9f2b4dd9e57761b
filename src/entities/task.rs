//! EventTask entity - Attività assegnata a un'unità organizzativa

use super::enums::ProgressCalculationMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TASK_STATUS_NEW: i32 = 1;
pub const TASK_STATUS_COMPLETED: i32 = 4;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct EventTask {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_id: i32,
    pub assigned_to_unit_id: i32,
    pub assigned_to_user_id: Option<i32>,
    pub supervisor_user_id: Option<i32>,
    /// JSON array of unit ids
    pub cooperating_units_ids: Option<String>,
    pub action_type_id: i32,
    pub progress_percentage: i32,
    pub progress_calculation_method: ProgressCalculationMethod,
    pub due_date: Option<DateTime<Utc>>,
    pub status_id: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i32>,
    pub is_deleted: bool,
}

impl EventTask {
    /// Status a task should move to after its progress changes.
    /// Reaching 100% completes the task; otherwise the current status is kept.
    pub fn status_for_progress(current_status: i32, progress: i32) -> i32 {
        if progress >= 100 {
            TASK_STATUS_COMPLETED
        } else {
            current_status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_progress_completes_task() {
        assert_eq!(EventTask::status_for_progress(2, 100), TASK_STATUS_COMPLETED);
    }

    #[test]
    fn partial_progress_keeps_status() {
        assert_eq!(EventTask::status_for_progress(2, 99), 2);
        assert_eq!(EventTask::status_for_progress(TASK_STATUS_NEW, 0), TASK_STATUS_NEW);
    }
}
