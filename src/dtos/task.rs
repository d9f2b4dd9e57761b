//! Task DTOs - Data Transfer Objects per attività

use crate::dtos::nullable::nullable;
use crate::dtos::validation::validate_json_text;
use crate::dtos::{DocumentDTO, TaskReplyDTO};
use crate::entities::{EventTask, ProgressCalculationMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct TaskDTO {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_id: i32,
    pub assigned_to_unit_id: i32,
    pub assigned_to_user_id: Option<i32>,
    pub supervisor_user_id: Option<i32>,
    pub cooperating_units_ids: Option<String>,
    pub action_type_id: i32,
    pub progress_percentage: i32,
    pub progress_calculation_method: ProgressCalculationMethod,
    pub due_date: Option<DateTime<Utc>>,
    pub status_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<EventTask> for TaskDTO {
    fn from(value: EventTask) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            event_id: value.event_id,
            assigned_to_unit_id: value.assigned_to_unit_id,
            assigned_to_user_id: value.assigned_to_user_id,
            supervisor_user_id: value.supervisor_user_id,
            cooperating_units_ids: value.cooperating_units_ids,
            action_type_id: value.action_type_id,
            progress_percentage: value.progress_percentage,
            progress_calculation_method: value.progress_calculation_method,
            due_date: value.due_date,
            status_id: value.status_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Attività con risposte e documenti collegati
#[derive(Serialize, Deserialize, Debug)]
pub struct TaskDetailsDTO {
    #[serde(flatten)]
    pub task: TaskDTO,
    pub replies: Vec<TaskReplyDTO>,
    pub documents: Vec<DocumentDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateTaskDTO {
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Event is required"))]
    pub event_id: i32,
    #[validate(range(min = 1, message = "Assigned unit is required"))]
    pub assigned_to_unit_id: i32,
    #[validate(range(min = 1))]
    pub assigned_to_user_id: Option<i32>,
    #[validate(range(min = 1))]
    pub supervisor_user_id: Option<i32>,
    #[validate(custom(function = "validate_json_text"))]
    pub cooperating_units_ids: Option<String>,
    #[validate(range(min = 1, message = "Action type is required"))]
    pub action_type_id: i32,
    #[serde(default)]
    pub progress_calculation_method: ProgressCalculationMethod,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub status_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateTaskDTO {
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub assigned_to_unit_id: Option<i32>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to_user_id: Option<Option<i32>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub supervisor_user_id: Option<Option<i32>>,
    #[validate(custom(function = "validate_json_text"))]
    #[serde(default, deserialize_with = "nullable")]
    pub cooperating_units_ids: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub action_type_id: Option<i32>,
    pub progress_calculation_method: Option<ProgressCalculationMethod>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[validate(range(min = 1))]
    pub status_id: Option<i32>,
}

impl UpdateTaskDTO {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assigned_to_unit_id.is_none()
            && self.assigned_to_user_id.is_none()
            && self.supervisor_user_id.is_none()
            && self.cooperating_units_ids.is_none()
            && self.action_type_id.is_none()
            && self.progress_calculation_method.is_none()
            && self.due_date.is_none()
            && self.status_id.is_none()
    }
}

/// Body di `PATCH /{id}/progress`
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateProgressDTO {
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress_percentage: i32,
    pub calculation_method: Option<ProgressCalculationMethod>,
}
