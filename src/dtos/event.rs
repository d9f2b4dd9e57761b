//! Event DTOs - Data Transfer Objects per eventi

use crate::dtos::nullable::nullable;
use crate::dtos::validation::validate_json_text;
use crate::dtos::{CommentDTO, DocumentDTO, TaskDTO};
use crate::entities::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug)]
pub struct EventDTO {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_source_id: i32,
    pub event_subject_id: i32,
    pub urgency_id: i32,
    pub scope_id: i32,
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
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Event> for EventDTO {
    fn from(value: Event) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            event_source_id: value.event_source_id,
            event_subject_id: value.event_subject_id,
            urgency_id: value.urgency_id,
            scope_id: value.scope_id,
            scope_details: value.scope_details,
            impact_scope_id: value.impact_scope_id,
            impact_scope_details: value.impact_scope_details,
            impact_range_id: value.impact_range_id,
            event_start_date: value.event_start_date,
            event_end_date: value.event_end_date,
            action_unit_id: value.action_unit_id,
            status_id: value.status_id,
            registered_by: value.registered_by,
            reviewed_by: value.reviewed_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Evento con attività, documenti e commenti collegati
#[derive(Serialize, Deserialize, Debug)]
pub struct EventDetailsDTO {
    #[serde(flatten)]
    pub event: EventDTO,
    pub tasks: Vec<TaskDTO>,
    pub documents: Vec<DocumentDTO>,
    pub comments: Vec<CommentDTO>,
}

fn validate_create_dates(dto: &CreateEventDTO) -> Result<(), ValidationError> {
    check_dates(Some(dto.event_start_date), dto.event_end_date)
}

fn validate_update_dates(dto: &UpdateEventDTO) -> Result<(), ValidationError> {
    check_dates(dto.event_start_date, dto.event_end_date.flatten())
}

/// End date, when both are known, must not precede the start date.
pub fn check_dates(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = ValidationError::new("end_before_start");
            err.message = Some("Event end date must not be before the start date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_create_dates", skip_on_field_errors = false))]
pub struct CreateEventDTO {
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Event source is required"))]
    pub event_source_id: i32,
    #[validate(range(min = 1, message = "Event subject is required"))]
    pub event_subject_id: i32,
    #[validate(range(min = 1, message = "Urgency is required"))]
    pub urgency_id: i32,
    #[validate(range(min = 1, message = "Scope is required"))]
    pub scope_id: i32,
    #[validate(custom(function = "validate_json_text"))]
    pub scope_details: Option<String>,
    #[validate(range(min = 1, message = "Impact scope is required"))]
    pub impact_scope_id: i32,
    #[validate(custom(function = "validate_json_text"))]
    pub impact_scope_details: Option<String>,
    #[validate(range(min = 1, message = "Impact range is required"))]
    pub impact_range_id: i32,
    pub event_start_date: DateTime<Utc>,
    pub event_end_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "Action unit is required"))]
    pub action_unit_id: i32,
    #[validate(range(min = 1))]
    pub status_id: Option<i32>,
    #[validate(range(min = 1))]
    pub reviewed_by: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_update_dates", skip_on_field_errors = false))]
pub struct UpdateEventDTO {
    #[validate(length(min = 1, max = 500, message = "Title must be between 1 and 500 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub event_source_id: Option<i32>,
    #[validate(range(min = 1))]
    pub event_subject_id: Option<i32>,
    #[validate(range(min = 1))]
    pub urgency_id: Option<i32>,
    #[validate(range(min = 1))]
    pub scope_id: Option<i32>,
    #[validate(custom(function = "validate_json_text"))]
    #[serde(default, deserialize_with = "nullable")]
    pub scope_details: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub impact_scope_id: Option<i32>,
    #[validate(custom(function = "validate_json_text"))]
    #[serde(default, deserialize_with = "nullable")]
    pub impact_scope_details: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub impact_range_id: Option<i32>,
    pub event_start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub event_end_date: Option<Option<DateTime<Utc>>>,
    #[validate(range(min = 1))]
    pub action_unit_id: Option<i32>,
    #[validate(range(min = 1))]
    pub status_id: Option<i32>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub reviewed_by: Option<Option<i32>>,
}

impl UpdateEventDTO {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_source_id.is_none()
            && self.event_subject_id.is_none()
            && self.urgency_id.is_none()
            && self.scope_id.is_none()
            && self.scope_details.is_none()
            && self.impact_scope_id.is_none()
            && self.impact_scope_details.is_none()
            && self.impact_range_id.is_none()
            && self.event_start_date.is_none()
            && self.event_end_date.is_none()
            && self.action_unit_id.is_none()
            && self.status_id.is_none()
            && self.reviewed_by.is_none()
    }
}

/// Body di `PATCH /{id}/status`, condiviso da eventi e attività
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateStatusDTO {
    #[validate(range(min = 1, message = "Status id must be positive"))]
    pub status_id: i32,
}
