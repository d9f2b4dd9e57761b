//! TaskReply DTOs

use crate::entities::TaskReply;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct TaskReplyDTO {
    pub id: i32,
    pub task_id: i32,
    pub content: String,
    pub action_date_time: DateTime<Utc>,
    pub responded_by_user_id: i32,
    pub registered_date: DateTime<Utc>,
    pub supervisor_unit_id: Option<i32>,
}

impl From<TaskReply> for TaskReplyDTO {
    fn from(value: TaskReply) -> Self {
        Self {
            id: value.id,
            task_id: value.task_id,
            content: value.content,
            action_date_time: value.action_date_time,
            responded_by_user_id: value.responded_by_user_id,
            registered_date: value.registered_date,
            supervisor_unit_id: value.supervisor_unit_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateTaskReplyDTO {
    #[validate(range(min = 1, message = "Task is required"))]
    pub task_id: i32,
    #[validate(length(min = 1, max = 4000, message = "Content must be between 1 and 4000 characters"))]
    pub content: String,
    pub action_date_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub supervisor_unit_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateTaskReplyDTO {
    #[validate(length(min = 1, max = 4000, message = "Content must be between 1 and 4000 characters"))]
    pub content: String,
    pub action_date_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub supervisor_unit_id: Option<i32>,
}
