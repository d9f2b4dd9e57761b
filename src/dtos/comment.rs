//! Comment DTOs

use crate::entities::Comment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug)]
pub struct CommentDTO {
    pub id: i32,
    pub event_id: Option<i32>,
    pub task_id: Option<i32>,
    pub content: String,
    pub commented_by: i32,
    pub parent_comment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentDTO {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id,
            event_id: value.event_id,
            task_id: value.task_id,
            content: value.content,
            commented_by: value.commented_by,
            parent_comment_id: value.parent_comment_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn validate_single_target(dto: &CreateCommentDTO) -> Result<(), ValidationError> {
    if dto.event_id.is_some() == dto.task_id.is_some() {
        let mut err = ValidationError::new("comment_target");
        err.message = Some("A comment must target exactly one of event_id or task_id".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_single_target"))]
pub struct CreateCommentDTO {
    #[validate(range(min = 1))]
    pub event_id: Option<i32>,
    #[validate(range(min = 1))]
    pub task_id: Option<i32>,
    #[validate(length(min = 1, max = 2000, message = "Content must be between 1 and 2000 characters"))]
    pub content: String,
    #[validate(range(min = 1))]
    pub parent_comment_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateCommentDTO {
    #[validate(length(min = 1, max = 2000, message = "Content must be between 1 and 2000 characters"))]
    pub content: String,
}
