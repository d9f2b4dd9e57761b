//! Document DTOs

use crate::entities::DocumentMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct DocumentDTO {
    pub id: i32,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub event_id: Option<i32>,
    pub task_id: Option<i32>,
    pub task_reply_id: Option<i32>,
    pub uploaded_by: i32,
    pub description: Option<String>,
    pub is_public: bool,
    pub uploaded_at: DateTime<Utc>,
}

impl From<DocumentMetadata> for DocumentDTO {
    fn from(value: DocumentMetadata) -> Self {
        Self {
            id: value.id,
            file_name: value.file_name,
            file_type: value.file_type,
            file_size: value.file_size,
            event_id: value.event_id,
            task_id: value.task_id,
            task_reply_id: value.task_reply_id,
            uploaded_by: value.uploaded_by,
            description: value.description,
            is_public: value.is_public,
            uploaded_at: value.created_at,
        }
    }
}

/// DTO per registrare i metadati di un file già salvato su disco
#[derive(Debug, Clone)]
pub struct CreateDocumentDTO {
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub file_path: String,
    pub event_id: Option<i32>,
    pub task_id: Option<i32>,
    pub task_reply_id: Option<i32>,
    pub description: Option<String>,
    pub is_public: bool,
}
