//! File services - Upload, download e cancellazione dei documenti allegati

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{CreateDocumentDTO, DocumentDTO};
use crate::entities::{DocumentMetadata, Role};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const FILE_WRITERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Operator];

/// Campi letti dal body multipart di `/upload`
#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    bytes: Vec<u8>,
    event_id: Option<i32>,
    task_id: Option<i32>,
    task_reply_id: Option<i32>,
    description: Option<String>,
    is_public: bool,
}

fn parse_id(field: &'static str, text: &str) -> Result<Option<i32>, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i32>()
        .map(Some)
        .map_err(|_| AppError::bad_request("Invalid multipart field").with_details(format!("'{}' must be an integer", field)))
}

fn parse_flag(text: &str) -> bool {
    matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on" | "yes")
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.bytes = field.bytes().await?.to_vec();
            }
            "event_id" => form.event_id = parse_id("event_id", &field.text().await?)?,
            "task_id" => form.task_id = parse_id("task_id", &field.text().await?)?,
            "task_reply_id" => form.task_reply_id = parse_id("task_reply_id", &field.text().await?)?,
            "description" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    form.description = Some(text);
                }
            }
            "is_public" => form.is_public = parse_flag(&field.text().await?),
            other => debug!("Ignoring multipart field {}", other),
        }
    }

    Ok(form)
}

async fn ensure_parents_exist(state: &AppState, form: &UploadForm) -> Result<(), AppError> {
    if let Some(event_id) = form.event_id {
        if state.event.read(&event_id).await?.is_none() {
            return Err(AppError::not_found("Event not found"));
        }
    }
    if let Some(task_id) = form.task_id {
        if state.task.read(&task_id).await?.is_none() {
            return Err(AppError::not_found("Task not found"));
        }
    }
    if let Some(reply_id) = form.task_reply_id {
        if state.task_reply.read(&reply_id).await?.is_none() {
            return Err(AppError::not_found("Task reply not found"));
        }
    }
    Ok(())
}

#[debug_handler]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<DocumentDTO>, AppError> {
    // 1. Verificare il ruolo
    // 2. Leggere i campi multipart
    // 3. Verificare che evento, attività e risposta indicati esistano
    // 4. Salvare il file su disco e poi i metadati nel database
    require_role(&current_user, &FILE_WRITERS)?;

    let form = read_form(multipart).await?;
    let file_name = form
        .file_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No file selected"))?;

    ensure_parents_exist(&state, &form).await?;

    let stored = state.storage.save(&file_name, &form.bytes).await?;

    let metadata = CreateDocumentDTO {
        file_name,
        file_type: stored.extension,
        file_size: stored.size as i64,
        file_path: stored.relative_path.clone(),
        event_id: form.event_id,
        task_id: form.task_id,
        task_reply_id: form.task_reply_id,
        description: form.description,
        is_public: form.is_public,
    };

    let document = match state.document.create(&metadata, current_user.id()).await {
        Ok(document) => document,
        Err(e) => {
            // senza metadati il file su disco resterebbe orfano
            if let Err(cleanup) = state.storage.remove(&stored.relative_path).await {
                warn!("Could not remove orphan upload: {:?}", cleanup);
            }
            return Err(e.into());
        }
    };

    info!("Document {} uploaded by user {}", document.id, current_user.id());
    Ok(Json(document.into()))
}

fn to_dtos(documents: Vec<DocumentMetadata>) -> Json<Vec<DocumentDTO>> {
    Json(documents.into_iter().map(DocumentDTO::from).collect())
}

#[instrument(skip(state))]
pub async fn list_files_by_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<DocumentDTO>>, AppError> {
    Ok(to_dtos(state.document.find_by_event(&event_id).await?))
}

#[instrument(skip(state))]
pub async fn list_files_by_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<Vec<DocumentDTO>>, AppError> {
    Ok(to_dtos(state.document.find_by_task(&task_id).await?))
}

#[instrument(skip(state))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .document
        .read(&document_id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    let bytes = state
        .storage
        .read(&document.file_path)
        .await?
        .ok_or_else(|| AppError::not_found("File not found on disk"))?;

    let disposition = content_disposition(&document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// `attachment; filename="..."` senza caratteri di controllo, virgolette o backslash
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let safe = if safe.trim().is_empty() { "download".to_string() } else { safe };
    format!("attachment; filename=\"{}\"", safe)
}

#[instrument(skip(state, current_user))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(document_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin, Role::Manager])?;

    let document = state
        .document
        .read(&document_id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    state.storage.remove(&document.file_path).await?;
    state
        .document
        .delete(&document_id, current_user.id())
        .await?;
    info!("Document {} deleted", document_id);
    Ok(StatusCode::NO_CONTENT)
}
