//! Task services - Attività assegnate alle unità per la gestione di un evento

use super::require_term;
use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{
    CreateTaskDTO, DocumentDTO, SearchQuery, TaskDTO, TaskDetailsDTO, TaskReplyDTO,
    UpdateProgressDTO, UpdateStatusDTO, UpdateTaskDTO,
};
use crate::entities::{EventTask, Role};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use futures_util::future::try_join;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

const TASK_WRITERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Operator];
const TASK_ADMINS: [Role; 2] = [Role::Admin, Role::Manager];

fn to_dtos(tasks: Vec<EventTask>) -> Json<Vec<TaskDTO>> {
    Json(tasks.into_iter().map(TaskDTO::from).collect())
}

async fn ensure_unit_exists(state: &AppState, unit_id: i32) -> Result<(), AppError> {
    if state.organization_unit.read(&unit_id).await?.is_none() {
        return Err(AppError::not_found("Assigned unit not found"));
    }
    Ok(())
}

async fn load_task(state: &AppState, task_id: i32) -> Result<EventTask, AppError> {
    state
        .task
        .read(&task_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskDTO>>, AppError> {
    Ok(to_dtos(state.task.find_all().await?))
}

#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskDTO>, AppError> {
    Ok(Json(load_task(&state, task_id).await?.into()))
}

#[instrument(skip(state))]
pub async fn get_task_details(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<TaskDetailsDTO>, AppError> {
    let task = load_task(&state, task_id).await?;

    let (replies, documents) = try_join(
        state.task_reply.find_by_task(&task_id),
        state.document.find_by_task(&task_id),
    )
    .await?;

    Ok(Json(TaskDetailsDTO {
        task: task.into(),
        replies: replies.into_iter().map(TaskReplyDTO::from).collect(),
        documents: documents.into_iter().map(DocumentDTO::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn list_tasks_by_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<TaskDTO>>, AppError> {
    Ok(to_dtos(state.task.find_by_event(&event_id).await?))
}

#[instrument(skip(state))]
pub async fn list_tasks_by_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<i32>,
) -> Result<Json<Vec<TaskDTO>>, AppError> {
    Ok(to_dtos(state.task.find_by_unit(&unit_id).await?))
}

#[instrument(skip(state))]
pub async fn list_tasks_by_status(
    State(state): State<Arc<AppState>>,
    Path(status_id): Path<i32>,
) -> Result<Json<Vec<TaskDTO>>, AppError> {
    Ok(to_dtos(state.task.find_by_status(&status_id).await?))
}

#[instrument(skip(state), fields(term = %params.term))]
pub async fn search_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<TaskDTO>>, AppError> {
    let term = require_term(&params.term)?;
    Ok(to_dtos(state.task.search(term).await?))
}

#[instrument(skip(state, current_user, body), fields(title = %body.title))]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateTaskDTO>,
) -> Result<Json<TaskDTO>, AppError> {
    require_role(&current_user, &TASK_WRITERS)?;
    body.validate()?;

    if state.event.read(&body.event_id).await?.is_none() {
        return Err(AppError::not_found("Event not found"));
    }
    ensure_unit_exists(&state, body.assigned_to_unit_id).await?;

    let task = state.task.create(&body, current_user.id()).await?;
    info!("Task {} created for event {}", task.id, task.event_id);
    Ok(Json(task.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
    Json(body): Json<UpdateTaskDTO>,
) -> Result<Json<TaskDTO>, AppError> {
    require_role(&current_user, &TASK_WRITERS)?;
    body.validate()?;

    load_task(&state, task_id).await?;
    if let Some(unit_id) = body.assigned_to_unit_id {
        ensure_unit_exists(&state, unit_id).await?;
    }

    let task = state
        .task
        .update(&task_id, &body, current_user.id())
        .await?;
    Ok(Json(task.into()))
}

#[instrument(skip(state, current_user, body), fields(progress = body.progress_percentage))]
pub async fn update_task_progress(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
    Json(body): Json<UpdateProgressDTO>,
) -> Result<Json<TaskDTO>, AppError> {
    require_role(&current_user, &TASK_WRITERS)?;
    body.validate()?;

    let current = load_task(&state, task_id).await?;
    let method = body
        .calculation_method
        .unwrap_or(current.progress_calculation_method);
    let status_id = EventTask::status_for_progress(current.status_id, body.progress_percentage);

    let task = state
        .task
        .update_progress(
            &task_id,
            body.progress_percentage,
            method,
            status_id,
            current_user.id(),
        )
        .await?;
    Ok(Json(task.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_task_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<TaskDTO>, AppError> {
    require_role(&current_user, &TASK_WRITERS)?;
    body.validate()?;

    let task = state
        .task
        .update_status(&task_id, body.status_id, current_user.id())
        .await?;
    info!("Task {} moved to status {}", task_id, body.status_id);
    Ok(Json(task.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &TASK_ADMINS)?;

    state.task.delete(&task_id, current_user.id()).await?;
    info!("Task {} deleted", task_id);
    Ok(StatusCode::NO_CONTENT)
}
