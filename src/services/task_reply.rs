//! TaskReply services

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{CreateTaskReplyDTO, TaskReplyDTO, UpdateTaskReplyDTO};
use crate::entities::Role;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

const REPLY_WRITERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Operator];

#[instrument(skip(state))]
pub async fn list_replies_by_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<Vec<TaskReplyDTO>>, AppError> {
    let replies = state.task_reply.find_by_task(&task_id).await?;
    Ok(Json(replies.into_iter().map(TaskReplyDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_reply(
    State(state): State<Arc<AppState>>,
    Path(reply_id): Path<i32>,
) -> Result<Json<TaskReplyDTO>, AppError> {
    let reply = state
        .task_reply
        .read(&reply_id)
        .await?
        .ok_or_else(|| AppError::not_found("Task reply not found"))?;
    Ok(Json(reply.into()))
}

#[instrument(skip(state, current_user, body), fields(task_id = body.task_id))]
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateTaskReplyDTO>,
) -> Result<Json<TaskReplyDTO>, AppError> {
    require_role(&current_user, &REPLY_WRITERS)?;
    body.validate()?;

    if state.task.read(&body.task_id).await?.is_none() {
        return Err(AppError::not_found("Task not found"));
    }

    let reply = state.task_reply.create(&body, current_user.id()).await?;
    info!("Reply {} added to task {}", reply.id, reply.task_id);
    Ok(Json(reply.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_reply(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(reply_id): Path<i32>,
    Json(body): Json<UpdateTaskReplyDTO>,
) -> Result<Json<TaskReplyDTO>, AppError> {
    require_role(&current_user, &REPLY_WRITERS)?;
    body.validate()?;

    let reply = state
        .task_reply
        .update(&reply_id, &body, current_user.id())
        .await?;
    Ok(Json(reply.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(reply_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin, Role::Manager])?;

    state.task_reply.delete(&reply_id, current_user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
