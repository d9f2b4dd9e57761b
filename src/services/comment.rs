//! Comment services - Commenti su eventi e attività
//!
//! Chiunque sia autenticato può commentare; solo l'autore o un Admin
//! può modificare o cancellare un commento.

use crate::core::{AppError, AppState, CurrentUser};
use crate::dtos::{CommentDTO, CreateCommentDTO, UpdateCommentDTO};
use crate::entities::Comment;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

fn to_dtos(comments: Vec<Comment>) -> Json<Vec<CommentDTO>> {
    Json(comments.into_iter().map(CommentDTO::from).collect())
}

/// Loads the comment and checks that the caller may change it
async fn load_owned(
    state: &AppState,
    current_user: &CurrentUser,
    comment_id: i32,
) -> Result<Comment, AppError> {
    let comment = state
        .comment
        .read(&comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    if comment.commented_by != current_user.id() && !current_user.is_admin() {
        warn!(
            "User {} tried to change comment {} owned by {}",
            current_user.id(),
            comment_id,
            comment.commented_by
        );
        return Err(AppError::forbidden("Only the author can change this comment"));
    }
    Ok(comment)
}

#[instrument(skip(state))]
pub async fn list_comments_by_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
) -> Result<Json<Vec<CommentDTO>>, AppError> {
    Ok(to_dtos(state.comment.find_by_event(&event_id).await?))
}

#[instrument(skip(state))]
pub async fn list_comments_by_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<i32>,
) -> Result<Json<Vec<CommentDTO>>, AppError> {
    Ok(to_dtos(state.comment.find_by_task(&task_id).await?))
}

#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i32>,
) -> Result<Json<CommentDTO>, AppError> {
    let comment = state
        .comment
        .read(&comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;
    Ok(Json(comment.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateCommentDTO>,
) -> Result<Json<CommentDTO>, AppError> {
    body.validate()?;

    if let Some(event_id) = body.event_id {
        if state.event.read(&event_id).await?.is_none() {
            return Err(AppError::not_found("Event not found"));
        }
    }
    if let Some(task_id) = body.task_id {
        if state.task.read(&task_id).await?.is_none() {
            return Err(AppError::not_found("Task not found"));
        }
    }
    if let Some(parent_id) = body.parent_comment_id {
        if state.comment.read(&parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent comment not found"));
        }
    }

    let comment = state.comment.create(&body, current_user.id()).await?;
    info!("Comment {} created", comment.id);
    Ok(Json(comment.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(comment_id): Path<i32>,
    Json(body): Json<UpdateCommentDTO>,
) -> Result<Json<CommentDTO>, AppError> {
    body.validate()?;
    load_owned(&state, &current_user, comment_id).await?;

    let comment = state
        .comment
        .update(&comment_id, &body, current_user.id())
        .await?;
    Ok(Json(comment.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(comment_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    load_owned(&state, &current_user, comment_id).await?;

    state.comment.delete(&comment_id, current_user.id()).await?;
    info!("Comment {} deleted", comment_id);
    Ok(StatusCode::NO_CONTENT)
}
