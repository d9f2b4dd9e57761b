//! Event services - Gestione degli eventi segnalati

use super::require_term;
use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::event::check_dates;
use crate::dtos::{
    CommentDTO, CreateEventDTO, DocumentDTO, EventDTO, EventDetailsDTO, SearchQuery, TaskDTO,
    UpdateEventDTO, UpdateStatusDTO,
};
use crate::entities::{Event, Role};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use futures_util::future::try_join3;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const EVENT_WRITERS: [Role; 3] = [Role::Admin, Role::Manager, Role::Operator];
const EVENT_ADMINS: [Role; 2] = [Role::Admin, Role::Manager];

fn to_dtos(events: Vec<Event>) -> Json<Vec<EventDTO>> {
    Json(events.into_iter().map(EventDTO::from).collect())
}

async fn ensure_unit_exists(state: &AppState, unit_id: i32) -> Result<(), AppError> {
    if state.organization_unit.read(&unit_id).await?.is_none() {
        return Err(AppError::not_found("Action unit not found"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EventDTO>>, AppError> {
    Ok(to_dtos(state.event.find_all().await?))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
) -> Result<Json<EventDTO>, AppError> {
    let event = state
        .event
        .read(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    Ok(Json(event.into()))
}

#[instrument(skip(state))]
pub async fn get_event_details(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i32>,
) -> Result<Json<EventDetailsDTO>, AppError> {
    let event = state
        .event
        .read(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    let (tasks, documents, comments) = try_join3(
        state.task.find_by_event(&event_id),
        state.document.find_by_event(&event_id),
        state.comment.find_by_event(&event_id),
    )
    .await?;

    debug!(
        "Event {} has {} tasks, {} documents, {} comments",
        event_id,
        tasks.len(),
        documents.len(),
        comments.len()
    );

    Ok(Json(EventDetailsDTO {
        event: event.into(),
        tasks: tasks.into_iter().map(TaskDTO::from).collect(),
        documents: documents.into_iter().map(DocumentDTO::from).collect(),
        comments: comments.into_iter().map(CommentDTO::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn list_events_by_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<i32>,
) -> Result<Json<Vec<EventDTO>>, AppError> {
    Ok(to_dtos(state.event.find_by_unit(&unit_id).await?))
}

#[instrument(skip(state))]
pub async fn list_events_by_status(
    State(state): State<Arc<AppState>>,
    Path(status_id): Path<i32>,
) -> Result<Json<Vec<EventDTO>>, AppError> {
    Ok(to_dtos(state.event.find_by_status(&status_id).await?))
}

#[instrument(skip(state), fields(term = %params.term))]
pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<EventDTO>>, AppError> {
    let term = require_term(&params.term)?;
    Ok(to_dtos(state.event.search(term).await?))
}

#[instrument(skip(state, current_user, body), fields(title = %body.title))]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateEventDTO>,
) -> Result<Json<EventDTO>, AppError> {
    require_role(&current_user, &EVENT_WRITERS)?;
    body.validate()?;
    ensure_unit_exists(&state, body.action_unit_id).await?;

    let event = state.event.create(&body, current_user.id()).await?;
    info!("Event {} registered by user {}", event.id, current_user.id());
    Ok(Json(event.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(event_id): Path<i32>,
    Json(body): Json<UpdateEventDTO>,
) -> Result<Json<EventDTO>, AppError> {
    // 1. Verificare ruolo e validare il DTO
    // 2. L'evento deve esistere
    // 3. Le date risultanti dall'update devono restare coerenti
    // 4. L'eventuale nuova unità deve esistere
    require_role(&current_user, &EVENT_WRITERS)?;
    body.validate()?;

    let current = state
        .event
        .read(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    let start = body.event_start_date.unwrap_or(current.event_start_date);
    let end = body.event_end_date.unwrap_or(current.event_end_date);
    if let Err(e) = check_dates(Some(start), end) {
        warn!("Rejected event dates for {}", event_id);
        return Err(AppError::bad_request("Validation error").with_details(e.to_string()));
    }

    if let Some(unit_id) = body.action_unit_id {
        ensure_unit_exists(&state, unit_id).await?;
    }

    let event = state
        .event
        .update(&event_id, &body, current_user.id())
        .await?;
    Ok(Json(event.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_event_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(event_id): Path<i32>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<EventDTO>, AppError> {
    require_role(&current_user, &EVENT_WRITERS)?;
    body.validate()?;

    let event = state
        .event
        .update_status(&event_id, body.status_id, current_user.id())
        .await?;
    info!("Event {} moved to status {}", event_id, body.status_id);
    Ok(Json(event.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(event_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &EVENT_ADMINS)?;

    state.event.delete(&event_id, current_user.id()).await?;
    info!("Event {} deleted", event_id);
    Ok(StatusCode::NO_CONTENT)
}
