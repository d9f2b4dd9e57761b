//! Dashboard services - Statistiche aggregate e log delle attività

use crate::core::{AppError, AppState};
use crate::dtos::{ActivityLogDTO, DashboardStatsDTO, PaginationQuery};
use axum::extract::{Json, Query, State};
use std::sync::Arc;
use tracing::{debug, instrument};

const RECENT_EVENTS: i64 = 5;

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStatsDTO>, AppError> {
    let dashboard = &state.dashboard;

    let total_events = dashboard.count_events().await?;
    let total_tasks = dashboard.count_tasks().await?;
    let total_users = state.user.count().await?;
    let events_by_status = dashboard.events_by_status().await?;
    let tasks_by_status = dashboard.tasks_by_status().await?;
    let average_progress = dashboard.average_progress().await?;
    let recent_events = dashboard.recent_events(RECENT_EVENTS).await?;

    debug!(
        "Dashboard: {} events, {} tasks, {} users",
        total_events, total_tasks, total_users
    );

    Ok(Json(DashboardStatsDTO {
        total_events,
        total_tasks,
        total_users,
        events_by_status,
        tasks_by_status,
        average_progress,
        recent_events,
    }))
}

#[instrument(skip(state))]
pub async fn list_activity_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<Vec<ActivityLogDTO>>, AppError> {
    let (limit, offset) = params.limit_offset();
    let logs = state.activity_log.list(limit, offset).await?;
    Ok(Json(logs.into_iter().map(ActivityLogDTO::from).collect()))
}
