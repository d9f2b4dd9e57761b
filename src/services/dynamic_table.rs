//! DynamicTable services - Enumerazioni chiave/valore configurabili

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{ByTableQuery, CreateDynamicTableDTO, DynamicTableDTO, UpdateDynamicTableDTO};
use crate::entities::{DynamicTable, Role};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

const TABLE_EDITORS: [Role; 2] = [Role::Admin, Role::Manager];

fn to_dtos(rows: Vec<DynamicTable>) -> Json<Vec<DynamicTableDTO>> {
    Json(rows.into_iter().map(DynamicTableDTO::from).collect())
}

#[instrument(skip(state))]
pub async fn list_rows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DynamicTableDTO>>, AppError> {
    Ok(to_dtos(state.dynamic_table.find_all().await?))
}

#[instrument(skip(state))]
pub async fn list_by_table(
    State(state): State<Arc<AppState>>,
    Path(table_name): Path<String>,
    Query(params): Query<ByTableQuery>,
) -> Result<Json<Vec<DynamicTableDTO>>, AppError> {
    let rows = state
        .dynamic_table
        .find_by_table(&table_name, params.include_inactive)
        .await?;
    Ok(to_dtos(rows))
}

#[instrument(skip(state))]
pub async fn list_table_names(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.dynamic_table.table_names().await?))
}

#[instrument(skip(state))]
pub async fn get_row(
    State(state): State<Arc<AppState>>,
    Path(row_id): Path<i32>,
) -> Result<Json<DynamicTableDTO>, AppError> {
    let row = state
        .dynamic_table
        .read(&row_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dynamic table row not found"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<Arc<AppState>>,
    Path(row_id): Path<i32>,
) -> Result<Json<Vec<DynamicTableDTO>>, AppError> {
    Ok(to_dtos(state.dynamic_table.find_children(&row_id).await?))
}

fn duplicate_code(table_name: &str, code: &str) -> AppError {
    warn!("Duplicate code {} in table {}", code, table_name);
    AppError::bad_request("Code already exists in this table")
        .with_details(format!("'{}' is already used in '{}'", code, table_name))
}

#[instrument(skip(state, current_user, body), fields(table = %body.table_name, code = %body.code))]
pub async fn create_row(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateDynamicTableDTO>,
) -> Result<Json<DynamicTableDTO>, AppError> {
    require_role(&current_user, &TABLE_EDITORS)?;
    body.validate()?;

    if state
        .dynamic_table
        .code_exists(&body.table_name, &body.code, None)
        .await?
    {
        return Err(duplicate_code(&body.table_name, &body.code));
    }
    if let Some(parent_id) = body.parent_id {
        if state.dynamic_table.read(&parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent row not found"));
        }
    }

    let row = state.dynamic_table.create(&body, current_user.id()).await?;
    info!("Dynamic table row {} created", row.id);
    Ok(Json(row.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_row(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(row_id): Path<i32>,
    Json(body): Json<UpdateDynamicTableDTO>,
) -> Result<Json<DynamicTableDTO>, AppError> {
    require_role(&current_user, &TABLE_EDITORS)?;
    body.validate()?;

    let current = state
        .dynamic_table
        .read(&row_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dynamic table row not found"))?;

    // la coppia risultante dall'update deve restare unica
    let table_name = body.table_name.as_deref().unwrap_or(&current.table_name);
    let code = body.code.as_deref().unwrap_or(&current.code);
    if state
        .dynamic_table
        .code_exists(table_name, code, Some(row_id))
        .await?
    {
        return Err(duplicate_code(table_name, code));
    }
    if let Some(parent_id) = body.parent_id {
        if parent_id == row_id {
            return Err(AppError::bad_request("A row cannot be its own parent"));
        }
        if state.dynamic_table.read(&parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent row not found"));
        }
    }

    let row = state
        .dynamic_table
        .update(&row_id, &body, current_user.id())
        .await?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_row(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(row_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin])?;

    state.dynamic_table.delete(&row_id, current_user.id()).await?;
    info!("Dynamic table row deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user))]
pub async fn toggle_row(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(row_id): Path<i32>,
) -> Result<Json<DynamicTableDTO>, AppError> {
    require_role(&current_user, &TABLE_EDITORS)?;

    let row = state
        .dynamic_table
        .toggle_active(&row_id, current_user.id())
        .await?;
    Ok(Json(row.into()))
}
