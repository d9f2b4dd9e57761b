//! Province services

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{CreateProvinceDTO, ProvinceDTO, UpdateProvinceDTO};
use crate::entities::Role;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_provinces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProvinceDTO>>, AppError> {
    let provinces = state.province.find_all().await?;
    Ok(Json(provinces.into_iter().map(ProvinceDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_province(
    State(state): State<Arc<AppState>>,
    Path(province_id): Path<i32>,
) -> Result<Json<ProvinceDTO>, AppError> {
    let province = state
        .province
        .read(&province_id)
        .await?
        .ok_or_else(|| AppError::not_found("Province not found"))?;
    Ok(Json(province.into()))
}

/// Name and code are both unique among live provinces
async fn ensure_unique(
    state: &AppState,
    name: Option<&str>,
    code: Option<&str>,
    exclude_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        if state.province.name_exists(name, exclude_id).await? {
            warn!("Duplicate province name {}", name);
            return Err(AppError::bad_request("A province with this name already exists"));
        }
    }
    if let Some(code) = code {
        if state.province.code_exists(code, exclude_id).await? {
            warn!("Duplicate province code {}", code);
            return Err(AppError::bad_request("A province with this code already exists"));
        }
    }
    Ok(())
}

#[instrument(skip(state, current_user, body), fields(name = %body.name))]
pub async fn create_province(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateProvinceDTO>,
) -> Result<Json<ProvinceDTO>, AppError> {
    require_role(&current_user, &[Role::Admin])?;
    body.validate()?;
    ensure_unique(&state, Some(&body.name), Some(&body.code), None).await?;

    let province = state.province.create(&body, current_user.id()).await?;
    info!("Province {} created", province.id);
    Ok(Json(province.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_province(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(province_id): Path<i32>,
    Json(body): Json<UpdateProvinceDTO>,
) -> Result<Json<ProvinceDTO>, AppError> {
    require_role(&current_user, &[Role::Admin])?;
    body.validate()?;

    if state.province.read(&province_id).await?.is_none() {
        return Err(AppError::not_found("Province not found"));
    }
    ensure_unique(
        &state,
        body.name.as_deref(),
        body.code.as_deref(),
        Some(province_id),
    )
    .await?;

    let province = state
        .province
        .update(&province_id, &body, current_user.id())
        .await?;
    Ok(Json(province.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_province(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(province_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin])?;

    if state.province.read(&province_id).await?.is_none() {
        return Err(AppError::not_found("Province not found"));
    }
    if state.province.count_regions(&province_id).await? > 0 {
        return Err(AppError::bad_request("Province still has regions")
            .with_details("Delete or move its regions first"));
    }

    state.province.delete(&province_id, current_user.id()).await?;
    info!("Province deleted");
    Ok(StatusCode::NO_CONTENT)
}
