//! Region services

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{CreateRegionDTO, RegionDTO, UpdateRegionDTO};
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
pub async fn list_regions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RegionDTO>>, AppError> {
    let regions = state.region.find_all().await?;
    Ok(Json(regions.into_iter().map(RegionDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_regions_by_province(
    State(state): State<Arc<AppState>>,
    Path(province_id): Path<i32>,
) -> Result<Json<Vec<RegionDTO>>, AppError> {
    let regions = state.region.find_by_province(&province_id).await?;
    Ok(Json(regions.into_iter().map(RegionDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_region(
    State(state): State<Arc<AppState>>,
    Path(region_id): Path<i32>,
) -> Result<Json<RegionDTO>, AppError> {
    let region = state
        .region
        .read(&region_id)
        .await?
        .ok_or_else(|| AppError::not_found("Region not found"))?;
    Ok(Json(region.into()))
}

async fn ensure_province_exists(state: &AppState, province_id: i32) -> Result<(), AppError> {
    if state.province.read(&province_id).await?.is_none() {
        return Err(AppError::not_found("Province not found"));
    }
    Ok(())
}

#[instrument(skip(state, current_user, body), fields(name = %body.name))]
pub async fn create_region(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateRegionDTO>,
) -> Result<Json<RegionDTO>, AppError> {
    require_role(&current_user, &[Role::Admin])?;
    body.validate()?;
    ensure_province_exists(&state, body.province_id).await?;

    if state
        .region
        .name_exists_in_province(&body.name, body.province_id, None)
        .await?
    {
        warn!("Duplicate region name in province");
        return Err(AppError::bad_request("A region with this name already exists in the province"));
    }
    if state.region.code_exists(&body.code, None).await? {
        return Err(AppError::bad_request("A region with this code already exists"));
    }

    let region = state.region.create(&body, current_user.id()).await?;
    info!("Region {} created", region.id);
    Ok(Json(region.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_region(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(region_id): Path<i32>,
    Json(body): Json<UpdateRegionDTO>,
) -> Result<Json<RegionDTO>, AppError> {
    require_role(&current_user, &[Role::Admin])?;
    body.validate()?;

    let current = state
        .region
        .read(&region_id)
        .await?
        .ok_or_else(|| AppError::not_found("Region not found"))?;

    if let Some(province_id) = body.province_id {
        ensure_province_exists(&state, province_id).await?;
    }

    // il nome va ricontrollato anche quando cambia solo la provincia
    let name = body.name.as_deref().unwrap_or(&current.name);
    let province_id = body.province_id.unwrap_or(current.province_id);
    if state
        .region
        .name_exists_in_province(name, province_id, Some(region_id))
        .await?
    {
        return Err(AppError::bad_request("A region with this name already exists in the province"));
    }
    if let Some(ref code) = body.code {
        if state.region.code_exists(code, Some(region_id)).await? {
            return Err(AppError::bad_request("A region with this code already exists"));
        }
    }

    let region = state
        .region
        .update(&region_id, &body, current_user.id())
        .await?;
    Ok(Json(region.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_region(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(region_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin])?;

    if state.region.read(&region_id).await?.is_none() {
        return Err(AppError::not_found("Region not found"));
    }
    if state.region.count_schools(&region_id).await? > 0 {
        return Err(AppError::bad_request("Region still has schools")
            .with_details("Delete or move its schools first"));
    }

    state.region.delete(&region_id, current_user.id()).await?;
    info!("Region deleted");
    Ok(StatusCode::NO_CONTENT)
}
