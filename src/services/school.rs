//! School services

use super::require_term;
use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{CreateSchoolDTO, SchoolDTO, SearchQuery, UpdateSchoolDTO};
use crate::entities::{Role, School};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

const SCHOOL_EDITORS: [Role; 2] = [Role::Admin, Role::Manager];

fn to_dtos(schools: Vec<School>) -> Json<Vec<SchoolDTO>> {
    Json(schools.into_iter().map(SchoolDTO::from).collect())
}

#[instrument(skip(state))]
pub async fn list_schools(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SchoolDTO>>, AppError> {
    Ok(to_dtos(state.school.find_all().await?))
}

#[instrument(skip(state))]
pub async fn list_schools_by_region(
    State(state): State<Arc<AppState>>,
    Path(region_id): Path<i32>,
) -> Result<Json<Vec<SchoolDTO>>, AppError> {
    Ok(to_dtos(state.school.find_by_region(&region_id).await?))
}

#[instrument(skip(state))]
pub async fn list_schools_by_province(
    State(state): State<Arc<AppState>>,
    Path(province_id): Path<i32>,
) -> Result<Json<Vec<SchoolDTO>>, AppError> {
    Ok(to_dtos(state.school.find_by_province(&province_id).await?))
}

#[instrument(skip(state), fields(term = %params.term))]
pub async fn search_schools(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<SchoolDTO>>, AppError> {
    let term = require_term(&params.term)?;
    let schools = state.school.search(term).await?;
    debug!("Found {} schools", schools.len());
    Ok(to_dtos(schools))
}

#[instrument(skip(state))]
pub async fn get_school(
    State(state): State<Arc<AppState>>,
    Path(school_id): Path<i32>,
) -> Result<Json<SchoolDTO>, AppError> {
    let school = state
        .school
        .read(&school_id)
        .await?
        .ok_or_else(|| AppError::not_found("School not found"))?;
    Ok(Json(school.into()))
}

/// Region and province, when given, must exist
async fn ensure_parents_exist(
    state: &AppState,
    region_id: Option<i32>,
    province_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(region_id) = region_id {
        if state.region.read(&region_id).await?.is_none() {
            return Err(AppError::not_found("Region not found"));
        }
    }
    if let Some(province_id) = province_id {
        if state.province.read(&province_id).await?.is_none() {
            return Err(AppError::not_found("Province not found"));
        }
    }
    Ok(())
}

async fn ensure_unique(
    state: &AppState,
    name: Option<&str>,
    code: Option<&str>,
    exclude_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        if state.school.name_exists(name, exclude_id).await? {
            return Err(AppError::bad_request("A school with this name already exists"));
        }
    }
    if let Some(code) = code {
        if state.school.code_exists(code, exclude_id).await? {
            return Err(AppError::bad_request("A school with this code already exists"));
        }
    }
    Ok(())
}

#[instrument(skip(state, current_user, body), fields(name = %body.name))]
pub async fn create_school(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateSchoolDTO>,
) -> Result<Json<SchoolDTO>, AppError> {
    require_role(&current_user, &SCHOOL_EDITORS)?;
    body.validate()?;
    ensure_parents_exist(&state, body.region_id, body.province_id).await?;
    ensure_unique(&state, Some(&body.name), Some(&body.code), None).await?;

    let school = state.school.create(&body, current_user.id()).await?;
    info!("School {} created", school.id);
    Ok(Json(school.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_school(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(school_id): Path<i32>,
    Json(body): Json<UpdateSchoolDTO>,
) -> Result<Json<SchoolDTO>, AppError> {
    require_role(&current_user, &SCHOOL_EDITORS)?;
    body.validate()?;

    if state.school.read(&school_id).await?.is_none() {
        return Err(AppError::not_found("School not found"));
    }
    ensure_parents_exist(&state, body.region_id, body.province_id).await?;
    ensure_unique(
        &state,
        body.name.as_deref(),
        body.code.as_deref(),
        Some(school_id),
    )
    .await?;

    let school = state
        .school
        .update(&school_id, &body, current_user.id())
        .await?;
    Ok(Json(school.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_school(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(school_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin])?;

    state.school.delete(&school_id, current_user.id()).await?;
    info!("School deleted");
    Ok(StatusCode::NO_CONTENT)
}
