//! OrganizationUnit services - CRUD e albero gerarchico delle unità

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{
    CreateOrganizationUnitDTO, OrganizationUnitDTO, OrganizationUnitNodeDTO,
    OrganizationUnitQuery, UpdateOrganizationUnitDTO,
};
use crate::entities::Role;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const UNIT_EDITORS: [Role; 2] = [Role::Admin, Role::Manager];

#[instrument(skip(state))]
pub async fn list_units(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OrganizationUnitQuery>,
) -> Result<Json<Vec<OrganizationUnitDTO>>, AppError> {
    let units = state
        .organization_unit
        .find_all(params.active_only, params.search.as_deref())
        .await?;
    debug!("Loaded {} organization units", units.len());
    Ok(Json(units.into_iter().map(OrganizationUnitDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_unit(
    State(state): State<Arc<AppState>>,
    Path(unit_id): Path<i32>,
) -> Result<Json<OrganizationUnitDTO>, AppError> {
    let unit = state
        .organization_unit
        .read(&unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Organization unit not found"))?;
    Ok(Json(unit.into()))
}

#[instrument(skip(state))]
pub async fn list_children(
    State(state): State<Arc<AppState>>,
    Path(parent_id): Path<i32>,
) -> Result<Json<Vec<OrganizationUnitDTO>>, AppError> {
    let units = state.organization_unit.find_children(&parent_id).await?;
    Ok(Json(units.into_iter().map(OrganizationUnitDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_hierarchy(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrganizationUnitNodeDTO>>, AppError> {
    let units = state.organization_unit.find_for_hierarchy().await?;
    Ok(Json(OrganizationUnitNodeDTO::build_tree(units)))
}

#[instrument(skip(state, current_user, body), fields(name = %body.name))]
pub async fn create_unit(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateOrganizationUnitDTO>,
) -> Result<Json<OrganizationUnitDTO>, AppError> {
    require_role(&current_user, &UNIT_EDITORS)?;
    body.validate()?;

    if state.organization_unit.name_exists(&body.name, None).await? {
        return Err(AppError::bad_request("An organization unit with this name already exists"));
    }
    if let Some(parent_id) = body.parent_unit_id {
        if state.organization_unit.read(&parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent organization unit not found"));
        }
    }

    let unit = state
        .organization_unit
        .create(&body, current_user.id())
        .await?;
    info!("Organization unit {} created", unit.id);
    Ok(Json(unit.into()))
}

#[instrument(skip(state, current_user, body))]
pub async fn update_unit(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(unit_id): Path<i32>,
    Json(body): Json<UpdateOrganizationUnitDTO>,
) -> Result<Json<OrganizationUnitDTO>, AppError> {
    // 1. Verificare ruolo e validare il DTO
    // 2. L'unità deve esistere
    // 3. Il nome resta unico
    // 4. Il nuovo padre deve esistere e non può stare nel sottoalbero dell'unità
    require_role(&current_user, &UNIT_EDITORS)?;
    body.validate()?;

    if state.organization_unit.read(&unit_id).await?.is_none() {
        return Err(AppError::not_found("Organization unit not found"));
    }

    if let Some(ref name) = body.name {
        if state
            .organization_unit
            .name_exists(name, Some(unit_id))
            .await?
        {
            return Err(AppError::bad_request("An organization unit with this name already exists"));
        }
    }

    if let Some(Some(parent_id)) = body.parent_unit_id {
        if parent_id == unit_id {
            return Err(AppError::bad_request("A unit cannot be its own parent"));
        }
        if state.organization_unit.read(&parent_id).await?.is_none() {
            return Err(AppError::not_found("Parent organization unit not found"));
        }
        if state
            .organization_unit
            .is_in_subtree(unit_id, parent_id)
            .await?
        {
            warn!("Rejected parent {} for unit {}: cycle", parent_id, unit_id);
            return Err(AppError::bad_request("Parent change would create a cycle"));
        }
    }

    let unit = state
        .organization_unit
        .update(&unit_id, &body, current_user.id())
        .await?;
    Ok(Json(unit.into()))
}

#[instrument(skip(state, current_user))]
pub async fn delete_unit(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(unit_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[Role::Admin])?;

    if state.organization_unit.read(&unit_id).await?.is_none() {
        return Err(AppError::not_found("Organization unit not found"));
    }
    if state.organization_unit.has_children(&unit_id).await? {
        return Err(AppError::bad_request("Organization unit still has child units"));
    }

    state
        .organization_unit
        .delete(&unit_id, current_user.id())
        .await?;
    info!("Organization unit deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user))]
pub async fn toggle_unit(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(unit_id): Path<i32>,
) -> Result<Json<OrganizationUnitDTO>, AppError> {
    require_role(&current_user, &UNIT_EDITORS)?;

    let unit = state
        .organization_unit
        .toggle_active(&unit_id, current_user.id())
        .await?;
    Ok(Json(unit.into()))
}
