//! User services - Gestione utenti e ruoli (solo Admin)

use crate::core::{AppError, AppState, CurrentUser, require_role};
use crate::dtos::{ActivityLogDTO, CreateUserDTO, ResetPasswordDTO, UpdateUserDTO, UserDTO, UserListQuery, parse_roles};
use crate::entities::{Role, User};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const USER_ADMINS: [Role; 1] = [Role::Admin];

fn roles_or_bad_request(names: &[String]) -> Result<Vec<Role>, AppError> {
    parse_roles(names).map_err(|unknown| {
        warn!("Unknown role requested: {}", unknown);
        AppError::bad_request("Unknown role").with_details(format!("Role '{}' does not exist", unknown))
    })
}

#[instrument(skip(state, current_user), fields(admin_id = %current_user.id()))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<UserListQuery>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    require_role(&current_user, &USER_ADMINS)?;

    let role = match params.role.as_deref().filter(|r| !r.is_empty()) {
        Some(name) => Some(
            name.parse::<Role>()
                .map_err(|_| AppError::bad_request("Unknown role"))?,
        ),
        None => None,
    };
    let (limit, offset) = params.pagination().limit_offset();

    let users = state.user.list(role, limit, offset).await?;
    debug!("Loaded page of {} users", users.len());

    let mut result = Vec::with_capacity(users.len());
    for user in users {
        let roles = state.user.find_roles(&user.id).await?;
        result.push(UserDTO::from((user, roles)));
    }
    Ok(Json(result))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserDTO>, AppError> {
    require_role(&current_user, &USER_ADMINS)?;

    let user = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let roles = state.user.find_roles(&user.id).await?;
    Ok(Json(UserDTO::from((user, roles))))
}

#[instrument(skip(state, current_user, body), fields(email = %body.email))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    // 1. Solo un Admin può creare utenti
    // 2. Validare il DTO (email, nome, forza della password, telefono)
    // 3. Rifiutare email già registrate e ruoli sconosciuti
    // 4. Salvare l'utente con la password hashata e i suoi ruoli
    require_role(&current_user, &USER_ADMINS)?;
    body.validate()?;

    if state.user.find_by_email(&body.email).await?.is_some()
        || state.user.find_by_username(&body.email).await?.is_some()
    {
        warn!("Email already registered");
        return Err(AppError::bad_request("A user with this email already exists"));
    }

    let roles = roles_or_bad_request(&body.roles)?;
    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let user = state.user.create(&body, &password_hash, &roles).await?;
    let roles = state.user.find_roles(&user.id).await?;

    info!("User {} created", user.id);
    Ok(Json(UserDTO::from((user, roles))))
}

#[instrument(skip(state, current_user, body), fields(user_id = %user_id))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Json(body): Json<UpdateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    require_role(&current_user, &USER_ADMINS)?;
    body.validate()?;

    if state.user.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let roles = body.roles.as_deref().map(roles_or_bad_request).transpose()?;

    let user = state.user.update_profile(&user_id, &body).await?;
    if let Some(roles) = roles {
        state.user.set_roles(&user_id, &roles).await?;
        // i token già emessi portano ancora i vecchi ruoli
        state.refresh_tokens.revoke_user(user_id);
    }
    if !user.is_active {
        state.refresh_tokens.revoke_user(user_id);
    }

    let roles = state.user.find_roles(&user_id).await?;
    info!("User updated");
    Ok(Json(UserDTO::from((user, roles))))
}

#[instrument(skip(state, current_user, body), fields(user_id = %user_id))]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
    Json(body): Json<ResetPasswordDTO>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &USER_ADMINS)?;
    body.validate()?;

    if state.user.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let password_hash = User::hash_password(&body.new_password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;
    state.user.update_password(&user_id, &password_hash).await?;
    state.refresh_tokens.revoke_user(user_id);

    info!("Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn list_user_activity(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<ActivityLogDTO>>, AppError> {
    require_role(&current_user, &USER_ADMINS)?;

    if state.user.read(&user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }
    let logs = state.activity_log.find_by_user(&user_id).await?;
    Ok(Json(logs.into_iter().map(ActivityLogDTO::from).collect()))
}
