//! Auth services - Login, logout, refresh dei token e cambio password

use crate::core::{AppError, AppState, CurrentUser, encode_jwt};
use crate::dtos::{
    ChangePasswordDTO, CreateActivityLogDTO, LoginDTO, LoginResponseDTO, RefreshTokenDTO, UserDTO,
};
use crate::entities::{Role, User};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, StatusCode, header},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

pub const ACTIVITY_LOGIN: &str = "Login";
pub const ACTIVITY_LOGOUT: &str = "Logout";
pub const ACTIVITY_CHANGE_PASSWORD: &str = "ChangePassword";

/// Client address: first hop of `X-Forwarded-For` when present
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Scrive una riga di log attività; un errore di scrittura non blocca la richiesta
async fn record_activity(
    state: &AppState,
    headers: &HeaderMap,
    user_id: Option<i32>,
    activity_type: &'static str,
    description: String,
    error_message: Option<&str>,
) {
    let entry = CreateActivityLogDTO {
        user_id,
        activity_type,
        description,
        ip_address: client_ip(headers),
        user_agent: user_agent(headers),
        is_successful: error_message.is_none(),
        error_message: error_message.map(str::to_string),
    };
    if let Err(e) = state.activity_log.record(&entry).await {
        warn!("Failed to record {} activity: {}", activity_type, e);
    }
}

/// Emette access token e un nuovo refresh token per l'utente
fn issue_tokens(state: &AppState, user: &User, roles: &[Role]) -> Result<LoginResponseDTO, AppError> {
    let access_token = encode_jwt(user, roles, &state.auth)?;
    let refresh_token = state.refresh_tokens.issue(user.id);

    Ok(LoginResponseDTO {
        access_token,
        refresh_token,
        expires_in: state.auth.expires_in(),
        user_id: user.id,
        full_name: user.full_name.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    })
}

#[instrument(skip(state, headers, body), fields(username = %body.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginDTO>,
) -> Result<Json<LoginResponseDTO>, AppError> {
    // 1. Validare il body (username e password obbligatori)
    // 2. Cercare l'utente per username o email
    // 3. Verificare la password; in caso di errore registrare il tentativo fallito e ritornare 401
    // 4. Un utente disattivato riceve 403
    // 5. Aggiornare la data di ultimo accesso, emettere i token e registrare il login
    body.validate()?;

    let user = match state.user.find_by_login(&body.username).await? {
        Some(user) if user.verify_password(&body.password) => user,
        maybe_user => {
            warn!("Invalid credentials");
            record_activity(
                &state,
                &headers,
                maybe_user.map(|u| u.id),
                ACTIVITY_LOGIN,
                format!("Failed login for {}", body.username),
                Some("Invalid username or password"),
            )
            .await;
            return Err(AppError::unauthorized("Invalid username or password"));
        }
    };

    if !user.is_active {
        warn!("Login attempt on disabled account");
        record_activity(
            &state,
            &headers,
            Some(user.id),
            ACTIVITY_LOGIN,
            format!("Failed login for {}", user.username),
            Some("User account is disabled"),
        )
        .await;
        return Err(AppError::forbidden("User account is disabled"));
    }

    state.user.touch_last_login(&user.id).await?;
    let roles = state.user.find_roles(&user.id).await?;
    let response = issue_tokens(&state, &user, &roles)?;

    record_activity(
        &state,
        &headers,
        Some(user.id),
        ACTIVITY_LOGIN,
        format!("User {} logged in", user.username),
        None,
    )
    .await;

    info!("User logged in");
    Ok(Json(response))
}

#[instrument(skip(state, headers, current_user), fields(user_id = %current_user.id()))]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    let revoked = state.refresh_tokens.revoke_user(current_user.id());
    debug!("Revoked {} refresh tokens on logout", revoked);

    record_activity(
        &state,
        &headers,
        Some(current_user.id()),
        ACTIVITY_LOGOUT,
        format!("User {} logged out", current_user.user.username),
        None,
    )
    .await;

    info!("User logged out");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, body))]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshTokenDTO>,
) -> Result<Json<LoginResponseDTO>, AppError> {
    body.validate()?;

    // il token viene consumato anche se poi l'utente risulta non valido
    let user_id = state.refresh_tokens.consume(&body.refresh_token).ok_or_else(|| {
        warn!("Unknown or expired refresh token");
        AppError::unauthorized("Invalid refresh token")
    })?;

    let user = match state.user.read(&user_id).await? {
        Some(user) if user.is_active => user,
        _ => {
            warn!("Refresh token owner {} missing or disabled", user_id);
            return Err(AppError::unauthorized("Invalid refresh token"));
        }
    };

    let roles = state.user.find_roles(&user.id).await?;
    info!("Tokens refreshed for user {}", user.id);
    Ok(Json(issue_tokens(&state, &user, &roles)?))
}

#[instrument(skip(state, headers, current_user, body), fields(user_id = %current_user.id()))]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordDTO>,
) -> Result<StatusCode, AppError> {
    body.validate()?;

    if !current_user.user.verify_password(&body.current_password) {
        warn!("Wrong current password");
        record_activity(
            &state,
            &headers,
            Some(current_user.id()),
            ACTIVITY_CHANGE_PASSWORD,
            "Password change rejected".to_string(),
            Some("Current password is incorrect"),
        )
        .await;
        return Err(AppError::bad_request("Current password is incorrect"));
    }

    let password_hash = User::hash_password(&body.new_password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;
    state
        .user
        .update_password(&current_user.id(), &password_hash)
        .await?;

    record_activity(
        &state,
        &headers,
        Some(current_user.id()),
        ACTIVITY_CHANGE_PASSWORD,
        "Password changed".to_string(),
        None,
    )
    .await;

    info!("Password changed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<UserDTO> {
    Json(UserDTO::from((current_user.user, current_user.roles)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_uses_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
