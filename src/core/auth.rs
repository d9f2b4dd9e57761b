use crate::core::config::AuthSettings;
use crate::core::{AppError, AppState};
use crate::entities::{Role, User};
use crate::repositories::Read;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub iss: String,
    pub aud: String,
    pub jti: String,
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

/// Utente autenticato con i suoi ruoli, inserito nelle extension dal middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[instrument(skip(user, roles, settings), fields(username = %user.username, id = %user.id))]
pub fn encode_jwt(user: &User, roles: &[Role], settings: &AuthSettings) -> Result<String, AppError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire = Duration::minutes(settings.access_token_minutes);
    let claim = Claims {
        iat: now.timestamp() as usize,
        exp: (now + expire).timestamp() as usize,
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
        jti: Uuid::new_v4().to_string(),
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map(|token| {
        info!("JWT token encoded successfully");
        token
    })
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, settings))]
pub fn decode_jwt(
    jwt_token: &str,
    settings: &AuthSettings,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    let mut validation = Validation::default();
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_audience(&[settings.audience.as_str()]);

    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )
    .inspect(|data| debug!("JWT token decoded for user: {}", data.claims.username))
}

/// Estrae il token dall'header `Authorization: Bearer <token>`
fn bearer_token(req: &Request) -> Result<&str, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized("Please add the JWT token to the header")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?;

    let mut header = auth_header.split_whitespace();
    match (header.next(), header.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => {
            warn!("Authorization header is not a bearer token");
            Err(AppError::unauthorized("Invalid authorization header"))
        }
    }
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token_data = match decode_jwt(bearer_token(&req)?, &state.auth) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to decode JWT token: {}", e);
            return Err(AppError::unauthorized("Unable to decode token"));
        }
    };

    // Fetch the user details from the database
    let user = match state.user.read(&token_data.claims.id).await? {
        Some(user) => user,
        None => {
            warn!("User not found in database: {}", token_data.claims.username);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };

    if !user.is_active {
        warn!("Inactive user tried to authenticate: {}", user.username);
        return Err(AppError::forbidden("User account is disabled"));
    }

    let roles = state.user.find_roles(&user.id).await?;
    info!("User authenticated: {}", user.username);
    req.extensions_mut().insert(CurrentUser { user, roles });
    Ok(next.run(req).await)
}

/// Helper function per verificare che un utente abbia uno dei ruoli richiesti
///
/// # Arguments
/// * `current_user` - L'utente autenticato
/// * `allowed_roles` - Lista di ruoli permessi
///
/// # Returns
/// * `Ok(())` se almeno un ruolo è permesso
/// * `Err(AppError)` con 403 altrimenti
#[instrument(skip(current_user), fields(user_id = %current_user.user.id))]
pub fn require_role(current_user: &CurrentUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    if current_user.roles.iter().any(|r| allowed_roles.contains(r)) {
        debug!("Role check passed");
        return Ok(());
    }

    warn!(
        "User has insufficient roles {:?}, required one of: {:?}",
        current_user.roles, allowed_roles
    );
    Err(AppError::forbidden("Insufficient role").with_details(format!(
        "This action requires one of the following roles: {:?}",
        allowed_roles
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 42,
            username: "operator@example.com".to_string(),
            email: "operator@example.com".to_string(),
            password: String::new(),
            full_name: "Operator".to_string(),
            phone_number: None,
            organization_unit_id: None,
            is_active: true,
            last_login_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn encode_then_decode_preserves_identity_and_roles() {
        let settings = AuthSettings::new("test-secret");
        let token = encode_jwt(&sample_user(), &[Role::Operator], &settings).expect("encode");

        let data = decode_jwt(&token, &settings).expect("decode");
        assert_eq!(data.claims.id, 42);
        assert_eq!(data.claims.roles, vec!["Operator".to_string()]);
        assert_eq!(data.claims.iss, "EventsManagement");
    }

    #[test]
    fn decode_rejects_wrong_audience() {
        let settings = AuthSettings::new("test-secret");
        let token = encode_jwt(&sample_user(), &[], &settings).expect("encode");

        let mut other = settings.clone();
        other.audience = "SomeoneElse".to_string();
        assert!(decode_jwt(&token, &other).is_err());
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let settings = AuthSettings::new("test-secret");
        let token = encode_jwt(&sample_user(), &[], &settings).expect("encode");

        assert!(decode_jwt(&token, &AuthSettings::new("another-secret")).is_err());
    }

    #[test]
    fn require_role_checks_membership() {
        let current = CurrentUser {
            user: sample_user(),
            roles: vec![Role::Operator],
        };
        assert!(require_role(&current, &[Role::Admin, Role::Operator]).is_ok());
        let err = require_role(&current, &[Role::Admin]).unwrap_err();
        assert_eq!(err.status(), http::StatusCode::FORBIDDEN);
        assert!(!current.is_admin());
    }
}
