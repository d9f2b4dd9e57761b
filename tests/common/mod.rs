#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use events_management::core::{AppState, AuthSettings, Claims, StorageSettings};
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Id degli utenti caricati da `fixtures/users.sql`
pub const ADMIN_ID: i32 = 1;
pub const MANAGER_ID: i32 = 2;
pub const OPERATOR_ID: i32 = 3;
pub const VIEWER_ID: i32 = 4;
pub const DISABLED_ID: i32 = 5;

pub fn test_auth_settings() -> AuthSettings {
    AuthSettings::new(TEST_JWT_SECRET)
}

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool SQLite fornito da `#[sqlx::test]`
///
/// # Returns
/// Arc<AppState> con il JWT secret di test e una directory di upload temporanea
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    let upload_dir = tempfile::tempdir()
        .expect("Failed to create upload dir")
        .keep();
    let mut storage = StorageSettings::new(upload_dir);
    storage.max_file_size = 1024 * 1024;
    Arc::new(AppState::new(pool, test_auth_settings(), storage))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = events_management::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Shortcut: state + server dallo stesso pool
pub fn setup(pool: SqlitePool) -> (Arc<AppState>, TestServer) {
    let state = create_test_state(pool);
    let server = create_test_server(state.clone());
    (state, server)
}

/// Genera un JWT token per testing
///
/// Il middleware ricarica utente e ruoli dal database, quindi bastano id e username.
pub fn create_test_jwt(user_id: i32) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let settings = test_auth_settings();
    let now = Utc::now();
    let claims = Claims {
        exp: (now + Duration::hours(24)).timestamp() as usize,
        iat: now.timestamp() as usize,
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
        jti: uuid::Uuid::new_v4().to_string(),
        id: user_id,
        username: format!("user{}", user_id),
        email: format!("user{}@example.com", user_id),
        full_name: "Test User".to_string(),
        roles: vec![],
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Valore dell'header `Authorization` per l'utente indicato
pub fn bearer(user_id: i32) -> String {
    format!("Bearer {}", create_test_jwt(user_id))
}

pub fn authorization() -> HeaderName {
    HeaderName::from_static("authorization")
}
