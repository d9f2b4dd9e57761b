//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione, JWT e refresh token
//! - Configurazione
//! - Gestione errori
//! - Storage dei file
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod tokens;

// Re-exports per facilitare l'import
pub use auth::{Claims, CurrentUser, authentication_middleware, decode_jwt, encode_jwt, require_role};
pub use config::{AuthSettings, Config, StorageSettings};
pub use error::AppError;
pub use state::AppState;
pub use storage::FileStorage;
pub use tokens::RefreshTokenStore;
