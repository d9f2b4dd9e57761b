//! Auth DTOs - Login, refresh e cambio password

use crate::dtos::validation::validate_password_strength;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO per il login (username oppure email, e password)
#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct LoginDTO {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDTO {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user_id: i32,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct RefreshTokenDTO {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct ChangePasswordDTO {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Password confirmation does not match"))]
    pub confirm_password: String,
}
