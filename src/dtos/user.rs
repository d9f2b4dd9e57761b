//! User DTOs - Data Transfer Objects per utenti

use crate::dtos::validation::{validate_password_strength, validate_phone_number};
use crate::entities::{Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// struct per gestire io col client, la password non viene mai esposta
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub organization_unit_id: Option<i32>,
    pub is_active: bool,
    pub last_login_date: Option<DateTime<Utc>>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<(User, Vec<Role>)> for UserDTO {
    fn from((user, roles): (User, Vec<Role>)) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone_number: user.phone_number,
            organization_unit_id: user.organization_unit_id,
            is_active: user.is_active,
            last_login_date: user.last_login_date,
            roles,
            created_at: user.created_at,
        }
    }
}

/// DTO per creare un nuovo utente: l'email è anche lo username
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(email(message = "Email is not valid"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: String,

    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,

    pub organization_unit_id: Option<i32>,

    #[serde(default)]
    pub roles: Vec<String>,
}

/// DTO per aggiornare un utente; se `roles` è presente sostituisce i ruoli correnti
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateUserDTO {
    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    pub full_name: String,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,

    pub organization_unit_id: Option<i32>,

    pub is_active: bool,

    pub roles: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Validate)]
pub struct ResetPasswordDTO {
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// Parses role names coming from clients, failing on the first unknown one.
pub fn parse_roles(names: &[String]) -> Result<Vec<Role>, String> {
    let mut roles = Vec::with_capacity(names.len());
    for name in names {
        let role = name.parse::<Role>().map_err(|_| name.clone())?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roles_deduplicates_and_rejects_unknown() {
        let roles = parse_roles(&["Admin".into(), "admin".into(), "Viewer".into()]).unwrap();
        assert_eq!(roles, vec![Role::Admin, Role::Viewer]);

        assert_eq!(parse_roles(&["Root".into()]), Err("Root".to_string()));
    }

    #[test]
    fn create_user_validation() {
        let dto = CreateUserDTO {
            email: "not-an-email".to_string(),
            full_name: "".to_string(),
            password: "short".to_string(),
            phone_number: Some("abc".to_string()),
            organization_unit_id: None,
            roles: vec![],
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone_number"));
    }
}
