//! User entity - Entità utente con metodi per gestione password

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub organization_unit_id: Option<i32>,
    pub is_active: bool,
    pub last_login_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_password(password: &str) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: User::hash_password(password).expect("hash"),
            full_name: "Alice".to_string(),
            phone_number: None,
            organization_unit_id: None,
            is_active: true,
            last_login_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn verify_password_accepts_matching_password() {
        let user = user_with_password("Password123");
        assert!(user.verify_password("Password123"));
        assert!(!user.verify_password("password123"));
    }

    #[test]
    fn verify_password_rejects_garbage_hash() {
        let mut user = user_with_password("Password123");
        user.password = "not-a-hash".to_string();
        assert!(!user.verify_password("Password123"));
    }
}
