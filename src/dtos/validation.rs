//! Validatori custom condivisi dai DTO

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref UPPERCASE: Regex = Regex::new("[A-Z]").expect("valid regex");
    static ref LOWERCASE: Regex = Regex::new("[a-z]").expect("valid regex");
    static ref DIGIT: Regex = Regex::new("[0-9]").expect("valid regex");
    static ref PHONE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").expect("valid regex");
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(validation_error("password_too_short", "Password must be at least 8 characters long"));
    }
    if !UPPERCASE.is_match(password) {
        return Err(validation_error("password_no_uppercase", "Password must contain at least one uppercase letter"));
    }
    if !LOWERCASE.is_match(password) {
        return Err(validation_error("password_no_lowercase", "Password must contain at least one lowercase letter"));
    }
    if !DIGIT.is_match(password) {
        return Err(validation_error("password_no_digit", "Password must contain at least one digit"));
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(validation_error("invalid_phone_number", "Phone number may only contain digits, spaces and dashes"))
    }
}

/// JSON text fields (scope details, cooperating units) must at least parse.
pub fn validate_json_text(text: &str) -> Result<(), ValidationError> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|_| ())
        .map_err(|_| validation_error("invalid_json", "Field must contain valid JSON"))
}
