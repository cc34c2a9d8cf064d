//! Password hashing, secret generation and input validation helpers

use rand::Rng;
use shared::error::{AppError, ErrorCode};
use validator::Validate;

// ── Length limits ──

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_CODE_LEN: usize = 50;
pub const MAX_SHORT_TEXT_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 30;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_NOTE_LEN: usize = 2000;

/// Length of generated secret keys
pub const SECRET_KEY_LEN: usize = 50;
const SECRET_KEY_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*(-_=+)";

// ── Passwords ──

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Random secret of [`SECRET_KEY_LEN`] characters (letters, digits, punctuation)
pub fn generate_secret_key() -> String {
    let mut rng = rand::thread_rng();
    (0..SECRET_KEY_LEN)
        .map(|_| char::from(SECRET_KEY_CHARS[rng.gen_range(0..SECRET_KEY_CHARS.len())]))
        .collect()
}

/// Current UTC calendar date
pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

// ── Validation ──

/// Non-empty after trimming and at most `max_len` characters
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} is required"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long (max {max_len} characters)"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Only the length is checked when present
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long (max {max_len} characters)"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

/// Run `validator` rules, collecting failing field names into the error details
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort();
        AppError::validation(format!("Invalid fields: {}", fields.join(", ")))
            .with_detail("fields", fields)
    })
}

/// Password policy shared by signup and the setup command
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    validate_required_text(password, "password", MAX_PASSWORD_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Contact {
        #[validate(email)]
        email: Option<String>,
        #[validate(length(min = 1, max = 10))]
        name: String,
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_secret_key_alphabet() {
        let key = generate_secret_key();
        assert_eq!(key.chars().count(), SECRET_KEY_LEN);
        assert!(key.bytes().all(|b| SECRET_KEY_CHARS.contains(&b)));
        assert_ne!(key, generate_secret_key());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Ana", "name", 10).is_ok());
        let err = validate_required_text("   ", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text("abcdefghijk", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "phone", 5).is_ok());
        assert!(validate_optional_text(&Some("12345".into()), "phone", 5).is_ok());
        assert!(validate_optional_text(&Some("123456".into()), "phone", 5).is_err());
    }

    #[test]
    fn test_validate_payload_lists_fields() {
        let ok = Contact {
            email: Some("ana@example.com".into()),
            name: "Ana".into(),
        };
        assert!(validate_payload(&ok).is_ok());

        let bad = Contact {
            email: Some("not-an-email".into()),
            name: String::new(),
        };
        let err = validate_payload(&bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid fields: email, name");
    }

    #[test]
    fn test_password_policy() {
        assert_eq!(
            validate_password("short").unwrap_err().code,
            ErrorCode::PasswordTooShort
        );
        assert!(validate_password("long enough").is_ok());
    }
}
