//! Login and registration form rules.
//!
//! Messages are the user-facing Portuguese strings shown above the forms.

use thiserror::Error;

use crate::{Email, EmailError, LoginCredentials, RegisterData};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A form failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, preencha todos os campos.")]
    MissingFields,

    #[error("As senhas não coincidem.")]
    PasswordMismatch,

    #[error("A senha deve ter pelo menos {min} caracteres.")]
    PasswordTooShort { min: usize },

    #[error("Informe um email válido.")]
    InvalidEmail(#[from] EmailError),
}

/// Validate the login form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingFields`] if either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<LoginCredentials, ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    Ok(LoginCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Validate the registration form.
///
/// Checks run in order: required fields, matching confirmation, minimum
/// length, then email shape.
///
/// # Errors
///
/// Returns the first rule that fails.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RegisterData, ValidationError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    let email = Email::parse(email)?;

    Ok(RegisterData {
        name: name.to_string(),
        email: email.into_inner(),
        password: password.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        assert_eq!(
            validate_login("", "secret").unwrap_err(),
            ValidationError::MissingFields
        );
        assert_eq!(
            validate_login("a@b.com", "").unwrap_err(),
            ValidationError::MissingFields
        );
        assert_eq!(
            validate_login("   ", "secret").unwrap_err(),
            ValidationError::MissingFields
        );
    }

    #[test]
    fn test_login_trims_email_not_password() {
        let creds = validate_login(" a@b.com ", " pw ").unwrap();
        assert_eq!(creds.email, "a@b.com");
        assert_eq!(creds.password, " pw ");
    }

    #[test]
    fn test_registration_missing_fields() {
        let err = validate_registration("Ana", "ana@x.com", "123456", "").unwrap_err();
        assert_eq!(err, ValidationError::MissingFields);
        assert_eq!(err.to_string(), "Por favor, preencha todos os campos.");
    }

    #[test]
    fn test_registration_mismatch_checked_before_length() {
        let err = validate_registration("Ana", "ana@x.com", "123", "1234").unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
    }

    #[test]
    fn test_registration_short_password() {
        let err = validate_registration("Ana", "ana@x.com", "12345", "12345").unwrap_err();
        assert_eq!(err.to_string(), "A senha deve ter pelo menos 6 caracteres.");
    }

    #[test]
    fn test_registration_invalid_email() {
        let err = validate_registration("Ana", "ana.x.com", "123456", "123456").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail(_)));
    }

    #[test]
    fn test_registration_ok() {
        let data = validate_registration(" Ana Souza ", "ana@x.com", "123456", "123456").unwrap();
        assert_eq!(data.name, "Ana Souza");
        assert_eq!(data.email, "ana@x.com");
    }
}
