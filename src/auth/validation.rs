//! Registration form checks, run before anything is sent

use thiserror::Error;

use crate::models::RegisterRequest;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("La contraseña debe tener al menos 6 caracteres")]
    PasswordTooShort,

    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,
}

impl ValidationError {
    /// Form field the message belongs under
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::PasswordTooShort => "password",
            ValidationError::PasswordMismatch => "confirmPassword",
        }
    }
}

/// Register form as typed, including the confirmation field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Every failing check, in field order. Empty means valid.
    pub fn errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ValidationError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            errors.push(ValidationError::PasswordMismatch);
        }
        errors
    }

    /// The request to send, without the confirmation field
    pub fn validate(&self) -> Result<RegisterRequest, Vec<ValidationError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}
