//! Registration policy for usernames, emails and passwords.

use cabinet_core::config::AuthConfig;
use cabinet_core::error::AppError;
use cabinet_core::types::validate_name;

const MAX_USERNAME_LEN: usize = 50;

/// Checks registration input against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validate a new password.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if password.trim().is_empty() {
            return Err(AppError::validation("Password must not be blank"));
        }
        Ok(())
    }

    /// Validate a username. It becomes the top-level blob key segment, so
    /// it follows the folder name rules plus a restricted alphabet.
    pub fn validate_username(&self, username: &str) -> Result<(), AppError> {
        validate_name(username)?;
        if username.len() > MAX_USERNAME_LEN {
            return Err(AppError::validation(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(AppError::validation(
                "Username may only contain letters, digits, '_', '-' and '.'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_password_length() {
        assert!(validator().validate("short").is_err());
        assert!(validator().validate("        ").is_err());
        assert!(validator().validate("long enough").is_ok());
    }

    #[test]
    fn test_username_alphabet() {
        assert!(validator().validate_username("alice_01").is_ok());
        assert!(validator().validate_username("al ice").is_err());
        assert!(validator().validate_username("..").is_err());
        assert!(validator().validate_username(&"a".repeat(51)).is_err());
    }
}
