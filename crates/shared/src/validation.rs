//! Common validation utilities.

use validator::ValidationError;

/// Minimum password length accepted at registration and reset.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validates that a password meets the minimum strength requirements:
/// at least 8 characters with one uppercase letter, one lowercase letter,
/// and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        let mut err = ValidationError::new("password_length");
        err.message = Some("Password must be at least 8 characters".into());
        return Err(err);
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password must contain an uppercase letter, a lowercase letter, and a digit".into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strong_passwords() {
        assert!(validate_password_strength("SecureP4ss").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());
    }

    #[test]
    fn test_rejects_short_passwords() {
        assert!(validate_password_strength("Ab1").is_err());
        assert!(validate_password_strength("").is_err());
    }

    #[test]
    fn test_rejects_missing_character_classes() {
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1").is_err());
        assert!(validate_password_strength("NoDigitsHere").is_err());
    }

    #[test]
    fn test_length_is_checked_before_classes() {
        let err = validate_password_strength("Ab1").unwrap_err();
        assert_eq!(err.code, "password_length");
    }
}
