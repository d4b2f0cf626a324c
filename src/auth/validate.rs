use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

const SPECIAL_CHARS: &str = "$&+,:;=?@#|'<>.^*()%!-";

/// Password strength rules, checked in a fixed order. The first violated
/// rule determines the error the caller sees, even when several fail.
pub fn validate_password(candidate: &str) -> Result<(), ApiError> {
    let trimmed = candidate.trim();

    if trimmed.len() < 8 {
        return Err(ApiError::InvalidPassword(
            "Password must be at least 8 characters long",
        ));
    }
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::InvalidPassword(
            "Password must contain at least one number",
        ));
    }
    if !trimmed.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::InvalidPassword(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !trimmed.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::InvalidPassword(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !trimmed.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ApiError::InvalidPassword(
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

pub fn validate_email(candidate: &str) -> Result<(), ApiError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    if EMAIL_RE.is_match(candidate.trim()) {
        Ok(())
    } else {
        Err(ApiError::InvalidEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_error(candidate: &str) -> &'static str {
        match validate_password(candidate) {
            Err(ApiError::InvalidPassword(msg)) => msg,
            other => panic!("expected password error, got {other:?}"),
        }
    }

    #[test]
    fn rules_fire_in_order() {
        // Each candidate passes rules 1..k-1 and fails rule k.
        assert_eq!(
            password_error("Ab1!"),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            password_error("ABCDefgh!"),
            "Password must contain at least one number"
        );
        assert_eq!(
            password_error("abcdefg1!"),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            password_error("ABCDEFG1!"),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            password_error("ABCDefg1"),
            "Password must contain at least one special character"
        );
    }

    #[test]
    fn short_password_failing_everything_reports_only_length() {
        // All five rules fail; only the first is reported.
        assert_eq!(
            password_error("aa"),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn valid_password_passes() {
        assert!(validate_password("Sup3rSecret!").is_ok());
        // Surrounding whitespace is ignored.
        assert!(validate_password("  Sup3rSecret!  ").is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("  sales@spil.co.id  ").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
