//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses (same rule as the account schema:
    /// something@something.something, no whitespace)
    static ref EMAIL_REGEX: Regex = Regex::new(r"^\S+@\S+\.\S+$").unwrap();
}

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate a username (required, min 3 characters)
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LENGTH
        ));
    }

    Ok(())
}

/// Validate an email address format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }

    Ok(())
}

/// Validate a raw password (required, min 6 characters before hashing)
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate a review rating (integer in [1,5])
pub fn validate_rating(rating: Option<i64>) -> Result<i64, String> {
    match rating {
        Some(r) if (1..=5).contains(&r) => Ok(r),
        _ => Err("Rating must be between 1 and 5".to_string()),
    }
}

/// Validate a review comment (required, non-empty after trimming)
pub fn validate_comment(comment: Option<&str>) -> Result<&str, String> {
    match comment {
        Some(c) if !c.trim().is_empty() => Ok(c),
        _ => Err("Comment is required".to_string()),
    }
}
