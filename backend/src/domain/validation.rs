//! Field-level input checks shared by the services.
//!
//! Each helper returns a `Validation` error naming the offending field.
//! Accepted values come back exactly as submitted; surrounding whitespace
//! only matters to the length checks.

use super::errors::{DomainError, DomainResult};

/// Value whose trimmed length in characters lies within `min..=max`
pub fn text(field: &str, value: &str, min: usize, max: usize) -> DomainResult<String> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(DomainError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value.to_string())
}

pub fn non_empty(field: &str, value: &str) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Blank optional text is treated as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Optional text in a partial update: `Some(None)` clears the stored value
pub fn clearable_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| optional_text(Some(v)))
}

/// Registration codes: uppercase ASCII letters and digits
pub fn registration(field: &str, value: &str, min: usize, max: usize) -> DomainResult<String> {
    let code = text(field, value, min, max)?;
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "{field} must contain only uppercase letters and digits"
        )));
    }
    Ok(code)
}

/// Two-letter state code, uppercase
pub fn state(value: &str) -> DomainResult<String> {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::validation(
            "state must be two uppercase letters",
        ));
    }
    Ok(value.to_string())
}

/// `NNNNN-NNN` or `NNNNNNNN`
pub fn postal_code(value: &str) -> DomainResult<String> {
    let code = value;
    let digits_only = code.len() == 8 && code.chars().all(|c| c.is_ascii_digit());
    let hyphenated = code.len() == 9
        && code
            .char_indices()
            .all(|(i, c)| if i == 5 { c == '-' } else { c.is_ascii_digit() });

    if !digits_only && !hyphenated {
        return Err(DomainError::validation(
            "postal_code must be in the format 12345-678 or 12345678",
        ));
    }
    Ok(code.to_string())
}

/// Shape check only: one `@`, non-empty local part, dotted domain
pub fn email(value: &str) -> DomainResult<String> {
    let email = value;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(DomainError::validation("email must be a valid address"));
    }
    Ok(email.to_string())
}

pub fn password(value: &str) -> DomainResult<&str> {
    if value.chars().count() < 6 {
        return Err(DomainError::validation(
            "password must be at least 6 characters",
        ));
    }
    Ok(value)
}

pub fn rating(value: u8) -> DomainResult<u8> {
    if !(1..=5).contains(&value) {
        return Err(DomainError::validation("rating must be between 1 and 5"));
    }
    Ok(value)
}
