//! Input validation helpers
//!
//! Forms deliver every field as an optional string; the JSON API accepts
//! numbers either as numbers or as numeric strings. Both paths end up in
//! the helpers below.

use serde_json::Value;

use crate::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Titles, names, developers, platforms
pub const MAX_NAME_LEN: usize = 150;

/// Genres
pub const MAX_GENRE_LEN: usize = 80;

/// Phone numbers and national ids
pub const MAX_SHORT_TEXT_LEN: usize = 30;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 200;

/// Email addresses
pub const MAX_EMAIL_LEN: usize = 100;

// ── Text ────────────────────────────────────────────────────────────

/// Trim a form field, mapping blank input to `None`
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

// ── Numbers ─────────────────────────────────────────────────────────

/// Parse an integer form field
pub fn parse_int(value: &str, field: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::validation(format!("{field} must be a valid integer")))
}

/// Parse a strictly positive integer form field
pub fn parse_positive_int(value: &str, field: &str) -> Result<i64, AppError> {
    let n = parse_int(value, field)?;
    if n <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(n)
}

/// Integer from a JSON value: a number without fraction or a numeric string
pub fn json_int(value: &Value, field: &str) -> Result<i64, AppError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| AppError::validation(format!("{field} must be a valid integer"))),
        Value::String(s) => parse_int(s, field),
        _ => Err(AppError::validation(format!(
            "{field} must be a valid integer"
        ))),
    }
}

/// Text from a JSON value; numbers are accepted and stringified
pub fn json_text(value: &Value, field: &str) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(AppError::validation(format!("{field} must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Zelda ")), Some("Zelda".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Ana", "name", 10).is_ok());
        let err = validate_required_text(" ", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = validate_required_text("abcdefghijk", "name", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_parse_ints() {
        assert_eq!(parse_int(" 2017 ", "year").unwrap(), 2017);
        assert!(parse_int("20x7", "year").is_err());
        assert_eq!(parse_positive_int("3", "copies").unwrap(), 3);
        assert!(parse_positive_int("0", "copies").is_err());
        assert!(parse_positive_int("-2", "copies").is_err());
    }

    #[test]
    fn test_json_int_accepts_numbers_and_strings() {
        assert_eq!(json_int(&json!(5), "n").unwrap(), 5);
        assert_eq!(json_int(&json!("7"), "n").unwrap(), 7);
        assert!(json_int(&json!(1.5), "n").is_err());
        assert!(json_int(&json!(null), "n").is_err());
        assert!(json_int(&json!("abc"), "n").is_err());
    }

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(&json!("PC"), "p").unwrap(), "PC");
        assert_eq!(json_text(&json!(42), "p").unwrap(), "42");
        assert!(json_text(&json!([1]), "p").is_err());
    }
}
