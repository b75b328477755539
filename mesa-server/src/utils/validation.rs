//! Input validation helpers
//!
//! Centralized text length limits and checks for the HTTP handlers.
//! SQLite TEXT enforces no length, so the limits live here.

use shared::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Item names and customer names
pub const MAX_NAME_LEN: usize = 200;

/// Seat numbers ("12", "T4", "bar-3")
pub const MAX_SEAT_LEN: usize = 32;

/// Size labels (S/M/L and friends)
pub const MAX_SIZE_LEN: usize = 8;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("Coffee", "name", MAX_NAME_LEN).is_ok());

        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let long = "x".repeat(MAX_SEAT_LEN + 1);
        let err = validate_required_text(&long, "seatNumber", MAX_SEAT_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
