//! # Validation Module
//!
//! Input validation for the admin API.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: axum extractors  - type validation (deserialization)
//! Layer 2: THIS MODULE      - business rule validation → HTTP 400
//! Layer 3: souk-db          - primary key / not-found checks → 404
//! ```
//!
//! Handlers validate before touching storage, so a failing request never
//! mutates anything.

use crate::error::ValidationError;
use crate::{MAX_NAME_LEN, MAX_STOCK_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a required free-text field (name, title, body, ...).
///
/// ## Rules
/// - Must not be empty or whitespace-only
/// - Must be at most [`MAX_NAME_LEN`] characters
///
/// Returns the trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a decrement quantity.
///
/// Must be positive; the floor-at-zero clamp handles quantities larger than
/// current stock, but a zero or negative quantity is a caller bug.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates the size of a stock decrement batch.
pub fn validate_stock_batch(len: usize) -> ValidationResult<()> {
    if len == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }
    if len > MAX_STOCK_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_STOCK_ITEMS as i64,
        });
    }
    Ok(())
}

/// Validates a price in cents (zero allowed, negative rejected).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates an uploaded file's MIME type as an image.
///
/// The cover-image endpoint is the one place the original system enforced a
/// content-type check.
pub fn validate_image_mime(content_type: Option<&str>) -> ValidationResult<()> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        other => Err(ValidationError::InvalidFormat {
            field: "coverImage".to_string(),
            reason: format!(
                "expected an image/* content type, got {}",
                other.unwrap_or("none")
            ),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", "  Drills ").unwrap(), "Drills");
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_length_limit_counts_characters_not_bytes() {
        // 150 Arabic characters exceed 200 bytes but fit the limit.
        let name = "م".repeat(150);
        assert_eq!(validate_required("nameAr", &name).unwrap(), name);

        assert!(validate_required("nameAr", &"م".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_stock_batch() {
        assert!(validate_stock_batch(1).is_ok());
        assert!(validate_stock_batch(0).is_err());
        assert!(validate_stock_batch(MAX_STOCK_ITEMS + 1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_image_mime() {
        assert!(validate_image_mime(Some("image/png")).is_ok());
        assert!(validate_image_mime(Some("image/jpeg")).is_ok());
        assert!(validate_image_mime(Some("application/pdf")).is_err());
        assert!(validate_image_mime(None).is_err());
    }
}
