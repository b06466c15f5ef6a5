//! # Validation
//!
//! Checks applied before a request leaves the client.
//!
//! These are not form validation. They guard the few inputs that would
//! otherwise produce a *different request* than the caller intended: an
//! empty id turns `GET /quotations/{id}` into the list endpoint, a page of
//! zero is silently clamped by the server, and an inverted report range
//! returns an empty report instead of an error.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::query::ListFilter;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Ensures an identifier is non-blank and returns it trimmed.
pub fn require_id<'a>(field: &str, id: &'a str) -> ValidationResult<&'a str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(trimmed)
}

/// Pages are 1-based.
pub fn validate_page(page: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        });
    }
    Ok(())
}

/// Validates the parts of a list filter the type system cannot.
pub fn validate_filter(filter: &ListFilter) -> ValidationResult<()> {
    if let Some(page) = filter.page {
        validate_page(page)?;
    }
    Ok(())
}

/// Login needs both fields; everything else is the server's business.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvalidFormat {
            field: "startDate".to_string(),
            reason: format!("{start} is after endDate {end}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("id", " Q1 ").unwrap(), "Q1");
        assert_eq!(
            require_id("id", "  ").unwrap_err(),
            ValidationError::Required {
                field: "id".to_string()
            }
        );
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(validate_page(0).is_err());
        assert!(validate_page(1).is_ok());
        assert!(validate_filter(&ListFilter::default().with_page(0)).is_err());
        assert!(validate_filter(&ListFilter::default()).is_ok());
    }

    #[test]
    fn test_credentials_required() {
        assert!(validate_credentials("admin@example.com", "secret").is_ok());
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("admin@example.com", "").is_err());
    }

    #[test]
    fn test_inverted_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(validate_date_range(start, end).is_err());
        assert!(validate_date_range(end, start).is_ok());
        assert!(validate_date_range(start, start).is_ok());
    }
}
