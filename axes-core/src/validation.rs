//! Field constraints for access records.
//!
//! Lengths are counted in characters, not bytes. Storage backends call
//! [`validate_access_record`] before inserting so oversized values are
//! rejected the same way on every backend.

use crate::{NewAccessRecord, error::ValidationError};

pub const MAX_USER_AGENT_LENGTH: usize = 255;
pub const MAX_USERNAME_LENGTH: usize = 255;
pub const MAX_HTTP_ACCEPT_LENGTH: usize = 1025;
pub const MAX_PATH_INFO_LENGTH: usize = 255;

/// Checks that `value` fits in `max` characters
pub fn validate_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

pub fn validate_access_record(record: &NewAccessRecord) -> Result<(), ValidationError> {
    validate_length("user_agent", &record.user_agent, MAX_USER_AGENT_LENGTH)?;
    if let Some(username) = &record.username {
        validate_length("username", username, MAX_USERNAME_LENGTH)?;
    }
    validate_length("http_accept", &record.http_accept, MAX_HTTP_ACCEPT_LENGTH)?;
    validate_length("path_info", &record.path_info, MAX_PATH_INFO_LENGTH)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NewAccessRecord {
        NewAccessRecord::builder()
            .user_agent("Mozilla/5.0")
            .username("alice")
            .http_accept("text/html")
            .path_info("/login")
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_record() {
        assert!(validate_access_record(&record()).is_ok());
    }

    #[test]
    fn test_limits_are_inclusive() {
        let mut r = record();
        r.user_agent = "a".repeat(MAX_USER_AGENT_LENGTH);
        r.http_accept = "b".repeat(MAX_HTTP_ACCEPT_LENGTH);
        r.path_info = "c".repeat(MAX_PATH_INFO_LENGTH);
        r.username = Some("d".repeat(MAX_USERNAME_LENGTH));
        assert!(validate_access_record(&r).is_ok());
    }

    #[test]
    fn test_too_long_fields() {
        let mut r = record();
        r.http_accept = "x".repeat(MAX_HTTP_ACCEPT_LENGTH + 1);
        match validate_access_record(&r).unwrap_err() {
            ValidationError::FieldTooLong { field, max, actual } => {
                assert_eq!(field, "http_accept");
                assert_eq!(max, 1025);
                assert_eq!(actual, 1026);
            }
            other => panic!("Expected FieldTooLong, got {other:?}"),
        }

        let mut r = record();
        r.username = Some("u".repeat(256));
        assert!(matches!(
            validate_access_record(&r),
            Err(ValidationError::FieldTooLong { field: "username", .. })
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        // 255 two-byte characters still fit
        let value = "ж".repeat(255);
        assert!(validate_length("path_info", &value, MAX_PATH_INFO_LENGTH).is_ok());
    }
}
