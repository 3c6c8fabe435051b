//! Conversion of store timestamps into typed values.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::errors::{DomainError, DomainResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored RFC 3339 timestamp
///
/// Documents written outside the service may lack timestamps; those read as
/// the current time rather than failing the whole request.
pub fn resolve(raw: Option<&str>) -> DateTime<Utc> {
    match raw.map(DateTime::parse_from_rfc3339) {
        Some(Ok(parsed)) => parsed.with_timezone(&Utc),
        Some(Err(e)) => {
            debug!("Unparseable stored timestamp, defaulting to now: {}", e);
            Utc::now()
        }
        None => {
            debug!("Missing stored timestamp, defaulting to now");
            Utc::now()
        }
    }
}

/// Like [`resolve`] but keeps an absent optional timestamp absent
pub fn resolve_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparseable optional timestamp {}: {}", value, e);
            None
        }
    })
}

/// Parse a `YYYY-MM-DD` date supplied by a caller
pub fn parse_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::validation(format!("{field} must be a date in YYYY-MM-DD format"))
    })
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
