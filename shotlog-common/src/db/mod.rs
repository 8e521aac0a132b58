//! Database initialization and settings access

pub mod init;
pub mod settings;

pub use init::{init_database, open_in_memory};
pub use settings::{ensure_setting, get_setting, set_setting};

use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Parse a stored uuid column, surfacing corruption as a decode error.
pub fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}

/// Parse a stored RFC 3339 timestamp column.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}

/// Parse a stored `YYYY-MM-DD` date column.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_forms_parse_back() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string()).unwrap(), id);

        let now = Utc::now();
        assert_eq!(parse_timestamp(&now.to_rfc3339()).unwrap(), now);

        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(parse_date("2025-06-15").unwrap(), date);
    }

    #[test]
    fn corrupt_columns_surface_decode_errors() {
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_timestamp("yesterday-ish").is_err());
        assert!(parse_date("06/15/2025").is_err());
    }
}
