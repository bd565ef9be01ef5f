//! Timestamp formatting utilities
//!
//! Provides the configurable timestamp prefix written at the start of every
//! log line.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_blocking_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::LocalDateTime;
/// let timestamp = format.format(&Local::now());
/// // Output: "2026-01-08 10:30:45.123456"
/// assert_eq!(timestamp.len(), 26);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local wall-clock time with microseconds: `2026-01-08 10:30:45.123456`
    #[default]
    LocalDateTime,

    /// ISO 8601 in UTC with milliseconds: `2026-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 with the local offset: `2026-01-08T10:30:45.123456+09:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1767868245123`
    UnixMillis,

    /// Custom strftime format, rendered in local time
    ///
    /// ```
    /// use rust_blocking_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::LocalDateTime => {
                datetime.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
            }
            TimestampFormat::Iso8601 => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return TimestampFormat::LocalDateTime.format(datetime);
                }
                out
            }
        }
    }

    /// Reject custom formats chrono cannot render
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] naming the bad format.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("'{}' is not a valid strftime format", format_str),
                ));
            }
        }
        Ok(())
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::LocalDateTime => "Local time with microseconds (2026-01-08 10:30:45.123456)",
            TimestampFormat::Iso8601 => "ISO 8601 UTC with milliseconds (2026-01-08T10:30:45.123Z)",
            TimestampFormat::Rfc3339 => "RFC 3339 with local offset",
            TimestampFormat::UnixMillis => "Unix timestamp in milliseconds (1767868245123)",
            TimestampFormat::Custom(_) => "Custom strftime format",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Local> {
        let utc = Utc.with_ymd_and_hms(2026, 1, 8, 10, 30, 45).unwrap();
        utc.with_timezone(&Local)
    }

    #[test]
    fn test_local_datetime_shape() {
        let out = TimestampFormat::LocalDateTime.format(&fixed());
        assert_eq!(out.len(), 26);
        assert_eq!(&out[4..5], "-");
        assert_eq!(&out[10..11], " ");
        assert!(out.ends_with(".000000"));
    }

    #[test]
    fn test_iso8601_is_utc() {
        let out = TimestampFormat::Iso8601.format(&fixed());
        assert_eq!(out, "2026-01-08T10:30:45.000Z");
    }

    #[test]
    fn test_unix_millis() {
        let out = TimestampFormat::UnixMillis.format(&fixed());
        assert_eq!(out, "1767868245000");
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y".to_string());
        assert_eq!(format.format(&fixed()).len(), 4);
        assert_eq!(format.description(), "Custom strftime format");
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_unknown_specifier_is_invalid() {
        let format = TimestampFormat::Custom("%Q".to_string());
        let err = format.validate().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("%Q"));
    }

    #[test]
    fn test_unrenderable_custom_format_falls_back() {
        let format = TimestampFormat::Custom("%Q".to_string());
        let out = format.format(&fixed());
        assert_eq!(out, TimestampFormat::LocalDateTime.format(&fixed()));
    }
}
