use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use crate::error::AppError;

const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parses an ISO-8601 timestamp. Accepts RFC 3339 with an offset, a naive
/// date-time (taken as UTC) or a bare date (midnight UTC).
pub fn parse_iso_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    Err(AppError::Validation(format!("Invalid date format for {field}: {raw}")))
}

/// Like [`parse_iso_datetime`] but maps absent or empty input to `None`.
pub fn parse_optional(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(value) => parse_iso_datetime(field, value).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_accepts_iso_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
        assert_eq!(parse_iso_datetime("d", "2024-03-01T14:30:00Z").unwrap(), expected);
        assert_eq!(parse_iso_datetime("d", "2024-03-01T16:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_iso_datetime("d", "2024-03-01T14:30:00").unwrap(), expected);
        assert_eq!(parse_iso_datetime("d", "2024-03-01T14:30").unwrap(), expected);
        assert_eq!(parse_iso_datetime("d", "2024-03-01 14:30:00").unwrap(), expected);
        assert_eq!(
            parse_iso_datetime("d", "2024-03-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rejects_malformed_dates() {
        let err = parse_iso_datetime("start_date", "03/01/2024").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("start_date")));
        assert!(parse_iso_datetime("d", "2024-13-01").is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(parse_optional("d", None).unwrap(), None);
        assert_eq!(parse_optional("d", Some("  ")).unwrap(), None);
        assert!(parse_optional("d", Some("2024-01-01")).unwrap().is_some());
    }
}
