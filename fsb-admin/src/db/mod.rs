mod sqlite;
mod tables;

pub use sqlite::Database;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Truncate to the precision timestamps are stored with, so a record built
/// in memory equals the one read back
pub fn storage_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Fixed-width UTC form so that string comparison in SQL follows time order
pub(crate) fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_timestamp_text_order_matches_time_order() {
        let base = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        let earlier = to_db_timestamp(&base);
        let later = to_db_timestamp(&(base + Duration::microseconds(1)));
        let much_later = to_db_timestamp(&(base + Duration::days(400)));

        assert_eq!(earlier.len(), later.len());
        assert!(earlier < later);
        assert!(later < much_later);
        assert_eq!(from_db_timestamp(0, &later).unwrap(), base + Duration::microseconds(1));
    }

    #[test]
    fn test_storage_precision_round_trips() {
        let base = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
        let stored = storage_precision(base + Duration::nanoseconds(123_456_789));

        assert_eq!(stored, base + Duration::microseconds(123_456));
        assert_eq!(from_db_timestamp(0, &to_db_timestamp(&stored)).unwrap(), stored);
    }

    #[test]
    fn test_bad_timestamp_is_conversion_error() {
        let err = from_db_timestamp(3, "yesterday").unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(3, _, _)));
    }
}
