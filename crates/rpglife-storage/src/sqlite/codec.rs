//! Column encoding helpers shared by every table module.
//!
//! Timestamps are stored as ISO 8601 TEXT, calendar dates as `YYYY-MM-DD`,
//! booleans as INTEGER 0/1, tiers as INTEGER and closed enums by name.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

use rpglife_core::tier::Tier;

use crate::error::StorageError;

/// Formats a timestamp the way the schema defaults do.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses a stored timestamp, accepting RFC 3339 and SQLite's
/// `datetime('now')` shape.
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>().ok().or_else(|| {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
            .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .map(|ndt| ndt.and_utc())
            .ok()
    })
}

pub(crate) fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn conversion_error(idx: usize, column: &str, value: impl ToString) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(StorageError::corrupt(column, value)),
    )
}

pub(crate) fn get_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    parse_datetime(&s).ok_or_else(|| conversion_error(idx, "timestamp", &s))
}

pub(crate) fn get_opt_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| conversion_error(idx, "date", s)),
    }
}

pub(crate) fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    get_opt_date(row, idx)?.ok_or_else(|| conversion_error(idx, "date", ""))
}

pub(crate) fn get_tier(row: &Row<'_>, idx: usize) -> rusqlite::Result<Tier> {
    let v: i64 = row.get(idx)?;
    Tier::new(v).map_err(|_| conversion_error(idx, "tier", v))
}

pub(crate) fn get_u32(row: &Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let v: i64 = row.get(idx)?;
    u32::try_from(v).map_err(|_| conversion_error(idx, "counter", v))
}

/// Reads a closed enum stored by name.
pub(crate) fn get_enum<T: FromStr>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    s.parse::<T>().map_err(|_| conversion_error(idx, "enum", &s))
}

/// Maps "no rows" onto [`StorageError::NotFound`].
pub(crate) fn not_found_as(entity: &str, id: impl ToString) -> impl FnOnce(rusqlite::Error) -> StorageError {
    let id = id.to_string();
    let entity = entity.to_string();
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound { entity, id },
        other => StorageError::Query(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_roundtrip() {
        let now = parse_datetime("2026-05-01T08:30:00.250Z").unwrap();
        assert_eq!(format_datetime(&now), "2026-05-01T08:30:00.250Z");
    }

    #[test]
    fn accepts_sqlite_datetime() {
        let dt = parse_datetime("2026-05-01 08:30:00").unwrap();
        assert_eq!(format_datetime(&dt), "2026-05-01T08:30:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("yesterday-ish").is_none());
    }
}
