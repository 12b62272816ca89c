use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use anyhow::Context as _;
use chrono::{Datelike as _, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone as _};
use tokio::task_local;

use super::Duration;

task_local! {
    pub static FIXED_NOW: DateTime;
}

const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<chrono::Local>,
}

impl DateTime {
    fn new<T: chrono::TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&chrono::Local),
        }
    }

    pub fn now() -> Self {
        FIXED_NOW
            .try_with(|t| *t)
            .unwrap_or_else(|_| chrono::Local::now().into())
    }

    /// Parses RFC 3339 timestamps, local date-times without offset and plain `YYYY-MM-DD` dates.
    /// Everything without an explicit offset is read on the local calendar.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let text = text.trim();

        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
            return Ok(dt.into());
        }

        for format in LOCAL_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Self::from_local(naive, false));
            }
        }

        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").with_context(|| format!("Unsupported date: {text:?}"))?;
        Ok(Self::from_local(date.and_time(NaiveTime::MIN), false))
    }

    fn from_local(naive: NaiveDateTime, prefer_latest: bool) -> Self {
        let resolved = Local.from_local_datetime(&naive);
        let picked = if prefer_latest {
            resolved.latest()
        } else {
            resolved.earliest()
        };

        let dt = picked
            .or_else(|| {
                //wall-clock time skipped by a DST transition, move out of the gap
                let shifted = if prefer_latest {
                    naive - chrono::Duration::hours(1)
                } else {
                    naive + chrono::Duration::hours(1)
                };
                Local.from_local_datetime(&shifted).earliest()
            })
            .unwrap_or_else(|| Local.from_utc_datetime(&naive));

        Self { delegate: dt }
    }

    pub fn to_iso_string(&self) -> String {
        self.delegate.to_rfc3339()
    }

    pub fn to_date_string(&self) -> String {
        self.delegate.format("%Y-%m-%d").to_string()
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.delegate.timestamp_millis()
    }

    /// 00:00:00.000 of the same local calendar day.
    pub fn start_of_day(&self) -> Self {
        Self::from_local(self.delegate.date_naive().and_time(NaiveTime::MIN), false)
    }

    /// 23:59:59.999 of the same local calendar day.
    pub fn end_of_day(&self) -> Self {
        //failing only if 23:59:59.999 stopped being a valid time of day
        let last_instant = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap();
        Self::from_local(self.delegate.date_naive().and_time(last_instant), true)
    }

    pub fn start_of_month(&self) -> Self {
        let date = self.delegate.date_naive();
        let first = date.with_day(1).unwrap_or(date);
        Self::from_local(first.and_time(NaiveTime::MIN), false)
    }

    pub fn end_of_month(&self) -> Self {
        let first = self.start_of_month().delegate.date_naive();
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);

        Self::from_local(last.and_time(NaiveTime::MIN), false).end_of_day()
    }

    /// Same wall-clock time `months` calendar months earlier. The day of month is clamped to the
    /// length of the target month.
    pub fn months_earlier(&self, months: u32) -> Self {
        let naive = self.delegate.naive_local();
        let earlier = naive.checked_sub_months(Months::new(months)).unwrap_or(naive);
        Self::from_local(earlier, false)
    }

    pub fn into_bson(&self) -> mongodb::bson::DateTime {
        mongodb::bson::DateTime::from_millis(self.delegate.timestamp_millis())
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate)
    }
}

impl Add<Duration> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate + rhs.delegate)
    }
}

impl Sub<Duration> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate - rhs.delegate)
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateTime::new(val)
    }
}

impl From<mongodb::bson::DateTime> for DateTime {
    fn from(val: mongodb::bson::DateTime) -> Self {
        let millis = val.timestamp_millis();
        let utc = chrono::DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
            chrono::DateTime::<chrono::Utc>::MIN_UTC
        } else {
            chrono::DateTime::<chrono::Utc>::MAX_UTC
        });

        utc.into()
    }
}

/// Serde adapter storing a `DateTime` as a native BSON date instead of an RFC 3339 string.
pub mod as_bson {
    use serde::{Deserialize as _, Deserializer, Serialize as _, Serializer};

    use super::DateTime;

    pub fn serialize<S: Serializer>(value: &DateTime, serializer: S) -> Result<S::Ok, S::Error> {
        value.into_bson().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime, D::Error> {
        mongodb::bson::DateTime::deserialize(deserializer).map(DateTime::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only_is_local_midnight() {
        let dt = DateTime::parse("2024-06-15").unwrap();

        assert_eq!(dt, DateTime::parse("2024-06-15T00:00:00").unwrap());
        assert_eq!(dt.to_date_string(), "2024-06-15");
    }

    #[test]
    fn test_parse_with_offset() {
        let dt = DateTime::parse("2024-06-15T10:00:00+02:00").unwrap();

        assert_eq!(dt, DateTime::parse("2024-06-15T08:00:00Z").unwrap());
    }

    #[test]
    fn test_parse_local_datetime_variants() {
        let expected = DateTime::parse("2024-06-15T10:30:00").unwrap();

        assert_eq!(DateTime::parse("2024-06-15 10:30:00").unwrap(), expected);
        assert_eq!(DateTime::parse("2024-06-15T10:30").unwrap(), expected);
        assert_eq!(DateTime::parse("  2024-06-15T10:30:00.000 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DateTime::parse("not a date").is_err());
        assert!(DateTime::parse("2024/06/15").is_err());
        assert!(DateTime::parse("2024-13-01").is_err());
        assert!(DateTime::parse("").is_err());
    }

    #[test]
    fn test_day_boundaries() {
        let dt = DateTime::parse("2024-06-15T13:45:12.345").unwrap();

        assert_eq!(dt.start_of_day(), DateTime::parse("2024-06-15T00:00:00").unwrap());
        assert_eq!(dt.end_of_day(), DateTime::parse("2024-06-15T23:59:59.999").unwrap());
    }

    #[test]
    fn test_day_boundaries_are_idempotent() {
        let dt = DateTime::parse("2024-06-15T13:45:12").unwrap();

        assert_eq!(dt.start_of_day().start_of_day(), dt.start_of_day());
        assert_eq!(dt.end_of_day().end_of_day(), dt.end_of_day());
    }

    #[test]
    fn test_month_boundaries() {
        let dt = DateTime::parse("2024-02-10T08:00:00").unwrap();

        assert_eq!(dt.start_of_month(), DateTime::parse("2024-02-01").unwrap());
        assert_eq!(dt.end_of_month(), DateTime::parse("2024-02-29T23:59:59.999").unwrap());
    }

    #[test]
    fn test_end_of_december() {
        let dt = DateTime::parse("2024-12-24T08:00:00").unwrap();

        assert_eq!(dt.end_of_month(), DateTime::parse("2024-12-31T23:59:59.999").unwrap());
    }

    #[test]
    fn test_months_earlier_clamps_day() {
        let dt = DateTime::parse("2024-05-31T09:15:00").unwrap();

        assert_eq!(dt.months_earlier(3), DateTime::parse("2024-02-29T09:15:00").unwrap());
        assert_eq!(dt.months_earlier(12), DateTime::parse("2023-05-31T09:15:00").unwrap());
    }

    #[test]
    fn test_bson_conversion_keeps_millis() {
        let dt = DateTime::parse("2024-06-15T10:00:00.123Z").unwrap();

        assert_eq!(DateTime::from(dt.into_bson()), dt);
    }

    #[test]
    fn test_fixed_now() {
        let fixed = DateTime::parse("2024-06-15T10:00:00Z").unwrap();

        let now = FIXED_NOW.sync_scope(fixed, DateTime::now);

        assert_eq!(now, fixed);
    }
}
