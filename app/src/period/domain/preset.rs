use std::str::FromStr;

use crate::core::time::{DateTime, Duration, Period};

use super::Filter;

const DEFAULT_PAST_DAYS: u32 = 30;

/// Named period relative to "now".
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PeriodPreset {
    #[display("thisMonth")]
    ThisMonth,
    #[display("pastMonth({_0} days)")]
    PastDays(u32),
    #[display("3months")]
    ThreeMonths,
    #[display("6months")]
    SixMonths,
    #[display("1year")]
    OneYear,
    #[display("custom({start} - {end})")]
    Custom { start: DateTime, end: DateTime },
    #[display("anyTime")]
    AnyTime,
}

impl PeriodPreset {
    /// `None` means unrestricted: no time predicate applies.
    pub fn resolve_at(&self, now: DateTime) -> Option<Period> {
        let period = match self {
            PeriodPreset::ThisMonth => Period::new(now.start_of_month(), now.end_of_month()),
            PeriodPreset::PastDays(days) => Period::new(now - Duration::days(*days as i64), now),
            PeriodPreset::ThreeMonths => Period::new(now.months_earlier(3).start_of_day(), now),
            PeriodPreset::SixMonths => Period::new(now.months_earlier(6).start_of_day(), now),
            PeriodPreset::OneYear => Period::new(now.months_earlier(12).start_of_day(), now),
            PeriodPreset::Custom { start, end } => Period::new(*start, *end),
            PeriodPreset::AnyTime => return None,
        };

        Some(period)
    }

    pub fn filter_at(&self, field: &str, now: DateTime) -> Filter {
        match self.resolve_at(now) {
            Some(period) => Filter::period(field, &period),
            None => Filter::new(),
        }
    }
}

impl FromStr for PeriodPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "thisMonth" => Ok(PeriodPreset::ThisMonth),
            "pastMonth" => Ok(PeriodPreset::PastDays(DEFAULT_PAST_DAYS)),
            "3months" => Ok(PeriodPreset::ThreeMonths),
            "6months" => Ok(PeriodPreset::SixMonths),
            "1year" => Ok(PeriodPreset::OneYear),
            "anyTime" => Ok(PeriodPreset::AnyTime),
            "custom" => anyhow::bail!("Custom period needs start and end dates"),
            other => anyhow::bail!("Unknown period: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(text: &str) -> DateTime {
        DateTime::parse(text).unwrap()
    }

    fn now() -> DateTime {
        dt("2025-05-31T14:20:00")
    }

    #[test]
    fn test_this_month_covers_whole_month() {
        let period = PeriodPreset::ThisMonth.resolve_at(now()).unwrap();

        assert_eq!(period.start(), &dt("2025-05-01"));
        assert_eq!(period.end(), &dt("2025-05-31T23:59:59.999"));
    }

    #[test]
    fn test_past_days_is_rolling() {
        let period = PeriodPreset::PastDays(30).resolve_at(now()).unwrap();

        assert_eq!(period.start(), &(now() - Duration::days(30)));
        assert_eq!(period.end(), &now());
    }

    #[test]
    fn test_month_presets_start_at_day_boundary() {
        let three = PeriodPreset::ThreeMonths.resolve_at(now()).unwrap();
        let six = PeriodPreset::SixMonths.resolve_at(now()).unwrap();
        let year = PeriodPreset::OneYear.resolve_at(now()).unwrap();

        assert_eq!(three.start(), &dt("2025-02-28"));
        assert_eq!(six.start(), &dt("2024-11-30"));
        assert_eq!(year.start(), &dt("2024-05-31"));
        assert_eq!(year.end(), &now());
    }

    #[test]
    fn test_custom_is_exact() {
        let preset = PeriodPreset::Custom {
            start: dt("2024-01-01T08:00:00"),
            end: dt("2024-01-02T08:00:00"),
        };
        let period = preset.resolve_at(now()).unwrap();

        assert_eq!(period.start(), &dt("2024-01-01T08:00:00"));
        assert_eq!(period.end(), &dt("2024-01-02T08:00:00"));
    }

    #[test]
    fn test_any_time_has_no_predicate() {
        assert_eq!(PeriodPreset::AnyTime.resolve_at(now()), None);
        assert!(PeriodPreset::AnyTime.filter_at("createdAt", now()).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!("thisMonth".parse::<PeriodPreset>().unwrap(), PeriodPreset::ThisMonth);
        assert_eq!("pastMonth".parse::<PeriodPreset>().unwrap(), PeriodPreset::PastDays(30));
        assert_eq!("3months".parse::<PeriodPreset>().unwrap(), PeriodPreset::ThreeMonths);
        assert_eq!("6months".parse::<PeriodPreset>().unwrap(), PeriodPreset::SixMonths);
        assert_eq!("1year".parse::<PeriodPreset>().unwrap(), PeriodPreset::OneYear);
        assert_eq!("anyTime".parse::<PeriodPreset>().unwrap(), PeriodPreset::AnyTime);
    }

    #[test]
    fn test_parse_errors() {
        let custom = "custom".parse::<PeriodPreset>().unwrap_err();
        let unknown = "fortnight".parse::<PeriodPreset>().unwrap_err();

        assert_eq!(custom.to_string(), "Custom period needs start and end dates");
        assert_eq!(unknown.to_string(), "Unknown period: fortnight");
    }

    #[test]
    fn test_display() {
        assert_eq!(PeriodPreset::ThreeMonths.to_string(), "3months");
        assert_eq!(PeriodPreset::PastDays(14).to_string(), "pastMonth(14 days)");
    }
}
