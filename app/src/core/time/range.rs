use super::{DateInput, DateTime};

/// Inclusive `[start, end]` interval. Nothing enforces `start <= end`; an inverted period simply
/// contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: DateTime,
    end: DateTime,
}

impl Period {
    pub fn new(start: DateTime, end: DateTime) -> Self {
        Self { start, end }
    }

    /// Widens both bounds to full calendar days: `start` to 00:00:00.000 of its day and `end`
    /// to 23:59:59.999 of its day.
    pub fn whole_days(start: DateTime, end: DateTime) -> Self {
        Self::new(start.start_of_day(), end.end_of_day())
    }

    /// `None` if either bound cannot be resolved to a date.
    pub fn whole_days_of(start: &DateInput, end: &DateInput) -> Option<Self> {
        Some(Self::whole_days(start.resolve()?, end.resolve()?))
    }

    pub fn start(&self) -> &DateTime {
        &self.start
    }

    pub fn end(&self) -> &DateTime {
        &self.end
    }

    pub fn contains(&self, datetime: DateTime) -> bool {
        datetime >= self.start && datetime <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.start.to_date_string(), self.end.to_date_string())
    }
}
