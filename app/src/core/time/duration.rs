#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    pub(super) delegate: chrono::Duration,
}

impl Duration {
    fn new(delegate: chrono::Duration) -> Self {
        Self { delegate }
    }

    pub fn days(days: i64) -> Self {
        Self::new(chrono::Duration::days(days))
    }

    #[cfg(test)]
    pub fn hours(hours: i64) -> Self {
        Self::new(chrono::Duration::hours(hours))
    }

    #[cfg(test)]
    pub fn millis(millis: i64) -> Self {
        Self::new(chrono::Duration::milliseconds(millis))
    }
}
