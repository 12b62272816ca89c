use super::DateTime;

/// A caller-supplied point in time: either already resolved or still text.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum DateInput {
    At(DateTime),
    Text(String),
}

impl DateInput {
    /// `None` when the text cannot be read as a date. Callers treat that as "matches nothing".
    pub fn resolve(&self) -> Option<DateTime> {
        match self {
            DateInput::At(dt) => Some(*dt),
            DateInput::Text(text) => match DateTime::parse(text) {
                Ok(dt) => Some(dt),
                Err(e) => {
                    tracing::debug!("Ignoring unparsable date input: {e}");
                    None
                }
            },
        }
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_owned())
    }
}

impl From<&String> for DateInput {
    fn from(text: &String) -> Self {
        DateInput::Text(text.clone())
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateInput {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateInput::At(val.into())
    }
}
