pub mod adapter;
mod domain;
mod sample;

pub use domain::*;
pub use sample::sample_records;

use crate::core::time::{DateInput, Period};
use crate::port::RecordStore;
use crate::t;

/// Date-range queries over a record store. Bounds are widened to whole local calendar days:
/// the start to 00:00:00.000, the end to 23:59:59.999.
///
/// Unparsable bounds are not an error, they produce an empty result without touching the store.
/// Store errors are returned as they come from the store.
pub struct PeriodFilter<S> {
    store: S,
}

impl<S: RecordStore> PeriodFilter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_data_in_period(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> anyhow::Result<Vec<Record>> {
        self.find_data_in_period_with_conditions(start, end, AdditionalConditions::new())
            .await
    }

    /// Conditions are AND-ed with the period range. A condition on `createdAt` narrows the range,
    /// it never replaces it.
    pub async fn find_data_in_period_with_conditions(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
        additional_conditions: AdditionalConditions,
    ) -> anyhow::Result<Vec<Record>> {
        let Some(filter) = filter_for_period(start, end, additional_conditions) else {
            return Ok(vec![]);
        };

        self.store.find_ascending(&filter, CREATED_AT).await
    }

    pub async fn count_data_in_period(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> anyhow::Result<u64> {
        let Some(filter) = filter_for_period(start, end, AdditionalConditions::new()) else {
            return Ok(0);
        };

        self.store.count(&filter).await
    }

    /// Records of the period tagged with `isInPeriod` and a `"<start> to <end>"` label.
    pub async fn annotate_data_in_period(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> anyhow::Result<Vec<AnnotatedRecord>> {
        let Some(period) = normalized_period(start.into(), end.into()) else {
            return Ok(vec![]);
        };

        self.store
            .find_annotated(&Filter::period(CREATED_AT, &period), CREATED_AT, &period.label())
            .await
    }

    pub async fn find_data_in_preset(&self, preset: &PeriodPreset) -> anyhow::Result<Vec<Record>> {
        let filter = preset.filter_at(CREATED_AT, t!(now));
        self.store.find_ascending(&filter, CREATED_AT).await
    }

    pub async fn count_data_in_preset(&self, preset: &PeriodPreset) -> anyhow::Result<u64> {
        let filter = preset.filter_at(CREATED_AT, t!(now));
        self.store.count(&filter).await
    }

    /// Writes the sample records. Failures are logged, never returned.
    pub async fn create_sample_data(&self) {
        match self.store.insert_many(sample_records()).await {
            Ok(inserted) => tracing::info!("Created {} sample records", inserted),
            Err(e) => tracing::error!("Error creating sample data: {:?}", e),
        }
    }
}

/// Pure range check: `check` keeps its sub-day precision, only the bounds are widened to whole days.
pub fn is_date_in_period(check: impl Into<DateInput>, start: impl Into<DateInput>, end: impl Into<DateInput>) -> bool {
    let Some(period) = normalized_period(start.into(), end.into()) else {
        return false;
    };

    check.into().resolve().is_some_and(|check| period.contains(check))
}

/// Query predicate for records created within the whole days from `start` to `end`, combined with
/// the additional conditions. `None` if a bound cannot be read as a date.
pub fn filter_for_period(
    start: impl Into<DateInput>,
    end: impl Into<DateInput>,
    additional_conditions: AdditionalConditions,
) -> Option<Filter> {
    let period = normalized_period(start.into(), end.into())?;
    Some(Filter::period(CREATED_AT, &period).and(additional_conditions))
}

fn normalized_period(start: DateInput, end: DateInput) -> Option<Period> {
    let period = Period::whole_days_of(&start, &end);

    match &period {
        None => tracing::warn!("Period {:?} to {:?} is not a valid date range, nothing will match", start, end),
        Some(p) if p.is_inverted() => tracing::debug!("Period {} ends before it starts, nothing will match", p.label()),
        Some(_) => {}
    }

    period
}
