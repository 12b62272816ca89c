mod filter;
mod preset;
mod record;

pub use filter::{AdditionalConditions, Condition, FieldValue, Filter};
pub use preset::PeriodPreset;
pub use record::{AnnotatedRecord, CREATED_AT, Record};
