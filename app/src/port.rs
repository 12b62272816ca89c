#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::period::{AnnotatedRecord, Filter, Record};

/// Document store holding the records a period is evaluated against. Implementations pass their
/// client errors through unchanged.
pub trait RecordStore {
    /// All records matching `filter`, ascending by `sort_by`.
    async fn find_ascending(&self, filter: &Filter, sort_by: &str) -> Result<Vec<Record>>;

    async fn count(&self, filter: &Filter) -> Result<u64>;

    /// Returns the number of records written.
    async fn insert_many(&self, records: Vec<Record>) -> Result<usize>;

    /// Like `find_ascending`, with every record tagged as in-period under `period_info`.
    async fn find_annotated(&self, filter: &Filter, sort_by: &str, period_info: &str) -> Result<Vec<AnnotatedRecord>>;
}
