use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::period::{AnnotatedRecord, CREATED_AT, Filter, Record};
use crate::port::RecordStore;

/// Keeps records in process memory and evaluates filters the same way the document store does.
/// Sorting is only supported on `createdAt`. Regex conditions run on the `regex` engine, a pattern
/// it cannot compile fails the call like an invalid pattern fails a store query.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryRecordStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        let records = records.into_iter().map(with_id).collect();

        Self {
            records: RwLock::new(records),
        }
    }

    async fn matching(&self, filter: &Filter, sort_by: &str) -> anyhow::Result<Vec<Record>> {
        if sort_by != CREATED_AT {
            anyhow::bail!("In-memory store cannot sort by {}", sort_by);
        }

        let matcher = filter.compile()?;
        let records = self.records.read().await;
        let mut result = Vec::new();

        for record in records.iter() {
            let document = mongodb::bson::to_document(record)?;
            if matcher.matches(&document) {
                result.push(record.clone());
            }
        }

        //stable, so equal timestamps keep insertion order
        result.sort_by_key(|r| r.created_at);

        Ok(result)
    }
}

fn with_id(mut record: Record) -> Record {
    record.id.get_or_insert_with(ObjectId::new);
    record
}

impl RecordStore for InMemoryRecordStore {
    async fn find_ascending(&self, filter: &Filter, sort_by: &str) -> anyhow::Result<Vec<Record>> {
        self.matching(filter, sort_by).await
    }

    async fn count(&self, filter: &Filter) -> anyhow::Result<u64> {
        let matcher = filter.compile()?;
        let records = self.records.read().await;
        let mut count = 0;

        for record in records.iter() {
            if matcher.matches(&mongodb::bson::to_document(record)?) {
                count += 1;
            }
        }

        Ok(count)
    }

    async fn insert_many(&self, records: Vec<Record>) -> anyhow::Result<usize> {
        let inserted = records.len();
        self.records.write().await.extend(records.into_iter().map(with_id));
        Ok(inserted)
    }

    async fn find_annotated(
        &self,
        filter: &Filter,
        sort_by: &str,
        period_info: &str,
    ) -> anyhow::Result<Vec<AnnotatedRecord>> {
        let records = self.matching(filter, sort_by).await?;

        Ok(records
            .into_iter()
            .map(|r| AnnotatedRecord::new(r, period_info))
            .collect())
    }
}
