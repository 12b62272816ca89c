mod query;

use futures::TryStreamExt as _;
use mongodb::Collection;

use crate::period::{AnnotatedRecord, Filter, Record};
use crate::port::RecordStore;

pub use query::{annotated_pipeline, filter_document, sort_document};

pub struct MongoRecordStore {
    collection: Collection<Record>,
}

impl MongoRecordStore {
    pub fn new(database: &mongodb::Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

impl RecordStore for MongoRecordStore {
    #[tracing::instrument(skip(self))]
    async fn find_ascending(&self, filter: &Filter, sort_by: &str) -> anyhow::Result<Vec<Record>> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .sort(sort_document(sort_by))
            .await?;

        Ok(cursor.try_collect().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, filter: &Filter) -> anyhow::Result<u64> {
        Ok(self.collection.count_documents(filter_document(filter)).await?)
    }

    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    async fn insert_many(&self, records: Vec<Record>) -> anyhow::Result<usize> {
        let result = self.collection.insert_many(records).await?;
        Ok(result.inserted_ids.len())
    }

    #[tracing::instrument(skip(self))]
    async fn find_annotated(
        &self,
        filter: &Filter,
        sort_by: &str,
        period_info: &str,
    ) -> anyhow::Result<Vec<AnnotatedRecord>> {
        let cursor = self
            .collection
            .aggregate(annotated_pipeline(filter, sort_by, period_info))
            .with_type::<AnnotatedRecord>()
            .await?;

        Ok(cursor.try_collect().await?)
    }
}
