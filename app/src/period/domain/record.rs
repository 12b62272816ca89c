use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::core::time::{DateTime, as_bson};

pub const CREATED_AT: &str = "createdAt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(with = "as_bson")]
    pub created_at: DateTime,
}

impl Record {
    pub fn new(title: impl Into<String>, created_at: DateTime) -> Self {
        Self {
            id: None,
            title: title.into(),
            created_at,
        }
    }
}

/// A record as returned by the period aggregation: tagged with the period it was matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub is_in_period: bool,
    pub period_info: String,
}

impl AnnotatedRecord {
    pub fn new(record: Record, period_info: impl Into<String>) -> Self {
        Self {
            record,
            is_in_period: true,
            period_info: period_info.into(),
        }
    }
}
