//! Record store abstraction shared by the scheduler and the services.
//!
//! Records are flat JSON documents addressed by a `RecordId`. The store is the single
//! source of truth for anything that must outlive the process; in-memory state such as
//! armed timers is always rebuilt from it.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::{error::store::StoreError, model::record_id::RecordId};

/// A stored record's body.
pub type Document = Map<String, Value>;

/// A record as written to the store, including store-managed timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub document: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Selection of the documents of a single entity type.
///
/// ```rust,ignore
/// let pending = store
///     .query(&Query::table("Task").filter_eq("task_type", "bump_reminder").order_by("scheduled_for"))
///     .await?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<String>,
}

impl Query {
    /// Selects every document whose id has the given table prefix.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    /// Keeps only documents whose top-level `field` equals `value`.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Orders results ascending by a top-level document field.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Returns true if `document` satisfies every equality filter.
    pub fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// Applies the filters and ordering to a set of documents of this query's table.
    ///
    /// Sorting is stable, so documents with equal (or missing) sort keys keep their
    /// incoming order. Missing keys sort first.
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut documents: Vec<Document> =
            documents.into_iter().filter(|d| self.matches(d)).collect();

        if let Some(field) = &self.order_by {
            documents.sort_by(|a, b| compare_values(a.get(field), b.get(field)));
        }

        documents
    }
}

/// Stamps a document with its id and write time before it is stored.
pub fn touch(id: &RecordId, mut document: Document, now: DateTime<Utc>) -> Document {
    document.insert("id".to_string(), Value::String(id.to_string()));
    document.insert(
        "updated_at".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    );
    document
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        // Timestamps with differing fractional digits do not sort lexically.
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Durable keyed document storage.
///
/// Every write stamps the document's `updated_at` field with the write time.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record. Fails with `StoreError::AlreadyExists` if the id is taken.
    async fn create(&self, id: &RecordId, document: Document) -> Result<StoredRecord, StoreError>;

    /// Replaces an existing record. Fails with `StoreError::NotFound` if absent.
    async fn update(&self, id: &RecordId, document: Document) -> Result<StoredRecord, StoreError>;

    async fn select(&self, id: &RecordId) -> Result<Option<Document>, StoreError>;

    /// Removes a record. Deleting an absent record succeeds.
    async fn delete(&self, id: &RecordId) -> Result<(), StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;
}
