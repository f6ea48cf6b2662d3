//! Shared base of every persisted entity.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{data::store::Document, error::store::StoreError, model::record_id::RecordId};

/// Identity and provenance fields common to all stored entities.
///
/// Flattened into each entity's document. `updated_at` is stamped by the record store on
/// every write rather than by the entity itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourceMeta {
    /// Creates metadata for a brand new record of the given entity type.
    pub fn new(table: &str) -> Self {
        Self {
            id: RecordId::generate(table),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// An entity persisted as a flat document in the record store.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Entity type name, used as the record id prefix.
    const TABLE: &'static str;

    fn meta(&self) -> &ResourceMeta;

    fn id(&self) -> &RecordId {
        &self.meta().id
    }
}

/// Serializes a resource into a store document.
pub fn to_document<R: Resource>(resource: &R) -> Result<Document, StoreError> {
    match serde_json::to_value(resource)? {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::NotADocument(resource.id().to_string())),
    }
}

/// Deserializes a store document into a resource.
pub fn from_document<R: Resource>(document: Document) -> Result<R, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
