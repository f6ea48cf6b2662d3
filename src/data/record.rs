use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde_json::Value;

use crate::{
    data::store::{self, Document, Query, RecordStore, StoredRecord},
    error::store::StoreError,
    model::record_id::RecordId,
};

/// SQLite-backed record store.
///
/// Each record is one row of the `record` table: the full id, its entity type (the id's
/// table prefix) for indexed lookups, and the JSON document.
#[derive(Clone)]
pub struct RecordRepository {
    db: DatabaseConnection,
}

impl RecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn into_document(model: entity::record::Model) -> Result<Document, StoreError> {
        match model.data {
            Value::Object(document) => Ok(document),
            _ => Err(StoreError::NotADocument(model.id)),
        }
    }

    fn into_queried(model: entity::record::Model) -> Document {
        let id = model.id.clone();

        Self::into_document(model).unwrap_or_else(|e| {
            tracing::warn!("{}, leaving it in place", e);

            let mut stub = Document::new();
            stub.insert("id".to_string(), Value::String(id));
            stub
        })
    }

    fn into_stored(model: entity::record::Model) -> Result<StoredRecord, StoreError> {
        let id: RecordId = model.id.parse()?;
        let created_at = model.created_at;
        let updated_at = model.updated_at;

        Ok(StoredRecord {
            id,
            document: Self::into_document(model)?,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    /// Inserts a new record row.
    ///
    /// # Returns
    /// - `Ok(StoredRecord)`: The record as written, with `updated_at` stamped
    /// - `Err(StoreError::AlreadyExists)`: A record with this id exists
    /// - `Err(StoreError::DbErr)`: Database error
    async fn create(&self, id: &RecordId, document: Document) -> Result<StoredRecord, StoreError> {
        let existing = entity::prelude::Record::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StoreError::AlreadyExists(id.clone()));
        }

        let now = Utc::now();
        let document = store::touch(id, document, now);

        let model = entity::record::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            record_type: ActiveValue::Set(id.table().to_string()),
            data: ActiveValue::Set(Value::Object(document)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.db)
        .await?;

        Self::into_stored(model)
    }

    /// Replaces the document of an existing record, keeping its creation time.
    ///
    /// # Returns
    /// - `Ok(StoredRecord)`: The record as written
    /// - `Err(StoreError::NotFound)`: No record with this id
    /// - `Err(StoreError::DbErr)`: Database error
    async fn update(&self, id: &RecordId, document: Document) -> Result<StoredRecord, StoreError> {
        let Some(existing) = entity::prelude::Record::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Err(StoreError::NotFound(id.clone()));
        };

        let now = Utc::now();
        let document = store::touch(id, document, now);

        let mut active_model: entity::record::ActiveModel = existing.into();
        active_model.data = ActiveValue::Set(Value::Object(document));
        active_model.updated_at = ActiveValue::Set(now);

        let model = active_model.update(&self.db).await?;

        Self::into_stored(model)
    }

    async fn select(&self, id: &RecordId) -> Result<Option<Document>, StoreError> {
        entity::prelude::Record::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Self::into_document)
            .transpose()
    }

    async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        entity::prelude::Record::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Fetches the documents of one entity type, then filters and orders them.
    ///
    /// Rows come back in insertion order so that unordered queries and ties are stable.
    /// A row whose data is not an object is returned as a document holding only its
    /// `id`, so the caller can report it without losing the other rows.
    ///
    /// # Returns
    /// - `Ok(Vec<Document>)`: Matching documents
    /// - `Err(StoreError::DbErr)`: Database error
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let models = entity::prelude::Record::find()
            .filter(entity::record::Column::RecordType.eq(query.table.as_str()))
            .order_by_asc(entity::record::Column::CreatedAt)
            .order_by_asc(entity::record::Column::Id)
            .all(&self.db)
            .await?;

        let documents = models.into_iter().map(Self::into_queried).collect();

        Ok(query.apply(documents))
    }
}
