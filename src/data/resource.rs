use std::{marker::PhantomData, sync::Arc};

use crate::{
    data::store::{Query, RecordStore},
    error::store::StoreError,
    model::{
        record_id::RecordId,
        resource::{self, Resource},
    },
};
use serde_json::Value;

/// Typed access to the records of one `Resource` type.
pub struct ResourceRepository<R> {
    store: Arc<dyn RecordStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceRepository<R> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    /// Writes the resource, creating the record or updating it if it already exists.
    ///
    /// # Returns
    /// - `Ok(R)`: The resource as stored, with `updated_at` stamped by the store
    /// - `Err(StoreError)`: Serialization or database error
    pub async fn store(&self, resource: &R) -> Result<R, StoreError> {
        let id = resource.id();
        let document = resource::to_document(resource)?;

        let stored = match self.store.create(id, document.clone()).await {
            Err(StoreError::AlreadyExists(_)) => self.store.update(id, document).await?,
            result => result?,
        };

        resource::from_document(stored.document)
    }

    /// Fetches a resource by id.
    ///
    /// # Returns
    /// - `Ok(Some(R))`: The resource
    /// - `Ok(None)`: No record with this id
    /// - `Err(StoreError::WrongTable)`: The id belongs to another entity type
    /// - `Err(StoreError)`: Deserialization or database error
    pub async fn get(&self, id: &RecordId) -> Result<Option<R>, StoreError> {
        if !id.is_of(R::TABLE) {
            return Err(StoreError::WrongTable {
                id: id.clone(),
                expected: R::TABLE.to_string(),
            });
        }

        self.store
            .select(id)
            .await?
            .map(resource::from_document)
            .transpose()
    }

    /// Deletes a resource record. Deleting an absent record succeeds.
    pub async fn delete(&self, id: &RecordId) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    /// Lists resources whose `field` equals `value`, oldest first.
    pub async fn find_where(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<R>, StoreError> {
        let query = Query::table(R::TABLE)
            .filter_eq(field, value)
            .order_by("created_at");

        self.store
            .query(&query)
            .await?
            .into_iter()
            .map(resource::from_document)
            .collect()
    }
}
