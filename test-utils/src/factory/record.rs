//! Record factory for inserting raw rows into the `record` table.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use serde_json::{Map, Value};

use crate::fixture;

/// Factory for inserting a record row with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::record::RecordFactory;
///
/// let record = RecordFactory::new(&db, "Task:abc")
///     .data(serde_json::json!("not an object"))
///     .build()
///     .await?;
/// ```
pub struct RecordFactory<'a> {
    db: &'a DatabaseConnection,
    id: String,
    data: Value,
}

impl<'a> RecordFactory<'a> {
    /// Creates a factory for the given record id with an empty document.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    /// - `id` - Full record id, e.g. `"Task:abc"`
    pub fn new(db: &'a DatabaseConnection, id: impl Into<String>) -> Self {
        Self {
            db,
            id: id.into(),
            data: Value::Object(Map::new()),
        }
    }

    /// Sets the stored data, which need not be a valid document.
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Builds and inserts the row.
    ///
    /// The row's `record_type` is taken from the id's prefix.
    ///
    /// # Returns
    /// - `Ok(entity::record::Model)` - Inserted row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::record::Model, DbErr> {
        let now = Utc::now();
        let record_type = self
            .id
            .split_once(':')
            .map(|(table, _)| table.to_string())
            .unwrap_or_default();

        entity::record::ActiveModel {
            id: ActiveValue::Set(self.id),
            record_type: ActiveValue::Set(record_type),
            data: ActiveValue::Set(self.data),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Inserts a task record built from a fixture document.
///
/// # Arguments
/// - `db` - Database connection
/// - `document` - Task document, usually from `fixture::task::document_builder()`
///
/// # Returns
/// - `Ok(entity::record::Model)` - Inserted row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_task_from(
    db: &DatabaseConnection,
    document: Map<String, Value>,
) -> Result<entity::record::Model, DbErr> {
    let id = document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    RecordFactory::new(db, id)
        .data(Value::Object(document))
        .build()
        .await
}

/// Inserts a default task record due in one hour.
///
/// Shorthand for `create_task_from(db, fixture::task::document())`.
pub async fn create_task(db: &DatabaseConnection) -> Result<entity::record::Model, DbErr> {
    create_task_from(db, fixture::task::document()).await
}
