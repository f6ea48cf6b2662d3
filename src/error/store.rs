use thiserror::Error;

use crate::model::record_id::RecordId;

/// A string that is not of the form `{Table}:{key}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid record ID '{0}', expected '<Table>:<key>'")]
pub struct InvalidRecordId(pub String);

/// Errors raised by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// `create` was called with an id that already has a record.
    #[error("Record {0} already exists")]
    AlreadyExists(RecordId),

    /// `update` was called with an id that has no record.
    #[error("Record {0} does not exist")]
    NotFound(RecordId),

    /// The stored or provided data is not a JSON object.
    #[error("Record {0} is not a document")]
    NotADocument(String),

    /// A record was fetched or written under the wrong entity type.
    #[error("Record {id} is not a {expected}")]
    WrongTable {
        /// The offending record id
        id: RecordId,
        /// The entity type name that was expected
        expected: String,
    },

    #[error(transparent)]
    InvalidRecordId(#[from] InvalidRecordId),

    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
