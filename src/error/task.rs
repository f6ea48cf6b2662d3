use thiserror::Error;

use crate::model::record_id::RecordId;

/// Errors raised by the callback registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No callback is registered under this name.
    #[error("No callback is registered under the name '{0}'")]
    UnknownCallback(String),

    /// Another callback already claimed this name.
    ///
    /// Raised during startup registration and fatal, since silently shadowing a
    /// scheduled callback would run the wrong code for already-persisted tasks.
    #[error("A different callback is already registered under the name '{0}'")]
    DuplicateName(String),
}

/// A stored task document cannot be turned back into a runnable task.
#[derive(Error, Debug)]
pub enum DeserializationError {
    /// A field is missing or cannot be decoded.
    #[error("Malformed task document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document's id belongs to another entity type.
    #[error("Record {0} is not a Task")]
    NotATask(RecordId),

    /// The callback reference does not resolve in this process.
    #[error(transparent)]
    UnknownCallback(#[from] RegistryError),
}
