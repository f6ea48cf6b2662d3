//! Domain models persisted in the record store.

pub mod moderation;
pub mod record_id;
pub mod resource;
pub mod task;
