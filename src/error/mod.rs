//! Error types for the bot and its scheduled-task subsystem.
//!
//! Each concern has its own `thiserror` enum. `AppError` aggregates them and is the
//! error type returned by services, scheduled callbacks and startup code. Scheduler
//! internals never let a callback's `AppError` escape; they log it instead.

pub mod config;
pub mod moderation;
pub mod scheduler;
pub mod store;
pub mod task;

use thiserror::Error;

use crate::error::{
    config::ConfigError,
    moderation::ModerationError,
    scheduler::SchedulerError,
    store::StoreError,
    task::{DeserializationError, RegistryError},
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion so `?` works across layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Record store operation failed.
    ///
    /// Propagated by `create_and_schedule` and `cancel`; fatal when raised while
    /// restoring tasks at startup.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Callback registry error (unknown or duplicate callback name).
    ///
    /// A duplicate name during startup registration aborts the process.
    #[error(transparent)]
    RegistryErr(#[from] RegistryError),

    /// A stored task document could not be turned back into a runnable task.
    #[error(transparent)]
    DeserializationErr(#[from] DeserializationError),

    /// Scheduler misuse, such as cancelling a record that is not a task.
    #[error(transparent)]
    SchedulerErr(#[from] SchedulerError),

    /// A moderation action was requested with invalid parameters.
    #[error(transparent)]
    ModerationErr(#[from] ModerationError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
