//! Factory methods for inserting test records.
//!
//! Factories write rows straight into the `record` table, bypassing the bot's store
//! layer, to set up state as a previous run would have left it.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::{factory, fixture};
//!
//! // Insert a default task due in an hour
//! let record = factory::record::create_task(&db).await?;
//!
//! // Insert a custom document
//! let record = factory::record::RecordFactory::new(&db, "Task:abc")
//!     .data(fixture::task::document_builder().id("Task:abc").build())
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod record;
