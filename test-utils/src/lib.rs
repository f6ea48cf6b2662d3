//! Kolkra Test Utils
//!
//! Shared testing utilities for the bot's persistence and scheduling tests. Provides a
//! builder for test contexts backed by in-memory SQLite, factories that insert raw
//! records, and fixtures that build stored documents without a database.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn test_record_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_record_tables()
//!         .build()
//!         .await?;
//!
//!     let db = test.db.as_ref().unwrap();
//!     let task = factory::record::create_task(db).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
