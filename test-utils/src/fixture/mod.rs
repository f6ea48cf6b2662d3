//! Test fixtures providing stored documents without database insertion.
//!
//! Fixtures build documents in the exact shape the bot writes them, so tests can seed a
//! store (or a factory) with records that look like they were left by a previous run,
//! including deliberately malformed ones.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let document = fixture::task::document_builder()
//!     .callback("bump_reminder")
//!     .scheduled_in(chrono::Duration::hours(2))
//!     .build();
//! ```

pub mod task;
