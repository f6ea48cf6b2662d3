//! Kolkra community bot.
//!
//! The core of the crate is a persistent scheduler for one-shot tasks: deferred callbacks
//! that are stored before they are armed, survive restarts, fire at most once and are
//! removed once they have run or been cancelled. The bump reminder and timed moderation
//! services are built on it.

pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
