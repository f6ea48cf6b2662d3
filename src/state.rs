//! Application state shared with the Discord event handler.
//!
//! Built once in `main` after the scheduler has restored its tasks. Every field is cheap
//! to clone: the scheduler and services share their internals through `Arc`.

use std::sync::Arc;

use crate::{scheduler::Scheduler, service::bump_reminder::BumpReminderService};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,

    /// Bump reminders, `None` when no bump channel is configured.
    pub bump_reminder: Option<Arc<BumpReminderService>>,
}

impl AppState {
    pub fn new(scheduler: Scheduler, bump_reminder: Option<BumpReminderService>) -> Self {
        Self {
            scheduler,
            bump_reminder: bump_reminder.map(Arc::new),
        }
    }
}
