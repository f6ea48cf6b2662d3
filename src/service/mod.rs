//! Application services built on the scheduler.
//!
//! - `bump_reminder` - Reminds the server to bump on DISBOARD once the cooldown ends
//! - `moderation` - Timed server bans and channel mutes that lift themselves

pub mod bump_reminder;
pub mod moderation;
