//! Timed moderation actions and their operation parameters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    record_id::RecordId,
    resource::{Resource, ResourceMeta},
};

/// A server ban, optionally lifted automatically by a scheduled task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerBan {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub issuer_id: u64,
    pub target_id: u64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub delete_message_days: u8,
    /// Task that lifts the ban at its expiry, `None` for permanent bans.
    #[serde(default)]
    pub auto_lift_task: Option<RecordId>,
}

impl Resource for ServerBan {
    const TABLE: &'static str = "ServerBan";

    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

/// A per-channel mute of a single member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMute {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    pub issuer_id: u64,
    pub target_id: u64,
    pub channel_id: u64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub auto_lift_task: Option<RecordId>,
}

impl Resource for ChannelMute {
    const TABLE: &'static str = "ChannelMute";

    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

/// Parameters for banning a member from the server.
#[derive(Debug, Clone)]
pub struct BanParams {
    pub issuer_id: u64,
    /// Display name of the issuer, recorded in the audit log.
    pub issuer_name: String,
    pub target_id: u64,
    pub reason: Option<String>,
    pub delete_message_days: u8,
    /// When the ban lifts itself; `None` bans permanently.
    pub until: Option<DateTime<Utc>>,
}

/// Parameters for muting a member in a single channel.
#[derive(Debug, Clone)]
pub struct MuteParams {
    pub issuer_id: u64,
    pub issuer_name: String,
    pub target_id: u64,
    pub channel_id: u64,
    pub reason: Option<String>,
    /// When the mute lifts itself; `None` mutes until lifted manually.
    pub until: Option<DateTime<Utc>>,
}

/// Builds the audit log reason recorded with a moderation API call.
///
/// Names the issuing moderator, then the reason and expiry when present.
pub fn audit_reason(
    issuer_name: &str,
    reason: Option<&str>,
    until: Option<DateTime<Utc>>,
) -> String {
    let mut text = issuer_name.to_string();

    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        text.push_str(": ");
        text.push_str(reason);
    }

    if let Some(until) = until {
        text.push_str(&format!(
            " (Expires {})",
            until.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }

    text
}
