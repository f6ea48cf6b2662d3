use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::{
    data::{resource::ResourceRepository, store::RecordStore, test::doubles::MemoryStore},
    error::{moderation::ModerationError, AppError},
    model::{
        moderation::{BanParams, ChannelMute, MuteParams, ServerBan},
        record_id::RecordId,
        resource::{Resource, ResourceMeta},
    },
    scheduler::{
        registry::{CallbackRegistry, TaskCall},
        Scheduler,
    },
    service::moderation::{
        expire,
        gateway::{ModerationGateway, Notice},
        ModerationService,
    },
};


const ISSUER: u64 = 100;
const TARGET: u64 = 200;
const CHANNEL: u64 = 300;

/// A Discord call recorded by `FakeGateway`.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Ban { user_id: u64, reason: String },
    Unban(u64),
    Mute { channel_id: u64, user_id: u64 },
    Unmute { channel_id: u64, user_id: u64 },
    Notify { user_id: u64, title: String },
}

/// Gateway that records every call instead of talking to Discord.
#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    /// Makes `notify` fail, as it does for members who closed their DMs.
    closed_dms: bool,
}

impl FakeGateway {
    fn with_closed_dms() -> Self {
        Self {
            closed_dms: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModerationGateway for FakeGateway {
    async fn ban(
        &self,
        user_id: u64,
        _delete_message_days: u8,
        reason: &str,
    ) -> Result<(), AppError> {
        self.record(Call::Ban {
            user_id,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn unban(&self, user_id: u64) -> Result<(), AppError> {
        self.record(Call::Unban(user_id));
        Ok(())
    }

    async fn mute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError> {
        self.record(Call::Mute {
            channel_id,
            user_id,
        });
        Ok(())
    }

    async fn unmute(&self, channel_id: u64, user_id: u64) -> Result<(), AppError> {
        self.record(Call::Unmute {
            channel_id,
            user_id,
        });
        Ok(())
    }

    async fn notify(&self, user_id: u64, notice: Notice) -> Result<(), AppError> {
        if self.closed_dms {
            return Err(serenity::Error::Other("cannot send messages to this user").into());
        }
        self.record(Call::Notify {
            user_id,
            title: notice.title,
        });
        Ok(())
    }
}

/// Service wired the way startup wires it, over an in-memory store.
struct Setup {
    service: ModerationService,
    scheduler: Scheduler,
    store: MemoryStore,
    gateway: Arc<FakeGateway>,
}

fn setup_with(gateway: FakeGateway) -> Setup {
    let store = MemoryStore::new();
    let gateway = Arc::new(gateway);
    let shared: Arc<dyn RecordStore> = Arc::new(store.clone());

    let mut registry = CallbackRegistry::new();
    expire::register(&mut registry, shared.clone(), gateway.clone()).unwrap();

    let scheduler = Scheduler::new(shared, Arc::new(registry));
    let service = ModerationService::new(scheduler.clone(), gateway.clone());

    Setup {
        service,
        scheduler,
        store,
        gateway,
    }
}

fn setup() -> Setup {
    setup_with(FakeGateway::default())
}

fn ban_params(until: Option<chrono::DateTime<Utc>>) -> BanParams {
    BanParams {
        issuer_id: ISSUER,
        issuer_name: "mod#1".to_string(),
        target_id: TARGET,
        reason: Some("spam".to_string()),
        delete_message_days: 0,
        until,
    }
}

fn mute_params(until: Option<chrono::DateTime<Utc>>) -> MuteParams {
    MuteParams {
        issuer_id: ISSUER,
        issuer_name: "mod#1".to_string(),
        target_id: TARGET,
        channel_id: CHANNEL,
        reason: None,
        until,
    }
}

/// Builds the call a fired lift task would make for `action_id`.
fn lift_call(action_id: &RecordId) -> TaskCall {
    TaskCall {
        task_id: RecordId::generate("Task"),
        args: vec![serde_json::Value::String(action_id.to_string())],
        kwargs: serde_json::Map::new(),
    }
}
