use std::sync::Arc;

use crate::{
    data::{record::RecordRepository, resource::ResourceRepository, store::RecordStore},
    error::{store::StoreError, AppError},
    model::{
        moderation::ServerBan,
        record_id::RecordId,
        resource::{Resource, ResourceMeta},
    },
};
use test_utils::builder::TestBuilder;

mod find_where;
mod get;
mod store;

fn ban(target_id: u64) -> ServerBan {
    ServerBan {
        meta: ResourceMeta::new(ServerBan::TABLE),
        issuer_id: 1,
        target_id,
        reason: Some("spam".to_string()),
        delete_message_days: 0,
        auto_lift_task: None,
    }
}
