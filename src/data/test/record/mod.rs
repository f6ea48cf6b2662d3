use crate::{
    data::{
        record::RecordRepository,
        store::{Document, Query, RecordStore},
    },
    error::{store::StoreError, AppError},
    model::record_id::RecordId,
};
use sea_orm::EntityTrait;
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod query;
mod select;
mod update;

fn document(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap_or_default()
}
