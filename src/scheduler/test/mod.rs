use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;

use crate::{
    data::{
        record::RecordRepository,
        store::RecordStore,
        test::doubles::{FailingStore, MemoryStore, UndeletableStore},
    },
    error::{scheduler::SchedulerError, store::StoreError, task::RegistryError, AppError},
    model::{record_id::RecordId, resource::Resource, task::CreateTaskParams},
    scheduler::{registry::CallbackRegistry, RestoreSummary, Scheduler},
};
use test_utils::{builder::TestBuilder, factory, fixture};


/// Callback that counts its invocations.
const COUNT: &str = "count";
/// Callback that always returns an error.
const FAIL: &str = "fail";
/// Callback that panics.
const PANIC: &str = "panic";

/// Builds a registry with the test callbacks, returning the invocation counter.
fn counting_registry() -> (Arc<CallbackRegistry>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut registry = CallbackRegistry::new();

    let counter = hits.clone();
    registry
        .register_fn(COUNT, move |_call| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .unwrap();

    let counter = hits.clone();
    registry
        .register_fn(FAIL, move |call| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), AppError>(SchedulerError::InvalidArgument {
                    task_id: call.task_id,
                    argument: "0".to_string(),
                    reason: "nothing to do".to_string(),
                }
                .into())
            }
        })
        .unwrap();

    let counter = hits.clone();
    registry
        .register_fn(PANIC, move |_call| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                explode()
            }
        })
        .unwrap();

    (Arc::new(registry), hits)
}

fn explode() -> Result<(), AppError> {
    panic!("callback blew up")
}

fn memory_scheduler() -> (Scheduler, MemoryStore, Arc<AtomicUsize>) {
    let (registry, hits) = counting_registry();
    let store = MemoryStore::new();
    let scheduler = Scheduler::new(Arc::new(store.clone()), registry);

    (scheduler, store, hits)
}

fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
