//! Persistent one-shot task scheduler.
//!
//! Tasks are written to the record store before a timer is armed for them, and deleted
//! once they have fired or been cancelled, so the store always holds exactly the work
//! that is still pending. On startup `restore_all` re-arms every stored task.
//!
//! Each armed task is a spawned tokio task that sleeps until its deadline. The timer
//! table maps task ids to the abort handles of those sleeps. Removing a task's entry is
//! the claim that decides whether it fires or is cancelled: whichever of the timer and
//! `cancel` removes the entry first wins, and the other backs off.

pub mod registry;

#[cfg(test)]
mod test;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use serde_json::Value;
use tokio::task::AbortHandle;

use crate::{
    data::store::{Document, Query, RecordStore},
    error::{scheduler::SchedulerError, AppError},
    model::{
        record_id::RecordId,
        resource::Resource,
        task::{self, CreateTaskParams, Task, TASK_TABLE},
    },
    scheduler::registry::{CallbackRegistry, TaskCall, TaskCallback},
};

/// Counts of what `restore_all` did with the stored tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Future tasks re-armed with their original deadline.
    pub armed: usize,
    /// Overdue tasks that were run immediately.
    pub ran_late: usize,
    /// Overdue tasks discarded without running.
    pub discarded: usize,
    /// Documents that could not be deserialized and were left in the store.
    pub skipped: usize,
}

/// What happened to a task when it was handed to the timer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Armed,
    RanLate,
    Discarded,
}

/// Handle to the scheduler. Cheap to clone; all clones share one timer table.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn RecordStore>,
    registry: Arc<CallbackRegistry>,
    timers: Mutex<HashMap<RecordId, AbortHandle>>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn RecordStore>, registry: Arc<CallbackRegistry>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                registry,
                timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.inner.store
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.inner.registry
    }

    /// Persists a new task and arms a timer for it.
    ///
    /// A task whose time has already passed is handled before this returns: with
    /// `run_late` its callback is awaited inline, otherwise it is dropped. Either way its
    /// record is deleted and no timer is created.
    ///
    /// # Returns
    /// - `Ok(Task)`: The created task
    /// - `Err(AppError::RegistryErr)`: The callback name is not registered; nothing was stored
    /// - `Err(AppError::StoreErr)`: The task could not be persisted; nothing was armed
    pub async fn create_and_schedule(&self, params: CreateTaskParams) -> Result<Task, AppError> {
        let callback = self.inner.registry.resolve(&params.callback)?;

        let mut task = Task::new(params);
        let stored = self
            .inner
            .store
            .create(task.id(), task::to_document(&task)?)
            .await?;
        task.meta.updated_at = Some(stored.updated_at);

        tracing::info!(
            "Created task {} [{}] for {}: {}",
            task.id(),
            task.task_type,
            task.scheduled_for,
            task.signature()
        );

        self.inner.schedule(task.clone(), callback).await;

        Ok(task)
    }

    /// Cancels a pending task. See [`Scheduler::cancel_by_id`].
    pub async fn cancel(&self, task: &Task) -> Result<bool, AppError> {
        self.cancel_by_id(task.id()).await
    }

    /// Disarms a task's timer if it is still pending and deletes its record.
    ///
    /// Safe to call repeatedly, and after the task has fired.
    ///
    /// # Returns
    /// - `Ok(true)`: A live timer was disarmed; the callback will not run
    /// - `Ok(false)`: No live timer; the task had already fired, been cancelled, or was
    ///   never armed in this process
    /// - `Err(AppError::SchedulerErr)`: The id is not a task id
    /// - `Err(AppError::StoreErr)`: The record could not be deleted
    pub async fn cancel_by_id(&self, id: &RecordId) -> Result<bool, AppError> {
        if !id.is_of(TASK_TABLE) {
            return Err(SchedulerError::NotATask(id.clone()).into());
        }

        let disarmed = match self.inner.claim(id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        };

        self.inner.store.delete(id).await?;

        if disarmed {
            tracing::info!("Cancelled task {}", id);
        } else {
            tracing::debug!("Cancel of task {} found no live timer", id);
        }

        Ok(disarmed)
    }

    /// Re-arms every stored task after a restart.
    ///
    /// Tasks are processed in order of their deadline. Overdue tasks are run or
    /// discarded according to `run_late`. Documents that cannot be deserialized, for
    /// example because their callback is no longer registered, are logged and left in
    /// the store.
    ///
    /// # Returns
    /// - `Ok(RestoreSummary)`: What was done with each stored task
    /// - `Err(AppError::StoreErr)`: The stored tasks could not be listed
    pub async fn restore_all(&self) -> Result<RestoreSummary, AppError> {
        let documents = self
            .inner
            .store
            .query(&Query::table(TASK_TABLE).order_by("scheduled_for"))
            .await?;

        let mut summary = RestoreSummary::default();

        for document in documents {
            let Some((task, callback)) = self.inner.load(document) else {
                summary.skipped += 1;
                continue;
            };

            match self.inner.schedule(task, callback).await {
                Disposition::Armed => summary.armed += 1,
                Disposition::RanLate => summary.ran_late += 1,
                Disposition::Discarded => summary.discarded += 1,
            }
        }

        tracing::info!(
            "Restored scheduled tasks: {} armed, {} ran late, {} discarded, {} skipped",
            summary.armed,
            summary.ran_late,
            summary.discarded,
            summary.skipped
        );

        Ok(summary)
    }

    /// Lists the stored tasks of a type, soonest first.
    ///
    /// Documents that cannot be deserialized are logged and left out.
    pub async fn find_by_type(&self, task_type: &str) -> Result<Vec<Task>, AppError> {
        let documents = self
            .inner
            .store
            .query(
                &Query::table(TASK_TABLE)
                    .filter_eq("task_type", task_type)
                    .order_by("scheduled_for"),
            )
            .await?;

        Ok(documents
            .into_iter()
            .filter_map(|document| self.inner.load(document))
            .map(|(task, _)| task)
            .collect())
    }

    /// Returns true if the task has a live timer in this process.
    pub fn is_armed(&self, id: &RecordId) -> bool {
        self.inner.timers().contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.inner.timers().len()
    }

    /// Aborts every live timer without touching the store.
    ///
    /// Callbacks that are already running are left to finish. The aborted tasks'
    /// records stay in the store and are re-armed by the next `restore_all`.
    pub fn shutdown(&self) {
        let handles: Vec<AbortHandle> = self.inner.timers().drain().map(|(_, h)| h).collect();

        for handle in &handles {
            handle.abort();
        }

        tracing::info!("Scheduler stopped, {} timers disarmed", handles.len());
    }
}

impl Inner {
    fn timers(&self) -> MutexGuard<'_, HashMap<RecordId, AbortHandle>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes a task's timer entry. Only the caller that gets `Some` may act on the task.
    fn claim(&self, id: &RecordId) -> Option<AbortHandle> {
        self.timers().remove(id)
    }

    /// Deserializes a stored document and resolves its callback, logging failures.
    fn load(&self, document: Document) -> Option<(Task, TaskCallback)> {
        let id = document
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<no id>")
            .to_string();

        let task = match task::from_document(document, &self.registry) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("Skipping stored task {}: {}", id, e);
                return None;
            }
        };

        match self.registry.resolve(&task.callback) {
            Ok(callback) => Some((task, callback)),
            Err(e) => {
                tracing::warn!("Skipping stored task {}: {}", id, e);
                None
            }
        }
    }

    /// Arms a timer for a future task, or runs/discards an overdue one.
    async fn schedule(self: &Arc<Self>, task: Task, callback: TaskCallback) -> Disposition {
        if task.is_overdue(Utc::now()) {
            return self.dispose_overdue(task, callback).await;
        }

        self.arm(task, callback);
        Disposition::Armed
    }

    fn arm(self: &Arc<Self>, task: Task, callback: TaskCallback) {
        let delay = (task.scheduled_for - Utc::now())
            .to_std()
            .unwrap_or_default();
        let id = task.id().clone();
        let inner = Arc::clone(self);

        // Held across spawn and insert so the timer cannot claim before its entry exists.
        let mut timers = self.timers();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire(task, callback).await;
        });

        if let Some(previous) = timers.insert(id.clone(), handle.abort_handle()) {
            previous.abort();
        }

        tracing::debug!("Armed task {} to fire in {:?}", id, delay);
    }

    async fn fire(&self, task: Task, callback: TaskCallback) {
        if self.claim(task.id()).is_none() {
            tracing::debug!("Task {} was cancelled before it fired", task.id());
            return;
        }

        self.invoke(&task, callback).await;
        self.remove_record(&task).await;
    }

    async fn dispose_overdue(&self, task: Task, callback: TaskCallback) -> Disposition {
        let disposition = if task.run_late {
            tracing::info!(
                "Task {} was due at {}, running late",
                task.id(),
                task.scheduled_for
            );
            self.invoke(&task, callback).await;
            Disposition::RanLate
        } else {
            tracing::info!(
                "Task {} was due at {} and does not run late, discarding",
                task.id(),
                task.scheduled_for
            );
            Disposition::Discarded
        };

        self.remove_record(&task).await;

        disposition
    }

    /// Runs the callback to completion on its own tokio task, so a panic is contained
    /// and reported like an error.
    async fn invoke(&self, task: &Task, callback: TaskCallback) {
        let call = TaskCall {
            task_id: task.id().clone(),
            args: task.args.clone(),
            kwargs: task.kwargs.clone(),
        };

        match tokio::spawn(callback(call)).await {
            Ok(Ok(())) => {
                tracing::info!("Task {} ran {}", task.id(), task.signature());
            }
            Ok(Err(e)) => {
                tracing::error!(
                    "Task {} ({}) scheduled for {} failed: {}",
                    task.id(),
                    task.callback,
                    task.scheduled_for,
                    e
                );
            }
            Err(e) => {
                tracing::error!(
                    "Task {} ({}) scheduled for {} did not complete: {}",
                    task.id(),
                    task.callback,
                    task.scheduled_for,
                    e
                );
            }
        }
    }

    /// Deletes a finished task's record. A failure means the task may run again after
    /// the next restart.
    async fn remove_record(&self, task: &Task) {
        if let Err(e) = self.store.delete(task.id()).await {
            tracing::error!(
                "Failed to delete finished task {} ({}); it may run again on restart: {}",
                task.id(),
                task.callback,
                e
            );
        }
    }
}
