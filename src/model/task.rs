//! The durable unit of deferred work and its document representation.
//!
//! A `Task` says "run the callback registered as `callback` with `args`/`kwargs` at
//! `scheduled_for`". Only the callback's registry name and plain JSON arguments are
//! persisted, so a task written by one process can be executed by any later process
//! that registers the same callback names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    data::store::Document,
    error::{store::StoreError, task::DeserializationError},
    model::resource::{self, Resource, ResourceMeta},
    scheduler::registry::CallbackRegistry,
};

/// Entity type name of tasks in the record store.
pub const TASK_TABLE: &str = "Task";

/// A persisted, at-most-once deferred invocation of a registered callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    /// Absolute time the task should fire. Never mutated after creation.
    pub scheduled_for: DateTime<Utc>,
    /// Registry name of the callback to invoke.
    pub callback: String,
    /// Positional arguments passed to the callback.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Keyword arguments passed to the callback.
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    /// Whether an overdue task still fires when discovered, or is discarded.
    #[serde(default = "run_late_default")]
    pub run_late: bool,
    /// Grouping label, defaults to the callback name.
    #[serde(default)]
    pub task_type: String,
}

impl Resource for Task {
    const TABLE: &'static str = TASK_TABLE;

    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

fn run_late_default() -> bool {
    true
}

impl Task {
    /// Builds a new, not yet persisted task from creation parameters.
    pub fn new(params: CreateTaskParams) -> Self {
        let task_type = params
            .task_type
            .unwrap_or_else(|| params.callback.clone());

        Self {
            meta: ResourceMeta::new(TASK_TABLE),
            scheduled_for: params.scheduled_for,
            callback: params.callback,
            args: params.args,
            kwargs: params.kwargs,
            run_late: params.run_late,
            task_type,
        }
    }

    /// Returns true if the task's scheduled time is at or before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_for <= now
    }

    /// Renders the invocation as `callback(arg, key=value)` for log lines.
    pub fn signature(&self) -> String {
        let args = self.args.iter().map(|v| v.to_string());
        let kwargs = self.kwargs.iter().map(|(k, v)| format!("{k}={v}"));

        format!(
            "{}({})",
            self.callback,
            args.chain(kwargs).collect::<Vec<_>>().join(", ")
        )
    }
}

/// Parameters for creating and scheduling a new task.
#[derive(Debug, Clone)]
pub struct CreateTaskParams {
    /// When the task should fire.
    pub scheduled_for: DateTime<Utc>,
    /// Registry name of the callback.
    pub callback: String,
    /// Positional callback arguments.
    pub args: Vec<Value>,
    /// Keyword callback arguments.
    pub kwargs: Map<String, Value>,
    /// Fire immediately if found overdue (default), or discard.
    pub run_late: bool,
    /// Grouping label; `None` uses the callback name.
    pub task_type: Option<String>,
}

impl CreateTaskParams {
    /// Creates parameters with no arguments, `run_late = true` and the default task type.
    pub fn new(scheduled_for: DateTime<Utc>, callback: impl Into<String>) -> Self {
        Self {
            scheduled_for,
            callback: callback.into(),
            args: Vec::new(),
            kwargs: Map::new(),
            run_late: true,
            task_type: None,
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Sets a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    pub fn run_late(mut self, run_late: bool) -> Self {
        self.run_late = run_late;
        self
    }

    pub fn task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }
}

/// Converts a task into its flat store document.
///
/// Timestamps are written as RFC 3339 strings in UTC with as many fractional digits as
/// needed to reproduce the value exactly.
pub fn to_document(task: &Task) -> Result<Document, StoreError> {
    resource::to_document(task)
}

/// Rebuilds a task from its store document.
///
/// Missing `args`, `kwargs`, `run_late` and `task_type` fall back to their defaults. The
/// callback name must resolve in `registry`; a task whose code is not registered in this
/// process cannot be run and is reported rather than silently dropped.
///
/// # Returns
/// - `Ok(Task)` - The reconstructed task
/// - `Err(DeserializationError)` - Missing or malformed field, non-task id, or
///   unknown callback
pub fn from_document(
    document: Document,
    registry: &CallbackRegistry,
) -> Result<Task, DeserializationError> {
    let mut task: Task = serde_json::from_value(Value::Object(document))?;

    if !task.id().is_of(TASK_TABLE) {
        return Err(DeserializationError::NotATask(task.meta.id));
    }

    registry.resolve(&task.callback)?;

    if task.task_type.is_empty() {
        task.task_type = task.callback.clone();
    }

    Ok(task)
}
