//! Task document fixtures.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};

use crate::factory::helpers::random_key;

/// Default callback name for fixture tasks.
pub const DEFAULT_CALLBACK: &str = "noop";

/// Entity type name of task records.
pub const TASK_TABLE: &str = "Task";

/// Creates a task document due one hour from now with default values.
///
/// # Default Values
/// - id: `"Task:{random}"`
/// - scheduled_for: now + 1 hour
/// - callback / task_type: `"noop"`
/// - args: `[]`, kwargs: `{}`
/// - run_late: `true`
pub fn document() -> Map<String, Value> {
    document_builder().build()
}

/// Creates a builder for a task document with custom fields.
pub fn document_builder() -> TaskDocumentBuilder {
    TaskDocumentBuilder::new()
}

/// Builder for task documents.
pub struct TaskDocumentBuilder {
    id: String,
    scheduled_for: DateTime<Utc>,
    callback: String,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
    run_late: bool,
    task_type: Option<String>,
}

impl TaskDocumentBuilder {
    pub fn new() -> Self {
        Self {
            id: format!("{TASK_TABLE}:{}", random_key()),
            scheduled_for: Utc::now() + Duration::hours(1),
            callback: DEFAULT_CALLBACK.to_string(),
            args: Vec::new(),
            kwargs: Map::new(),
            run_late: true,
            task_type: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn scheduled_for(mut self, scheduled_for: DateTime<Utc>) -> Self {
        self.scheduled_for = scheduled_for;
        self
    }

    /// Schedules the task relative to now; a negative offset makes it overdue.
    pub fn scheduled_in(mut self, offset: Duration) -> Self {
        self.scheduled_for = Utc::now() + offset;
        self
    }

    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = callback.into();
        self
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

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

    /// Returns the id the document will carry.
    pub fn id_str(&self) -> &str {
        &self.id
    }

    pub fn build(self) -> Map<String, Value> {
        let task_type = self.task_type.unwrap_or_else(|| self.callback.clone());

        let document = json!({
            "id": self.id,
            "scheduled_for": self.scheduled_for,
            "callback": self.callback,
            "args": self.args,
            "kwargs": self.kwargs,
            "run_late": self.run_late,
            "task_type": task_type,
            "created_at": Utc::now(),
            "updated_at": null,
        });

        match document {
            Value::Object(document) => document,
            _ => unreachable!("json! object literal"),
        }
    }
}

impl Default for TaskDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
