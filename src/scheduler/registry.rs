//! Name → callback lookup for scheduled tasks.
//!
//! Only a callback's registered name is persisted with a task, so every callback that a
//! stored task may reference must be registered under the same name on every start,
//! before tasks are restored.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    error::{scheduler::SchedulerError, task::RegistryError, AppError},
    model::record_id::RecordId,
};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// An invocable scheduled-task callback.
pub type TaskCallback = Arc<dyn Fn(TaskCall) -> BoxFuture<Result<(), AppError>> + Send + Sync>;

/// The arguments a callback is invoked with.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCall {
    /// Id of the task being executed.
    pub task_id: RecordId,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl TaskCall {
    /// Decodes the positional argument at `index`.
    ///
    /// # Returns
    /// - `Ok(T)`: The decoded argument
    /// - `Err(SchedulerError::InvalidArgument)`: Missing or of the wrong type
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, SchedulerError> {
        let value = self
            .args
            .get(index)
            .ok_or_else(|| self.invalid(index.to_string(), "missing".to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| self.invalid(index.to_string(), e.to_string()))
    }

    /// Decodes the keyword argument `name`.
    ///
    /// # Returns
    /// - `Ok(T)`: The decoded argument
    /// - `Err(SchedulerError::InvalidArgument)`: Missing or of the wrong type
    pub fn kwarg<T: DeserializeOwned>(&self, name: &str) -> Result<T, SchedulerError> {
        let value = self
            .kwargs
            .get(name)
            .ok_or_else(|| self.invalid(name.to_string(), "missing".to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| self.invalid(name.to_string(), e.to_string()))
    }

    fn invalid(&self, argument: String, reason: String) -> SchedulerError {
        SchedulerError::InvalidArgument {
            task_id: self.task_id.clone(),
            argument,
            reason,
        }
    }
}

/// Registry of callbacks that scheduled tasks may reference by name.
///
/// Populated once at startup, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, TaskCallback>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `name`.
    ///
    /// Registering the same callback handle twice under one name is a no-op.
    ///
    /// # Returns
    /// - `Ok(())`: Registered
    /// - `Err(RegistryError::DuplicateName)`: A different callback owns the name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        callback: TaskCallback,
    ) -> Result<(), RegistryError> {
        let name = name.into();

        if let Some(existing) = self.callbacks.get(&name) {
            if Arc::ptr_eq(existing, &callback) {
                return Ok(());
            }
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!("Registered task callback '{}'", name);
        self.callbacks.insert(name, callback);

        Ok(())
    }

    /// Registers an async function under `name`.
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(TaskCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let callback: TaskCallback =
            Arc::new(move |call| -> BoxFuture<Result<(), AppError>> { Box::pin(f(call)) });

        self.register(name, callback)
    }

    /// Looks up the callback registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<TaskCallback, RegistryError> {
        self.callbacks
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownCallback(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
