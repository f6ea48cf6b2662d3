use thiserror::Error;

use crate::model::record_id::RecordId;

/// Errors raised by the scheduler and by callbacks decoding their arguments.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// An id handed to the scheduler does not belong to the `Task` table.
    #[error("Record {0} is not a Task")]
    NotATask(RecordId),

    /// A callback argument is missing or does not have the expected type.
    #[error("Task {task_id} has an invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// The task being executed
        task_id: RecordId,
        /// Positional index or keyword name of the argument
        argument: String,
        /// Why the argument was rejected
        reason: String,
    },
}
