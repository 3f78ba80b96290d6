//! Job handlers for persisted job configurations.
//!
//! ## Flow
//!
//! - an operation builds a typed configuration and serializes it once
//! - the canonical string is stored on a [`JobRecord`]
//! - on every attempt the [`JobHandlerRegistry`] re-parses the string with the
//!   handler registered for the job's type and runs it against a
//!   [`CommandContext`]
//! - deleting the job re-parses once more and calls the handler's `on_delete`
//!
//! Handlers never mutate engine state themselves; they hand an
//! [`EngineCommand`] to the context.

pub mod batch;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod history_cleanup;
pub mod registry;
pub mod suspension;

pub use batch::{BatchJobConfiguration, BatchJobHandler};
pub use command::{
    CommandContext, EngineCommand, HistoryCleanupCmd, RecordingCommandContext, SuspensionState,
};
pub use config::JobHandlersConfig;
pub use error::{CommandError, JobError};
pub use handler::{ExecutionHandle, JobHandler, JobHandlerConfiguration, JobId, JobRecord};
pub use history_cleanup::{HistoryCleanupJobHandler, HistoryCleanupJobHandlerConfiguration};
pub use registry::JobHandlerRegistry;
pub use suspension::{
    JobDefinitionSuspensionStateConfiguration, JobDefinitionSuspensionStateHandler,
    ProcessDefinitionSuspensionStateConfiguration, ProcessDefinitionSuspensionStateHandler,
    SetJobDefinitionStateCmd, SetProcessDefinitionStateCmd, SuspensionSelector,
    UpdateJobDefinitionSuspensionStateBuilder, UpdateProcessDefinitionSuspensionStateBuilder,
};

/// Stable handler type strings. Persisted on job records; never rename.
pub mod handler_types {
    pub const ACTIVATE_JOB_DEFINITION: &str = "activate-job-definition";
    pub const SUSPEND_JOB_DEFINITION: &str = "suspend-job-definition";
    pub const ACTIVATE_PROCESS_DEFINITION: &str = "activate-processdefinition";
    pub const SUSPEND_PROCESS_DEFINITION: &str = "suspend-processdefinition";
    pub const HISTORY_CLEANUP: &str = "history-cleanup";
    pub const MIGRATION: &str = "instance-migration";
    pub const MODIFICATION: &str = "instance-modification";
    pub const RESTART: &str = "instance-restart";
    pub const SET_JOB_RETRIES: &str = "set-job-retries";
    pub const SET_EXTERNAL_TASK_RETRIES: &str = "set-external-task-retries";
    pub const DELETE_HISTORIC_DECISION_INSTANCES: &str = "historic-decision-instance-deletion";
}
