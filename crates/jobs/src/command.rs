//! Commands handed to the engine and the context that runs them.

use std::fmt;

use serde::{Deserialize, Serialize};

use jobcfg_batch::{
    BatchConfiguration, MigrationBatchConfiguration, ModificationBatchConfiguration,
    RestartProcessInstancesBatchConfiguration, SetRetriesBatchConfiguration,
};

use crate::error::CommandError;
use crate::suspension::{SetJobDefinitionStateCmd, SetProcessDefinitionStateCmd};

/// Target state of a suspension-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspensionState {
    Active,
    Suspended,
}

impl SuspensionState {
    pub fn name(&self) -> &'static str {
        match self {
            SuspensionState::Active => "active",
            SuspensionState::Suspended => "suspended",
        }
    }
}

impl fmt::Display for SuspensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One history cleanup run within the configured batch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCleanupCmd {
    pub immediately_due: bool,
    pub minute_from: u32,
    pub minute_to: u32,
    pub count_empty_runs: u32,
}

/// A side-effecting engine command produced by a job handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    SetJobDefinitionState(SetJobDefinitionStateCmd),
    SetProcessDefinitionState(SetProcessDefinitionStateCmd),
    HistoryCleanup(HistoryCleanupCmd),
    MigrateProcessInstances(MigrationBatchConfiguration),
    ModifyProcessInstances(ModificationBatchConfiguration),
    RestartProcessInstances(RestartProcessInstancesBatchConfiguration),
    SetJobRetries(SetRetriesBatchConfiguration),
    SetExternalTaskRetries(SetRetriesBatchConfiguration),
    DeleteHistoricDecisionInstances(BatchConfiguration),
}

impl EngineCommand {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::SetJobDefinitionState(_) => "set-job-definition-state",
            EngineCommand::SetProcessDefinitionState(_) => "set-process-definition-state",
            EngineCommand::HistoryCleanup(_) => "history-cleanup",
            EngineCommand::MigrateProcessInstances(_) => "migrate-process-instances",
            EngineCommand::ModifyProcessInstances(_) => "modify-process-instances",
            EngineCommand::RestartProcessInstances(_) => "restart-process-instances",
            EngineCommand::SetJobRetries(_) => "set-job-retries",
            EngineCommand::SetExternalTaskRetries(_) => "set-external-task-retries",
            EngineCommand::DeleteHistoricDecisionInstances(_) => {
                "delete-historic-decision-instances"
            }
        }
    }
}

/// The ambient command-execution context of the current transaction.
pub trait CommandContext {
    fn execute(&mut self, command: EngineCommand) -> Result<(), CommandError>;
}

/// Context that records commands instead of running them.
///
/// Used by the dry-run tool and by tests. Can be told to reject every
/// command to simulate a failing transaction.
#[derive(Debug, Default)]
pub struct RecordingCommandContext {
    commands: Vec<EngineCommand>,
    reject_with: Option<String>,
}

impl RecordingCommandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            reject_with: Some(reason.into()),
        }
    }

    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<EngineCommand> {
        self.commands
    }
}

impl CommandContext for RecordingCommandContext {
    fn execute(&mut self, command: EngineCommand) -> Result<(), CommandError> {
        if let Some(reason) = &self.reject_with {
            return Err(CommandError::rejected(reason.clone()));
        }
        self.commands.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleanup() -> EngineCommand {
        EngineCommand::HistoryCleanup(HistoryCleanupCmd {
            immediately_due: true,
            minute_from: 0,
            minute_to: 59,
            count_empty_runs: 0,
        })
    }

    #[test]
    fn recording_context_keeps_submission_order() {
        let mut ctx = RecordingCommandContext::new();
        ctx.execute(cleanup()).unwrap();
        ctx.execute(EngineCommand::SetJobRetries(SetRetriesBatchConfiguration::new(
            vec!["job-1".into()],
            3,
        )))
        .unwrap();

        let names: Vec<_> = ctx.commands().iter().map(EngineCommand::name).collect();
        assert_eq!(names, ["history-cleanup", "set-job-retries"]);
    }

    #[test]
    fn rejecting_context_records_nothing() {
        let mut ctx = RecordingCommandContext::rejecting("transaction rolled back");
        assert_eq!(
            ctx.execute(cleanup()),
            Err(CommandError::rejected("transaction rolled back"))
        );
        assert!(ctx.into_commands().is_empty());
    }
}
