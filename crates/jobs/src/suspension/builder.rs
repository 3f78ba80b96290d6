//! Suspension-state commands and the builders that validate them.

use jobcfg_core::TenantScope;

use crate::command::{CommandContext, EngineCommand, SuspensionState};
use crate::error::CommandError;

/// Which job definitions a state change applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobDefinitionTarget {
    JobDefinitionId(String),
    ProcessDefinitionId(String),
    ProcessDefinitionKey { key: String, tenant: TenantScope },
}

/// Which process definitions a state change applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessDefinitionTarget {
    ProcessDefinitionId(String),
    ProcessDefinitionKey { key: String, tenant: TenantScope },
}

/// Activate or suspend job definitions, optionally with their jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetJobDefinitionStateCmd {
    pub target: JobDefinitionTarget,
    pub state: SuspensionState,
    pub include_jobs: bool,
    pub audit_logging: bool,
}

impl SetJobDefinitionStateCmd {
    /// Timer-triggered changes are not user operations.
    pub fn disable_audit_logging(&mut self) {
        self.audit_logging = false;
    }

    pub fn execute(self, context: &mut dyn CommandContext) -> Result<(), CommandError> {
        context.execute(EngineCommand::SetJobDefinitionState(self))
    }
}

/// Activate or suspend process definitions, optionally with their instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetProcessDefinitionStateCmd {
    pub target: ProcessDefinitionTarget,
    pub state: SuspensionState,
    pub include_process_instances: bool,
    pub audit_logging: bool,
}

impl SetProcessDefinitionStateCmd {
    pub fn disable_audit_logging(&mut self) {
        self.audit_logging = false;
    }

    pub fn execute(self, context: &mut dyn CommandContext) -> Result<(), CommandError> {
        context.execute(EngineCommand::SetProcessDefinitionState(self))
    }
}

fn key_target(
    key: Option<String>,
    tenant: &TenantScope,
) -> Result<Option<(String, TenantScope)>, CommandError> {
    match key {
        Some(key) => Ok(Some((key, tenant.clone()))),
        None if tenant.is_set() => Err(CommandError::invalid_request(
            "a tenant restriction requires a process definition key",
        )),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateJobDefinitionSuspensionStateBuilder {
    job_definition_id: Option<String>,
    process_definition_id: Option<String>,
    process_definition_key: Option<String>,
    tenant: TenantScope,
    include_jobs: bool,
}

impl UpdateJobDefinitionSuspensionStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_job_definition_id(mut self, id: impl Into<String>) -> Self {
        self.job_definition_id = Some(id.into());
        self
    }

    pub fn by_process_definition_id(mut self, id: impl Into<String>) -> Self {
        self.process_definition_id = Some(id.into());
        self
    }

    pub fn by_process_definition_key(mut self, key: impl Into<String>) -> Self {
        self.process_definition_key = Some(key.into());
        self
    }

    pub fn process_definition_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant = TenantScope::tenant(tenant_id);
        self
    }

    pub fn process_definition_without_tenant_id(mut self) -> Self {
        self.tenant = TenantScope::WithoutTenant;
        self
    }

    pub fn include_jobs(mut self, include: bool) -> Self {
        self.include_jobs = include;
        self
    }

    pub fn activate(self) -> Result<SetJobDefinitionStateCmd, CommandError> {
        self.build(SuspensionState::Active)
    }

    pub fn suspend(self) -> Result<SetJobDefinitionStateCmd, CommandError> {
        self.build(SuspensionState::Suspended)
    }

    fn build(self, state: SuspensionState) -> Result<SetJobDefinitionStateCmd, CommandError> {
        let by_key = key_target(self.process_definition_key, &self.tenant)?;
        let target = match (self.job_definition_id, self.process_definition_id, by_key) {
            (Some(id), None, None) => JobDefinitionTarget::JobDefinitionId(id),
            (None, Some(id), None) => JobDefinitionTarget::ProcessDefinitionId(id),
            (None, None, Some((key, tenant))) => {
                JobDefinitionTarget::ProcessDefinitionKey { key, tenant }
            }
            (None, None, None) => {
                return Err(CommandError::invalid_request(
                    "a job definition id, process definition id or process definition key is required",
                ));
            }
            _ => {
                return Err(CommandError::invalid_request(
                    "only one job definition selector may be set",
                ));
            }
        };

        Ok(SetJobDefinitionStateCmd {
            target,
            state,
            include_jobs: self.include_jobs,
            audit_logging: true,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProcessDefinitionSuspensionStateBuilder {
    process_definition_id: Option<String>,
    process_definition_key: Option<String>,
    tenant: TenantScope,
    include_process_instances: bool,
}

impl UpdateProcessDefinitionSuspensionStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_process_definition_id(mut self, id: impl Into<String>) -> Self {
        self.process_definition_id = Some(id.into());
        self
    }

    pub fn by_process_definition_key(mut self, key: impl Into<String>) -> Self {
        self.process_definition_key = Some(key.into());
        self
    }

    pub fn process_definition_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant = TenantScope::tenant(tenant_id);
        self
    }

    pub fn process_definition_without_tenant_id(mut self) -> Self {
        self.tenant = TenantScope::WithoutTenant;
        self
    }

    pub fn include_process_instances(mut self, include: bool) -> Self {
        self.include_process_instances = include;
        self
    }

    pub fn activate(self) -> Result<SetProcessDefinitionStateCmd, CommandError> {
        self.build(SuspensionState::Active)
    }

    pub fn suspend(self) -> Result<SetProcessDefinitionStateCmd, CommandError> {
        self.build(SuspensionState::Suspended)
    }

    fn build(self, state: SuspensionState) -> Result<SetProcessDefinitionStateCmd, CommandError> {
        let by_key = key_target(self.process_definition_key, &self.tenant)?;
        let target = match (self.process_definition_id, by_key) {
            (Some(id), None) => ProcessDefinitionTarget::ProcessDefinitionId(id),
            (None, Some((key, tenant))) => ProcessDefinitionTarget::ProcessDefinitionKey { key, tenant },
            (None, None) => {
                return Err(CommandError::invalid_request(
                    "a process definition id or process definition key is required",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(CommandError::invalid_request(
                    "only one process definition selector may be set",
                ));
            }
        };

        Ok(SetProcessDefinitionStateCmd {
            target,
            state,
            include_process_instances: self.include_process_instances,
            audit_logging: true,
        })
    }
}
