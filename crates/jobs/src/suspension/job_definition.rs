//! Timer-triggered job definition activation and suspension.

use std::sync::Arc;

use tracing::debug;

use jobcfg_core::json::{add_default_bool, add_opt_string, add_string, bool_or, opt_str};
use jobcfg_core::{ConfigResult, JsonCodec, JsonObject, TenantScope};

use super::builder::UpdateJobDefinitionSuspensionStateBuilder;
use super::{
    BY, INCLUDE_JOBS, JOB_DEFINITION_ID, PROCESS_DEFINITION_ID, PROCESS_DEFINITION_KEY,
    PROCESS_DEFINITION_TENANT_ID, SuspensionSelector, selected,
};
use crate::command::{CommandContext, SuspensionState};
use crate::error::JobError;
use crate::handler::{ExecutionHandle, JobHandler, JobHandlerConfiguration};
use crate::handler_types;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinitionSuspensionStateConfiguration {
    pub by: SuspensionSelector,
    pub job_definition_id: Option<String>,
    pub process_definition_id: Option<String>,
    pub process_definition_key: Option<String>,
    pub include_jobs: bool,
    pub tenant: TenantScope,
}

impl JobDefinitionSuspensionStateConfiguration {
    fn with_selector(by: SuspensionSelector, include_jobs: bool) -> Self {
        Self {
            by,
            job_definition_id: None,
            process_definition_id: None,
            process_definition_key: None,
            include_jobs,
            tenant: TenantScope::NotConsidered,
        }
    }

    pub fn by_job_definition_id(id: impl Into<String>, include_jobs: bool) -> Self {
        Self {
            job_definition_id: Some(id.into()),
            ..Self::with_selector(SuspensionSelector::JobDefinitionId, include_jobs)
        }
    }

    pub fn by_process_definition_id(id: impl Into<String>, include_jobs: bool) -> Self {
        Self {
            process_definition_id: Some(id.into()),
            ..Self::with_selector(SuspensionSelector::ProcessDefinitionId, include_jobs)
        }
    }

    pub fn by_process_definition_key(key: impl Into<String>, include_jobs: bool) -> Self {
        Self {
            process_definition_key: Some(key.into()),
            ..Self::with_selector(SuspensionSelector::ProcessDefinitionKey, include_jobs)
        }
    }

    /// `tenant_id: None` restricts to definitions without a tenant.
    pub fn by_process_definition_key_and_tenant_id(
        key: impl Into<String>,
        tenant_id: Option<String>,
        include_jobs: bool,
    ) -> Self {
        Self {
            tenant: TenantScope::explicit(tenant_id),
            ..Self::by_process_definition_key(key, include_jobs)
        }
    }

    pub fn to_json_object(&self, codec: &JsonCodec) -> JsonObject {
        let mut json = codec.create_object();
        add_string(&mut json, BY, self.by.as_str());
        add_opt_string(&mut json, JOB_DEFINITION_ID, self.job_definition_id.as_deref());
        add_opt_string(&mut json, PROCESS_DEFINITION_ID, self.process_definition_id.as_deref());
        add_opt_string(&mut json, PROCESS_DEFINITION_KEY, self.process_definition_key.as_deref());
        add_default_bool(&mut json, INCLUDE_JOBS, false, self.include_jobs);
        self.tenant.write_field(&mut json, PROCESS_DEFINITION_TENANT_ID);
        json
    }

    pub fn from_json(json: &JsonObject) -> ConfigResult<Self> {
        Ok(Self {
            by: SuspensionSelector::read(json)?,
            job_definition_id: opt_str(json, JOB_DEFINITION_ID)?.map(str::to_string),
            process_definition_id: opt_str(json, PROCESS_DEFINITION_ID)?.map(str::to_string),
            process_definition_key: opt_str(json, PROCESS_DEFINITION_KEY)?.map(str::to_string),
            include_jobs: bool_or(json, INCLUDE_JOBS, false)?,
            tenant: TenantScope::read_field(json, PROCESS_DEFINITION_TENANT_ID)?,
        })
    }

    /// Resolve the selector into a builder.
    ///
    /// The tenant scope only applies to key selection.
    pub fn create_builder(&self) -> ConfigResult<UpdateJobDefinitionSuspensionStateBuilder> {
        let builder = UpdateJobDefinitionSuspensionStateBuilder::new();
        let builder = match &self.by {
            SuspensionSelector::ProcessDefinitionId => builder.by_process_definition_id(selected(
                &self.process_definition_id,
                PROCESS_DEFINITION_ID,
            )?),
            SuspensionSelector::JobDefinitionId => builder
                .by_job_definition_id(selected(&self.job_definition_id, JOB_DEFINITION_ID)?),
            SuspensionSelector::ProcessDefinitionKey => {
                let builder = builder.by_process_definition_key(selected(
                    &self.process_definition_key,
                    PROCESS_DEFINITION_KEY,
                )?);
                match &self.tenant {
                    TenantScope::NotConsidered => builder,
                    TenantScope::WithoutTenant => builder.process_definition_without_tenant_id(),
                    TenantScope::Tenant(id) => builder.process_definition_tenant_id(id.as_str()),
                }
            }
            SuspensionSelector::Unrecognized(_) => return Err(self.by.unknown()),
        };
        Ok(builder.include_jobs(self.include_jobs))
    }
}

impl JobHandlerConfiguration for JobDefinitionSuspensionStateConfiguration {
    fn to_canonical_string(&self, codec: &JsonCodec) -> String {
        codec.write_string(self.to_json_object(codec))
    }
}

/// Activates or suspends job definitions when its timer fires.
#[derive(Debug, Clone)]
pub struct JobDefinitionSuspensionStateHandler {
    codec: Arc<JsonCodec>,
    state: SuspensionState,
}

impl JobDefinitionSuspensionStateHandler {
    pub fn activate(codec: Arc<JsonCodec>) -> Self {
        Self {
            codec,
            state: SuspensionState::Active,
        }
    }

    pub fn suspend(codec: Arc<JsonCodec>) -> Self {
        Self {
            codec,
            state: SuspensionState::Suspended,
        }
    }

    pub fn state(&self) -> SuspensionState {
        self.state
    }
}

impl JobHandler for JobDefinitionSuspensionStateHandler {
    type Configuration = JobDefinitionSuspensionStateConfiguration;

    fn handler_type(&self) -> &str {
        match self.state {
            SuspensionState::Active => handler_types::ACTIVATE_JOB_DEFINITION,
            SuspensionState::Suspended => handler_types::SUSPEND_JOB_DEFINITION,
        }
    }

    fn execute(
        &self,
        configuration: &Self::Configuration,
        _execution: Option<&ExecutionHandle>,
        context: &mut dyn CommandContext,
        _tenant_id: Option<&str>,
    ) -> Result<(), JobError> {
        let builder = configuration.create_builder()?;
        let mut cmd = match self.state {
            SuspensionState::Active => builder.activate()?,
            SuspensionState::Suspended => builder.suspend()?,
        };
        cmd.disable_audit_logging();

        debug!(by = configuration.by.as_str(), state = %self.state, "changing job definition state");
        cmd.execute(context)?;
        Ok(())
    }

    fn new_configuration(&self, canonical: &str) -> ConfigResult<Self::Configuration> {
        Self::Configuration::from_json(&self.codec.parse_object(canonical)?)
    }
}
