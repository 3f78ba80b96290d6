//! The job-handler contract and the persisted job record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jobcfg_core::{ConfigResult, JsonCodec};

use crate::command::CommandContext;
use crate::error::JobError;

/// Unique job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the execution a job is attached to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHandle(pub String);

impl ExecutionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// A persisted job as seen by the handlers.
///
/// Only the fields handlers read are modelled; locking, retries and due
/// dates belong to the job executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub handler_type: String,
    /// Canonical configuration string, re-parsed on every attempt.
    pub configuration: String,
    pub tenant_id: Option<String>,
    pub execution: Option<ExecutionHandle>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(handler_type: impl Into<String>, configuration: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            handler_type: handler_type.into(),
            configuration: configuration.into(),
            tenant_id: None,
            execution: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_execution(mut self, execution: ExecutionHandle) -> Self {
        self.execution = Some(execution);
        self
    }
}

/// A job configuration that knows its own canonical string.
pub trait JobHandlerConfiguration {
    fn to_canonical_string(&self, codec: &JsonCodec) -> String;
}

/// Executes jobs of one handler type.
///
/// Implementations are stateless apart from the injected codec and may be
/// called concurrently for independent jobs.
pub trait JobHandler: Send + Sync {
    type Configuration: JobHandlerConfiguration;

    /// The type string persisted on job records routed to this handler.
    fn handler_type(&self) -> &str;

    fn execute(
        &self,
        configuration: &Self::Configuration,
        execution: Option<&ExecutionHandle>,
        context: &mut dyn CommandContext,
        tenant_id: Option<&str>,
    ) -> Result<(), JobError>;

    /// Parse a canonical configuration string.
    fn new_configuration(&self, canonical: &str) -> ConfigResult<Self::Configuration>;

    /// Called when the job is deleted before it completed.
    fn on_delete(&self, _configuration: &Self::Configuration, _job: &JobRecord) {}
}
