//! Timer-triggered suspension-state changes.
//!
//! A suspension job carries a selector (`by`) naming which of its target
//! fields identifies the definitions to change. Parsing accepts any selector
//! string; an unknown one only fails when the handler builds its command.

pub mod builder;
pub mod job_definition;
pub mod process_definition;

pub use builder::{
    JobDefinitionTarget, ProcessDefinitionTarget, SetJobDefinitionStateCmd,
    SetProcessDefinitionStateCmd, UpdateJobDefinitionSuspensionStateBuilder,
    UpdateProcessDefinitionSuspensionStateBuilder,
};
pub use job_definition::{
    JobDefinitionSuspensionStateConfiguration, JobDefinitionSuspensionStateHandler,
};
pub use process_definition::{
    ProcessDefinitionSuspensionStateConfiguration, ProcessDefinitionSuspensionStateHandler,
};

use jobcfg_core::json::get_str;
use jobcfg_core::{ConfigError, ConfigResult, JsonObject};

pub const BY: &str = "by";
pub const JOB_DEFINITION_ID: &str = "jobDefinitionId";
pub const PROCESS_DEFINITION_ID: &str = "processDefinitionId";
pub const PROCESS_DEFINITION_KEY: &str = "processDefinitionKey";
pub const PROCESS_DEFINITION_TENANT_ID: &str = "processDefinitionTenantId";
pub const INCLUDE_JOBS: &str = "includeJobs";
pub const INCLUDE_PROCESS_INSTANCES: &str = "includeProcessInstances";

/// The `by` selector of a suspension configuration.
///
/// Its wire value is the name of the field holding the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuspensionSelector {
    JobDefinitionId,
    ProcessDefinitionId,
    ProcessDefinitionKey,
    /// Kept verbatim so the dispatch error can name it.
    Unrecognized(String),
}

impl SuspensionSelector {
    pub fn from_wire(value: &str) -> Self {
        match value {
            JOB_DEFINITION_ID => SuspensionSelector::JobDefinitionId,
            PROCESS_DEFINITION_ID => SuspensionSelector::ProcessDefinitionId,
            PROCESS_DEFINITION_KEY => SuspensionSelector::ProcessDefinitionKey,
            other => SuspensionSelector::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SuspensionSelector::JobDefinitionId => JOB_DEFINITION_ID,
            SuspensionSelector::ProcessDefinitionId => PROCESS_DEFINITION_ID,
            SuspensionSelector::ProcessDefinitionKey => PROCESS_DEFINITION_KEY,
            SuspensionSelector::Unrecognized(value) => value,
        }
    }

    pub(crate) fn read(json: &JsonObject) -> ConfigResult<Self> {
        get_str(json, BY).map(Self::from_wire)
    }

    pub(crate) fn unknown(&self) -> ConfigError {
        ConfigError::UnknownSelector(self.as_str().to_string())
    }
}

/// The target value a recognised selector points at; absent is malformed.
pub(crate) fn selected<'a>(value: &'a Option<String>, field: &str) -> ConfigResult<&'a str> {
    value.as_deref().ok_or_else(|| ConfigError::missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_wire_names() {
        for selector in [
            SuspensionSelector::JobDefinitionId,
            SuspensionSelector::ProcessDefinitionId,
            SuspensionSelector::ProcessDefinitionKey,
        ] {
            assert_eq!(SuspensionSelector::from_wire(selector.as_str()), selector);
        }
    }

    #[test]
    fn unknown_selector_is_kept_verbatim() {
        let selector = SuspensionSelector::from_wire("deploymentId");
        assert_eq!(selector, SuspensionSelector::Unrecognized("deploymentId".into()));
        assert_eq!(selector.unknown(), ConfigError::UnknownSelector("deploymentId".into()));
    }
}
