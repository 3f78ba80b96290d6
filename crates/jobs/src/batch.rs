//! Job handlers for batch operations.
//!
//! Every batch job carries the full batch configuration for its chunk of ids.
//! The handler parses it with the operation's converter and submits one
//! command for the whole chunk.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use jobcfg_batch::{
    BatchIds, DeleteHistoricDecisionInstancesConverter, MigrationBatchConfigurationConverter,
    ModificationBatchConfigurationConverter, RestartProcessInstancesConverter,
    SetRetriesBatchConfigurationConverter,
};
use jobcfg_core::{ConfigResult, JsonCodec, JsonObjectConverter};

use crate::command::{CommandContext, EngineCommand};
use crate::error::JobError;
use crate::handler::{ExecutionHandle, JobHandler, JobHandlerConfiguration};
use crate::handler_types;

/// A parsed batch chunk paired with the converter that reads and writes it.
///
/// The converter decides field names (`jobIds` or `externalTaskIds` for the
/// retries batches), so the canonical string can only be produced with it.
pub struct BatchJobConfiguration<C: JsonObjectConverter> {
    converter: C,
    configuration: C::Target,
}

impl<C: JsonObjectConverter> BatchJobConfiguration<C> {
    pub fn configuration(&self) -> &C::Target {
        &self.configuration
    }

    pub fn into_inner(self) -> C::Target {
        self.configuration
    }
}

impl<C: JsonObjectConverter> JobHandlerConfiguration for BatchJobConfiguration<C> {
    fn to_canonical_string(&self, codec: &JsonCodec) -> String {
        codec.write_string(self.converter.to_json_object(&self.configuration))
    }
}

impl<C> fmt::Debug for BatchJobConfiguration<C>
where
    C: JsonObjectConverter,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchJobConfiguration")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

pub struct BatchJobHandler<C: JsonObjectConverter> {
    handler_type: &'static str,
    converter: C,
    to_command: fn(C::Target) -> EngineCommand,
}

impl<C: JsonObjectConverter> BatchJobHandler<C> {
    pub fn new(
        handler_type: &'static str,
        converter: C,
        to_command: fn(C::Target) -> EngineCommand,
    ) -> Self {
        Self {
            handler_type,
            converter,
            to_command,
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// The canonical string stored on each job of the batch.
    pub fn write_configuration(&self, configuration: &C::Target) -> String {
        self.converter.to_canonical_string(configuration)
    }
}

impl<C: JsonObjectConverter + Clone> BatchJobHandler<C> {
    /// Pair a chunk with this handler's converter.
    pub fn configuration(&self, configuration: C::Target) -> BatchJobConfiguration<C> {
        BatchJobConfiguration {
            converter: self.converter.clone(),
            configuration,
        }
    }
}

impl<C: JsonObjectConverter> fmt::Debug for BatchJobHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchJobHandler")
            .field("handler_type", &self.handler_type)
            .finish_non_exhaustive()
    }
}

impl<C> JobHandler for BatchJobHandler<C>
where
    C: JsonObjectConverter + Clone + Send + Sync,
    C::Target: BatchIds + Clone,
{
    type Configuration = BatchJobConfiguration<C>;

    fn handler_type(&self) -> &str {
        self.handler_type
    }

    fn execute(
        &self,
        configuration: &Self::Configuration,
        _execution: Option<&ExecutionHandle>,
        context: &mut dyn CommandContext,
        _tenant_id: Option<&str>,
    ) -> Result<(), JobError> {
        let chunk = configuration.configuration();
        debug!(
            handler_type = self.handler_type,
            ids = chunk.ids().len(),
            "submitting batch chunk"
        );
        context.execute((self.to_command)(chunk.clone()))?;
        Ok(())
    }

    fn new_configuration(&self, canonical: &str) -> ConfigResult<Self::Configuration> {
        Ok(self.configuration(self.converter.from_canonical_string(canonical)?))
    }
}

pub fn migration(codec: Arc<JsonCodec>) -> BatchJobHandler<MigrationBatchConfigurationConverter> {
    BatchJobHandler::new(
        handler_types::MIGRATION,
        MigrationBatchConfigurationConverter::new(codec),
        EngineCommand::MigrateProcessInstances,
    )
}

pub fn modification(
    codec: Arc<JsonCodec>,
) -> BatchJobHandler<ModificationBatchConfigurationConverter> {
    BatchJobHandler::new(
        handler_types::MODIFICATION,
        ModificationBatchConfigurationConverter::new(codec),
        EngineCommand::ModifyProcessInstances,
    )
}

pub fn restart(codec: Arc<JsonCodec>) -> BatchJobHandler<RestartProcessInstancesConverter> {
    BatchJobHandler::new(
        handler_types::RESTART,
        RestartProcessInstancesConverter::new(codec),
        EngineCommand::RestartProcessInstances,
    )
}

pub fn set_job_retries(
    codec: Arc<JsonCodec>,
) -> BatchJobHandler<SetRetriesBatchConfigurationConverter> {
    BatchJobHandler::new(
        handler_types::SET_JOB_RETRIES,
        SetRetriesBatchConfigurationConverter::for_jobs(codec),
        EngineCommand::SetJobRetries,
    )
}

pub fn set_external_task_retries(
    codec: Arc<JsonCodec>,
) -> BatchJobHandler<SetRetriesBatchConfigurationConverter> {
    BatchJobHandler::new(
        handler_types::SET_EXTERNAL_TASK_RETRIES,
        SetRetriesBatchConfigurationConverter::for_external_tasks(codec),
        EngineCommand::SetExternalTaskRetries,
    )
}

pub fn delete_historic_decision_instances(
    codec: Arc<JsonCodec>,
) -> BatchJobHandler<DeleteHistoricDecisionInstancesConverter> {
    BatchJobHandler::new(
        handler_types::DELETE_HISTORIC_DECISION_INSTANCES,
        DeleteHistoricDecisionInstancesConverter::new(codec),
        EngineCommand::DeleteHistoricDecisionInstances,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingCommandContext;
    use jobcfg_batch::{
        MigrationBatchConfiguration, ModificationInstruction, ModificationBatchConfiguration,
        SetRetriesBatchConfiguration,
    };
    use jobcfg_core::ConfigError;
    use jobcfg_migration::MigrationPlan;

    fn codec() -> Arc<JsonCodec> {
        Arc::new(JsonCodec::default())
    }

    #[test]
    fn retries_handlers_use_their_own_id_field() {
        let config = SetRetriesBatchConfiguration::new(vec!["a".into(), "b".into()], 5);

        let jobs = set_job_retries(codec());
        let tasks = set_external_task_retries(codec());
        assert!(jobs.write_configuration(&config).contains("\"jobIds\""));
        assert!(tasks.write_configuration(&config).contains("\"externalTaskIds\""));

        let err = jobs
            .new_configuration(&tasks.write_configuration(&config))
            .unwrap_err();
        assert_eq!(err, ConfigError::missing("jobIds"));
    }

    #[test]
    fn migration_chunk_is_submitted_whole() {
        let handler = migration(codec());
        let plan = MigrationPlan::builder("invoice:1", "invoice:2")
            .map_equal_activities(["approve"])
            .build();
        let config = MigrationBatchConfiguration::new(vec!["pi-2".into(), "pi-1".into()], plan)
            .skip_io_mappings(true);

        let parsed = handler
            .new_configuration(&handler.write_configuration(&config))
            .unwrap();
        let mut ctx = RecordingCommandContext::new();
        handler.execute(&parsed, None, &mut ctx, None).unwrap();

        assert_eq!(ctx.commands(), [EngineCommand::MigrateProcessInstances(config)]);
    }

    #[test]
    fn modification_with_unrecognized_instruction_fails_to_parse() {
        let handler = modification(codec());
        let config = ModificationBatchConfiguration::new(
            vec!["pi-1".into()],
            "invoice:1",
            vec![ModificationInstruction::start_before("approve")],
        );
        let canonical = handler
            .write_configuration(&config)
            .replace("startBeforeActivity", "startSomewhere");

        assert!(matches!(
            handler.new_configuration(&canonical),
            Err(ConfigError::UnrecognizedInstruction(_))
        ));
    }

    #[test]
    fn parsed_chunk_writes_the_same_canonical_string() {
        let codec = codec();
        let config = SetRetriesBatchConfiguration::new(vec!["t-2".into(), "t-1".into()], 0);

        let tasks = set_external_task_retries(codec.clone());
        let canonical = tasks.write_configuration(&config);
        let parsed = tasks.new_configuration(&canonical).unwrap();
        assert_eq!(parsed.configuration(), &config);
        assert_eq!(parsed.to_canonical_string(&codec), canonical);

        let jobs = set_job_retries(codec.clone());
        let canonical = jobs.configuration(config.clone()).to_canonical_string(&codec);
        assert_eq!(canonical, jobs.write_configuration(&config));
        assert_eq!(jobs.new_configuration(&canonical).unwrap().into_inner(), config);
    }

    #[test]
    fn handler_types() {
        assert_eq!(migration(codec()).handler_type(), "instance-migration");
        assert_eq!(modification(codec()).handler_type(), "instance-modification");
        assert_eq!(restart(codec()).handler_type(), "instance-restart");
        assert_eq!(
            delete_historic_decision_instances(codec()).handler_type(),
            "historic-decision-instance-deletion"
        );
    }
}
