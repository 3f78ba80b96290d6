//! Handler lookup by job type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use jobcfg_core::JsonCodec;

use crate::batch;
use crate::command::CommandContext;
use crate::config::JobHandlersConfig;
use crate::error::JobError;
use crate::handler::{JobHandler, JobRecord};
use crate::history_cleanup::HistoryCleanupJobHandler;
use crate::suspension::{JobDefinitionSuspensionStateHandler, ProcessDefinitionSuspensionStateHandler};

/// Object-safe view of a [`JobHandler`]: works on the canonical string.
trait DynJobHandler: Send + Sync {
    fn execute_job(&self, job: &JobRecord, context: &mut dyn CommandContext) -> Result<(), JobError>;

    fn delete_job(&self, job: &JobRecord) -> Result<(), JobError>;
}

impl<H: JobHandler> DynJobHandler for H {
    fn execute_job(&self, job: &JobRecord, context: &mut dyn CommandContext) -> Result<(), JobError> {
        let configuration = self.new_configuration(&job.configuration)?;
        self.execute(
            &configuration,
            job.execution.as_ref(),
            context,
            job.tenant_id.as_deref(),
        )
    }

    fn delete_job(&self, job: &JobRecord) -> Result<(), JobError> {
        let configuration = self.new_configuration(&job.configuration)?;
        self.on_delete(&configuration, job);
        Ok(())
    }
}

/// Routes persisted jobs to their handlers.
///
/// Holds no per-job state; the configuration is parsed again on every call,
/// so a retried or resumed job always sees exactly what was persisted.
pub struct JobHandlerRegistry {
    codec: Arc<JsonCodec>,
    handlers: HashMap<String, Box<dyn DynJobHandler>>,
}

impl JobHandlerRegistry {
    /// An empty registry sharing `codec` with the handlers registered later.
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            codec,
            handlers: HashMap::new(),
        }
    }

    /// The standard handler set.
    pub fn from_config(config: &JobHandlersConfig) -> Self {
        let codec = Arc::new(JsonCodec::new(config.codec));
        let mut registry = Self::new(codec.clone());

        registry.register(JobDefinitionSuspensionStateHandler::activate(codec.clone()));
        registry.register(JobDefinitionSuspensionStateHandler::suspend(codec.clone()));
        registry.register(ProcessDefinitionSuspensionStateHandler::activate(codec.clone()));
        registry.register(ProcessDefinitionSuspensionStateHandler::suspend(codec.clone()));

        if config.history_cleanup {
            registry.register(HistoryCleanupJobHandler::new(codec.clone()));
        }

        if config.batch_handlers {
            registry.register(batch::migration(codec.clone()));
            registry.register(batch::modification(codec.clone()));
            registry.register(batch::restart(codec.clone()));
            registry.register(batch::set_job_retries(codec.clone()));
            registry.register(batch::set_external_task_retries(codec.clone()));
            registry.register(batch::delete_historic_decision_instances(codec));
        }

        registry
    }

    pub fn codec(&self) -> &Arc<JsonCodec> {
        &self.codec
    }

    /// Register a handler under its type, replacing any previous one.
    pub fn register<H: JobHandler + 'static>(&mut self, handler: H) {
        let handler_type = handler.handler_type().to_string();
        if self.handlers.insert(handler_type.clone(), Box::new(handler)).is_some() {
            debug!(handler_type = %handler_type, "replaced job handler");
        }
    }

    pub fn contains(&self, handler_type: &str) -> bool {
        self.handlers.contains_key(handler_type)
    }

    /// Registered handler types, sorted.
    pub fn handler_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    fn handler(&self, job: &JobRecord) -> Result<&dyn DynJobHandler, JobError> {
        self.handlers
            .get(&job.handler_type)
            .map(Box::as_ref)
            .ok_or_else(|| JobError::UnknownHandler(job.handler_type.clone()))
    }

    /// Run one attempt of `job`.
    pub fn execute(&self, job: &JobRecord, context: &mut dyn CommandContext) -> Result<(), JobError> {
        debug!(job_id = %job.id, handler_type = %job.handler_type, "executing job");
        let result = self.handler(job).and_then(|h| h.execute_job(job, context));
        if let Err(error) = &result {
            warn!(job_id = %job.id, handler_type = %job.handler_type, %error, "job failed");
        }
        result
    }

    /// Notify the handler that `job` is being deleted.
    pub fn delete(&self, job: &JobRecord) -> Result<(), JobError> {
        debug!(job_id = %job.id, handler_type = %job.handler_type, "deleting job");
        let result = self.handler(job).and_then(|h| h.delete_job(job));
        if let Err(error) = &result {
            warn!(job_id = %job.id, handler_type = %job.handler_type, %error, "job deletion failed");
        }
        result
    }
}

impl std::fmt::Debug for JobHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandlerRegistry")
            .field("codec", &self.codec)
            .field("handlers", &self.handler_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{EngineCommand, RecordingCommandContext};
    use crate::handler::{ExecutionHandle, JobHandlerConfiguration};
    use crate::handler_types;
    use crate::history_cleanup::HistoryCleanupJobHandlerConfiguration;
    use jobcfg_core::{ConfigError, ConfigResult};
    use std::sync::Mutex;

    #[test]
    fn standard_set() {
        let registry = JobHandlerRegistry::from_config(&JobHandlersConfig::default());
        assert_eq!(registry.handler_types().len(), 11);
        assert!(registry.contains(handler_types::SUSPEND_PROCESS_DEFINITION));
        assert!(registry.contains(handler_types::SET_EXTERNAL_TASK_RETRIES));

        let trimmed = JobHandlerRegistry::from_config(
            &JobHandlersConfig::default()
                .with_history_cleanup(false)
                .with_batch_handlers(false),
        );
        assert_eq!(
            trimmed.handler_types(),
            [
                "activate-job-definition",
                "activate-processdefinition",
                "suspend-job-definition",
                "suspend-processdefinition",
            ]
        );
    }

    #[test]
    fn unknown_type_is_reported() {
        let registry = JobHandlerRegistry::from_config(&JobHandlersConfig::default());
        let job = JobRecord::new("timer-intermediate-transition", "{}");
        let mut ctx = RecordingCommandContext::new();
        assert_eq!(
            registry.execute(&job, &mut ctx),
            Err(JobError::UnknownHandler("timer-intermediate-transition".into()))
        );
        assert_eq!(
            registry.delete(&job),
            Err(JobError::UnknownHandler("timer-intermediate-transition".into()))
        );
    }

    #[test]
    fn corrupted_configuration_fails_before_any_command() {
        let registry = JobHandlerRegistry::from_config(&JobHandlersConfig::default());
        let job = JobRecord::new(handler_types::HISTORY_CLEANUP, "{\"minuteFrom\":");
        let mut ctx = RecordingCommandContext::new();
        let err = registry.execute(&job, &mut ctx).unwrap_err();
        assert!(matches!(err, JobError::Configuration(ref e) if e.is_malformed()));
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn execute_parses_persisted_string() {
        let registry = JobHandlerRegistry::from_config(&JobHandlersConfig::default());
        let config = HistoryCleanupJobHandlerConfiguration::new().with_immediately_due(true);
        let job = JobRecord::new(
            handler_types::HISTORY_CLEANUP,
            config.to_canonical_string(registry.codec()),
        );

        let mut ctx = RecordingCommandContext::new();
        registry.execute(&job, &mut ctx).unwrap();
        assert!(matches!(
            ctx.commands(),
            [EngineCommand::HistoryCleanup(cmd)] if cmd.immediately_due
        ));
    }

    /// Persisted as lowercase, handled as uppercase.
    #[derive(Debug, Clone, PartialEq)]
    struct Shouted(String);

    impl JobHandlerConfiguration for Shouted {
        fn to_canonical_string(&self, _codec: &JsonCodec) -> String {
            self.0.to_lowercase()
        }
    }

    /// Records what it receives so dispatch details can be asserted.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, Option<String>, Option<String>)>>,
        deleted: Mutex<Vec<String>>,
    }

    impl JobHandler for Recorder {
        type Configuration = Shouted;

        fn handler_type(&self) -> &str {
            "recorder"
        }

        fn execute(
            &self,
            configuration: &Shouted,
            execution: Option<&ExecutionHandle>,
            _context: &mut dyn CommandContext,
            tenant_id: Option<&str>,
        ) -> Result<(), JobError> {
            self.seen.lock().unwrap().push((
                configuration.0.clone(),
                execution.map(|e| e.id().to_string()),
                tenant_id.map(str::to_string),
            ));
            Ok(())
        }

        fn new_configuration(&self, canonical: &str) -> ConfigResult<Shouted> {
            if canonical.is_empty() {
                return Err(ConfigError::syntax("empty"));
            }
            Ok(Shouted(canonical.to_uppercase()))
        }

        fn on_delete(&self, configuration: &Shouted, _job: &JobRecord) {
            self.deleted.lock().unwrap().push(configuration.0.clone());
        }
    }

    #[test]
    fn passes_execution_and_tenant_through() {
        let recorder = Arc::new(Recorder::default());
        let mut registry = JobHandlerRegistry::new(Arc::new(JsonCodec::default()));
        registry.register(SharedRecorder(recorder.clone()));

        let job = JobRecord::new("recorder", "abc")
            .with_tenant("tenant-a")
            .with_execution(ExecutionHandle::new("exec-7"));
        registry.execute(&job, &mut RecordingCommandContext::new()).unwrap();
        registry.delete(&job).unwrap();

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            [("ABC".to_string(), Some("exec-7".to_string()), Some("tenant-a".to_string()))]
        );
        assert_eq!(*recorder.deleted.lock().unwrap(), ["ABC"]);
    }

    #[test]
    fn parsed_configuration_writes_back_its_canonical_form() {
        let recorder = Recorder::default();
        let parsed = recorder.new_configuration("abc").unwrap();
        assert_eq!(parsed, Shouted("ABC".into()));
        assert_eq!(parsed.to_canonical_string(&JsonCodec::default()), "abc");
    }

    struct SharedRecorder(Arc<Recorder>);

    impl JobHandler for SharedRecorder {
        type Configuration = Shouted;

        fn handler_type(&self) -> &str {
            self.0.handler_type()
        }

        fn execute(
            &self,
            configuration: &Shouted,
            execution: Option<&ExecutionHandle>,
            context: &mut dyn CommandContext,
            tenant_id: Option<&str>,
        ) -> Result<(), JobError> {
            self.0.execute(configuration, execution, context, tenant_id)
        }

        fn new_configuration(&self, canonical: &str) -> ConfigResult<Shouted> {
            self.0.new_configuration(canonical)
        }

        fn on_delete(&self, configuration: &Shouted, job: &JobRecord) {
            self.0.on_delete(configuration, job)
        }
    }
}
