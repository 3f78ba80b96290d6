//! Handler registry configuration.

use jobcfg_core::CodecOptions;

/// Which handlers a registry starts with, and how the codec writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandlersConfig {
    pub codec: CodecOptions,
    /// Register the history cleanup handler.
    pub history_cleanup: bool,
    /// Register the batch operation handlers.
    pub batch_handlers: bool,
}

impl Default for JobHandlersConfig {
    fn default() -> Self {
        Self {
            codec: CodecOptions::default(),
            history_cleanup: true,
            batch_handlers: true,
        }
    }
}

impl JobHandlersConfig {
    /// Read `JOBCFG_PRETTY_JSON`, `JOBCFG_HISTORY_CLEANUP` and
    /// `JOBCFG_BATCH_HANDLERS`; unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            codec: CodecOptions {
                pretty: env_flag("JOBCFG_PRETTY_JSON", defaults.codec.pretty),
            },
            history_cleanup: env_flag("JOBCFG_HISTORY_CLEANUP", defaults.history_cleanup),
            batch_handlers: env_flag("JOBCFG_BATCH_HANDLERS", defaults.batch_handlers),
        }
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.codec.pretty = pretty;
        self
    }

    pub fn with_history_cleanup(mut self, enabled: bool) -> Self {
        self.history_cleanup = enabled;
        self
    }

    pub fn with_batch_handlers(mut self, enabled: bool) -> Self {
        self.batch_handlers = enabled;
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(default)
}
