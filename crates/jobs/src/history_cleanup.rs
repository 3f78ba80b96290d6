//! History cleanup scheduling state.
//!
//! The cleanup job reschedules itself. Each run that finds nothing to delete
//! bumps `count_empty_runs`, doubling the delay to the next run until it
//! reaches [`MAX_DELAY`]. Whether a run falls inside the minute window and
//! when the counter is reset is decided by the scheduler, not here.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use jobcfg_core::json::{add_bool, add_u32, bool_or, get_u32, opt_u32};
use jobcfg_core::{ConfigError, ConfigResult, JsonCodec, JsonObject};

use crate::command::{CommandContext, EngineCommand, HistoryCleanupCmd};
use crate::error::JobError;
use crate::handler::{ExecutionHandle, JobHandler, JobHandlerConfiguration};
use crate::handler_types;

pub const START_DELAY: Duration = Duration::from_secs(10);
pub const MAX_DELAY: Duration = Duration::from_secs(60 * 60);

pub const COUNT_EMPTY_RUNS: &str = "countEmptyRuns";
pub const IMMEDIATELY_DUE: &str = "immediatelyDue";
pub const MINUTE_FROM: &str = "minuteFrom";
pub const MINUTE_TO: &str = "minuteTo";

const LAST_MINUTE: u32 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCleanupJobHandlerConfiguration {
    count_empty_runs: u32,
    /// Triggered manually; run now regardless of the batch window.
    immediately_due: bool,
    minute_from: u32,
    minute_to: u32,
}

impl Default for HistoryCleanupJobHandlerConfiguration {
    fn default() -> Self {
        Self {
            count_empty_runs: 0,
            immediately_due: false,
            minute_from: 0,
            minute_to: LAST_MINUTE,
        }
    }
}

impl HistoryCleanupJobHandlerConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict runs to minutes `from..=to`; both must be within `0..=59`.
    pub fn with_minute_window(mut self, from: u32, to: u32) -> ConfigResult<Self> {
        self.minute_from = check_minute(MINUTE_FROM, from)?;
        self.minute_to = check_minute(MINUTE_TO, to)?;
        Ok(self)
    }

    pub fn with_immediately_due(mut self, immediately_due: bool) -> Self {
        self.immediately_due = immediately_due;
        self
    }

    pub fn with_count_empty_runs(mut self, count: u32) -> Self {
        self.count_empty_runs = count;
        self
    }

    pub fn count_empty_runs(&self) -> u32 {
        self.count_empty_runs
    }

    pub fn immediately_due(&self) -> bool {
        self.immediately_due
    }

    pub fn minute_from(&self) -> u32 {
        self.minute_from
    }

    pub fn minute_to(&self) -> u32 {
        self.minute_to
    }

    /// `min(START_DELAY * 2^count_empty_runs, MAX_DELAY)`.
    pub fn delay(&self) -> Duration {
        let factor = 1u64.checked_shl(self.count_empty_runs).unwrap_or(u64::MAX);
        let secs = START_DELAY.as_secs().saturating_mul(factor);
        Duration::from_secs(secs).min(MAX_DELAY)
    }

    /// `now + delay()`, saturating at the latest representable instant.
    pub fn next_run_with_delay(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.delay())
            .ok()
            .and_then(|delay| now.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn to_json_object(&self, codec: &JsonCodec) -> JsonObject {
        let mut json = codec.create_object();
        add_u32(&mut json, COUNT_EMPTY_RUNS, self.count_empty_runs);
        add_bool(&mut json, IMMEDIATELY_DUE, self.immediately_due);
        add_u32(&mut json, MINUTE_FROM, self.minute_from);
        add_u32(&mut json, MINUTE_TO, self.minute_to);
        json
    }

    /// Counter and flag are optional for payloads written by older versions;
    /// the window is required.
    pub fn from_json(json: &JsonObject) -> ConfigResult<Self> {
        Ok(Self {
            count_empty_runs: opt_u32(json, COUNT_EMPTY_RUNS)?.unwrap_or(0),
            immediately_due: bool_or(json, IMMEDIATELY_DUE, false)?,
            minute_from: check_minute(MINUTE_FROM, get_u32(json, MINUTE_FROM)?)?,
            minute_to: check_minute(MINUTE_TO, get_u32(json, MINUTE_TO)?)?,
        })
    }
}

fn check_minute(field: &str, minute: u32) -> ConfigResult<u32> {
    if minute > LAST_MINUTE {
        return Err(ConfigError::invalid_value(field, minute.to_string()));
    }
    Ok(minute)
}

impl JobHandlerConfiguration for HistoryCleanupJobHandlerConfiguration {
    fn to_canonical_string(&self, codec: &JsonCodec) -> String {
        codec.write_string(self.to_json_object(codec))
    }
}

impl From<&HistoryCleanupJobHandlerConfiguration> for HistoryCleanupCmd {
    fn from(config: &HistoryCleanupJobHandlerConfiguration) -> Self {
        Self {
            immediately_due: config.immediately_due,
            minute_from: config.minute_from,
            minute_to: config.minute_to,
            count_empty_runs: config.count_empty_runs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryCleanupJobHandler {
    codec: Arc<JsonCodec>,
}

impl HistoryCleanupJobHandler {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

impl JobHandler for HistoryCleanupJobHandler {
    type Configuration = HistoryCleanupJobHandlerConfiguration;

    fn handler_type(&self) -> &str {
        handler_types::HISTORY_CLEANUP
    }

    fn execute(
        &self,
        configuration: &Self::Configuration,
        _execution: Option<&ExecutionHandle>,
        context: &mut dyn CommandContext,
        _tenant_id: Option<&str>,
    ) -> Result<(), JobError> {
        debug!(
            count_empty_runs = configuration.count_empty_runs,
            immediately_due = configuration.immediately_due,
            "running history cleanup"
        );
        context.execute(EngineCommand::HistoryCleanup(configuration.into()))?;
        Ok(())
    }

    fn new_configuration(&self, canonical: &str) -> ConfigResult<Self::Configuration> {
        Self::Configuration::from_json(&self.codec.parse_object(canonical)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordingCommandContext;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn codec() -> Arc<JsonCodec> {
        Arc::new(JsonCodec::default())
    }

    fn with_runs(count: u32) -> HistoryCleanupJobHandlerConfiguration {
        HistoryCleanupJobHandlerConfiguration::new().with_count_empty_runs(count)
    }

    #[test]
    fn delay_doubles_until_capped() {
        assert_eq!(with_runs(0).delay(), Duration::from_secs(10));
        assert_eq!(with_runs(3).delay(), Duration::from_secs(80));
        assert_eq!(with_runs(8).delay(), Duration::from_secs(2560));
        assert_eq!(with_runs(9).delay(), MAX_DELAY);
        assert_eq!(with_runs(10).delay(), MAX_DELAY);
        assert_eq!(with_runs(u32::MAX).delay(), MAX_DELAY);
    }

    #[test]
    fn next_run_adds_delay() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            with_runs(3).next_run_with_delay(now),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 1, 20).unwrap()
        );
    }

    #[test]
    fn next_run_saturates_near_the_end_of_time() {
        let late = DateTime::<Utc>::MAX_UTC - chrono::Duration::seconds(5);
        assert_eq!(with_runs(0).next_run_with_delay(late), DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            with_runs(10).next_run_with_delay(DateTime::<Utc>::MAX_UTC),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[test]
    fn always_writes_all_fields() {
        let config = HistoryCleanupJobHandlerConfiguration::new();
        assert_eq!(
            Value::Object(config.to_json_object(&codec())),
            json!({"countEmptyRuns": 0, "immediatelyDue": false, "minuteFrom": 0, "minuteTo": 59})
        );
    }

    #[test]
    fn older_payloads_without_counter_are_read() {
        let handler = HistoryCleanupJobHandler::new(codec());
        let config = handler.new_configuration(r#"{"minuteFrom":5,"minuteTo":30}"#).unwrap();
        assert_eq!(config.count_empty_runs(), 0);
        assert!(!config.immediately_due());
        assert_eq!((config.minute_from(), config.minute_to()), (5, 30));
    }

    #[test]
    fn window_is_required_and_bounded() {
        let handler = HistoryCleanupJobHandler::new(codec());
        assert_eq!(
            handler.new_configuration(r#"{"minuteFrom":0}"#),
            Err(ConfigError::missing(MINUTE_TO))
        );
        assert_eq!(
            handler.new_configuration(r#"{"minuteFrom":0,"minuteTo":60}"#),
            Err(ConfigError::invalid_value(MINUTE_TO, "60"))
        );
        assert!(HistoryCleanupJobHandlerConfiguration::new().with_minute_window(61, 0).is_err());
    }

    #[test]
    fn execute_submits_cleanup_run() {
        let handler = HistoryCleanupJobHandler::new(codec());
        let config = HistoryCleanupJobHandlerConfiguration::new()
            .with_minute_window(10, 20)
            .unwrap()
            .with_immediately_due(true);

        let mut ctx = RecordingCommandContext::new();
        handler.execute(&config, None, &mut ctx, None).unwrap();
        assert_eq!(
            ctx.commands(),
            [EngineCommand::HistoryCleanup(HistoryCleanupCmd {
                immediately_due: true,
                minute_from: 10,
                minute_to: 20,
                count_empty_runs: 0,
            })]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn delay_is_bounded(count in any::<u32>()) {
            let delay = with_runs(count).delay();
            prop_assert!(delay >= START_DELAY);
            prop_assert!(delay <= MAX_DELAY);
        }

        #[test]
        fn canonical_string_round_trips(
            count in 0u32..64,
            due in any::<bool>(),
            from in 0u32..60,
            to in 0u32..60,
        ) {
            let handler = HistoryCleanupJobHandler::new(codec());
            let config = HistoryCleanupJobHandlerConfiguration::new()
                .with_count_empty_runs(count)
                .with_immediately_due(due)
                .with_minute_window(from, to)
                .unwrap();
            let parsed = handler.new_configuration(&config.to_canonical_string(&codec())).unwrap();
            prop_assert_eq!(parsed, config);
        }
    }
}
