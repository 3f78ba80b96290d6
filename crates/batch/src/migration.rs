//! Process-instance migration batches.

use std::sync::Arc;

use jobcfg_core::json::{add_default_bool, add_list_field, add_object_field, bool_or, get_object, get_string_list};
use jobcfg_core::{ConfigResult, JsonCodec, JsonObject, JsonObjectConverter};
use jobcfg_migration::{MigrationPlan, MigrationPlanConverter};

use crate::BatchIds;

pub const MIGRATION_PLAN: &str = "migrationPlan";
pub const PROCESS_INSTANCE_IDS: &str = "processInstanceIds";
pub const SKIP_LISTENERS: &str = "skipListeners";
pub const SKIP_IO_MAPPINGS: &str = "skipIoMappings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBatchConfiguration {
    pub ids: Vec<String>,
    pub migration_plan: MigrationPlan,
    pub skip_custom_listeners: bool,
    pub skip_io_mappings: bool,
}

impl MigrationBatchConfiguration {
    pub fn new(ids: Vec<String>, migration_plan: MigrationPlan) -> Self {
        Self {
            ids,
            migration_plan,
            skip_custom_listeners: false,
            skip_io_mappings: false,
        }
    }

    pub fn skip_custom_listeners(mut self, skip: bool) -> Self {
        self.skip_custom_listeners = skip;
        self
    }

    pub fn skip_io_mappings(mut self, skip: bool) -> Self {
        self.skip_io_mappings = skip;
        self
    }
}

impl BatchIds for MigrationBatchConfiguration {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[derive(Debug, Clone)]
pub struct MigrationBatchConfigurationConverter {
    codec: Arc<JsonCodec>,
    plan: MigrationPlanConverter,
}

impl MigrationBatchConfigurationConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            plan: MigrationPlanConverter::new(codec.clone()),
            codec,
        }
    }
}

impl JsonObjectConverter for MigrationBatchConfigurationConverter {
    type Target = MigrationBatchConfiguration;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, configuration: &MigrationBatchConfiguration) -> JsonObject {
        let mut json = self.codec.create_object();
        add_object_field(&mut json, MIGRATION_PLAN, self.plan.to_json_object(&configuration.migration_plan));
        add_list_field(&mut json, PROCESS_INSTANCE_IDS, &configuration.ids);
        add_default_bool(&mut json, SKIP_LISTENERS, false, configuration.skip_custom_listeners);
        add_default_bool(&mut json, SKIP_IO_MAPPINGS, false, configuration.skip_io_mappings);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<MigrationBatchConfiguration> {
        Ok(MigrationBatchConfiguration {
            ids: get_string_list(json, PROCESS_INSTANCE_IDS)?,
            migration_plan: self.plan.to_object(get_object(json, MIGRATION_PLAN)?)?,
            skip_custom_listeners: bool_or(json, SKIP_LISTENERS, false)?,
            skip_io_mappings: bool_or(json, SKIP_IO_MAPPINGS, false)?,
        })
    }
}
