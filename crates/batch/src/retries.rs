//! Set-retries batches, shared by job retries and external task retries.

use std::sync::Arc;

use jobcfg_core::json::{add_i32, add_list_field, get_i32, get_string_list};
use jobcfg_core::{ConfigResult, JsonCodec, JsonObject, JsonObjectConverter};

use crate::BatchIds;

pub const JOB_IDS: &str = "jobIds";
pub const EXTERNAL_TASK_IDS: &str = "externalTaskIds";
pub const RETRIES: &str = "retries";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRetriesBatchConfiguration {
    pub ids: Vec<String>,
    pub retries: i32,
}

impl SetRetriesBatchConfiguration {
    pub fn new(ids: Vec<String>, retries: i32) -> Self {
        Self { ids, retries }
    }
}

impl BatchIds for SetRetriesBatchConfiguration {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// One converter type; the id field name depends on what the retries are set for.
#[derive(Debug, Clone)]
pub struct SetRetriesBatchConfigurationConverter {
    codec: Arc<JsonCodec>,
    ids_field: &'static str,
}

impl SetRetriesBatchConfigurationConverter {
    pub fn for_jobs(codec: Arc<JsonCodec>) -> Self {
        Self {
            codec,
            ids_field: JOB_IDS,
        }
    }

    pub fn for_external_tasks(codec: Arc<JsonCodec>) -> Self {
        Self {
            codec,
            ids_field: EXTERNAL_TASK_IDS,
        }
    }

    pub fn ids_field(&self) -> &'static str {
        self.ids_field
    }
}

impl JsonObjectConverter for SetRetriesBatchConfigurationConverter {
    type Target = SetRetriesBatchConfiguration;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, configuration: &SetRetriesBatchConfiguration) -> JsonObject {
        let mut json = self.codec.create_object();
        add_list_field(&mut json, self.ids_field, &configuration.ids);
        add_i32(&mut json, RETRIES, configuration.retries);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<SetRetriesBatchConfiguration> {
        Ok(SetRetriesBatchConfiguration::new(
            get_string_list(json, self.ids_field)?,
            get_i32(json, RETRIES)?,
        ))
    }
}
