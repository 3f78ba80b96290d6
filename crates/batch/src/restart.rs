//! Process-instance restart batches.

use std::sync::Arc;

use jobcfg_core::json::{
    add_array_field, add_default_bool, add_list_field, add_string, bool_or, get_array, get_str,
    get_string_list,
};
use jobcfg_core::{
    ConfigResult, JsonArrayOfObjectsConverter, JsonCodec, JsonObject, JsonObjectConverter,
};

use crate::BatchIds;
use crate::instruction::{ModificationInstruction, ModificationInstructionConverter};

pub const PROCESS_INSTANCE_IDS: &str = "processInstanceIds";
pub const INSTRUCTIONS: &str = "instructions";
pub const PROCESS_DEFINITION_ID: &str = "processDefinitionId";
pub const INITIAL_VARIABLES: &str = "initialVariables";
pub const SKIP_CUSTOM_LISTENERS: &str = "skipCustomListeners";
pub const SKIP_IO_MAPPINGS: &str = "skipIoMappings";
pub const WITHOUT_BUSINESS_KEY: &str = "withoutBusinessKey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartProcessInstancesBatchConfiguration {
    pub ids: Vec<String>,
    pub instructions: Vec<ModificationInstruction>,
    pub process_definition_id: String,
    /// Restart with the variables the instance was started with, not the last ones.
    pub initial_variables: bool,
    pub skip_custom_listeners: bool,
    pub skip_io_mappings: bool,
    pub without_business_key: bool,
}

impl RestartProcessInstancesBatchConfiguration {
    pub fn new(
        ids: Vec<String>,
        instructions: Vec<ModificationInstruction>,
        process_definition_id: impl Into<String>,
    ) -> Self {
        Self {
            ids,
            instructions,
            process_definition_id: process_definition_id.into(),
            initial_variables: false,
            skip_custom_listeners: false,
            skip_io_mappings: false,
            without_business_key: false,
        }
    }

    pub fn initial_variables(mut self, value: bool) -> Self {
        self.initial_variables = value;
        self
    }

    pub fn skip_custom_listeners(mut self, value: bool) -> Self {
        self.skip_custom_listeners = value;
        self
    }

    pub fn skip_io_mappings(mut self, value: bool) -> Self {
        self.skip_io_mappings = value;
        self
    }

    pub fn without_business_key(mut self, value: bool) -> Self {
        self.without_business_key = value;
        self
    }
}

impl BatchIds for RestartProcessInstancesBatchConfiguration {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[derive(Debug, Clone)]
pub struct RestartProcessInstancesConverter {
    codec: Arc<JsonCodec>,
    instructions: JsonArrayOfObjectsConverter<ModificationInstructionConverter>,
}

impl RestartProcessInstancesConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            instructions: JsonArrayOfObjectsConverter::new(ModificationInstructionConverter::new(
                codec.clone(),
            )),
            codec,
        }
    }
}

impl JsonObjectConverter for RestartProcessInstancesConverter {
    type Target = RestartProcessInstancesBatchConfiguration;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, configuration: &RestartProcessInstancesBatchConfiguration) -> JsonObject {
        let mut json = self.codec.create_object();
        add_list_field(&mut json, PROCESS_INSTANCE_IDS, &configuration.ids);
        add_string(&mut json, PROCESS_DEFINITION_ID, &configuration.process_definition_id);
        add_array_field(
            &mut json,
            INSTRUCTIONS,
            self.instructions.to_json_array(&configuration.instructions),
        );
        add_default_bool(&mut json, INITIAL_VARIABLES, false, configuration.initial_variables);
        add_default_bool(&mut json, SKIP_CUSTOM_LISTENERS, false, configuration.skip_custom_listeners);
        add_default_bool(&mut json, SKIP_IO_MAPPINGS, false, configuration.skip_io_mappings);
        add_default_bool(&mut json, WITHOUT_BUSINESS_KEY, false, configuration.without_business_key);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<RestartProcessInstancesBatchConfiguration> {
        Ok(RestartProcessInstancesBatchConfiguration {
            ids: get_string_list(json, PROCESS_INSTANCE_IDS)?,
            instructions: self
                .instructions
                .to_objects(INSTRUCTIONS, get_array(json, INSTRUCTIONS)?)?,
            process_definition_id: get_str(json, PROCESS_DEFINITION_ID)?.to_string(),
            initial_variables: bool_or(json, INITIAL_VARIABLES, false)?,
            skip_custom_listeners: bool_or(json, SKIP_CUSTOM_LISTENERS, false)?,
            skip_io_mappings: bool_or(json, SKIP_IO_MAPPINGS, false)?,
            without_business_key: bool_or(json, WITHOUT_BUSINESS_KEY, false)?,
        })
    }
}
