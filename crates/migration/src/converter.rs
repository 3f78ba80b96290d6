//! Wire converters for migration plans.
//!
//! Instructions are written with single-element `sourceActivityIds` /
//! `targetActivityIds` arrays. The array shape leaves room for many-to-many
//! mappings; readers consult index 0 only.

use std::sync::Arc;

use jobcfg_core::json::{
    add_array_field, add_default_bool, add_list_field, add_string, bool_or, get_array, get_str,
};
use jobcfg_core::{ConfigError, ConfigResult, JsonArrayOfObjectsConverter, JsonCodec, JsonObject, JsonObjectConverter};

use crate::plan::{MigrationInstruction, MigrationPlan};

pub const SOURCE_ACTIVITY_IDS: &str = "sourceActivityIds";
pub const TARGET_ACTIVITY_IDS: &str = "targetActivityIds";
pub const UPDATE_EVENT_TRIGGER: &str = "updateEventTrigger";

pub const SOURCE_PROCESS_DEFINITION_ID: &str = "sourceProcessDefinitionId";
pub const TARGET_PROCESS_DEFINITION_ID: &str = "targetProcessDefinitionId";
pub const INSTRUCTIONS: &str = "instructions";

#[derive(Debug, Clone)]
pub struct MigrationInstructionConverter {
    codec: Arc<JsonCodec>,
}

impl MigrationInstructionConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

fn first_activity_id(json: &JsonObject, field: &str) -> ConfigResult<String> {
    let ids = get_array(json, field)?;
    let first = ids
        .first()
        .ok_or_else(|| ConfigError::invalid_value(field, "[]"))?;
    first
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::invalid_type(format!("{field}[0]"), "a string"))
}

impl JsonObjectConverter for MigrationInstructionConverter {
    type Target = MigrationInstruction;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, instruction: &MigrationInstruction) -> JsonObject {
        let mut json = self.codec.create_object();
        add_list_field(&mut json, SOURCE_ACTIVITY_IDS, std::slice::from_ref(&instruction.source_activity_id));
        add_list_field(&mut json, TARGET_ACTIVITY_IDS, std::slice::from_ref(&instruction.target_activity_id));
        add_default_bool(&mut json, UPDATE_EVENT_TRIGGER, false, instruction.update_event_trigger);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<MigrationInstruction> {
        Ok(MigrationInstruction {
            source_activity_id: first_activity_id(json, SOURCE_ACTIVITY_IDS)?,
            target_activity_id: first_activity_id(json, TARGET_ACTIVITY_IDS)?,
            update_event_trigger: bool_or(json, UPDATE_EVENT_TRIGGER, false)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MigrationPlanConverter {
    codec: Arc<JsonCodec>,
    instructions: JsonArrayOfObjectsConverter<MigrationInstructionConverter>,
}

impl MigrationPlanConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            instructions: JsonArrayOfObjectsConverter::new(MigrationInstructionConverter::new(
                codec.clone(),
            )),
            codec,
        }
    }
}

impl JsonObjectConverter for MigrationPlanConverter {
    type Target = MigrationPlan;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, plan: &MigrationPlan) -> JsonObject {
        let mut json = self.codec.create_object();
        add_string(&mut json, SOURCE_PROCESS_DEFINITION_ID, &plan.source_process_definition_id);
        add_string(&mut json, TARGET_PROCESS_DEFINITION_ID, &plan.target_process_definition_id);
        add_array_field(&mut json, INSTRUCTIONS, self.instructions.to_json_array(&plan.instructions));
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<MigrationPlan> {
        Ok(MigrationPlan {
            source_process_definition_id: get_str(json, SOURCE_PROCESS_DEFINITION_ID)?.to_string(),
            target_process_definition_id: get_str(json, TARGET_PROCESS_DEFINITION_ID)?.to_string(),
            instructions: self
                .instructions
                .to_objects(INSTRUCTIONS, get_array(json, INSTRUCTIONS)?)?,
        })
    }
}
