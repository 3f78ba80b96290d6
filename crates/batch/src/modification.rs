//! Process-instance modification batches.

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

pub const INSTRUCTIONS: &str = "instructions";
pub const PROCESS_INSTANCE_IDS: &str = "processInstanceIds";
pub const SKIP_LISTENERS: &str = "skipListeners";
pub const SKIP_IO_MAPPINGS: &str = "skipIoMappings";
pub const PROCESS_DEFINITION_ID: &str = "processDefinitionId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationBatchConfiguration {
    pub ids: Vec<String>,
    pub process_definition_id: String,
    /// Applied to every instance, in this order.
    pub instructions: Vec<ModificationInstruction>,
    pub skip_custom_listeners: bool,
    pub skip_io_mappings: bool,
}

impl ModificationBatchConfiguration {
    pub fn new(
        ids: Vec<String>,
        process_definition_id: impl Into<String>,
        instructions: Vec<ModificationInstruction>,
    ) -> Self {
        Self {
            ids,
            process_definition_id: process_definition_id.into(),
            instructions,
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

impl BatchIds for ModificationBatchConfiguration {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[derive(Debug, Clone)]
pub struct ModificationBatchConfigurationConverter {
    codec: Arc<JsonCodec>,
    instructions: JsonArrayOfObjectsConverter<ModificationInstructionConverter>,
}

impl ModificationBatchConfigurationConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            instructions: JsonArrayOfObjectsConverter::new(ModificationInstructionConverter::new(
                codec.clone(),
            )),
            codec,
        }
    }
}

impl JsonObjectConverter for ModificationBatchConfigurationConverter {
    type Target = ModificationBatchConfiguration;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, configuration: &ModificationBatchConfiguration) -> JsonObject {
        let mut json = self.codec.create_object();
        add_array_field(
            &mut json,
            INSTRUCTIONS,
            self.instructions.to_json_array(&configuration.instructions),
        );
        add_list_field(&mut json, PROCESS_INSTANCE_IDS, &configuration.ids);
        add_string(&mut json, PROCESS_DEFINITION_ID, &configuration.process_definition_id);
        add_default_bool(&mut json, SKIP_LISTENERS, false, configuration.skip_custom_listeners);
        add_default_bool(&mut json, SKIP_IO_MAPPINGS, false, configuration.skip_io_mappings);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<ModificationBatchConfiguration> {
        Ok(ModificationBatchConfiguration {
            ids: get_string_list(json, PROCESS_INSTANCE_IDS)?,
            process_definition_id: get_str(json, PROCESS_DEFINITION_ID)?.to_string(),
            instructions: self
                .instructions
                .to_objects(INSTRUCTIONS, get_array(json, INSTRUCTIONS)?)?,
            skip_custom_listeners: bool_or(json, SKIP_LISTENERS, false)?,
            skip_io_mappings: bool_or(json, SKIP_IO_MAPPINGS, false)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobcfg_core::ConfigError;
    use serde_json::{Value, json};

    fn converter() -> ModificationBatchConfigurationConverter {
        ModificationBatchConfigurationConverter::new(Arc::new(JsonCodec::default()))
    }

    #[test]
    fn flags_are_omitted_when_false() {
        let configuration = ModificationBatchConfiguration::new(
            vec!["pi-1".into()],
            "order:1",
            vec![ModificationInstruction::start_before("ship")],
        );
        assert_eq!(
            Value::Object(converter().to_json_object(&configuration)),
            json!({
                "instructions": [{"startBeforeActivity": "ship"}],
                "processInstanceIds": ["pi-1"],
                "processDefinitionId": "order:1"
            })
        );
    }

    #[test]
    fn full_configuration_round_trips() {
        let conv = converter();
        let configuration = ModificationBatchConfiguration::new(
            vec!["pi-2".into(), "pi-1".into(), "pi-2".into()],
            "order:1",
            vec![
                ModificationInstruction::cancel_current_active("pack"),
                ModificationInstruction::start_after("pack"),
                ModificationInstruction::cancel_transition_instance("pi-1", "t-7"),
            ],
        )
        .skip_custom_listeners(true)
        .skip_io_mappings(true);

        let text = conv.to_canonical_string(&configuration);
        assert_eq!(conv.from_canonical_string(&text).unwrap(), configuration);
    }

    #[test]
    fn unrecognized_instruction_fails_the_whole_batch() {
        let text = r#"{"instructions":[{"rewind":"x"}],"processInstanceIds":[],"processDefinitionId":"p"}"#;
        assert!(matches!(
            converter().from_canonical_string(text),
            Err(ConfigError::UnrecognizedInstruction(_))
        ));
    }

    #[test]
    fn process_definition_id_is_required() {
        let text = r#"{"instructions":[],"processInstanceIds":[]}"#;
        assert_eq!(
            converter().from_canonical_string(text),
            Err(ConfigError::missing(PROCESS_DEFINITION_ID))
        );
    }

    #[test]
    fn empty_ids_and_instructions_are_written_and_read_back() {
        let conv = converter();
        let configuration = ModificationBatchConfiguration::new(vec![], "order:1", vec![]);
        let json = conv.to_json_object(&configuration);
        assert_eq!(json.get(PROCESS_INSTANCE_IDS), Some(&json!([])));
        assert_eq!(json.get(INSTRUCTIONS), Some(&json!([])));
        assert_eq!(conv.to_object(&json).unwrap(), configuration);
    }
}
