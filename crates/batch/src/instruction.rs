//! Process-instance modification instructions.
//!
//! Each variant is written as an object with exactly one discriminating key.
//! Reading checks the discriminators in a fixed priority order, so an object
//! that carries several of them still resolves deterministically.

use std::sync::Arc;

use jobcfg_core::json::{add_default_bool, add_string, bool_or, get_str, has_field};
use jobcfg_core::{ConfigError, ConfigResult, JsonCodec, JsonObject, JsonObjectConverter};

pub const START_BEFORE: &str = "startBeforeActivity";
pub const START_AFTER: &str = "startAfterActivity";
pub const START_TRANSITION: &str = "startTransition";
pub const CANCEL_ALL: &str = "cancelAllForActivity";
pub const CANCEL_CURRENT: &str = "cancelCurrentActiveActivityInstances";
pub const CANCEL_ACTIVITY_INSTANCES: &str = "cancelActivityInstances";
pub const CANCEL_TRANSITION_INSTANCES: &str = "cancelTransitionInstances";
pub const PROCESS_INSTANCE: &str = "processInstances";

/// Discriminator keys in read priority order.
pub const DISCRIMINATORS: [&str; 6] = [
    START_BEFORE,
    START_AFTER,
    START_TRANSITION,
    CANCEL_ALL,
    CANCEL_ACTIVITY_INSTANCES,
    CANCEL_TRANSITION_INSTANCES,
];

/// One structural change inside a running process instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationInstruction {
    StartBeforeActivity {
        activity_id: String,
    },
    StartAfterActivity {
        activity_id: String,
    },
    StartTransition {
        transition_id: String,
    },
    CancelAllForActivity {
        activity_id: String,
        /// Only cancel instances that are active when the instruction runs.
        cancel_current_active_activity_instances: bool,
    },
    CancelActivityInstance {
        process_instance_id: String,
        activity_instance_id: String,
    },
    CancelTransitionInstance {
        process_instance_id: String,
        transition_instance_id: String,
    },
}

impl ModificationInstruction {
    pub fn start_before(activity_id: impl Into<String>) -> Self {
        Self::StartBeforeActivity {
            activity_id: activity_id.into(),
        }
    }

    pub fn start_after(activity_id: impl Into<String>) -> Self {
        Self::StartAfterActivity {
            activity_id: activity_id.into(),
        }
    }

    pub fn start_transition(transition_id: impl Into<String>) -> Self {
        Self::StartTransition {
            transition_id: transition_id.into(),
        }
    }

    pub fn cancel_all(activity_id: impl Into<String>) -> Self {
        Self::CancelAllForActivity {
            activity_id: activity_id.into(),
            cancel_current_active_activity_instances: false,
        }
    }

    pub fn cancel_current_active(activity_id: impl Into<String>) -> Self {
        Self::CancelAllForActivity {
            activity_id: activity_id.into(),
            cancel_current_active_activity_instances: true,
        }
    }

    pub fn cancel_activity_instance(
        process_instance_id: impl Into<String>,
        activity_instance_id: impl Into<String>,
    ) -> Self {
        Self::CancelActivityInstance {
            process_instance_id: process_instance_id.into(),
            activity_instance_id: activity_instance_id.into(),
        }
    }

    pub fn cancel_transition_instance(
        process_instance_id: impl Into<String>,
        transition_instance_id: impl Into<String>,
    ) -> Self {
        Self::CancelTransitionInstance {
            process_instance_id: process_instance_id.into(),
            transition_instance_id: transition_instance_id.into(),
        }
    }

    /// The wire key that identifies this variant.
    pub fn discriminator(&self) -> &'static str {
        match self {
            ModificationInstruction::StartBeforeActivity { .. } => START_BEFORE,
            ModificationInstruction::StartAfterActivity { .. } => START_AFTER,
            ModificationInstruction::StartTransition { .. } => START_TRANSITION,
            ModificationInstruction::CancelAllForActivity { .. } => CANCEL_ALL,
            ModificationInstruction::CancelActivityInstance { .. } => CANCEL_ACTIVITY_INSTANCES,
            ModificationInstruction::CancelTransitionInstance { .. } => CANCEL_TRANSITION_INSTANCES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModificationInstructionConverter {
    codec: Arc<JsonCodec>,
}

impl ModificationInstructionConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

impl JsonObjectConverter for ModificationInstructionConverter {
    type Target = ModificationInstruction;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, instruction: &ModificationInstruction) -> JsonObject {
        let mut json = self.codec.create_object();
        match instruction {
            ModificationInstruction::StartBeforeActivity { activity_id } => {
                add_string(&mut json, START_BEFORE, activity_id);
            }
            ModificationInstruction::StartAfterActivity { activity_id } => {
                add_string(&mut json, START_AFTER, activity_id);
            }
            ModificationInstruction::StartTransition { transition_id } => {
                add_string(&mut json, START_TRANSITION, transition_id);
            }
            ModificationInstruction::CancelAllForActivity {
                activity_id,
                cancel_current_active_activity_instances,
            } => {
                add_string(&mut json, CANCEL_ALL, activity_id);
                add_default_bool(
                    &mut json,
                    CANCEL_CURRENT,
                    false,
                    *cancel_current_active_activity_instances,
                );
            }
            ModificationInstruction::CancelActivityInstance {
                process_instance_id,
                activity_instance_id,
            } => {
                add_string(&mut json, CANCEL_ACTIVITY_INSTANCES, activity_instance_id);
                add_string(&mut json, PROCESS_INSTANCE, process_instance_id);
            }
            ModificationInstruction::CancelTransitionInstance {
                process_instance_id,
                transition_instance_id,
            } => {
                add_string(&mut json, CANCEL_TRANSITION_INSTANCES, transition_instance_id);
                add_string(&mut json, PROCESS_INSTANCE, process_instance_id);
            }
        }
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<ModificationInstruction> {
        let Some(key) = DISCRIMINATORS.into_iter().find(|key| has_field(json, key)) else {
            let keys: Vec<&str> = json.keys().map(String::as_str).collect();
            return Err(ConfigError::UnrecognizedInstruction(keys.join(", ")));
        };

        let instruction = match key {
            START_BEFORE => ModificationInstruction::start_before(get_str(json, START_BEFORE)?),
            START_AFTER => ModificationInstruction::start_after(get_str(json, START_AFTER)?),
            START_TRANSITION => {
                ModificationInstruction::start_transition(get_str(json, START_TRANSITION)?)
            }
            CANCEL_ALL => ModificationInstruction::CancelAllForActivity {
                activity_id: get_str(json, CANCEL_ALL)?.to_string(),
                cancel_current_active_activity_instances: bool_or(json, CANCEL_CURRENT, false)?,
            },
            CANCEL_ACTIVITY_INSTANCES => ModificationInstruction::cancel_activity_instance(
                get_str(json, PROCESS_INSTANCE)?,
                get_str(json, CANCEL_ACTIVITY_INSTANCES)?,
            ),
            CANCEL_TRANSITION_INSTANCES => ModificationInstruction::cancel_transition_instance(
                get_str(json, PROCESS_INSTANCE)?,
                get_str(json, CANCEL_TRANSITION_INSTANCES)?,
            ),
            other => return Err(ConfigError::UnrecognizedInstruction(other.to_string())),
        };
        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn converter() -> ModificationInstructionConverter {
        ModificationInstructionConverter::new(Arc::new(JsonCodec::default()))
    }

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn all_variants() -> Vec<ModificationInstruction> {
        vec![
            ModificationInstruction::start_before("task"),
            ModificationInstruction::start_after("task"),
            ModificationInstruction::start_transition("flow1"),
            ModificationInstruction::cancel_all("task"),
            ModificationInstruction::cancel_current_active("task"),
            ModificationInstruction::cancel_activity_instance("pi-1", "ai-1"),
            ModificationInstruction::cancel_transition_instance("pi-1", "ti-1"),
        ]
    }

    #[test]
    fn each_variant_writes_exactly_one_discriminator() {
        let conv = converter();
        for instruction in all_variants() {
            let json = conv.to_json_object(&instruction);
            let present: Vec<_> = DISCRIMINATORS
                .iter()
                .filter(|key| json.contains_key(**key))
                .collect();
            assert_eq!(present, vec![&instruction.discriminator()]);
        }
    }

    #[test]
    fn every_variant_reads_back() {
        let conv = converter();
        for instruction in all_variants() {
            let json = conv.to_json_object(&instruction);
            assert_eq!(conv.to_object(&json).unwrap(), instruction);
        }
    }

    #[test]
    fn cancel_instance_writes_process_instance_id() {
        let json = converter().to_json_object(&ModificationInstruction::cancel_activity_instance(
            "pi-1", "ai-1",
        ));
        assert_eq!(
            Value::Object(json),
            json!({"cancelActivityInstances": "ai-1", "processInstances": "pi-1"})
        );
    }

    #[test]
    fn start_before_wins_over_cancel_all() {
        let json = object(json!({"cancelAllForActivity": "b", "startBeforeActivity": "a"}));
        assert_eq!(
            converter().to_object(&json).unwrap(),
            ModificationInstruction::start_before("a")
        );
    }

    #[test]
    fn start_transition_wins_over_cancel_instances() {
        let json = object(json!({
            "cancelTransitionInstances": "t",
            "processInstances": "pi",
            "startTransition": "flow"
        }));
        assert_eq!(
            converter().to_object(&json).unwrap(),
            ModificationInstruction::start_transition("flow")
        );
    }

    #[test]
    fn object_without_discriminator_is_an_error() {
        let json = object(json!({"startSomewhere": "x"}));
        assert_eq!(
            converter().to_object(&json),
            Err(ConfigError::UnrecognizedInstruction("startSomewhere".to_string()))
        );
    }

    #[test]
    fn cancel_instance_without_process_instance_is_malformed() {
        let json = object(json!({"cancelActivityInstances": "ai"}));
        assert_eq!(
            converter().to_object(&json),
            Err(ConfigError::missing(PROCESS_INSTANCE))
        );
    }

    #[test]
    fn cancel_transition_instance_reads_its_own_discriminator() {
        let json = object(json!({
            "cancelTransitionInstances": "t",
            "processInstances": "pi"
        }));
        assert_eq!(
            converter().to_object(&json).unwrap(),
            ModificationInstruction::cancel_transition_instance("pi", "t")
        );

        let json = object(json!({"cancelTransitionInstances": "t"}));
        assert_eq!(
            converter().to_object(&json),
            Err(ConfigError::missing(PROCESS_INSTANCE))
        );
    }
}
