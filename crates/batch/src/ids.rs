//! Plain id-list batches (historic decision instance deletion).

use std::sync::Arc;

use jobcfg_core::json::{add_list_field, get_string_list};
use jobcfg_core::{ConfigResult, JsonCodec, JsonObject, JsonObjectConverter};

use crate::BatchIds;

pub const HISTORIC_DECISION_INSTANCE_IDS: &str = "historicDecisionInstanceIds";

/// A batch that carries nothing but its target ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchConfiguration {
    pub ids: Vec<String>,
}

impl BatchConfiguration {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

impl BatchIds for BatchConfiguration {
    fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[derive(Debug, Clone)]
pub struct DeleteHistoricDecisionInstancesConverter {
    codec: Arc<JsonCodec>,
}

impl DeleteHistoricDecisionInstancesConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

impl JsonObjectConverter for DeleteHistoricDecisionInstancesConverter {
    type Target = BatchConfiguration;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, configuration: &BatchConfiguration) -> JsonObject {
        let mut json = self.codec.create_object();
        add_list_field(&mut json, HISTORIC_DECISION_INSTANCE_IDS, &configuration.ids);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<BatchConfiguration> {
        Ok(BatchConfiguration::new(get_string_list(
            json,
            HISTORIC_DECISION_INSTANCE_IDS,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobcfg_core::ConfigError;
    use proptest::prelude::*;

    fn converter() -> DeleteHistoricDecisionInstancesConverter {
        DeleteHistoricDecisionInstancesConverter::new(Arc::new(JsonCodec::default()))
    }

    #[test]
    fn empty_id_list_is_written_and_read() {
        let conv = converter();
        let text = conv.to_canonical_string(&BatchConfiguration::default());
        assert_eq!(text, r#"{"historicDecisionInstanceIds":[]}"#);
        assert_eq!(conv.from_canonical_string(&text).unwrap(), BatchConfiguration::default());
    }

    #[test]
    fn missing_id_list_is_malformed() {
        let err = converter().from_canonical_string("{}").unwrap_err();
        assert_eq!(err, ConfigError::missing(HISTORIC_DECISION_INSTANCE_IDS));
    }

    proptest! {
        /// Property: ids survive in order, duplicates included.
        #[test]
        fn ids_round_trip(ids in prop::collection::vec("[a-z0-9-]{0,12}", 0..20)) {
            let conv = converter();
            let configuration = BatchConfiguration::new(ids);
            let json = conv.to_json_object(&configuration);
            prop_assert_eq!(conv.to_object(&json).unwrap(), configuration);
        }
    }
}
