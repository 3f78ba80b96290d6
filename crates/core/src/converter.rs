//! Object converter contract.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::json::{JsonCodec, JsonObject};

/// Maps a typed value to and from one wire object.
///
/// Implementations hold the shared codec they were constructed with and must
/// be lossless: `to_object(&to_json_object(x)) == x` for every field that
/// affects behaviour.
pub trait JsonObjectConverter {
    type Target;

    fn codec(&self) -> &JsonCodec;

    fn to_json_object(&self, value: &Self::Target) -> JsonObject;

    fn to_object(&self, json: &JsonObject) -> ConfigResult<Self::Target>;

    fn to_canonical_string(&self, value: &Self::Target) -> String {
        self.codec().write_string(self.to_json_object(value))
    }

    fn from_canonical_string(&self, source: &str) -> ConfigResult<Self::Target> {
        let json = self.codec().parse_object(source)?;
        self.to_object(&json)
    }
}

/// Lifts an object converter to arrays of objects.
#[derive(Debug, Clone)]
pub struct JsonArrayOfObjectsConverter<C> {
    inner: C,
}

impl<C: JsonObjectConverter> JsonArrayOfObjectsConverter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn element_converter(&self) -> &C {
        &self.inner
    }

    pub fn to_json_array(&self, values: &[C::Target]) -> Vec<Value> {
        let mut array = self.inner.codec().create_array();
        array.extend(
            values
                .iter()
                .map(|v| Value::Object(self.inner.to_json_object(v))),
        );
        array
    }

    /// Convert each element in order. `field` names the array in errors.
    pub fn to_objects(&self, field: &str, array: &[Value]) -> ConfigResult<Vec<C::Target>> {
        array
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let object = element
                    .as_object()
                    .ok_or_else(|| ConfigError::invalid_type(format!("{field}[{i}]"), "an object"))?;
                self.inner.to_object(object)
            })
            .collect()
    }
}
