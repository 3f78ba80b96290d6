//! JSON codec and typed field accessors.
//!
//! Every converter builds and reads flat `serde_json` objects through these
//! helpers so that the wire rules live in one place:
//!
//! - optional values are omitted, never written as `null`
//! - boolean flags may be written "omit-if-default"
//! - required fields fail with [`ConfigError::MissingField`], wrong JSON types
//!   with [`ConfigError::InvalidType`]
//!
//! Objects are `serde_json::Map`s without `preserve_order`, so keys are written
//! in sorted order and the canonical string of a value is deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// A wire object.
pub type JsonObject = Map<String, Value>;

/// Output options for [`JsonCodec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Indent written payloads. Readers accept both forms.
    pub pretty: bool,
}

/// The codec shared by converters and handlers.
///
/// Built once at startup from [`CodecOptions`] and handed out as
/// `Arc<JsonCodec>`; it carries no mutable state.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    options: CodecOptions,
}

impl JsonCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    pub fn create_object(&self) -> JsonObject {
        Map::new()
    }

    pub fn create_array(&self) -> Vec<Value> {
        Vec::new()
    }

    /// Parse a canonical configuration string. Anything but a JSON object is rejected.
    pub fn parse_object(&self, source: &str) -> ConfigResult<JsonObject> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| ConfigError::syntax(e.to_string()))?;
        into_object(value)
    }

    pub fn read_bytes(&self, bytes: &[u8]) -> ConfigResult<JsonObject> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::syntax(e.to_string()))?;
        into_object(value)
    }

    pub fn write_string(&self, object: JsonObject) -> String {
        let value = Value::Object(object);
        if self.options.pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }

    pub fn write_bytes(&self, object: JsonObject) -> Vec<u8> {
        self.write_string(object).into_bytes()
    }
}

fn into_object(value: Value) -> ConfigResult<JsonObject> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(ConfigError::syntax(format!(
            "expected a JSON object, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn add_string(object: &mut JsonObject, name: &str, value: &str) {
    object.insert(name.to_string(), Value::String(value.to_string()));
}

pub fn add_opt_string(object: &mut JsonObject, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        add_string(object, name, value);
    }
}

pub fn add_bool(object: &mut JsonObject, name: &str, value: bool) {
    object.insert(name.to_string(), Value::Bool(value));
}

/// Write `value` only when it differs from `default`.
pub fn add_default_bool(object: &mut JsonObject, name: &str, default: bool, value: bool) {
    if value != default {
        add_bool(object, name, value);
    }
}

pub fn add_i32(object: &mut JsonObject, name: &str, value: i32) {
    object.insert(name.to_string(), Value::from(value));
}

pub fn add_u32(object: &mut JsonObject, name: &str, value: u32) {
    object.insert(name.to_string(), Value::from(value));
}

/// Write an explicit `null`. Only used where `null` carries meaning.
pub fn add_null_field(object: &mut JsonObject, name: &str) {
    object.insert(name.to_string(), Value::Null);
}

/// Write a string list in order, duplicates included.
pub fn add_list_field(object: &mut JsonObject, name: &str, values: &[String]) {
    let array = values.iter().cloned().map(Value::String).collect();
    object.insert(name.to_string(), Value::Array(array));
}

pub fn add_array_field(object: &mut JsonObject, name: &str, values: Vec<Value>) {
    object.insert(name.to_string(), Value::Array(values));
}

pub fn add_object_field(object: &mut JsonObject, name: &str, value: JsonObject) {
    object.insert(name.to_string(), Value::Object(value));
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

pub fn has_field(object: &JsonObject, name: &str) -> bool {
    object.contains_key(name)
}

fn required<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<&'a Value> {
    object.get(name).ok_or_else(|| ConfigError::missing(name))
}

/// Absent and `null` both read as "not present" for optional fields.
fn optional<'a>(object: &'a JsonObject, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|v| !v.is_null())
}

pub fn get_str<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<&'a str> {
    required(object, name)?
        .as_str()
        .ok_or_else(|| ConfigError::invalid_type(name, "a string"))
}

pub fn opt_str<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<Option<&'a str>> {
    optional(object, name)
        .map(|v| v.as_str().ok_or_else(|| ConfigError::invalid_type(name, "a string")))
        .transpose()
}

pub fn get_bool(object: &JsonObject, name: &str) -> ConfigResult<bool> {
    required(object, name)?
        .as_bool()
        .ok_or_else(|| ConfigError::invalid_type(name, "a boolean"))
}

/// Read an omit-if-default flag.
pub fn bool_or(object: &JsonObject, name: &str, default: bool) -> ConfigResult<bool> {
    match optional(object, name) {
        Some(value) => value
            .as_bool()
            .ok_or_else(|| ConfigError::invalid_type(name, "a boolean")),
        None => Ok(default),
    }
}

pub fn get_i32(object: &JsonObject, name: &str) -> ConfigResult<i32> {
    required(object, name)?
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| ConfigError::invalid_type(name, "a 32-bit integer"))
}

fn as_u32(value: &Value, name: &str) -> ConfigResult<u32> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ConfigError::invalid_type(name, "a non-negative integer"))
}

pub fn get_u32(object: &JsonObject, name: &str) -> ConfigResult<u32> {
    as_u32(required(object, name)?, name)
}

pub fn opt_u32(object: &JsonObject, name: &str) -> ConfigResult<Option<u32>> {
    optional(object, name).map(|v| as_u32(v, name)).transpose()
}

pub fn get_object<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<&'a JsonObject> {
    required(object, name)?
        .as_object()
        .ok_or_else(|| ConfigError::invalid_type(name, "an object"))
}

pub fn get_array<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<&'a Vec<Value>> {
    required(object, name)?
        .as_array()
        .ok_or_else(|| ConfigError::invalid_type(name, "an array"))
}

pub fn opt_array<'a>(object: &'a JsonObject, name: &str) -> ConfigResult<Option<&'a Vec<Value>>> {
    optional(object, name)
        .map(|v| v.as_array().ok_or_else(|| ConfigError::invalid_type(name, "an array")))
        .transpose()
}

/// Read a required string list, preserving order and duplicates.
pub fn get_string_list(object: &JsonObject, name: &str) -> ConfigResult<Vec<String>> {
    get_array(object, name)?
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::invalid_type(format!("{name}[{i}]"), "a string"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn parse_rejects_non_objects() {
        let codec = JsonCodec::default();
        assert!(matches!(codec.parse_object("[1,2]"), Err(ConfigError::Syntax(_))));
        assert!(matches!(codec.parse_object("{\"a\":"), Err(ConfigError::Syntax(_))));
        assert!(codec.parse_object("{}").unwrap().is_empty());
    }

    #[test]
    fn write_is_compact_and_sorted() {
        let codec = JsonCodec::default();
        let mut obj = codec.create_object();
        add_string(&mut obj, "b", "x");
        add_u32(&mut obj, "a", 1);
        assert_eq!(codec.write_string(obj), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn pretty_output_reads_back() {
        let codec = JsonCodec::new(CodecOptions { pretty: true });
        let mut obj = codec.create_object();
        add_list_field(&mut obj, "ids", &["1".to_string(), "1".to_string()]);
        let text = codec.write_string(obj.clone());
        assert!(text.contains('\n'));
        assert_eq!(codec.parse_object(&text).unwrap(), obj);
    }

    #[test]
    fn bytes_round_trip() {
        let codec = JsonCodec::default();
        let obj = object(json!({"retries": 3}));
        let bytes = codec.write_bytes(obj.clone());
        assert_eq!(codec.read_bytes(&bytes).unwrap(), obj);
    }

    #[test]
    fn default_bool_is_omitted() {
        let mut obj = JsonObject::new();
        add_default_bool(&mut obj, "skip", false, false);
        assert!(!has_field(&obj, "skip"));
        add_default_bool(&mut obj, "skip", false, true);
        assert_eq!(obj.get("skip"), Some(&Value::Bool(true)));
    }

    #[test]
    fn required_fields_fail_when_absent() {
        let obj = object(json!({}));
        assert_eq!(get_str(&obj, "by"), Err(ConfigError::missing("by")));
        assert_eq!(get_i32(&obj, "retries"), Err(ConfigError::missing("retries")));
        assert_eq!(bool_or(&obj, "flag", false), Ok(false));
        assert_eq!(opt_str(&obj, "key"), Ok(None));
    }

    #[test]
    fn wrong_types_are_reported() {
        let obj = object(json!({"by": 1, "retries": "3", "ids": ["a", 2], "n": -1}));
        assert!(matches!(get_str(&obj, "by"), Err(ConfigError::InvalidType { .. })));
        assert!(matches!(get_i32(&obj, "retries"), Err(ConfigError::InvalidType { .. })));
        assert_eq!(
            get_string_list(&obj, "ids"),
            Err(ConfigError::invalid_type("ids[1]", "a string"))
        );
        assert!(matches!(get_u32(&obj, "n"), Err(ConfigError::InvalidType { .. })));
    }

    #[test]
    fn string_list_keeps_order_and_duplicates() {
        let obj = object(json!({"ids": ["b", "a", "b"]}));
        assert_eq!(get_string_list(&obj, "ids").unwrap(), vec!["b", "a", "b"]);
    }
}
