//! Variable filters captured with a persisted query.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use jobcfg_core::json::{add_default_bool, add_string, bool_or, get_str};
use jobcfg_core::{ConfigError, ConfigResult, JsonCodec, JsonObject, JsonObjectConverter};

pub const NAME: &str = "name";
pub const VALUE: &str = "value";
pub const OPERATOR: &str = "operator";
pub const TASK_VARIABLE: &str = "taskVariable";
pub const PROCESS_VARIABLE: &str = "processVariable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Like,
    NotLike,
}

impl QueryOperator {
    pub const ALL: [QueryOperator; 8] = [
        QueryOperator::Equals,
        QueryOperator::NotEquals,
        QueryOperator::GreaterThan,
        QueryOperator::GreaterThanOrEquals,
        QueryOperator::LessThan,
        QueryOperator::LessThanOrEquals,
        QueryOperator::Like,
        QueryOperator::NotLike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryOperator::Equals => "EQUALS",
            QueryOperator::NotEquals => "NOT_EQUALS",
            QueryOperator::GreaterThan => "GREATER_THAN",
            QueryOperator::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            QueryOperator::LessThan => "LESS_THAN",
            QueryOperator::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            QueryOperator::Like => "LIKE",
            QueryOperator::NotLike => "NOT_LIKE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `name <operator> value` filter on a variable.
///
/// `task_variable` and `process_variable` restrict which scope the variable
/// is looked up in; both false means any scope.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVariableValue {
    pub name: String,
    pub value: Value,
    pub operator: QueryOperator,
    pub task_variable: bool,
    pub process_variable: bool,
}

impl QueryVariableValue {
    pub fn new(name: impl Into<String>, value: Value, operator: QueryOperator) -> Self {
        Self {
            name: name.into(),
            value,
            operator,
            task_variable: false,
            process_variable: false,
        }
    }

    pub fn task_variable(mut self) -> Self {
        self.task_variable = true;
        self
    }

    pub fn process_variable(mut self) -> Self {
        self.process_variable = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct QueryVariableValueConverter {
    codec: Arc<JsonCodec>,
}

impl QueryVariableValueConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

impl JsonObjectConverter for QueryVariableValueConverter {
    type Target = QueryVariableValue;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, variable: &QueryVariableValue) -> JsonObject {
        let mut json = self.codec.create_object();
        add_string(&mut json, NAME, &variable.name);
        json.insert(VALUE.to_string(), variable.value.clone());
        add_string(&mut json, OPERATOR, variable.operator.name());
        add_default_bool(&mut json, TASK_VARIABLE, false, variable.task_variable);
        add_default_bool(&mut json, PROCESS_VARIABLE, false, variable.process_variable);
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<QueryVariableValue> {
        let operator = get_str(json, OPERATOR)?;
        Ok(QueryVariableValue {
            name: get_str(json, NAME)?.to_string(),
            value: json.get(VALUE).cloned().unwrap_or(Value::Null),
            operator: QueryOperator::from_name(operator)
                .ok_or_else(|| ConfigError::invalid_value(OPERATOR, operator))?,
            task_variable: bool_or(json, TASK_VARIABLE, false)?,
            process_variable: bool_or(json, PROCESS_VARIABLE, false)?,
        })
    }
}
