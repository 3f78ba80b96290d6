//! Wire converters for ordering properties and relation conditions.

use std::sync::Arc;

use jobcfg_core::json::{add_array_field, add_opt_string, add_string, opt_array, opt_str};
use jobcfg_core::{
    ConfigError, ConfigResult, JsonArrayOfObjectsConverter, JsonCodec, JsonObject,
    JsonObjectConverter,
};

use crate::legacy::from_order_by_string;
use crate::ordering::{OrderingFields, QueryOrderingProperty};
use crate::property::{Direction, QueryEntityRelationCondition, QueryProperty};

pub const BASE_PROPERTY: &str = "baseField";
pub const BASE_PROPERTY_FUNCTION: &str = "baseFieldFunction";
pub const COMPARISON_PROPERTY: &str = "comparisonField";
pub const COMPARISON_PROPERTY_FUNCTION: &str = "comparisonFieldFunction";
pub const SCALAR_VALUE: &str = "value";

pub const RELATION: &str = "relation";
pub const QUERY_PROPERTY: &str = "queryProperty";
pub const QUERY_PROPERTY_FUNCTION: &str = "queryPropertyFunction";
pub const DIRECTION: &str = "direction";
pub const RELATION_CONDITIONS: &str = "relationProperties";

pub const ORDERING_PROPERTIES: &str = "orderingProperties";
/// Flat sort string written by older versions.
pub const ORDER_BY: &str = "orderBy";

#[derive(Debug, Clone)]
pub struct QueryEntityRelationConditionConverter {
    codec: Arc<JsonCodec>,
}

impl QueryEntityRelationConditionConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self { codec }
    }
}

impl JsonObjectConverter for QueryEntityRelationConditionConverter {
    type Target = QueryEntityRelationCondition;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, condition: &QueryEntityRelationCondition) -> JsonObject {
        let mut json = self.codec.create_object();
        add_property(&mut json, BASE_PROPERTY, BASE_PROPERTY_FUNCTION, condition.property.as_ref());
        add_property(
            &mut json,
            COMPARISON_PROPERTY,
            COMPARISON_PROPERTY_FUNCTION,
            condition.comparison_property.as_ref(),
        );
        add_opt_string(&mut json, SCALAR_VALUE, condition.scalar_value.as_deref());
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<QueryEntityRelationCondition> {
        Ok(QueryEntityRelationCondition::new(
            read_property(json, BASE_PROPERTY, BASE_PROPERTY_FUNCTION)?,
            read_property(json, COMPARISON_PROPERTY, COMPARISON_PROPERTY_FUNCTION)?,
            opt_str(json, SCALAR_VALUE)?.map(str::to_string),
        ))
    }
}

/// Writes a property name and, when set, its function under a sibling key.
fn add_property(
    json: &mut JsonObject,
    name_key: &str,
    function_key: &str,
    property: Option<&QueryProperty>,
) {
    if let Some(property) = property {
        add_string(json, name_key, property.name());
        add_opt_string(json, function_key, property.function());
    }
}

/// A function without a name is ignored.
fn read_property(
    json: &JsonObject,
    name_key: &str,
    function_key: &str,
) -> ConfigResult<Option<QueryProperty>> {
    let Some(name) = opt_str(json, name_key)? else {
        return Ok(None);
    };
    Ok(Some(match opt_str(json, function_key)? {
        Some(function) => QueryProperty::with_function(name, function),
        None => QueryProperty::new(name),
    }))
}

#[derive(Debug, Clone)]
pub struct QueryOrderingPropertyConverter {
    codec: Arc<JsonCodec>,
    conditions: JsonArrayOfObjectsConverter<QueryEntityRelationConditionConverter>,
}

impl QueryOrderingPropertyConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            conditions: JsonArrayOfObjectsConverter::new(QueryEntityRelationConditionConverter::new(
                codec.clone(),
            )),
            codec,
        }
    }
}

impl JsonObjectConverter for QueryOrderingPropertyConverter {
    type Target = QueryOrderingProperty;

    fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn to_json_object(&self, property: &QueryOrderingProperty) -> JsonObject {
        let mut json = self.codec.create_object();
        add_opt_string(&mut json, RELATION, property.relation());

        add_property(&mut json, QUERY_PROPERTY, QUERY_PROPERTY_FUNCTION, property.query_property());

        if let Some(direction) = property.direction() {
            add_string(&mut json, DIRECTION, direction.name());
        }

        if property.has_relation_conditions() {
            add_array_field(
                &mut json,
                RELATION_CONDITIONS,
                self.conditions.to_json_array(property.relation_conditions()),
            );
        }
        json
    }

    fn to_object(&self, json: &JsonObject) -> ConfigResult<QueryOrderingProperty> {
        let relation = opt_str(json, RELATION)?.map(str::to_string);

        let query_property = read_property(json, QUERY_PROPERTY, QUERY_PROPERTY_FUNCTION)?;

        let direction = opt_str(json, DIRECTION)?
            .map(|name| {
                Direction::find_by_name(name).ok_or_else(|| ConfigError::invalid_value(DIRECTION, name))
            })
            .transpose()?;

        let relation_conditions = match opt_array(json, RELATION_CONDITIONS)? {
            Some(array) => self.conditions.to_objects(RELATION_CONDITIONS, array)?,
            None => Vec::new(),
        };

        Ok(QueryOrderingProperty::new(
            relation,
            OrderingFields {
                query_property,
                direction,
                relation_conditions,
            },
        ))
    }
}

/// Reads and writes the ordering list of a persisted query object.
#[derive(Debug, Clone)]
pub struct OrderingPropertiesConverter {
    properties: JsonArrayOfObjectsConverter<QueryOrderingPropertyConverter>,
}

impl OrderingPropertiesConverter {
    pub fn new(codec: Arc<JsonCodec>) -> Self {
        Self {
            properties: JsonArrayOfObjectsConverter::new(QueryOrderingPropertyConverter::new(codec)),
        }
    }

    /// Writes `orderingProperties` unless the list is empty.
    pub fn write(&self, json: &mut JsonObject, properties: &[QueryOrderingProperty]) {
        if !properties.is_empty() {
            add_array_field(json, ORDERING_PROPERTIES, self.properties.to_json_array(properties));
        }
    }

    /// Reads `orderingProperties`, falling back to the legacy `orderBy` string.
    pub fn read(&self, json: &JsonObject) -> ConfigResult<Vec<QueryOrderingProperty>> {
        if let Some(array) = opt_array(json, ORDERING_PROPERTIES)? {
            return self.properties.to_objects(ORDERING_PROPERTIES, array);
        }
        match opt_str(json, ORDER_BY)? {
            Some(order_by) => from_order_by_string(order_by),
            None => Ok(Vec::new()),
        }
    }
}
