//! The flat `orderBy` string written by older query serializations.
//!
//! Grammar, one clause per comma:
//!
//! ```text
//! [FUNCTION(][ALIAS.]COLUMN[)] [asc|desc]
//! ```
//!
//! e.g. `RES.ID_ asc, LOWER(RES.NAME_) desc`. The table alias is dropped;
//! it is implied by the query the ordering belongs to.

use jobcfg_core::{ConfigError, ConfigResult};

use crate::ordering::{OrderingFields, QueryOrderingProperty};
use crate::property::{Direction, QueryProperty};

const FIELD: &str = "orderBy";

/// Parse a legacy `orderBy` string into ordering properties, in order.
pub fn from_order_by_string(order_by: &str) -> ConfigResult<Vec<QueryOrderingProperty>> {
    order_by
        .split(',')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(parse_clause)
        .collect()
}

fn parse_clause(clause: &str) -> ConfigResult<QueryOrderingProperty> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    let (property, direction) = match tokens.as_slice() {
        [property] => (*property, None),
        [property, direction] => {
            let direction = Direction::find_by_name(direction)
                .ok_or_else(|| ConfigError::invalid_value(FIELD, clause))?;
            (*property, Some(direction))
        }
        _ => return Err(ConfigError::invalid_value(FIELD, clause)),
    };

    Ok(QueryOrderingProperty::new(
        None,
        OrderingFields {
            query_property: Some(parse_property(property, clause)?),
            direction,
            relation_conditions: Vec::new(),
        },
    ))
}

fn parse_property(token: &str, clause: &str) -> ConfigResult<QueryProperty> {
    let (function, column) = match token.split_once('(') {
        Some((function, rest)) => {
            let column = rest
                .strip_suffix(')')
                .ok_or_else(|| ConfigError::invalid_value(FIELD, clause))?;
            (Some(function), column)
        }
        None => (None, token),
    };

    let parts: Vec<&str> = column.split('.').collect();
    let name = match parts.as_slice() {
        [name] | [_, name] => *name,
        _ => return Err(ConfigError::invalid_value(FIELD, clause)),
    };
    if name.is_empty() || function.is_some_and(str::is_empty) {
        return Err(ConfigError::invalid_value(FIELD, clause));
    }

    Ok(match function {
        Some(function) => QueryProperty::with_function(name, function),
        None => QueryProperty::new(name),
    })
}
