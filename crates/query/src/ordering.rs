//! Ordering properties and the variable-capable variant.

use crate::property::{Direction, QueryEntityRelationCondition, QueryProperty};

/// Relation tag that selects [`QueryOrderingProperty::Variable`].
pub const RELATION_VARIABLE: &str = "variable";

/// Columns of the variable instance table used by variable ordering.
pub mod variable_columns {
    pub const NAME: &str = "NAME_";
    pub const TYPE: &str = "TYPE_";
    pub const EXECUTION_ID: &str = "EXECUTION_ID_";
    pub const TASK_ID: &str = "TASK_ID_";
    pub const CASE_INSTANCE_ID: &str = "CASE_INST_ID_";
    pub const CASE_EXECUTION_ID: &str = "CASE_EXECUTION_ID_";
    pub const TEXT: &str = "TEXT_";
    pub const LONG: &str = "LONG_";
    pub const DOUBLE: &str = "DOUBLE_";
    pub const LOWER: &str = "LOWER";
}

/// Columns of the task table that variable ordering joins against.
pub mod task_columns {
    pub const ID: &str = "ID_";
    pub const PROCESS_INSTANCE_ID: &str = "PROC_INST_ID_";
    pub const EXECUTION_ID: &str = "EXECUTION_ID_";
    pub const CASE_INSTANCE_ID: &str = "CASE_INST_ID_";
    pub const CASE_EXECUTION_ID: &str = "CASE_EXECUTION_ID_";
}

/// Fields shared by every ordering property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingFields {
    pub query_property: Option<QueryProperty>,
    pub direction: Option<Direction>,
    pub relation_conditions: Vec<QueryEntityRelationCondition>,
}

/// One sort key of a persisted query.
///
/// Built through [`QueryOrderingProperty::new`], so a `variable` relation
/// always ends up in the variable variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOrderingProperty {
    /// Ordering by a column of the queried entity or an arbitrary relation.
    Plain(PlainOrderProperty),
    /// Ordering by a variable value; relation is always `variable`.
    Variable(VariableOrderProperty),
}

/// Ordering by an entity column, optionally through a non-variable relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainOrderProperty {
    relation: Option<String>,
    fields: OrderingFields,
}

impl PlainOrderProperty {
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    pub fn fields(&self) -> &OrderingFields {
        &self.fields
    }
}

impl QueryOrderingProperty {
    /// Build from a relation tag. `variable` always yields the variable variant.
    pub fn new(relation: Option<String>, fields: OrderingFields) -> Self {
        if relation.as_deref() == Some(RELATION_VARIABLE) {
            QueryOrderingProperty::Variable(VariableOrderProperty { fields })
        } else {
            QueryOrderingProperty::Plain(PlainOrderProperty { relation, fields })
        }
    }

    /// Order by a column of the queried entity.
    pub fn by(property: QueryProperty, direction: Direction) -> Self {
        Self::new(
            None,
            OrderingFields {
                query_property: Some(property),
                direction: Some(direction),
                relation_conditions: Vec::new(),
            },
        )
    }

    pub fn relation(&self) -> Option<&str> {
        match self {
            QueryOrderingProperty::Plain(plain) => plain.relation(),
            QueryOrderingProperty::Variable(_) => Some(RELATION_VARIABLE),
        }
    }

    pub fn fields(&self) -> &OrderingFields {
        match self {
            QueryOrderingProperty::Plain(plain) => &plain.fields,
            QueryOrderingProperty::Variable(variable) => &variable.fields,
        }
    }

    pub fn query_property(&self) -> Option<&QueryProperty> {
        self.fields().query_property.as_ref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.fields().direction
    }

    pub fn relation_conditions(&self) -> &[QueryEntityRelationCondition] {
        &self.fields().relation_conditions
    }

    pub fn has_relation_conditions(&self) -> bool {
        !self.fields().relation_conditions.is_empty()
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, QueryOrderingProperty::Variable(_))
    }
}

impl From<VariableOrderProperty> for QueryOrderingProperty {
    fn from(value: VariableOrderProperty) -> Self {
        QueryOrderingProperty::Variable(value)
    }
}

/// Primitive variable types that can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableValueType {
    String,
    Integer,
    Long,
    Short,
    Double,
    Boolean,
    Date,
}

impl VariableValueType {
    pub fn name(&self) -> &'static str {
        match self {
            VariableValueType::String => "string",
            VariableValueType::Integer => "integer",
            VariableValueType::Long => "long",
            VariableValueType::Short => "short",
            VariableValueType::Double => "double",
            VariableValueType::Boolean => "boolean",
            VariableValueType::Date => "date",
        }
    }

    /// The value column a variable of this type is stored in.
    pub fn value_column(&self) -> QueryProperty {
        match self {
            VariableValueType::String => {
                QueryProperty::with_function(variable_columns::TEXT, variable_columns::LOWER)
            }
            VariableValueType::Double => QueryProperty::new(variable_columns::DOUBLE),
            VariableValueType::Integer
            | VariableValueType::Long
            | VariableValueType::Short
            | VariableValueType::Boolean
            | VariableValueType::Date => QueryProperty::new(variable_columns::LONG),
        }
    }
}

/// Ordering by the value of a named variable.
///
/// Carries relation conditions on the variable name and type; the scoped
/// constructors add one more condition joining the variable to its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableOrderProperty {
    fields: OrderingFields,
}

impl VariableOrderProperty {
    pub fn new(variable_name: impl Into<String>, value_type: VariableValueType) -> Self {
        Self {
            fields: OrderingFields {
                query_property: Some(value_type.value_column()),
                direction: None,
                relation_conditions: vec![
                    QueryEntityRelationCondition::scalar(
                        QueryProperty::new(variable_columns::NAME),
                        variable_name,
                    ),
                    QueryEntityRelationCondition::scalar(
                        QueryProperty::new(variable_columns::TYPE),
                        value_type.name(),
                    ),
                ],
            },
        }
    }

    fn scoped(
        variable_name: impl Into<String>,
        value_type: VariableValueType,
        variable_column: &str,
        task_column: &str,
    ) -> Self {
        let mut property = Self::new(variable_name, value_type);
        property
            .fields
            .relation_conditions
            .push(QueryEntityRelationCondition::compare(
                QueryProperty::new(variable_column),
                QueryProperty::new(task_column),
            ));
        property
    }

    pub fn for_process_instance_variable(
        variable_name: impl Into<String>,
        value_type: VariableValueType,
    ) -> Self {
        Self::scoped(
            variable_name,
            value_type,
            variable_columns::EXECUTION_ID,
            task_columns::PROCESS_INSTANCE_ID,
        )
    }

    pub fn for_execution_variable(
        variable_name: impl Into<String>,
        value_type: VariableValueType,
    ) -> Self {
        Self::scoped(
            variable_name,
            value_type,
            variable_columns::EXECUTION_ID,
            task_columns::EXECUTION_ID,
        )
    }

    pub fn for_task_variable(variable_name: impl Into<String>, value_type: VariableValueType) -> Self {
        Self::scoped(variable_name, value_type, variable_columns::TASK_ID, task_columns::ID)
    }

    pub fn for_case_instance_variable(
        variable_name: impl Into<String>,
        value_type: VariableValueType,
    ) -> Self {
        Self::scoped(
            variable_name,
            value_type,
            variable_columns::CASE_INSTANCE_ID,
            task_columns::CASE_INSTANCE_ID,
        )
    }

    pub fn for_case_execution_variable(
        variable_name: impl Into<String>,
        value_type: VariableValueType,
    ) -> Self {
        Self::scoped(
            variable_name,
            value_type,
            variable_columns::CASE_EXECUTION_ID,
            task_columns::CASE_EXECUTION_ID,
        )
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.fields.direction = Some(direction);
        self
    }

    pub fn fields(&self) -> &OrderingFields {
        &self.fields
    }
}
