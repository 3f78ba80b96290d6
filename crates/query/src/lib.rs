//! Persisted query ordering and relation filters.
//!
//! Deferred queries (saved filters, queries captured by batch submission) keep
//! their sort order as a list of [`QueryOrderingProperty`] values. An ordering
//! property may be scoped by relation conditions, e.g. "order by the value of
//! the variable named `amount` of the task's process instance".

pub mod converter;
pub mod legacy;
pub mod ordering;
pub mod property;
pub mod variable;

pub use converter::{
    OrderingPropertiesConverter, QueryEntityRelationConditionConverter,
    QueryOrderingPropertyConverter,
};
pub use legacy::from_order_by_string;
pub use ordering::{
    OrderingFields, PlainOrderProperty, QueryOrderingProperty, VariableOrderProperty,
    VariableValueType,
};
pub use property::{Direction, QueryEntityRelationCondition, QueryProperty};
pub use variable::{QueryOperator, QueryVariableValue, QueryVariableValueConverter};
