//! Query properties, sort directions and relation conditions.

/// A column a query can sort or filter by, optionally wrapped in a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryProperty {
    name: String,
    function: Option<String>,
}

impl QueryProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: None,
        }
    }

    pub fn with_function(name: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: Some(function.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }

    /// Case-insensitive lookup of `asc` / `desc`.
    pub fn find_by_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("asc") {
            Some(Direction::Ascending)
        } else if name.eq_ignore_ascii_case("desc") {
            Some(Direction::Descending)
        } else {
            None
        }
    }
}

/// Scopes an ordering property: `property = comparison_property` or
/// `property = scalar_value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryEntityRelationCondition {
    pub property: Option<QueryProperty>,
    pub comparison_property: Option<QueryProperty>,
    pub scalar_value: Option<String>,
}

impl QueryEntityRelationCondition {
    pub fn new(
        property: Option<QueryProperty>,
        comparison_property: Option<QueryProperty>,
        scalar_value: Option<String>,
    ) -> Self {
        Self {
            property,
            comparison_property,
            scalar_value,
        }
    }

    pub fn compare(property: QueryProperty, comparison_property: QueryProperty) -> Self {
        Self::new(Some(property), Some(comparison_property), None)
    }

    pub fn scalar(property: QueryProperty, value: impl Into<String>) -> Self {
        Self::new(Some(property), None, Some(value.into()))
    }

    pub fn is_property_comparison(&self) -> bool {
        self.comparison_property.is_some()
    }
}
