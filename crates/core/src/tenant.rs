//! Tenant tri-state.

use crate::error::{ConfigError, ConfigResult};
use crate::json::{JsonObject, add_null_field, add_string};

/// How a configuration restricts its target by tenant.
///
/// On the wire this is one field: absent for [`TenantScope::NotConsidered`],
/// explicit `null` for [`TenantScope::WithoutTenant`], a string otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TenantScope {
    /// The tenant is not part of the selection.
    #[default]
    NotConsidered,
    /// Only targets that belong to no tenant.
    WithoutTenant,
    /// Only targets of this tenant.
    Tenant(String),
}

impl TenantScope {
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        Self::Tenant(tenant_id.into())
    }

    /// Explicit scope: `None` means "without tenant", not "not considered".
    pub fn explicit(tenant_id: Option<String>) -> Self {
        match tenant_id {
            Some(id) => Self::Tenant(id),
            None => Self::WithoutTenant,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, TenantScope::NotConsidered)
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            TenantScope::Tenant(id) => Some(id),
            _ => None,
        }
    }

    pub fn write_field(&self, object: &mut JsonObject, name: &str) {
        match self {
            TenantScope::NotConsidered => {}
            TenantScope::WithoutTenant => add_null_field(object, name),
            TenantScope::Tenant(id) => add_string(object, name, id),
        }
    }

    pub fn read_field(object: &JsonObject, name: &str) -> ConfigResult<Self> {
        match object.get(name) {
            None => Ok(TenantScope::NotConsidered),
            Some(serde_json::Value::Null) => Ok(TenantScope::WithoutTenant),
            Some(serde_json::Value::String(id)) => Ok(TenantScope::Tenant(id.clone())),
            Some(_) => Err(ConfigError::invalid_type(name, "a string or null")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    const FIELD: &str = "processDefinitionTenantId";

    #[test]
    fn not_considered_leaves_field_absent() {
        let mut obj = JsonObject::new();
        TenantScope::NotConsidered.write_field(&mut obj, FIELD);
        assert!(!obj.contains_key(FIELD));
    }

    #[test]
    fn without_tenant_writes_explicit_null() {
        let mut obj = JsonObject::new();
        TenantScope::WithoutTenant.write_field(&mut obj, FIELD);
        assert_eq!(obj.get(FIELD), Some(&Value::Null));
    }

    #[test]
    fn non_string_tenant_is_rejected() {
        let mut obj = JsonObject::new();
        obj.insert(FIELD.to_string(), Value::Bool(true));
        assert!(TenantScope::read_field(&obj, FIELD).is_err());
    }

    #[test]
    fn explicit_none_is_without_tenant() {
        assert_eq!(TenantScope::explicit(None), TenantScope::WithoutTenant);
        assert!(TenantScope::explicit(None).is_set());
        assert_eq!(TenantScope::tenant("t1").tenant_id(), Some("t1"));
        assert!(!TenantScope::default().is_set());
    }

    fn scope_strategy() -> impl Strategy<Value = TenantScope> {
        prop_oneof![
            Just(TenantScope::NotConsidered),
            Just(TenantScope::WithoutTenant),
            ".*".prop_map(TenantScope::Tenant),
        ]
    }

    proptest! {
        /// Property: all three states survive a write/read cycle distinguishably.
        #[test]
        fn tri_state_round_trips(scope in scope_strategy()) {
            let mut obj = JsonObject::new();
            scope.write_field(&mut obj, FIELD);
            prop_assert_eq!(TenantScope::read_field(&obj, FIELD).unwrap(), scope);
        }
    }
}
