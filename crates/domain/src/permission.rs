use std::collections::{BTreeMap, HashMap};

use fieldops_core::{AppError, AppResult, RoleId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ConsoleComponent, PermissionAction};

/// One feature record from the backend permission payload.
///
/// Action flags are kept in their wire form. Attributes that are not
/// booleans, such as backend ids, are carried verbatim but never grant
/// anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRecord {
    component: String,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl PermissionRecord {
    /// Creates a record from a component name and boolean action flags.
    #[must_use]
    pub fn new<'a>(
        component: impl Into<String>,
        flags: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Self {
        Self {
            component: component.into(),
            attributes: flags
                .into_iter()
                .map(|(action, granted)| (action.to_owned(), Value::Bool(granted)))
                .collect(),
        }
    }

    /// Returns the component name as sent by the backend.
    #[must_use]
    pub fn component(&self) -> &str {
        self.component.as_str()
    }

    /// Returns whether the named action flag is present and `true`.
    #[must_use]
    pub fn allows(&self, action: &str) -> bool {
        matches!(self.attributes.get(action), Some(Value::Bool(true)))
    }

    /// Returns the actions this record grants among the known actions.
    #[must_use]
    pub fn granted_actions(&self) -> Vec<PermissionAction> {
        PermissionAction::all()
            .iter()
            .copied()
            .filter(|action| self.allows(action.as_str()))
            .collect()
    }
}

/// Permission cache record persisted in durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPermissions {
    /// Role the features were fetched for.
    pub role_id: RoleId,
    /// Feature records exactly as fetched.
    pub features: Vec<PermissionRecord>,
}

/// Ordered permission records for one role with unique component names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PermissionSet {
    role_id: Option<RoleId>,
    records: Vec<PermissionRecord>,
    index: HashMap<String, usize>,
}

impl PermissionSet {
    /// Creates a validated permission set.
    ///
    /// Fails when a component name is blank or appears more than once.
    pub fn new(role_id: RoleId, records: Vec<PermissionRecord>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if record.component.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "permission record at position {position} has a blank component name"
                )));
            }

            if index.insert(record.component.clone(), position).is_some() {
                return Err(AppError::Validation(format!(
                    "duplicate permission record for component '{}'",
                    record.component
                )));
            }
        }

        Ok(Self {
            role_id: Some(role_id),
            records,
            index,
        })
    }

    /// Returns the set granted to a session without a role.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Restores a set from its cache record.
    pub fn from_cache(cached: CachedPermissions) -> AppResult<Self> {
        Self::new(cached.role_id, cached.features)
    }

    /// Returns the cache record for this set, if it belongs to a role.
    #[must_use]
    pub fn to_cache(&self) -> Option<CachedPermissions> {
        self.role_id.clone().map(|role_id| CachedPermissions {
            role_id,
            features: self.records.clone(),
        })
    }

    /// Returns the role the set was fetched for.
    #[must_use]
    pub fn role_id(&self) -> Option<&RoleId> {
        self.role_id.as_ref()
    }

    /// Returns the records in backend order.
    #[must_use]
    pub fn records(&self) -> &[PermissionRecord] {
        self.records.as_slice()
    }

    /// Returns whether the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds the record for an exact, case-sensitive component name.
    #[must_use]
    pub fn record(&self, component: &str) -> Option<&PermissionRecord> {
        self.index
            .get(component)
            .and_then(|position| self.records.get(*position))
    }

    /// Returns whether the component name grants the action name.
    #[must_use]
    pub fn allows_named(&self, component: &str, action: &str) -> bool {
        self.record(component)
            .is_some_and(|record| record.allows(action))
    }

    /// Returns whether a known component grants a known action.
    #[must_use]
    pub fn allows(&self, component: ConsoleComponent, action: PermissionAction) -> bool {
        self.allows_named(component.as_str(), action.as_str())
    }

    /// Returns backend component names outside the known registry.
    #[must_use]
    pub fn unrecognized_components(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(PermissionRecord::component)
            .filter(|component| component.parse::<ConsoleComponent>().is_err())
            .collect()
    }
}
