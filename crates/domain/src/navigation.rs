use std::collections::HashSet;

use fieldops_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::ConsoleComponent;

/// One sidebar entry guarded by a console component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    label: NonEmptyString,
    path: NonEmptyString,
    component: ConsoleComponent,
    position: i32,
}

impl NavigationItem {
    /// Creates a validated navigation item.
    pub fn new(
        label: impl Into<String>,
        path: impl Into<String>,
        component: ConsoleComponent,
        position: i32,
    ) -> AppResult<Self> {
        if position < 0 {
            return Err(AppError::Validation(
                "position must be greater than or equal to zero".to_owned(),
            ));
        }

        let path = NonEmptyString::new(path)?;
        if !path.as_str().starts_with('/') {
            return Err(AppError::Validation(format!(
                "navigation path '{}' must start with '/'",
                path.as_str()
            )));
        }

        Ok(Self {
            label: NonEmptyString::new(label)?,
            path,
            component,
            position,
        })
    }

    /// Returns the sidebar label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &NonEmptyString {
        &self.path
    }

    /// Returns the component that must be readable for the item to show.
    #[must_use]
    pub fn component(&self) -> ConsoleComponent {
        self.component
    }

    /// Returns sidebar ordering value.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Ordered sidebar catalog with unique route paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCatalog {
    items: Vec<NavigationItem>,
}

impl NavigationCatalog {
    /// Creates a catalog ordered by position, then path.
    pub fn new(items: Vec<NavigationItem>) -> AppResult<Self> {
        let mut seen_paths = HashSet::new();
        for item in &items {
            if !seen_paths.insert(item.path.as_str().to_owned()) {
                return Err(AppError::Validation(format!(
                    "duplicate navigation path '{}'",
                    item.path.as_str()
                )));
            }
        }

        let mut items = items;
        items.sort_by(|left, right| {
            left.position
                .cmp(&right.position)
                .then_with(|| left.path.as_str().cmp(right.path.as_str()))
        });

        Ok(Self { items })
    }

    /// Returns the sidebar used by the field service console.
    pub fn console_default() -> AppResult<Self> {
        Self::new(vec![
            NavigationItem::new("Dashboard", "/dashboard", ConsoleComponent::Dashboard, 0)?,
            NavigationItem::new("Proposals", "/proposals", ConsoleComponent::Proposal, 10)?,
            NavigationItem::new(
                "Quote Approvals",
                "/quote-approvals",
                ConsoleComponent::QuoteApproval,
                20,
            )?,
            NavigationItem::new("On Call", "/on-call", ConsoleComponent::OnCall, 30)?,
            NavigationItem::new("Equipment", "/equipment", ConsoleComponent::Equipment, 40)?,
            NavigationItem::new(
                "Bulk Upload",
                "/equipment/bulk-upload",
                ConsoleComponent::EquipmentBulkUpload,
                50,
            )?,
            NavigationItem::new("Customers", "/customers", ConsoleComponent::Customer, 60)?,
            NavigationItem::new("Dealers", "/dealers", ConsoleComponent::Dealer, 70)?,
            NavigationItem::new("Users", "/users", ConsoleComponent::User, 80)?,
            NavigationItem::new("Roles", "/roles", ConsoleComponent::Role, 90)?,
        ])
    }

    /// Returns items in sidebar order.
    #[must_use]
    pub fn items(&self) -> &[NavigationItem] {
        self.items.as_slice()
    }

    /// Finds the item routed at an exact path.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<&NavigationItem> {
        let path = path.trim_end_matches('/');
        self.items
            .iter()
            .find(|item| item.path.as_str().trim_end_matches('/') == path)
    }
}
