use std::fmt::{Display, Formatter};
use std::str::FromStr;

use fieldops_core::AppError;
use serde::{Deserialize, Serialize};

/// Console components whose access is governed by role permissions.
///
/// The backend sends arbitrary component names; this enumeration is the set
/// the console recognizes and queries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConsoleComponent {
    /// Landing dashboard.
    Dashboard,
    /// User administration.
    User,
    /// Role administration.
    Role,
    /// Dealer directory.
    Dealer,
    /// Customer directory.
    Customer,
    /// Equipment registry.
    Equipment,
    /// Equipment spreadsheet import wizard.
    EquipmentBulkUpload,
    /// Sales proposals.
    Proposal,
    /// Quote approval queue.
    QuoteApproval,
    /// On-call service tickets.
    OnCall,
}

impl ConsoleComponent {
    /// Returns the component name used in backend permission payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::User => "User",
            Self::Role => "Role",
            Self::Dealer => "Dealer",
            Self::Customer => "Customer",
            Self::Equipment => "Equipment",
            Self::EquipmentBulkUpload => "Equipment Bulk Upload",
            Self::Proposal => "Proposal",
            Self::QuoteApproval => "Quote Approval",
            Self::OnCall => "On Call",
        }
    }

    /// Returns all known components.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ConsoleComponent] = &[
            ConsoleComponent::Dashboard,
            ConsoleComponent::User,
            ConsoleComponent::Role,
            ConsoleComponent::Dealer,
            ConsoleComponent::Customer,
            ConsoleComponent::Equipment,
            ConsoleComponent::EquipmentBulkUpload,
            ConsoleComponent::Proposal,
            ConsoleComponent::QuoteApproval,
            ConsoleComponent::OnCall,
        ];

        ALL
    }
}

impl Display for ConsoleComponent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ConsoleComponent {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|component| component.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown console component '{value}'")))
    }
}

/// Named actions a permission record can grant on a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// View the component. Default action for navigation and routes.
    #[default]
    Read,
    /// Create new items.
    Create,
    /// Modify existing items.
    Write,
    /// Remove items.
    Delete,
    /// Approve pending items such as quotes.
    Approve,
    /// Export listings.
    Export,
}

impl PermissionAction {
    /// Returns the action flag name used in backend permission payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Export => "export",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::Read,
            PermissionAction::Create,
            PermissionAction::Write,
            PermissionAction::Delete,
            PermissionAction::Approve,
            PermissionAction::Export,
        ];

        ALL
    }
}

impl Display for PermissionAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "create" => Ok(Self::Create),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            "approve" => Ok(Self::Approve),
            "export" => Ok(Self::Export),
            _ => Err(AppError::Validation(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}
