use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Role reference carried by the signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleReference {
    /// Backend role identifier, possibly blank in legacy sessions.
    pub id: String,
    /// Human-readable role name.
    #[serde(default)]
    pub name: String,
}

/// User session persisted in durable storage after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    token: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    role: Option<RoleReference>,
}

impl UserSession {
    /// Creates a session from an authentication token and optional role.
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        display_name: impl Into<String>,
        role: Option<RoleReference>,
    ) -> Self {
        Self {
            token: token.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// Returns the opaque bearer token issued at login.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the display name for the signed-in user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the role reference, if the session carries one.
    #[must_use]
    pub fn role(&self) -> Option<&RoleReference> {
        self.role.as_ref()
    }

    /// Returns the validated role id, or `None` when missing or blank.
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        self.role
            .as_ref()
            .and_then(|role| RoleId::new(role.id.as_str()).ok())
    }
}
