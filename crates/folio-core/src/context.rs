//! Viewer capability passed into every section.

use serde::{Deserialize, Serialize};

/// Role of the person looking at the page.
///
/// Resolved by an external auth layer; this crate only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    /// Anonymous or non-owner visitor.
    #[default]
    Visitor,
    /// Portfolio owner with editing rights.
    Admin,
}

impl std::fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visitor => write!(f, "visitor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Explicit capability value threaded into each section by parameter.
///
/// It gates which affordances render. It is never stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewerContext {
    role: ViewerRole,
}

impl ViewerContext {
    /// Create a context for the given role.
    pub fn new(role: ViewerRole) -> Self {
        Self { role }
    }

    /// Context for a non-admin visitor.
    pub fn visitor() -> Self {
        Self::new(ViewerRole::Visitor)
    }

    /// Context for the portfolio owner.
    pub fn admin() -> Self {
        Self::new(ViewerRole::Admin)
    }

    /// Build from an already-resolved admin flag.
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Self::admin()
        } else {
            Self::visitor()
        }
    }

    /// The viewer's role.
    pub fn role(&self) -> ViewerRole {
        self.role
    }

    /// Whether edit affordances may be shown.
    pub fn is_admin(&self) -> bool {
        self.role == ViewerRole::Admin
    }
}
