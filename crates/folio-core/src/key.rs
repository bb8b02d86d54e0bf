//! Cache key space for remote resources.

use serde::{Deserialize, Serialize};

use crate::context::ViewerContext;

/// Stable identity of a logical remote resource.
///
/// Each variant maps to exactly one cache key and one read endpoint, so a
/// role switch on the profile always lands on a different key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    /// The owner's own profile, read by admins.
    MyProfile,
    /// The public profile, read by everyone else.
    PublicProfile,
    /// The ordered project collection.
    Projects,
}

impl ResourceKey {
    /// Every key this layer uses.
    pub const ALL: [ResourceKey; 3] = [Self::MyProfile, Self::PublicProfile, Self::Projects];

    /// Profile key for a viewer: admins read their own profile.
    pub fn profile_for(viewer: ViewerContext) -> Self {
        if viewer.is_admin() {
            Self::MyProfile
        } else {
            Self::PublicProfile
        }
    }

    /// Projects key. Role independent.
    pub fn projects() -> Self {
        Self::Projects
    }

    /// Cache key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MyProfile => "profile/me",
            Self::PublicProfile => "profile/public",
            Self::Projects => "projects",
        }
    }

    /// Read endpoint path, relative to the API base.
    pub fn path(&self) -> &'static str {
        match self {
            Self::MyProfile => "/profile/me",
            Self::PublicProfile => "/profile",
            Self::Projects => "/projects",
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
