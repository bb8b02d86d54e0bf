//! Portfolio payloads.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FetchError, ValidationError};

/// Unique project identifier. Accepts JSON numbers or strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for ProjectId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireId::deserialize(deserializer)? {
            WireId::Number(n) => ProjectId::from(n),
            WireId::Text(s) => ProjectId(s),
        })
    }
}

// Treats an explicit `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The portfolio owner's profile. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl Profile {
    /// Name, if present and non-blank.
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    /// Title, if present and non-blank.
    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    /// Photo URL, if present and non-blank.
    pub fn image_url(&self) -> Option<&str> {
        present(&self.profile_image_url)
    }

    // Blank strings count as absent so defaults apply.
    fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|s| !s.trim().is_empty()),
            title: self.title.filter(|s| !s.trim().is_empty()),
            profile_image_url: self.profile_image_url.filter(|s| !s.trim().is_empty()),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// A portfolio project. Only `id` is required; other fields default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: String,
    /// Display order matters; duplicates are kept.
    #[serde(default, deserialize_with = "nullable")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub project_url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub github_url: String,
}

impl Project {
    /// Create a project with only an id and title set.
    pub fn new(id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image_url: String::new(),
            technologies: Vec::new(),
            project_url: String::new(),
            github_url: String::new(),
        }
    }
}

/// A typed resource decoded and validated from a raw cache entry.
pub trait Payload: Sized {
    fn from_json(value: &Value) -> Result<Self, FetchError>;
}

impl Payload for Profile {
    fn from_json(value: &Value) -> Result<Self, FetchError> {
        match value {
            // No profile stored yet: every field falls back to its default.
            Value::Null => Ok(Profile::default()),
            Value::Object(_) => {
                let profile: Profile = serde_json::from_value(value.clone())?;
                Ok(profile.normalized())
            }
            _ => Err(ValidationError::NotAnObject.into()),
        }
    }
}

impl Payload for Vec<Project> {
    fn from_json(value: &Value) -> Result<Self, FetchError> {
        let items = value.as_array().ok_or(ValidationError::NotAnArray)?;
        let mut seen = HashSet::with_capacity(items.len());
        let mut projects = Vec::with_capacity(items.len());

        for item in items {
            let object = item.as_object().ok_or(ValidationError::NotAnObject)?;
            if object.get("id").map_or(true, Value::is_null) {
                return Err(ValidationError::MissingField("id").into());
            }

            let project: Project = serde_json::from_value(item.clone())?;
            if !seen.insert(project.id.clone()) {
                return Err(ValidationError::DuplicateProjectId(project.id.to_string()).into());
            }
            projects.push(project);
        }

        Ok(projects)
    }
}
