//! Desired and current state of a project
//!
//! [`ProjectAttributes`] is what an operator writes; [`ProjectState`] is what
//! the handlers return. Both use the same field names and are read from
//! YAML or JSON, so a printed state can be fed back as input.
//!
//! Organization and credential references are integers on the AWX side but
//! strings in state files, where an empty string means "no reference".
//! They are validated here, before any remote call is made.

use crate::awx::projects::{Project, ProjectRequest, ScmType};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Desired attributes of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAttributes {
    #[serde(deserialize_with = "non_empty")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub local_path: String,
    pub scm_type: ScmType,
    #[serde(default)]
    pub scm_url: String,
    #[serde(default)]
    pub scm_branch: String,
    #[serde(default)]
    pub scm_clean: bool,
    #[serde(default)]
    pub scm_delete_on_update: bool,
    #[serde(default, with = "optional_reference")]
    pub credential_id: Option<i64>,
    #[serde(with = "reference")]
    pub organization_id: i64,
    #[serde(default)]
    pub scm_update_on_launch: bool,
    #[serde(default)]
    pub scm_update_cache_timeout: i64,
}

impl ProjectAttributes {
    /// Minimal attribute set; everything optional takes its default
    pub fn new(name: &str, scm_type: ScmType, organization_id: i64) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            local_path: String::new(),
            scm_type,
            scm_url: String::new(),
            scm_branch: String::new(),
            scm_clean: false,
            scm_delete_on_update: false,
            credential_id: None,
            organization_id,
            scm_update_on_launch: false,
            scm_update_cache_timeout: 0,
        }
    }

    /// Full payload for a create or update call
    pub fn to_request(&self) -> ProjectRequest {
        ProjectRequest {
            name: self.name.clone(),
            description: self.description.clone(),
            local_path: self.local_path.clone(),
            scm_type: self.scm_type,
            scm_url: self.scm_url.clone(),
            scm_branch: self.scm_branch.clone(),
            scm_clean: self.scm_clean,
            scm_delete_on_update: self.scm_delete_on_update,
            credential: self.credential_id,
            organization: Some(self.organization_id),
            scm_update_on_launch: self.scm_update_on_launch,
            scm_update_cache_timeout: self.scm_update_cache_timeout,
        }
    }
}

/// Current state of a project: its identity plus every attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Remote id as a string; empty once the project is deleted
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub attributes: ProjectAttributes,
}

impl ProjectState {
    /// Build a state from a remote record
    pub fn from_remote(project: &Project) -> Result<Self> {
        let organization_id = project
            .organization
            .with_context(|| format!("Project {} is not assigned to an organization", project.id))?;

        Ok(Self {
            id: project.id.to_string(),
            attributes: ProjectAttributes {
                name: project.name.clone(),
                description: project.description.clone(),
                local_path: project.local_path.clone(),
                scm_type: project.scm_type,
                scm_url: project.scm_url.clone(),
                scm_branch: project.scm_branch.clone(),
                scm_clean: project.scm_clean,
                scm_delete_on_update: project.scm_delete_on_update,
                credential_id: project.credential,
                organization_id,
                scm_update_on_launch: project.scm_update_on_launch,
                scm_update_cache_timeout: project.scm_update_cache_timeout,
            },
        })
    }

    /// Same state with the identity cleared
    pub fn cleared(mut self) -> Self {
        self.id.clear();
        self
    }
}

/// Load a state or attribute document from a YAML or JSON file
pub fn load_document<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_document(&content).with_context(|| format!("Invalid project document {}", path.display()))
}

/// Parse a YAML or JSON document (YAML is a superset of JSON)
pub fn parse_document<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    Ok(serde_yaml::from_str(content)?)
}

/// Either form a reference may take in a document
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Number(i64),
    Text(String),
}

fn parse_reference(text: &str) -> std::result::Result<Option<i64>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|e| format!("invalid reference {:?}: {}", text, e))
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(serde::de::Error::custom("must not be empty"));
    }
    Ok(value)
}

/// Optional integer reference kept as a string ("" when absent)
mod optional_reference {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => serializer.serialize_str(&id.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        match Option::<RawReference>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawReference::Number(id)) => Ok(Some(id)),
            Some(RawReference::Text(text)) => {
                parse_reference(&text).map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Required integer reference kept as a string
mod reference {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match RawReference::deserialize(deserializer)? {
            RawReference::Number(id) => Ok(id),
            RawReference::Text(text) => parse_reference(&text)
                .map_err(serde::de::Error::custom)?
                .ok_or_else(|| serde::de::Error::custom("reference must not be empty")),
        }
    }
}
