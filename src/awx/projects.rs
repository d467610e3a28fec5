//! AWX Projects
//!
//! Listing, creation, update and deletion of AWX projects.

use super::client::AwxClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Source control backend of a project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    /// Playbooks are placed in `local_path` by hand
    #[default]
    #[serde(rename = "")]
    Manual,
    Git,
    Hg,
    Svn,
}

impl ScmType {
    pub const ALL: [ScmType; 4] = [ScmType::Manual, ScmType::Git, ScmType::Hg, ScmType::Svn];

    /// Value used on the wire and in state files
    pub fn as_str(&self) -> &'static str {
        match self {
            ScmType::Manual => "",
            ScmType::Git => "git",
            ScmType::Hg => "hg",
            ScmType::Svn => "svn",
        }
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Manual => f.write_str("manual"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Project record as returned by the AWX API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub local_path: String,
    #[serde(default)]
    pub scm_type: ScmType,
    #[serde(default)]
    pub scm_url: String,
    #[serde(default)]
    pub scm_branch: String,
    #[serde(default)]
    pub scm_clean: bool,
    #[serde(default)]
    pub scm_delete_on_update: bool,
    #[serde(default)]
    pub credential: Option<i64>,
    #[serde(default)]
    pub organization: Option<i64>,
    #[serde(default)]
    pub scm_update_on_launch: bool,
    #[serde(default)]
    pub scm_update_cache_timeout: i64,
}

/// Full attribute payload for create and update calls.
/// Every field is always sent; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
    pub local_path: String,
    pub scm_type: ScmType,
    pub scm_url: String,
    pub scm_branch: String,
    pub scm_clean: bool,
    pub scm_delete_on_update: bool,
    /// Serialized as `null` when absent, never as 0
    pub credential: Option<i64>,
    pub organization: Option<i64>,
    pub scm_update_on_launch: bool,
    pub scm_update_cache_timeout: i64,
}

/// Exact-match filter for project listing (field name to string value)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub organization: Option<i64>,
}

impl ProjectFilter {
    pub fn by_name(name: &str, organization: i64) -> Self {
        Self {
            name: Some(name.to_string()),
            organization: Some(organization),
            ..Default::default()
        }
    }

    pub fn by_id(id: i64, organization: Option<i64>) -> Self {
        Self {
            id: Some(id),
            organization,
            ..Default::default()
        }
    }

    /// Query parameters understood by the AWX list endpoint
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.id {
            query.push(("id", id.to_string()));
        }
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
        }
        if let Some(organization) = self.organization {
            query.push(("organization", organization.to_string()));
        }
        query
    }

    /// Whether a project satisfies this filter
    pub fn matches(&self, project: &Project) -> bool {
        self.id.map_or(true, |id| project.id == id)
            && self.name.as_deref().map_or(true, |n| project.name == n)
            && self
                .organization
                .map_or(true, |o| project.organization == Some(o))
    }
}

/// One page of a list response
#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Vec<Project>,
}

/// Remote operations on the project collection
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// List every project matching the filter, across all pages
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>>;

    /// Create a project and return the stored record
    async fn create_project(&self, request: &ProjectRequest) -> Result<Project>;

    /// Replace every attribute of a project
    async fn update_project(&self, id: i64, request: &ProjectRequest) -> Result<Project>;

    /// Delete a project
    async fn delete_project(&self, id: i64) -> Result<()>;
}

fn to_body(request: &ProjectRequest) -> Result<Value> {
    serde_json::to_value(request).context("Failed to encode project request")
}

#[async_trait]
impl ProjectApi for AwxClient {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let mut projects = Vec::new();

        let first = self.get(&self.projects_url(), &filter.to_query()).await?;
        let mut page: ListPage =
            serde_json::from_value(first).context("Failed to parse project list")?;

        loop {
            projects.extend(page.results);

            let Some(next) = page.next else {
                break;
            };
            // The next link already carries the filter and page number
            let url = self.resolve_link(&next)?;
            let response = self.get(&url, &[]).await?;
            page = serde_json::from_value(response).context("Failed to parse project list")?;
        }

        tracing::debug!("Listed {} projects for {:?}", projects.len(), filter);
        Ok(projects)
    }

    async fn create_project(&self, request: &ProjectRequest) -> Result<Project> {
        let response = self.post(&self.projects_url(), &to_body(request)?).await?;
        serde_json::from_value(response).context("Failed to parse created project")
    }

    async fn update_project(&self, id: i64, request: &ProjectRequest) -> Result<Project> {
        let response = self.put(&self.project_url(id), &to_body(request)?).await?;
        serde_json::from_value(response).context("Failed to parse updated project")
    }

    async fn delete_project(&self, id: i64) -> Result<()> {
        self.delete(&self.project_url(id)).await?;
        Ok(())
    }
}
