//! In-memory AWX project collection shared by the integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tawx::awx::projects::{Project, ProjectApi, ProjectFilter, ProjectRequest};
use tokio::sync::RwLock;

/// In-memory implementation of ProjectApi, ordered by id like the AWX list endpoint
#[derive(Debug, Clone)]
pub struct InMemoryProjects {
    projects: Arc<RwLock<BTreeMap<i64, Project>>>,
    next_id: Arc<RwLock<i64>>,
}

impl InMemoryProjects {
    /// Ids are handed out starting at `first_id`
    pub fn starting_at(first_id: i64) -> Self {
        Self {
            projects: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(RwLock::new(first_id)),
        }
    }

    pub async fn get(&self, id: i64) -> Option<Project> {
        self.projects.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    /// Insert a record directly, bypassing any checks
    pub async fn seed(&self, id: i64, request: &ProjectRequest) {
        self.projects
            .write()
            .await
            .insert(id, to_project(id, request));
    }

    /// Snapshot of every stored record
    pub async fn snapshot(&self) -> Vec<Project> {
        self.projects.read().await.values().cloned().collect()
    }
}

impl Default for InMemoryProjects {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

fn to_project(id: i64, request: &ProjectRequest) -> Project {
    Project {
        id,
        name: request.name.clone(),
        description: request.description.clone(),
        local_path: request.local_path.clone(),
        scm_type: request.scm_type,
        scm_url: request.scm_url.clone(),
        scm_branch: request.scm_branch.clone(),
        scm_clean: request.scm_clean,
        scm_delete_on_update: request.scm_delete_on_update,
        credential: request.credential,
        organization: request.organization,
        scm_update_on_launch: request.scm_update_on_launch,
        scm_update_cache_timeout: request.scm_update_cache_timeout,
    }
}

#[async_trait]
impl ProjectApi for InMemoryProjects {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn create_project(&self, request: &ProjectRequest) -> Result<Project> {
        let mut next_id = self.next_id.write().await;
        let id = *next_id;
        *next_id += 1;

        let project = to_project(id, request);
        self.projects.write().await.insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: i64, request: &ProjectRequest) -> Result<Project> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&id) {
            return Err(anyhow!("API request failed: 404 Not Found"));
        }
        let project = to_project(id, request);
        projects.insert(id, project.clone());
        Ok(project)
    }

    async fn delete_project(&self, id: i64) -> Result<()> {
        match self.projects.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(anyhow!("API request failed: 404 Not Found")),
        }
    }
}
