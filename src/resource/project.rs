//! Project resource handler
//!
//! The four lifecycle entry points (plus import) that reconcile a desired
//! [`ProjectAttributes`] against the remote project collection. Every entry
//! point returns a freshly built [`ProjectState`]; the caller owns merging it
//! into whatever it keeps locally.
//!
//! Lookups by name rely on AWX keeping `(name, organization)` unique. When
//! more than one record matches, the first one wins and a warning is logged.

use super::error::{parse_identity, Lookup, ResourceError, ResourceResult};
use super::state::{ProjectAttributes, ProjectState};
use crate::awx::projects::{Project, ProjectApi, ProjectFilter};

/// Lifecycle handler for the project resource
pub struct ProjectResourceHandler<A> {
    api: A,
}

impl<A: ProjectApi> ProjectResourceHandler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying API client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create a project, refusing to shadow an existing one with the same
    /// name in the same organization, then read it back.
    pub async fn create(&self, desired: &ProjectAttributes) -> ResourceResult<ProjectState> {
        let existing = self
            .api
            .list_projects(&ProjectFilter::by_name(
                &desired.name,
                desired.organization_id,
            ))
            .await?;

        if !existing.is_empty() {
            return Err(ResourceError::DuplicateResource {
                name: desired.name.clone(),
                organization_id: desired.organization_id,
            });
        }

        let created = self.api.create_project(&desired.to_request()).await?;
        tracing::info!(
            "Created project {} ({}) in organization {}",
            created.id,
            desired.name,
            desired.organization_id
        );

        let mut state = self.read(&desired.name, desired.organization_id).await?;
        state.id = created.id.to_string();
        Ok(state)
    }

    /// Read the current state of a project by name and organization
    pub async fn read(&self, name: &str, organization_id: i64) -> ResourceResult<ProjectState> {
        let projects = self
            .api
            .list_projects(&ProjectFilter::by_name(name, organization_id))
            .await?;

        let project = first_match(&projects, || format!("name {}", name)).ok_or_else(|| {
            ResourceError::NotFound {
                lookup: Lookup::Name(name.to_string()),
                organization_id,
            }
        })?;

        Ok(ProjectState::from_remote(project)?)
    }

    /// Replace every attribute of the project `id` with `desired`, then
    /// read it back.
    pub async fn update(&self, id: &str, desired: &ProjectAttributes) -> ResourceResult<ProjectState> {
        let remote_id = parse_identity(id)?;
        self.ensure_exists(remote_id, desired.organization_id)
            .await?;

        self.api
            .update_project(remote_id, &desired.to_request())
            .await?;
        tracing::info!("Updated project {} ({})", remote_id, desired.name);

        let mut state = self.read(&desired.name, desired.organization_id).await?;
        state.id = remote_id.to_string();
        Ok(state)
    }

    /// Delete the project `id`. The caller clears its identity afterwards.
    pub async fn delete(&self, id: &str, organization_id: i64) -> ResourceResult<()> {
        let remote_id = parse_identity(id)?;
        self.ensure_exists(remote_id, organization_id).await?;

        self.api.delete_project(remote_id).await?;
        tracing::info!(
            "Deleted project {} from organization {}",
            remote_id,
            organization_id
        );
        Ok(())
    }

    /// Reconstruct the full state of a project from its bare id
    pub async fn import(&self, id: &str) -> ResourceResult<ProjectState> {
        let remote_id = parse_identity(id)?;
        let projects = self
            .api
            .list_projects(&ProjectFilter::by_id(remote_id, None))
            .await?;

        let project = first_match(&projects, || format!("id {}", remote_id))
            .ok_or(ResourceError::NotFoundById(remote_id))?;

        tracing::info!("Imported project {} ({})", remote_id, project.name);
        Ok(ProjectState::from_remote(project)?)
    }

    async fn ensure_exists(&self, id: i64, organization_id: i64) -> ResourceResult<()> {
        let projects = self
            .api
            .list_projects(&ProjectFilter::by_id(id, Some(organization_id)))
            .await?;

        if projects.is_empty() {
            return Err(ResourceError::NotFound {
                lookup: Lookup::Id(id),
                organization_id,
            });
        }
        Ok(())
    }
}

fn first_match<'a>(projects: &'a [Project], describe: impl Fn() -> String) -> Option<&'a Project> {
    if projects.len() > 1 {
        tracing::warn!(
            "{} projects match {}, using the first one (id {})",
            projects.len(),
            describe(),
            projects[0].id
        );
    }
    projects.first()
}
