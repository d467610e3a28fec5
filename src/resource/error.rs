use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

use super::Operation;

/// Errors returned by the project lifecycle handlers
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Transport or API failure, passed through unchanged
    #[error(transparent)]
    Remote(#[from] anyhow::Error),

    #[error("Project with name {name} already exists in the organization {organization_id}")]
    DuplicateResource { name: String, organization_id: i64 },

    #[error("Project {lookup} doesn't exist in the organization {organization_id}")]
    NotFound { lookup: Lookup, organization_id: i64 },

    #[error("Project with id {0} doesn't exist")]
    NotFoundById(i64),

    #[error("Invalid project id {id:?}: {source}")]
    IdentityParse {
        id: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout { operation: Operation, after: Duration },
}

/// What a failed lookup searched for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Name(String),
    Id(i64),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Name(name) => write!(f, "with name {}", name),
            Lookup::Id(id) => write!(f, "with id {}", id),
        }
    }
}

pub type ResourceResult<T> = Result<T, ResourceError>;

/// Parse the string identity kept in state into the remote integer id
pub fn parse_identity(id: &str) -> ResourceResult<i64> {
    id.trim()
        .parse()
        .map_err(|source| ResourceError::IdentityParse {
            id: id.to_string(),
            source,
        })
}
