//! Project resource
//!
//! The `awx_project` resource: its schema, its state documents, and the
//! lifecycle handler that reconciles them against AWX.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute definitions, defaults and operation timeouts
//! - [`state`] - Typed desired/current state and document loading
//! - [`project`] - Create/read/update/delete/import handlers
//! - [`error`] - Error kinds surfaced to the caller
//!
//! # Example
//!
//! ```ignore
//! use tawx::resource::{ProjectResourceHandler, ProjectAttributes};
//!
//! async fn apply(handler: &ProjectResourceHandler<AwxClient>, desired: &ProjectAttributes) {
//!     let state = handler.create(desired).await?;
//!     println!("created {}", state.id);
//! }
//! ```

pub mod error;
pub mod project;
pub mod schema;
pub mod state;

use std::fmt;
use std::future::Future;

pub use error::{ResourceError, ResourceResult};
pub use project::ProjectResourceHandler;
pub use schema::{project_schema, ResourceSchema, ResourceTimeouts};
pub use state::{ProjectAttributes, ProjectState};

/// Lifecycle operation, used for deadlines and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        };
        f.write_str(name)
    }
}

/// Run an operation under the deadline the schema assigns to it
pub async fn run_with_deadline<T, F>(
    timeouts: &ResourceTimeouts,
    operation: Operation,
    future: F,
) -> ResourceResult<T>
where
    F: Future<Output = ResourceResult<T>>,
{
    let Some(after) = timeouts.for_operation(operation) else {
        return future.await;
    };

    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("{} did not finish within {:?}", operation, after);
            Err(ResourceError::Timeout { operation, after })
        }
    }
}
