//! Declarative management of AWX projects.
//!
//! A project is described by a YAML or JSON document; the
//! [`resource::ProjectResourceHandler`] creates, reads, updates, deletes
//! and imports it through the AWX REST API ([`awx`]).

pub mod awx;
pub mod config;
pub mod resource;

/// Version injected at compile time via TAWX_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TAWX_VERSION") {
    Some(v) => v,
    None => "dev",
};
