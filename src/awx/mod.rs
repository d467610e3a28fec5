//! AWX API interaction module
//!
//! This module provides the core functionality for talking to the AWX REST
//! API: authentication, the HTTP client, and project management.
//!
//! # Module Structure
//!
//! - [`auth`] - Token or basic-auth credentials
//! - [`client`] - Main AWX client and URL builders
//! - [`http`] - HTTP utilities for REST API calls
//! - [`projects`] - Project records and the [`projects::ProjectApi`] trait
//!
//! # Example
//!
//! ```ignore
//! use tawx::awx::{auth::AwxCredentials, client::AwxClient, projects::{ProjectApi, ProjectFilter}};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = AwxClient::new("https://awx.example.com", AwxCredentials::Token("t".into()), false)?;
//!     let projects = client.list_projects(&ProjectFilter::by_name("infra", 3)).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
