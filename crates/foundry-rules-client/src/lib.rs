//! HTTP client for the ontology REST API.
//!
//! Covers the three calls the proposal workflow needs:
//!
//! - **Actions**: apply a named action with parameters
//! - **Objects**: paginated search and lookup by primary key
//!
//! Non-success responses surface as [`Error::Api`] carrying the status and
//! raw body.

pub mod api;
pub mod client;
pub mod error;

pub use api::{ActionsApi, ObjectsApi, SearchQuery};
pub use client::{ClientBuilder, FoundryClient};
pub use error::{Error, Result};
