//! Shared data layer for EduPrivacy admin tooling
//!
//! This crate provides the domain types, the PostgREST client for the hosted
//! database, and the backend trait the admin commands are written against.

pub mod backend;
pub mod error;
pub mod postgrest;
pub mod types;

pub use backend::MigrationBackend;
pub use error::{DataError, Result};
pub use postgrest::PostgrestClient;
pub use types::{OrgSchemaStatus, Organization};
