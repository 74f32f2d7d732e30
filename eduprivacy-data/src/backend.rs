use async_trait::async_trait;

use crate::error::Result;
use crate::types::{OrgSchemaStatus, Organization};

/// The remote query/RPC surface the admin commands drive.
///
/// Implemented by [`crate::PostgrestClient`] against the hosted database and
/// by in-memory fakes in command tests. The three RPCs are opaque server-side
/// logic; success or error is the only observable outcome here.
#[async_trait]
pub trait MigrationBackend {
    /// Organizations ordered by creation time, oldest first.
    async fn fetch_organizations(&self, limit: Option<u32>) -> Result<Vec<Organization>>;

    /// Every organization's derived schema name and existence flag.
    async fn fetch_schema_statuses(&self) -> Result<Vec<OrgSchemaStatus>>;

    /// Probe whether per-organization schema support is installed.
    async fn schema_differentiation_enabled(&self) -> Result<bool>;

    /// Create (or return) the dedicated schema for one organization.
    /// Returns the schema name.
    async fn create_organization_schema(&self, org_id: &str) -> Result<String>;

    /// Move one organization's rows into its dedicated schema.
    async fn migrate_organization_data(&self, org_id: &str) -> Result<()>;
}
