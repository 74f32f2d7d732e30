use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A tenant in the hosted application, the unit of schema isolation.
///
/// Read from the `organizations` table; never written by this tooling.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the `organization_schemas` reporting view.
///
/// Produced server-side; constructed locally only in tests.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgSchemaStatus {
    pub organization_name: String,
    pub schema_name: String,
    pub schema_exists: bool,
}
