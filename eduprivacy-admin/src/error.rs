use eduprivacy_data::DataError;
use thiserror::Error;

/// Fatal orchestration errors. Any of these aborts the whole migration run;
/// organizations after the failing one are never attempted.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("migration support probe failed (is the migration SQL installed?): {0}")]
    Preflight(#[source] DataError),

    #[error("schema differentiation is not enabled on the backend")]
    SchemaSupportDisabled,

    #[error("failed to fetch organizations: {0}")]
    OrgFetch(#[source] DataError),

    #[error("organization '{0}' not found")]
    OrgNotFound(String),

    #[error("organization id '{id}' matched {matches} records; expected exactly one")]
    OrgAmbiguous { id: String, matches: usize },

    #[error("failed to create schema for organization '{name}': {source}")]
    SchemaCreate {
        name: String,
        #[source]
        source: DataError,
    },

    #[error("failed to migrate data for organization '{name}': {source}")]
    DataMigrate {
        name: String,
        #[source]
        source: DataError,
    },

    #[error("failed to fetch schema report: {0}")]
    Report(#[source] DataError),
}
