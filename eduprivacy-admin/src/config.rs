use std::env;

use anyhow::{bail, Result};

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Variables the verifier confirms are present. Presence only; their values
/// are interpreted by the application, not by this tooling.
pub const VERIFIED_VARS: [&str; 5] = [
    SUPABASE_URL,
    ANON_KEY,
    "ORG_SCHEMAS_ENABLED",
    "ORG_SCHEMA_PREFIX",
    "SHARED_SCHEMA_NAME",
];

/// Configuration for the migration orchestrator. Built once in main and
/// passed by reference; mutating calls require the service-role key.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    pub supabase_url: String,
    pub service_role_key: String,
}

impl MigratorConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            supabase_url: required(SUPABASE_URL)?,
            service_role_key: required(SERVICE_ROLE_KEY)?,
        })
    }
}

/// Configuration for the verifier. The service-role key is optional; without
/// it the elevated checks are reported as skipped rather than failed.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub supabase_url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
    /// Names from [`VERIFIED_VARS`] that were absent or empty at startup.
    pub missing_vars: Vec<&'static str>,
}

impl VerifierConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            supabase_url: required(SUPABASE_URL)?,
            anon_key: required(ANON_KEY)?,
            service_role_key: optional(SERVICE_ROLE_KEY),
            missing_vars: VERIFIED_VARS
                .iter()
                .copied()
                .filter(|name| optional(name).is_none())
                .collect(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("{} is required (set it in the environment or .env)", name),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Distinct var names per test; the test runner is multi-threaded and the
    // process environment is shared.

    #[test]
    fn required_rejects_missing_var() {
        let err = required("EDUPRIVACY_TEST_UNSET_VAR").unwrap_err();
        assert!(err.to_string().contains("EDUPRIVACY_TEST_UNSET_VAR"));
    }

    #[test]
    fn required_rejects_empty_var() {
        env::set_var("EDUPRIVACY_TEST_EMPTY_VAR", "");
        assert!(required("EDUPRIVACY_TEST_EMPTY_VAR").is_err());
    }

    #[test]
    fn optional_treats_empty_as_absent() {
        env::set_var("EDUPRIVACY_TEST_EMPTY_OPT", "");
        assert_eq!(optional("EDUPRIVACY_TEST_EMPTY_OPT"), None);

        env::set_var("EDUPRIVACY_TEST_SET_OPT", "value");
        assert_eq!(optional("EDUPRIVACY_TEST_SET_OPT"), Some("value".to_string()));
    }
}
