use eduprivacy_data::{MigrationBackend, PostgrestClient};

use crate::config::VerifierConfig;

/// Outcome of one diagnostic check. Skipped is distinct from failed: checks
/// needing the service-role key are skipped, not failed, when it is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Fail(String),
    Skipped(String),
}

pub struct CheckReport {
    pub name: &'static str,
    pub outcome: CheckOutcome,
    pub hint: &'static str,
}

/// Run the configuration checks and print the scorecard.
///
/// Read-only throughout; failing checks do not produce a non-zero exit.
pub async fn run(config: &VerifierConfig) -> anyhow::Result<u8> {
    let anon = PostgrestClient::new(&config.supabase_url, &config.anon_key)?;
    let elevated = match &config.service_role_key {
        Some(key) => Some(PostgrestClient::new(&config.supabase_url, key)?),
        None => None,
    };

    let reports = run_checks(&config.missing_vars, &anon, elevated.as_ref()).await;
    print_scorecard(&reports);
    Ok(0)
}

/// The five checks, in order, each recording its own failure. A failing
/// check never prevents the later checks from running.
pub async fn run_checks<B: MigrationBackend>(
    missing_vars: &[&str],
    anon: &B,
    elevated: Option<&B>,
) -> Vec<CheckReport> {
    let mut reports = Vec::with_capacity(5);

    reports.push(CheckReport {
        name: "environment variables",
        outcome: check_environment(missing_vars),
        hint: "set the missing variables in the environment or .env",
    });

    reports.push(CheckReport {
        name: "database connectivity",
        outcome: check_connectivity(anon).await,
        hint: "confirm SUPABASE_URL and SUPABASE_ANON_KEY point at a reachable project",
    });

    reports.push(CheckReport {
        name: "migration functions",
        outcome: check_remote_functions(elevated).await,
        hint: "install the organization-schema migration SQL on the project",
    });

    reports.push(CheckReport {
        name: "organization records",
        outcome: check_org_presence(anon).await,
        hint: "seed at least one organization before migrating",
    });

    reports.push(CheckReport {
        name: "organization schemas",
        outcome: check_schema_presence(elevated).await,
        hint: "run `eduprivacy-admin migrate` to create organization schemas",
    });

    reports
}

fn check_environment(missing_vars: &[&str]) -> CheckOutcome {
    if missing_vars.is_empty() {
        CheckOutcome::Pass
    } else {
        CheckOutcome::Fail(format!("missing: {}", missing_vars.join(", ")))
    }
}

async fn check_connectivity<B: MigrationBackend>(anon: &B) -> CheckOutcome {
    match anon.fetch_organizations(Some(1)).await {
        Ok(_) => CheckOutcome::Pass,
        Err(e) => CheckOutcome::Fail(e.to_string()),
    }
}

async fn check_remote_functions<B: MigrationBackend>(elevated: Option<&B>) -> CheckOutcome {
    let Some(client) = elevated else {
        return CheckOutcome::Skipped("no service-role key configured".to_string());
    };
    match client.schema_differentiation_enabled().await {
        Ok(true) => CheckOutcome::Pass,
        Ok(false) => CheckOutcome::Fail("schema differentiation is disabled".to_string()),
        Err(e) => CheckOutcome::Fail(e.to_string()),
    }
}

async fn check_org_presence<B: MigrationBackend>(anon: &B) -> CheckOutcome {
    match anon.fetch_organizations(Some(5)).await {
        Ok(orgs) if !orgs.is_empty() => CheckOutcome::Pass,
        Ok(_) => CheckOutcome::Fail("no organizations found".to_string()),
        Err(e) => CheckOutcome::Fail(e.to_string()),
    }
}

async fn check_schema_presence<B: MigrationBackend>(elevated: Option<&B>) -> CheckOutcome {
    let Some(client) = elevated else {
        return CheckOutcome::Skipped("no service-role key configured".to_string());
    };
    match client.fetch_schema_statuses().await {
        Ok(rows) if !rows.is_empty() => CheckOutcome::Pass,
        Ok(_) => CheckOutcome::Fail("schema report is empty".to_string()),
        Err(e) => CheckOutcome::Fail(e.to_string()),
    }
}

/// Passed/eligible counts; skipped checks are not eligible.
fn summarize(reports: &[CheckReport]) -> (usize, usize) {
    let eligible = reports
        .iter()
        .filter(|r| !matches!(r.outcome, CheckOutcome::Skipped(_)))
        .count();
    let passed = reports
        .iter()
        .filter(|r| r.outcome == CheckOutcome::Pass)
        .count();
    (passed, eligible)
}

fn print_scorecard(reports: &[CheckReport]) {
    println!();
    println!("Configuration check results:");
    for report in reports {
        match &report.outcome {
            CheckOutcome::Pass => println!("  PASS: {}", report.name),
            CheckOutcome::Fail(reason) => {
                println!("  FAIL: {} ({})", report.name, reason);
                println!("        hint: {}", report.hint);
            }
            CheckOutcome::Skipped(reason) => {
                println!("  SKIP: {} ({})", report.name, reason);
            }
        }
    }

    let (passed, eligible) = summarize(reports);
    println!();
    println!("{}/{} checks passed", passed, eligible);
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use eduprivacy_data::{DataError, MigrationBackend, OrgSchemaStatus, Organization};

    use super::*;

    /// Backend with per-call failure switches.
    #[derive(Default)]
    struct MockBackend {
        fail_fetch: bool,
        no_orgs: bool,
        no_statuses: bool,
        probe_enabled: bool,
    }

    fn sample_org() -> Organization {
        Organization {
            id: "A".to_string(),
            name: "Alpha".to_string(),
            created_at: Utc.timestamp_opt(100, 0).unwrap(),
        }
    }

    #[async_trait]
    impl MigrationBackend for MockBackend {
        async fn fetch_organizations(
            &self,
            _limit: Option<u32>,
        ) -> eduprivacy_data::Result<Vec<Organization>> {
            if self.fail_fetch {
                return Err(DataError::Api {
                    url: "organizations".to_string(),
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            if self.no_orgs {
                return Ok(vec![]);
            }
            Ok(vec![sample_org()])
        }

        async fn fetch_schema_statuses(&self) -> eduprivacy_data::Result<Vec<OrgSchemaStatus>> {
            if self.no_statuses {
                return Ok(vec![]);
            }
            Ok(vec![OrgSchemaStatus {
                organization_name: "Alpha".to_string(),
                schema_name: "org_alpha".to_string(),
                schema_exists: true,
            }])
        }

        async fn schema_differentiation_enabled(&self) -> eduprivacy_data::Result<bool> {
            Ok(self.probe_enabled)
        }

        async fn create_organization_schema(
            &self,
            _org_id: &str,
        ) -> eduprivacy_data::Result<String> {
            unreachable!("verifier must never call mutating functions")
        }

        async fn migrate_organization_data(&self, _org_id: &str) -> eduprivacy_data::Result<()> {
            unreachable!("verifier must never call mutating functions")
        }
    }

    #[tokio::test]
    async fn all_checks_pass_with_healthy_backend() {
        let backend = MockBackend {
            probe_enabled: true,
            ..Default::default()
        };

        let reports = run_checks(&[], &backend, Some(&backend)).await;

        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|r| r.outcome == CheckOutcome::Pass));
        assert_eq!(summarize(&reports), (5, 5));
    }

    #[tokio::test]
    async fn connectivity_failure_does_not_suppress_other_checks() {
        let backend = MockBackend {
            fail_fetch: true,
            probe_enabled: true,
            ..Default::default()
        };

        let reports = run_checks(&[], &backend, Some(&backend)).await;

        assert_eq!(reports.len(), 5);
        // Checks 2 and 4 both read organizations and fail together; the
        // environment, function, and schema checks still ran and passed.
        assert!(matches!(reports[1].outcome, CheckOutcome::Fail(_)));
        assert!(matches!(reports[3].outcome, CheckOutcome::Fail(_)));
        assert_eq!(reports[0].outcome, CheckOutcome::Pass);
        assert_eq!(reports[2].outcome, CheckOutcome::Pass);
        assert_eq!(reports[4].outcome, CheckOutcome::Pass);
        assert_eq!(summarize(&reports), (3, 5));
    }

    #[tokio::test]
    async fn elevated_checks_are_skipped_without_service_role_key() {
        let backend = MockBackend {
            probe_enabled: true,
            ..Default::default()
        };

        let reports = run_checks(&[], &backend, None).await;

        assert!(matches!(reports[2].outcome, CheckOutcome::Skipped(_)));
        assert!(matches!(reports[4].outcome, CheckOutcome::Skipped(_)));
        // Only checks 1, 2, and 4 count toward the summary.
        assert_eq!(summarize(&reports), (3, 3));
    }

    #[tokio::test]
    async fn missing_env_vars_fail_the_environment_check() {
        let backend = MockBackend {
            probe_enabled: true,
            ..Default::default()
        };

        let reports = run_checks(&["ORG_SCHEMA_PREFIX"], &backend, None).await;

        match &reports[0].outcome {
            CheckOutcome::Fail(reason) => assert!(reason.contains("ORG_SCHEMA_PREFIX")),
            other => panic!("expected environment failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn disabled_probe_and_empty_tables_are_failures_not_errors() {
        let backend = MockBackend {
            no_orgs: true,
            no_statuses: true,
            probe_enabled: false,
            ..Default::default()
        };

        let reports = run_checks(&[], &backend, Some(&backend)).await;

        assert!(matches!(reports[2].outcome, CheckOutcome::Fail(_)));
        assert!(matches!(reports[3].outcome, CheckOutcome::Fail(_)));
        assert!(matches!(reports[4].outcome, CheckOutcome::Fail(_)));
        assert_eq!(summarize(&reports), (2, 5));
    }
}
