use eduprivacy_data::{MigrationBackend, OrgSchemaStatus, Organization};

use crate::error::AdminError;

/// Run configuration assembled once from CLI flags. Migrating everything is
/// the default; `--all` only exists at the CLI surface to conflict with
/// `--org-id`.
#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub dry_run: bool,
    pub org_id: Option<String>,
}

pub async fn run<B: MigrationBackend>(backend: &B, opts: &MigrateOptions) -> anyhow::Result<u8> {
    execute(backend, opts).await?;
    Ok(0)
}

/// Orchestrate the migration: preflight, discovery, per-organization calls,
/// then the schema report. Fail-fast: the first error aborts the whole run
/// and no compensation is attempted for organizations already migrated.
pub(crate) async fn execute<B: MigrationBackend>(
    backend: &B,
    opts: &MigrateOptions,
) -> Result<(), AdminError> {
    println!("Checking migration support on the backend...");
    let enabled = backend
        .schema_differentiation_enabled()
        .await
        .map_err(AdminError::Preflight)?;
    if !enabled {
        return Err(AdminError::SchemaSupportDisabled);
    }
    println!("PASS: migration support is installed");

    let orgs = backend
        .fetch_organizations(None)
        .await
        .map_err(AdminError::OrgFetch)?;
    let targets = select_targets(orgs, opts.org_id.as_deref())?;
    println!("Found {} organization(s) to migrate", targets.len());

    for org in &targets {
        if opts.dry_run {
            println!("  [dry-run] would migrate '{}' ({})", org.name, org.id);
        } else {
            migrate_one(backend, org).await?;
        }
    }

    if opts.dry_run {
        println!("Dry run complete; no changes were made.");
    }

    // The report still runs in dry-run mode; it is read-only, and only the
    // two mutating RPCs are suppressed. A targeted run reports only the
    // requested organization; the full view would mix unrelated tenants into
    // the summary.
    let only_org = opts.org_id.as_ref().map(|_| targets[0].name.as_str());
    report_schemas(backend, only_org).await
}

/// Resolve the ordered list of organizations this run will process.
///
/// With a requested id, exactly one fetched organization must match; zero or
/// several matches abort before any mutating call is made.
fn select_targets(
    orgs: Vec<Organization>,
    org_id: Option<&str>,
) -> Result<Vec<Organization>, AdminError> {
    match org_id {
        Some(id) => {
            let matched: Vec<Organization> =
                orgs.into_iter().filter(|org| org.id == id).collect();
            match matched.len() {
                0 => Err(AdminError::OrgNotFound(id.to_string())),
                1 => Ok(matched),
                n => Err(AdminError::OrgAmbiguous {
                    id: id.to_string(),
                    matches: n,
                }),
            }
        }
        None => Ok(orgs),
    }
}

/// Two sequential remote calls per organization: create the dedicated
/// schema, then move the organization's rows into it.
async fn migrate_one<B: MigrationBackend>(
    backend: &B,
    org: &Organization,
) -> Result<(), AdminError> {
    println!("Migrating '{}' ({})...", org.name, org.id);
    let schema = backend
        .create_organization_schema(&org.id)
        .await
        .map_err(|source| AdminError::SchemaCreate {
            name: org.name.clone(),
            source,
        })?;
    backend
        .migrate_organization_data(&org.id)
        .await
        .map_err(|source| AdminError::DataMigrate {
            name: org.name.clone(),
            source,
        })?;
    println!("  done: data moved into schema '{}'", schema);
    Ok(())
}

/// Read-only post-migration report; nothing here mutates the backend.
async fn report_schemas<B: MigrationBackend>(
    backend: &B,
    only_org: Option<&str>,
) -> Result<(), AdminError> {
    let rows = backend
        .fetch_schema_statuses()
        .await
        .map_err(AdminError::Report)?;
    let rows = report_rows(rows, only_org);

    println!();
    println!("Schema status:");
    for row in &rows {
        let mark = if row.schema_exists { "ok  " } else { "MISSING" };
        println!("  {} {} -> {}", mark, row.organization_name, row.schema_name);
    }
    let (ready, total) = ready_counts(&rows);
    println!("{}/{} organization schemas ready", ready, total);
    Ok(())
}

/// Ready/total schema counts for the report summary line.
fn ready_counts(rows: &[OrgSchemaStatus]) -> (usize, usize) {
    let ready = rows.iter().filter(|row| row.schema_exists).count();
    (ready, rows.len())
}

fn report_rows(rows: Vec<OrgSchemaStatus>, only_org: Option<&str>) -> Vec<OrgSchemaStatus> {
    match only_org {
        Some(name) => rows
            .into_iter()
            .filter(|row| row.organization_name == name)
            .collect(),
        None => rows,
    }
}
