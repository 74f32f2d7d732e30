use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// Binary invocation with a scrubbed environment and an empty working
/// directory, so no ambient variables or stray .env file leak in.
fn admin_cmd(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("eduprivacy-admin").unwrap();
    cmd.env_clear().current_dir(cwd.path());
    cmd
}

#[test]
fn help_exits_zero_and_lists_subcommands() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn migrate_help_lists_flags() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .args(["migrate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--org-id"))
        .stdout(predicate::str::contains("--all"));
}

#[test]
fn migrate_without_env_fails_before_any_network_call() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_URL"));
}

#[test]
fn migrate_requires_service_role_key() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .env("SUPABASE_URL", "https://proj.example.co")
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_SERVICE_ROLE_KEY"));
}

#[test]
fn verify_requires_anon_key() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .env("SUPABASE_URL", "https://proj.example.co")
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_ANON_KEY"));
}

#[test]
fn migrate_rejects_org_id_combined_with_all() {
    let tmp = TempDir::new().unwrap();

    admin_cmd(&tmp)
        .args(["migrate", "--org-id", "abc", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
