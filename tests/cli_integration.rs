//! End-to-end tests driving the ticket-intake binary over a temporary data directory

use assert_cmd::Command;
use chrono::{Duration, Local};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const EMAIL: &str = "jane.doe@gmail.com";
const ISSUE: &str = "My laptop screen flickers constantly";
const ADMIN: &str = "manager1";
const ADMIN_PASSWORD: &str = "Secure2024x";

struct Desk {
    dir: TempDir,
}

impl Desk {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "lock_timeout_ms = 2000\n").unwrap();
        Self { dir }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ticket-intake").unwrap();
        cmd.env_remove("INTAKE_ADMIN_PASSWORD")
            .arg("--no-color")
            .arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn submit(&self, email: &str, description: &str) -> assert_cmd::assert::Assert {
        let purchased = (Local::now().date_naive() - Duration::days(30))
            .format("%Y-%m-%d")
            .to_string();
        self.cmd()
            .args(["submit", "--name", "Jane Doe", "--email", email, "--product", "laptop"])
            .args(["--purchase-date", &purchased, "--description", description])
            .assert()
    }

    fn add_admin(&self) {
        self.cmd()
            .args(["admin-add", ADMIN, "--password", ADMIN_PASSWORD])
            .args(["--full-name", "Morgan Lee", "--role", "Manager"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created Manager account 'manager1'"));
    }

    fn admin(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(args)
            .args(["--user", ADMIN, "--password", ADMIN_PASSWORD])
            .assert()
    }
}

#[test]
fn test_submit_allocates_first_id() {
    let desk = Desk::new();
    desk.submit(EMAIL, ISSUE)
        .success()
        .stdout(predicate::str::contains("Ticket #1001 created successfully!"));

    let pending = std::fs::read_to_string(desk.data_dir().join("pending_tickets.csv")).unwrap();
    assert!(pending.starts_with("1001,Jane Doe,jane.doe@gmail.com,laptop,"));
}

#[test]
fn test_duplicate_submission_reports_existing_ticket() {
    let desk = Desk::new();
    desk.submit(EMAIL, ISSUE).success();
    desk.submit(EMAIL, ISSUE)
        .success()
        .stderr(predicate::str::contains("You already have an open ticket for this issue (#1001)"));
}

#[test]
fn test_invalid_submission_fails_with_field() {
    let desk = Desk::new();
    desk.cmd()
        .arg("--json")
        .args(["submit", "--name", "Jane Doe", "--email", "not-an-email"])
        .args(["--product", "laptop", "--purchase-date", "2025-01-15"])
        .args(["--description", ISSUE])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"field\": \"email\""));
}

#[test]
fn test_status_follows_ticket_through_lifecycle() {
    let desk = Desk::new();
    desk.submit(EMAIL, ISSUE).success();

    desk.cmd()
        .args(["status", "1001", "--email", EMAIL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ticket #1001 not found"));

    desk.cmd()
        .args(["promote", "1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved to the active queue"));

    desk.cmd()
        .args(["status", "#1001", "--email", "Jane.Doe@Gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket #1001 - Open"))
        .stdout(predicate::str::contains("#1 in the queue"));

    desk.cmd()
        .args(["status", "1001", "--email", "someone.else@gmail.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unauthorized"));
}

#[test]
fn test_admin_priority_resolve_and_drain() {
    let desk = Desk::new();
    desk.add_admin();
    desk.submit(EMAIL, ISSUE).success();
    desk.cmd().args(["promote", "1001"]).assert().success();

    desk.admin(&["priority", "1001", "High"])
        .success()
        .stdout(predicate::str::contains("Ticket #1001 priority: N/A → High"));

    desk.admin(&["resolve", "1001"])
        .success()
        .stdout(predicate::str::contains("Ticket #1001 marked for resolution"));

    let commands = std::fs::read_to_string(desk.data_dir().join("admin_commands.txt")).unwrap();
    assert_eq!(commands, "RESOLVE 1001 manager1\n");

    desk.cmd()
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved ticket #1001"));

    desk.cmd()
        .args(["status", "1001", "--email", EMAIL])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket #1001 - Resolved"))
        .stdout(predicate::str::contains("by manager1"));

    desk.admin(&["resolve", "1001"])
        .success()
        .stdout(predicate::str::contains("already resolved"));

    desk.admin(&["activity"])
        .success()
        .stdout(predicate::str::contains("CHANGE_PRIORITY"))
        .stdout(predicate::str::contains("RESOLVE_TICKET"))
        .stdout(predicate::str::contains("LOGOUT"));

    desk.admin(&["history", EMAIL])
        .success()
        .stdout(predicate::str::contains("#1001"));
}

#[test]
fn test_repeated_resolve_across_invocations_is_suppressed() {
    let desk = Desk::new();
    desk.add_admin();
    desk.submit(EMAIL, ISSUE).success();
    desk.cmd().args(["promote", "1001"]).assert().success();

    desk.admin(&["resolve", "1001"])
        .success()
        .stdout(predicate::str::contains("Ticket #1001 marked for resolution"));
    desk.admin(&["resolve", "1001"])
        .success()
        .stdout(predicate::str::contains("marked for resolution").not())
        .stderr(predicate::str::contains("Ticket #1001 was just resolved; request ignored"));

    let commands = std::fs::read_to_string(desk.data_dir().join("admin_commands.txt")).unwrap();
    assert_eq!(commands, "RESOLVE 1001 manager1\n");

    let audit = std::fs::read_to_string(desk.data_dir().join("admin_activity_log.csv")).unwrap();
    let resolves = audit.lines().filter(|l| l.contains("RESOLVE_TICKET")).count();
    assert_eq!(resolves, 1);
}

#[test]
fn test_stats_json() {
    let desk = Desk::new();
    desk.add_admin();
    desk.submit(EMAIL, ISSUE).success();
    desk.submit("john.smith@gmail.com", "Laptop battery drains within an hour")
        .success();
    desk.cmd().args(["promote", "1002"]).assert().success();

    desk.cmd()
        .args(["--json", "stats", "--user", ADMIN])
        .env("INTAKE_ADMIN_PASSWORD", ADMIN_PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active\": 1"))
        .stdout(predicate::str::contains("\"pending\": 1"));
}

#[test]
fn test_wrong_admin_password_is_rejected() {
    let desk = Desk::new();
    desk.add_admin();
    desk.cmd()
        .args(["resolve", "1001", "--user", ADMIN, "--password", "Wrong2024x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid administrator credentials"));
}

#[test]
fn test_catalog_export() {
    let desk = Desk::new();
    desk.cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"laptop\""));
}

#[test]
fn test_account_check() {
    let desk = Desk::new();
    desk.cmd()
        .args(["account-check", "maria_lopez", "--password", "Secure2024x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acceptable"));

    desk.cmd()
        .args(["account-check", "myqwerty", "--password", "Secure2024x"])
        .assert()
        .failure();
}
