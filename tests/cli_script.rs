use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("school_ledger_cli").unwrap();
    cmd.env("SCHOOL_LEDGER_CLI_SCRIPT", "1")
        .env("SCHOOL_LEDGER_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_records_and_summarises() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("config set locale en-US\ngain 1000 fees\nloss 300 rent\nsummary\nexit\n")
        .assert()
        .success()
        .stdout(contains("Recorded gain of 1,000.00 DZD"))
        .stdout(contains("Last 30 days"))
        .stdout(contains("700.00 DZD"));

    let ledger = home.path().join("ledgers").join("default.json");
    let json = std::fs::read_to_string(ledger).unwrap();
    assert!(json.contains("\"kind\": \"loss\""));
}

#[test]
fn tags_command_prints_extracted_tags() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("tags \"إيصال دفع رقم: REC-1 - الطالب: Ali - مجموعة رياضيات - أغسطس / 2025\"\n")
        .assert()
        .success()
        .stdout(contains("[رقم الإيصال: REC-1]"))
        .stdout(contains("[الطالب: Ali]"))
        .stdout(contains("أغسطس / 2025"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Did you mean `summary`?"));
}

#[test]
fn reset_requires_confirmation() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("tenant north\ngain 50\nreset\nreset --yes\nlist\n")
        .assert()
        .success()
        .stdout(contains("Re-run as `reset --yes`"))
        .stdout(contains("Removed 1 entries from `north`"))
        .stdout(contains("No entries."));

    assert!(home.path().join("backups").join("north").is_dir());
}

#[test]
fn invalid_arguments_are_reported_without_aborting() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("gain abc\nbalance 2025-08-10 2025-08-01\nversion\n")
        .assert()
        .success()
        .stderr(contains("`abc` is not a valid amount"))
        .stderr(contains("range end must be after start"))
        .stdout(contains("school_ledger").or(contains("0.1.0")));
}
