//! Integration tests for the rota binary.
//!
//! Every test runs against its own data directory and config file, with the
//! clock pinned through `--at`. The cycle starts Monday 2026-10-12, so
//! 2026-10-15 is day 4.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const THURSDAY: &str = "2026-10-15T10:00:00Z";

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rota"))
}

/// Temp dir holding `config.toml` and a `data/` directory
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
[cycle]
cycle_length = 7
start_date = "2026-10-12"
timezone = "UTC"
"#,
    )
    .expect("Failed to write config");
    temp_dir
}

fn data_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data")
}

/// Command with data dir, config and clock already set
fn rota(temp_dir: &TempDir, at: &str) -> Command {
    let mut cmd = cli();
    cmd.arg("--data-dir")
        .arg(data_dir(temp_dir))
        .arg("--config")
        .arg(temp_dir.path().join("config.toml"))
        .arg("--at")
        .arg(at);
    cmd
}

fn plan(temp_dir: &TempDir) {
    rota(temp_dir, THURSDAY)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Schedule saved!"));
}

fn read_schedule(dir: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(dir.join("schedule.json")).expect("Failed to read schedule");
    serde_json::from_str(&contents).expect("Schedule is not valid JSON")
}

fn rest_days(schedule: &serde_json::Value) -> Vec<u64> {
    schedule["days"]
        .as_array()
        .expect("days array")
        .iter()
        .filter(|day| {
            day["selections"]
                .as_array()
                .is_some_and(|s| s.iter().any(|sel| sel["selection"] == "rest"))
        })
        .map(|day| day["day_number"].as_u64().expect("day_number"))
        .collect()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cyclic training schedule and activity tracker",
        ));
}

#[test]
fn test_today_without_schedule() {
    let temp_dir = setup_test_dir();

    rota(&temp_dir, THURSDAY)
        .assert()
        .success()
        .stdout(predicate::str::contains("No schedule yet"));
}

#[test]
fn test_plan_dry_run_does_not_save() {
    let temp_dir = setup_test_dir();

    rota(&temp_dir, THURSDAY)
        .arg("plan")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day  1  Upper Body Push"))
        .stdout(predicate::str::contains("Day  3  Upper Body Pull + Thoracic Spine Flow"))
        .stdout(predicate::str::contains("Day  5  Zone 2 Run + Hip CARs"))
        .stdout(predicate::str::contains("[Dry run - schedule not saved]"));

    assert!(!data_dir(&temp_dir).join("schedule.json").exists());
}

#[test]
fn test_plan_saves_spread_rest_days() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    let schedule = read_schedule(&data_dir(&temp_dir));
    assert_eq!(schedule["cycle_length"], 7);
    assert_eq!(rest_days(&schedule), vec![4, 7]);

    rota(&temp_dir, THURSDAY)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("7-DAY CYCLE"))
        .stdout(predicate::str::contains("Day  6  Bike Intervals"))
        .stdout(predicate::str::contains("Day  7  Rest"));
}

#[test]
fn test_replan_overwrites_previous_plan() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .arg("plan")
        .arg("--rest-days")
        .arg("3")
        .arg("--focus")
        .arg("all-cardio")
        .assert()
        .success();

    let schedule = read_schedule(&data_dir(&temp_dir));
    assert_eq!(rest_days(&schedule), vec![3, 5, 7]);
    let weights = schedule["days"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|day| day["selections"].as_array().unwrap().iter())
        .filter(|sel| sel["ref"]["kind"] == "weights")
        .count();
    assert_eq!(weights, 0);
}

#[test]
fn test_plan_rejects_rest_days_out_of_range() {
    let temp_dir = setup_test_dir();

    rota(&temp_dir, THURSDAY)
        .arg("plan")
        .arg("--rest-days")
        .arg("7")
        .assert()
        .failure();

    assert!(!data_dir(&temp_dir).join("schedule.json").exists());
}

#[test]
fn test_today_shows_cycle_day() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("DAY 4 OF 7"))
        .stdout(predicate::str::contains("→ Rest"))
        .stdout(predicate::str::contains("Streak: 0 days"));

    rota(&temp_dir, "2026-10-16T10:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("DAY 5 OF 7"))
        .stdout(predicate::str::contains("→ Zone 2 Run"))
        .stdout(predicate::str::contains("→ Hip CARs"));
}

#[test]
fn test_next_occurrence() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["next", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Next cardio:zone2_run: day 5 (in 1 day, 2026-10-16)",
        ));

    // Wraps past the end of the cycle
    rota(&temp_dir, THURSDAY)
        .args(["next", "weights", "upper_push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("day 1 (in 4 days, 2026-10-19)"));

    rota(&temp_dir, THURSDAY)
        .args(["next", "mobility", "shoulder_cars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not scheduled in this cycle"));
}

#[test]
fn test_log_then_stats() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["stats", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions yet"));

    rota(&temp_dir, THURSDAY)
        .args(["log", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Session logged!"));

    assert!(data_dir(&temp_dir).join("sessions.jsonl").exists());

    rota(&temp_dir, THURSDAY)
        .args(["stats", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Zone 2 Run"))
        .stdout(predicate::str::contains("1 session completed"))
        .stdout(predicate::str::contains("Last: 2026-10-15"))
        .stdout(predicate::str::contains("This week: 1 day"))
        .stdout(predicate::str::contains("Next scheduled: day 5"));
}

#[test]
fn test_streak_and_weekly_count() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    for at in ["2026-10-14T08:00:00Z", "2026-10-15T08:00:00Z"] {
        rota(&temp_dir, at)
            .args(["log", "weights", "lower_body"])
            .assert()
            .success();
    }

    rota(&temp_dir, THURSDAY)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 2 days"))
        .stdout(predicate::str::contains("This week: 2 active days"));
}

#[test]
fn test_add_replaces_rest_day() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["add", "4", "mobility", "shoulder_cars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Added Shoulder CARs to day 4"));

    let schedule = read_schedule(&data_dir(&temp_dir));
    assert_eq!(rest_days(&schedule), vec![7]);

    rota(&temp_dir, THURSDAY)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("→ Shoulder CARs"));
}

#[test]
fn test_add_warns_on_overtraining() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["add", "3", "cardio", "rower_steady"])
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠ Day 3 now holds 3 workouts"));
}

#[test]
fn test_add_unknown_workout_fails() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["add", "2", "cardio", "swim"])
        .assert()
        .failure();
}

#[test]
fn test_rest_and_remove() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["rest", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Day 2 is now a rest day"));
    assert_eq!(rest_days(&read_schedule(&data_dir(&temp_dir))), vec![2, 4, 7]);

    rota(&temp_dir, THURSDAY)
        .args(["remove", "6", "cardio", "bike_intervals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Removed cardio:bike_intervals from day 6"));

    rota(&temp_dir, THURSDAY)
        .args(["remove", "6", "cardio", "bike_intervals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 6 does not include cardio:bike_intervals"));

    rota(&temp_dir, THURSDAY)
        .args(["next", "cardio", "bike_intervals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not scheduled in this cycle"));
}

#[test]
fn test_rest_rejects_day_outside_cycle() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);

    rota(&temp_dir, THURSDAY)
        .args(["rest", "8"])
        .assert()
        .failure();
}

#[test]
fn test_import_skips_malformed_rows() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("export.csv");
    fs::write(
        &csv_path,
        "id,ref_kind,ref_id,started_at,completed_at\n\
         6f1c2a3e-0d4b-4c8a-9a51-2b7e9d0c1f10,cardio,zone2_run,2026-10-13T07:00:00Z,2026-10-13T07:40:00Z\n\
         0b8e4c7d-5a2f-4e61-8d3c-7f9a1b2c3d40,weights,upper_pull,2026-10-14T07:00:00Z,not-a-time\n\
         9d7a6b5c-4e3f-4a21-b0c9-8e7d6f5a4b30,weights,lower_body,2026-10-15T07:00:00Z,2026-10-15T08:00:00Z\n",
    )
    .unwrap();

    rota(&temp_dir, THURSDAY)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Imported 2 sessions"));

    // Known ids are not imported twice
    rota(&temp_dir, THURSDAY)
        .arg("import")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Imported 0 sessions"));

    let log = fs::read_to_string(data_dir(&temp_dir).join("sessions.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 2);
}

#[test]
fn test_archive_csv_counts_toward_history() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);
    fs::write(
        data_dir(&temp_dir).join("archive.csv"),
        "id,ref_kind,ref_id,started_at,completed_at\n\
         6f1c2a3e-0d4b-4c8a-9a51-2b7e9d0c1f10,cardio,zone2_run,2026-10-09T07:00:00Z,2026-10-09T07:40:00Z\n",
    )
    .unwrap();

    rota(&temp_dir, THURSDAY)
        .args(["stats", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 session completed"))
        .stdout(predicate::str::contains("This week: 0 days"));
}

#[test]
fn test_corrupted_schedule_is_reported() {
    let temp_dir = setup_test_dir();
    let dir = data_dir(&temp_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("schedule.json"), "{ invalid json }}}}").unwrap();

    rota(&temp_dir, THURSDAY).arg("today").assert().failure();

    // The file is left for the user to inspect
    assert_eq!(
        fs::read_to_string(dir.join("schedule.json")).unwrap(),
        "{ invalid json }}}}"
    );
}

#[test]
fn test_corrupted_log_lines_are_skipped() {
    let temp_dir = setup_test_dir();
    plan(&temp_dir);
    let log_path = data_dir(&temp_dir).join("sessions.jsonl");
    fs::write(&log_path, b"{ invalid json }\n{\"id\": \"\xff\xfe\"}\n").unwrap();

    rota(&temp_dir, THURSDAY)
        .args(["log", "cardio", "zone2_run"])
        .assert()
        .success();

    rota(&temp_dir, THURSDAY)
        .args(["stats", "cardio", "zone2_run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 session completed"));

    rota(&temp_dir, THURSDAY)
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("This week: 1 active day"));
}

#[test]
fn test_timezone_shifts_cycle_day() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        r#"
[cycle]
cycle_length = 7
start_date = "2026-10-12"
timezone = "Pacific/Auckland"
"#,
    )
    .unwrap();
    plan(&temp_dir);

    // 2026-10-15 14:00 UTC is already 2026-10-16 in Auckland
    rota(&temp_dir, "2026-10-15T14:00:00Z")
        .arg("today")
        .assert()
        .success()
        .stdout(predicate::str::contains("DAY 5 OF 7"));
}

#[test]
fn test_concurrent_session_logging() {
    let temp_dir = setup_test_dir();

    let data = data_dir(&temp_dir);
    let config = temp_dir.path().join("config.toml");

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let (data, config) = (data.clone(), config.clone());
            std::thread::spawn(move || {
                cli()
                    .arg("--data-dir")
                    .arg(&data)
                    .arg("--config")
                    .arg(&config)
                    .args(["--at", THURSDAY, "log", "cardio", "zone2_run"])
                    .assert()
                    .success();
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("log thread panicked");
    }

    let log = fs::read_to_string(data_dir(&temp_dir).join("sessions.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 5);
    for line in log.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("Interleaved line");
        assert_eq!(value["ref"]["id"], "zone2_run");
    }
}
