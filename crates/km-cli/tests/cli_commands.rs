//! Integration tests for the `km` command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A store directory holding a freshly founded kingdom.
fn founded() -> TempDir {
    let dir = TempDir::new().unwrap();
    km(&dir).args(["init", "Stolen Lands"]).assert().success();
    dir
}

fn km(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("km").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("KM_LOG")
        .arg("--store")
        .arg(dir.path());
    cmd
}

// ---------------------------------------------------------------------------
// init / show / reset
// ---------------------------------------------------------------------------

#[test]
fn init_creates_kingdom_file() {
    let dir = TempDir::new().unwrap();
    km(&dir)
        .args(["init", "Stolen Lands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Founded Stolen Lands"))
        .stdout(predicate::str::contains("Control DC 14"));
    assert!(dir.path().join("kingdom.json").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = founded();
    km(&dir)
        .args(["init", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    km(&dir).args(["init", "Again", "--force"]).assert().success();
}

#[test]
fn kingdom_flag_selects_file() {
    let dir = founded();
    km(&dir)
        .args(["--kingdom", "brevoy", "init", "Brevoy"])
        .assert()
        .success();
    assert!(dir.path().join("brevoy.json").exists());
    km(&dir)
        .args(["-k", "brevoy", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brevoy"));
}

#[test]
fn show_prints_sheet() {
    let dir = founded();
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stolen Lands"))
        .stdout(predicate::str::contains("control DC:  14"))
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("Corruption"));
}

#[test]
fn reset_restores_defaults() {
    let dir = founded();
    km(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kingdom reset to defaults"));
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stolen Lands").not());
}

#[test]
fn update_merges_json_patch() {
    let dir = founded();
    km(&dir)
        .args(["update", r#"{"name":"Tatzlford","unrest":3}"#])
        .assert()
        .success();
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tatzlford"))
        .stdout(predicate::str::contains("unrest:      3"));
}

#[test]
fn update_rejects_bad_json() {
    let dir = founded();
    km(&dir)
        .args(["update", "{ nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid kingdom patch"));
}

// ---------------------------------------------------------------------------
// skills / activities / checks
// ---------------------------------------------------------------------------

#[test]
fn skills_lists_every_skill() {
    let dir = founded();
    km(&dir)
        .arg("skills")
        .assert()
        .success()
        .stdout(predicate::str::contains("Agriculture"))
        .stdout(predicate::str::contains("Warfare"))
        .stdout(predicate::str::contains("Untrained"));
}

#[test]
fn activities_filter_by_phase() {
    let dir = founded();
    km(&dir)
        .args(["activities", "--phase", "region"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Claim Hex"))
        .stdout(predicate::str::contains("Celebrate Holiday").not());
}

#[test]
fn check_with_physical_roll() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "20", "check", "agriculture"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Agriculture:"))
        .stdout(predicate::str::contains("Critical Success"))
        .stdout(predicate::str::contains("natural 20"));
}

#[test]
fn check_rejects_unknown_skill() {
    let dir = founded();
    km(&dir)
        .args(["check", "juggling"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown skill"));
}

#[test]
fn activity_outcome_effect_applies_once() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "15", "activity", "celebrate-holiday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success"))
        .stdout(predicate::str::contains("[modifier:0]"));
    km(&dir)
        .args(["apply-effect", "modifier:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Celebrate Holiday +1"));
    km(&dir)
        .args(["apply-effect", "modifier:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already applied"));
    km(&dir)
        .args(["modifier", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Celebrate Holiday").count(1));
}

#[test]
fn activity_without_dc_is_rejected() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "10", "activity", "establish-settlement"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("it has no DC"));
}

#[test]
fn custom_dc_activity_needs_dc() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "10", "activity", "build-structure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a DC"));
    km(&dir)
        .args(["--roll", "10", "activity", "build-structure", "--dc", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vs DC 12"));
}

#[test]
fn upgrade_needs_a_check() {
    let dir = founded();
    km(&dir)
        .arg("upgrade")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no check rolled yet"));
}

#[test]
fn upgrade_moves_last_outcome() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "5", "check", "arts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Failure"));
    km(&dir)
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success"));
}

#[test]
fn fame_reroll_needs_fame() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "5", "check", "arts"])
        .assert()
        .success();
    km(&dir)
        .args(["reroll", "fame"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("re-roll needs 1 Fame"));
    km(&dir).args(["fame", "1"]).assert().success();
    km(&dir)
        .args(["--roll", "18", "reroll", "fame"])
        .assert()
        .success()
        .stdout(predicate::str::contains("natural 18"));
}

// ---------------------------------------------------------------------------
// turn operations
// ---------------------------------------------------------------------------

#[test]
fn collect_rolls_resource_dice() {
    let dir = founded();
    km(&dir)
        .args([
            "--roll", "1", "--roll", "2", "--roll", "3", "--roll", "4", "--roll", "1", "collect",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resource Dice: 5d4 = 11"));
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("RP:          11"));
}

#[test]
fn end_turn_expires_modifiers() {
    let dir = founded();
    km(&dir)
        .args(["modifier", "add", "Festival", "circumstance", "2", "--turns", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Festival +2 (circumstance), 1 turn"));
    km(&dir)
        .arg("end-turn")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 effect(s) expired"));
    km(&dir)
        .args(["modifier", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active modifiers."));
}

#[test]
fn modifier_remove_out_of_range_fails() {
    let dir = founded();
    km(&dir)
        .args(["modifier", "remove", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no modifier at index 3"));
}

#[test]
fn apply_change_floors_at_zero() {
    let dir = founded();
    km(&dir)
        .args(["apply-change", "gain", "unrest", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gained 3 Unrest"));
    km(&dir)
        .args(["apply-change", "lose", "unrest", "5"])
        .assert()
        .success();
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("unrest:      0"));
}

#[test]
fn apply_change_rejects_bad_amount() {
    let dir = founded();
    km(&dir)
        .args(["apply-change", "gain", "rp", "lots"])
        .assert()
        .failure();
}

#[test]
fn event_check_reports_event() {
    let dir = founded();
    km(&dir)
        .args(["--roll", "16", "check-event"])
        .assert()
        .success()
        .stdout(predicate::str::contains("An event occurs"));
}

#[test]
fn reduce_ruin_needs_a_penalty() {
    let dir = founded();
    km(&dir)
        .args(["reduce-ruin", "crime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action"));
}

#[test]
fn fame_is_capped() {
    let dir = founded();
    km(&dir)
        .args(["fame", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fame is now 3"));
}

#[test]
fn xp_and_level_up() {
    let dir = founded();
    km(&dir)
        .args(["xp", "event", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gained 40 Kingdom XP"));
    km(&dir)
        .arg("level-up")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enough XP"));
    km(&dir).args(["xp", "add", "960"]).assert().success();
    km(&dir)
        .arg("level-up")
        .assert()
        .success()
        .stdout(predicate::str::contains("level 2"));
}

#[test]
fn claim_landmark_reduces_unrest() {
    let dir = founded();
    km(&dir)
        .args(["apply-change", "gain", "unrest", "3"])
        .assert()
        .success();
    km(&dir)
        .args(["--roll", "2", "claim-feature", "landmark"])
        .assert()
        .success();
    km(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("unrest:      1"));
}

#[test]
fn pay_consumption_offers_remedies() {
    let dir = founded();
    km(&dir)
        .args(["settlement", "add", "capital", "--capital", "--level", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Town capital"));
    km(&dir)
        .arg("pay-consumption")
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing 2 food"))
        .stdout(predicate::str::contains("offer: Lose 10 RP"));
}

// ---------------------------------------------------------------------------
// settlements / context
// ---------------------------------------------------------------------------

#[test]
fn settlement_list_marks_capital_and_active() {
    let dir = founded();
    km(&dir)
        .args(["settlement", "add", "tatzlford", "--capital"])
        .assert()
        .success();
    km(&dir)
        .args(["settlement", "activate", "tatzlford"])
        .assert()
        .success();
    km(&dir)
        .args(["settlement", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tatzlford"))
        .stdout(predicate::str::contains("capital"))
        .stdout(predicate::str::contains("active"));
}

#[test]
fn activate_unknown_settlement_fails() {
    let dir = founded();
    km(&dir)
        .args(["settlement", "activate", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no settlement 'nowhere'"));
}

#[test]
fn malformed_context_is_reported_and_ignored() {
    let dir = founded();
    let context = dir.path().join("context.json");
    fs::write(&context, "not json").unwrap();
    km(&dir)
        .arg("--context")
        .arg(&context)
        .arg("show")
        .assert()
        .success()
        .stderr(predicate::str::contains("continuing without structure bonuses"))
        .stdout(predicate::str::contains("Stolen Lands"));
}

#[test]
fn config_file_is_loaded() {
    let dir = founded();
    let config = dir.path().join("settings.json");
    fs::write(&config, r#"{"alwaysAddLevel": true}"#).unwrap();
    km(&dir)
        .arg("--config")
        .arg(&config)
        .args(["--roll", "10", "check", "arts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1d20+1"));
}

// ---------------------------------------------------------------------------
// validate / date
// ---------------------------------------------------------------------------

#[test]
fn validate_clean_kingdom() {
    let dir = founded();
    km(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found."));
}

#[test]
fn validate_reports_errors() {
    let dir = founded();
    km(&dir)
        .args(["update", r#"{"level": 25}"#])
        .assert()
        .success();
    km(&dir)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("error:"));
}

#[test]
fn date_uses_golarion_calendar() {
    let dir = TempDir::new().unwrap();
    km(&dir)
        .args(["date", "2023-01-02 09:30:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Moonday, 2nd of Abadius, 4723 AR (09:30:00)",
        ));
}
