use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

fn command_output(temp: &Path, args: &[&str]) -> Output {
    let db_path = temp.join("leadnorm.sqlite3");
    cargo_bin_cmd!("leadnorm")
        .env("XDG_CONFIG_HOME", temp.join("config"))
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG")
        .args(["--db-path", db_path.to_str().expect("db path")])
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(temp: &Path, args: &[&str]) -> String {
    let output = command_output(temp, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = command_output(temp, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn write_leads(temp: &Path, body: &str) -> String {
    let path = temp.join("leads.json");
    fs::write(&path, body).expect("write leads");
    path.to_str().expect("leads path").to_string()
}

#[test]
fn cli_import_show_prompt_flow() {
    let temp = TempDir::new().expect("temp dir");
    let file = write_leads(
        temp.path(),
        r#"[
            {"leadId": "lead-1", "nombres": "JUAN CARLOS", "ciudad": "bogota", "telefono": "300"},
            {"nombres": "ana"}
        ]"#,
    );

    let imported = run_cmd_json(temp.path(), &["import", &file]);
    assert_eq!(imported["imported"], 2);
    assert_eq!(imported["leadIds"][0], "lead-1");

    let detail = run_cmd_json(temp.path(), &["show", "lead-1"]);
    assert_eq!(detail["fields"]["nombres"], "JUAN CARLOS");
    assert!(detail["normalizedAt"].is_null());

    let prompt = run_cmd_json(temp.path(), &["prompt", "lead-1"]);
    assert_eq!(prompt["fields"], serde_json::json!(["nombres", "ciudad"]));
    let text = prompt["prompt"].as_str().expect("prompt text");
    assert!(text.contains("\"JUAN CARLOS\""));
    assert!(!text.contains("telefono"));
}

#[test]
fn cli_show_missing_lead_is_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let output = command_output(temp.path(), &["show", "ghost"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("error: not found"));
}

#[test]
fn cli_canon_uses_local_rules() {
    let temp = TempDir::new().expect("temp dir");
    let city = run_cmd(temp.path(), &["canon", "--field", "ciudad", "BOGOTÁ"]);
    assert_eq!(city.trim(), "Bogota D.C.");

    let address = run_cmd(
        temp.path(),
        &["canon", "--field", "direccion", "CRA 15 NO 100 25"],
    );
    assert_eq!(address.trim(), "Cra. 15 # 100 - 25");

    let institution = run_cmd_json(temp.path(), &["canon", "--field", "empresa", "sena"]);
    assert_eq!(institution["canonical"], "SENA");
    assert_eq!(institution["kind"], "institution");
}

#[test]
fn cli_config_set_show_reset() {
    let temp = TempDir::new().expect("temp dir");

    run_cmd(
        temp.path(),
        &["config", "set", "--batch-size", "3", "--fields", "nombres,ciudad"],
    );
    let shown = run_cmd_json(temp.path(), &["config", "show"]);
    assert_eq!(shown["stored"]["batchSize"], 3);
    assert_eq!(shown["effective"]["batchSize"], 3);
    assert_eq!(shown["effective"]["maxRecordsPerRun"], 50);
    assert_eq!(
        shown["effective"]["fieldsToNormalize"],
        serde_json::json!(["nombres", "ciudad"])
    );

    let invalid = command_output(temp.path(), &["config", "set", "--batch-size", "0"]);
    assert_eq!(invalid.status.code(), Some(3));

    let reset = run_cmd_json(temp.path(), &["config", "reset"]);
    assert_eq!(reset["reset"], true);
    let shown = run_cmd_json(temp.path(), &["config", "show"]);
    assert!(shown["stored"].is_null());
    assert_eq!(shown["effective"]["batchSize"], 10);
}

#[test]
fn cli_run_disabled_short_circuits() {
    let temp = TempDir::new().expect("temp dir");
    let file = write_leads(temp.path(), r#"[{"leadId": "a", "nombres": "ANA"}]"#);
    run_cmd(temp.path(), &["import", &file]);
    run_cmd(temp.path(), &["config", "set", "--enabled", "false"]);

    let report = run_cmd_json(temp.path(), &["run", "--force-all"]);
    assert_eq!(
        report,
        serde_json::json!({"message": "Normalization is disabled", "enabled": false})
    );
}

#[test]
fn cli_run_records_per_lead_outcomes() {
    let temp = TempDir::new().expect("temp dir");
    let file = write_leads(
        temp.path(),
        r#"[
            {"leadId": "a", "nombres": "ANA"},
            {"leadId": "b", "telefono": "300"}
        ]"#,
    );
    run_cmd(temp.path(), &["import", &file]);

    let report = run_cmd_json(temp.path(), &["run"]);
    assert_eq!(report["message"], "Normalization complete");
    assert_eq!(report["recordsProcessed"], 2);
    assert_eq!(report["recordsErrored"], 1);
    assert_eq!(report["recordsSkipped"], 1);
    assert_eq!(report["details"][0]["status"], "error");
    assert!(report["details"][0]["error"]
        .as_str()
        .expect("error text")
        .contains("ANTHROPIC_API_KEY"));
    assert_eq!(report["details"][1]["reason"], "No fields to normalize");
    assert_eq!(report["effectiveConfig"]["maxRecordsPerRun"], 2);

    let detail = run_cmd_json(temp.path(), &["show", "a"]);
    assert!(detail["normalizedAt"].is_null());
}

#[test]
fn cli_run_scheduled_event_with_nothing_eligible() {
    let temp = TempDir::new().expect("temp dir");
    let event = temp.path().join("event.json");
    fs::write(&event, r#"{"source": "aws.events", "detail-type": "Scheduled Event"}"#)
        .expect("write event");

    let report = run_cmd_json(
        temp.path(),
        &["run", "--event", event.to_str().expect("event path")],
    );
    assert_eq!(report["message"], "No leads require normalization");
    assert_eq!(report["recordsProcessed"], 0);
}

#[test]
fn cli_import_rejects_non_array() {
    let temp = TempDir::new().expect("temp dir");
    let file = write_leads(temp.path(), r#"{"leadId": "a"}"#);
    let output = command_output(temp.path(), &["import", &file]);
    assert_eq!(output.status.code(), Some(3));
}
