mod support;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;

use support::TestStore;

fn listed_titles(store: &TestStore) -> Vec<String> {
    let data = store.json(&["list"]);
    data["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["title"].as_str().expect("title").to_string())
        .collect()
}

#[test]
fn paused_task_is_listed_until_stopped() {
    let store = TestStore::new();
    store.add(&["--title", "AMM script", "--desc", "write a simple AMM"]);

    store.tau().args(["start", "0"]).assert().success();
    store.tau().args(["pause", "0"]).assert().success();

    store
        .tau()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("AMM script"));

    let shown = store.json(&["show", "0"]);
    assert_eq!(shown["state"], Value::String("pause".to_string()));

    store
        .tau()
        .args(["stop", "0"])
        .assert()
        .success()
        .stdout(contains("Task 0 stopped: AMM script"));

    store
        .tau()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("AMM script").not());
    assert!(listed_titles(&store).is_empty());
}

#[test]
fn list_is_sorted_by_rank_with_unranked_last() {
    let store = TestStore::new();
    store.add(&["-t", "unranked", "--desc", ""]);
    store.add(&["-t", "low", "--desc", "", "-r", "1.5"]);
    store.add(&["-t", "high", "--desc", "", "-r", "11"]);
    store.add(&["-t", "middle", "--desc", "", "-r", "4.87"]);

    assert_eq!(listed_titles(&store), vec!["high", "middle", "low", "unranked"]);

    store
        .tau()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Open tasks (0624): 4"))
        .stdout(contains("ID  Title"));
}

#[test]
fn short_ids_are_recycled_after_stop() {
    let store = TestStore::new();
    for title in ["a", "b", "c"] {
        store.add(&["-t", title, "--desc", ""]);
    }

    store.tau().args(["stop", "1"]).assert().success();
    let task = store.add(&["-t", "d", "--desc", ""]);
    assert_eq!(task["short_id"], 1);

    let shown = store.json(&["show", "1"]);
    assert_eq!(shown["title"], Value::String("d".to_string()));
    assert_eq!(store.task_refs().len(), 4);
}

#[test]
fn repeated_action_is_reported_not_recorded() {
    let store = TestStore::new();
    store.add(&["-t", "refactor tau", "--desc", ""]);

    let first = store.json(&["start", "0"]);
    assert_eq!(first["changed"], Value::Bool(true));

    store
        .tau()
        .args(["start", "0"])
        .assert()
        .success()
        .stdout(contains("task 0 was already start"));

    let shown = store.json(&["show", "0"]);
    assert_eq!(shown["events"].as_array().map(Vec::len), Some(1));
}

#[test]
fn unknown_id_is_reported() {
    let store = TestStore::new();

    for command in ["show", "start", "pause", "stop"] {
        store
            .tau()
            .args([command, "9"])
            .assert()
            .code(2)
            .stderr(contains("Error: task ID 9 not found"));
    }
}

#[test]
fn tasks_do_not_carry_into_next_month() {
    let store = TestStore::new();
    store.add(&["-t", "june task", "--desc", ""]);

    store
        .tau_at("2024-07-01T09:00:00Z")
        .args(["show", "0"])
        .assert()
        .code(2)
        .stderr(contains("task ID 0 not found"));
}

#[test]
fn comment_records_author_and_content() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let task = store.add(&["-t", "reply to amy", "--desc", ""]);

    store
        .tau()
        .args(["--author", "roz", "comment", "0", "-c", "draft sent"])
        .assert()
        .success()
        .stdout(contains("Comment added to task 0"));

    store
        .tau()
        .env("TAU_AUTHOR", "nar")
        .args(["comment", "0", "--comment", "replied"])
        .assert()
        .success();

    let stored = store.read_task(task["reference_id"].as_str().expect("reference id"))?;
    let comments = stored["comments"].as_array().expect("comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["author"], Value::String("roz".to_string()));
    assert_eq!(comments[0]["content"], Value::String("draft sent".to_string()));
    assert_eq!(comments[1]["author"], Value::String("nar".to_string()));

    store
        .tau()
        .args(["show", "0"])
        .assert()
        .success()
        .stdout(contains("Comments:"))
        .stdout(contains("roz: draft sent"));
    Ok(())
}

#[test]
fn comment_author_falls_back_to_config() {
    let store = TestStore::new();
    store
        .write_config("[settings]\nauthor = \"xesan\"\n")
        .expect("write config");
    store.add(&["-t", "cashier spec", "--desc", ""]);

    let task = store.json(&["comment", "0", "-c", "started outline"]);
    assert_eq!(task["comments"][0]["author"], Value::String("xesan".to_string()));
}

#[test]
fn empty_comment_from_editor_is_rejected() {
    let store = TestStore::new();
    store.add(&["-t", "gui library", "--desc", ""]);

    store
        .tau()
        .args(["comment", "0"])
        .assert()
        .code(2)
        .stderr(contains("comment is empty"));
}

#[test]
fn json_errors_use_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();

    let output = store
        .tau()
        .args(["show", "3", "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["schema_version"], Value::String("tau.v1".to_string()));
    assert_eq!(value["command"], Value::String("show".to_string()));
    assert_eq!(value["status"], Value::String("error".to_string()));
    assert_eq!(value["error"]["code"], 2);
    assert_eq!(value["error"]["kind"], Value::String("user_error".to_string()));
    assert_eq!(
        value["error"]["message"],
        Value::String("task ID 3 not found".to_string())
    );
    Ok(())
}
