use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tau_help_works() {
    Command::cargo_bin("tau")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task tracking"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "list", "show", "start", "pause", "stop", "comment", "doctor",
    ];

    for cmd in subcommands {
        Command::cargo_bin("tau")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn simulate_help_works() {
    Command::cargo_bin("tau-simulate")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--seed"));
}

#[test]
fn missing_subcommand_fails() {
    Command::cargo_bin("tau")
        .expect("binary")
        .assert()
        .failure();
}
