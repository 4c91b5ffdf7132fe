use predicates::prelude::*;

use crate::common::TestProject;

fn project_with_import() -> TestProject {
    let project = TestProject::new().unwrap();
    project.write_module("main.yaml", "imports: [{lib: lib.yaml}]\npod: {svc: '${lib}'}\n").unwrap();
    project.write_module("lib.yaml", "svc: {port: 80}\n").unwrap();
    project
}

/// Test that the user config changes the default output format
#[test]
fn test_user_config_output_format() {
    let project = project_with_import();
    project.write_user_config("output = \"json\"\n").unwrap();

    project
        .command()
        .args(["eval", "main.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 80"));

    // the flag still wins
    project
        .command()
        .args(["eval", "main.yaml", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port: 80"))
        .stdout(predicate::str::contains("\"port\"").not());
}

/// Test the import depth limit from the config file
#[test]
fn test_user_config_import_depth() {
    let project = project_with_import();
    project.write_user_config("max_import_depth = 0\n").unwrap();

    project
        .command()
        .args(["eval", "main.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import depth limit of 0 exceeded"));
}

/// Test SHORT_CONFIG and --config take precedence over the user config
#[test]
fn test_config_env_and_flag() {
    let project = project_with_import();
    project.write_user_config("max_import_depth = 0\n").unwrap();
    project.write_module("env.toml", "output = \"json\"\n").unwrap();
    project.write_module("flag.toml", "output = \"yaml\"\n").unwrap();

    project
        .command()
        .env("SHORT_CONFIG", project.project_path().join("env.toml"))
        .args(["eval", "main.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));

    project
        .command()
        .env("SHORT_CONFIG", project.project_path().join("env.toml"))
        .args(["--config", "flag.toml", "eval", "main.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pod:"));
}

/// Test unknown keys in the config file are rejected
#[test]
fn test_invalid_config() {
    let project = project_with_import();
    project.write_user_config("max_depth = 3\n").unwrap();

    let output = project.run_short(&["eval", "main.yaml"]).unwrap();
    output.assert_failure().assert_stderr_contains("config");
}
