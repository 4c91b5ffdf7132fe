use predicates::prelude::*;

use crate::common::TestProject;
use crate::fixtures::{CONTAINER_MODULE, POD_MODULE, imports_dir};

fn pod_project() -> TestProject {
    let project = TestProject::new().unwrap();
    project.write_module("pod.yaml", POD_MODULE).unwrap();
    project.write_module("lib/container.yaml", CONTAINER_MODULE).unwrap();
    project
}

/// Test evaluating a module prints the resolved resource as YAML
#[test]
fn test_eval_prints_yaml() {
    let project = pod_project();

    let output = project.run_short(&["eval", "pod.yaml", "-p", "name=web"]).unwrap();
    output.assert_success();
    assert_eq!(
        output.stdout,
        "pod:\n  containers:\n  - image: registry.local/web:latest\n    name: web\n    ports:\n    - containerPort: 8080\n  name: web\n"
    );
}

/// Test JSON output of several files
#[test]
fn test_eval_json_output() {
    let project = pod_project();
    project.write_module("svc.yaml", "params: [name]\nservice: {name: '${name}-svc'}\n").unwrap();

    project
        .command()
        .args(["eval", "pod.yaml", "svc.yaml", "--param", "name=api", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"name\": \"api-svc\""))
        .stdout(predicate::str::contains("\"containerPort\": 8080"));
}

/// Test an unknown identifier exits non-zero with a suggestion
#[test]
fn test_eval_unknown_identifier() {
    let project = TestProject::new().unwrap();
    project
        .write_module("pod.yaml", "params: [replicas]\npod: {replicas: '${replica}'}\n")
        .unwrap();

    let output = project.run_short(&["eval", "pod.yaml", "-p", "replicas=2"]).unwrap();
    output
        .assert_failure()
        .assert_stderr_contains("Invalid template identifier 'replica'")
        .assert_stderr_contains("Did you mean 'replicas'?");
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.is_empty());
}

/// Test a missing file is reported instead of panicking
#[test]
fn test_eval_missing_file() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["eval", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yaml"));
}

/// Test that the fixture modules evaluate through the binary
#[test]
fn test_eval_fixture_file() {
    let project = TestProject::new().unwrap();
    let deployment = imports_dir().join("deployment.yaml");

    project
        .command()
        .arg("eval")
        .arg(&deployment)
        .args(["-p", "name=shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("image: registry.local/shop:latest"))
        .stdout(predicate::str::contains("image: registry.local/envoy:latest"))
        .stdout(predicate::str::contains("image: busybox"));
}

/// Test the import tree and dependency order views
#[test]
fn test_imports_command() {
    let project = pod_project();

    let output = project.run_short(&["imports", "pod.yaml"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("pod.yaml\n")
        .assert_stdout_contains("└── app: lib/container.yaml");

    let output = project.run_short(&["imports", "pod.yaml", "--order"]).unwrap();
    output.assert_success();
    assert_eq!(output.stdout, "lib/container.yaml\npod.yaml\n");
}

/// Test that imported files with extra sections produce a warning
#[test]
fn test_imports_warns_about_extra_sections() {
    let project = TestProject::new().unwrap();
    project.write_module("main.yaml", "imports: [{lib: lib.yaml}]\npod: {}\n").unwrap();
    project.write_module("lib.yaml", "svc: {}\n---\nsvc: {}\n").unwrap();

    project
        .command()
        .args(["imports", "main.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("only the first is imported"));
}

/// Test that --quiet suppresses warnings but not errors
#[test]
fn test_quiet_flag() {
    let project = TestProject::new().unwrap();
    project.write_module("main.yaml", "imports: [{lib: lib.yaml}]\npod: {x: '${lib}'}\n").unwrap();
    project.write_module("lib.yaml", "svc: {}\n---\nsvc: {}\n").unwrap();

    project
        .command()
        .args(["--quiet", "eval", "main.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
