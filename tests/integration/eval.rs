use short_modules::core::ShortError;
use short_modules::module::{EvalContext, ImportGraph};
use short_modules::test_utils::{MemoryDocuments, memory_context};
use short_modules::value::{Map, Value};

use crate::common::TestProject;
use crate::fixtures::{CONTAINER_MODULE, POD_MODULE};

fn json_context() -> EvalContext<serde_json::Value> {
    EvalContext::for_files(|raw| Ok(serde_json::to_value(raw)?))
}

fn params(entries: &[(&str, Value)]) -> Map {
    entries.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
}

/// Test a pod importing a container module from a subdirectory
#[test]
fn test_evaluate_files_with_relative_import() {
    let project = TestProject::new().unwrap();
    project.write_module("pod.yaml", POD_MODULE).unwrap();
    project.write_module("lib/container.yaml", CONTAINER_MODULE).unwrap();

    let pod = project.project_path().join("pod.yaml");
    let modules = json_context()
        .evaluate(&pod.to_string_lossy(), &params(&[("name", Value::from("web"))]))
        .unwrap();

    assert_eq!(modules.len(), 1);
    let module = modules.into_iter().next().unwrap();
    assert!(module.is_evaluated());
    assert!(module.import("app").unwrap().is_evaluated());
    assert_eq!(
        module.into_typed().unwrap(),
        serde_json::json!({
            "pod": {
                "name": "web",
                "containers": [{
                    "name": "web",
                    "image": "registry.local/web:latest",
                    "ports": [{"containerPort": 8080}]
                }]
            }
        })
    );
}

/// Test that a missing required parameter names the hole and the module
#[test]
fn test_missing_required_param() {
    let project = TestProject::new().unwrap();
    project.write_module("pod.yaml", POD_MODULE).unwrap();
    project.write_module("lib/container.yaml", CONTAINER_MODULE).unwrap();

    let pod = project.project_path().join("pod.yaml");
    let err = json_context().evaluate(&pod.to_string_lossy(), &Map::new()).unwrap_err();

    match err {
        ShortError::UnknownIdentifier {
            ident,
            module,
            ..
        } => {
            assert_eq!(ident, "name");
            assert!(module.ends_with("pod.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test that circular imports between files fail at parse time
#[test]
fn test_circular_file_imports() {
    let project = TestProject::new().unwrap();
    project.write_module("a.yaml", "imports: [{b: b.yaml}]\npod: {}\n").unwrap();
    project.write_module("b.yaml", "imports: [{a: a.yaml}]\npod: {}\n").unwrap();

    let a = project.project_path().join("a.yaml");
    let err = json_context().parse(&a.to_string_lossy()).unwrap_err();

    match err {
        ShortError::CyclicImport {
            chain,
        } => {
            assert!(chain.contains("a.yaml → "), "chain: {chain}");
            assert!(chain.contains("b.yaml"), "chain: {chain}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test the import depth limit against a chain of files
#[test]
fn test_import_depth_limit() {
    let project = TestProject::new().unwrap();
    project.write_module("a.yaml", "imports: [{b: b.yaml}]\npod: {}\n").unwrap();
    project.write_module("b.yaml", "imports: [{c: c.yaml}]\npod: {}\n").unwrap();
    project.write_module("c.yaml", "pod: {}\n").unwrap();
    let a = project.project_path().join("a.yaml");
    let a = a.to_string_lossy();

    assert!(json_context().parse(&a).is_ok());

    let err = json_context().with_max_import_depth(1).parse(&a).unwrap_err();
    assert!(matches!(err, ShortError::ImportDepthExceeded { limit: 1, .. }), "got {err}");
}

/// Test that a missing import file reports the resolved path
#[test]
fn test_missing_import_file() {
    let project = TestProject::new().unwrap();
    project.write_module("pod.yaml", POD_MODULE).unwrap();

    let pod = project.project_path().join("pod.yaml");
    let err = json_context().parse(&pod.to_string_lossy()).unwrap_err();

    match err {
        ShortError::ReadFailed {
            path,
            ..
        } => assert!(path.ends_with("lib/container.yaml"), "path: {path}"),
        other => panic!("unexpected error: {other}"),
    }
}

/// Test the dependency order of a diamond of files
#[test]
fn test_dependency_order_of_files() {
    let project = TestProject::new().unwrap();
    project
        .write_module("app.yaml", "imports: [{web: web.yaml}, {db: db.yaml}]\npod: {}\n")
        .unwrap();
    project.write_module("web.yaml", "imports: [{base: base.yaml}]\npod: {}\n").unwrap();
    project.write_module("db.yaml", "imports: [{base: base.yaml}]\npod: {}\n").unwrap();
    project.write_module("base.yaml", "pod: {}\n").unwrap();

    let app = project.project_path().join("app.yaml");
    let modules = json_context().parse(&app.to_string_lossy()).unwrap();
    let graph = ImportGraph::from_module(&modules[0]);

    assert_eq!(graph.node_count(), 4);
    let order = graph.dependency_order().unwrap();
    assert!(order[0].ends_with("base.yaml"));
    assert!(order[3].ends_with("app.yaml"));
}

/// Test that only the imports a module actually uses are evaluated
#[test]
fn test_lazy_import_evaluation_in_memory() {
    let docs = MemoryDocuments::new()
        .with("main.yaml", "imports: [{used: used.yaml}, {unused: unused.yaml}]\npod: {c: '${used}'}\n")
        .with("used.yaml", "svc: {port: 80}\n")
        .with("unused.yaml", "params: [required]\nsvc: {x: '${required}'}\n");

    let modules = memory_context(docs).evaluate("main.yaml", &Map::new()).unwrap();
    let module = &modules[0];

    assert!(module.import("used").unwrap().is_evaluated());
    assert!(!module.import("unused").unwrap().is_evaluated());
    assert_eq!(
        module.export.raw,
        serde_yaml::from_str::<Map>("pod:\n  c:\n    port: 80\n").unwrap()
    );
}
