use serde::Deserialize;
use short_modules::module::EvalContext;
use short_modules::value::Map;

use crate::fixtures::{FixtureCase, import_cases};

fn expected_documents(case: &FixtureCase) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(&case.expected).unwrap();
    serde_yaml::Deserializer::from_str(&content)
        .map(|document| serde_json::Value::deserialize(document).unwrap())
        .collect()
}

fn case_params(case: &FixtureCase) -> Map {
    match &case.params {
        Some(path) => serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap(),
        None => Map::new(),
    }
}

#[test]
fn test_fixture_cases_found() {
    let names: Vec<_> = import_cases().into_iter().map(|case| case.name).collect();
    assert_eq!(names, vec!["deployment", "service"]);
}

#[test]
fn test_fixtures_evaluate_to_expected_output() {
    short_modules::test_utils::init_test_logging(None);

    for case in import_cases() {
        let ctx = EvalContext::for_files(|raw| Ok(serde_json::to_value(raw)?));
        let path = case.module.to_string_lossy();

        let modules = ctx
            .evaluate(&path, &case_params(&case))
            .unwrap_or_else(|e| panic!("{}: evaluation failed: {e}", case.name));
        let actual: Vec<serde_json::Value> =
            modules.into_iter().map(|module| module.into_typed().unwrap()).collect();

        assert_eq!(actual, expected_documents(&case), "fixture {} differs", case.name);
    }
}

#[test]
fn test_fixture_imports_are_cached() {
    let case = import_cases().into_iter().find(|case| case.name == "deployment").unwrap();
    let ctx = EvalContext::for_files(|raw| Ok(serde_json::to_value(raw)?));

    ctx.evaluate(&case.module.to_string_lossy(), &Map::new()).unwrap();

    // container.yaml is imported twice but read once
    let stats = ctx.cache_stats().unwrap();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.entries, 2);
}
