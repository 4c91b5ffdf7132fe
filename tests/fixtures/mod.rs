//! Module fixtures on disk and inline module sources shared by the tests.
//!
//! `imports/` holds before/after pairs: `NAME.yaml` is evaluated (with the
//! parameters in `NAME.params.yaml`, if present) and every section must
//! match the corresponding document of `NAME.after.yaml`. Imported helper
//! modules live in `imports/lib/` and are not cases on their own.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// One before/after fixture.
pub struct FixtureCase {
    pub name: String,
    pub module: PathBuf,
    pub params: Option<PathBuf>,
    pub expected: PathBuf,
}

pub fn imports_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("imports")
}

/// All fixture cases, sorted by name.
pub fn import_cases() -> Vec<FixtureCase> {
    let dir = imports_dir();
    let mut cases: Vec<FixtureCase> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|entry| {
            let path = entry.unwrap().path();
            let file_name = path.file_name()?.to_str()?.to_string();
            let name = file_name.strip_suffix(".yaml")?;
            if name.ends_with(".after") || name.ends_with(".params") {
                return None;
            }

            let expected = dir.join(format!("{name}.after.yaml"));
            if !expected.exists() {
                return None;
            }
            let params = dir.join(format!("{name}.params.yaml"));

            Some(FixtureCase {
                name: name.to_string(),
                module: path,
                params: params.exists().then_some(params),
                expected,
            })
        })
        .collect();
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    cases
}

/// A container module with a required name and a defaulted port.
pub const CONTAINER_MODULE: &str = r#"params:
- name
- port:
  default: 8080
container:
  name: ${name}
  image: "registry.local/${name}:latest"
  ports:
  - containerPort: ${port}
"#;

/// A pod importing [`CONTAINER_MODULE`] from `lib/container.yaml`.
pub const POD_MODULE: &str = r#"imports:
- app: lib/container.yaml
  params:
    name: ${name}
params:
- name: Name of the pod
pod:
  name: ${name}
  containers:
  - ${app}
"#;
