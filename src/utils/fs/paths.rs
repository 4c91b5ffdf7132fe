//! Path utilities for import resolution.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components.
///
/// Purely lexical: symbolic links are not followed and the path need not
/// exist. Leading `..` components of a relative path are kept.
///
/// # Examples
///
/// ```rust
/// use short_modules::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/foo/./bar/../baz")), PathBuf::from("/foo/baz"));
/// assert_eq!(normalize_path(Path::new("../src/./lib.rs")), PathBuf::from("../src/lib.rs"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolves an import path written in the module at `root_path`.
///
/// Absolute import paths are used as-is; relative ones are relative to the
/// directory containing the importing module. The result is normalized so it
/// can serve as a stable key for caching and cycle detection.
///
/// ```rust
/// use short_modules::utils::fs::resolve_relative_path;
///
/// assert_eq!(resolve_relative_path("apps/web/main.yaml", "../db.yaml"), "apps/db.yaml");
/// assert_eq!(resolve_relative_path("main.yaml", "./lib/a.yaml"), "lib/a.yaml");
/// ```
#[must_use]
pub fn resolve_relative_path(root_path: &str, import_path: &str) -> String {
    let import = Path::new(import_path);
    let joined = if import.is_absolute() {
        import.to_path_buf()
    } else {
        Path::new(root_path).parent().unwrap_or_else(|| Path::new("")).join(import)
    };
    normalize_path(&joined).to_string_lossy().into_owned()
}
