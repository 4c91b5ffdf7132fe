//! Constants shared across the crate.

/// Default maximum import nesting depth.
///
/// A module importing a module importing a module is depth 3. Real module
/// trees are shallow; the limit only stops runaway nesting through
/// generated paths.
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 64;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "SHORT_CONFIG";

/// Directory under the home directory holding the configuration file.
pub const CONFIG_DIR_NAME: &str = ".short";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
