//! Common constants used throughout the nodebaker application.

/// Supported generation config file names, tried in order
pub const CONFIG_FILES: [&str; 3] = ["nodebaker.json", "nodebaker.yml", "nodebaker.yaml"];

/// Catalog metadata file names looked up at the root of a template tree
pub const CATALOG_FILES: [&str; 3] = ["catalog.yaml", "catalog.yml", "catalog.json"];

/// Ignore file name inside a template tree
pub const IGNORE_FILE: &str = ".templateignore";

/// Patterns that are always ignored when scanning a template tree
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/.DS_Store", "**/.git/**", ".git/**"];

/// Source folders created in every generated project
pub const PROJECT_SOURCE_DIRS: [&str; 7] =
    ["controllers", "routes", "services", "utils", "models", "middlewares", "config"];

/// Origin label for dependencies every project receives
pub const PROJECT_ORIGIN: &str = "project";
