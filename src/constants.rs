//! Common constants used throughout pmake.

/// Catalog file names, tried in order inside the resources directory
pub const CATALOG_FILES: [&str; 3] = ["pmake-info.json", "pmake-info.yml", "pmake-info.yaml"];

/// Ignore file name inside the resources directory
pub const IGNORE_FILE: &str = ".pmakeignore";

/// Assets that are never fed through the preprocessor or wildcard replacement
pub const DEFAULT_IGNORE_PATTERNS: [&str; 12] = [
    "**/.DS_Store",
    "**/*.png",
    "**/*.jpg",
    "**/*.jpeg",
    "**/*.gif",
    "**/*.ico",
    "**/*.bmp",
    "**/*.ttf",
    "**/*.otf",
    "**/*.zip",
    "**/*.tar.gz",
    "**/*.a",
];

pub const TEMPLATES_DIR: &str = "templates";
pub const COMMON_DIR: &str = "common";
pub const FEATURES_DIR: &str = "features";

pub const DEFAULT_PROJECT_NAME: &str = "myproject";
pub const DEFAULT_LANGUAGE: &str = "c++";

/// Opening and closing delimiter of every preprocessor marker
pub const MARKER: &str = "@@";

/// Separates the segments of a variable name, as in `ENV:LANGUAGE`
pub const NAME_SEPARATOR: char = ':';

/// Joins the elements of a list variable when it is substituted into text
pub const LIST_SEPARATOR: &str = ",";

/// Variables injected by the scaffolder
pub const VAR_LANGUAGE: &str = "ENV:LANGUAGE";
pub const VAR_STANDARD: &str = "ENV:STANDARD";
pub const VAR_KIND: &str = "ENV:KIND";
pub const VAR_MODE: &str = "ENV:MODE";
pub const VAR_FEATURES: &str = "ENV:FEATURES";
