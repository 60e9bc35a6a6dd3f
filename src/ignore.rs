//! File ignore pattern handling for generated projects.
//! Matching files are copied into the project but never preprocessed or
//! wildcard-replaced, which keeps binary assets intact.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

fn add_pattern(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let glob = Glob::new(pattern)
        .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))?;
    builder.add(glob);
    Ok(())
}

/// Reads the ignore file and combines its patterns with the defaults.
///
/// # Arguments
/// * `ignore_path` - Path to the `.pmakeignore` file
///
/// # Returns
/// * `Result<GlobSet>` - Compiled patterns matched against paths relative to the project root
///
/// # Notes
/// - A missing ignore file yields only [`DEFAULT_IGNORE_PATTERNS`]
/// - Blank lines and lines starting with `#` are skipped
///
/// # Example
/// ```ignore
/// # Contents of .pmakeignore:
/// **/*.svg
/// vendor/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(ignore_path: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        add_pattern(&mut builder, pattern)?;
    }

    if let Ok(contents) = read_to_string(ignore_path.as_ref()) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            add_pattern(&mut builder, line)?;
        }
    } else {
        debug!("No ignore file at {}", ignore_path.as_ref().display());
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("ignore file loading failed: {e}")))
}
