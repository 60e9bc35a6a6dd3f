//! Template preprocessing engine.
//!
//! Each file goes through [`scanner`] -> [`parser`] -> [`evaluator`] against a
//! shared, read-only [`Context`]. Markers are delimited by `@@`:
//!
//! ```text
//! @@if ENV:KIND == "library" && ENV:FEATURES has "test"@@
//! set(CMAKE_CXX_STANDARD @@ENV:STANDARD@@)
//! @@elif ENV:MODE != "console"@@
//! ...
//! @@else@@
//! ...
//! @@endif@@
//! ```

pub mod condition;
pub mod context;
pub mod evaluator;
pub mod parser;
pub mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub use context::{Context, ContextBuilder, Value};

/// Runs the whole pipeline over in-memory text. `file` is only used in diagnostics.
pub fn process_str<P: AsRef<Path>>(file: P, source: &str, context: &Context) -> Result<String> {
    let file = file.as_ref();
    let tokens = scanner::scan(file, source)?;
    let nodes = parser::parse(file, tokens)?;
    Ok(evaluator::render(&nodes, context)?)
}

/// Renders the current content of one file. Nothing is written.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read as text
/// * `Error::LexError`, `Error::ParseError`, `Error::EvaluationError` from the pipeline
pub fn process<P: AsRef<Path>>(path: P, context: &Context) -> Result<String> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    process_str(path, &source, context)
}

/// Preprocesses every regular file under `root` in place.
///
/// See [`process_all_except`].
pub fn process_all<P: AsRef<Path>>(root: P, context: &Context) -> Result<()> {
    process_all_except(root, context, &GlobSet::empty())
}

/// Preprocesses every regular file under `root` whose path relative to `root`
/// does not match `ignored`, overwriting each with its rendered content.
///
/// Files are handled one at a time, sorted component-wise by path. The walk stops
/// at the first failing file; files rewritten before it stay rewritten.
pub fn process_all_except<P: AsRef<Path>>(
    root: P,
    context: &Context,
    ignored: &GlobSet,
) -> Result<()> {
    let root = root.as_ref();
    for path in template_files(root)? {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if ignored.is_match(relative) {
            debug!("Skipping ignored file: {}", relative.display());
            continue;
        }

        debug!("Preprocessing file: {}", path.display());
        let output = process(&path, context)?;
        fs::write(&path, output).map_err(|e| Error::io(&path, e))?;
    }
    Ok(())
}

/// Regular files under `root`, sorted by path.
fn template_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
