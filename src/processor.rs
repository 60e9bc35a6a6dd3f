//! Project generation.
//! Copies the common template and the selected feature overlays into the
//! output directory, preprocesses them, then applies the catalog wildcards to
//! file names and contents.

use globset::GlobSet;
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::{
    catalog::ProjectSettings,
    constants::{COMMON_DIR, FEATURES_DIR, IGNORE_FILE, TEMPLATES_DIR},
    error::{Error, Result},
    ignore::parse_ignore_file,
    preprocessor::process_all_except,
};

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io(path, e))
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }
    fs::copy(source, dest).map(|_| ()).map_err(|e| Error::io(source, e))
}

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

/// Recursively copies `source` into `dest`, overwriting files that already exist.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    let (source, dest) = (source.as_ref(), dest.as_ref());
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::io(entry.path(), std::io::Error::other(e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            debug!("Copying file: {}", target.display());
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Replaces every occurrence of each wildcard, in map order.
pub fn replace_wildcards(content: &str, wildcards: &IndexMap<String, String>) -> String {
    wildcards
        .iter()
        .filter(|(wildcard, _)| !wildcard.is_empty())
        .fold(content.to_string(), |text, (wildcard, value)| text.replace(wildcard.as_str(), value))
}

/// Renames files and directories whose names contain a wildcard.
///
/// Children are renamed before their parent so every path stays valid.
pub fn replace_file_name_wildcards<P: AsRef<Path>>(
    root: P,
    wildcards: &IndexMap<String, String>,
) -> Result<()> {
    let entries = WalkDir::new(root.as_ref())
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for entry in entries {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        let renamed = replace_wildcards(name, wildcards);
        if renamed != name {
            let target = entry.path().with_file_name(&renamed);
            debug!("Renaming {} to {}", entry.path().display(), target.display());
            fs::rename(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Replaces wildcards inside every regular file not matched by `ignored`.
pub fn replace_content_wildcards<P: AsRef<Path>>(
    root: P,
    wildcards: &IndexMap<String, String>,
    ignored: &GlobSet,
) -> Result<()> {
    let root = root.as_ref();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if ignored.is_match(path.strip_prefix(root).unwrap_or(path)) {
            continue;
        }

        let content = read_file(path)?;
        let replaced = replace_wildcards(&content, wildcards);
        if replaced != content {
            write_file(path, &replaced)?;
        }
    }
    Ok(())
}

/// Generates a project from the templates under `resources_dir`.
///
/// # Arguments
/// * `project` - Resolved and validated project settings
/// * `resources_dir` - Directory holding `templates/` and the ignore file
/// * `output_dir` - Where the project is created
/// * `force` - Whether an existing output directory may be written into
///
/// # Returns
/// * `Result<PathBuf>` - The output directory
///
/// # Notes
/// Files already in a forced `output_dir` are never preprocessed or renamed.
/// The project is generated in a scratch directory first and then copied
/// over them, replacing only files with the same relative path.
///
/// Generation is not atomic: when a step fails, whatever was already written
/// stays in `output_dir`.
pub fn create_project<P: AsRef<Path>, Q: AsRef<Path>>(
    project: &ProjectSettings,
    resources_dir: P,
    output_dir: Q,
    force: bool,
) -> Result<PathBuf> {
    let output_dir = ensure_output_dir(output_dir, force)?;
    let resources_dir = resources_dir.as_ref();

    if output_dir.exists() {
        let staging = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
        generate(project, resources_dir, staging.path())?;
        info!("Merging generated project into {}", output_dir.display());
        copy_tree(staging.path(), &output_dir)?;
    } else {
        create_dir_all(&output_dir)?;
        generate(project, resources_dir, &output_dir)?;
    }

    Ok(output_dir)
}

/// Copies, preprocesses and renames the templates inside `dest`, which holds nothing else.
fn generate(project: &ProjectSettings, resources_dir: &Path, dest: &Path) -> Result<()> {
    let templates_dir = resources_dir.join(TEMPLATES_DIR);

    info!("Creating {} from {}", dest.display(), templates_dir.display());
    copy_tree(templates_dir.join(COMMON_DIR), dest)?;

    for feature in &project.features {
        let feature_dir = templates_dir.join(FEATURES_DIR).join(feature);
        if feature_dir.is_dir() {
            debug!("Adding feature {feature}");
            copy_tree(&feature_dir, dest)?;
        } else {
            warn!("Feature \"{feature}\" is unavailable.");
        }
    }

    let ignored = parse_ignore_file(resources_dir.join(IGNORE_FILE))?;
    let context = project.context();
    for (name, value) in context.iter() {
        debug!("{name} = {value}");
    }

    process_all_except(dest, &context, &ignored)?;
    replace_file_name_wildcards(dest, &project.wildcards)?;
    replace_content_wildcards(dest, &project.wildcards, &ignored)
}
