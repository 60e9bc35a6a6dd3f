//! pmake's main application entry point and orchestration logic.
//! Handles command-line argument parsing, catalog resolution and project
//! generation, and prints a summary of the generated project.

use std::path::PathBuf;

use pmake::{
    catalog::{load_catalog, ProjectSettings},
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    processor::create_project,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// `resources/` next to the executable.
fn default_resources_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| Error::io("current executable", e))?;
    let dir = exe.parent().map(|p| p.to_path_buf()).unwrap_or_default();
    Ok(dir.join("resources"))
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the catalog from the resources directory
/// 2. Resolves the selection into validated project settings
/// 3. Generates the project
/// 4. Prints a summary
fn run(args: Args) -> Result<()> {
    let resources_dir = match &args.resources {
        Some(dir) => dir.clone(),
        None => default_resources_dir()?,
    };

    let catalog = load_catalog(&resources_dir)?;
    let project = ProjectSettings::configure(args.selection(), &catalog)?;

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from(&project.name));
    let output = create_project(&project, &resources_dir, output_dir, args.force)?;

    println!("┌– [pmake] –––");
    println!("| name.......: {}", project.name);
    println!("| language...: {} ({})", project.language, project.standard);
    println!("| kind.......: {} ({})", project.kind, project.mode);
    println!("| features...: {}", project.features.join(", "));
    println!("|");
    println!("| output.....: {}", output.display());
    println!("└–––––––––––––");
    Ok(())
}
