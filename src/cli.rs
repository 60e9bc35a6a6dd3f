//! Command-line interface implementation for pmake.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::catalog::Selection;

/// Command-line arguments structure for pmake.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pmake: utility for creating C and C++ projects based on pre-defined templates",
    long_about = None
)]
pub struct Args {
    /// Name of the project, also the default output directory
    #[arg(short, long)]
    pub name: String,

    /// Language used in the project (defaults to c++)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Language standard (defaults to the newest one in the catalog)
    #[arg(short, long)]
    pub standard: Option<String>,

    /// Kind of the project, e.g. executable or library
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Mode of the project kind, e.g. console, static or header-only
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Features to include, comma separated (defaults to the mode's required features)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub features: Option<Vec<String>>,

    /// Directory where the project will be created (defaults to ./<NAME>)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding pmake-info.json and the templates
    #[arg(short, long, env = "PMAKE_RESOURCES", value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Write into the output directory even if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The project attributes, leaving unset ones for the catalog to fill in.
    pub fn selection(&self) -> Selection {
        Selection {
            name: Some(self.name.clone()),
            language: self.language.clone(),
            standard: self.standard.clone(),
            kind: self.kind.clone(),
            mode: self.mode.clone(),
            features: self.features.clone(),
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 after printing help if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
