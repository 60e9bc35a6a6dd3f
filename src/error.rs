//! Error handling for pmake.
//! Defines the errors raised by each preprocessing stage and by project generation,
//! and the crate-wide result alias.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where in a template file an error was detected.
///
/// Lines and columns are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new<P: AsRef<Path>>(file: P, line: usize, column: usize) -> Self {
        Self { file: file.as_ref().to_path_buf(), line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A marker-looking sequence that is not a recognized directive or variable form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: malformed marker: {reason}")]
pub struct LexError {
    pub location: Location,
    pub reason: String,
}

/// Structural problems found while building the directive tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("conditional is never closed with `@@endif@@`")]
    UnterminatedConditional,

    #[error("`@@endif@@` has no matching `@@if@@`")]
    UnmatchedClose,

    #[error("conditional already has an `@@else@@` branch")]
    DuplicateElse,

    #[error("`@@elif@@` cannot follow `@@else@@`")]
    UnexpectedElifAfterElse,

    #[error("`@@{0}@@` outside of a conditional")]
    BranchOutsideConditional(&'static str),

    #[error("invalid condition: {0}")]
    InvalidCondition(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {kind}")]
pub struct ParseError {
    pub location: Location,
    pub kind: ParseErrorKind,
}

/// Failures while rendering a directive tree against a context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("{location}: undefined variable `{name}`")]
    UndefinedVariable { name: String, location: Location },

    #[error("{location}: variable `{name}` is {found} but {expected} was expected")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
        location: Location,
    },
}

/// Custom error types for pmake operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File system failure, always naming the path involved
    #[error("IO error on '{}': {source}.", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    LexError(#[from] LexError),

    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    EvaluationError(#[from] EvaluationError),

    /// Unreadable catalog or a selection the catalog does not offer
    #[error("Catalog error: {0}.")]
    CatalogError(String),

    #[error("Directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Invalid glob in the ignore file
    #[error("Ignore error: {0}.")]
    IgnoreError(String),
}

impl Error {
    /// Wraps an IO error with the path it happened on.
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::IoError { path: path.as_ref().to_path_buf(), source }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        Error::IoError { path, source: err.into() }
    }
}

/// Convenience type alias for Results with pmake's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to report
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
