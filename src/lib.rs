//! pmake creates C and C++ projects from pre-defined templates.
//! Templates are copied into the new project, preprocessed against the
//! selected language, standard, kind, mode and features, and finally have
//! their name wildcards replaced.

/// Project catalog (pmake-info.json) loading and selection resolution
pub mod catalog;

/// Command-line interface module for pmake
pub mod cli;

/// Common constants used throughout the crate
pub mod constants;

/// Error types and handling for pmake
pub mod error;

/// File ignore patterns
/// Processes the .pmakeignore file to exclude assets from text processing
pub mod ignore;

/// Logger setup for the binary
pub mod logger;

/// The `@@` template preprocessing engine
pub mod preprocessor;

/// Project generation orchestration
/// Copies templates, runs the preprocessor and replaces wildcards
pub mod processor;
