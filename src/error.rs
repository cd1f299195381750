//! Error handling for the nodebaker application.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

use crate::catalog::Category;

/// Custom error types for nodebaker operations.
///
/// Every error aborts the current composition. Nothing is retried internally
/// since all failures stem from invalid input or catalog authoring bugs.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A template directory or selection names a category that does not exist
    #[error("Unknown category '{category}'.")]
    UnknownCategory { category: String },

    /// The requested category/variant pair is not registered in the catalog
    #[error("Unknown variant '{variant}' for category '{category}'.")]
    UnknownVariant { category: Category, variant: String },

    /// No user value, variant default or global default exists for a parameter
    #[error("Missing parameter '{parameter}' required by '{descriptor}'.")]
    MissingParameter { parameter: String, descriptor: String },

    /// A resolved parameter value was rejected by its declared validator
    #[error("Invalid value for parameter '{parameter}' of '{descriptor}': {reason}.")]
    InvalidParameter { parameter: String, descriptor: String, reason: String },

    /// The template references a placeholder absent from its parameter set
    #[error("Unresolved placeholder '{placeholder}' in '{descriptor}'.")]
    UnresolvedPlaceholder { placeholder: String, descriptor: String },

    /// A `{{` sequence that does not form a valid placeholder token
    #[error("Malformed placeholder in '{template}' at line {line}.")]
    MalformedPlaceholder { template: String, line: usize },

    /// A mandatory category has neither a selection nor a default variant
    #[error("No variant selected for mandatory category '{category}'.")]
    NoVariantSelected { category: Category },

    /// Two selected variants declare incompatible version constraints
    #[error(
        "Dependency conflict for '{name}': '{first}' (from {first_origin}) is incompatible with '{second}' (from {second_origin})."
    )]
    DependencyConflict {
        name: String,
        first: String,
        first_origin: String,
        second: String,
        second_origin: String,
    },

    /// A declared version constraint could not be parsed
    #[error("Invalid version constraint '{constraint}' for '{name}': {reason}.")]
    InvalidConstraint { name: String, constraint: String, reason: String },

    /// Two selected variants declare the same environment variable with different values
    #[error(
        "Environment variable '{variable}' is set to '{first}' by {first_origin} and to '{second}' by {second_origin}."
    )]
    EnvConflict {
        variable: String,
        first: String,
        first_origin: String,
        second: String,
        second_origin: String,
    },

    /// Represents inconsistencies between catalog metadata and template sources
    #[error("Catalog error: {0}.")]
    CatalogError(String),

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents validation failures in user input
    #[error("Validation error: {0}.")]
    ValidationError(String),

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Directory traversal error: {0}.")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Prompt error: {0}.")]
    PromptError(#[from] dialoguer::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
