//! nodebaker composes TypeScript backend projects from template variants.
//! It selects exactly one variant per category (database driver, server
//! framework, ...), substitutes parameters into the templates and merges
//! their package dependencies into a single manifest.

/// Variant catalog: categories, variants and their template descriptors
pub mod catalog;

/// Command-line interface module for the nodebaker application
pub mod cli;

/// Generation configuration (nodebaker.json, nodebaker.yml, nodebaker.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// npm-style version constraints and merged dependency sets
pub mod dependency;

/// Composition of selected variants into project files
pub mod engine;

/// Error types and handling for the nodebaker application
pub mod error;

/// Ignore patterns applied when scanning template trees
pub mod ignore;

/// Logging initialization
pub mod logger;

/// package.json emission
pub mod manifest;

/// Placeholder tokenizer
pub mod placeholder;

/// Project tree planning: folders, manifest, README and env example
pub mod project;

/// User input and interaction handling
pub mod prompt;

/// Template rendering
pub mod renderer;

/// Parameter resolution and validation
pub mod resolver;

/// Writes planned project trees to disk
pub mod writer;
