//! Ignore pattern handling for template trees.
//! Processes `.templateignore` files to exclude specific paths from catalog
//! scanning, similar to .gitignore functionality.

use crate::constants::DEFAULT_IGNORE_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::{fs::read_to_string, path::Path};

/// Reads the ignore file and builds a set of glob patterns.
///
/// # Notes
/// - If the ignore file doesn't exist, only the default patterns apply
/// - Each non-blank line not starting with `#` is a glob pattern
/// - Invalid patterns result in a `CatalogError`
///
/// # Example
/// ```ignore
/// # Contents of .templateignore:
/// *.orig
/// drafts/**
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(ignore_path: P) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(Glob::new(pattern).map_err(ignore_error)?);
    }

    if let Ok(contents) = read_to_string(ignore_path.as_ref()) {
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(Glob::new(line).map_err(ignore_error)?);
        }
    } else {
        debug!("{} does not exist", ignore_path.as_ref().display());
    }

    builder.build().map_err(ignore_error)
}

fn ignore_error(e: globset::Error) -> Error {
    Error::CatalogError(format!("ignore patterns loading failed: {}", e))
}
