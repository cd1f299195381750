//! Command-line interface implementation for nodebaker.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::catalog::{Category, VariantId};
use crate::config::PackageManager;
use crate::engine::SelectionSet;
use crate::resolver::Parameters;

/// Command-line arguments structure for nodebaker.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "nodebaker: compose a TypeScript backend project from database and server templates",
    long_about = None
)]
pub struct Args {
    /// Project name, or '.' to generate into the current directory
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Variant to use for a category, e.g. `db=postgresql`. Can be repeated.
    #[arg(short = 's', long = "select", value_name = "CATEGORY=VARIANT", value_parser = parse_selection)]
    pub selections: Vec<(Category, VariantId)>,

    /// Template parameter, e.g. `port=5000`. Can be repeated.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Package manager the generated README documents
    #[arg(long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Use the template tree in this directory instead of the built-in one
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Generation config file (defaults to nodebaker.{json,yml,yaml} in the working directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force generation into an existing output directory
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Never prompt; unset categories fall back to their catalog defaults
    #[arg(short = 'y', long)]
    pub non_interactive: bool,

    /// Skip confirmation prompts when overwriting existing files.
    /// This will automatically overwrite any existing files in the output directory
    /// without asking for confirmation.
    #[arg(long)]
    pub skip_overwrite_check: bool,

    /// Read template parameters as a JSON object from stdin
    #[arg(long)]
    pub stdin: bool,
}

impl Args {
    pub fn selection_set(&self) -> SelectionSet {
        self.selections.iter().cloned().collect()
    }

    /// Parameters given with `--param`; later occurrences win.
    pub fn parameters(&self) -> Parameters {
        self.params.iter().cloned().collect()
    }
}

fn parse_selection(s: &str) -> Result<(Category, VariantId), String> {
    let (category, variant) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid selection '{}': expected CATEGORY=VARIANT", s))?;
    let category: Category = category.trim().parse().map_err(|e| format!("{}", e))?;
    let variant = variant.trim();
    if variant.is_empty() {
        return Err(format!("no variant given for category '{}'", category));
    }
    Ok((category, VariantId::new(variant)))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected KEY=VALUE", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid parameter '{}': empty key", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
