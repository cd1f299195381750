//! Generation configuration for nodebaker.
//! Loads the optional `nodebaker.{json,yml,yaml}` file holding global default
//! parameters, default selections and the preferred package manager, and
//! converts JSON answers into flat parameter maps.

use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, VariantId};
use crate::engine::SelectionSet;
use crate::error::{Error, Result};
use crate::resolver::Parameters;

/// Package manager the generated project is documented for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] =
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm, PackageManager::Bun];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn install_command(self) -> String {
        format!("{} install", self.as_str())
    }

    /// Prefix for running a package script, e.g. `npm run`.
    pub fn run_command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm run",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun run",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    defaults: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    selections: IndexMap<Category, VariantId>,
    package_manager: Option<PackageManager>,
}

/// Per-run generation settings. Nothing here outlives a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Global default parameters shared by all templates
    pub defaults: Parameters,
    /// Selections used for categories the user did not choose on the command line
    pub selections: SelectionSet,
    pub package_manager: Option<PackageManager>,
}

impl GenerationConfig {
    /// Parses configuration content, trying JSON first and then YAML.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the content is neither valid JSON nor YAML,
    ///   or a default parameter is not a primitive value
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = match serde_json::from_str(content) {
            Ok(raw) => raw,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e)))?,
        };

        let mut defaults = Parameters::new();
        for (name, value) in raw.defaults {
            if let Some(value) = primitive_to_string(&name, &value)? {
                defaults.insert(name, value);
            }
        }

        Ok(GenerationConfig {
            defaults,
            selections: raw.selections.into_iter().collect(),
            package_manager: raw.package_manager,
        })
    }
}

/// Loads the generation config.
///
/// An explicit path must exist. Otherwise the first of `config_files` found in
/// `search_dir` is used, and a missing file yields the default configuration.
pub fn load_config(
    explicit: Option<&Path>,
    search_dir: &Path,
    config_files: &[&str],
) -> Result<GenerationConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::ConfigError(format!(
                "Configuration file '{}' does not exist",
                path.display()
            )));
        }
        debug!("Loading configuration from {}", path.display());
        return GenerationConfig::parse(&std::fs::read_to_string(path)?);
    }

    for file in config_files {
        let config_path = search_dir.join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return GenerationConfig::parse(&std::fs::read_to_string(&config_path)?);
        }
    }

    debug!("No configuration file found (tried: {})", config_files.join(", "));
    Ok(GenerationConfig::default())
}

/// Converts a JSON object of answers into parameters.
///
/// `null` yields no parameters. Strings are taken as is, numbers and booleans
/// by their textual form; `null` members are skipped.
///
/// # Errors
/// * `Error::ConfigError` for non-object input or nested values
pub fn parameters_from_json(value: &serde_json::Value) -> Result<Parameters> {
    let object = match value {
        serde_json::Value::Null => return Ok(Parameters::new()),
        serde_json::Value::Object(object) => object,
        _ => {
            return Err(Error::ConfigError(
                "parameters must be given as a JSON object".to_string(),
            ))
        }
    };

    let mut parameters = Parameters::new();
    for (name, value) in object {
        if let Some(value) = primitive_to_string(name, value)? {
            parameters.insert(name.clone(), value);
        }
    }
    Ok(parameters)
}

/// Parses parameters from JSON text; blank input yields no parameters.
pub fn parse_parameters_json(content: &str) -> Result<Parameters> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(Parameters::new());
    }
    parameters_from_json(&serde_json::from_str(content)?)
}

pub fn load_parameters_from_stdin() -> Result<Parameters> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_parameters_json(&buffer)
}

fn primitive_to_string(name: &str, value: &serde_json::Value) -> Result<Option<String>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s.clone())),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(Error::ConfigError(format!(
            "parameter '{}' must be a string, number or boolean",
            name
        ))),
    }
}
