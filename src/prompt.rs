//! User input and interaction handling.
//! Collects the project name, category selections and package manager when
//! they were not given on the command line.

use dialoguer::{Confirm, Input, Select};
use log::debug;

use crate::catalog::Catalog;
use crate::config::PackageManager;
use crate::engine::SelectionSet;
use crate::error::{Error, Result};

/// Entry offered for optional categories to opt out of them.
pub const NONE_CHOICE: &str = "none";

/// Minimal prompt surface, so interaction can be replaced in tests and in
/// non-interactive runs.
pub trait Prompter {
    /// Asks a yes/no question; `skip` answers yes without asking.
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool>;

    fn input(&self, prompt: String, default: Option<String>) -> Result<String>;

    /// Returns the index of the chosen item.
    fn select(&self, prompt: String, items: &[String], default: usize) -> Result<usize>;
}

#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        DialoguerPrompter
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn input(&self, prompt: String, default: Option<String>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default);
        }
        Ok(input.interact_text()?)
    }

    fn select(&self, prompt: String, items: &[String], default: usize) -> Result<usize> {
        Ok(Select::new().with_prompt(prompt).items(items).default(default).interact()?)
    }
}

/// Answers every question with its default, never blocking on input.
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl NonInteractivePrompter {
    pub fn new() -> Self {
        NonInteractivePrompter
    }
}

impl Prompter for NonInteractivePrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        debug!("Answering '{}' with {}", prompt, skip);
        Ok(skip)
    }

    fn input(&self, prompt: String, default: Option<String>) -> Result<String> {
        default.ok_or_else(|| {
            Error::ValidationError(format!("'{}' requires a value in non-interactive mode", prompt))
        })
    }

    fn select(&self, _prompt: String, _items: &[String], default: usize) -> Result<usize> {
        Ok(default)
    }
}

/// Checks a project name; `.` stands for the current directory.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name == "." {
        return Ok(());
    }
    if name.chars().count() < 3 {
        return Err(Error::ValidationError(
            "Project name should be at least 3 characters".to_string(),
        ));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::ValidationError(
            "Project name must not contain path separators".to_string(),
        ));
    }
    Ok(())
}

pub fn prompt_project_name(prompt: &dyn Prompter) -> Result<String> {
    let name = prompt.input("Project Name (enter '.' for current folder)".to_string(), None)?;
    let name = name.trim().to_string();
    validate_project_name(&name)?;
    Ok(name)
}

/// Asks for every catalog category that `selection` leaves open.
///
/// Optional categories get an extra [`NONE_CHOICE`] entry; choosing it leaves
/// the category unselected.
pub fn prompt_selections(
    prompt: &dyn Prompter,
    catalog: &Catalog,
    selection: &mut SelectionSet,
) -> Result<()> {
    for spec in catalog.categories() {
        let category = spec.category();
        if selection.contains(category) {
            continue;
        }

        let variants = catalog.list_variants(category);
        let mut items: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
        if !spec.is_mandatory() {
            items.push(NONE_CHOICE.to_string());
        }
        let default = match spec.default_variant() {
            Some(default) => variants.iter().position(|v| *v == default).unwrap_or(0),
            None if !spec.is_mandatory() => variants.len(),
            None => 0,
        };

        let choice = prompt.select(spec.label().to_string(), &items, default)?;
        match variants.get(choice) {
            Some(variant) => {
                selection.select(category, (*variant).clone());
            }
            None => debug!("No variant chosen for optional category {}", category),
        }
    }
    Ok(())
}

pub fn prompt_package_manager(prompt: &dyn Prompter) -> Result<PackageManager> {
    let items: Vec<String> =
        PackageManager::ALL.iter().map(|pm| pm.as_str().to_string()).collect();
    let choice = prompt.select("Select your package manager".to_string(), &items, 0)?;
    Ok(PackageManager::ALL.get(choice).copied().unwrap_or_default())
}
