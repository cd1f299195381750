//! Composition engine.
//!
//! Picks exactly one variant per catalog category, resolves and renders each
//! selected template into its category's output slot, and merges declared
//! dependencies and environment variables. Composition is pure: nothing is
//! written here, and any error aborts the whole run.

use indexmap::IndexMap;
use log::debug;

use crate::catalog::{Catalog, Category, TemplateDescriptor, VariantId};
use crate::constants::PROJECT_ORIGIN;
use crate::dependency::{Constraint, DependencySet};
use crate::error::{Error, Result};
use crate::renderer::{PlaceholderRenderer, TemplateRenderer};
use crate::resolver::{resolve, Parameters};

/// The chosen variant per category; at most one per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    choices: IndexMap<Category, VariantId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `variant` for `category`, returning the previous choice.
    pub fn select<V: Into<VariantId>>(&mut self, category: Category, variant: V) -> Option<VariantId> {
        self.choices.insert(category, variant.into())
    }

    pub fn with<V: Into<VariantId>>(mut self, category: Category, variant: V) -> Self {
        self.select(category, variant);
        self
    }

    pub fn get(&self, category: Category) -> Option<&VariantId> {
        self.choices.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.choices.contains_key(&category)
    }

    /// Adds the choices of `other` for categories not selected yet.
    pub fn fill_from(&mut self, other: &SelectionSet) {
        for (category, variant) in other.iter() {
            self.choices.entry(category).or_insert_with(|| variant.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &VariantId)> {
        self.choices.iter().map(|(category, variant)| (*category, variant))
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl FromIterator<(Category, VariantId)> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = (Category, VariantId)>>(iter: T) -> Self {
        SelectionSet { choices: iter.into_iter().collect() }
    }
}

/// A rendered template placed at its category's output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    path: String,
    content: String,
    category: Category,
    variant: VariantId,
}

impl RenderedFile {
    /// Output path relative to the project root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn variant(&self) -> &VariantId {
        &self.variant
    }
}

/// A merged environment variable and the descriptor that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub value: String,
    pub origin: String,
}

/// Output of one composition run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionResult {
    files: Vec<RenderedFile>,
    dependencies: DependencySet,
    dev_dependencies: DependencySet,
    env: IndexMap<String, EnvEntry>,
    directories: Vec<String>,
}

impl CompositionResult {
    /// Rendered files in category order.
    pub fn files(&self) -> &[RenderedFile] {
        &self.files
    }

    pub fn file_at(&self, path: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub fn dev_dependencies(&self) -> &DependencySet {
        &self.dev_dependencies
    }

    pub fn env(&self) -> &IndexMap<String, EnvEntry> {
        &self.env
    }

    /// Extra `src/` folders requested by the selected variants, without duplicates.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }
}

/// Runs compositions against a shared, read-only catalog.
pub struct Composer<'a> {
    catalog: &'a Catalog,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Composer<'a> {
    pub fn new(catalog: &'a Catalog, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { catalog, renderer }
    }

    /// Determines the descriptor of every category taking part in the run,
    /// in catalog category order.
    ///
    /// # Errors
    /// * `Error::UnknownVariant` if the selection names an unregistered pair
    /// * `Error::NoVariantSelected` if a mandatory category has no selection and no default
    pub fn resolve_selection(&self, selection: &SelectionSet) -> Result<Vec<&'a TemplateDescriptor>> {
        let catalog = self.catalog;
        for (category, variant) in selection.iter() {
            catalog.lookup(category, variant.as_str())?;
        }

        let mut descriptors = Vec::new();
        for spec in catalog.categories() {
            let category = spec.category();
            let variant = match (selection.get(category), spec.default_variant()) {
                (Some(variant), _) => variant,
                (None, Some(default)) => {
                    debug!("No {} selected, falling back to default '{}'", category, default);
                    default
                }
                (None, None) if spec.is_mandatory() => {
                    return Err(Error::NoVariantSelected { category });
                }
                (None, None) => {
                    debug!("Skipping optional category {}", category);
                    continue;
                }
            };
            descriptors.push(catalog.lookup(category, variant.as_str())?);
        }
        Ok(descriptors)
    }

    /// Composes the project files and merged dependency sets for `selection`.
    pub fn compose(
        &self,
        selection: &SelectionSet,
        user_params: &Parameters,
        global_defaults: &Parameters,
    ) -> Result<CompositionResult> {
        let descriptors = self.resolve_selection(selection)?;
        let mut result = CompositionResult::default();

        merge_dependencies(&mut result.dependencies, self.catalog.project_dependencies(), PROJECT_ORIGIN)?;
        merge_dependencies(
            &mut result.dev_dependencies,
            self.catalog.project_dev_dependencies(),
            PROJECT_ORIGIN,
        )?;

        for descriptor in descriptors {
            let id = descriptor.id();
            let path = descriptor.category().output_slot();
            if result.file_at(path).is_some() {
                return Err(Error::CatalogError(format!(
                    "output slot '{}' is already occupied when rendering '{}'",
                    path, id
                )));
            }

            let parameters = resolve(descriptor, user_params, global_defaults)?;
            let content = self.renderer.render(descriptor, &parameters)?;

            for (variable, template) in descriptor.env() {
                let origin = format!("{} env {}", id, variable);
                let value = self.renderer.render_str(template, &parameters, &origin)?;
                merge_env(&mut result.env, variable, value, &id)?;
            }

            merge_dependencies(&mut result.dependencies, descriptor.dependencies(), &id)?;
            merge_dependencies(&mut result.dev_dependencies, descriptor.dev_dependencies(), &id)?;

            for directory in descriptor.directories() {
                if !result.directories.contains(directory) {
                    result.directories.push(directory.clone());
                }
            }

            debug!("Rendered {} into {}", id, path);
            result.files.push(RenderedFile {
                path: path.to_string(),
                content,
                category: descriptor.category(),
                variant: descriptor.variant().clone(),
            });
        }

        Ok(result)
    }
}

/// Composes with the default [`PlaceholderRenderer`].
pub fn compose(
    catalog: &Catalog,
    selection: &SelectionSet,
    user_params: &Parameters,
    global_defaults: &Parameters,
) -> Result<CompositionResult> {
    Composer::new(catalog, &PlaceholderRenderer).compose(selection, user_params, global_defaults)
}

fn merge_dependencies(
    set: &mut DependencySet,
    declared: &IndexMap<String, Constraint>,
    origin: &str,
) -> Result<()> {
    for (name, constraint) in declared {
        set.merge(name, constraint, origin)?;
    }
    Ok(())
}

fn merge_env(
    env: &mut IndexMap<String, EnvEntry>,
    variable: &str,
    value: String,
    origin: &str,
) -> Result<()> {
    match env.get(variable) {
        Some(existing) if existing.value != value => Err(Error::EnvConflict {
            variable: variable.to_string(),
            first: existing.value.clone(),
            first_origin: existing.origin.clone(),
            second: value,
            second_origin: origin.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            env.insert(variable.to_string(), EnvEntry { value, origin: origin.to_string() });
            Ok(())
        }
    }
}
