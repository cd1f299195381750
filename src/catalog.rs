//! Variant catalog: the registry of template descriptors.
//!
//! Each template source lives at `<category>/<variant>.<ext>`. Required
//! parameters are derived by scanning the source for placeholders. Variant
//! defaults, validators, environment variables and package dependencies are
//! declared in the catalog metadata file next to the sources.

use std::borrow::Borrow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use cruet::Inflector;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::constants::{CATALOG_FILES, IGNORE_FILE};
use crate::dependency::Constraint;
use crate::error::{Error, Result};
use crate::ignore::parse_ignore_file;
use crate::placeholder::{placeholder_names, Syntax};
use crate::resolver::Validator;

const BUILTIN_METADATA: &str = include_str!("../templates/catalog.yaml");

/// Every variant source under `templates/`. `Catalog::from_dir("templates")`
/// must yield the same catalog.
const BUILTIN_SOURCES: [(&str, &str); 8] = [
    ("db/mysql.ts", include_str!("../templates/db/mysql.ts")),
    ("db/postgresql.ts", include_str!("../templates/db/postgresql.ts")),
    ("db/sqlite.ts", include_str!("../templates/db/sqlite.ts")),
    ("db/typeorm-mysql.ts", include_str!("../templates/db/typeorm-mysql.ts")),
    ("db/typeorm-postgresql.ts", include_str!("../templates/db/typeorm-postgresql.ts")),
    ("db/typeorm-sqlite.ts", include_str!("../templates/db/typeorm-sqlite.ts")),
    ("server/express.ts", include_str!("../templates/server/express.ts")),
    ("lint/eslint.json", include_str!("../templates/lint/eslint.json")),
];

/// An axis of mutually exclusive choice in the generated project.
///
/// The declaration order is the composition order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Db,
    Server,
    Lint,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Db, Category::Server, Category::Lint];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Db => "db",
            Category::Server => "server",
            Category::Lint => "lint",
        }
    }

    /// Canonical location of the category's file in the generated project.
    /// Only one variant can ever occupy it.
    pub fn output_slot(self) -> &'static str {
        match self {
            Category::Db => "src/config/db.ts",
            Category::Server => "src/main.ts",
            Category::Lint => ".eslintrc.json",
        }
    }

    /// Human readable role, used in the generated README.
    pub fn role(self) -> &'static str {
        match self {
            Category::Db => "Database",
            Category::Server => "Web framework",
            Category::Lint => "Linter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory { category: s.to_string() })
    }
}

/// Identifier of one concrete alternative within a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        VariantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantId {
    fn from(id: &str) -> Self {
        VariantId::new(id)
    }
}

impl Borrow<str> for VariantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Catalog metadata as authored in `catalog.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogMetadata {
    #[serde(default)]
    pub project: ProjectMetadata,
    #[serde(default)]
    pub categories: IndexMap<Category, CategoryMetadata>,
}

/// Packages every generated project depends on.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryMetadata {
    /// Prompt shown when asking for this category
    pub label: Option<String>,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
    /// Variant used when the user selects nothing
    pub default: Option<String>,
    #[serde(default)]
    pub variants: IndexMap<String, VariantMetadata>,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantMetadata {
    pub title: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub defaults: IndexMap<String, String>,
    #[serde(default)]
    pub validators: IndexMap<String, Validator>,
    /// Environment variable name -> value template over the variant's parameters
    #[serde(default)]
    pub env: IndexMap<String, String>,
    /// Extra folders created under `src/` when the variant is selected
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,
}

impl CatalogMetadata {
    /// Parses catalog metadata, trying JSON first and then YAML.
    pub fn parse(content: &str) -> Result<Self> {
        match serde_json::from_str(content) {
            Ok(metadata) => Ok(metadata),
            Err(_) => serde_yaml::from_str(content).map_err(|e| {
                Error::CatalogError(format!("invalid catalog metadata: {}", e))
            }),
        }
    }
}

/// Catalog metadata bound to one variant. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    category: Category,
    variant: VariantId,
    source_path: String,
    source: String,
    syntax: Syntax,
    parameters: Vec<String>,
    defaults: IndexMap<String, String>,
    validators: IndexMap<String, Validator>,
    env: IndexMap<String, String>,
    directories: Vec<String>,
    dependencies: IndexMap<String, Constraint>,
    dev_dependencies: IndexMap<String, Constraint>,
    title: String,
    homepage: Option<String>,
}

impl TemplateDescriptor {
    fn build(
        category: Category,
        variant: VariantId,
        source_path: String,
        source: String,
        metadata: VariantMetadata,
    ) -> Result<Self> {
        let id = format!("{}/{}", category, variant);
        let syntax = Syntax::from_path(&source_path);
        let parameters = placeholder_names(&source, &source_path, syntax)?;

        for name in metadata.defaults.keys().chain(metadata.validators.keys()) {
            if !parameters.contains(name) {
                return Err(Error::CatalogError(format!(
                    "'{}' declares parameter '{}' which its template never uses",
                    id, name
                )));
            }
        }

        for (variable, value) in &metadata.env {
            let origin = format!("{} env {}", id, variable);
            for name in placeholder_names(value, &origin, Syntax::Plain)? {
                if !parameters.contains(&name) {
                    return Err(Error::CatalogError(format!(
                        "environment variable '{}' of '{}' uses parameter '{}' which its template never uses",
                        variable, id, name
                    )));
                }
            }
        }

        for directory in &metadata.directories {
            let valid = !directory.is_empty()
                && directory
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(Error::CatalogError(format!(
                    "'{}' declares invalid source folder '{}'",
                    id, directory
                )));
            }
        }

        let title = metadata.title.unwrap_or_else(|| variant.as_str().to_title_case());

        Ok(TemplateDescriptor {
            category,
            source_path,
            source,
            syntax,
            parameters,
            defaults: metadata.defaults,
            validators: metadata.validators,
            env: metadata.env,
            directories: metadata.directories,
            dependencies: parse_dependencies(&metadata.dependencies)?,
            dev_dependencies: parse_dependencies(&metadata.dev_dependencies)?,
            title,
            homepage: metadata.homepage,
            variant,
        })
    }

    /// `<category>/<variant>`, used to name the descriptor in errors and logs.
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.variant)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn variant(&self) -> &VariantId {
        &self.variant
    }

    /// Path of the template relative to the template tree root.
    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lexical rules of the source, derived from its file extension.
    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Parameter names in order of first appearance in the source.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn default_for(&self, parameter: &str) -> Option<&str> {
        self.defaults.get(parameter).map(String::as_str)
    }

    pub fn validator_for(&self, parameter: &str) -> Option<Validator> {
        self.validators.get(parameter).copied()
    }

    pub fn env(&self) -> &IndexMap<String, String> {
        &self.env
    }

    /// Folder names, relative to `src/`, the variant needs in the project.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn dependencies(&self) -> &IndexMap<String, Constraint> {
        &self.dependencies
    }

    pub fn dev_dependencies(&self) -> &IndexMap<String, Constraint> {
        &self.dev_dependencies
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }
}

/// One category of the catalog with its registered variants.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    category: Category,
    label: String,
    mandatory: bool,
    default: Option<VariantId>,
    variants: IndexMap<VariantId, TemplateDescriptor>,
}

impl CategorySpec {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn default_variant(&self) -> Option<&VariantId> {
        self.default.as_ref()
    }

    pub fn variants(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.variants.values()
    }
}

/// Read-only registry of every template descriptor, built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: IndexMap<Category, CategorySpec>,
    dependencies: IndexMap<String, Constraint>,
    dev_dependencies: IndexMap<String, Constraint>,
}

impl Catalog {
    /// Builds the catalog from the templates embedded in the binary.
    pub fn builtin() -> Result<Self> {
        let metadata = CatalogMetadata::parse(BUILTIN_METADATA)?;
        Self::from_sources(metadata, BUILTIN_SOURCES)
    }

    /// Builds the catalog by scanning a template tree on disk.
    ///
    /// # Errors
    /// * `Error::CatalogError` if the directory does not exist or metadata is inconsistent
    /// * `Error::UnknownCategory` for a directory that is not a known category
    /// * `Error::MalformedPlaceholder` for an invalid placeholder token
    pub fn from_dir<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::CatalogError(format!(
                "template directory '{}' does not exist",
                root.display()
            )));
        }

        let metadata = match CATALOG_FILES.iter().map(|f| root.join(f)).find(|p| p.exists()) {
            Some(path) => {
                debug!("Loading catalog metadata from {}", path.display());
                CatalogMetadata::parse(&fs::read_to_string(&path)?)?
            }
            None => {
                debug!("No catalog metadata in {}", root.display());
                CatalogMetadata::default()
            }
        };

        let ignored = parse_ignore_file(root.join(IGNORE_FILE))?;
        let mut sources = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| Error::CatalogError(e.to_string()))?
                .to_str()
                .ok_or_else(|| Error::CatalogError("non UTF-8 template path".to_string()))?
                .replace('\\', "/");

            if CATALOG_FILES.contains(&relative.as_str()) || ignored.is_match(&relative) {
                debug!("Skipping ignored file {}", relative);
                continue;
            }
            if relative.split('/').count() != 2 {
                debug!("Skipping {}: not a <category>/<variant> template", relative);
                continue;
            }

            let content = fs::read_to_string(entry.path())?;
            sources.push((relative, content));
        }

        Self::from_sources(metadata, sources)
    }

    /// Builds the catalog from `(relative path, source)` pairs and metadata.
    pub fn from_sources<I, P, S>(metadata: CatalogMetadata, sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let CatalogMetadata { project, categories: mut category_metadata } = metadata;
        let mut registered: IndexMap<Category, IndexMap<VariantId, TemplateDescriptor>> =
            IndexMap::new();

        for (path, source) in sources {
            let path: String = path.into();
            let (dir, file) = path
                .split_once('/')
                .filter(|(_, file)| !file.contains('/'))
                .ok_or_else(|| {
                    Error::CatalogError(format!(
                        "template path '{}' is not <category>/<variant>",
                        path
                    ))
                })?;
            let category: Category = dir.parse()?;
            let stem = Path::new(file).file_stem().and_then(|s| s.to_str()).unwrap_or(file);
            let variant = VariantId::new(stem);

            let variant_metadata = category_metadata
                .get_mut(&category)
                .and_then(|meta| meta.variants.shift_remove(variant.as_str()))
                .unwrap_or_default();

            let variants = registered.entry(category).or_default();
            if variants.contains_key(&variant) {
                return Err(Error::CatalogError(format!(
                    "variant '{}/{}' is defined more than once",
                    category, variant
                )));
            }

            let descriptor = TemplateDescriptor::build(
                category,
                variant.clone(),
                path.clone(),
                source.into(),
                variant_metadata,
            )?;
            debug!(
                "Registered {} with parameters {:?}",
                descriptor.id(),
                descriptor.parameters()
            );
            variants.insert(variant, descriptor);
        }

        for (category, meta) in &category_metadata {
            if let Some(variant) = meta.variants.keys().next() {
                return Err(Error::CatalogError(format!(
                    "metadata declares '{}/{}' but no template source exists",
                    category, variant
                )));
            }
        }

        let mut categories = IndexMap::new();
        for category in Category::ALL {
            let meta = category_metadata.shift_remove(&category);
            let Some(variants) = registered.shift_remove(&category) else {
                continue;
            };

            let (label, mandatory, default) = match meta {
                Some(meta) => (meta.label, meta.mandatory, meta.default.map(VariantId::new)),
                None => (None, true, None),
            };
            if let Some(default) = &default {
                if !variants.contains_key(default) {
                    return Err(Error::CatalogError(format!(
                        "default variant '{}' of category '{}' does not exist",
                        default, category
                    )));
                }
            }

            categories.insert(
                category,
                CategorySpec {
                    category,
                    label: label.unwrap_or_else(|| format!("Select {}", category)),
                    mandatory,
                    default,
                    variants,
                },
            );
        }

        Ok(Catalog {
            categories,
            dependencies: parse_dependencies(&project.dependencies)?,
            dev_dependencies: parse_dependencies(&project.dev_dependencies)?,
        })
    }

    /// Returns the descriptor registered for `category`/`variant`.
    ///
    /// # Errors
    /// * `Error::UnknownVariant` if no such descriptor exists
    pub fn lookup(&self, category: Category, variant: &str) -> Result<&TemplateDescriptor> {
        self.categories
            .get(&category)
            .and_then(|spec| spec.variants.get(variant))
            .ok_or_else(|| Error::UnknownVariant { category, variant: variant.to_string() })
    }

    /// Registered categories in composition order.
    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.keys().copied().collect()
    }

    /// Variants of `category` in catalog order; empty for unknown categories.
    pub fn list_variants(&self, category: Category) -> Vec<&VariantId> {
        self.categories
            .get(&category)
            .map(|spec| spec.variants.keys().collect())
            .unwrap_or_default()
    }

    pub fn category(&self, category: Category) -> Option<&CategorySpec> {
        self.categories.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategorySpec> {
        self.categories.values()
    }

    pub fn project_dependencies(&self) -> &IndexMap<String, Constraint> {
        &self.dependencies
    }

    pub fn project_dev_dependencies(&self) -> &IndexMap<String, Constraint> {
        &self.dev_dependencies
    }
}

fn parse_dependencies(declared: &IndexMap<String, String>) -> Result<IndexMap<String, Constraint>> {
    declared
        .iter()
        .map(|(name, raw)| Ok((name.clone(), Constraint::parse(name, raw)?)))
        .collect()
}
