//! Project planning: turns a composition into the complete file tree of a new
//! project (folders, composed sources, manifest, env example, README).

use minijinja::Environment;
use serde_json::json;

use crate::catalog::Catalog;
use crate::config::PackageManager;
use crate::constants::PROJECT_SOURCE_DIRS;
use crate::engine::CompositionResult;
use crate::error::Result;
use crate::manifest::PackageJson;

const README_TEMPLATE: &str = include_str!("../templates/project/README.md.j2");
const GITIGNORE: &str = include_str!("../templates/project/gitignore");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub name: String,
    pub package_manager: PackageManager,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Path relative to the project root
    pub path: String,
    pub content: String,
}

/// Everything the writer has to create, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPlan {
    pub directories: Vec<String>,
    pub files: Vec<PlannedFile>,
}

impl ProjectPlan {
    pub fn file(&self, path: &str) -> Option<&PlannedFile> {
        self.files.iter().find(|file| file.path == path)
    }
}

pub fn plan_project(
    catalog: &Catalog,
    options: &ProjectOptions,
    composition: &CompositionResult,
) -> Result<ProjectPlan> {
    let mut directories: Vec<String> =
        PROJECT_SOURCE_DIRS.iter().map(|dir| format!("src/{}", dir)).collect();
    for dir in composition.directories() {
        let path = format!("src/{}", dir);
        if !directories.contains(&path) {
            directories.push(path);
        }
    }

    let mut files = vec![PlannedFile {
        path: "package.json".to_string(),
        content: PackageJson::new(&options.name, composition).to_json()?,
    }];
    files.extend(composition.files().iter().map(|file| PlannedFile {
        path: file.path().to_string(),
        content: file.content().to_string(),
    }));
    files.push(PlannedFile { path: ".env.example".to_string(), content: env_example(composition) });
    files.push(PlannedFile { path: ".gitignore".to_string(), content: GITIGNORE.to_string() });
    files.push(PlannedFile {
        path: "README.md".to_string(),
        content: render_readme(catalog, options, composition)?,
    });

    Ok(ProjectPlan { directories, files })
}

fn env_example(composition: &CompositionResult) -> String {
    composition
        .env()
        .iter()
        .map(|(name, entry)| format!("{}={}\n", name, env_value(&entry.value)))
        .collect()
}

/// Values that dotenv parsers would split, strip or treat as a comment are
/// double-quoted with `\\`, `"`, newlines and carriage returns escaped.
fn env_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.chars().any(|c| c.is_control() || matches!(c, '#' | '"' | '\'' | '\\' | '`'));
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn render_readme(
    catalog: &Catalog,
    options: &ProjectOptions,
    composition: &CompositionResult,
) -> Result<String> {
    let variants = composition
        .files()
        .iter()
        .map(|file| {
            let descriptor = catalog.lookup(file.category(), file.variant().as_str())?;
            Ok(json!({
                "title": descriptor.title(),
                "homepage": descriptor.homepage(),
                "role": file.category().role(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let context = json!({
        "project": {
            "name": options.name,
            "package_manager": options.package_manager.as_str(),
            "install_command": options.package_manager.install_command(),
            "run_command": options.package_manager.run_command(),
        },
        "variants": variants,
        "env": composition.env().keys().collect::<Vec<_>>(),
        "port": composition.env().get("PORT").map(|entry| entry.value.as_str()),
    });

    let mut env = Environment::new();
    env.add_template("README.md", README_TEMPLATE)?;
    let mut readme = env.get_template("README.md")?.render(&context)?;
    readme.push('\n');
    Ok(readme)
}
