//! nodebaker's main application entry point and orchestration logic.
//! Handles command-line argument parsing, selection and parameter gathering,
//! composition, and writing the generated project.

use std::path::PathBuf;

use nodebaker::{
    catalog::Catalog,
    cli::{get_args, Args},
    config::{load_config, load_parameters_from_stdin, PackageManager},
    constants::CONFIG_FILES,
    engine::Composer,
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    project::{plan_project, ProjectOptions},
    prompt::{
        prompt_package_manager, prompt_project_name, prompt_selections, validate_project_name,
        DialoguerPrompter, NonInteractivePrompter, Prompter,
    },
    renderer::PlaceholderRenderer,
    resolver::Parameters,
    writer::{ensure_output_dir, write_plan},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the generation config and the template catalog
/// 2. Determines the project name and output directory
/// 3. Collects selections: command line, config file, then prompts
/// 4. Collects parameters: command line, then stdin
/// 5. Composes the selected variants
/// 6. Plans and writes the project tree
fn run(args: Args) -> Result<()> {
    let interactive = !args.non_interactive;
    let prompt: Box<dyn Prompter> = if interactive {
        Box::new(DialoguerPrompter::new())
    } else {
        Box::new(NonInteractivePrompter::new())
    };

    let cwd = std::env::current_dir()?;
    let config = load_config(args.config.as_deref(), &cwd, &CONFIG_FILES)?;
    let catalog = match &args.templates {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::builtin()?,
    };

    let requested_name = match &args.project_name {
        Some(name) => {
            validate_project_name(name)?;
            name.clone()
        }
        None if interactive => prompt_project_name(&*prompt)?,
        None => {
            return Err(Error::ValidationError(
                "a project name is required in non-interactive mode".to_string(),
            ))
        }
    };

    let (project_name, output_root) = if requested_name == "." {
        let dir_name = cwd
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::ValidationError("current directory has no valid name".to_string())
            })?
            .to_string();
        (dir_name, cwd.clone())
    } else {
        let output_root = ensure_output_dir(PathBuf::from(&requested_name), args.force)?;
        (requested_name, output_root)
    };

    let mut selection = args.selection_set();
    selection.fill_from(&config.selections);
    if interactive {
        prompt_selections(&*prompt, &catalog, &mut selection)?;
    }

    let package_manager = match args.package_manager.or(config.package_manager) {
        Some(package_manager) => package_manager,
        None if interactive => prompt_package_manager(&*prompt)?,
        None => PackageManager::default(),
    };

    let mut user_params = if args.stdin { load_parameters_from_stdin()? } else { Parameters::new() };
    user_params.extend(args.parameters());
    user_params.entry("projectName".to_string()).or_insert_with(|| project_name.clone());

    let renderer = PlaceholderRenderer::new();
    let composition =
        Composer::new(&catalog, &renderer).compose(&selection, &user_params, &config.defaults)?;

    let options = ProjectOptions { name: project_name, package_manager };
    let plan = plan_project(&catalog, &options, &composition)?;

    for (action, path) in write_plan(&plan, &output_root, &*prompt, args.skip_overwrite_check)? {
        println!("{}: '{}'", action, path.display());
    }

    println!("Project created successfully in {}.", output_root.display());
    Ok(())
}
