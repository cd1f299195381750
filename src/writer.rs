//! Writes a planned project tree to disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::project::ProjectPlan;
use crate::prompt::Prompter;

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Overwritten,
    Skipped,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            WriteAction::Created => "Created",
            WriteAction::Overwritten => "Overwritten",
            WriteAction::Skipped => "Skipped",
        };
        f.write_str(action)
    }
}

fn write_file(content: &str, dest_path: &Path) -> Result<()> {
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest_path, content)?;
    Ok(())
}

/// Creates the plan's directories and files under `output_root`.
///
/// Existing files are only replaced after `prompt` confirms it; declined
/// files are reported as skipped.
pub fn write_plan(
    plan: &ProjectPlan,
    output_root: &Path,
    prompt: &dyn Prompter,
    skip_overwrite_check: bool,
) -> Result<Vec<(WriteAction, PathBuf)>> {
    for dir in &plan.directories {
        let target = output_root.join(dir);
        debug!("Creating directory {}", target.display());
        fs::create_dir_all(&target)?;
    }

    let mut report = Vec::with_capacity(plan.files.len());
    for file in &plan.files {
        let target = output_root.join(&file.path);
        let action = if target.exists() {
            let overwrite = prompt.confirm(
                skip_overwrite_check,
                format!("File '{}' already exists. Overwrite it?", file.path),
            )?;
            if !overwrite {
                debug!("Keeping existing {}", target.display());
                report.push((WriteAction::Skipped, target));
                continue;
            }
            WriteAction::Overwritten
        } else {
            WriteAction::Created
        };

        write_file(&file.content, &target)?;
        report.push((action, target));
    }
    Ok(report)
}
