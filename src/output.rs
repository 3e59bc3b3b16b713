//! Output persistence.
//!
//! Generated documents land under a fixed root in the user's home
//! directory, at a path derived deterministically from the project's
//! absolute path: every path separator becomes `-`, the leading separator
//! included, so `/home/dev/acme` maps to `-home-dev-acme.md` and two
//! projects can never collide.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::errors::ContextError;

/// Output root, relative to the user's home directory.
pub const OUTPUT_ROOT: &str = ".primer/contexts";

/// Mangle an absolute project path into a flat file name.
pub fn mangle_project_path(project_root: &Path) -> String {
    let raw = project_root.to_string_lossy();
    let mangled: String = raw
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect();
    format!("{}.md", mangled)
}

/// Absolute path the document for `project_root` persists to.
pub fn context_output_path(project_root: &Path) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(OUTPUT_ROOT).join(mangle_project_path(project_root)))
}

/// Write the document, stamping a generation header. Returns the path
/// written to.
pub fn persist(document: &str, project_root: &Path) -> Result<PathBuf, ContextError> {
    let path = context_output_path(project_root)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ContextError::OutputWriteFailed {
            path: path.clone(),
            source,
        })?;
    }
    let stamped = format!(
        "<!-- Generated by primer at {} -->\n\n{}",
        Utc::now().to_rfc3339(),
        document
    );
    std::fs::write(&path, stamped).map_err(|source| ContextError::OutputWriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
