//! Read-only project facts consumed by the overview section.
//!
//! Detection (runtime, frameworks, monorepo layout) is a separate
//! collaborator; this crate only defines the record it hands over, plus a
//! minimal constructor the CLI uses when no detector output is available.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Facts about the project being summarized. Consumed, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Runtime/platform label, e.g. "node", "python", "rust".
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub tooling: Vec<String>,
    /// Monorepo workspace member paths, empty for single-package projects.
    #[serde(default)]
    pub workspaces: Vec<String>,
}

impl ProjectInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            runtime: None,
            frameworks: Vec::new(),
            tooling: Vec::new(),
            workspaces: Vec::new(),
        }
    }

    /// Fallback used when no detector ran: the directory name is the
    /// project name and everything else stays empty.
    pub fn from_dir_name(root: &Path) -> Self {
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string());
        Self::new(&name)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_runtime(mut self, runtime: &str) -> Self {
        self.runtime = Some(runtime.to_string());
        self
    }

    pub fn with_frameworks(mut self, frameworks: Vec<String>) -> Self {
        self.frameworks = frameworks;
        self
    }

    pub fn is_monorepo(&self) -> bool {
        !self.workspaces.is_empty()
    }
}
