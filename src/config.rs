//! Per-project configuration.
//!
//! Read from `.primer/config.toml`. Every field is optional and every
//! field fails independently: a bad value is reported and replaced with
//! its default without discarding the rest of the file. A completely
//! unparseable file falls back to full defaults. Loading therefore never
//! returns an error.
//!
//! # Configuration File Format
//!
//! ```toml
//! budget = 12000
//! key_files = ["src/main.rs", "README.md"]
//! exclude_signatures = ["*.test.*", "*.spec.*"]
//! knowledge_dir = ".primer/knowledge"
//! signature_depth = "exports"
//! auto_knowledge = false
//! code_map_format = "signatures"
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::warn;

/// Location of the config file, relative to the project root.
pub const CONFIG_FILE: &str = ".primer/config.toml";

/// Token budget bounds; values outside are replaced with the default.
pub const MIN_BUDGET: usize = 1_000;
pub const MAX_BUDGET: usize = 100_000;
pub const DEFAULT_BUDGET: usize = 12_000;

pub const DEFAULT_KNOWLEDGE_DIR: &str = ".primer/knowledge";

fn default_exclude_signatures() -> Vec<String> {
    vec![
        "*.test.*".to_string(),
        "*.spec.*".to_string(),
        "*_test.*".to_string(),
    ]
}

/// Which extracted signatures the code map keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureDepth {
    /// Only declarations marked exported.
    #[default]
    Exports,
    /// Every extracted declaration.
    All,
}

impl std::fmt::Display for SignatureDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureDepth::Exports => write!(f, "exports"),
            SignatureDepth::All => write!(f, "all"),
        }
    }
}

/// Validated per-project settings, loaded once per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ContextConfig {
    /// Total token budget for the generated document.
    pub budget: usize,
    /// Files rendered in full in the key-files section; also significant
    /// paths for the structure tree.
    pub key_files: Vec<String>,
    /// Glob patterns for files excluded from signature extraction.
    pub exclude_signatures: Vec<String>,
    /// Directory of user-authored knowledge documents.
    pub knowledge_dir: String,
    pub signature_depth: SignatureDepth,
    /// Append generated notes after user-authored knowledge.
    pub auto_knowledge: bool,
    /// `"signatures"` (default) or `"paths"`.
    pub code_map_format: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            key_files: Vec::new(),
            exclude_signatures: default_exclude_signatures(),
            knowledge_dir: DEFAULT_KNOWLEDGE_DIR.to_string(),
            signature_depth: SignatureDepth::default(),
            auto_knowledge: false,
            code_map_format: "signatures".to_string(),
        }
    }
}

impl ContextConfig {
    /// Load the config for `project_dir`, defaulting anything missing or
    /// invalid. Never fails.
    pub fn load(project_dir: &Path) -> Self {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "config unreadable, using defaults");
                return Self::default();
            }
        };
        match text.parse::<toml::Value>() {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                warn!(path = %path.display(), %err, "config unparseable, using defaults");
                Self::default()
            }
        }
    }

    /// Field-by-field extraction so one bad value cannot poison the rest.
    fn from_value(value: &toml::Value) -> Self {
        let mut config = Self::default();

        if let Some(raw) = value.get("budget") {
            match raw.as_integer() {
                Some(n) if (MIN_BUDGET as i64..=MAX_BUDGET as i64).contains(&n) => {
                    config.budget = n as usize;
                }
                _ => warn!("invalid budget {:?}, using default {}", raw, DEFAULT_BUDGET),
            }
        }

        if let Some(raw) = value.get("key_files") {
            match string_array(raw) {
                Some(files) => config.key_files = files,
                None => warn!("invalid key_files, using default (empty)"),
            }
        }

        if let Some(raw) = value.get("exclude_signatures") {
            match string_array(raw) {
                Some(patterns) => config.exclude_signatures = patterns,
                None => warn!("invalid exclude_signatures, using defaults"),
            }
        }

        if let Some(raw) = value.get("knowledge_dir") {
            match raw.as_str() {
                Some(dir) if !dir.is_empty() => config.knowledge_dir = dir.to_string(),
                _ => warn!("invalid knowledge_dir, using {}", DEFAULT_KNOWLEDGE_DIR),
            }
        }

        if let Some(raw) = value.get("signature_depth") {
            match raw.as_str() {
                Some("exports") => config.signature_depth = SignatureDepth::Exports,
                Some("all") => config.signature_depth = SignatureDepth::All,
                _ => warn!("invalid signature_depth {:?}, using exports", raw),
            }
        }

        if let Some(raw) = value.get("auto_knowledge") {
            match raw.as_bool() {
                Some(flag) => config.auto_knowledge = flag,
                None => warn!("invalid auto_knowledge, using false"),
            }
        }

        if let Some(raw) = value.get("code_map_format") {
            match raw.as_str() {
                Some(format @ ("signatures" | "paths")) => {
                    config.code_map_format = format.to_string();
                }
                _ => warn!("invalid code_map_format {:?}, using signatures", raw),
            }
        }

        config
    }
}

fn string_array(value: &toml::Value) -> Option<Vec<String>> {
    let array = value.as_array()?;
    array
        .iter()
        .map(|item| item.as_str().map(|s| s.to_string()))
        .collect()
}
