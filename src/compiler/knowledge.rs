//! Knowledge section assembly.
//!
//! User-authored markdown from the configured knowledge directory is
//! included verbatim, sorted alphabetically. When auto-knowledge is
//! enabled, the generated notes file is held back from the alphabetical
//! listing and appended last so user-authored documents always come
//! first. A missing or unreadable directory yields an empty section.

use std::path::Path;

use tracing::debug;

use crate::config::ContextConfig;

/// File name the (externally generated) notes land under.
pub const AUTO_NOTES_FILE: &str = "auto-notes.md";

pub fn build_knowledge(root: &Path, config: &ContextConfig) -> String {
    let dir = root.join(&config.knowledge_dir);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %dir.display(), %err, "no knowledge directory");
            return String::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".md"))
        .collect();
    names.sort();

    let auto_notes = names.iter().position(|name| name == AUTO_NOTES_FILE);
    if let Some(index) = auto_notes {
        let name = names.remove(index);
        if config.auto_knowledge {
            names.push(name);
        }
    }

    let mut out = String::new();
    for name in names {
        let path = dir.join(&name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), %err, "skipping unreadable knowledge file");
                continue;
            }
        };
        let stem = name.strip_suffix(".md").unwrap_or(&name);
        out.push_str(&format!("### {}\n\n{}\n\n", stem, content.trim_end()));
    }
    out
}
