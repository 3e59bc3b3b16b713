//! Code-map candidate collection and priority scoring.
//!
//! Candidates are every non-ignored source file with a recognized grammar
//! (files whose parse fails are still summarized by the regex fallback).
//! Each candidate is scored into a coarse priority band; the packer
//! consumes candidates best-first, ties broken alphabetically by path, so
//! the ordering is deterministic regardless of walk order.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::ContextConfig;
use crate::grammar::{GrammarRegistry, Language};
use crate::signature::{self, SignatureEntry, SignatureKind, fallback};
use crate::tree::is_ignored;

/// Priority bands, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilePriority {
    /// Recognized entry points (`index`, `main`, ...).
    EntryPoint,
    /// Request/service/handler-style logic.
    Handler,
    /// General implementation files.
    Implementation,
    /// Schema, constants, environment definitions.
    Schema,
    /// Pure re-export (barrel) files.
    Barrel,
    /// Only type declarations, no implementation.
    TypesOnly,
}

const ENTRY_POINT_STEMS: &[&str] = &["index", "main", "app", "server"];

const HANDLER_MARKERS: &[&str] = &[
    "handler",
    "service",
    "controller",
    "route",
    "middleware",
    "api",
    "endpoint",
];

const SCHEMA_MARKERS: &[&str] = &["schema", "constant", "env", "config"];

/// One source file ready for packing.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Path relative to the project root, forward slashes.
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub entries: Vec<SignatureEntry>,
    pub priority: FilePriority,
}

/// Score a file from its path and extracted entries.
pub fn score(rel_path: &str, entries: &[SignatureEntry]) -> FilePriority {
    // Content-derived bands first: a barrel is a barrel even when it is
    // named index.ts.
    if !entries.is_empty()
        && entries
            .iter()
            .all(|e| e.kind == SignatureKind::Const && e.name.starts_with("re-export"))
    {
        return FilePriority::Barrel;
    }
    if !entries.is_empty()
        && entries.iter().all(|e| {
            matches!(
                e.kind,
                SignatureKind::Interface | SignatureKind::Type | SignatureKind::Enum
            )
        })
    {
        return FilePriority::TypesOnly;
    }

    let lower = rel_path.to_lowercase();
    let stem = Path::new(&lower)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    if ENTRY_POINT_STEMS.contains(&stem.as_str()) {
        return FilePriority::EntryPoint;
    }
    if HANDLER_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return FilePriority::Handler;
    }
    if SCHEMA_MARKERS.iter().any(|marker| stem.contains(marker)) {
        return FilePriority::Schema;
    }
    FilePriority::Implementation
}

fn excluded_from_signatures(rel_path: &str, file_name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|compiled| compiled.matches(rel_path) || compiled.matches(file_name))
            .unwrap_or(false)
    })
}

/// Walk the project and build the sorted candidate list.
///
/// Per-directory read failures are treated as empty subtrees; a file whose
/// parse fails falls back to the regex extractor rather than dropping out.
pub fn collect_candidates(
    root: &Path,
    config: &ContextConfig,
    registry: &mut GrammarRegistry,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        entry.path() == root || !is_ignored(&name, &[])
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%err, "skipping unreadable walk entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(language) = Language::from_path(entry.path()) else {
            continue;
        };
        let rel_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let file_name = entry.file_name().to_string_lossy();
        if excluded_from_signatures(&rel_path, &file_name, &config.exclude_signatures) {
            continue;
        }

        let Ok(source) = std::fs::read_to_string(entry.path()) else {
            debug!(path = %rel_path, "skipping unreadable file");
            continue;
        };
        let entries = match signature::extract(&source, language, registry) {
            Some(entries) => entries,
            None => fallback::extract(&source),
        };
        if entries.is_empty() {
            continue;
        }

        let priority = score(&rel_path, &entries);
        candidates.push(Candidate {
            rel_path,
            abs_path: entry.path().to_path_buf(),
            entries,
            priority,
        });
    }

    candidates.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.rel_path.cmp(&b.rel_path))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn entry(kind: SignatureKind, name: &str) -> SignatureEntry {
        SignatureEntry {
            kind,
            name: name.to_string(),
            signature: name.to_string(),
            exported: true,
            line: 1,
        }
    }

    #[test]
    fn test_entry_point_outranks_handler_and_implementation() {
        let function = [entry(SignatureKind::Function, "go")];
        let index = score("src/index.ts", &function);
        let handler = score("src/user-handler.ts", &function);
        let implementation = score("src/parser.ts", &function);
        assert_eq!(index, FilePriority::EntryPoint);
        assert_eq!(handler, FilePriority::Handler);
        assert_eq!(implementation, FilePriority::Implementation);
        assert!(index < handler);
        assert!(handler < implementation);
    }

    #[test]
    fn test_barrel_detected_even_when_named_index() {
        let barrel = [
            entry(SignatureKind::Const, "re-export from ./a"),
            entry(SignatureKind::Const, "re-export from ./b"),
        ];
        assert_eq!(score("src/index.ts", &barrel), FilePriority::Barrel);
    }

    #[test]
    fn test_types_only_is_lowest() {
        let types = [
            entry(SignatureKind::Interface, "User"),
            entry(SignatureKind::Type, "Id"),
        ];
        assert_eq!(score("src/models.ts", &types), FilePriority::TypesOnly);
        assert!(FilePriority::Barrel < FilePriority::TypesOnly);
    }

    #[test]
    fn test_schema_stem_detected() {
        let consts = [entry(SignatureKind::Const, "LIMIT")];
        assert_eq!(score("src/constants.ts", &consts), FilePriority::Schema);
        assert_eq!(score("src/env.ts", &consts), FilePriority::Schema);
    }

    #[test]
    fn test_collect_skips_ignored_and_excluded() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
        fs::write(
            dir.path().join("node_modules/dep/index.ts"),
            "export function hidden(): void {}",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/app.ts"),
            "export function run(): void {}",
        )
        .unwrap();
        fs::write(
            dir.path().join("src/app.test.ts"),
            "export function testRun(): void {}",
        )
        .unwrap();

        let config = ContextConfig::default();
        let mut registry = GrammarRegistry::new();
        let candidates = collect_candidates(dir.path(), &config, &mut registry);

        let paths: Vec<_> = candidates.iter().map(|c| c.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["src/app.ts"]);
    }

    #[test]
    fn test_collect_sorts_by_priority_then_path() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("zeta.ts"), "export function z(): void {}").unwrap();
        fs::write(src.join("alpha.ts"), "export function a(): void {}").unwrap();
        fs::write(src.join("main.ts"), "export function boot(): void {}").unwrap();

        let config = ContextConfig::default();
        let mut registry = GrammarRegistry::new();
        let candidates = collect_candidates(dir.path(), &config, &mut registry);
        let paths: Vec<_> = candidates.iter().map(|c| c.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["src/main.ts", "src/alpha.ts", "src/zeta.ts"]);
    }
}
