//! Adaptive directory overview.
//!
//! Builds a navigable tree of the project with ignore filtering, a depth
//! bound, and a collapse rule for oversized directories, then searches
//! decreasing depths until the rendered tree fits a token budget. Depth 1
//! is always accepted, so even a pathologically large tree yields output.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::budget::estimate_tokens;

/// A directory with more visible children than this collapses into a
/// summary node, unless it is the root or holds a significant path.
pub const COLLAPSE_THRESHOLD: usize = 15;

/// Starting depth for the adaptive budget search.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Always pruned, for rendering and for signature walks alike.
const DEFAULT_IGNORE: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".primer",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    ".next",
    "__pycache__",
    ".venv",
    "venv",
    "coverage",
    ".cache",
    ".idea",
    "*.lock",
    "package-lock.json",
    ".DS_Store",
    "Thumbs.db",
];

/// Suppressed from the rendered tree only; signature walks still see these.
const DISPLAY_NOISE: &[&str] = &[
    "*.lock",
    "package-lock.json",
    ".gitignore",
    ".gitattributes",
    ".editorconfig",
    ".eslintrc*",
    ".prettierrc*",
    "*.min.js",
    "*.map",
];

/// Caller-tunable knobs for tree building.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Extra ignore patterns merged with the built-in defaults.
    pub ignore: Vec<String>,
    /// `(pattern, annotation)` pairs; see [`resolve_annotation`].
    pub annotations: Vec<(String, String)>,
    pub max_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            annotations: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One node of the overview tree.
///
/// `CollapsedSummary` is an explicit variant so callers cannot mistake a
/// collapsed directory for an empty one.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    File {
        name: String,
        path: String,
        annotation: Option<String>,
    },
    Directory {
        name: String,
        path: String,
        children: Vec<TreeNode>,
    },
    CollapsedSummary {
        path: String,
        file_count: usize,
        dir_count: usize,
    },
}

/// Simple glob: `*` matches any run of characters, everything else is
/// literal. Patterns without `*` compare as exact strings.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == text;
    }
    let mut compiled = String::with_capacity(pattern.len() + 8);
    compiled.push('^');
    for part in pattern.split('*') {
        if !compiled.ends_with('^') {
            compiled.push_str(".*");
        }
        compiled.push_str(&regex::escape(part));
    }
    compiled.push('$');
    regex::Regex::new(&compiled)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Whether `name` matches the built-in ignore list or an extra pattern.
pub fn is_ignored(name: &str, extra: &[String]) -> bool {
    DEFAULT_IGNORE
        .iter()
        .any(|pattern| glob_match(pattern, name))
        || extra.iter().any(|pattern| glob_match(pattern, name))
}

fn is_display_noise(name: &str) -> bool {
    DISPLAY_NOISE
        .iter()
        .any(|pattern| glob_match(pattern, name))
}

/// Resolve a file's annotation: exact filename match first, then the first
/// pattern (treated as a glob when it contains `*` or a path separator)
/// matching the relative path.
pub fn resolve_annotation(
    name: &str,
    rel_path: &str,
    annotations: &[(String, String)],
) -> Option<String> {
    for (pattern, annotation) in annotations {
        if pattern == name {
            return Some(annotation.clone());
        }
    }
    for (pattern, annotation) in annotations {
        if (pattern.contains('*') || pattern.contains('/')) && glob_match(pattern, rel_path) {
            return Some(annotation.clone());
        }
    }
    None
}

fn is_significant(rel_path: &str, significant: &HashSet<String>) -> bool {
    if rel_path.is_empty() {
        return true;
    }
    let prefix = format!("{}/", rel_path);
    significant
        .iter()
        .any(|path| path == rel_path || path.starts_with(&prefix))
}

/// Immediate visible children of a directory, after ignore and noise
/// filtering. Unreadable directories count as empty.
fn shallow_counts(dir: &Path, options: &TreeOptions) -> (usize, usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return (0, 0);
    };
    let mut files = 0;
    let mut dirs = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if is_ignored(&name, &options.ignore) {
            continue;
        }
        if entry.path().is_dir() {
            dirs += 1;
        } else if !is_display_noise(&name) {
            files += 1;
        }
    }
    (files, dirs)
}

/// Build the overview tree for `root`'s children. The root itself never
/// collapses and is not represented by a node.
pub fn build_tree(
    root: &Path,
    options: &TreeOptions,
    significant: &HashSet<String>,
) -> Vec<TreeNode> {
    build_children(root, "", 1, options, significant)
}

fn build_children(
    dir: &Path,
    rel_prefix: &str,
    depth: usize,
    options: &TreeOptions,
    significant: &HashSet<String>,
) -> Vec<TreeNode> {
    if depth > options.max_depth {
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            // Unreadable directory: empty subtree, keep walking siblings.
            debug!(path = %dir.display(), %err, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut names: Vec<(String, bool)> = entries
        .flatten()
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.path().is_dir();
            (name, is_dir)
        })
        .filter(|(name, _)| !is_ignored(name, &options.ignore))
        .collect();
    names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut nodes = Vec::new();
    for (name, is_dir) in names {
        let rel_path = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", rel_prefix, name)
        };
        let abs_path = dir.join(&name);

        if is_dir {
            let (file_count, dir_count) = shallow_counts(&abs_path, options);
            if file_count + dir_count == 0 {
                continue;
            }
            if file_count + dir_count > COLLAPSE_THRESHOLD
                && !is_significant(&rel_path, significant)
            {
                nodes.push(TreeNode::CollapsedSummary {
                    path: rel_path,
                    file_count,
                    dir_count,
                });
                continue;
            }
            let children = build_children(&abs_path, &rel_path, depth + 1, options, significant);
            // Dropped children below the depth bound still leave the
            // directory itself visible; a directory that came back empty
            // within the bound has nothing to show at all.
            if children.is_empty() && depth + 1 <= options.max_depth && file_count == 0 {
                continue;
            }
            nodes.push(TreeNode::Directory {
                name,
                path: rel_path,
                children,
            });
        } else {
            if is_display_noise(&name) {
                continue;
            }
            let annotation = resolve_annotation(&name, &rel_path, &options.annotations);
            nodes.push(TreeNode::File {
                name,
                path: rel_path,
                annotation,
            });
        }
    }
    nodes
}

/// Render a tree as indented text.
pub fn render(nodes: &[TreeNode]) -> String {
    let mut out = String::new();
    render_into(nodes, 0, &mut out);
    out
}

fn render_into(nodes: &[TreeNode], depth: usize, out: &mut String) {
    for node in nodes {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match node {
            TreeNode::File {
                name, annotation, ..
            } => {
                out.push_str(name);
                if let Some(annotation) = annotation {
                    out.push_str("  # ");
                    out.push_str(annotation);
                }
                out.push('\n');
            }
            TreeNode::Directory { name, children, .. } => {
                out.push_str(name);
                out.push_str("/\n");
                render_into(children, depth + 1, out);
            }
            TreeNode::CollapsedSummary {
                path,
                file_count,
                dir_count,
            } => {
                let name = path.rsplit('/').next().unwrap_or(path);
                out.push_str(&format!(
                    "{}/ ({} files, {} directories)\n",
                    name, file_count, dir_count
                ));
            }
        }
    }
}

/// Render the deepest tree that fits `budget_tokens`, searching from the
/// configured maximum depth down to 1. Depth 1 is accepted regardless of
/// size, so this terminates in at most `max_depth` builds and never
/// returns an empty overview for a non-empty project.
pub fn adaptive_tree(
    root: &Path,
    budget_tokens: usize,
    options: &TreeOptions,
    significant: &HashSet<String>,
) -> String {
    let start_depth = options.max_depth.max(1);
    for depth in (1..=start_depth).rev() {
        let bounded = TreeOptions {
            max_depth: depth,
            ..options.clone()
        };
        let rendered = render(&build_tree(root, &bounded, significant));
        if estimate_tokens(&rendered) <= budget_tokens || depth == 1 {
            debug!(depth, tokens = estimate_tokens(&rendered), "tree depth accepted");
            return rendered;
        }
    }
    String::new()
}
