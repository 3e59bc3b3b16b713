//! Context compilation.
//!
//! Builds the five document sections in fixed order against the initial
//! allocation, measures what each actually used, runs the surplus
//! redistribution, then rebuilds only the code map against its revised
//! share. The code map is the one section with an elastic, prioritizable
//! content set; the others are fixed-size or already exhaustive.

pub mod knowledge;
pub mod priority;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::budget::{
    Allocation, CHARS_PER_TOKEN, SectionId, allocate, estimate_tokens, redistribute,
};
use crate::config::{ContextConfig, SignatureDepth};
use crate::errors::ContextError;
use crate::grammar::GrammarRegistry;
use crate::project::ProjectInfo;
use crate::signature::{SignatureEntry, SignatureKind};
use crate::tree::{TreeOptions, adaptive_tree};

use knowledge::build_knowledge;
use priority::{Candidate, collect_candidates};

/// One emitted document section. Immutable after emission.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub content: String,
    pub tokens_used: usize,
}

/// Result of one compilation run.
#[derive(Debug, Clone)]
pub struct ContextResult {
    pub sections: Vec<Section>,
    /// Estimated tokens of the assembled document.
    pub total_tokens: usize,
    /// Files dropped from the code map after the per-file cap was
    /// exhausted, in packing order.
    pub truncated_files: Vec<String>,
    pub document: String,
}

/// Orchestrates one compilation run over a project root.
pub struct ContextCompiler<'a> {
    root: &'a Path,
    project: &'a ProjectInfo,
    config: &'a ContextConfig,
    registry: &'a mut GrammarRegistry,
}

impl<'a> ContextCompiler<'a> {
    pub fn new(
        root: &'a Path,
        project: &'a ProjectInfo,
        config: &'a ContextConfig,
        registry: &'a mut GrammarRegistry,
    ) -> Self {
        Self {
            root,
            project,
            config,
            registry,
        }
    }

    /// Build the document. The only fatal failure is an unreadable
    /// project root; everything below that recovers locally.
    pub fn compile(&mut self) -> Result<ContextResult, ContextError> {
        if let Err(source) = std::fs::read_dir(self.root) {
            return Err(ContextError::ProjectRootUnreadable {
                path: self.root.to_path_buf(),
                source,
            });
        }

        let allocation = allocate(self.config.budget);
        debug!(budget = self.config.budget, "allocated section shares");

        let overview = self.build_overview();
        let structure = self.build_structure(allocation.get(SectionId::Structure));
        let key_files = self.build_key_files(allocation.get(SectionId::KeyFiles));
        let candidates = collect_candidates(self.root, self.config, self.registry);
        let (mut code_map, mut truncated_files) =
            self.build_code_map(&candidates, allocation.get(SectionId::CodeMap));
        let knowledge = build_knowledge(self.root, self.config);

        let mut used = Allocation::new();
        used.set(SectionId::Overview, estimate_tokens(&overview));
        used.set(SectionId::Structure, estimate_tokens(&structure));
        used.set(SectionId::KeyFiles, estimate_tokens(&key_files));
        used.set(SectionId::CodeMap, estimate_tokens(&code_map));
        used.set(SectionId::Knowledge, estimate_tokens(&knowledge));

        let revised = redistribute(&allocation, &used);
        if revised.get(SectionId::CodeMap) != allocation.get(SectionId::CodeMap) {
            debug!(
                initial = allocation.get(SectionId::CodeMap),
                revised = revised.get(SectionId::CodeMap),
                "repacking code map against revised share"
            );
            (code_map, truncated_files) =
                self.build_code_map(&candidates, revised.get(SectionId::CodeMap));
        }

        let contents = [overview, structure, key_files, code_map, knowledge];
        let sections: Vec<Section> = SectionId::ALL
            .into_iter()
            .zip(contents)
            .map(|(id, content)| Section {
                id,
                title: id.title().to_string(),
                tokens_used: estimate_tokens(&content),
                content,
            })
            .collect();

        let document = render_document(&self.project.name, &sections);
        let total_tokens = estimate_tokens(&document);

        Ok(ContextResult {
            sections,
            total_tokens,
            truncated_files,
            document,
        })
    }

    fn build_overview(&self) -> String {
        let project = self.project;
        let mut lines = Vec::new();
        if let Some(description) = &project.description {
            lines.push(description.clone());
            lines.push(String::new());
        }
        if let Some(runtime) = &project.runtime {
            lines.push(format!("- Runtime: {}", runtime));
        }
        if !project.frameworks.is_empty() {
            lines.push(format!("- Frameworks: {}", project.frameworks.join(", ")));
        }
        if !project.tooling.is_empty() {
            lines.push(format!("- Tooling: {}", project.tooling.join(", ")));
        }
        if !project.workspaces.is_empty() {
            lines.push(format!("- Workspaces: {}", project.workspaces.join(", ")));
        }
        lines.join("\n")
    }

    fn build_structure(&self, share: usize) -> String {
        let significant: HashSet<String> = self.config.key_files.iter().cloned().collect();
        let options = TreeOptions::default();
        // The code fence costs a couple of tokens around the tree itself.
        let tree = adaptive_tree(self.root, share.saturating_sub(2), &options, &significant);
        if tree.is_empty() {
            return String::new();
        }
        format!("```\n{}```", tree)
    }

    fn build_key_files(&self, share: usize) -> String {
        if self.config.key_files.is_empty() {
            return String::new();
        }
        let cap_tokens = share / self.config.key_files.len();
        let max_chars = cap_tokens * CHARS_PER_TOKEN;

        let mut out = String::new();
        for rel_path in &self.config.key_files {
            let path = self.root.join(rel_path);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %path.display(), %err, "key file unreadable, skipping");
                    continue;
                }
            };
            let fence_lang = Path::new(rel_path)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("");
            let mut body = content.trim_end().to_string();
            if body.chars().count() > max_chars {
                body = body.chars().take(max_chars).collect();
                body.push_str("\n[truncated]");
            }
            out.push_str(&format!("### {}\n\n```{}\n{}\n```\n\n", rel_path, fence_lang, body));
        }
        out
    }

    /// Pack candidates best-first under a per-file cap recomputed from the
    /// remaining share, so later files inherit whatever earlier files left
    /// unused. Oversized blocks collapse their verbose type members first
    /// and drop into the truncated list only if that still does not fit.
    fn build_code_map(&self, candidates: &[Candidate], share: usize) -> (String, Vec<String>) {
        let mut out = String::new();
        let mut truncated = Vec::new();
        let mut remaining = share;
        let total = candidates.len();

        for (index, candidate) in candidates.iter().enumerate() {
            let cap = remaining / (total - index);

            let entries: Vec<&SignatureEntry> = candidate
                .entries
                .iter()
                .filter(|entry| {
                    self.config.signature_depth == SignatureDepth::All || entry.exported
                })
                .collect();
            if entries.is_empty() {
                continue;
            }

            let block = render_block(candidate, &entries, false, &self.config.code_map_format);
            let tokens = estimate_tokens(&block);
            if tokens <= cap {
                out.push_str(&block);
                remaining -= tokens;
                continue;
            }

            let collapsed = render_block(candidate, &entries, true, &self.config.code_map_format);
            let tokens = estimate_tokens(&collapsed);
            if tokens <= cap {
                out.push_str(&collapsed);
                remaining -= tokens;
            } else {
                truncated.push(candidate.rel_path.clone());
            }
        }
        (out, truncated)
    }
}

/// Declarative kinds whose member lists may be collapsed to a placeholder.
fn collapsible(kind: SignatureKind) -> bool {
    matches!(
        kind,
        SignatureKind::Interface | SignatureKind::Type | SignatureKind::Enum | SignatureKind::Class
    )
}

fn collapse_signature(signature: &str) -> String {
    match signature.find('{') {
        Some(index) => format!("{} {{ ... }}", signature[..index].trim_end()),
        None => format!(
            "{} ...",
            signature.lines().next().unwrap_or(signature).trim_end()
        ),
    }
}

fn render_block(
    candidate: &Candidate,
    entries: &[&SignatureEntry],
    collapse: bool,
    format: &str,
) -> String {
    if format == "paths" {
        return format!("- {}\n", candidate.rel_path);
    }

    let mut out = format!("### {}\n\n```\n", candidate.rel_path);
    for (index, entry) in entries.iter().enumerate() {
        let signature = if collapse && collapsible(entry.kind) && entry.signature.contains('\n') {
            collapse_signature(&entry.signature)
        } else {
            entry.signature.clone()
        };
        out.push_str(&signature);
        out.push('\n');
        if index + 1 < entries.len() {
            out.push('\n');
        }
    }
    out.push_str("```\n\n");
    out
}

fn render_document(project_name: &str, sections: &[Section]) -> String {
    let mut out = format!("# {}\n\n", project_name);
    for section in sections {
        out.push_str(&format!("## {}\n\n", section.title));
        let content = section.content.trim_end();
        if !content.is_empty() {
            out.push_str(content);
            out.push_str("\n\n");
        }
    }
    out.trim_end().to_string() + "\n"
}
