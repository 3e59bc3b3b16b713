//! Regex heuristic extractor.
//!
//! Used when no grammar is available for a file or its parse fails: scans
//! line starts for declaration-shaped keywords across common languages so
//! the pipeline never loses a file solely to a parse failure. Best-effort
//! by construction; body exclusion is approximated by taking only the
//! declaration line.

use std::sync::OnceLock;

use regex::Regex;

use super::{SignatureEntry, SignatureKind};

fn patterns() -> &'static [(Regex, SignatureKind)] {
    static PATTERNS: OnceLock<Vec<(Regex, SignatureKind)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let modifiers = r"(?:export\s+|default\s+|public\s+|private\s+|protected\s+|internal\s+|static\s+|async\s+|final\s+|abstract\s+|pub(?:\([^)]*\))?\s+|unsafe\s+)*";
        let table: [(String, SignatureKind); 6] = [
            (
                format!(r"^\s*{modifiers}(?:function|fn|def|func)\s+([A-Za-z_$][A-Za-z0-9_$]*)"),
                SignatureKind::Function,
            ),
            (
                format!(r"^\s*{modifiers}(?:class|struct|trait)\s+([A-Za-z_][A-Za-z0-9_]*)"),
                SignatureKind::Class,
            ),
            (
                format!(r"^\s*{modifiers}interface\s+([A-Za-z_][A-Za-z0-9_]*)"),
                SignatureKind::Interface,
            ),
            (
                format!(r"^\s*{modifiers}enum\s+([A-Za-z_][A-Za-z0-9_]*)"),
                SignatureKind::Enum,
            ),
            (
                format!(r"^\s*{modifiers}type\s+([A-Za-z_][A-Za-z0-9_]*)\s*="),
                SignatureKind::Type,
            ),
            (
                format!(r"^\s*{modifiers}(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)"),
                SignatureKind::Const,
            ),
        ];
        table
            .into_iter()
            .map(|(pattern, kind)| (Regex::new(&pattern).unwrap(), kind))
            .collect()
    })
}

/// Scan `source` line by line, emitting one entry per declaration-shaped
/// line. Always succeeds; an unrecognizable file just yields no entries.
pub fn extract(source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    for (index, raw_line) in source.lines().enumerate() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with('#') {
            continue;
        }
        for (pattern, kind) in patterns() {
            if let Some(captures) = pattern.captures(raw_line) {
                let name = captures
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "anonymous".to_string());
                let signature = trimmed
                    .trim_end_matches('{')
                    .trim_end_matches(';')
                    .trim_end()
                    .to_string();
                entries.push(SignatureEntry {
                    kind: *kind,
                    name,
                    signature,
                    exported: true,
                    line: index + 1,
                });
                break;
            }
        }
    }
    entries
}
