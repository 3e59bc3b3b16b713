//! Structural signature extraction.
//!
//! Each supported language has one visitor module that walks the parsed
//! syntax tree's top-level declarations (recursing into wrapping constructs
//! such as export statements, decorators, and namespaces) and emits
//! [`SignatureEntry`] values with executable bodies stripped. Declarative
//! bodies (interfaces, enums, data-aggregate structs) are retained in full
//! because there is nothing to strip. Container constructs (classes,
//! traits) get a synthetic signature: the header up to the opening brace
//! plus one line per member, methods sliced to signature-only.
//!
//! The dispatcher is a pure mapping from [`Language`] to one visitor;
//! unsupported languages return `None` and the caller falls back to the
//! regex heuristic in [`fallback`].

mod cpp;
mod csharp;
pub mod fallback;
mod java;
mod php;
mod python;
mod ruby;
mod rust;
mod typescript;

use serde::Serialize;
use tree_sitter::Node;

use crate::grammar::{GrammarRegistry, Language};

/// Structural category of an extracted declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    Function,
    Class,
    Interface,
    Type,
    Enum,
    Const,
}

impl std::fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SignatureKind::Function => "function",
            SignatureKind::Class => "class",
            SignatureKind::Interface => "interface",
            SignatureKind::Type => "type",
            SignatureKind::Enum => "enum",
            SignatureKind::Const => "const",
        };
        write!(f, "{}", label)
    }
}

/// One extracted declaration with its body-stripped signature text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureEntry {
    pub kind: SignatureKind,
    pub name: String,
    pub signature: String,
    pub exported: bool,
    /// 1-indexed source line of the declaration (including any wrapper).
    pub line: usize,
}

/// Extract signatures from `source`. Returns `None` when the grammar is
/// unavailable or the parse fails; callers fall back to [`fallback`].
pub fn extract(
    source: &str,
    language: Language,
    registry: &mut GrammarRegistry,
) -> Option<Vec<SignatureEntry>> {
    let tree = registry.parse(source, language)?;
    let root = tree.root_node();
    let entries = match language {
        Language::TypeScript | Language::Tsx => typescript::extract(root, source),
        Language::Python => python::extract(root, source),
        Language::Rust => rust::extract(root, source),
        Language::Cpp => cpp::extract(root, source),
        Language::Java => java::extract(root, source),
        Language::CSharp => csharp::extract(root, source),
        Language::Ruby => ruby::extract(root, source),
        Language::Php => php::extract(root, source),
    };
    Some(entries)
}

// ---------------------------------------------------------------------------
// Shared node helpers used by the per-language visitors.
//
// Every grammar yields the same `tree_sitter::Node` shape in Rust, so these
// helpers are the single surface the visitors slice text through; no
// grammar-specific node handling leaks past the visitor modules.
// ---------------------------------------------------------------------------

/// Byte-slice `source`, tolerating offsets that fall outside the text.
pub(crate) fn slice(source: &str, start: usize, end: usize) -> &str {
    source.get(start..end).unwrap_or("")
}

/// Full text of a node.
pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    slice(source, node.start_byte(), node.end_byte())
}

/// 1-indexed start line of a node.
pub(crate) fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Signature text from `start_byte` (the outermost wrapper's start, so
/// export markers and decorators are included) to the start of the node's
/// `body` field. A node without a body keeps its full text.
pub(crate) fn signature_up_to_body(source: &str, start_byte: usize, node: Node<'_>) -> String {
    let end = node
        .child_by_field_name("body")
        .map(|body| body.start_byte())
        .unwrap_or_else(|| node.end_byte());
    slice(source, start_byte, end).trim().to_string()
}

/// Member signature inside a container: sliced to the member's body (or an
/// expression-body arrow), with trailing statement terminators stripped.
pub(crate) fn member_signature(source: &str, member: Node<'_>) -> String {
    let mut end = member.end_byte();
    if let Some(body) = member.child_by_field_name("body") {
        end = body.start_byte();
    } else {
        let mut cursor = member.walk();
        for child in member.children(&mut cursor) {
            if child.kind() == "arrow_expression_clause" {
                end = child.start_byte();
                break;
            }
        }
    }
    slice(source, member.start_byte(), end)
        .trim()
        .trim_end_matches(';')
        .trim_end()
        .to_string()
}

/// Build a synthetic container signature: header text up to the body's
/// opening brace (coerced to end in one), one line per member, closed with
/// the container's closing token.
pub(crate) fn container_signature(
    source: &str,
    start_byte: usize,
    body: Node<'_>,
    members: &[String],
    close: &str,
) -> String {
    let mut header = slice(source, start_byte, body.start_byte())
        .trim_end()
        .to_string();
    if !header.ends_with('{') {
        header.push_str(" {");
    }
    let mut out = header;
    for member in members {
        out.push_str("\n  ");
        out.push_str(member);
    }
    out.push('\n');
    out.push_str(close);
    out
}

/// Node kinds recognized as identifier carriers during name resolution.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "property_identifier",
    "constant",
    "name",
    "scoped_identifier",
];

/// Keywords the regex fallback skips when hunting for a name token.
const NAME_SCAN_KEYWORDS: &[&str] = &[
    "export", "default", "declare", "async", "function", "class", "interface", "type", "enum",
    "const", "let", "var", "public", "private", "protected", "internal", "static", "abstract",
    "readonly", "def", "fn", "pub", "struct", "trait", "impl", "final", "void", "namespace",
    "using", "package", "module", "extern", "template", "typename", "unsigned", "new", "return",
    "extends", "implements", "import", "from",
];

/// Resolve a declaration's name: the `name` field first, then a scan of
/// named children for identifier kinds, then a first-token regex scan of
/// the raw text. Unresolvable constructs still get a literal placeholder
/// so the packer can see that something is there.
pub(crate) fn resolve_name(node: Node<'_>, source: &str) -> String {
    if let Some(name) = node.child_by_field_name("name") {
        let text = node_text(name, source).trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if IDENTIFIER_KINDS.contains(&child.kind()) {
            let text = node_text(child, source).trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }

    scan_name(node_text(node, source)).unwrap_or_else(|| "anonymous".to_string())
}

/// First identifier-looking token in `text` that is not a keyword.
pub(crate) fn scan_name(text: &str) -> Option<String> {
    use std::sync::OnceLock;
    static TOKEN: OnceLock<regex::Regex> = OnceLock::new();
    let token = TOKEN.get_or_init(|| regex::Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").unwrap());
    token
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|tok| !NAME_SCAN_KEYWORDS.contains(tok))
        .map(|tok| tok.to_string())
}
