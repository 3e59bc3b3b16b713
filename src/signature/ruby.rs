//! Ruby visitor.
//!
//! Containers close with `end` rather than a brace, so class signatures are
//! assembled manually like the Python ones.

use tree_sitter::Node;

use super::{SignatureEntry, SignatureKind, line_of, node_text, resolve_name, slice};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    visit_children(root, source, &mut entries);
    entries
}

fn visit_children(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, entries);
    }
}

fn visit(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let line = line_of(node);
    match node.kind() {
        "method" | "singleton_method" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(node, source),
                signature: def_signature(node, source),
                exported: true,
                line,
            });
        }
        "class" => {
            entries.push(class_entry(node, source));
        }
        // Modules wrap their members; descend without a separate entry.
        "module" => {
            if let Some(body) = body_of(node) {
                visit_children(body, source, entries);
            }
        }
        "assignment" => visit_assignment(node, source, entries),
        _ => {}
    }
}

/// `def name(args)` up to the body; methods without parentheses slice at
/// the end of the parameter list or name.
fn def_signature(node: Node<'_>, source: &str) -> String {
    let end = body_of(node)
        .map(|body| body.start_byte())
        .or_else(|| node.child_by_field_name("parameters").map(|p| p.end_byte()))
        .or_else(|| node.child_by_field_name("name").map(|n| n.end_byte()))
        .unwrap_or_else(|| node.end_byte());
    slice(source, node.start_byte(), end).trim().to_string()
}

fn body_of<'t>(node: Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("body").or_else(|| {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|child| child.kind() == "body_statement")
    })
}

fn class_entry(node: Node<'_>, source: &str) -> SignatureEntry {
    let name = resolve_name(node, source);
    let line = line_of(node);
    let signature = match body_of(node) {
        Some(body) => {
            let mut out = slice(source, node.start_byte(), body.start_byte())
                .trim_end()
                .to_string();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                let member_text = match member.kind() {
                    "method" | "singleton_method" => Some(def_signature(member, source)),
                    "assignment" => Some(node_text(member, source).trim().to_string()),
                    // attr_accessor and friends
                    "call" => Some(node_text(member, source).trim().to_string()),
                    _ => None,
                };
                if let Some(text) = member_text {
                    out.push_str("\n  ");
                    out.push_str(&text);
                }
            }
            out.push_str("\nend");
            out
        }
        None => node_text(node, source).trim().to_string(),
    };
    SignatureEntry {
        kind: SignatureKind::Class,
        name,
        signature,
        exported: true,
        line,
    }
}

fn visit_assignment(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "constant" {
        return;
    }
    let end = node
        .child_by_field_name("right")
        .map(|right| right.start_byte())
        .unwrap_or_else(|| node.end_byte());
    entries.push(SignatureEntry {
        kind: SignatureKind::Const,
        name: node_text(left, source).trim().to_string(),
        signature: slice(source, node.start_byte(), end)
            .trim()
            .trim_end_matches('=')
            .trim_end()
            .to_string(),
        exported: true,
        line: line_of(node),
    });
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use super::*;
    use crate::grammar::{GrammarRegistry, Language};

    fn extract_rb(source: &str) -> Vec<SignatureEntry> {
        let mut registry = GrammarRegistry::new();
        extract(source, Language::Ruby, &mut registry).unwrap()
    }

    #[test]
    fn test_method_signature_excludes_body() {
        let entries = extract_rb("def fetch(key, default)\n  store[key] || default\nend\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Function);
        assert_eq!(entries[0].name, "fetch");
        assert!(entries[0].signature.contains("def fetch(key, default)"));
        assert!(!entries[0].signature.contains("store[key]"));
    }

    #[test]
    fn test_class_members_are_signatures() {
        let source = "\
class Cache
  attr_reader :size

  def put(key, value)
    @data[key] = value
  end
end
";
        let entries = extract_rb(source);
        assert_eq!(entries.len(), 1);
        let class = &entries[0];
        assert_eq!(class.kind, SignatureKind::Class);
        assert_eq!(class.name, "Cache");
        assert!(class.signature.contains("def put(key, value)"));
        assert!(class.signature.contains("attr_reader :size"));
        assert!(!class.signature.contains("@data"));
        assert!(class.signature.trim_end().ends_with("end"));
    }

    #[test]
    fn test_module_methods_are_descended() {
        let entries = extract_rb("module Util\n  def self.clamp(n)\n    n\n  end\nend\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Function);
    }

    #[test]
    fn test_constant_drops_value() {
        let entries = extract_rb("MAX_RETRIES = 5\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Const);
        assert_eq!(entries[0].name, "MAX_RETRIES");
        assert!(!entries[0].signature.contains('5'));
    }
}
