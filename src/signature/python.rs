//! Python visitor.
//!
//! Python containers have no closing brace, so class signatures are built
//! here instead of with the shared brace-coercing helper: header line,
//! indented member signatures, nothing to close.

use tree_sitter::Node;

use super::{SignatureEntry, SignatureKind, line_of, node_text, resolve_name, signature_up_to_body, slice};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        visit(child, source, child.start_byte(), &mut entries);
    }
    entries
}

fn visit(node: Node<'_>, source: &str, start_byte: usize, entries: &mut Vec<SignatureEntry>) {
    match node.kind() {
        "decorated_definition" => {
            if let Some(definition) = node.child_by_field_name("definition") {
                visit(definition, source, node.start_byte(), entries);
            }
        }
        "function_definition" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(node, source),
                signature: signature_up_to_body(source, start_byte, node),
                exported: true,
                line: line_of(node),
            });
        }
        "class_definition" => {
            entries.push(class_entry(node, source, start_byte));
        }
        "expression_statement" => {
            if let Some(assignment) = node.named_child(0).filter(|n| n.kind() == "assignment") {
                visit_assignment(assignment, source, entries);
            }
        }
        _ => {}
    }
}

fn class_entry(node: Node<'_>, source: &str, start_byte: usize) -> SignatureEntry {
    let name = resolve_name(node, source);
    let line = line_of(node);
    let signature = match node.child_by_field_name("body") {
        Some(body) => {
            let mut out = slice(source, start_byte, body.start_byte())
                .trim_end()
                .to_string();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                let member_text = match member.kind() {
                    "function_definition" => {
                        Some(signature_up_to_body(source, member.start_byte(), member))
                    }
                    "decorated_definition" => member
                        .child_by_field_name("definition")
                        .map(|def| signature_up_to_body(source, member.start_byte(), def)),
                    "expression_statement" => member
                        .named_child(0)
                        .filter(|n| n.kind() == "assignment")
                        .map(|attr| node_text(attr, source).trim().to_string()),
                    _ => None,
                };
                if let Some(text) = member_text {
                    out.push_str("\n    ");
                    // Decorator lines inside a member keep their own indent.
                    out.push_str(&text.replace('\n', "\n    "));
                }
            }
            out
        }
        None => slice(source, start_byte, node.end_byte()).trim().to_string(),
    };
    SignatureEntry {
        kind: SignatureKind::Class,
        name,
        signature,
        exported: true,
        line,
    }
}

fn visit_assignment(assignment: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let Some(left) = assignment.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" {
        return;
    }
    let name = node_text(left, source).trim().to_string();
    let line = line_of(assignment);
    let has_type = assignment.child_by_field_name("type").is_some();

    match assignment.child_by_field_name("right") {
        Some(right) if right.kind() == "lambda" => {
            let end = right
                .child_by_field_name("body")
                .map(|body| body.start_byte())
                .unwrap_or_else(|| right.end_byte());
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name,
                signature: slice(source, assignment.start_byte(), end).trim().to_string(),
                exported: true,
                line,
            });
        }
        Some(right) => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Const,
                name,
                signature: slice(source, assignment.start_byte(), right.start_byte())
                    .trim()
                    .trim_end_matches('=')
                    .trim_end()
                    .to_string(),
                exported: true,
                line,
            });
        }
        None if has_type => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Const,
                name,
                signature: node_text(assignment, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use super::*;
    use crate::grammar::{GrammarRegistry, Language};

    fn extract_py(source: &str) -> Vec<SignatureEntry> {
        let mut registry = GrammarRegistry::new();
        extract(source, Language::Python, &mut registry).unwrap()
    }

    #[test]
    fn test_function_signature_excludes_body() {
        let entries = extract_py("def load(path: str) -> dict:\n    return json.load(path)\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Function);
        assert_eq!(entries[0].name, "load");
        assert!(entries[0].signature.contains("path: str"));
        assert!(entries[0].signature.contains("-> dict"));
        assert!(!entries[0].signature.contains("json.load"));
    }

    #[test]
    fn test_decorated_function_keeps_decorator() {
        let entries = extract_py("@app.route('/health')\ndef health():\n    return 'ok'\n");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].signature.contains("@app.route"));
        assert!(!entries[0].signature.contains("'ok'"));
    }

    #[test]
    fn test_class_members_are_signature_only() {
        let source = "\
class Store:
    backend = 'memory'

    def get(self, key: str) -> bytes:
        return self.data[key]
";
        let entries = extract_py(source);
        assert_eq!(entries.len(), 1);
        let class = &entries[0];
        assert_eq!(class.kind, SignatureKind::Class);
        assert_eq!(class.name, "Store");
        assert!(class.signature.contains("def get(self, key: str) -> bytes:"));
        assert!(class.signature.contains("backend = 'memory'"));
        assert!(!class.signature.contains("self.data"));
    }

    #[test]
    fn test_module_constant_drops_value() {
        let entries = extract_py("TIMEOUTS = {'connect': 5, 'read': 30}\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Const);
        assert_eq!(entries[0].name, "TIMEOUTS");
        assert!(entries[0].exported);
        assert!(!entries[0].signature.contains("30"));
    }

    #[test]
    fn test_top_level_declarations_are_exported() {
        let entries = extract_py("def helper():\n    pass\n");
        assert!(entries[0].exported);
    }
}
