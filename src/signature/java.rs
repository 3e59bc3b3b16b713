//! Java visitor.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    resolve_name, slice,
};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        visit(child, source, child.start_byte(), &mut entries);
    }
    entries
}

fn visit(node: Node<'_>, source: &str, start_byte: usize, entries: &mut Vec<SignatureEntry>) {
    let line = line_of(node);
    match node.kind() {
        "class_declaration" => {
            entries.push(container_entry(
                SignatureKind::Class,
                node,
                source,
                start_byte,
                line,
            ));
        }
        "interface_declaration" => {
            entries.push(container_entry(
                SignatureKind::Interface,
                node,
                source,
                start_byte,
                line,
            ));
        }
        "enum_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Enum,
                name: resolve_name(node, source),
                signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
                exported: true,
                line,
            });
        }
        "record_declaration" | "annotation_type_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Class,
                name: resolve_name(node, source),
                signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
                exported: true,
                line,
            });
        }
        _ => {}
    }
}

/// Classes always synthesize; interfaces only when a member carries a body
/// (default methods), otherwise the type-only text stands as-is.
fn container_entry(
    kind: SignatureKind,
    node: Node<'_>,
    source: &str,
    start_byte: usize,
    line: usize,
) -> SignatureEntry {
    let name = resolve_name(node, source);
    let body = node.child_by_field_name("body");

    let needs_synthesis = match (kind, body) {
        (SignatureKind::Class, Some(_)) => true,
        (_, Some(body)) => {
            let mut cursor = body.walk();
            body.named_children(&mut cursor)
                .any(|member| member.child_by_field_name("body").is_some())
        }
        (_, None) => false,
    };

    let signature = match (body, needs_synthesis) {
        (Some(body), true) => {
            let mut members = Vec::new();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_declaration" | "constructor_declaration" => {
                        members.push(format!("{};", member_signature(source, member)));
                    }
                    "field_declaration" | "constant_declaration" => {
                        members.push(
                            node_text(member, source)
                                .trim()
                                .trim_end_matches(';')
                                .to_string(),
                        );
                    }
                    _ => {}
                }
            }
            container_signature(source, start_byte, body, &members, "}")
        }
        _ => slice(source, start_byte, node.end_byte()).trim().to_string(),
    };

    SignatureEntry {
        kind,
        name,
        signature,
        exported: true,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use super::*;
    use crate::grammar::{GrammarRegistry, Language};

    fn extract_java(source: &str) -> Vec<SignatureEntry> {
        let mut registry = GrammarRegistry::new();
        extract(source, Language::Java, &mut registry).unwrap()
    }

    #[test]
    fn test_class_methods_keep_signatures_only() {
        let source = "\
public class OrderService {
    private final Repository repo;

    public Order find(long id) {
        return repo.load(id);
    }
}
";
        let entries = extract_java(source);
        assert_eq!(entries.len(), 1);
        let class = &entries[0];
        assert_eq!(class.kind, SignatureKind::Class);
        assert_eq!(class.name, "OrderService");
        assert!(class.signature.contains("public Order find(long id);"));
        assert!(class.signature.contains("private final Repository repo"));
        assert!(!class.signature.contains("repo.load"));
    }

    #[test]
    fn test_plain_interface_keeps_full_text() {
        let entries = extract_java("interface Clock { long now(); }");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Interface);
        assert!(entries[0].signature.contains("long now();"));
    }

    #[test]
    fn test_interface_default_method_body_is_stripped() {
        let source = "\
interface Greeter {
    String name();
    default String greet() { return \"hi \" + name(); }
}
";
        let entries = extract_java(source);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].signature.contains("default String greet();"));
        assert!(!entries[0].signature.contains("return"));
    }

    #[test]
    fn test_enum_keeps_constants() {
        let entries = extract_java("public enum Status { OPEN, CLOSED }");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Enum);
        assert!(entries[0].signature.contains("CLOSED"));
    }
}
