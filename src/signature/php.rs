//! PHP visitor.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    resolve_name, signature_up_to_body,
};

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
        "function_definition" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(node, source),
                signature: signature_up_to_body(source, node.start_byte(), node),
                exported: true,
                line,
            });
        }
        "class_declaration" | "trait_declaration" => {
            entries.push(class_entry(node, source));
        }
        "interface_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Interface,
                name: resolve_name(node, source),
                signature: node_text(node, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        "enum_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Enum,
                name: resolve_name(node, source),
                signature: node_text(node, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        "const_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Const,
                name: resolve_name(node, source),
                signature: node_text(node, source)
                    .trim()
                    .trim_end_matches(';')
                    .to_string(),
                exported: true,
                line,
            });
        }
        // `namespace Foo { ... }`; the body-less form leaves declarations
        // as siblings, which the top-level walk already covers.
        "namespace_definition" => {
            if let Some(body) = node.child_by_field_name("body") {
                visit_children(body, source, entries);
            }
        }
        _ => {}
    }
}

fn class_entry(node: Node<'_>, source: &str) -> SignatureEntry {
    let name = resolve_name(node, source);
    let line = line_of(node);
    let signature = match node.child_by_field_name("body") {
        Some(body) => {
            let mut members = Vec::new();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_declaration" => {
                        members.push(format!("{};", member_signature(source, member)));
                    }
                    "property_declaration" | "const_declaration" => {
                        members.push(
                            node_text(member, source)
                                .trim()
                                .trim_end_matches(';')
                                .to_string(),
                        );
                    }
                    "use_declaration" => {
                        members.push(node_text(member, source).trim().to_string());
                    }
                    _ => {}
                }
            }
            container_signature(source, node.start_byte(), body, &members, "}")
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
