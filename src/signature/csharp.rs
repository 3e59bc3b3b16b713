//! C# visitor.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    resolve_name, slice,
};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    visit_children(root, source, &mut entries);
    entries
}

fn visit_children(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, child.start_byte(), entries);
    }
}

fn visit(node: Node<'_>, source: &str, start_byte: usize, entries: &mut Vec<SignatureEntry>) {
    let line = line_of(node);
    match node.kind() {
        // Namespaces wrap; file-scoped namespaces leave members as siblings.
        "namespace_declaration" => {
            if let Some(body) = node.child_by_field_name("body") {
                visit_children(body, source, entries);
            }
        }
        "file_scoped_namespace_declaration" => visit_children(node, source, entries),
        "class_declaration" | "struct_declaration" | "record_declaration" => {
            entries.push(container_entry(node, source, start_byte, line));
        }
        "interface_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Interface,
                name: resolve_name(node, source),
                signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
                exported: true,
                line,
            });
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
        "delegate_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Type,
                name: resolve_name(node, source),
                signature: slice(source, start_byte, node.end_byte())
                    .trim()
                    .trim_end_matches(';')
                    .to_string(),
                exported: true,
                line,
            });
        }
        _ => {}
    }
}

fn container_entry(
    node: Node<'_>,
    source: &str,
    start_byte: usize,
    line: usize,
) -> SignatureEntry {
    let name = resolve_name(node, source);
    let signature = match node.child_by_field_name("body") {
        Some(body) => {
            let mut members = Vec::new();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "method_declaration" | "constructor_declaration" | "operator_declaration" => {
                        members.push(format!("{};", member_signature(source, member)));
                    }
                    "field_declaration" | "event_field_declaration" => {
                        members.push(
                            node_text(member, source)
                                .trim()
                                .trim_end_matches(';')
                                .to_string(),
                        );
                    }
                    "property_declaration" => members.push(property_signature(member, source)),
                    _ => {}
                }
            }
            container_signature(source, start_byte, body, &members, "}")
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

/// Auto-properties keep their accessor list; accessor bodies collapse.
fn property_signature(member: Node<'_>, source: &str) -> String {
    let text = node_text(member, source).trim();
    if !text.contains('\n') {
        return text.trim_end_matches(';').to_string();
    }
    match member.child_by_field_name("accessors") {
        Some(accessors) => format!(
            "{} {{ ... }}",
            slice(source, member.start_byte(), accessors.start_byte()).trim_end()
        ),
        None => text.lines().next().unwrap_or(text).trim().to_string(),
    }
}
