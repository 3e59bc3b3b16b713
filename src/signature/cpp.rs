//! C/C++ visitor. Headers and sources both route here.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    scan_name, signature_up_to_body, slice,
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
        "function_definition" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: declarator_name(node, source)
                    .or_else(|| scan_name(node_text(node, source)))
                    .unwrap_or_else(|| "anonymous".to_string()),
                signature: signature_up_to_body(source, start_byte, node),
                exported: true,
                line,
            });
        }
        "class_specifier" | "struct_specifier" => {
            entries.push(record_entry(node, source, start_byte, line));
        }
        "enum_specifier" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Enum,
                name: type_name(node, source),
                signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
                exported: true,
                line,
            });
        }
        "type_definition" | "alias_declaration" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Type,
                name: type_name(node, source),
                signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
                exported: true,
                line,
            });
        }
        "declaration" => visit_declaration(node, source, start_byte, entries),
        // Wrapping constructs: descend without emitting a separate entry.
        "namespace_definition" | "linkage_specification" => {
            if let Some(body) = node.child_by_field_name("body") {
                visit_children(body, source, entries);
            }
        }
        "template_declaration" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if matches!(
                    child.kind(),
                    "function_definition" | "class_specifier" | "struct_specifier" | "declaration"
                ) {
                    visit(child, source, node.start_byte(), entries);
                }
            }
        }
        _ => {}
    }
}

fn visit_declaration(
    node: Node<'_>,
    source: &str,
    start_byte: usize,
    entries: &mut Vec<SignatureEntry>,
) {
    // A bare `struct X { ... };` can surface as a declaration whose type
    // carries the body.
    if let Some(type_node) = node.child_by_field_name("type") {
        if matches!(
            type_node.kind(),
            "class_specifier" | "struct_specifier" | "enum_specifier"
        ) && type_node.child_by_field_name("body").is_some()
        {
            visit(type_node, source, start_byte, entries);
            return;
        }
    }

    let line = line_of(node);
    let name = match declarator_name(node, source) {
        Some(name) => name,
        None => return,
    };

    if has_function_declarator(node) {
        // Prototype: no body to strip.
        entries.push(SignatureEntry {
            kind: SignatureKind::Function,
            name,
            signature: slice(source, start_byte, node.end_byte())
                .trim()
                .trim_end_matches(';')
                .to_string(),
            exported: true,
            line,
        });
        return;
    }

    // Variable declaration: keep the typed declarator, drop any initializer.
    let end = find_initializer(node)
        .map(|value| value.start_byte())
        .unwrap_or_else(|| node.end_byte());
    entries.push(SignatureEntry {
        kind: SignatureKind::Const,
        name,
        signature: slice(source, start_byte, end)
            .trim()
            .trim_end_matches(['=', ';'])
            .trim_end()
            .to_string(),
        exported: true,
        line,
    });
}

fn record_entry(node: Node<'_>, source: &str, start_byte: usize, line: usize) -> SignatureEntry {
    let name = type_name(node, source);
    let body = node.child_by_field_name("body");

    let has_method_bodies = body.is_some_and(|body| {
        let mut cursor = body.walk();
        body.named_children(&mut cursor)
            .any(|member| member.kind() == "function_definition")
    });

    let signature = if let (Some(body), true) = (body, has_method_bodies) {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "function_definition" => members.push(format!("{};", member_signature(source, member))),
                "field_declaration" | "declaration" => members.push(
                    node_text(member, source)
                        .trim()
                        .trim_end_matches(';')
                        .to_string(),
                ),
                "access_specifier" => members.push(node_text(member, source).trim().to_string()),
                _ => {}
            }
        }
        container_signature(source, start_byte, body, &members, "}")
    } else {
        // Data aggregate: field list only, nothing executable to drop.
        slice(source, start_byte, node.end_byte()).trim().to_string()
    };

    SignatureEntry {
        kind: SignatureKind::Class,
        name,
        signature,
        exported: true,
        line,
    }
}

/// Walk nested declarators down to the identifier that names the construct.
fn declarator_name(node: Node<'_>, source: &str) -> Option<String> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "identifier" | "field_identifier" | "qualified_identifier" | "operator_name"
            | "destructor_name" => {
                return Some(node_text(current, source).trim().to_string());
            }
            _ => match current.child_by_field_name("declarator") {
                Some(inner) => current = inner,
                None => return None,
            },
        }
    }
}

fn type_name(node: Node<'_>, source: &str) -> String {
    node.child_by_field_name("name")
        .map(|name| node_text(name, source).trim().to_string())
        .or_else(|| scan_name(node_text(node, source)))
        .unwrap_or_else(|| "anonymous".to_string())
}

fn has_function_declarator(node: Node<'_>) -> bool {
    let mut current = node.child_by_field_name("declarator");
    while let Some(decl) = current {
        if decl.kind() == "function_declarator" {
            return true;
        }
        current = decl.child_by_field_name("declarator");
    }
    false
}

fn find_initializer<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        if current.kind() == "init_declarator" {
            return current.child_by_field_name("value");
        }
        current = current.child_by_field_name("declarator")?;
    }
}
