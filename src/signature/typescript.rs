//! TypeScript / TSX visitor.
//!
//! The only family with language-level export semantics: `exported`
//! reflects the presence of an explicit `export` wrapper, and bare
//! re-exports become synthetic `const` entries so barrel files stay
//! visible to the packer.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    resolve_name, signature_up_to_body, slice,
};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        visit(child, source, false, child.start_byte(), &mut entries);
    }
    entries
}

fn visit(
    node: Node<'_>,
    source: &str,
    exported: bool,
    start_byte: usize,
    entries: &mut Vec<SignatureEntry>,
) {
    let line = line_of(node);
    match node.kind() {
        "export_statement" => visit_export(node, source, entries),
        // `declare ...` wraps a signature-only declaration.
        "ambient_declaration" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                visit(child, source, exported, node.start_byte(), entries);
            }
        }
        "function_declaration" | "generator_function_declaration" | "function_signature" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(node, source),
                signature: signature_up_to_body(source, start_byte, node),
                exported,
                line,
            });
        }
        "class_declaration" | "abstract_class_declaration" => {
            entries.push(class_entry(node, source, exported, start_byte, line));
        }
        "interface_declaration" => {
            entries.push(declarative_entry(
                SignatureKind::Interface,
                node,
                source,
                exported,
                start_byte,
                line,
            ));
        }
        "type_alias_declaration" => {
            entries.push(declarative_entry(
                SignatureKind::Type,
                node,
                source,
                exported,
                start_byte,
                line,
            ));
        }
        "enum_declaration" => {
            entries.push(declarative_entry(
                SignatureKind::Enum,
                node,
                source,
                exported,
                start_byte,
                line,
            ));
        }
        "lexical_declaration" | "variable_declaration" => {
            visit_variables(node, source, exported, start_byte, entries);
        }
        _ => {}
    }
}

fn visit_export(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    if let Some(declaration) = node.child_by_field_name("declaration") {
        visit(declaration, source, true, node.start_byte(), entries);
        return;
    }

    if let Some(value) = node.child_by_field_name("value") {
        // `export default <expr>;`
        entries.push(SignatureEntry {
            kind: SignatureKind::Const,
            name: "default".to_string(),
            signature: slice(source, node.start_byte(), value.end_byte())
                .trim()
                .trim_end_matches(';')
                .to_string(),
            exported: true,
            line: line_of(node),
        });
        return;
    }

    // Bare re-export: `export * from 'x'` / `export { a } from 'x'` /
    // `export { a }`.
    let name = match node.child_by_field_name("source") {
        Some(module) => format!(
            "re-export from {}",
            node_text(module, source).trim_matches(['\'', '"', '`'])
        ),
        None => "re-export".to_string(),
    };
    entries.push(SignatureEntry {
        kind: SignatureKind::Const,
        name,
        signature: node_text(node, source).trim().trim_end_matches(';').to_string(),
        exported: true,
        line: line_of(node),
    });
}

fn declarative_entry(
    kind: SignatureKind,
    node: Node<'_>,
    source: &str,
    exported: bool,
    start_byte: usize,
    line: usize,
) -> SignatureEntry {
    // Type-only body: nothing executable to strip.
    SignatureEntry {
        kind,
        name: resolve_name(node, source),
        signature: slice(source, start_byte, node.end_byte()).trim().to_string(),
        exported,
        line,
    }
}

fn class_entry(
    node: Node<'_>,
    source: &str,
    exported: bool,
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
                    "method_definition" | "abstract_method_signature" | "method_signature" => {
                        members.push(member_signature(source, member));
                    }
                    "public_field_definition" | "field_definition" | "property_signature" => {
                        members.push(
                            node_text(member, source)
                                .trim()
                                .trim_end_matches(';')
                                .trim_end()
                                .to_string(),
                        );
                    }
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
        exported,
        line,
    }
}

const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

fn visit_variables(
    node: Node<'_>,
    source: &str,
    exported: bool,
    start_byte: usize,
    entries: &mut Vec<SignatureEntry>,
) {
    let line = line_of(node);
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let name = resolve_name(declarator, source);

        match declarator.child_by_field_name("value") {
            Some(value) if FUNCTION_VALUE_KINDS.contains(&value.kind()) => {
                // Function-valued binding: treat as an executable construct
                // and slice at the function's body.
                let end = value
                    .child_by_field_name("body")
                    .map(|body| body.start_byte())
                    .unwrap_or_else(|| value.end_byte());
                entries.push(SignatureEntry {
                    kind: SignatureKind::Function,
                    name,
                    signature: slice(source, start_byte, end).trim().to_string(),
                    exported,
                    line,
                });
            }
            Some(value) if exported => {
                // Non-function value: keep the declaration, drop the value.
                let signature = slice(source, start_byte, value.start_byte())
                    .trim()
                    .trim_end_matches('=')
                    .trim_end()
                    .to_string();
                entries.push(SignatureEntry {
                    kind: SignatureKind::Const,
                    name,
                    signature,
                    exported,
                    line,
                });
            }
            None if exported => {
                // Bare exported declaration: declaration text only.
                entries.push(SignatureEntry {
                    kind: SignatureKind::Const,
                    name,
                    signature: slice(source, start_byte, node.end_byte())
                        .trim()
                        .trim_end_matches(';')
                        .to_string(),
                    exported,
                    line,
                });
            }
            _ => {}
        }
    }
}
