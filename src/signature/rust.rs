//! Rust visitor.
//!
//! Type definition and behavior live in separate items, so methods inside
//! `impl` blocks are lifted out as independent function entries instead of
//! being nested under a class-style container.

use tree_sitter::Node;

use super::{
    SignatureEntry, SignatureKind, container_signature, line_of, member_signature, node_text,
    resolve_name, signature_up_to_body, slice,
};

pub(super) fn extract(root: Node<'_>, source: &str) -> Vec<SignatureEntry> {
    let mut entries = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        visit(child, source, &mut entries);
    }
    entries
}

fn visit(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let line = line_of(node);
    match node.kind() {
        "function_item" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(node, source),
                signature: signature_up_to_body(source, node.start_byte(), node),
                exported: true,
                line,
            });
        }
        "struct_item" | "union_item" => {
            // Data aggregate: the whole body is field declarations.
            entries.push(SignatureEntry {
                kind: SignatureKind::Class,
                name: resolve_name(node, source),
                signature: node_text(node, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        "enum_item" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Enum,
                name: resolve_name(node, source),
                signature: node_text(node, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        "type_item" => {
            entries.push(SignatureEntry {
                kind: SignatureKind::Type,
                name: resolve_name(node, source),
                signature: node_text(node, source).trim().to_string(),
                exported: true,
                line,
            });
        }
        "trait_item" => {
            entries.push(trait_entry(node, source));
        }
        "impl_item" => {
            lift_impl_methods(node, source, entries);
        }
        "const_item" | "static_item" => {
            let end = node
                .child_by_field_name("value")
                .map(|value| value.start_byte())
                .unwrap_or_else(|| node.end_byte());
            entries.push(SignatureEntry {
                kind: SignatureKind::Const,
                name: resolve_name(node, source),
                signature: slice(source, node.start_byte(), end)
                    .trim()
                    .trim_end_matches('=')
                    .trim_end()
                    .to_string(),
                exported: true,
                line,
            });
        }
        _ => {}
    }
}

fn trait_entry(node: Node<'_>, source: &str) -> SignatureEntry {
    let name = resolve_name(node, source);
    let line = line_of(node);
    let signature = match node.child_by_field_name("body") {
        Some(body) => {
            let mut members = Vec::new();
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                match member.kind() {
                    "function_item" | "function_signature_item" => {
                        let mut text = member_signature(source, member);
                        text.push(';');
                        members.push(text);
                    }
                    "associated_type" | "const_item" => {
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
        kind: SignatureKind::Interface,
        name,
        signature,
        exported: true,
        line,
    }
}

/// Methods inside an `impl` block become standalone function entries.
fn lift_impl_methods(node: Node<'_>, source: &str, entries: &mut Vec<SignatureEntry>) {
    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() == "function_item" {
            entries.push(SignatureEntry {
                kind: SignatureKind::Function,
                name: resolve_name(member, source),
                signature: signature_up_to_body(source, member.start_byte(), member),
                exported: true,
                line: line_of(member),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::extract;
    use super::*;
    use crate::grammar::{GrammarRegistry, Language};

    fn extract_rs(source: &str) -> Vec<SignatureEntry> {
        let mut registry = GrammarRegistry::new();
        extract(source, Language::Rust, &mut registry).unwrap()
    }

    #[test]
    fn test_struct_and_function_pair() {
        let source = "\
struct Point {
    x: f64,
    y: f64,
}

fn distance(a: &Point, b: &Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}
";
        let entries = extract_rs(source);
        assert_eq!(entries.len(), 2);

        let point = &entries[0];
        assert_eq!(point.kind, SignatureKind::Class);
        assert_eq!(point.name, "Point");
        assert!(point.signature.contains("x: f64"));
        assert!(point.signature.contains("y: f64"));

        let distance = &entries[1];
        assert_eq!(distance.kind, SignatureKind::Function);
        assert_eq!(distance.name, "distance");
        assert!(distance.signature.contains("a: &Point, b: &Point"));
        assert!(distance.signature.contains("-> f64"));
        assert!(!distance.signature.contains("sqrt"));
    }

    #[test]
    fn test_impl_methods_are_lifted_as_functions() {
        let source = "\
struct Counter { n: u64 }

impl Counter {
    pub fn incr(&mut self) -> u64 {
        self.n += 1;
        self.n
    }
}
";
        let entries = extract_rs(source);
        let incr = entries
            .iter()
            .find(|e| e.name == "incr")
            .expect("lifted method");
        assert_eq!(incr.kind, SignatureKind::Function);
        assert!(incr.signature.contains("&mut self"));
        assert!(!incr.signature.contains("self.n += 1"));
    }

    #[test]
    fn test_trait_default_bodies_are_stripped() {
        let source = "\
trait Greeter {
    fn name(&self) -> String;
    fn greet(&self) -> String {
        format!(\"hello {}\", self.name())
    }
}
";
        let entries = extract_rs(source);
        assert_eq!(entries.len(), 1);
        let greeter = &entries[0];
        assert_eq!(greeter.kind, SignatureKind::Interface);
        assert!(greeter.signature.contains("fn name(&self) -> String;"));
        assert!(greeter.signature.contains("fn greet(&self) -> String;"));
        assert!(!greeter.signature.contains("format!"));
    }

    #[test]
    fn test_const_drops_value() {
        let entries = extract_rs("pub const MAX_RETRIES: u32 = 5;");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Const);
        assert_eq!(entries[0].name, "MAX_RETRIES");
        assert!(entries[0].signature.contains("u32"));
        assert!(!entries[0].signature.contains('5'));
    }

    #[test]
    fn test_enum_keeps_variants() {
        let entries = extract_rs("enum Mode { Fast, Careful }");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SignatureKind::Enum);
        assert!(entries[0].signature.contains("Careful"));
    }
}
