//! Cypher load script for graph databases
//!
//! Statement order: wipe, mementos, entities, relationships, memento →
//! entity extraction links, then hierarchy links. One statement per line.

use chrono::SecondsFormat;

use crate::graph::{GraphStore, Properties, PropertyValue};

const ENTITY_FIELDS: &[&str] = &["id", "name", "type", "scale"];
const RELATIONSHIP_FIELDS: &[&str] = &["strength", "evidence"];

/// Render `store` as a Cypher script
pub fn render_cypher(store: &GraphStore) -> String {
    let mut lines = vec![
        "// Memento knowledge graph load script".to_string(),
        String::new(),
        "// Clean slate".to_string(),
        "MATCH (n) DETACH DELETE n;".to_string(),
    ];

    section(&mut lines, "MEMENTOS");
    for memento in store.all_mementos() {
        let mut fields = vec![
            format!("id: {}", string_literal(memento.id.as_str())),
            format!("content: {}", string_literal(&memento.content)),
            format!(
                "timestamp: datetime({})",
                string_literal(&memento.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            ),
        ];
        if let Some(source) = &memento.source {
            fields.push(format!("source: {}", string_literal(source)));
        }
        lines.push(format!("CREATE (:Memento {{{}}});", fields.join(", ")));
    }

    section(&mut lines, "ENTITIES");
    for entity in store.all_entities() {
        let mut fields = vec![
            format!("id: {}", string_literal(entity.id.as_str())),
            format!("name: {}", string_literal(&entity.name)),
            format!("type: {}", string_literal(entity.entity_type.as_str())),
        ];
        if let Some(scale) = entity.scale {
            fields.push(format!("scale: {}", string_literal(scale.as_str())));
        }
        fields.extend(property_fields(&entity.properties, ENTITY_FIELDS));
        lines.push(format!(
            "CREATE (:Entity:{} {{{}}});",
            identifier(entity.entity_type.as_str()),
            fields.join(", ")
        ));
    }

    section(&mut lines, "RELATIONSHIPS");
    for rel in store.all_relationships() {
        let evidence: Vec<String> = rel
            .evidence
            .iter()
            .map(|id| string_literal(id.as_str()))
            .collect();
        let mut fields = vec![
            format!("strength: {:?}", rel.strength),
            format!("evidence: [{}]", evidence.join(", ")),
        ];
        fields.extend(property_fields(&rel.properties, RELATIONSHIP_FIELDS));
        lines.push(format!(
            "MATCH (s:Entity {{id: {}}}), (t:Entity {{id: {}}}) CREATE (s)-[:{} {{{}}}]->(t);",
            string_literal(rel.from_entity.as_str()),
            string_literal(rel.to_entity.as_str()),
            relationship_label(rel.relation_type.as_str()),
            fields.join(", ")
        ));
    }

    section(&mut lines, "EXTRACTION");
    for entity in store.all_entities() {
        for memento_id in &entity.source_mementos {
            lines.push(format!(
                "MATCH (m:Memento {{id: {}}}), (e:Entity {{id: {}}}) CREATE (m)-[:EXTRACTED_TO]->(e);",
                string_literal(memento_id.as_str()),
                string_literal(entity.id.as_str())
            ));
        }
    }

    if !store.hierarchy_edges().is_empty() {
        section(&mut lines, "HIERARCHY");
        for edge in store.hierarchy_edges() {
            lines.push(format!(
                "MATCH (p:Entity {{id: {}}}), (c:Entity {{id: {}}}) CREATE (p)-[:PARENT_OF]->(c);",
                string_literal(edge.parent.as_str()),
                string_literal(edge.child.as_str())
            ));
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(format!("// ============ {} ============", title));
}

/// Inline properties; keys that collide with core fields get a
/// `property_` prefix
fn property_fields(properties: &Properties, reserved: &[&str]) -> Vec<String> {
    properties
        .iter()
        .map(|(key, value)| {
            let key = if reserved.contains(&key.as_str()) {
                format!("property_{}", key)
            } else {
                key.clone()
            };
            format!("{}: {}", identifier(&key), value_literal(value))
        })
        .collect()
}

fn value_literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Flag(b) => b.to_string(),
        PropertyValue::Number(n) => format!("{:?}", n),
        PropertyValue::Text(s) => string_literal(s),
    }
}

/// Double-quoted Cypher string literal
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Label, relationship type or property key; backtick-quoted unless it is
/// a plain identifier
pub fn identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

/// Relationship type in Cypher convention: uppercase, underscores
fn relationship_label(relation_type: &str) -> String {
    let normalized: String = relation_type
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    identifier(&normalized)
}
