//! Mermaid diagram source

use crate::graph::{Entity, GraphStore, Scale};

/// Fill color per entity type; lookups are case-insensitive
const PALETTE: &[(&str, &str)] = &[
    ("person", "#e1f5fe"),
    ("project", "#f3e5f5"),
    ("technology", "#fff3e0"),
    ("concept", "#e8f5e9"),
    ("task", "#fff9c4"),
    ("preference", "#fce4ec"),
];

/// Fill for types missing from the palette
pub const DEFAULT_FILL: &str = "#ffffff";

/// Fill color for an entity type
pub fn fill_for(entity_type: &str) -> &'static str {
    PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(entity_type))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_FILL)
}

/// Render `store` as a top-to-bottom Mermaid flowchart
///
/// Entities are grouped by scale tier (empty tiers skipped, unscaled
/// entities last). Hierarchy edges are drawn as dotted links.
pub fn render_mermaid(store: &GraphStore) -> String {
    let mut lines = vec!["graph TB".to_string(), String::new()];

    for scale in Scale::all() {
        let tier: Vec<&Entity> = store
            .all_entities()
            .iter()
            .filter(|e| e.scale == Some(*scale))
            .collect();
        push_tier(&mut lines, &format!("{} SCALE", scale.as_str().to_uppercase()), &tier);
    }
    let unscaled: Vec<&Entity> = store
        .all_entities()
        .iter()
        .filter(|e| e.scale.is_none())
        .collect();
    push_tier(&mut lines, "UNSCALED", &unscaled);

    if !store.all_relationships().is_empty() {
        lines.push("    %% === RELATIONSHIPS ===".to_string());
        for rel in store.all_relationships() {
            lines.push(format!(
                "    {} -->|{}| {}",
                rel.from_entity,
                escape_label(&rel.relation_type.label()),
                rel.to_entity
            ));
        }
        lines.push(String::new());
    }

    if !store.hierarchy_edges().is_empty() {
        lines.push("    %% === HIERARCHY ===".to_string());
        for edge in store.hierarchy_edges() {
            lines.push(format!("    {} -.-> {}", edge.parent, edge.child));
        }
        lines.push(String::new());
    }

    if !store.all_entities().is_empty() {
        lines.push("    %% === STYLING ===".to_string());
        for entity in store.all_entities() {
            lines.push(format!(
                "    style {} fill:{}",
                entity.id,
                fill_for(entity.entity_type.as_str())
            ));
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

fn push_tier(lines: &mut Vec<String>, heading: &str, entities: &[&Entity]) {
    if entities.is_empty() {
        return;
    }
    lines.push(format!("    %% {}", heading));
    for entity in entities {
        lines.push(format!("    {}[\"{}\"]", entity.id, escape_label(&entity.name)));
    }
    lines.push(String::new());
}

/// Escape text for use inside a node or edge label
pub fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("#quot;"),
            '|' => escaped.push_str("#124;"),
            '<' => escaped.push_str("#lt;"),
            '>' => escaped.push_str("#gt;"),
            '\n' | '\r' => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}
