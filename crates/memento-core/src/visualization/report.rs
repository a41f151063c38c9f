//! Layered console report
//!
//! Renders the graph layer by layer (mementos, entities, relationships)
//! followed by statistics, the knowledge density map and, when the store can
//! answer similarity queries, a few example searches.

use crate::error::Result;
use crate::graph::{Entity, EntityId, GraphStore, Scale};
use crate::search::SimilaritySearch;

use super::stats::{GraphStatistics, density_bar};

const RULE_WIDTH: usize = 80;

/// Options for [`render_report`]
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Queries run in the search section
    pub example_queries: Vec<String>,
    /// Hits shown per query
    pub top_k: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            example_queries: Vec::new(),
            top_k: 3,
        }
    }
}

/// Render the layered text report
///
/// Only provider failures during the example searches can fail this call.
pub fn render_report(store: &GraphStore, options: &ReportOptions) -> Result<String> {
    let mut output = String::new();
    let heavy = "=".repeat(RULE_WIDTH);

    output.push_str(&format!("{}\n", heavy));
    output.push_str("MEMENTO KNOWLEDGE GRAPH\n");
    output.push_str(&format!("{}\n", heavy));

    push_mementos(&mut output, store);
    push_entities(&mut output, store);
    push_relationships(&mut output, store);

    let stats = GraphStatistics::collect(store);
    push_statistics(&mut output, &stats);
    push_density(&mut output, &stats);
    push_searches(&mut output, store, options)?;

    output.push_str(&format!("\n{}\n", heavy));
    Ok(output)
}

/// Strength as a ten-cell bar: `round(strength * 10)` filled cells
///
/// Stored strengths are always in [0.0, 1.0]. Values outside that range
/// saturate at an empty or full bar, and NaN renders empty.
pub fn strength_bar(strength: f32) -> String {
    let filled = ((strength * 10.0).round() as i64).clamp(0, 10) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{}\n", title));
    output.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
}

fn connector(index: usize, len: usize) -> &'static str {
    if index + 1 < len { "├─" } else { "└─" }
}

fn push_mementos(output: &mut String, store: &GraphStore) {
    let mementos = store.all_mementos();
    section(output, &format!("LAYER 1: RAW MEMENTOS ({})", mementos.len()));
    if mementos.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    for (i, memento) in mementos.iter().enumerate() {
        let branch = if i + 1 < mementos.len() { "│" } else { " " };
        output.push_str(&format!(
            "  {} [{}] {}\n",
            connector(i, mementos.len()),
            memento.id,
            memento.content
        ));

        let mut details = vec![format!(
            "Recorded: {}",
            memento.timestamp.format("%Y-%m-%d %H:%M:%S")
        )];
        if let Some(source) = &memento.source {
            details.push(format!("Source: {}", source));
        }
        if let Some(dimension) = memento.embedding_dimension() {
            details.push(format!("Embedding: {}D vector", dimension));
        }
        for (j, detail) in details.iter().enumerate() {
            output.push_str(&format!(
                "  {}    {} {}\n",
                branch,
                connector(j, details.len()),
                detail
            ));
        }
    }
}

fn push_entities(output: &mut String, store: &GraphStore) {
    let entities = store.all_entities();
    let by_scale = entities.iter().any(|e| e.scale.is_some());

    let groups: Vec<(String, Vec<&Entity>)> = if by_scale {
        let mut groups: Vec<(String, Vec<&Entity>)> = Scale::all()
            .iter()
            .map(|scale| {
                (
                    format!("{} SCALE", scale.as_str().to_uppercase()),
                    entities
                        .iter()
                        .filter(|e| e.scale == Some(*scale))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        groups.push((
            "UNSCALED".to_string(),
            entities.iter().filter(|e| e.scale.is_none()).collect(),
        ));
        groups.retain(|(_, members)| !members.is_empty());
        groups
    } else {
        store
            .hierarchy()
            .iter()
            .map(|(entity_type, ids)| {
                (
                    entity_type.as_str().to_uppercase(),
                    ids.iter()
                        .filter_map(|id| store.get_entity(id.as_str()).ok())
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    };

    section(
        output,
        &format!(
            "LAYER 2: ENTITIES BY {} ({} entities, {} types)",
            if by_scale { "SCALE" } else { "TYPE" },
            entities.len(),
            store.hierarchy().len()
        ),
    );
    if entities.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    for (g, (heading, members)) in groups.iter().enumerate() {
        let group_branch = if g + 1 < groups.len() { "│" } else { " " };
        output.push_str(&format!("  {} {}\n", connector(g, groups.len()), heading));

        for (i, entity) in members.iter().enumerate() {
            let entity_branch = if i + 1 < members.len() { "│" } else { " " };
            let label = if by_scale {
                format!("{} ({})", entity.name, entity.entity_type)
            } else {
                entity.name.clone()
            };
            output.push_str(&format!(
                "  {}  {} {} [{}]\n",
                group_branch,
                connector(i, members.len()),
                label,
                entity.id
            ));

            let mut details: Vec<String> = entity
                .properties
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            details.push(format!("Sources: {}", join_or_none(&entity.source_mementos)));
            for (j, detail) in details.iter().enumerate() {
                output.push_str(&format!(
                    "  {}  {}  {} {}\n",
                    group_branch,
                    entity_branch,
                    connector(j, details.len()),
                    detail
                ));
            }
        }
    }
}

fn push_relationships(output: &mut String, store: &GraphStore) {
    let relationships = store.all_relationships();
    section(
        output,
        &format!("LAYER 3: RELATIONSHIPS ({})", relationships.len()),
    );
    if relationships.is_empty() {
        output.push_str("  (none)\n");
        return;
    }

    for (i, rel) in relationships.iter().enumerate() {
        let branch = if i + 1 < relationships.len() { "│" } else { " " };
        output.push_str(&format!(
            "  {} {}\n",
            connector(i, relationships.len()),
            describe(store, &rel.from_entity)
        ));
        output.push_str(&format!(
            "  {}    └─[{}]──> {}\n",
            branch,
            rel.relation_type,
            describe(store, &rel.to_entity)
        ));
        output.push_str(&format!(
            "  {}       Strength: {} ({:.2})\n",
            branch,
            strength_bar(rel.strength),
            rel.strength
        ));
        output.push_str(&format!(
            "  {}       Evidence: {}\n",
            branch,
            join_or_none(&rel.evidence)
        ));
        for (key, value) in &rel.properties {
            output.push_str(&format!("  {}       {}: {}\n", branch, key, value));
        }
    }

    if !store.hierarchy_edges().is_empty() {
        output.push_str("\n  Hierarchy:\n");
        for edge in store.hierarchy_edges() {
            output.push_str(&format!(
                "    {} ⊃ {}\n",
                describe(store, &edge.parent),
                describe(store, &edge.child)
            ));
        }
    }
}

fn push_statistics(output: &mut String, stats: &GraphStatistics) {
    section(output, "GRAPH STATISTICS");

    let mut rows = vec![
        format!("Total Mementos:         {}", stats.total_mementos),
        format!("Total Entities:         {}", stats.total_entities),
        format!("Total Relationships:    {}", stats.total_relationships),
        format!("Entity Types:           {}", stats.entity_type_count()),
        format!(
            "Avg Relationships/Entity: {:.2}",
            stats.average_relationships_per_entity
        ),
    ];
    if stats.total_hierarchy_edges > 0 {
        rows.push(format!("Hierarchy Edges:        {}", stats.total_hierarchy_edges));
    }
    if let Some(dimension) = stats.embedding_dimension {
        rows.push(format!("Embedding Dimensions:   {}", dimension));
    }
    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format!("  {} {}\n", connector(i, rows.len()), row));
    }

    if !stats.entities_by_scale.is_empty() {
        output.push_str("\n  Entities by Scale:\n");
        for scale in Scale::all() {
            if let Some(count) = stats.entities_by_scale.get(scale.as_str()) {
                output.push_str(&format!("    {:20} {}\n", scale.as_str(), count));
            }
        }
    }
}

fn push_density(output: &mut String, stats: &GraphStatistics) {
    section(output, "KNOWLEDGE DENSITY MAP");
    if stats.density.is_empty() {
        output.push_str("  (no connections)\n");
        return;
    }
    for (i, entry) in stats.density.iter().enumerate() {
        output.push_str(&format!(
            "  {} {:30} {} ({} connections)\n",
            connector(i, stats.density.len()),
            entry.name,
            density_bar(entry.connections),
            entry.connections
        ));
    }
}

fn push_searches(output: &mut String, store: &GraphStore, options: &ReportOptions) -> Result<()> {
    let search = SimilaritySearch::for_store(store);
    if options.example_queries.is_empty() || !search.is_available() {
        return Ok(());
    }

    section(output, "SEMANTIC SEARCH");
    for query in &options.example_queries {
        output.push_str(&format!("  Query: '{}'\n", query));
        let hits = search.find_similar(query, options.top_k)?;
        for (i, hit) in hits.iter().enumerate() {
            output.push_str(&format!(
                "    {} [{}] ({:.3}) {}\n",
                connector(i, hits.len()),
                hit.memento.id,
                hit.score,
                hit.memento.content
            ));
        }
    }
    Ok(())
}

fn describe(store: &GraphStore, id: &EntityId) -> String {
    match store.get_entity(id.as_str()) {
        Ok(entity) => format!("{} ({})", entity.name, entity.entity_type),
        Err(_) => id.to_string(),
    }
}

fn join_or_none<T: std::fmt::Display>(ids: &[T]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
