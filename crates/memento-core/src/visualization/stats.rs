//! Graph statistics and the knowledge density map

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::graph::{EntityId, GraphStore};

/// Connection count for one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityConnections {
    pub entity_id: EntityId,
    pub name: String,
    pub connections: usize,
}

/// Summary figures for a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub total_mementos: usize,
    pub total_entities: usize,
    pub total_relationships: usize,
    pub total_hierarchy_edges: usize,
    pub embedded_mementos: usize,
    pub embedding_dimension: Option<usize>,
    pub entities_by_type: BTreeMap<String, usize>,
    pub entities_by_scale: BTreeMap<String, usize>,
    pub average_relationships_per_entity: f64,
    /// Connected entities, most connected first, ties in insertion order
    pub density: Vec<EntityConnections>,
}

impl GraphStatistics {
    /// Compute statistics for `store`
    pub fn collect(store: &GraphStore) -> Self {
        let mut entities_by_type = BTreeMap::new();
        let mut entities_by_scale = BTreeMap::new();
        for entity in store.all_entities() {
            *entities_by_type
                .entry(entity.entity_type.to_string())
                .or_insert(0) += 1;
            if let Some(scale) = entity.scale {
                *entities_by_scale.entry(scale.to_string()).or_insert(0) += 1;
            }
        }

        let mut counts: HashMap<&EntityId, usize> = HashMap::new();
        for rel in store.all_relationships() {
            *counts.entry(&rel.from_entity).or_insert(0) += 1;
            *counts.entry(&rel.to_entity).or_insert(0) += 1;
        }
        let mut density: Vec<EntityConnections> = store
            .all_entities()
            .iter()
            .filter_map(|entity| {
                counts.get(&entity.id).map(|&connections| EntityConnections {
                    entity_id: entity.id.clone(),
                    name: entity.name.clone(),
                    connections,
                })
            })
            .collect();
        density.sort_by(|a, b| b.connections.cmp(&a.connections));

        Self {
            total_mementos: store.all_mementos().len(),
            total_entities: store.all_entities().len(),
            total_relationships: store.all_relationships().len(),
            total_hierarchy_edges: store.hierarchy_edges().len(),
            embedded_mementos: store.embedded_mementos().count(),
            embedding_dimension: store.embedding_dimension(),
            entities_by_type,
            entities_by_scale,
            average_relationships_per_entity: average_relationships_per_entity(
                store.all_relationships().len(),
                store.all_entities().len(),
            ),
            density,
        }
    }

    /// Number of distinct entity types
    pub fn entity_type_count(&self) -> usize {
        self.entities_by_type.len()
    }
}

/// Relationships divided by entities, 0.0 for an entity-free graph
pub fn average_relationships_per_entity(relationships: usize, entities: usize) -> f64 {
    if entities == 0 {
        return 0.0;
    }
    relationships as f64 / entities as f64
}

/// One `●` per connection, padded with `○` up to five
pub fn density_bar(connections: usize) -> String {
    let mut bar = "●".repeat(connections);
    bar.push_str(&"○".repeat(5usize.saturating_sub(connections)));
    bar
}
