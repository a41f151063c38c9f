//! Structured JSON export and restore
//!
//! The export is the single interchange format: every collection in
//! insertion order, the hierarchy, and a statistics block. Restoring an
//! export and exporting again yields the same bytes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::graph::{
    Entity, EntityDraft, GraphStore, HierarchyEdge, Hierarchy, Memento, Relationship,
    RelationshipDraft,
};
use crate::visualization::GraphStatistics;

/// Serializable snapshot of a whole graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub mementos: Vec<Memento>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub hierarchy: Hierarchy,
    #[serde(default)]
    pub hierarchy_edges: Vec<HierarchyEdge>,
    pub statistics: ExportStatistics,
}

/// Statistics block of the export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStatistics {
    pub total_mementos: usize,
    pub total_entities: usize,
    pub total_relationships: usize,
    pub entities_by_type: BTreeMap<String, usize>,
    pub entities_by_scale: BTreeMap<String, usize>,
}

impl GraphExport {
    /// Snapshot `store`
    pub fn from_store(store: &GraphStore) -> Self {
        let stats = GraphStatistics::collect(store);

        Self {
            mementos: store.all_mementos().to_vec(),
            entities: store.all_entities().to_vec(),
            relationships: store.all_relationships().to_vec(),
            hierarchy: store.hierarchy().clone(),
            hierarchy_edges: store.hierarchy_edges().to_vec(),
            statistics: ExportStatistics::from(stats),
        }
    }
}

impl From<GraphStatistics> for ExportStatistics {
    fn from(stats: GraphStatistics) -> Self {
        Self {
            total_mementos: stats.total_mementos,
            total_entities: stats.total_entities,
            total_relationships: stats.total_relationships,
            entities_by_type: stats.entities_by_type,
            entities_by_scale: stats.entities_by_scale,
        }
    }
}

/// Render `store` as pretty-printed JSON
pub fn render_export(store: &GraphStore) -> Result<String> {
    let json = serde_json::to_string_pretty(&GraphExport::from_store(store))?;
    debug!(bytes = json.len(), "Graph exported");
    Ok(json)
}

/// Parse a previously rendered export
pub fn parse_export(json: &str) -> Result<GraphExport> {
    Ok(serde_json::from_str(json)?)
}

impl GraphStore {
    /// Rebuild a store from an export
    ///
    /// Timestamps and embeddings are taken from the export; the provider is
    /// kept for future insertions and queries but is not called here. Every
    /// reference is validated again and regenerated IDs must match.
    pub fn restore(export: GraphExport, provider: Option<Arc<dyn EmbeddingProvider>>) -> Result<Self> {
        let expected_dimension = provider.as_ref().map(|p| p.dimension());
        let mut store = GraphStore::with_optional_provider(provider);

        let mut dimension = expected_dimension;
        for memento in export.mementos {
            if let Some(len) = memento.embedding_dimension() {
                match dimension {
                    Some(d) if d != len => {
                        return Err(Error::RestoreFailed(format!(
                            "memento '{}' has a {}-dimensional embedding, expected {}",
                            memento.id, len, d
                        )));
                    }
                    _ => dimension = Some(len),
                }
            }
            store.restore_memento(
                memento.id,
                memento.content,
                memento.timestamp,
                memento.embedding,
                memento.source,
            )?;
        }

        for entity in &export.entities {
            let added = store.add_entity(EntityDraft::from(entity))?;
            if added.id != entity.id {
                return Err(Error::RestoreFailed(format!(
                    "entity '{}' was regenerated as '{}'",
                    entity.id, added.id
                )));
            }
        }

        for rel in &export.relationships {
            store.add_relationship(RelationshipDraft::from(rel))?;
        }

        for edge in export.hierarchy_edges {
            store.add_hierarchy_edge(edge.parent, edge.child)?;
        }

        if store.hierarchy() != &export.hierarchy {
            return Err(Error::RestoreFailed(
                "hierarchy does not match the exported entities".to_string(),
            ));
        }

        info!(
            mementos = store.all_mementos().len(),
            entities = store.all_entities().len(),
            relationships = store.all_relationships().len(),
            "Graph restored"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::graph::{EntityType, Scale};

    fn sample() -> GraphStore {
        let mut store = GraphStore::with_provider(Arc::new(HashingEmbedder::new("h", 8)));
        store.add_memento("Alice joined", Some("chat")).unwrap();
        store.add_memento("Acme \"launch\" planned", None).unwrap();
        store
            .add_entity(
                EntityDraft::new("Person", "Alice")
                    .with_sources(["m1"])
                    .with_property("senior", true)
                    .with_scale(Scale::Component),
            )
            .unwrap();
        store
            .add_entity(EntityDraft::new("Project", "Acme").with_sources(["m2"]))
            .unwrap();
        store
            .add_relationship(
                RelationshipDraft::new("e1_person", "e2_project", "WORKS_ON", 0.7)
                    .with_evidence(["m1", "m2"])
                    .with_property("hours", 20i64),
            )
            .unwrap();
        store.add_hierarchy_edge("e2_project", "e1_person").unwrap();
        store
    }

    #[test]
    fn test_export_shape() {
        let json = render_export(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "mementos",
            "entities",
            "relationships",
            "hierarchy",
            "hierarchy_edges",
            "statistics",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["entities"][0]["type"], "Person");
        assert_eq!(value["entities"][0]["scale"], "component");
        assert_eq!(value["hierarchy"]["Project"][0], "e2_project");
        assert_eq!(value["statistics"]["entities_by_scale"]["component"], 1);
        assert_eq!(value["mementos"][1]["source"], serde_json::Value::Null);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let first = render_export(&sample()).unwrap();
        let restored = GraphStore::restore(parse_export(&first).unwrap(), None).unwrap();
        let second = render_export(&restored).unwrap();
        assert_eq!(first, second);
    }

    /// Deterministic spread of finite doubles across the whole bit range
    fn sweep_doubles(count: usize) -> Vec<f64> {
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut values = vec![0.39087250349426084, 8.91944920377881e131, 1.2159970956985807e201];
        while values.len() < count {
            state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
            let value = f64::from_bits(z ^ (z >> 31));
            if value.is_finite() {
                values.push(value);
            }
        }
        values
    }

    #[test]
    fn test_round_trip_preserves_arbitrary_doubles() {
        let mut store = GraphStore::new();
        for (i, value) in sweep_doubles(2_000).into_iter().enumerate() {
            store
                .add_entity(EntityDraft::new("Sample", format!("s{}", i)).with_property("x", value))
                .unwrap();
        }

        let first = render_export(&store).unwrap();
        let restored = GraphStore::restore(parse_export(&first).unwrap(), None).unwrap();
        assert_eq!(restored.all_entities(), store.all_entities());
        assert_eq!(render_export(&restored).unwrap(), first);
    }

    #[test]
    fn test_statistics_match_collected_figures() {
        let store = sample();
        let export = GraphExport::from_store(&store);
        let stats = GraphStatistics::collect(&store);
        assert_eq!(export.statistics.total_mementos, 2);
        assert_eq!(export.statistics.entities_by_type, stats.entities_by_type);
        assert_eq!(export.statistics.entities_by_scale, stats.entities_by_scale);
    }

    #[test]
    fn test_restore_rejects_tampered_ids() {
        let mut export = GraphExport::from_store(&sample());
        export.entities[1].id = "e9_project".into();
        let err = GraphStore::restore(export, None).unwrap_err();
        assert!(matches!(err, Error::RestoreFailed(_)));
    }

    #[test]
    fn test_restore_rejects_dangling_evidence() {
        let mut export = GraphExport::from_store(&sample());
        export.relationships[0].evidence.push("m7".into());
        let err = GraphStore::restore(export, None).unwrap_err();
        assert!(err.is_referential());
    }

    #[test]
    fn test_restore_rejects_mismatched_hierarchy() {
        let mut export = GraphExport::from_store(&sample());
        export.hierarchy.remove(&EntityType::from("Project"));
        assert!(GraphStore::restore(export, None).is_err());
    }

    #[test]
    fn test_restore_rejects_wrong_provider_dimension() {
        let export = GraphExport::from_store(&sample());
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new("wide", 32));
        let err = GraphStore::restore(export, Some(provider)).unwrap_err();
        assert_eq!(err.code(), "E500");
    }

    #[test]
    fn test_restore_keeps_search_working() {
        let export = GraphExport::from_store(&sample());
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new("h", 8));
        let restored = GraphStore::restore(export, Some(provider)).unwrap();
        let hits = restored.find_similar("Alice joined", 1).unwrap();
        assert_eq!(hits[0].memento.id.as_str(), "m1");
    }
}
