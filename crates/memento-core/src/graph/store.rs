//! In-memory graph store
//!
//! The store owns every memento, entity, relationship and hierarchy edge.
//! All references are validated eagerly on insertion, so readers (search and
//! the renderers) can assume that every ID they meet resolves.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::entity::{Entity, EntityDraft, EntityType, Properties};
use super::ids::{EntityId, MementoId};
use super::memento::Memento;
use super::relationship::{HierarchyEdge, Relationship, RelationshipDraft};
use crate::embedding::{EmbeddingProvider, embed_checked};
use crate::error::{Error, Result};

/// Type buckets: entity type → entity IDs in insertion order
pub type Hierarchy = BTreeMap<EntityType, Vec<EntityId>>;

/// Append-only knowledge graph
#[derive(Clone, Default)]
pub struct GraphStore {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    mementos: Vec<Memento>,
    memento_index: HashMap<MementoId, usize>,
    entities: Vec<Entity>,
    entity_index: HashMap<EntityId, usize>,
    relationships: Vec<Relationship>,
    hierarchy: Hierarchy,
    hierarchy_edges: Vec<HierarchyEdge>,
    memento_sequence: u64,
    entity_sequence: u64,
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("provider", &self.provider.as_ref().map(|p| p.model().to_string()))
            .field("mementos", &self.mementos.len())
            .field("entities", &self.entities.len())
            .field("relationships", &self.relationships.len())
            .field("hierarchy_edges", &self.hierarchy_edges.len())
            .finish()
    }
}

impl GraphStore {
    /// Create an empty store without an embedding provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that embeds every memento with `provider`
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::default()
        }
    }

    /// Create an empty store with an optional provider
    pub fn with_optional_provider(provider: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// The configured embedding provider, if any
    pub fn provider(&self) -> Option<&Arc<dyn EmbeddingProvider>> {
        self.provider.as_ref()
    }

    /// Record a new memento
    ///
    /// The embedding is computed before any state changes, so a provider
    /// failure leaves the store untouched and does not consume an ID.
    pub fn add_memento(&mut self, content: impl Into<String>, source: Option<&str>) -> Result<Memento> {
        let content = content.into();
        if content.trim().is_empty() {
            warn!("Rejected memento with empty content");
            return Err(Error::InvalidInput("memento content must not be empty".to_string()));
        }

        let embedding = match &self.provider {
            Some(provider) => Some(embed_checked(provider.as_ref(), &content)?),
            None => None,
        };

        let memento = Memento {
            id: MementoId::from_sequence(self.memento_sequence + 1),
            content,
            timestamp: Utc::now(),
            embedding,
            source: source.map(str::to_string),
        };
        self.push_memento(memento.clone());

        debug!(
            memento_id = %memento.id,
            embedded = memento.has_embedding(),
            "Memento added"
        );
        Ok(memento)
    }

    /// Add an entity extracted from existing mementos
    pub fn add_entity(&mut self, draft: EntityDraft) -> Result<Entity> {
        if draft.entity_type.as_str().trim().is_empty() {
            return Err(Error::InvalidInput("entity type must not be empty".to_string()));
        }
        if draft.name.trim().is_empty() {
            return Err(Error::InvalidInput("entity name must not be empty".to_string()));
        }
        check_properties(&draft.properties, &draft.name)?;
        for source in &draft.source_mementos {
            if !self.memento_index.contains_key(source) {
                warn!(memento_id = %source, entity_name = %draft.name, "Rejected entity with unknown source");
                return Err(Error::UnknownMemento {
                    id: source.to_string(),
                    referenced_by: format!("entity '{}'", draft.name),
                });
            }
        }

        let id = EntityId::from_sequence(self.entity_sequence + 1, draft.entity_type.as_str());
        let entity = Entity {
            id,
            entity_type: draft.entity_type,
            name: draft.name,
            properties: draft.properties,
            scale: draft.scale,
            source_mementos: draft.source_mementos,
        };

        self.entity_sequence += 1;
        self.entity_index.insert(entity.id.clone(), self.entities.len());
        self.hierarchy
            .entry(entity.entity_type.clone())
            .or_default()
            .push(entity.id.clone());
        self.entities.push(entity.clone());

        debug!(entity_id = %entity.id, entity_name = %entity.name, "Entity added");
        Ok(entity)
    }

    /// Add a relationship between two existing entities
    pub fn add_relationship(&mut self, draft: RelationshipDraft) -> Result<Relationship> {
        if !(0.0..=1.0).contains(&draft.strength) {
            warn!(strength = draft.strength, "Rejected relationship with invalid strength");
            return Err(Error::InvalidStrength(draft.strength));
        }
        if draft.relation_type.as_str().trim().is_empty() {
            return Err(Error::InvalidInput("relation type must not be empty".to_string()));
        }

        let referenced_by = format!("relationship {}", draft.relation_type);
        for endpoint in [&draft.from_entity, &draft.to_entity] {
            if !self.entity_index.contains_key(endpoint) {
                warn!(entity_id = %endpoint, relation_type = %draft.relation_type, "Rejected relationship with unknown endpoint");
                return Err(Error::UnknownEntity {
                    id: endpoint.to_string(),
                    referenced_by,
                });
            }
        }
        for evidence in &draft.evidence {
            if !self.memento_index.contains_key(evidence) {
                warn!(memento_id = %evidence, relation_type = %draft.relation_type, "Rejected relationship with unknown evidence");
                return Err(Error::UnknownMemento {
                    id: evidence.to_string(),
                    referenced_by,
                });
            }
        }
        check_properties(&draft.properties, &referenced_by)?;

        let relationship = Relationship {
            from_entity: draft.from_entity,
            to_entity: draft.to_entity,
            relation_type: draft.relation_type,
            strength: draft.strength,
            evidence: draft.evidence,
            properties: draft.properties,
        };
        self.relationships.push(relationship.clone());

        debug!(
            from = %relationship.from_entity,
            to = %relationship.to_entity,
            relation_type = %relationship.relation_type,
            strength = relationship.strength,
            "Relationship added"
        );
        Ok(relationship)
    }

    /// Link a parent entity to a child entity
    ///
    /// Both endpoints must exist. Cycles are not detected.
    pub fn add_hierarchy_edge(
        &mut self,
        parent: impl Into<EntityId>,
        child: impl Into<EntityId>,
    ) -> Result<HierarchyEdge> {
        let edge = HierarchyEdge {
            parent: parent.into(),
            child: child.into(),
        };
        for endpoint in [&edge.parent, &edge.child] {
            if !self.entity_index.contains_key(endpoint) {
                warn!(entity_id = %endpoint, "Rejected hierarchy edge with unknown endpoint");
                return Err(Error::UnknownEntity {
                    id: endpoint.to_string(),
                    referenced_by: format!("hierarchy edge {} -> {}", edge.parent, edge.child),
                });
            }
        }
        self.hierarchy_edges.push(edge.clone());

        debug!(parent = %edge.parent, child = %edge.child, "Hierarchy edge added");
        Ok(edge)
    }

    /// Look up a memento by ID
    pub fn get_memento(&self, id: &str) -> Result<&Memento> {
        self.memento_index
            .get(id)
            .map(|&i| &self.mementos[i])
            .ok_or_else(|| Error::MementoNotFound(id.to_string()))
    }

    /// Look up an entity by ID
    pub fn get_entity(&self, id: &str) -> Result<&Entity> {
        self.entity_index
            .get(id)
            .map(|&i| &self.entities[i])
            .ok_or_else(|| Error::EntityNotFound(id.to_string()))
    }

    pub fn contains_memento(&self, id: &str) -> bool {
        self.memento_index.contains_key(id)
    }

    pub fn contains_entity(&self, id: &str) -> bool {
        self.entity_index.contains_key(id)
    }

    /// All mementos in insertion order
    pub fn all_mementos(&self) -> &[Memento] {
        &self.mementos
    }

    /// All entities in insertion order
    pub fn all_entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All relationships in insertion order
    pub fn all_relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Entity IDs bucketed by type
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// All hierarchy edges in insertion order
    pub fn hierarchy_edges(&self) -> &[HierarchyEdge] {
        &self.hierarchy_edges
    }

    /// Mementos that carry an embedding
    pub fn embedded_mementos(&self) -> impl Iterator<Item = &Memento> {
        self.mementos.iter().filter(|m| m.has_embedding())
    }

    /// Embedding length: the provider's if configured, else the first
    /// stored vector's
    pub fn embedding_dimension(&self) -> Option<usize> {
        self.provider
            .as_ref()
            .map(|p| p.dimension())
            .or_else(|| self.mementos.iter().find_map(Memento::embedding_dimension))
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty() && self.entities.is_empty()
    }

    /// Re-insert a memento from a previous export, keeping its timestamp and
    /// embedding. The ID must be the next one in sequence.
    pub(crate) fn restore_memento(
        &mut self,
        id: MementoId,
        content: String,
        timestamp: DateTime<Utc>,
        embedding: Option<Vec<f32>>,
        source: Option<String>,
    ) -> Result<()> {
        let expected = MementoId::from_sequence(self.memento_sequence + 1);
        if id != expected {
            return Err(Error::RestoreFailed(format!(
                "memento '{}' is out of sequence (expected '{}')",
                id, expected
            )));
        }
        if content.trim().is_empty() {
            return Err(Error::RestoreFailed(format!("memento '{}' has empty content", id)));
        }
        self.push_memento(Memento {
            id,
            content,
            timestamp,
            embedding,
            source,
        });
        Ok(())
    }

    fn push_memento(&mut self, memento: Memento) {
        self.memento_sequence += 1;
        self.memento_index.insert(memento.id.clone(), self.mementos.len());
        self.mementos.push(memento);
    }
}

fn check_properties(properties: &Properties, owner: &str) -> Result<()> {
    match properties.iter().find(|(_, v)| !v.is_finite()) {
        Some((key, _)) => Err(Error::InvalidInput(format!(
            "property '{}' on {} must be a finite number",
            key, owner
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::error::EmbeddingError;
    use crate::graph::Scale;

    struct FailingProvider;

    impl EmbeddingProvider for FailingProvider {
        fn generate(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            Err(EmbeddingError::failed("broken", "backend offline"))
        }

        fn dimension(&self) -> usize {
            8
        }

        fn model(&self) -> &str {
            "broken"
        }
    }

    fn seeded() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_memento("Alice joined the team", None).unwrap();
        store.add_memento("Acme is the flagship project", None).unwrap();
        store.add_memento("Alice works on Acme", Some("chat")).unwrap();
        store
            .add_entity(EntityDraft::new("Person", "Alice").with_sources(["m1"]))
            .unwrap();
        store
            .add_entity(EntityDraft::new("Project", "Acme").with_sources(["m2"]))
            .unwrap();
        store
    }

    #[test]
    fn test_memento_ids_are_sequential() {
        let mut store = GraphStore::new();
        let a = store.add_memento("first", None).unwrap();
        let b = store.add_memento("second", Some("conversation")).unwrap();
        assert_eq!(a.id.as_str(), "m1");
        assert_eq!(b.id.as_str(), "m2");
        assert_eq!(b.source.as_deref(), Some("conversation"));
        assert!(a.embedding.is_none());
    }

    #[test]
    fn test_empty_memento_rejected_without_consuming_id() {
        let mut store = GraphStore::new();
        assert!(matches!(store.add_memento("   ", None), Err(Error::InvalidInput(_))));
        let m = store.add_memento("real", None).unwrap();
        assert_eq!(m.id.as_str(), "m1");
    }

    #[test]
    fn test_provider_embeds_mementos() {
        let mut store = GraphStore::with_provider(Arc::new(HashingEmbedder::new("h", 16)));
        let m = store.add_memento("User likes Rust", None).unwrap();
        assert_eq!(m.embedding_dimension(), Some(16));
        assert_eq!(store.embedding_dimension(), Some(16));
    }

    #[test]
    fn test_provider_failure_leaves_store_unchanged() {
        let mut store = GraphStore::with_provider(Arc::new(FailingProvider));
        let err = store.add_memento("anything", None).unwrap_err();
        assert_eq!(err.code(), "E300");
        assert!(store.all_mementos().is_empty());
    }

    #[test]
    fn test_entity_ids_use_type_slug() {
        let mut store = seeded();
        let e = store
            .add_entity(EntityDraft::new("Design Principle", "KISS").with_sources(["m3"]))
            .unwrap();
        assert_eq!(e.id.as_str(), "e3_design_principle");
        assert_eq!(store.get_entity("e3_design_principle").unwrap().name, "KISS");
    }

    #[test]
    fn test_entity_with_unknown_source_is_rejected() {
        let mut store = seeded();
        let err = store
            .add_entity(EntityDraft::new("Tool", "Hammer").with_sources(["m1", "m42"]))
            .unwrap_err();
        assert!(err.is_referential());
        assert!(err.to_string().contains("m42"));
        assert_eq!(store.all_entities().len(), 2);

        let next = store
            .add_entity(EntityDraft::new("Tool", "Hammer").with_sources(["m1"]))
            .unwrap();
        assert_eq!(next.id.as_str(), "e3_tool");
    }

    #[test]
    fn test_hierarchy_buckets_by_type() {
        let mut store = seeded();
        store
            .add_entity(EntityDraft::new("Person", "Bob").with_sources(["m3"]))
            .unwrap();
        let persons = &store.hierarchy()[&EntityType::from("Person")];
        let ids: Vec<&str> = persons.iter().map(EntityId::as_str).collect();
        assert_eq!(ids, vec!["e1_person", "e3_person"]);
    }

    #[test]
    fn test_relationship_validation() {
        let mut store = seeded();

        let err = store
            .add_relationship(RelationshipDraft::new("e1_person", "e99_missing", "WORKS_ON", 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownEntity { .. }));

        let err = store
            .add_relationship(
                RelationshipDraft::new("e1_person", "e2_project", "WORKS_ON", 1.0).with_evidence(["m9"]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMemento { .. }));

        let err = store
            .add_relationship(RelationshipDraft::new("e1_person", "e2_project", "WORKS_ON", 1.2))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStrength(_)));

        let err = store
            .add_relationship(RelationshipDraft::new("e1_person", "e2_project", "WORKS_ON", f32::NAN))
            .unwrap_err();
        assert_eq!(err.code(), "E400");

        assert!(store.all_relationships().is_empty());

        store
            .add_relationship(
                RelationshipDraft::new("e1_person", "e2_project", "WORKS_ON", 1.0).with_evidence(["m3"]),
            )
            .unwrap();
        assert_eq!(store.all_relationships().len(), 1);
    }

    #[test]
    fn test_non_finite_property_rejected() {
        let mut store = seeded();
        let err = store
            .add_entity(EntityDraft::new("Metric", "Latency").with_property("p99", f64::INFINITY))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_hierarchy_edges() {
        let mut store = seeded();
        store
            .add_entity(
                EntityDraft::new("Concept", "Memory")
                    .with_sources(["m1"])
                    .with_scale(Scale::Domain),
            )
            .unwrap();
        let edge = store.add_hierarchy_edge("e3_concept", "e2_project").unwrap();
        assert_eq!(edge.parent.as_str(), "e3_concept");

        // Cycles are accepted
        store.add_hierarchy_edge("e2_project", "e3_concept").unwrap();
        assert_eq!(store.hierarchy_edges().len(), 2);

        let err = store.add_hierarchy_edge("e3_concept", "e8_ghost").unwrap_err();
        assert!(err.is_referential());
        assert_eq!(store.hierarchy_edges().len(), 2);
    }

    #[test]
    fn test_lookups_report_not_found() {
        let store = seeded();
        assert_eq!(store.get_memento("m3").unwrap().content, "Alice works on Acme");
        assert!(store.get_memento("m4").unwrap_err().is_not_found());
        assert_eq!(store.get_entity("e7_person").unwrap_err().code(), "E002");
    }
}
