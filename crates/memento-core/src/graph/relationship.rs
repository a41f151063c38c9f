//! Relationships between entities
//!
//! Relationships are directed, typed, weighted edges. Each one cites the
//! mementos that justify it. Hierarchy edges are a separate, untyped
//! parent → child link used by multi-scale graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Properties, PropertyValue};
use super::ids::{EntityId, MementoId};

/// Open relation type tag (e.g. "WORKS_ON", "PREFERS")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationType(String);

impl RelationType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: underscores become spaces
    pub fn label(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelationType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RelationType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A directed, weighted edge between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_entity: EntityId,
    pub to_entity: EntityId,
    pub relation_type: RelationType,
    /// Strength of the relationship (0.0 to 1.0)
    pub strength: f32,
    /// Mementos supporting this relationship
    pub evidence: Vec<MementoId>,
    pub properties: Properties,
}

impl Relationship {
    /// Whether `entity` is either endpoint
    pub fn touches(&self, entity: &EntityId) -> bool {
        &self.from_entity == entity || &self.to_entity == entity
    }
}

/// Unsaved relationship, handed to
/// [`GraphStore::add_relationship`](super::GraphStore::add_relationship)
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDraft {
    pub from_entity: EntityId,
    pub to_entity: EntityId,
    pub relation_type: RelationType,
    pub strength: f32,
    pub evidence: Vec<MementoId>,
    pub properties: Properties,
}

impl RelationshipDraft {
    /// Create a new draft with no evidence or properties
    pub fn new(
        from_entity: impl Into<EntityId>,
        to_entity: impl Into<EntityId>,
        relation_type: impl Into<RelationType>,
        strength: f32,
    ) -> Self {
        Self {
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            relation_type: relation_type.into(),
            strength,
            evidence: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Set supporting memento IDs
    pub fn with_evidence<I, T>(mut self, evidence: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<MementoId>,
    {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    /// Set a single property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace all properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

impl From<&Relationship> for RelationshipDraft {
    fn from(rel: &Relationship) -> Self {
        Self {
            from_entity: rel.from_entity.clone(),
            to_entity: rel.to_entity.clone(),
            relation_type: rel.relation_type.clone(),
            strength: rel.strength,
            evidence: rel.evidence.clone(),
            properties: rel.properties.clone(),
        }
    }
}

/// Parent → child link between two entities of different scales
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HierarchyEdge {
    pub parent: EntityId,
    pub child: EntityId,
}
