//! Entity types for the knowledge graph
//!
//! Entities are structured concepts extracted from one or more mementos.
//! The entity type is an open tag ("Person", "Design Principle", ...), while
//! the abstraction scale is a closed set of four tiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{EntityId, MementoId, slugify};

/// Open entity type tag (e.g. "Person", "Project", "Design Principle")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase identifier form used in entity IDs
    pub fn slug(&self) -> String {
        slugify(&self.0)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Abstraction tier of an entity, from broadest to most specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Broad areas of concern (e.g. "AI Memory Systems")
    Domain,
    /// Whole systems or architectures
    System,
    /// Building blocks of a system
    Component,
    /// Indivisible details
    Atomic,
}

impl Scale {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::System => "system",
            Self::Component => "component",
            Self::Atomic => "atomic",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "domain" => Some(Self::Domain),
            "system" => Some(Self::System),
            "component" => Some(Self::Component),
            "atomic" => Some(Self::Atomic),
            _ => None,
        }
    }

    /// All tiers in rendering order
    pub fn all() -> &'static [Scale] {
        &[Self::Domain, Self::System, Self::Component, Self::Atomic]
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Numbers must be finite to survive JSON and Cypher output
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Number(n) => n.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Property map, ordered by key so every rendering is deterministic
pub type Properties = BTreeMap<String, PropertyValue>;

/// A structured concept extracted from mementos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Sequential identifier (`e<N>_<type-slug>`)
    pub id: EntityId,
    /// Open type tag
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Human-readable name
    pub name: String,
    pub properties: Properties,
    /// Abstraction tier, when the graph is multi-scale
    pub scale: Option<Scale>,
    /// Mementos this entity was extracted from, in order
    pub source_mementos: Vec<MementoId>,
}

/// Unsaved entity, handed to [`GraphStore::add_entity`](super::GraphStore::add_entity)
///
/// The store assigns the ID and validates the source mementos.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDraft {
    pub entity_type: EntityType,
    pub name: String,
    pub properties: Properties,
    pub source_mementos: Vec<MementoId>,
    pub scale: Option<Scale>,
}

impl EntityDraft {
    /// Create a new draft with no properties, sources or scale
    pub fn new(entity_type: impl Into<EntityType>, name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            name: name.into(),
            properties: Properties::new(),
            source_mementos: Vec::new(),
            scale: None,
        }
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

    /// Set source memento IDs
    pub fn with_sources<I, T>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<MementoId>,
    {
        self.source_mementos = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Set the abstraction scale
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl From<&Entity> for EntityDraft {
    fn from(entity: &Entity) -> Self {
        Self {
            entity_type: entity.entity_type.clone(),
            name: entity.name.clone(),
            properties: entity.properties.clone(),
            source_mementos: entity.source_mementos.clone(),
            scale: entity.scale,
        }
    }
}
