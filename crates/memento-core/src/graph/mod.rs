//! Knowledge graph model and store
//!
//! Three layers, each built on the one below:
//! - **Mementos**: raw observations, optionally embedded
//! - **Entities**: typed concepts citing the mementos they came from
//! - **Relationships**: weighted edges between entities, with evidence
//!
//! Multi-scale graphs additionally tag entities with a [`Scale`] and link
//! them with [`HierarchyEdge`]s.

pub mod entity;
pub mod ids;
pub mod memento;
pub mod relationship;
pub mod shared;
pub mod store;

pub use entity::{Entity, EntityDraft, EntityType, Properties, PropertyValue, Scale};
pub use ids::{EntityId, MementoId, slugify};
pub use memento::Memento;
pub use relationship::{HierarchyEdge, RelationType, Relationship, RelationshipDraft};
pub use shared::SharedGraphStore;
pub use store::{GraphStore, Hierarchy};
