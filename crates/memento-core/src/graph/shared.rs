//! Async-shareable graph store

use std::sync::Arc;

use tokio::sync::RwLock;

use super::entity::{Entity, EntityDraft};
use super::ids::EntityId;
use super::memento::Memento;
use super::relationship::{HierarchyEdge, Relationship, RelationshipDraft};
use super::store::GraphStore;
use crate::error::Result;
use crate::search::SearchHit;

/// A [`GraphStore`] behind a single read/write lock
///
/// Every insertion holds the write lock for its whole duration, embedding
/// included, so concurrent writers still receive strictly sequential IDs.
#[derive(Clone, Debug, Default)]
pub struct SharedGraphStore {
    inner: Arc<RwLock<GraphStore>>,
}

impl SharedGraphStore {
    pub fn new(store: GraphStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn add_memento(&self, content: impl Into<String>, source: Option<&str>) -> Result<Memento> {
        self.inner.write().await.add_memento(content, source)
    }

    pub async fn add_entity(&self, draft: EntityDraft) -> Result<Entity> {
        self.inner.write().await.add_entity(draft)
    }

    pub async fn add_relationship(&self, draft: RelationshipDraft) -> Result<Relationship> {
        self.inner.write().await.add_relationship(draft)
    }

    pub async fn add_hierarchy_edge(
        &self,
        parent: impl Into<EntityId>,
        child: impl Into<EntityId>,
    ) -> Result<HierarchyEdge> {
        self.inner.write().await.add_hierarchy_edge(parent, child)
    }

    pub async fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        self.inner.read().await.find_similar(query, top_k)
    }

    pub async fn memento_count(&self) -> usize {
        self.inner.read().await.all_mementos().len()
    }

    /// Clone the current state for rendering
    pub async fn snapshot(&self) -> GraphStore {
        self.inner.read().await.clone()
    }
}

impl From<GraphStore> for SharedGraphStore {
    fn from(store: GraphStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;

    #[tokio::test]
    async fn test_concurrent_mementos_get_sequential_ids() {
        let shared = SharedGraphStore::new(GraphStore::with_provider(Arc::new(HashingEmbedder::default())));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = shared.clone();
            handles.push(tokio::spawn(async move {
                store.add_memento(format!("observation {}", i), None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let snapshot = shared.snapshot().await;
        let ids: Vec<String> = snapshot
            .all_mementos()
            .iter()
            .map(|m| m.id.to_string())
            .collect();
        let expected: Vec<String> = (1..=16).map(|n| format!("m{}", n)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_shared_store_validates_like_the_inner_store() {
        let shared = SharedGraphStore::default();
        shared.add_memento("Alice", None).await.unwrap();
        shared
            .add_entity(EntityDraft::new("Person", "Alice").with_sources(["m1"]))
            .await
            .unwrap();

        let err = shared
            .add_relationship(RelationshipDraft::new("e1_person", "e2_missing", "KNOWS", 0.5))
            .await
            .unwrap_err();
        assert!(err.is_referential());
        assert_eq!(shared.memento_count().await, 1);
        assert!(shared.snapshot().await.all_relationships().is_empty());
    }
}
