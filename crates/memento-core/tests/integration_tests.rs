//! Memento Core Integration Tests

use std::sync::Arc;

use memento_core::{
    Error,
    embedding::{EmbeddingProvider, HashingEmbedder},
    graph::{EntityDraft, EntityType, GraphStore, RelationshipDraft, Scale, SharedGraphStore},
    visualization::{
        GraphStatistics, OutputFormat, ReportOptions, parse_export, render, render_cypher,
        render_export, render_mermaid, render_report,
    },
};

fn alice_and_acme(store: &mut GraphStore) {
    store.add_memento("Alice is an engineer", None).unwrap();
    store.add_memento("Acme is a rocket company", None).unwrap();
    store.add_memento("Alice works at Acme", Some("conversation")).unwrap();

    let alice = store
        .add_entity(EntityDraft::new("Person", "Alice").with_sources(["m1"]))
        .unwrap();
    let acme = store
        .add_entity(EntityDraft::new("Project", "Acme").with_sources(["m2"]))
        .unwrap();
    store
        .add_relationship(RelationshipDraft::new(&alice.id, &acme.id, "WORKS_ON", 1.0).with_evidence(["m3"]))
        .unwrap();
}

#[test]
fn test_basic_scenario() {
    let mut store = GraphStore::new();
    alice_and_acme(&mut store);

    assert_eq!(store.all_mementos().len(), 3);
    assert_eq!(store.all_entities().len(), 2);
    assert_eq!(store.all_relationships().len(), 1);
    assert_eq!(store.all_entities()[0].id.as_str(), "e1_person");
    assert_eq!(store.all_entities()[1].id.as_str(), "e2_project");

    let hierarchy = serde_json::to_value(store.hierarchy()).unwrap();
    assert_eq!(
        hierarchy,
        serde_json::json!({"Person": ["e1_person"], "Project": ["e2_project"]})
    );
}

#[test]
fn test_missing_endpoint_leaves_store_unchanged() {
    let mut store = GraphStore::new();
    alice_and_acme(&mut store);
    let before = render_export(&store).unwrap();

    let err = store
        .add_relationship(RelationshipDraft::new("e1_person", "e99_missing", "WORKS_ON", 1.0))
        .unwrap_err();
    assert!(err.is_referential());
    assert_eq!(err.code(), "E101");

    let err = store
        .add_entity(EntityDraft::new("Person", "Ghost").with_sources(["m77"]))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownMemento { .. }));

    assert_eq!(render_export(&store).unwrap(), before);
    assert_eq!(store.all_relationships().len(), 1);
}

#[test]
fn test_average_relationships_without_entities() {
    let stats = GraphStatistics::collect(&GraphStore::new());
    assert_eq!(stats.average_relationships_per_entity, 0.0);
}

#[test]
fn test_memento_ids_never_reused() {
    let mut store = GraphStore::with_provider(Arc::new(HashingEmbedder::default()));
    let mut previous = 0u64;
    for content in ["one", "", "two", "  ", "three"] {
        if let Ok(memento) = store.add_memento(content, None) {
            let n: u64 = memento.id.as_str()[1..].parse().unwrap();
            assert_eq!(n, previous + 1);
            previous = n;
        }
    }
    assert_eq!(previous, 3);
}

#[test]
fn test_search_over_scenario() {
    let mut store = GraphStore::with_provider(Arc::new(HashingEmbedder::default()));
    alice_and_acme(&mut store);

    let hits = store.find_similar("Alice works at Acme", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].memento.id.as_str(), "m3");
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_search_without_provider_is_empty_corpus() {
    let mut store = GraphStore::new();
    alice_and_acme(&mut store);
    assert!(matches!(store.find_similar("Alice", 2), Err(Error::EmptyCorpus)));
}

#[test]
fn test_export_round_trip_is_byte_identical() {
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::default());
    let mut store = GraphStore::with_provider(provider.clone());
    alice_and_acme(&mut store);
    store
        .add_entity(
            EntityDraft::new("Concept", "Rocketry")
                .with_sources(["m2"])
                .with_scale(Scale::Domain)
                .with_property("difficulty", 9.5),
        )
        .unwrap();
    store.add_hierarchy_edge("e3_concept", "e2_project").unwrap();

    let first = render_export(&store).unwrap();
    let restored = GraphStore::restore(parse_export(&first).unwrap(), Some(provider)).unwrap();
    let second = render_export(&restored).unwrap();
    assert_eq!(first, second);

    assert_eq!(
        restored.hierarchy()[&EntityType::from("Concept")][0].as_str(),
        "e3_concept"
    );
}

#[test]
fn test_export_round_trip_keeps_full_precision_numbers() {
    let mut store = GraphStore::new();
    alice_and_acme(&mut store);
    store
        .add_entity(
            EntityDraft::new("Measurement", "Drift")
                .with_property("ratio", 0.39087250349426084)
                .with_property("huge", 8.91944920377881e131)
                .with_property("tiny", 5e-324)
                .with_property("third", 1.0 / 3.0),
        )
        .unwrap();

    let first = render_export(&store).unwrap();
    let restored = GraphStore::restore(parse_export(&first).unwrap(), None).unwrap();
    assert_eq!(render_export(&restored).unwrap(), first);
    assert_eq!(
        restored.get_entity("e3_measurement").unwrap().properties,
        store.get_entity("e3_measurement").unwrap().properties
    );
}

#[test]
fn test_all_renderers_agree_on_content() {
    let mut store = GraphStore::new();
    alice_and_acme(&mut store);

    let report = render_report(&store, &ReportOptions::default()).unwrap();
    assert!(report.contains("Alice"));
    assert!(report.contains("██████████ (1.00)"));

    let mermaid = render_mermaid(&store);
    assert!(mermaid.contains("e1_person -->|WORKS ON| e2_project"));

    let cypher = render_cypher(&store);
    assert!(cypher.contains("CREATE (s)-[:WORKS_ON {strength: 1.0, evidence: [\"m3\"]}]->(t);"));

    let json = render(&store, OutputFormat::Json, &ReportOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["statistics"]["total_relationships"], 1);
    assert_eq!(value["statistics"]["entities_by_type"]["Person"], 1);
}

#[tokio::test]
async fn test_shared_store_concurrent_build() {
    let shared = SharedGraphStore::new(GraphStore::with_provider(Arc::new(HashingEmbedder::default())));

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let store = shared.clone();
            tokio::spawn(async move { store.add_memento(format!("fact number {}", i), None).await })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    shared
        .add_entity(EntityDraft::new("Fact", "Numbers").with_sources(["m1", "m8"]))
        .await
        .unwrap();

    let hits = shared.find_similar("fact number 3", 1).await.unwrap();
    assert_eq!(hits[0].memento.content, "fact number 3");

    let snapshot = shared.snapshot().await;
    assert_eq!(snapshot.all_mementos().len(), 8);
    assert_eq!(snapshot.all_entities()[0].id.as_str(), "e1_fact");
}
