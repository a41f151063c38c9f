//! Built-in demo graphs

use std::sync::Arc;

use memento_core::embedding::EmbeddingProvider;
use memento_core::graph::{EntityDraft, GraphStore, RelationshipDraft, Scale, SharedGraphStore};

/// Which demo graph to build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// A developer, their project and design principles
    #[default]
    Basic,
    /// Entities across domain, system, component and atomic scales
    MultiScale,
}

const BASIC_MEMENTOS: [&str; 10] = [
    "User asked about glob patterns in Claude Code context",
    "User uses casual language like 'Aight cool'",
    "User is working on Memento project - a knowledge graph system",
    "User wants to see hierarchy, entities, and relationships in the demo",
    "User emphasizes keeping things simple and efficient",
    "User wants WOW factor in the demonstration",
    "User mentioned organizing data surgically into structure at different scales",
    "User is interested in knowledge graphs with raw 'Mementos' as base layer",
    "User values YAGNI and KISS principles in development",
    "User is currently on branch claude/explain-glob-patterns-*",
];

const MULTI_SCALE_MEMENTOS: [&str; 15] = [
    "User is working on a project called Memento",
    "Memento is an MCP server that provides persistent memory for LLMs",
    "The project uses Python with FastMCP framework",
    "The project uses Neo4j for graph-based vector storage",
    "User is working in an isolated cloud environment",
    "Current branch is claude/knowledge-graph-prototype-016woGkvRjndwTdvaeEGhz73",
    "User cares about isolation from other agents",
    "The project has two main tasks in progress: local embeddings and basic demo",
    "User wants to see knowledge organized with hierarchy, entities, and relationships",
    "User values the WOW factor in visualizations",
    "The project uses sentence-transformers for local embeddings",
    "User distinguishes between raw 'Mementos' and structured knowledge",
    "The architecture leverages client LLM instead of server-side LLM (ADR-006)",
    "Neo4j supports both graph relationships and vector embeddings in single database",
    "User asked about worktrees and operating system - they are technical",
];

/// Build `scenario` into a fresh store
pub async fn build(
    scenario: Scenario,
    provider: Option<Arc<dyn EmbeddingProvider>>,
) -> memento_core::Result<GraphStore> {
    let store = SharedGraphStore::new(GraphStore::with_optional_provider(provider));
    match scenario {
        Scenario::Basic => build_basic(&store).await?,
        Scenario::MultiScale => build_multi_scale(&store).await?,
    }
    Ok(store.snapshot().await)
}

async fn build_basic(store: &SharedGraphStore) -> memento_core::Result<()> {
    for content in BASIC_MEMENTOS {
        store.add_memento(content, Some("conversation")).await?;
    }

    let user = store
        .add_entity(
            EntityDraft::new("Person", "User")
                .with_property("communication_style", "casual, direct ('Aight cool')")
                .with_property("technical_level", "advanced developer")
                .with_property("current_focus", "knowledge graphs & memory systems")
                .with_property("working_branch", "claude/explain-glob-patterns-*")
                .with_sources(["m1", "m2", "m3", "m10"]),
        )
        .await?
        .id;
    let project = store
        .add_entity(
            EntityDraft::new("Project", "Memento")
                .with_property("type", "MCP server for persistent LLM memory")
                .with_property("status", "active development")
                .with_property("architecture", "graph-based vector storage with Neo4j")
                .with_property("key_feature", "multi-scale hierarchical organization")
                .with_sources(["m3", "m8"]),
        )
        .await?
        .id;
    let kiss = store
        .add_entity(
            EntityDraft::new("Design Principle", "KISS (Keep It Simple)")
                .with_property("description", "Keep things simple and efficient")
                .with_property("priority", "core value")
                .with_property("application", "avoid over-engineering")
                .with_sources(["m5", "m9"]),
        )
        .await?
        .id;
    let yagni = store
        .add_entity(
            EntityDraft::new("Design Principle", "YAGNI (You Ain't Gonna Need It)")
                .with_property("description", "Don't build features until needed")
                .with_property("priority", "core value")
                .with_property("application", "lean codebase")
                .with_sources(["m9"]),
        )
        .await?
        .id;
    let surgical = store
        .add_entity(
            EntityDraft::new("Design Principle", "Surgical Organization")
                .with_property("description", "Organize data surgically at different scales")
                .with_property("applies_to", "hierarchy, entities, relationships")
                .with_property("implementation", "multi-layer knowledge structure")
                .with_sources(["m7", "m4"]),
        )
        .await?
        .id;
    let multiscale = store
        .add_entity(
            EntityDraft::new("Concept", "Multi-Scale Knowledge")
                .with_property("layers", "raw mementos → entities → relationships → hierarchy")
                .with_property("purpose", "organize information at multiple abstraction levels")
                .with_property("benefit", "trace high-level concepts back to atomic facts")
                .with_sources(["m4", "m7", "m8"]),
        )
        .await?
        .id;
    let wow = store
        .add_entity(
            EntityDraft::new("Requirement", "WOW Factor")
                .with_property("description", "Demo must be impressive and compelling")
                .with_property("elements", "visualization, clarity, power")
                .with_property("target", "demonstrate system capabilities")
                .with_sources(["m6"]),
        )
        .await?
        .id;
    let tool = store
        .add_entity(
            EntityDraft::new("Tool", "Claude Code")
                .with_property("type", "AI coding assistant")
                .with_property("feature_of_interest", "glob patterns for file matching")
                .with_property("usage_context", "development workflow")
                .with_sources(["m1"]),
        )
        .await?
        .id;

    let edges = [
        (&user, &project, "WORKS_ON", 1.0, &["m3"][..]),
        (&user, &kiss, "VALUES", 0.95, &["m5", "m9"][..]),
        (&user, &yagni, "VALUES", 0.95, &["m9"][..]),
        (&user, &surgical, "VALUES", 0.9, &["m7", "m4"][..]),
        (&user, &wow, "REQUIRES", 1.0, &["m6"][..]),
        (&project, &multiscale, "IMPLEMENTS", 1.0, &["m8", "m4"][..]),
        (&surgical, &multiscale, "GUIDES", 0.85, &["m7", "m4"][..]),
        (&kiss, &project, "CONSTRAINS", 0.8, &["m5"][..]),
        (&yagni, &project, "CONSTRAINS", 0.8, &["m9"][..]),
        (&user, &tool, "USES", 0.7, &["m1"][..]),
        (&wow, &multiscale, "DEMANDS", 0.75, &["m6", "m4"][..]),
    ];
    for (from, to, relation, strength, evidence) in edges {
        store
            .add_relationship(
                RelationshipDraft::new(from, to, relation, strength).with_evidence(evidence.iter().copied()),
            )
            .await?;
    }
    Ok(())
}

async fn build_multi_scale(store: &SharedGraphStore) -> memento_core::Result<()> {
    for content in MULTI_SCALE_MEMENTOS {
        store.add_memento(content, Some("conversation")).await?;
    }

    let entities = [
        EntityDraft::new("Person", "User")
            .with_property("role", "developer")
            .with_property("expertise", "technical")
            .with_scale(Scale::Domain)
            .with_sources(["m1", "m7", "m9", "m15"]),
        EntityDraft::new("Concept", "AI Memory Systems")
            .with_property("domain", "artificial_intelligence")
            .with_property("subdomain", "memory")
            .with_scale(Scale::Domain)
            .with_sources(["m2", "m12"]),
        EntityDraft::new("Project", "Memento Project")
            .with_property("status", "in_development")
            .with_property("purpose", "LLM persistent memory")
            .with_scale(Scale::System)
            .with_sources(["m1", "m2", "m3"]),
        EntityDraft::new("Technology", "Neo4j")
            .with_property("category", "database")
            .with_property("features", "graph+vector")
            .with_scale(Scale::Component)
            .with_sources(["m4", "m14"]),
        EntityDraft::new("Technology", "FastMCP")
            .with_property("category", "framework")
            .with_property("language", "python")
            .with_scale(Scale::Component)
            .with_sources(["m3"]),
        EntityDraft::new("Technology", "Model Context Protocol")
            .with_property("category", "protocol")
            .with_property("purpose", "LLM tool integration")
            .with_scale(Scale::Component)
            .with_sources(["m2"]),
        EntityDraft::new("Technology", "Local Embeddings")
            .with_property("provider", "sentence-transformers")
            .with_property("model", "all-MiniLM-L6-v2")
            .with_scale(Scale::Component)
            .with_sources(["m8", "m11"]),
        EntityDraft::new("Concept", "Feature Branch")
            .with_property("branch", "claude/knowledge-graph-prototype-016woGkvRjndwTdvaeEGhz73")
            .with_scale(Scale::Atomic)
            .with_sources(["m6"]),
        EntityDraft::new("Concept", "Agent Isolation")
            .with_property("importance", "high")
            .with_property("reason", "prevent interference")
            .with_scale(Scale::Atomic)
            .with_sources(["m5", "m7"]),
        EntityDraft::new("Task", "Implement Local Embeddings")
            .with_property("status", "in_progress")
            .with_property("epic", "core_components")
            .with_scale(Scale::Atomic)
            .with_sources(["m8"]),
        EntityDraft::new("Task", "Basic Demo")
            .with_property("status", "in_progress")
            .with_property("epic", "core_components")
            .with_scale(Scale::Atomic)
            .with_sources(["m8"]),
        EntityDraft::new("Concept", "ADR-006: Leverage Client LLM")
            .with_property("decision", "use_client_llm")
            .with_property("principle", "YAGNI")
            .with_scale(Scale::Atomic)
            .with_sources(["m13"]),
        EntityDraft::new("Preference", "Preference: Hierarchical Organization")
            .with_property("valued", "hierarchy, entities, relationships")
            .with_scale(Scale::Atomic)
            .with_sources(["m9"]),
        EntityDraft::new("Preference", "Preference: WOW Factor")
            .with_property("valued", "impressive visualizations")
            .with_scale(Scale::Atomic)
            .with_sources(["m10"]),
    ];
    let mut ids = Vec::with_capacity(entities.len());
    for draft in entities {
        ids.push(store.add_entity(draft).await?.id);
    }
    let [
        user,
        ai_memory,
        memento,
        neo4j,
        fastmcp,
        mcp,
        embeddings,
        branch,
        isolation,
        task_embeddings,
        task_demo,
        adr006,
        pref_hierarchy,
        pref_wow,
    ] = <[_; 14]>::try_from(ids).map_err(|_| {
        memento_core::Error::InvalidInput("multi-scale scenario expects 14 entities".to_string())
    })?;

    let relationships = [
        RelationshipDraft::new(&user, &memento, "WORKS_ON", 1.0)
            .with_property("role", "creator")
            .with_evidence(["m1"]),
        RelationshipDraft::new(&user, &isolation, "VALUES", 0.9)
            .with_property("priority", "high")
            .with_evidence(["m7"]),
        RelationshipDraft::new(&user, &pref_hierarchy, "HAS_PREFERENCE", 0.8).with_evidence(["m9"]),
        RelationshipDraft::new(&user, &pref_wow, "HAS_PREFERENCE", 0.8).with_evidence(["m10"]),
        RelationshipDraft::new(&memento, &ai_memory, "BELONGS_TO_DOMAIN", 1.0).with_evidence(["m2"]),
        RelationshipDraft::new(&memento, &mcp, "IMPLEMENTS", 0.9)
            .with_property("role", "server")
            .with_evidence(["m2"]),
        RelationshipDraft::new(&memento, &fastmcp, "USES", 0.9)
            .with_property("purpose", "framework")
            .with_evidence(["m3"]),
        RelationshipDraft::new(&memento, &neo4j, "USES", 0.9)
            .with_property("purpose", "storage")
            .with_evidence(["m4"]),
        RelationshipDraft::new(&memento, &embeddings, "USES", 0.85)
            .with_property("purpose", "semantic_search")
            .with_evidence(["m11"]),
        RelationshipDraft::new(&neo4j, &embeddings, "STORES", 0.8)
            .with_property("data_type", "vector_embeddings")
            .with_evidence(["m14"]),
        RelationshipDraft::new(&adr006, &memento, "GUIDES", 0.85)
            .with_property("aspect", "architecture")
            .with_evidence(["m13"]),
        RelationshipDraft::new(&task_embeddings, &memento, "CONTRIBUTES_TO", 0.7)
            .with_property("phase", 1i64)
            .with_evidence(["m8"]),
        RelationshipDraft::new(&task_demo, &memento, "CONTRIBUTES_TO", 0.7)
            .with_property("phase", 1i64)
            .with_evidence(["m8"]),
        RelationshipDraft::new(&task_embeddings, &embeddings, "IMPLEMENTS", 0.9)
            .with_evidence(["m8", "m11"]),
        RelationshipDraft::new(&branch, &isolation, "PROVIDES", 0.75)
            .with_property("mechanism", "git_branch")
            .with_evidence(["m6", "m7"]),
        RelationshipDraft::new(&user, &branch, "WORKS_IN", 0.8)
            .with_property("environment", "cloud")
            .with_evidence(["m5", "m6"]),
    ];
    for draft in relationships {
        store.add_relationship(draft).await?;
    }

    let hierarchy = [
        (&ai_memory, &memento),
        (&memento, &neo4j),
        (&memento, &fastmcp),
        (&memento, &mcp),
        (&memento, &embeddings),
        (&memento, &task_demo),
        (&memento, &adr006),
        (&embeddings, &task_embeddings),
        (&user, &pref_hierarchy),
        (&user, &pref_wow),
        (&isolation, &branch),
    ];
    for (parent, child) in hierarchy {
        store.add_hierarchy_edge(parent, child).await?;
    }
    Ok(())
}
