//! End-to-end scenarios across managers sharing one storage instance.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use {
    roster_registry::{
        AgentFilter, AgentSpec, ArchitecturePattern, ArchitectureSpec, DiscoveryOutcome,
        EntityKind, Error, RagConfig, RagType, Registry, Skill, Tool,
    },
    roster_storage::MemoryStorage,
};

async fn registry() -> Registry {
    let registry = Registry::new(Arc::new(MemoryStorage::new()));
    registry.init_db().await.unwrap();
    registry
}

#[tokio::test]
async fn dangling_skill_reference_is_dropped_on_read() {
    let r = registry().await;
    r.skills()
        .create(Skill::new("s-1", "Summarization").with_tags(["nlp"]))
        .await
        .unwrap();
    let agent = r
        .agents()
        .create(AgentSpec::new("X").with_skills(["s-1"]))
        .await
        .unwrap();

    let fetched = r.agents().get(agent.id()).await.unwrap();
    assert_eq!(fetched.skills[0].id, "s-1");

    r.skills().delete("s-1").await.unwrap();
    let fetched = r.agents().get(agent.id()).await.unwrap();
    assert!(fetched.skills.is_empty());
    assert_eq!(fetched.record.skill_ids, ["s-1"]);
}

#[tokio::test]
async fn every_collection_reports_conflict_and_not_found() {
    let r = registry().await;

    r.skills().create(Skill::new("dup", "A")).await.unwrap();
    r.tools().create(Tool::new("dup", "A")).await.unwrap();
    r.rag()
        .create(RagConfig::new("dup", "A", RagType::WebSearch))
        .await
        .unwrap();

    let skill_err = r.skills().create(Skill::new("dup", "B")).await.unwrap_err();
    assert!(matches!(
        skill_err,
        Error::Conflict {
            kind: EntityKind::Skill,
            ..
        }
    ));
    assert!(
        r.tools()
            .create(Tool::new("dup", "B"))
            .await
            .unwrap_err()
            .is_conflict()
    );
    assert!(
        r.rag()
            .create(RagConfig::new("dup", "B", RagType::Document))
            .await
            .unwrap_err()
            .is_conflict()
    );

    for err in [
        r.skills().get("nonexistent").await.unwrap_err(),
        r.tools().delete("nonexistent").await.unwrap_err(),
        r.rag().get("nonexistent").await.unwrap_err(),
        r.agents().get("nonexistent").await.unwrap_err(),
        r.architectures().get("nonexistent").await.unwrap_err(),
    ] {
        assert!(err.is_not_found(), "{err}");
    }
}

#[tokio::test]
async fn same_id_may_live_in_different_collections() {
    let r = registry().await;
    r.skills().create(Skill::new("shared", "skill")).await.unwrap();
    r.tools().create(Tool::new("shared", "tool")).await.unwrap();
    assert_eq!(r.skills().get("shared").await.unwrap().name, "skill");
    assert_eq!(r.tools().get("shared").await.unwrap().name, "tool");
}

#[tokio::test]
async fn deleting_a_tool_does_not_touch_referencing_agents() {
    let r = registry().await;
    r.tools().create(Tool::new("t-1", "Search")).await.unwrap();
    let agent = r
        .agents()
        .create(AgentSpec::new("A").with_tools(["t-1"]))
        .await
        .unwrap();
    assert_eq!(agent.tools.len(), 1);

    r.tools().delete("t-1").await.unwrap();
    let agents = r.agents().list(&AgentFilter::default()).await.unwrap();
    assert_eq!(agents.len(), 1);
    assert!(agents[0].tools.is_empty());
}

#[tokio::test]
async fn discovery_end_to_end() {
    let r = registry().await;
    assert_eq!(
        r.discovery().discover("translate").await.unwrap(),
        DiscoveryOutcome::NoMatch
    );

    r.skills()
        .create(
            Skill::new("s-disc", "Translation")
                .with_description("Translate text between languages")
                .with_tags(["translation", "language"])
                .with_examples(["translate this to Spanish"]),
        )
        .await
        .unwrap();
    r.agents()
        .create(
            AgentSpec::new("Translator")
                .with_url("http://translator")
                .with_skills(["s-disc"])
                .public(),
        )
        .await
        .unwrap();

    let outcome = r.discovery().discover("translate to Spanish").await.unwrap();
    assert_eq!(
        outcome.recommended().unwrap().agent.record.name,
        "Translator"
    );
}

#[tokio::test]
async fn architectures_do_not_validate_members() {
    let r = registry().await;
    let arch = r
        .architectures()
        .create(ArchitectureSpec {
            name: "Pipeline".into(),
            description: "two stage".into(),
            pattern: ArchitecturePattern::Sequential,
            agents: vec![roster_registry::ArchitectureMember {
                agent_id: "not-registered".into(),
                role: "worker".into(),
            }],
        })
        .await
        .unwrap();
    assert_eq!(r.architectures().list().await.unwrap(), vec![arch]);
}

#[tokio::test]
async fn health_follows_storage_lifecycle() {
    let r = registry().await;
    let health = r.health().await;
    assert_eq!((health.kind.as_str(), health.status.as_str()), ("memory", "ok"));

    r.shutdown().await.unwrap();
    assert!(!r.health().await.is_ok());
    assert!(matches!(
        r.skills().list().await.unwrap_err(),
        Error::Storage(_)
    ));
}
