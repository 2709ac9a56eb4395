use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use {roster_storage::Storage, tracing::info};

use crate::{
    catalog::Catalog,
    error::{Error, Result},
    types::{Agent, AgentFilter, AgentRecord, AgentSpec, Skill, Tool},
};

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Agent CRUD. Skill and tool references are stored as ids and joined through
/// the shared skill/tool catalogs whenever an agent is read.
pub struct AgentManager {
    agents: Catalog<AgentRecord>,
    skills: Arc<Catalog<Skill>>,
    tools: Arc<Catalog<Tool>>,
}

impl AgentManager {
    pub fn new(
        storage: Arc<dyn Storage>,
        skills: Arc<Catalog<Skill>>,
        tools: Arc<Catalog<Tool>>,
    ) -> Self {
        Self {
            agents: Catalog::new(storage),
            skills,
            tools,
        }
    }

    /// Register an agent under a fresh id. Referenced skills and tools need
    /// not exist yet, and `url` may be empty until the agent is deployed.
    pub async fn create(&self, spec: AgentSpec) -> Result<Agent> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = self
            .agents
            .create(AgentRecord::from_spec(id, spec, now_ms()))
            .await?;
        info!(agent_id = %record.id, name = %record.name, "agent registered");
        self.resolve(record).await
    }

    pub async fn get(&self, id: &str) -> Result<Agent> {
        let record = self.agents.get(id).await?;
        self.resolve(record).await
    }

    /// Replace all client-owned fields of an existing agent.
    pub async fn update(&self, id: &str, spec: AgentSpec) -> Result<Agent> {
        let now = now_ms();
        let record = self
            .agents
            .modify(id, |record| record.replace_with(spec, now))
            .await?;
        self.resolve(record).await
    }

    /// Attach the endpoint of an agent registered before deployment. Nothing
    /// else on the record changes. A blank url is rejected.
    pub async fn patch_url(&self, id: &str, url: impl Into<String>) -> Result<Agent> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::invalid("url", "must not be blank"));
        }
        let now = now_ms();
        let record = self
            .agents
            .modify(id, |record| {
                record.url = url;
                record.updated_at = now;
            })
            .await?;
        info!(agent_id = %record.id, url = %record.url, "agent url attached");
        self.resolve(record).await
    }

    pub async fn list(&self, filter: &AgentFilter) -> Result<Vec<Agent>> {
        let records = self.agents.list_where(|a| filter.matches(a)).await?;
        self.resolve_all(records).await
    }

    pub async fn list_public(&self) -> Result<Vec<Agent>> {
        let records = self.agents.list_where(|a| a.is_public).await?;
        self.resolve_all(records).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.agents.delete(id).await?;
        info!(agent_id = %id, "agent removed");
        Ok(())
    }

    async fn resolve(&self, record: AgentRecord) -> Result<Agent> {
        let skills = self.skills.resolve(&record.skill_ids).await?;
        let tools = self.tools.resolve(&record.tool_ids).await?;
        Ok(Agent {
            record,
            skills,
            tools,
        })
    }

    async fn resolve_all(&self, records: Vec<AgentRecord>) -> Result<Vec<Agent>> {
        let mut agents = Vec::with_capacity(records.len());
        for record in records {
            agents.push(self.resolve(record).await?);
        }
        Ok(agents)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::{ExecutionType, Role},
        roster_storage::MemoryStorage,
    };

    struct Fixture {
        skills: Arc<Catalog<Skill>>,
        tools: Arc<Catalog<Tool>>,
        agents: AgentManager,
    }

    async fn fixture() -> Fixture {
        let storage = MemoryStorage::new();
        storage.init_db().await.unwrap();
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let skills = Arc::new(Catalog::new(Arc::clone(&storage)));
        let tools = Arc::new(Catalog::new(Arc::clone(&storage)));
        let agents = AgentManager::new(storage, Arc::clone(&skills), Arc::clone(&tools));
        Fixture {
            skills,
            tools,
            agents,
        }
    }

    #[tokio::test]
    async fn create_without_references_resolves_to_empty_lists() {
        let f = fixture().await;
        let agent = f
            .agents
            .create(AgentSpec::new("Test Agent").with_url("http://localhost:8000"))
            .await
            .unwrap();
        assert!(agent.skills.is_empty());
        assert!(agent.tools.is_empty());
        assert_eq!(f.agents.get(agent.id()).await.unwrap(), agent);
    }

    #[tokio::test]
    async fn ids_are_generated_and_unique() {
        let f = fixture().await;
        let a = f.agents.create(AgentSpec::new("A")).await.unwrap();
        let b = f.agents.create(AgentSpec::new("A")).await.unwrap();
        assert_ne!(a.id(), b.id());
        assert!(!a.id().is_empty());
    }

    #[tokio::test]
    async fn create_resolves_existing_skills_and_tools() {
        let f = fixture().await;
        let skill = Skill::new("s-ref", "Referenced Skill");
        f.skills.create(skill.clone()).await.unwrap();
        f.tools
            .create(Tool::new("t-ref", "Referenced Tool"))
            .await
            .unwrap();

        let agent = f
            .agents
            .create(
                AgentSpec::new("Skilled")
                    .with_skills(["s-ref", "s-missing"])
                    .with_tools(["t-ref"]),
            )
            .await
            .unwrap();
        assert_eq!(agent.skills, vec![skill]);
        assert_eq!(agent.tools.len(), 1);
        // unresolved ids stay on the record
        assert_eq!(agent.record.skill_ids, ["s-ref", "s-missing"]);
    }

    #[tokio::test]
    async fn skill_edits_show_through_on_next_read() {
        let f = fixture().await;
        f.skills.create(Skill::new("s", "Before")).await.unwrap();
        let agent = f
            .agents
            .create(AgentSpec::new("A").with_skills(["s"]))
            .await
            .unwrap();
        f.skills
            .modify("s", |s| s.name = "After".into())
            .await
            .unwrap();
        let agent = f.agents.get(agent.id()).await.unwrap();
        assert_eq!(agent.skills[0].name, "After");
    }

    #[tokio::test]
    async fn runtime_config_is_recorded() {
        let f = fixture().await;
        let agent = f
            .agents
            .create(AgentSpec::new("Pipeline").with_roles(ExecutionType::Sequential, vec![
                Role {
                    name: "researcher".into(),
                    prompt: "Research the topic".into(),
                },
                Role {
                    name: "writer".into(),
                    prompt: "Write a summary".into(),
                },
            ]))
            .await
            .unwrap();
        let config = agent.record.runtime_config.unwrap();
        assert_eq!(config.execution_type, ExecutionType::Sequential);
        assert_eq!(config.roles.len(), 2);
    }

    #[tokio::test]
    async fn two_phase_registration() {
        let f = fixture().await;
        let agent = f
            .agents
            .create(
                AgentSpec::new("Deploy Me")
                    .with_description("Pending deploy")
                    .with_tags(["x"]),
            )
            .await
            .unwrap();
        assert_eq!(agent.record.url, "");

        let patched = f
            .agents
            .patch_url(agent.id(), "https://my-agent-xyz.run.app")
            .await
            .unwrap();
        assert_eq!(patched.record.url, "https://my-agent-xyz.run.app");

        let reread = f.agents.get(agent.id()).await.unwrap();
        assert_eq!(reread.record.url, "https://my-agent-xyz.run.app");
        assert_eq!(reread.record.description, "Pending deploy");
        assert_eq!(reread.record.tags, agent.record.tags);
        assert_eq!(reread.record.created_at, agent.record.created_at);
    }

    #[tokio::test]
    async fn blank_url_is_rejected_and_leaves_agent_unchanged() {
        let f = fixture().await;
        let agent = f.agents.create(AgentSpec::new("Deploy Me")).await.unwrap();
        for blank in ["", "   "] {
            let err = f.agents.patch_url(agent.id(), blank).await.unwrap_err();
            assert!(err.is_invalid(), "{err}");
        }
        let reread = f.agents.get(agent.id()).await.unwrap();
        assert_eq!(reread.record, agent.record);
    }

    #[tokio::test]
    async fn update_with_read_body_keeps_runtime_config() {
        let f = fixture().await;
        let agent = f
            .agents
            .create(AgentSpec::new("Pipeline").with_roles(ExecutionType::Parallel, vec![Role {
                name: "w".into(),
                prompt: "p".into(),
            }]))
            .await
            .unwrap();
        let body = serde_json::to_value(f.agents.get(agent.id()).await.unwrap()).unwrap();

        let updated = f
            .agents
            .update(agent.id(), serde_json::from_value(body).unwrap())
            .await
            .unwrap();
        assert!(updated.record.runtime_config.is_some());
        assert_eq!(updated.record.runtime_config, agent.record.runtime_config);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let f = fixture().await;
        let agent = f
            .agents
            .create(
                AgentSpec::new("Original")
                    .with_description("V1")
                    .with_url("http://a")
                    .with_tags(["old"]),
            )
            .await
            .unwrap();
        f.agents
            .update(
                agent.id(),
                AgentSpec::new("Updated")
                    .with_description("V2")
                    .with_url("http://b"),
            )
            .await
            .unwrap();
        let updated = f.agents.get(agent.id()).await.unwrap();
        assert_eq!(updated.record.name, "Updated");
        assert_eq!(updated.record.url, "http://b");
        assert!(updated.record.tags.is_empty());
        assert_eq!(updated.id(), agent.id());
    }

    #[tokio::test]
    async fn missing_agent_is_not_found() {
        let f = fixture().await;
        assert!(f.agents.get("nonexistent").await.unwrap_err().is_not_found());
        assert!(
            f.agents
                .update("nonexistent", AgentSpec::new("X"))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            f.agents
                .patch_url("nonexistent", "http://x")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(f.agents.delete("nonexistent").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_filters_by_type_and_tag() {
        let f = fixture().await;
        f.agents
            .create(AgentSpec::new("R").with_agent_type("researcher").with_tags(["ml"]))
            .await
            .unwrap();
        f.agents
            .create(AgentSpec::new("W").with_agent_type("writer").with_tags(["ml"]))
            .await
            .unwrap();
        f.agents
            .create(AgentSpec::new("G").with_tags(["unique-tag"]))
            .await
            .unwrap();

        let researchers = f
            .agents
            .list(&AgentFilter::agent_type("researcher"))
            .await
            .unwrap();
        assert_eq!(researchers.len(), 1);
        assert_eq!(researchers[0].record.name, "R");

        assert_eq!(f.agents.list(&AgentFilter::tag("ml")).await.unwrap().len(), 2);
        let both = AgentFilter {
            tag: Some("ml".into()),
            agent_type: Some("writer".into()),
        };
        let writers = f.agents.list(&both).await.unwrap();
        assert_eq!(writers.len(), 1);
        assert_eq!(writers[0].record.name, "W");
        assert_eq!(f.agents.list(&AgentFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_public_skips_private_agents() {
        let f = fixture().await;
        f.agents.create(AgentSpec::new("private")).await.unwrap();
        f.agents.create(AgentSpec::new("open").public()).await.unwrap();
        let public = f.agents.list_public().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].record.name, "open");
    }
}
