use std::sync::Arc;

use roster_storage::{Storage, StorageHealth};

use crate::{
    agents::AgentManager,
    architectures::ArchitectureManager,
    catalog::Catalog,
    discovery::Discovery,
    error::Result,
    types::{RagConfig, Skill, Tool},
};

/// Every manager wired over one storage handle.
///
/// Build one per process (or per test) and share it behind an `Arc`.
pub struct Registry {
    storage: Arc<dyn Storage>,
    skills: Arc<Catalog<Skill>>,
    tools: Arc<Catalog<Tool>>,
    rag: Catalog<RagConfig>,
    agents: AgentManager,
    architectures: ArchitectureManager,
}

impl Registry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let skills = Arc::new(Catalog::new(Arc::clone(&storage)));
        let tools = Arc::new(Catalog::new(Arc::clone(&storage)));
        Self {
            rag: Catalog::new(Arc::clone(&storage)),
            agents: AgentManager::new(
                Arc::clone(&storage),
                Arc::clone(&skills),
                Arc::clone(&tools),
            ),
            architectures: ArchitectureManager::new(Arc::clone(&storage)),
            skills,
            tools,
            storage,
        }
    }

    pub async fn init_db(&self) -> Result<()> {
        Ok(self.storage.init_db().await?)
    }

    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.storage.shutdown().await?)
    }

    pub async fn health(&self) -> StorageHealth {
        self.storage.health().await
    }

    pub fn skills(&self) -> &Catalog<Skill> {
        &self.skills
    }

    pub fn tools(&self) -> &Catalog<Tool> {
        &self.tools
    }

    pub fn rag(&self) -> &Catalog<RagConfig> {
        &self.rag
    }

    pub fn agents(&self) -> &AgentManager {
        &self.agents
    }

    pub fn architectures(&self) -> &ArchitectureManager {
        &self.architectures
    }

    pub fn discovery(&self) -> Discovery<'_> {
        Discovery::new(&self.agents)
    }
}
