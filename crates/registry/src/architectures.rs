use std::sync::Arc;

use {roster_storage::Storage, tracing::info};

use crate::{
    agents::now_ms,
    catalog::Catalog,
    error::Result,
    types::{Architecture, ArchitectureSpec},
};

/// Multi-agent compositions. Member agent ids are loose references: they are
/// neither checked on create nor resolved on read.
pub struct ArchitectureManager {
    architectures: Catalog<Architecture>,
}

impl ArchitectureManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            architectures: Catalog::new(storage),
        }
    }

    pub async fn create(&self, spec: ArchitectureSpec) -> Result<Architecture> {
        let architecture = Architecture {
            id: uuid::Uuid::new_v4().to_string(),
            name: spec.name,
            description: spec.description,
            pattern: spec.pattern,
            agents: spec.agents,
            created_at: now_ms(),
        };
        let architecture = self.architectures.create(architecture).await?;
        info!(
            architecture_id = %architecture.id,
            members = architecture.agents.len(),
            "architecture registered"
        );
        Ok(architecture)
    }

    pub async fn get(&self, id: &str) -> Result<Architecture> {
        self.architectures.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Architecture>> {
        self.architectures.list().await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.architectures.delete(id).await
    }
}
