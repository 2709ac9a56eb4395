use std::{fmt, marker::PhantomData, sync::Arc};

use {
    roster_storage::Storage,
    serde::{Serialize, de::DeserializeOwned},
    serde_json::Value,
    tokio::sync::Mutex,
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    types::{AgentRecord, Architecture, RagConfig, Skill, Tool},
};

/// The entity types the registry stores, one collection each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Skill,
    Tool,
    RagConfig,
    Agent,
    Architecture,
}

impl EntityKind {
    /// Name of the storage collection holding this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Skill => "skills",
            Self::Tool => "tools",
            Self::RagConfig => "rag_configs",
            Self::Agent => "agents",
            Self::Architecture => "architectures",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skill => "skill",
            Self::Tool => "tool",
            Self::RagConfig => "rag config",
            Self::Agent => "agent",
            Self::Architecture => "architecture",
        })
    }
}

/// A record addressable by id within its kind's collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

impl Record for Skill {
    const KIND: EntityKind = EntityKind::Skill;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Tool {
    const KIND: EntityKind = EntityKind::Tool;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for RagConfig {
    const KIND: EntityKind = EntityKind::RagConfig;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AgentRecord {
    const KIND: EntityKind = EntityKind::Agent;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Architecture {
    const KIND: EntityKind = EntityKind::Architecture;

    fn id(&self) -> &str {
        &self.id
    }
}

/// CRUD over one collection.
///
/// Mutations are serialized through `writes` so read-modify-write sequences
/// never interleave with another mutation of the same collection. Reads go
/// straight to storage.
pub struct Catalog<T> {
    storage: Arc<dyn Storage>,
    writes: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Catalog<T> {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            writes: Mutex::new(()),
            _record: PhantomData,
        }
    }

    fn collection() -> &'static str {
        T::KIND.collection()
    }

    fn decode(value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Error::malformed(T::KIND, e))
    }

    fn encode(record: &T) -> Result<Value> {
        serde_json::to_value(record).map_err(|e| Error::malformed(T::KIND, e))
    }

    /// Store a new record. Fails with `Conflict` when the id is taken.
    pub async fn create(&self, record: T) -> Result<T> {
        let value = Self::encode(&record)?;
        let _guard = self.writes.lock().await;
        if !self
            .storage
            .put_if_absent(Self::collection(), record.id(), value)
            .await?
        {
            return Err(Error::conflict(T::KIND, record.id()));
        }
        debug!(collection = Self::collection(), id = record.id(), "created");
        Ok(record)
    }

    pub async fn find(&self, id: &str) -> Result<Option<T>> {
        self.storage
            .get(Self::collection(), id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.storage.exists(Self::collection(), id).await?)
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        self.storage
            .list_all(Self::collection())
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Records for which `keep` holds, in storage order.
    pub async fn list_where(&self, keep: impl Fn(&T) -> bool) -> Result<Vec<T>> {
        Ok(self.list().await?.into_iter().filter(|r| keep(r)).collect())
    }

    /// Look up each id in order, dropping the ones that do not resolve.
    pub async fn resolve(&self, ids: &[String]) -> Result<Vec<T>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.find(id).await? {
                resolved.push(record);
            }
        }
        Ok(resolved)
    }

    /// Apply `change` to the stored record and write it back.
    pub async fn modify(&self, id: &str, change: impl FnOnce(&mut T)) -> Result<T> {
        let _guard = self.writes.lock().await;
        let mut record = self.get(id).await?;
        change(&mut record);
        self.storage
            .put(Self::collection(), id, Self::encode(&record)?)
            .await?;
        debug!(collection = Self::collection(), id, "updated");
        Ok(record)
    }

    /// Remove a record. Fails with `NotFound` when nothing was stored under `id`.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.writes.lock().await;
        if !self.storage.delete(Self::collection(), id).await? {
            return Err(Error::not_found(T::KIND, id));
        }
        debug!(collection = Self::collection(), id, "deleted");
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::types::RagType,
        roster_storage::MemoryStorage,
    };

    async fn catalog<T: Record>() -> Catalog<T> {
        let storage = MemoryStorage::new();
        storage.init_db().await.unwrap();
        Catalog::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn create_then_get_returns_equal_record() {
        let skills = catalog::<Skill>().await;
        let skill = Skill::new("s-1", "Summarization")
            .with_description("Summarize text")
            .with_tags(["nlp"]);
        assert_eq!(skills.create(skill.clone()).await.unwrap(), skill);
        assert_eq!(skills.get("s-1").await.unwrap(), skill);
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let tools = catalog::<Tool>().await;
        tools.create(Tool::new("t-dup", "Dup")).await.unwrap();
        let err = tools.create(Tool::new("t-dup", "Other")).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("already exists"));
        assert_eq!(tools.get("t-dup").await.unwrap().name, "Dup");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let rag = catalog::<RagConfig>().await;
        rag.create(RagConfig::new("r-del", "Del", RagType::VectorStore))
            .await
            .unwrap();
        rag.delete("r-del").await.unwrap();
        assert!(rag.get("r-del").await.unwrap_err().is_not_found());
        assert!(rag.delete("r-del").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_where_filters_in_order() {
        let skills = catalog::<Skill>().await;
        for (id, tag) in [("a", "nlp"), ("b", "vision"), ("c", "nlp")] {
            skills
                .create(Skill::new(id, id).with_tags([tag]))
                .await
                .unwrap();
        }
        let ids: Vec<_> = skills
            .list_where(|s| s.tags.contains("nlp"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(skills.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn resolve_drops_dangling_ids() {
        let skills = catalog::<Skill>().await;
        skills.create(Skill::new("s-1", "One")).await.unwrap();
        let resolved = skills
            .resolve(&["missing".into(), "s-1".into()])
            .await
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "s-1");
    }

    #[tokio::test]
    async fn modify_missing_record_is_not_found() {
        let tools = catalog::<Tool>().await;
        let err = tools.modify("nope", |t| t.name.clear()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!tools.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_creates_admit_one() {
        let skills = Arc::new(catalog::<Skill>().await);
        let mut handles = Vec::new();
        for i in 0..8 {
            let skills = Arc::clone(&skills);
            handles.push(tokio::spawn(async move {
                skills.create(Skill::new("same", format!("n{i}"))).await
            }));
        }
        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(e.is_conflict()),
            }
        }
        assert_eq!(created, 1);
    }
}
