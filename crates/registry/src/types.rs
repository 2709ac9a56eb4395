use std::{collections::BTreeSet, num::NonZeroU32};

use serde::{Deserialize, Deserializer, Serialize};

// ── Skills, tools, RAG ──────────────────────────────────────────────────────

/// A capability an agent advertises. The id is chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Sample requests the skill handles, in the order given.
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tags: BTreeSet::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Tool {
    pub const BUILTIN_PROVIDER: &'static str = "builtin";

    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            provider: default_provider(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.provider == Self::BUILTIN_PROVIDER
    }
}

fn default_provider() -> String {
    Tool::BUILTIN_PROVIDER.into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagType {
    VectorStore,
    WebSearch,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagConfig {
    pub id: String,
    pub name: String,
    pub rag_type: RagType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Number of passages to retrieve. Zero is rejected at deserialization.
    #[serde(default)]
    pub top_k: Option<NonZeroU32>,
}

impl RagConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rag_type: RagType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rag_type,
            description: String::new(),
            top_k: None,
        }
    }
}

// ── Agents ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionType {
    #[default]
    Sequential,
    Parallel,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default, alias = "prompt_inline")]
    pub prompt: String,
}

/// How a composite agent runs its roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub execution_type: ExecutionType,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Client-supplied agent fields, used for both create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Left empty when the agent is registered before it is deployed.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_agent_type")]
    pub agent_type: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub skill_ids: Vec<String>,
    #[serde(default)]
    pub tool_ids: Vec<String>,
    #[serde(default)]
    pub execution_type: Option<ExecutionType>,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Nested form, as returned by reads. Takes precedence over the top-level
    /// `execution_type`/`roles` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_config: Option<RuntimeConfig>,
}

fn default_version() -> String {
    "1.0.0".into()
}

fn default_agent_type() -> String {
    "general".into()
}

impl AgentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: String::new(),
            version: default_version(),
            agent_type: default_agent_type(),
            tags: BTreeSet::new(),
            is_public: false,
            skill_ids: Vec::new(),
            tool_ids: Vec::new(),
            execution_type: None,
            roles: Vec::new(),
            runtime_config: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_agent_type(mut self, agent_type: impl Into<String>) -> Self {
        self.agent_type = agent_type.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skills<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skill_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tools<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_roles(mut self, execution_type: ExecutionType, roles: Vec<Role>) -> Self {
        self.execution_type = Some(execution_type);
        self.roles = roles;
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Runtime config is only recorded when the client described one.
    fn runtime_config(&self) -> Option<RuntimeConfig> {
        if let Some(ref config) = self.runtime_config {
            return Some(config.clone());
        }
        if self.execution_type.is_none() && self.roles.is_empty() {
            return None;
        }
        Some(RuntimeConfig {
            execution_type: self.execution_type.unwrap_or_default(),
            roles: self.roles.clone(),
        })
    }
}

/// An agent as stored: references are kept as ids, never as embedded records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub agent_type: String,
    pub tags: BTreeSet<String>,
    pub is_public: bool,
    pub skill_ids: Vec<String>,
    pub tool_ids: Vec<String>,
    pub runtime_config: Option<RuntimeConfig>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl AgentRecord {
    pub(crate) fn from_spec(id: String, spec: AgentSpec, now: u64) -> Self {
        let runtime_config = spec.runtime_config();
        Self {
            id,
            name: spec.name,
            description: spec.description,
            url: spec.url,
            version: spec.version,
            agent_type: spec.agent_type,
            tags: spec.tags,
            is_public: spec.is_public,
            skill_ids: spec.skill_ids,
            tool_ids: spec.tool_ids,
            runtime_config,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every client-owned field, keeping identity and creation time.
    pub(crate) fn replace_with(&mut self, spec: AgentSpec, now: u64) {
        let created_at = self.created_at;
        *self = Self::from_spec(std::mem::take(&mut self.id), spec, now);
        self.created_at = created_at;
    }
}

/// An agent as returned to callers, with skill and tool ids resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(flatten)]
    pub record: AgentRecord,
    pub skills: Vec<Skill>,
    pub tools: Vec<Tool>,
}

impl Agent {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// Narrows `AgentManager::list`. Unset fields match everything; set fields
/// must all match. Blank values deserialize as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub agent_type: Option<String>,
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

impl AgentFilter {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            agent_type: None,
        }
    }

    pub fn agent_type(agent_type: impl Into<String>) -> Self {
        Self {
            tag: None,
            agent_type: Some(agent_type.into()),
        }
    }

    pub fn matches(&self, agent: &AgentRecord) -> bool {
        self.agent_type
            .as_deref()
            .is_none_or(|t| agent.agent_type == t)
            && self.tag.as_deref().is_none_or(|t| agent.tags.contains(t))
    }
}

// ── Architectures ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitecturePattern {
    Sequential,
    Parallel,
    Loop,
    Hierarchical,
}

/// A member slot. `agent_id` is not checked against registered agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureMember {
    pub agent_id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: ArchitecturePattern,
    #[serde(default)]
    pub agents: Vec<ArchitectureMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pattern: ArchitecturePattern,
    pub agents: Vec<ArchitectureMember>,
    pub created_at: u64,
}
