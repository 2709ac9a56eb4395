//! Registry of agent metadata.
//!
//! Clients register skills, tools, RAG configurations, agents and multi-agent
//! architectures. Agents reference skills and tools by id; the references are
//! joined at read time, so an agent always reflects the current skill and tool
//! records and silently drops ids that no longer resolve.
//!
//! [`Discovery`] recommends a public agent for a free-text query by lexical
//! overlap with its skills.

pub mod agents;
pub mod architectures;
pub mod catalog;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod types;

pub use {
    agents::AgentManager,
    architectures::ArchitectureManager,
    catalog::{Catalog, EntityKind, Record},
    discovery::{Candidate, Discovery, DiscoveryOutcome},
    error::{Error, Result},
    registry::Registry,
    types::{
        Agent, AgentFilter, AgentRecord, AgentSpec, Architecture, ArchitectureMember,
        ArchitecturePattern, ArchitectureSpec, ExecutionType, RagConfig, RagType, Role,
        RuntimeConfig, Skill, Tool,
    },
};
