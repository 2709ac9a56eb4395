//! Lexical agent discovery.
//!
//! Every skill of a public agent contributes a bag of tokens built from its
//! name, description, tags and examples. A skill scores one point per distinct
//! query token found in its bag; an agent scores as well as its best skill.
//! Ties keep the agent listed first, so the winner depends on storage order.

use std::collections::HashSet;

use {serde::Serialize, tracing::debug};

use crate::{
    agents::AgentManager,
    error::Result,
    types::{Agent, Skill},
};

/// A public agent that matched the query, with the skill that earned its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub agent: Agent,
    pub skill: Skill,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Recommended(Candidate),
    NoMatch,
}

impl DiscoveryOutcome {
    pub fn recommended(&self) -> Option<&Candidate> {
        match self {
            Self::Recommended(candidate) => Some(candidate),
            Self::NoMatch => None,
        }
    }
}

/// Lower-cased, whitespace-separated tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

fn skill_tokens(skill: &Skill) -> HashSet<String> {
    let mut bag: HashSet<String> = tokenize(&skill.name)
        .chain(tokenize(&skill.description))
        .collect();
    for text in skill.tags.iter().chain(&skill.examples) {
        bag.extend(tokenize(text));
    }
    bag
}

/// Number of distinct query tokens present in the skill's bag.
pub fn score_skill(query: &HashSet<String>, skill: &Skill) -> usize {
    let bag = skill_tokens(skill);
    query.iter().filter(|token| bag.contains(*token)).count()
}

/// Best-scoring skill of an agent. The earliest skill wins a tie.
fn best_skill<'a>(query: &HashSet<String>, agent: &'a Agent) -> Option<(&'a Skill, usize)> {
    let mut best: Option<(&Skill, usize)> = None;
    for skill in &agent.skills {
        let score = score_skill(query, skill);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((skill, score));
        }
    }
    best
}

pub struct Discovery<'a> {
    agents: &'a AgentManager,
}

impl<'a> Discovery<'a> {
    pub fn new(agents: &'a AgentManager) -> Self {
        Self { agents }
    }

    /// All public agents with a positive score, best first. Equal scores keep
    /// storage order.
    pub async fn rank(&self, query: &str) -> Result<Vec<Candidate>> {
        let query_tokens: HashSet<String> = tokenize(query).collect();
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<Candidate> = self
            .agents
            .list_public()
            .await?
            .into_iter()
            .filter_map(|agent| {
                let (skill, score) = best_skill(&query_tokens, &agent)?;
                let skill = skill.clone();
                Some(Candidate {
                    agent,
                    skill,
                    score,
                })
            })
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(candidates)
    }

    pub async fn discover(&self, query: &str) -> Result<DiscoveryOutcome> {
        let outcome = match self.rank(query).await?.into_iter().next() {
            Some(best) => {
                debug!(
                    query,
                    agent_id = best.agent.id(),
                    skill_id = %best.skill.id,
                    score = best.score,
                    "discovery match"
                );
                DiscoveryOutcome::Recommended(best)
            },
            None => {
                debug!(query, "discovery found no match");
                DiscoveryOutcome::NoMatch
            },
        };
        Ok(outcome)
    }
}
