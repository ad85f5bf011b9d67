//! Insertion-ordered owned agent storage.
//!
//! The arena is the single authoritative owner of all live agents.  Spaces
//! and substrate fields refer to agents by [`AgentId`] only and receive
//! `&mut AgentArena` for the duration of their update — there are no shared
//! references from the geometry back into the population.
//!
//! Insertion order is preserved across the agent's lifetime (new agents are
//! always appended), because model updates and homogeneous division sweeps
//! iterate in that order by contract.

use rustc_hash::FxHashMap;

use cps_core::AgentId;

use crate::agent::Agent;

/// Ordered agent collection with O(1) id lookup.
#[derive(Default)]
pub struct AgentArena {
    agents: Vec<Agent>,
    index: FxHashMap<AgentId, usize>,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent.  The agent must already carry a valid id.
    pub fn push(&mut self, agent: Agent) -> AgentId {
        let id = agent.id();
        debug_assert_ne!(id, AgentId::INVALID, "agent must be id-assigned before storage");
        debug_assert!(!self.index.contains_key(&id), "duplicate agent id {id}");
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        id
    }

    /// Remove and return the agent with `id`, preserving the order of the
    /// remaining agents.  O(n) in the population size; removals are rare
    /// compared to per-tick iteration.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let pos = self.index.remove(&id)?;
        let agent = self.agents.remove(pos);
        for (i, a) in self.agents.iter().enumerate().skip(pos) {
            self.index.insert(a.id(), i);
        }
        Some(agent)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let i = *self.index.get(&id)?;
        Some(&mut self.agents[i])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Snapshot of all ids in insertion order.  Trials take this, permute it,
    /// and then mutate the arena without holding a borrow across the loop.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(Agent::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    /// The underlying ordered slice (read-only), e.g. for snapshotting.
    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }
}
