//! The `Agent` attribute store and monotonic id allocation.

use rustc_hash::FxHashMap;

use cps_core::{AgentId, TimeSpan};

use crate::value::{AttrValue, SubstrateMap};

/// Standard attribute names written or read by the engine core.
///
/// Models and user code are free to add their own keys; these are the ones
/// the spaces and bundled models agree on.
pub mod keys {
    /// bool — model requests a division (consumed by the space).
    pub const DIVISION_PENDING: &str = "division_pending";
    /// bool — the space completed a division this tick.
    pub const DIVISION_COMPLETED: &str = "division_completed";
    /// bool — model requests removal (consumed by the space).
    pub const REMOVE_PENDING: &str = "remove_pending";
    /// int — occupancy mass of the agent.
    pub const VOLUME: &str = "volume";
    /// pair — lattice cell index (lattice spaces only).
    pub const POSITION: &str = "position";
    /// float — characteristic velocity in µm per ms, ≥ 0.
    pub const MOTILITY: &str = "motility";
    /// float — dimensionless adhesion scale, ≥ 0.
    pub const BINDING_AFFINITY: &str = "binding_affinity";
    /// int — maximal push radius on division.
    pub const DISPLACEMENT_LIMIT: &str = "displacement_limit";
    /// substrate map — per-substrate coupling of this agent.
    pub const SUBSTRATE_INFO: &str = "substrate_info";
    /// str — phenotype label, e.g. `alive` / `necrotic`.
    pub const STATE: &str = "state";
    /// time — mean cell-cycle length (input to the cell-cycle model).
    pub const CELLCYCLE_MEAN_LENGTH: &str = "cellcycle_mean_length";
    /// float — the drawn cycle length of this agent, in ms.
    pub const CELLCYCLE_LENGTH: &str = "cellcycle_length";
    /// float — time accumulated in the current cycle, in ms.
    pub const CELLCYCLE_CURRENT_TIME: &str = "cellcycle_current_time";
    /// bool — whether the cycle clock is running.
    pub const CELLCYCLE_IS_ACTIVE: &str = "cellcycle_is_active";
    /// bool — randomize the initial cycle phase at initialization.
    pub const CELLCYCLE_RANDOM_INITIAL: &str = "cellcycle_random_initial";
}

// ── IdSource ──────────────────────────────────────────────────────────────────

/// Monotonic allocator for [`AgentId`]s, owned by the simulation.
///
/// Ids are never reused within a run; a restored simulation advances the
/// source past the largest id found in the snapshot.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct IdSource {
    next: u32,
}

impl IdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }

    /// Ensure future allocations stay above `id`.
    pub fn advance_past(&mut self, id: AgentId) {
        if id != AgentId::INVALID && self.next <= id.0 {
            self.next = id.0 + 1;
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One simulated cell: a unique id and a typed attribute bag.
///
/// A fresh agent carries `AgentId::INVALID` until it is attached to a
/// simulation, which assigns the next id from its [`IdSource`].
///
/// `Clone` is an *exact* copy (same id) used by the snapshot plumbing;
/// biological division goes through [`Agent::clone_with`], which deep-copies
/// the attributes and allocates a fresh id.
#[derive(Clone, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Agent {
    id: AgentId,
    attributes: FxHashMap<String, AttrValue>,
}

impl Agent {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Assign the id at attach time.  Idempotent for already-assigned agents.
    pub fn assign_id(&mut self, source: &mut IdSource) -> AgentId {
        if self.id == AgentId::INVALID {
            self.id = source.next_id();
        }
        self.id
    }

    /// Deep copy with a freshly allocated id — the division primitive.
    pub fn clone_with(&self, source: &mut IdSource) -> Agent {
        Agent {
            id: source.next_id(),
            attributes: self.attributes.clone(),
        }
    }

    // ── Attribute access ──────────────────────────────────────────────────

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Create the attribute only if absent; returns whether it was created.
    /// This is what makes model attribute initialization idempotent.
    pub fn set_default(&mut self, name: &str, value: impl Into<AttrValue>) -> bool {
        if self.attributes.contains_key(name) {
            return false;
        }
        self.attributes.insert(name.to_string(), value.into());
        true
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttrValue> {
        self.attributes.get_mut(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ── Typed views ───────────────────────────────────────────────────────

    #[inline]
    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(AttrValue::as_bool)
    }

    #[inline]
    pub fn int_attr(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(AttrValue::as_int)
    }

    #[inline]
    pub fn float_attr(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttrValue::as_float)
    }

    #[inline]
    pub fn pair_attr(&self, name: &str) -> Option<(i32, i32)> {
        self.get(name).and_then(AttrValue::as_pair)
    }

    #[inline]
    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    #[inline]
    pub fn time_attr(&self, name: &str) -> Option<TimeSpan> {
        self.get(name).and_then(AttrValue::as_time)
    }

    /// The agent's per-substrate coupling map, if provisioned.
    #[inline]
    pub fn substrates(&self) -> Option<&SubstrateMap> {
        self.get(keys::SUBSTRATE_INFO).and_then(AttrValue::as_substrates)
    }

    #[inline]
    pub fn substrates_mut(&mut self) -> Option<&mut SubstrateMap> {
        self.get_mut(keys::SUBSTRATE_INFO)
            .and_then(AttrValue::as_substrates_mut)
    }
}
