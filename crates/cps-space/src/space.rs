//! The `Space` trait and its serializable state.

use std::any::Any;

use cps_agent::{Agent, AgentArena, IdSource, Params};
use cps_core::{Millis, SimRng};
use cps_substrate::{DecayKinetics, StaticNode};

use crate::error::SpaceResult;
use crate::homogeneous::HomogeneousSpace;
use crate::lattice2d::Lattice2DSpace;

/// Engine resources a space borrows for the duration of one update: the
/// global RNG stream and the id allocator for division clones.
pub struct TickCtx<'a> {
    pub rng: &'a mut SimRng,
    pub ids: &'a mut IdSource,
}

/// The geometric host of agents and substrate fields.
///
/// All operations flow simulation → space → agent; a space never calls back
/// up into the simulation.  The agent arena is passed in because the space
/// holds only placement references ([`cps_core::AgentId`]) — the simulation
/// owns the agents themselves.
pub trait Space {
    /// Register a new agent's placement and provision the attributes the
    /// space maintains.  Called by the simulation before the agent enters
    /// the arena; `arena` therefore holds everyone *except* the newcomer.
    fn add_agent(
        &mut self,
        agent: &mut Agent,
        params: &Params,
        arena: &AgentArena,
    ) -> SpaceResult<()>;

    /// Drop an agent's placement.  Called with the arena already missing it.
    fn remove_agent(&mut self, agent: &Agent, arena: &AgentArena) -> SpaceResult<()>;

    /// Attach a substrate field.  Re-registering a name replaces the field.
    fn add_substrate(
        &mut self,
        name: &str,
        diffusion: f64,
        decay: f64,
        kinetics: DecayKinetics,
    ) -> SpaceResult<()>;

    /// Attach a long-lived point source to a registered substrate.
    fn add_static_node(&mut self, substrate: &str, node: StaticNode) -> SpaceResult<()>;

    /// One global tick: run mechanics when the agent clock is due, then step
    /// each substrate field when the substrate clock is due.
    fn update(
        &mut self,
        dt: Millis,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()>;

    /// Serializable copy of the space for a snapshot.
    fn snapshot_state(&self) -> SpaceState;

    /// Concrete-type access for callers that need space-specific queries.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Owned, serializable space state — the form a snapshot stores and a
/// restored simulation rebuilds its space from.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum SpaceState {
    Homogeneous(HomogeneousSpace),
    Lattice2D(Lattice2DSpace),
}

impl SpaceState {
    pub fn into_space(self) -> Box<dyn Space> {
        match self {
            SpaceState::Homogeneous(space) => Box::new(space),
            SpaceState::Lattice2D(space) => Box::new(space),
        }
    }
}
