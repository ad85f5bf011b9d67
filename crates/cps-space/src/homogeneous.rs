//! Well-mixed compartment.
//!
//! No geometry: every agent interacts with the whole population.  The
//! compartment is bounded by a total volume; divisions that would exceed it
//! latch `has_free_volume = false` until a removal frees space again.

use std::any::Any;

use cps_agent::{keys, Agent, AgentArena, Params};
use cps_core::{AgentId, Millis, TimeSpan, UpdateClock};
use cps_substrate::{DecayKinetics, HomogeneousField, StaticNode};

use crate::error::{SpaceError, SpaceResult};
use crate::space::{Space, SpaceState, TickCtx};

#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HomogeneousSpace {
    volume: f64,
    has_free_volume: bool,
    agent_clock: UpdateClock,
    substrate_clock: UpdateClock,
    substrates: Vec<HomogeneousField>,
}

impl HomogeneousSpace {
    pub fn new(
        volume: f64,
        dt_agent: Option<TimeSpan>,
        dt_substrate: Option<TimeSpan>,
    ) -> Self {
        Self {
            volume,
            has_free_volume: true,
            agent_clock: UpdateClock::new(dt_agent),
            substrate_clock: UpdateClock::new(dt_substrate),
            substrates: Vec::new(),
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn has_free_volume(&self) -> bool {
        self.has_free_volume
    }

    pub fn substrate(&self, name: &str) -> Option<&HomogeneousField> {
        self.substrates.iter().find(|f| f.name() == name)
    }

    pub fn substrate_mut(&mut self, name: &str) -> Option<&mut HomogeneousField> {
        self.substrates.iter_mut().find(|f| f.name() == name)
    }

    fn total_agent_volume(arena: &AgentArena) -> f64 {
        arena
            .iter()
            .map(|a| a.float_attr(keys::VOLUME).unwrap_or(0.0))
            .sum()
    }

    fn process_division(
        &mut self,
        id: AgentId,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()> {
        if !self.has_free_volume {
            return Ok(());
        }
        let total = Self::total_agent_volume(arena);
        let Some(agent) = arena.get_mut(id) else {
            return Ok(());
        };
        let agent_volume = agent.float_attr(keys::VOLUME).unwrap_or(0.0);
        if total + agent_volume <= self.volume {
            agent.set_attribute(keys::DIVISION_PENDING, false);
            agent.set_attribute(keys::DIVISION_COMPLETED, true);
            let daughter = agent.clone_with(ctx.ids);
            arena.push(daughter);
        } else {
            self.has_free_volume = false;
        }
        Ok(())
    }

    fn register_dynamic_nodes(&mut self, arena: &AgentArena) -> SpaceResult<()> {
        for agent in arena.iter() {
            let Some(map) = agent.substrates() else {
                continue;
            };
            let id = agent.id();
            for name in map.keys() {
                let field = self
                    .substrates
                    .iter_mut()
                    .find(|f| f.name() == name)
                    .ok_or_else(|| SpaceError::UnknownSubstrate(name.clone()))?;
                field.add_dynamic_node(id);
            }
        }
        Ok(())
    }
}

impl Space for HomogeneousSpace {
    fn add_agent(
        &mut self,
        agent: &mut Agent,
        params: &Params,
        arena: &AgentArena,
    ) -> SpaceResult<()> {
        let volume = params
            .get(keys::VOLUME)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0);
        let total = Self::total_agent_volume(arena);
        if self.volume < total + volume {
            log::warn!(
                "total agent volume {:.1} exceeds the capacity {:.1} of the compartment",
                total + volume,
                self.volume
            );
        }
        agent.set_default(keys::DIVISION_PENDING, false);
        agent.set_default(keys::DIVISION_COMPLETED, false);
        agent.set_default(keys::REMOVE_PENDING, false);
        agent.set_default(keys::VOLUME, volume);
        Ok(())
    }

    fn remove_agent(&mut self, _agent: &Agent, arena: &AgentArena) -> SpaceResult<()> {
        if Self::total_agent_volume(arena) <= self.volume {
            self.has_free_volume = true;
        }
        Ok(())
    }

    fn add_substrate(
        &mut self,
        name: &str,
        diffusion: f64,
        decay: f64,
        kinetics: DecayKinetics,
    ) -> SpaceResult<()> {
        self.substrates.retain(|f| f.name() != name);
        self.substrates
            .push(HomogeneousField::new(name, diffusion, decay, kinetics));
        Ok(())
    }

    fn add_static_node(&mut self, substrate: &str, node: StaticNode) -> SpaceResult<()> {
        let field = self
            .substrate_mut(substrate)
            .ok_or_else(|| SpaceError::UnknownSubstrate(substrate.to_string()))?;
        field.add_static_node(node);
        Ok(())
    }

    fn update(
        &mut self,
        dt: Millis,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()> {
        if self.agent_clock.due() {
            for field in &mut self.substrates {
                field.clear_dynamic_nodes();
            }
            // Division and removal sweep, in insertion order.
            for id in arena.ids() {
                let Some(agent) = arena.get(id) else {
                    continue;
                };
                if agent.bool_attr(keys::DIVISION_PENDING).unwrap_or(false) {
                    self.process_division(id, arena, ctx)?;
                }
                if let Some(agent) = arena.get(id) {
                    if agent.bool_attr(keys::REMOVE_PENDING).unwrap_or(false) {
                        let removed = arena.remove(id);
                        if let Some(removed) = removed {
                            self.remove_agent(&removed, arena)?;
                        }
                    }
                }
            }
            self.register_dynamic_nodes(arena)?;
            self.agent_clock.reset();
        }
        self.agent_clock.increase(dt);

        if self.substrate_clock.due() {
            let elapsed = self.substrate_clock.elapsed();
            for field in &mut self.substrates {
                field.update(elapsed, self.volume, arena)?;
            }
            self.substrate_clock.reset();
        }
        self.substrate_clock.increase(dt);
        Ok(())
    }

    fn snapshot_state(&self) -> SpaceState {
        SpaceState::Homogeneous(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
