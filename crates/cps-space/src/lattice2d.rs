//! 2D exclusion lattice.
//!
//! Each lattice cell holds at most one agent.  The mechanics pipeline per due
//! agent tick is: displacement trials → division trials → removal trials →
//! dynamic-node rebuild, each trial over a fresh random permutation of the
//! population.  Substrate fields integrate afterwards on their own clock.

use std::any::Any;

use ndarray::Array2;

use cps_agent::{keys, Agent, AgentArena, Params};
use cps_core::{AgentId, Millis, TimeSpan, UpdateClock};
use cps_lattice::{bresenham, displacement_trial, nearest_empty_sites, Pos};
use cps_substrate::{DecayKinetics, Lattice2DField, StaticNode};

use crate::error::{SpaceError, SpaceResult};
use crate::space::{Space, SpaceState, TickCtx};

#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Lattice2DSpace {
    dimensions: (usize, usize),
    dx: f64,
    agent_layer: Array2<Option<AgentId>>,
    agent_clock: UpdateClock,
    substrate_clock: UpdateClock,
    substrates: Vec<Lattice2DField>,
}

impl Lattice2DSpace {
    /// `dimensions` in lattice units, `dx` in µm per cell edge.
    pub fn new(
        dimensions: (usize, usize),
        dx: f64,
        dt_agent: Option<TimeSpan>,
        dt_substrate: Option<TimeSpan>,
    ) -> Self {
        Self {
            dimensions,
            dx,
            agent_layer: Array2::from_elem(dimensions, None),
            agent_clock: UpdateClock::new(dt_agent),
            substrate_clock: UpdateClock::new(dt_substrate),
            substrates: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    pub fn grid_spacing(&self) -> f64 {
        self.dx
    }

    /// Whether `position` lies within the grid.
    pub fn is_valid_position(&self, position: (i32, i32)) -> bool {
        position.0 >= 0
            && position.1 >= 0
            && (position.0 as usize) < self.dimensions.0
            && (position.1 as usize) < self.dimensions.1
    }

    /// Whether the cell at `position` holds no agent.  `position` must be
    /// valid.
    pub fn is_empty_position(&self, position: (i32, i32)) -> bool {
        self.agent_layer[cell(position)].is_none()
    }

    /// Cell volume `dx²` minus the occupant's volume, if any.
    pub fn get_remaining_volume(&self, position: (i32, i32), arena: &AgentArena) -> f64 {
        let cell_volume = self.dx * self.dx;
        match self.agent_layer[cell(position)] {
            None => cell_volume,
            Some(id) => {
                let occupied = arena
                    .get(id)
                    .and_then(|a| a.float_attr(keys::VOLUME))
                    .unwrap_or(0.0);
                cell_volume - occupied
            }
        }
    }

    /// The occupant of one cell, if any.
    pub fn agent_at(&self, position: (i32, i32)) -> Option<AgentId> {
        self.agent_layer[cell(position)]
    }

    pub fn substrate(&self, name: &str) -> Option<&Lattice2DField> {
        self.substrates.iter().find(|f| f.name() == name)
    }

    pub fn substrate_mut(&mut self, name: &str) -> Option<&mut Lattice2DField> {
        self.substrates.iter_mut().find(|f| f.name() == name)
    }

    // ── Displacement ──────────────────────────────────────────────────────

    /// Metropolis sweep: every agent, in fresh random order, may attempt one
    /// move to a von Neumann neighbor with probability `motility·dt/dx`.
    fn displacement_trials(
        &mut self,
        dt: Millis,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()> {
        if arena.is_empty() {
            return Ok(());
        }
        let mut ids = arena.ids();
        ctx.rng.shuffle(&mut ids);

        // Scratch state for the trial kernels, indexed by permutation slot.
        let count = ids.len();
        let mut positions: Vec<Pos> = Vec::with_capacity(count);
        let mut probabilities: Vec<f64> = Vec::with_capacity(count);
        let mut affinities: Vec<f64> = Vec::with_capacity(count);
        for &id in &ids {
            let agent = arena.get(id).ok_or(SpaceError::MissingAttribute {
                agent: id,
                attribute: keys::POSITION,
            })?;
            let position = agent.pair_attr(keys::POSITION).ok_or(
                SpaceError::MissingAttribute {
                    agent: id,
                    attribute: keys::POSITION,
                },
            )?;
            positions.push([position.0, position.1]);
            let motility = agent.float_attr(keys::MOTILITY).unwrap_or(0.0);
            probabilities.push(motility * dt.as_f64() / self.dx);
            affinities.push(agent.float_attr(keys::BINDING_AFFINITY).unwrap_or(0.0));
        }

        let mut occupancy = Array2::from_elem(self.dimensions, -1_i32);
        for (i, pos) in positions.iter().enumerate() {
            occupancy[(pos[0] as usize, pos[1] as usize)] = i as i32;
        }
        let mut moved = vec![false; count];

        for i in 0..count {
            if ctx.rng.random::<f64>() < probabilities[i] {
                displacement_trial(
                    i,
                    &mut positions,
                    &affinities,
                    &mut occupancy,
                    &mut moved,
                    ctx.rng,
                );
            }
        }

        // Write accepted moves back to the layer and position attributes.
        // Chained moves (B vacating the cell A moved into) resolve through
        // the swap because each mover's attribute still holds its pre-apply
        // cell.
        for (i, &id) in ids.iter().enumerate() {
            if !moved[i] {
                continue;
            }
            let new_pos = (positions[i][0], positions[i][1]);
            let old_pos = arena
                .get(id)
                .and_then(|a| a.pair_attr(keys::POSITION))
                .ok_or(SpaceError::MissingAttribute {
                    agent: id,
                    attribute: keys::POSITION,
                })?;
            let displaced = self.agent_layer[cell(new_pos)];
            self.agent_layer[cell(new_pos)] = Some(id);
            self.agent_layer[cell(old_pos)] = displaced;
            if let Some(other) = displaced {
                if let Some(other_agent) = arena.get_mut(other) {
                    other_agent.set_attribute(keys::POSITION, old_pos);
                }
            }
            if let Some(agent) = arena.get_mut(id) {
                agent.set_attribute(keys::POSITION, new_pos);
            }
        }
        Ok(())
    }

    // ── Division ──────────────────────────────────────────────────────────

    fn division_trials(
        &mut self,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()> {
        let mut ids = arena.ids();
        ctx.rng.shuffle(&mut ids);
        for id in ids {
            let pending = arena
                .get(id)
                .map(|a| a.bool_attr(keys::DIVISION_PENDING).unwrap_or(false))
                .unwrap_or(false);
            if pending {
                self.perform_division(id, arena, ctx)?;
            }
        }
        Ok(())
    }

    /// Place a daughter at the nearest empty cell within the mother's
    /// displacement limit, pushing intermediate agents one step outward
    /// along the Bresenham path.  If no empty cell is reachable the flag is
    /// left pending for a later tick.
    fn perform_division(
        &mut self,
        id: AgentId,
        arena: &mut AgentArena,
        ctx: &mut TickCtx<'_>,
    ) -> SpaceResult<()> {
        let mother = arena.get(id).ok_or(SpaceError::MissingAttribute {
            agent: id,
            attribute: keys::POSITION,
        })?;
        let position = mother.pair_attr(keys::POSITION).ok_or(
            SpaceError::MissingAttribute {
                agent: id,
                attribute: keys::POSITION,
            },
        )?;
        let limit = mother.int_attr(keys::DISPLACEMENT_LIMIT).unwrap_or(1);

        let occupied = self.agent_layer.mapv(|c| c.is_some());
        let Some((min_distance, sites)) =
            nearest_empty_sites(&occupied, [position.0, position.1])
        else {
            return Ok(());
        };
        if min_distance > limit as f64 {
            return Ok(());
        }

        let target = sites[ctx.rng.gen_range(0..sites.len())];
        let path = bresenham([position.0, position.1], target);

        // Push occupants outward, farthest first, so each step lands on the
        // cell just vacated (or the empty target itself).
        if path.len() > 2 {
            for i in (1..=path.len() - 2).rev() {
                let from = (path[i][0], path[i][1]);
                let to = (path[i + 1][0], path[i + 1][1]);
                let Some(pushed) = self.agent_layer[cell(from)] else {
                    continue;
                };
                self.agent_layer[cell(to)] = Some(pushed);
                if let Some(agent) = arena.get_mut(pushed) {
                    agent.set_attribute(keys::POSITION, to);
                }
            }
        }

        let clone_position = (path[1][0], path[1][1]);
        self.agent_layer[cell(clone_position)] = None;

        let mother = arena.get_mut(id).ok_or(SpaceError::MissingAttribute {
            agent: id,
            attribute: keys::POSITION,
        })?;
        mother.set_attribute(keys::DIVISION_PENDING, false);
        mother.set_attribute(keys::DIVISION_COMPLETED, true);
        let mut daughter = mother.clone_with(ctx.ids);
        daughter.set_attribute(keys::POSITION, clone_position);
        let daughter_id = daughter.id();
        arena.push(daughter);
        self.agent_layer[cell(clone_position)] = Some(daughter_id);
        Ok(())
    }

    // ── Removal ───────────────────────────────────────────────────────────

    fn removal_trials(&mut self, arena: &mut AgentArena, ctx: &mut TickCtx<'_>) -> SpaceResult<()> {
        let mut ids = arena.ids();
        ctx.rng.shuffle(&mut ids);
        for id in ids {
            let pending = arena
                .get(id)
                .map(|a| a.bool_attr(keys::REMOVE_PENDING).unwrap_or(false))
                .unwrap_or(false);
            if !pending {
                continue;
            }
            if let Some(agent) = arena.remove(id) {
                if let Some(position) = agent.pair_attr(keys::POSITION) {
                    self.agent_layer[cell(position)] = None;
                }
            }
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

impl Space for Lattice2DSpace {
    fn add_agent(
        &mut self,
        agent: &mut Agent,
        params: &Params,
        arena: &AgentArena,
    ) -> SpaceResult<()> {
        let position = params
            .get(keys::POSITION)
            .and_then(|v| v.as_pair())
            .or_else(|| agent.pair_attr(keys::POSITION))
            .ok_or(SpaceError::MissingPosition)?;
        if !self.is_valid_position(position) {
            return Err(SpaceError::OutOfBounds { position });
        }
        if !self.is_empty_position(position) {
            return Err(SpaceError::PositionOccupied { position });
        }

        let volume = params
            .get(keys::VOLUME)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0);
        if self.get_remaining_volume(position, arena) < volume {
            log::warn!(
                "agent volume {volume:.1} exceeds the cell volume of the lattice \
                 ({:.1} µm²); overlap recorded",
                self.dx * self.dx
            );
        }

        self.agent_layer[cell(position)] = Some(agent.id());

        agent.set_default(keys::DIVISION_PENDING, false);
        agent.set_default(keys::DIVISION_COMPLETED, false);
        agent.set_default(keys::REMOVE_PENDING, false);
        agent.set_default(keys::VOLUME, volume);
        agent.set_default(keys::POSITION, position);
        let motility = params
            .get(keys::MOTILITY)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0);
        agent.set_default(keys::MOTILITY, motility);
        let affinity = params
            .get(keys::BINDING_AFFINITY)
            .and_then(|v| v.as_float())
            .unwrap_or(0.0);
        agent.set_default(keys::BINDING_AFFINITY, affinity);
        let limit = params
            .get(keys::DISPLACEMENT_LIMIT)
            .and_then(|v| v.as_int())
            .unwrap_or(1);
        agent.set_default(keys::DISPLACEMENT_LIMIT, limit);
        Ok(())
    }

    fn remove_agent(&mut self, agent: &Agent, _arena: &AgentArena) -> SpaceResult<()> {
        if let Some(position) = agent.pair_attr(keys::POSITION) {
            self.agent_layer[cell(position)] = None;
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
        self.substrates.push(Lattice2DField::new(
            name,
            self.dimensions,
            self.dx,
            diffusion,
            decay,
            kinetics,
        ));
        Ok(())
    }

    fn add_static_node(&mut self, substrate: &str, node: StaticNode) -> SpaceResult<()> {
        let position = node.position.ok_or(SpaceError::MissingPosition)?;
        if !self.is_valid_position(position) {
            return Err(SpaceError::OutOfBounds { position });
        }
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
            let elapsed = self.agent_clock.elapsed();
            self.displacement_trials(elapsed, arena, ctx)?;
            self.division_trials(arena, ctx)?;
            self.removal_trials(arena, ctx)?;

            for field in &mut self.substrates {
                field.clear_dynamic_nodes();
            }
            self.register_dynamic_nodes(arena)?;
            self.agent_clock.reset();
        }
        self.agent_clock.increase(dt);

        if self.substrate_clock.due() {
            let elapsed = self.substrate_clock.elapsed();
            for field in &mut self.substrates {
                field.update(elapsed, arena)?;
            }
            self.substrate_clock.reset();
        }
        self.substrate_clock.increase(dt);
        Ok(())
    }

    fn snapshot_state(&self) -> SpaceState {
        SpaceState::Lattice2D(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[inline]
fn cell(position: (i32, i32)) -> (usize, usize) {
    (position.0 as usize, position.1 as usize)
}
