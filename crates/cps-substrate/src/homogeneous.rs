//! Scalar substrate field for a well-mixed compartment.

use cps_agent::{keys, AgentArena};
use cps_core::{AgentId, Millis, NodeKind};

use crate::error::{SubstrateError, SubstrateResult};
use crate::node::{flux_exchange, StaticNode};
use crate::DecayKinetics;

/// A single concentration shared by the whole compartment.
///
/// The diffusion coefficient is carried for API symmetry with the lattice
/// field but has no effect in a perfectly mixed volume; decay is exact
/// exponential.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HomogeneousField {
    name: String,
    diffusion: f64,
    decay: f64,
    kinetics: DecayKinetics,
    concentration: f64,
    static_nodes: Vec<StaticNode>,
    dynamic_nodes: Vec<AgentId>,
}

impl HomogeneousField {
    pub fn new(name: &str, diffusion: f64, decay: f64, kinetics: DecayKinetics) -> Self {
        Self {
            name: name.to_string(),
            diffusion,
            decay,
            kinetics,
            concentration: 0.0,
            static_nodes: Vec::new(),
            dynamic_nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn set_concentration(&mut self, value: f64) {
        self.concentration = value;
    }

    pub fn add_static_node(&mut self, node: StaticNode) {
        self.static_nodes.push(node);
    }

    pub fn add_dynamic_node(&mut self, agent: AgentId) {
        self.dynamic_nodes.push(agent);
    }

    pub fn clear_dynamic_nodes(&mut self) {
        self.dynamic_nodes.clear();
    }

    /// One field step: node coupling, then decay.
    ///
    /// `field_volume` is the hosting compartment's total volume (the `v_f`
    /// of the flux exchange).
    pub fn update(
        &mut self,
        dt: Millis,
        field_volume: f64,
        arena: &mut AgentArena,
    ) -> SubstrateResult<()> {
        self.update_nodes(dt, field_volume, arena)?;
        self.decay_step(dt);
        Ok(())
    }

    fn update_nodes(
        &mut self,
        dt: Millis,
        field_volume: f64,
        arena: &mut AgentArena,
    ) -> SubstrateResult<()> {
        let dt = dt.as_f64();
        let mut fixed_sum = 0.0;
        let mut fixed_count = 0u32;

        // Static nodes first, then this tick's dynamic registrations.
        for node in &mut self.static_nodes {
            match node.info.kind {
                NodeKind::Flux => {
                    let (c_n, c_f) = flux_exchange(
                        &node.info,
                        node.volume,
                        self.concentration,
                        field_volume,
                        dt,
                    );
                    node.info.concentration = c_n;
                    self.concentration = c_f;
                }
                NodeKind::Fixed => {
                    fixed_sum += node.info.concentration;
                    fixed_count += 1;
                }
            }
        }

        let dynamic = std::mem::take(&mut self.dynamic_nodes);
        for &agent_id in &dynamic {
            let Some(agent) = arena.get_mut(agent_id) else {
                continue;
            };
            let volume = agent.float_attr(keys::VOLUME).ok_or(
                SubstrateError::MissingAttribute {
                    agent: agent_id,
                    attribute: keys::VOLUME,
                },
            )?;
            let Some(info) = agent
                .substrates_mut()
                .and_then(|m| m.get_mut(self.name.as_str()))
            else {
                continue;
            };
            match info.kind {
                NodeKind::Flux => {
                    let (c_n, c_f) =
                        flux_exchange(info, volume, self.concentration, field_volume, dt);
                    info.concentration = c_n;
                    self.concentration = c_f;
                }
                NodeKind::Fixed => {
                    fixed_sum += info.concentration;
                    fixed_count += 1;
                }
            }
        }
        self.dynamic_nodes = dynamic;

        if fixed_count > 0 {
            self.concentration = fixed_sum / fixed_count as f64;
        }
        Ok(())
    }

    fn decay_step(&mut self, dt: Millis) {
        match self.kinetics {
            DecayKinetics::FirstOrder => {
                self.concentration *= (-self.decay * dt.as_f64()).exp();
            }
        }
    }
}
