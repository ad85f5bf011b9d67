//! Grid substrate field for the 2D lattice space.

use ndarray::Array2;

use cps_agent::{keys, AgentArena};
use cps_core::{AgentId, Millis, NodeKind};

use crate::error::{SubstrateError, SubstrateResult};
use crate::node::{flux_exchange, StaticNode};
use crate::solver::diffusion_decay_lod;
use crate::DecayKinetics;

/// An `Nx×Ny` concentration grid with lattice spacing `dx` (µm).
///
/// Each field cell has volume `dx²`; a node couples to the cell under its
/// position.  Diffusion–decay runs as an operator-split LOD step (see
/// [`crate::solver`]); small negative excursions from the discretization are
/// clamped to zero after the step.
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Lattice2DField {
    name: String,
    diffusion: f64,
    decay: f64,
    kinetics: DecayKinetics,
    dx: f64,
    concentration: Array2<f64>,
    static_nodes: Vec<StaticNode>,
    dynamic_nodes: Vec<AgentId>,
}

impl Lattice2DField {
    pub fn new(
        name: &str,
        dimensions: (usize, usize),
        dx: f64,
        diffusion: f64,
        decay: f64,
        kinetics: DecayKinetics,
    ) -> Self {
        Self {
            name: name.to_string(),
            diffusion,
            decay,
            kinetics,
            dx,
            concentration: Array2::zeros(dimensions),
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

    /// Concentration at one lattice cell.
    pub fn concentration_at(&self, position: (i32, i32)) -> f64 {
        self.concentration[(position.0 as usize, position.1 as usize)]
    }

    pub fn concentration(&self) -> &Array2<f64> {
        &self.concentration
    }

    pub fn concentration_mut(&mut self) -> &mut Array2<f64> {
        &mut self.concentration
    }

    pub fn add_static_node(&mut self, node: StaticNode) {
        debug_assert!(node.position.is_some(), "lattice nodes need a position");
        self.static_nodes.push(node);
    }

    pub fn add_dynamic_node(&mut self, agent: AgentId) {
        self.dynamic_nodes.push(agent);
    }

    pub fn clear_dynamic_nodes(&mut self) {
        self.dynamic_nodes.clear();
    }

    /// One field step: node coupling, then the LOD diffusion–decay sweep.
    pub fn update(&mut self, dt: Millis, arena: &mut AgentArena) -> SubstrateResult<()> {
        self.update_nodes(dt, arena)?;
        self.diffusion_decay(dt);
        Ok(())
    }

    fn update_nodes(&mut self, dt: Millis, arena: &mut AgentArena) -> SubstrateResult<()> {
        let dt = dt.as_f64();
        let cell_volume = self.dx * self.dx;

        for node in &mut self.static_nodes {
            let Some((x, y)) = node.position else {
                continue;
            };
            let cell = (x as usize, y as usize);
            match node.info.kind {
                NodeKind::Flux => {
                    let (c_n, c_f) = flux_exchange(
                        &node.info,
                        node.volume,
                        self.concentration[cell],
                        cell_volume,
                        dt,
                    );
                    node.info.concentration = c_n;
                    self.concentration[cell] = c_f;
                }
                NodeKind::Fixed => {
                    self.concentration[cell] = node.info.concentration;
                }
            }
        }

        let dynamic = std::mem::take(&mut self.dynamic_nodes);
        for &agent_id in &dynamic {
            let Some(agent) = arena.get_mut(agent_id) else {
                continue;
            };
            let position = agent.pair_attr(keys::POSITION).ok_or(
                SubstrateError::MissingAttribute {
                    agent: agent_id,
                    attribute: keys::POSITION,
                },
            )?;
            let volume = agent.float_attr(keys::VOLUME).ok_or(
                SubstrateError::MissingAttribute {
                    agent: agent_id,
                    attribute: keys::VOLUME,
                },
            )?;
            let cell = (position.0 as usize, position.1 as usize);
            let Some(info) = agent
                .substrates_mut()
                .and_then(|m| m.get_mut(self.name.as_str()))
            else {
                continue;
            };
            match info.kind {
                NodeKind::Flux => {
                    let (c_n, c_f) =
                        flux_exchange(info, volume, self.concentration[cell], cell_volume, dt);
                    info.concentration = c_n;
                    self.concentration[cell] = c_f;
                }
                NodeKind::Fixed => {
                    self.concentration[cell] = info.concentration;
                }
            }
        }
        self.dynamic_nodes = dynamic;
        Ok(())
    }

    fn diffusion_decay(&mut self, dt: Millis) {
        match self.kinetics {
            DecayKinetics::FirstOrder => {
                diffusion_decay_lod(
                    &mut self.concentration,
                    self.diffusion,
                    self.decay,
                    dt.as_f64(),
                    self.dx,
                );
            }
        }
        self.concentration.mapv_inplace(|c| c.max(0.0));
    }
}
