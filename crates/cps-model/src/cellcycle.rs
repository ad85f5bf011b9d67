//! Fixed-increment cell cycle.
//!
//! The cycle is a counter against a per-agent length `L` drawn around the
//! agent's `cellcycle_mean_length`.  While `cellcycle_is_active`, each due
//! update adds the clock's elapsed time to `cellcycle_current_time`; once
//! `L ≤ current_time` the model raises `division_pending` and leaves the
//! actual division to the space.  When the space reports
//! `division_completed`, the state is reset and a fresh length drawn — on
//! the mother and, because attributes are cloned, independently on the
//! daughter at her first due update.

use rand_distr::{Distribution, Gamma, Normal};

use cps_agent::{keys, Agent, Params};
use cps_core::{SimRng, TimeSpan, UpdateClock};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// How per-agent cycle lengths are drawn around the mean.
#[derive(Copy, Clone, Debug)]
pub enum CycleLengthDistribution {
    /// Every cycle is exactly the mean length.
    Fixed,
    /// Erlang: gamma with integer `shape` and scale `mean / shape`.
    Erlang { shape: u32 },
    /// Normal with standard deviation `std_ms` around the mean.
    Normal { std_ms: f64 },
}

pub struct FixedIncrementCellCycleModel {
    clock: UpdateClock,
    distribution: CycleLengthDistribution,
}

impl FixedIncrementCellCycleModel {
    pub fn new(
        update_interval: Option<TimeSpan>,
        distribution: CycleLengthDistribution,
    ) -> Self {
        Self {
            clock: UpdateClock::new(update_interval),
            distribution,
        }
    }

    fn generate_length(&self, mean_ms: f64, rng: &mut SimRng) -> f64 {
        match self.distribution {
            CycleLengthDistribution::Fixed => mean_ms,
            CycleLengthDistribution::Erlang { shape } => {
                let scale = mean_ms / shape as f64;
                match Gamma::new(shape as f64, scale) {
                    Ok(gamma) => gamma.sample(rng.inner()),
                    Err(_) => mean_ms,
                }
            }
            CycleLengthDistribution::Normal { std_ms } => match Normal::new(mean_ms, std_ms) {
                Ok(normal) => normal.sample(rng.inner()).max(0.0),
                Err(_) => mean_ms,
            },
        }
    }

    /// The agent's mean length attribute, claiming a creation parameter into
    /// the attribute map if that is where it was supplied.
    fn mean_length_ms(&self, agent: &mut Agent, params: &Params) -> ModelResult<f64> {
        if let Some(span) = agent.time_attr(keys::CELLCYCLE_MEAN_LENGTH) {
            return Ok(span.to_millis().as_f64());
        }
        if let Some(span) = params
            .get(keys::CELLCYCLE_MEAN_LENGTH)
            .and_then(|v| v.as_time())
        {
            agent.set_attribute(keys::CELLCYCLE_MEAN_LENGTH, span);
            return Ok(span.to_millis().as_f64());
        }
        Err(ModelError::MissingAttribute(keys::CELLCYCLE_MEAN_LENGTH))
    }
}

impl Model for FixedIncrementCellCycleModel {
    fn clock(&self) -> &UpdateClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut UpdateClock {
        &mut self.clock
    }

    fn initialize_attributes(
        &self,
        agent: &mut Agent,
        params: &Params,
        rng: &mut SimRng,
    ) -> ModelResult<()> {
        let mean_ms = self.mean_length_ms(agent, params)?;
        if !agent.has_attribute(keys::CELLCYCLE_LENGTH) {
            let length = self.generate_length(mean_ms, rng);
            agent.set_attribute(keys::CELLCYCLE_LENGTH, length);
        }

        let randomize = agent.bool_attr(keys::CELLCYCLE_RANDOM_INITIAL).unwrap_or(false)
            || params
                .get(keys::CELLCYCLE_RANDOM_INITIAL)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
        if randomize && !agent.has_attribute(keys::CELLCYCLE_CURRENT_TIME) {
            let length = agent.float_attr(keys::CELLCYCLE_LENGTH).unwrap_or(mean_ms);
            if length > 0.0 {
                let phase = rng.gen_range(0.0..length);
                agent.set_attribute(keys::CELLCYCLE_CURRENT_TIME, phase);
            }
        }

        agent.set_default(keys::CELLCYCLE_IS_ACTIVE, true);
        agent.set_default(keys::CELLCYCLE_CURRENT_TIME, 0.0);
        agent.set_default(keys::DIVISION_PENDING, false);
        agent.set_default(keys::DIVISION_COMPLETED, false);
        Ok(())
    }

    fn update_attributes(&self, agent: &mut Agent, rng: &mut SimRng) -> ModelResult<()> {
        if agent.bool_attr(keys::DIVISION_COMPLETED).unwrap_or(false) {
            self.reset_attributes(agent, rng)?;
        }
        if agent.bool_attr(keys::CELLCYCLE_IS_ACTIVE).unwrap_or(false) {
            let current = agent
                .float_attr(keys::CELLCYCLE_CURRENT_TIME)
                .ok_or(ModelError::MissingAttribute(keys::CELLCYCLE_CURRENT_TIME))?;
            let updated = current + self.clock.elapsed().as_f64();
            agent.set_attribute(keys::CELLCYCLE_CURRENT_TIME, updated);
            let length = agent
                .float_attr(keys::CELLCYCLE_LENGTH)
                .ok_or(ModelError::MissingAttribute(keys::CELLCYCLE_LENGTH))?;
            if length <= updated {
                agent.set_attribute(keys::DIVISION_PENDING, true);
            }
        }
        Ok(())
    }

    fn reset_attributes(&self, agent: &mut Agent, rng: &mut SimRng) -> ModelResult<()> {
        agent.set_attribute(keys::CELLCYCLE_IS_ACTIVE, true);
        agent.set_attribute(keys::CELLCYCLE_CURRENT_TIME, 0.0);
        agent.set_attribute(keys::DIVISION_PENDING, false);
        agent.set_attribute(keys::DIVISION_COMPLETED, false);
        let mean = agent
            .time_attr(keys::CELLCYCLE_MEAN_LENGTH)
            .ok_or(ModelError::MissingAttribute(keys::CELLCYCLE_MEAN_LENGTH))?;
        let length = self.generate_length(mean.to_millis().as_f64(), rng);
        agent.set_attribute(keys::CELLCYCLE_LENGTH, length);
        Ok(())
    }
}
