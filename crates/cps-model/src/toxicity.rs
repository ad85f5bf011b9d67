//! Concentration-dependent toxicity.
//!
//! Hazard follows Michaelis–Menten saturation of the agent's own node
//! concentration of the target substrate:
//!
//!   rate = vmax · C / (ed50 + C)        p(death in dt) = 1 − exp(−rate·dt)
//!
//! A killed agent turns `necrotic`: the cell cycle stops, any pending
//! division is cancelled, and it no longer moves or binds.

use cps_agent::{keys, Agent, Params};
use cps_core::{SimRng, TimeSpan, TimeUnit, UpdateClock};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

pub struct ConcentrationDependentToxicityModel {
    clock: UpdateClock,
    substrate: String,
    max_rate_per_ms: f64,
    ed50: f64,
}

impl ConcentrationDependentToxicityModel {
    /// `max_rate` is given per day and converted internally.
    pub fn new(
        update_interval: Option<TimeSpan>,
        substrate: &str,
        max_rate_per_day: f64,
        median_effective_concentration: f64,
    ) -> Self {
        Self {
            clock: UpdateClock::new(update_interval),
            substrate: substrate.to_string(),
            max_rate_per_ms: max_rate_per_day / TimeUnit::Day.in_millis() as f64,
            ed50: median_effective_concentration,
        }
    }

    fn saturating_rate(&self, concentration: f64) -> f64 {
        self.max_rate_per_ms * concentration / (self.ed50 + concentration)
    }
}

impl Model for ConcentrationDependentToxicityModel {
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
        _rng: &mut SimRng,
    ) -> ModelResult<()> {
        if agent.has_attribute(keys::SUBSTRATE_INFO) {
            return Ok(());
        }
        if let Some(map) = params
            .get(keys::SUBSTRATE_INFO)
            .and_then(|v| v.as_substrates())
        {
            agent.set_attribute(keys::SUBSTRATE_INFO, map.clone());
            return Ok(());
        }
        Err(ModelError::MissingAttribute(keys::SUBSTRATE_INFO))
    }

    fn update_attributes(&self, agent: &mut Agent, rng: &mut SimRng) -> ModelResult<()> {
        let concentration = agent
            .substrates()
            .and_then(|m| m.get(self.substrate.as_str()))
            .map(|info| info.concentration)
            .ok_or_else(|| ModelError::MissingSubstrate(self.substrate.clone()))?;

        let rate = self.saturating_rate(concentration);
        let probability = 1.0 - (-rate * self.clock.elapsed().as_f64()).exp();
        if rng.random::<f64>() < probability {
            agent.set_attribute(keys::STATE, "necrotic");
            agent.set_attribute(keys::CELLCYCLE_IS_ACTIVE, false);
            agent.set_attribute(keys::DIVISION_PENDING, false);
            agent.set_attribute(keys::MOTILITY, 0.0);
            agent.set_attribute(keys::BINDING_AFFINITY, 0.0);
        }
        Ok(())
    }
}
