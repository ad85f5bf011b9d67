//! Guarded stochastic attribute transition.
//!
//! While the `condition` attribute holds its trigger value, each due update
//! applies all `end_states` assignments with probability `1 − exp(−rate·dt)`.
//! Useful for phenotype switches such as `alive → quiescent` under hypoxia.

use cps_agent::{Agent, AttrValue, Params};
use cps_core::{SimRng, TimeSpan, TimeUnit, UpdateClock};

use crate::error::ModelResult;
use crate::model::Model;

pub struct StochasticTransitionModel {
    clock: UpdateClock,
    condition: (String, AttrValue),
    end_states: Vec<(String, AttrValue)>,
    rate_per_ms: f64,
}

impl StochasticTransitionModel {
    /// `rate` is given per day and converted internally.
    pub fn new(
        update_interval: Option<TimeSpan>,
        condition: (&str, AttrValue),
        end_states: Vec<(String, AttrValue)>,
        rate_per_day: f64,
    ) -> Self {
        Self {
            clock: UpdateClock::new(update_interval),
            condition: (condition.0.to_string(), condition.1),
            end_states,
            rate_per_ms: rate_per_day / TimeUnit::Day.in_millis() as f64,
        }
    }
}

impl Model for StochasticTransitionModel {
    fn clock(&self) -> &UpdateClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut UpdateClock {
        &mut self.clock
    }

    fn initialize_attributes(
        &self,
        _agent: &mut Agent,
        _params: &Params,
        _rng: &mut SimRng,
    ) -> ModelResult<()> {
        Ok(())
    }

    fn update_attributes(&self, agent: &mut Agent, rng: &mut SimRng) -> ModelResult<()> {
        if agent.get(&self.condition.0) != Some(&self.condition.1) {
            return Ok(());
        }
        let probability = 1.0 - (-self.rate_per_ms * self.clock.elapsed().as_f64()).exp();
        if rng.random::<f64>() < probability {
            for (name, value) in &self.end_states {
                agent.set_attribute(name, value.clone());
            }
        }
        Ok(())
    }
}
