//! A model that never touches an agent.  Placeholder for wiring tests.

use cps_agent::{Agent, Params};
use cps_core::{SimRng, UpdateClock};

use crate::model::Model;
use crate::ModelResult;

pub struct NoopModel {
    clock: UpdateClock,
}

impl NoopModel {
    pub fn new() -> Self {
        Self {
            clock: UpdateClock::every_tick(),
        }
    }
}

impl Default for NoopModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for NoopModel {
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

    fn update_attributes(&self, _agent: &mut Agent, _rng: &mut SimRng) -> ModelResult<()> {
        Ok(())
    }
}
