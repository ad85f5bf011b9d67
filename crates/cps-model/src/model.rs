//! The `Model` trait — the main extension point for user code.

use cps_agent::{Agent, Params};
use cps_core::{SimRng, UpdateClock};

use crate::ModelResult;

/// Pluggable per-agent model.
///
/// Implementations own their [`UpdateClock`]; the scheduler advances it by
/// the global `dt` each tick and calls [`update_attributes`][Self::update_attributes]
/// for every agent whenever it is due.  A model therefore observes time as
/// the clock's accumulated `elapsed()` — the span since its own last update,
/// not the global `dt`.
///
/// # Contract
///
/// - `initialize_attributes` must be idempotent: create every attribute the
///   model reads, without clobbering values that already exist (use
///   [`Agent::set_default`]).  It may consume named creation parameters.
/// - `update_attributes` mutates agent attributes only.
/// - `reset_attributes` is invoked by the model itself — canonically when it
///   observes `division_completed` — and re-derives per-agent state.
///
/// # Example
///
/// ```rust,ignore
/// struct AgeCounter { clock: UpdateClock }
///
/// impl Model for AgeCounter {
///     fn clock(&self) -> &UpdateClock { &self.clock }
///     fn clock_mut(&mut self) -> &mut UpdateClock { &mut self.clock }
///
///     fn initialize_attributes(&self, agent: &mut Agent, _: &Params, _: &mut SimRng) -> ModelResult<()> {
///         agent.set_default("age_ms", 0.0);
///         Ok(())
///     }
///
///     fn update_attributes(&self, agent: &mut Agent, _: &mut SimRng) -> ModelResult<()> {
///         let age = agent.float_attr("age_ms").unwrap_or(0.0);
///         agent.set_attribute("age_ms", age + self.clock().elapsed().as_f64());
///         Ok(())
///     }
/// }
/// ```
pub trait Model {
    /// The model's interval timer, driven by the scheduler.
    fn clock(&self) -> &UpdateClock;

    fn clock_mut(&mut self) -> &mut UpdateClock;

    /// Create the attributes this model reads on a newly attached agent.
    fn initialize_attributes(
        &self,
        agent: &mut Agent,
        params: &Params,
        rng: &mut SimRng,
    ) -> ModelResult<()>;

    /// Advance the agent by the clock's elapsed time.
    fn update_attributes(&self, agent: &mut Agent, rng: &mut SimRng) -> ModelResult<()>;

    /// Re-derive per-agent state, e.g. after a completed division.
    fn reset_attributes(&self, _agent: &mut Agent, _rng: &mut SimRng) -> ModelResult<()> {
        Ok(())
    }
}
