//! One-shot timed callbacks.

use cps_agent::Params;
use cps_core::{Millis, TimeSpan};

use crate::sim::Simulation;

/// Handler invoked with the simulation and the event's own parameters.
pub type EventHandler = Box<dyn FnMut(&mut Simulation, &Params)>;

/// A callback executed once, at the first tick whose time has reached the
/// event's due time.  Events due on the same tick run in insertion order,
/// and an executed event is removed from the queue.
pub struct Event {
    due: Millis,
    handler: EventHandler,
    params: Params,
}

impl Event {
    pub fn new(
        due: impl Into<TimeSpan>,
        handler: impl FnMut(&mut Simulation, &Params) + 'static,
        params: Params,
    ) -> Self {
        Self {
            due: due.into().to_millis(),
            handler: Box::new(handler),
            params,
        }
    }

    /// Due at or before `now`.
    pub fn is_ready(&self, now: Millis) -> bool {
        self.due <= now
    }

    pub(crate) fn execute(mut self, simulation: &mut Simulation) {
        (self.handler)(simulation, &self.params);
    }
}
