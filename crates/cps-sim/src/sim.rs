//! The `Simulation` struct and its run loop.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use cps_agent::{Agent, AgentArena, IdSource, Params};
use cps_core::{AgentId, Millis, SimRng, TimeSpan, TimeUnit, UpdateClock};
use cps_model::Model;
use cps_space::{Space, SpaceState, TickCtx};

use crate::error::{SimError, SimResult};
use crate::event::Event;
use crate::snapshot::{write_history, Snapshot};

/// Seed used when none is set explicitly; runs are reproducible either way.
const DEFAULT_SEED: u64 = 0;

/// How often the accumulated history is flushed to `<id>.lsd`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SaveMode {
    /// Rewrite the file after every snapshot.
    #[default]
    Always,
    /// Write once, after the final iteration.
    OnCompletion,
}

/// Optional knobs for [`Simulation::run`].
pub struct RunOptions {
    /// Snapshot interval; `None` disables history recording.
    pub dt_history: Option<TimeSpan>,
    pub save_mode: SaveMode,
    /// `0` silent, `1` progress bar.
    pub verbosity: u8,
    /// Directory receiving `<id>.lsd`; the working directory when `None`.
    pub history_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dt_history: None,
            save_mode: SaveMode::Always,
            verbosity: 0,
            history_dir: None,
        }
    }
}

/// A simulation instance: global time, the agent population, an optional
/// space, and the registered models and events.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = Simulation::new(None);
/// sim.add_space(Box::new(HomogeneousSpace::new(100.0, None, None)))?;
/// sim.add_model(Box::new(FixedIncrementCellCycleModel::new(None, CycleLengthDistribution::Fixed)))?;
/// sim.add_agent(Agent::new(), Params::new()
///     .with("volume", 1.0)
///     .with("cellcycle_mean_length", TimeSpan::new(18.0, TimeUnit::Hour)))?;
/// sim.run((3.0, TimeUnit::Day), (1.0, TimeUnit::Min), RunOptions::default())?;
/// ```
pub struct Simulation {
    id: String,
    time: Millis,
    agents: AgentArena,
    space: Option<Box<dyn Space>>,
    events: Vec<Event>,
    models: Vec<Box<dyn Model>>,
    history: Vec<Vec<u8>>,
    rng: SimRng,
    ids: IdSource,
}

impl Simulation {
    /// Create a simulation; a v4 UUID is generated when `id` is `None`.
    pub fn new(id: Option<&str>) -> Self {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self {
            id,
            time: Millis::ZERO,
            agents: AgentArena::new(),
            space: None,
            events: Vec::new(),
            models: Vec::new(),
            history: Vec::new(),
            rng: SimRng::new(DEFAULT_SEED),
            ids: IdSource::new(),
        }
    }

    /// Reseed the RNG stream.  Call before `run` for reproducible runs with
    /// a chosen seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = SimRng::new(seed);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Elapsed simulated time in milliseconds.
    pub fn time(&self) -> Millis {
        self.time
    }

    /// The ordered agent population.
    pub fn agents(&self) -> &AgentArena {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut AgentArena {
        &mut self.agents
    }

    pub fn space(&self) -> Option<&dyn Space> {
        self.space.as_deref()
    }

    pub fn space_mut(&mut self) -> Option<&mut (dyn Space + '_)> {
        match self.space.as_mut() {
            Some(boxed) => Some(boxed.as_mut()),
            None => None,
        }
    }

    /// Snapshot blobs accumulated so far.
    pub fn history(&self) -> &[Vec<u8>] {
        &self.history
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Install the space.  At most one space per simulation.
    pub fn add_space(&mut self, space: Box<dyn Space>) -> SimResult<()> {
        if self.space.is_some() {
            return Err(SimError::SpaceAlreadyInstalled);
        }
        self.space = Some(space);
        Ok(())
    }

    /// Register a model.  Agents already present are initialized immediately
    /// (with empty parameters), so every model has initialized every agent
    /// exactly once regardless of registration order.
    pub fn add_model(&mut self, model: Box<dyn Model>) -> SimResult<()> {
        for agent in self.agents.iter_mut() {
            model.initialize_attributes(agent, &Params::new(), &mut self.rng)?;
        }
        self.models.push(model);
        Ok(())
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Attach an agent: assign its id, place it in the space, run every
    /// model's attribute initialization, then store unclaimed parameters as
    /// attributes.  Without a space the agent is still accepted into the
    /// population, with a warning.
    pub fn add_agent(&mut self, mut agent: Agent, params: Params) -> SimResult<AgentId> {
        agent.assign_id(&mut self.ids);
        match &mut self.space {
            Some(space) => space.add_agent(&mut agent, &params, &self.agents)?,
            None => log::warn!(
                "no simulation space has been defined; the agent is kept in the \
                 population but has no placement"
            ),
        }
        for model in &self.models {
            model.initialize_attributes(&mut agent, &params, &mut self.rng)?;
        }
        for (name, value) in params.iter() {
            if !agent.has_attribute(name) {
                agent.set_attribute(name, value.clone());
            }
        }
        Ok(self.agents.push(agent))
    }

    /// Detach an agent from the population and its space placement.
    pub fn remove_agent(&mut self, id: AgentId) -> SimResult<()> {
        let agent = self.agents.remove(id).ok_or(SimError::AgentNotFound(id))?;
        if let Some(space) = &mut self.space {
            space.remove_agent(&agent, &self.agents)?;
        }
        Ok(())
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run for `time` with a fixed step `dt`.
    ///
    /// The loop executes `⌈time/dt⌉ + 1` iterations — one per grid point of
    /// the closed interval `[0, ⌈time/dt⌉·dt]` — so the final `time()` lands
    /// on the last grid point, and both endpoints are processed.
    pub fn run(
        &mut self,
        time: impl Into<TimeSpan>,
        dt: impl Into<TimeSpan>,
        options: RunOptions,
    ) -> SimResult<()> {
        let time_ms = time.into().to_millis();
        let dt_ms = dt.into().to_millis();
        if dt_ms == Millis::ZERO {
            return Err(SimError::Config("dt must be a positive duration".into()));
        }
        let steps = time_ms.0.div_ceil(dt_ms.0) + 1;

        let mut history_clock = options.dt_history.map(|interval| {
            UpdateClock::new(Some(interval))
        });
        if history_clock.is_some() {
            self.make_history_entry(&options)?;
        }

        let progress = (options.verbosity == 1).then(|| {
            let bar = ProgressBar::new(steps);
            let style = ProgressStyle::with_template(
                "{msg} {bar:40} {pos}/{len} [{elapsed_precise}<{eta_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        });

        for step in 0..steps {
            self.dispatch_events();
            self.update_models(dt_ms)?;

            if let Some(space) = &mut self.space {
                let mut ctx = TickCtx {
                    rng: &mut self.rng,
                    ids: &mut self.ids,
                };
                space.update(dt_ms, &mut self.agents, &mut ctx)?;
            }

            if let Some(clock) = &mut history_clock {
                if clock.due() {
                    clock.reset();
                    self.make_history_entry(&options)?;
                }
                clock.increase(dt_ms);
            }

            if let Some(bar) = &progress {
                if step % 100 == 0 {
                    bar.set_message(format!(
                        "id={} T={:.2}d N={}",
                        self.id,
                        self.time.in_unit(TimeUnit::Day),
                        self.agents.len()
                    ));
                    bar.set_position(step);
                }
            }

            // The final iteration processes the last grid point; advancing
            // past it would overshoot the requested duration.
            if step + 1 < steps {
                self.time += dt_ms;
            }
        }

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }
        if options.save_mode == SaveMode::OnCompletion && !self.history.is_empty() {
            self.save_history(&options)?;
        }
        Ok(())
    }

    fn dispatch_events(&mut self) {
        let now = self.time;
        let mut due = Vec::new();
        let mut pending = Vec::new();
        for event in std::mem::take(&mut self.events) {
            if event.is_ready(now) {
                due.push(event);
            } else {
                pending.push(event);
            }
        }
        // Events registered by handlers land in `self.events` and are
        // considered from the next tick on.
        self.events = pending;
        for event in due {
            event.execute(self);
        }
    }

    fn update_models(&mut self, dt: Millis) -> SimResult<()> {
        for model in &mut self.models {
            if model.clock().due() {
                for agent in self.agents.iter_mut() {
                    model.update_attributes(agent, &mut self.rng)?;
                }
                model.clock_mut().reset();
            }
            model.clock_mut().increase(dt);
        }
        Ok(())
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Capture the current state as a snapshot blob.
    pub fn snapshot(&self) -> SimResult<Vec<u8>> {
        let snapshot = Snapshot {
            id: self.id.clone(),
            time: self.time,
            agents: self.agents.as_slice().to_vec(),
            space: self.space.as_ref().map(|s| s.snapshot_state()),
        };
        snapshot.encode()
    }

    /// Rebuild a simulation from a snapshot blob.  Events, models, and
    /// history come back empty; the id allocator resumes past the largest
    /// restored agent id.
    pub fn restore(blob: &[u8]) -> SimResult<Simulation> {
        let snapshot = Snapshot::decode(blob)?;
        let mut ids = IdSource::new();
        let mut agents = AgentArena::new();
        for agent in snapshot.agents {
            ids.advance_past(agent.id());
            agents.push(agent);
        }
        Ok(Simulation {
            id: snapshot.id,
            time: snapshot.time,
            agents,
            space: snapshot.space.map(SpaceState::into_space),
            events: Vec::new(),
            models: Vec::new(),
            history: Vec::new(),
            rng: SimRng::new(DEFAULT_SEED),
            ids,
        })
    }

    /// The history file this simulation writes: `<dir>/<id>.lsd`.
    pub fn history_path(&self, dir: Option<&Path>) -> PathBuf {
        let file = format!("{}.lsd", self.id);
        match dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }

    fn make_history_entry(&mut self, options: &RunOptions) -> SimResult<()> {
        let blob = self.snapshot()?;
        self.history.push(blob);
        if options.save_mode == SaveMode::Always {
            self.save_history(options)?;
        }
        Ok(())
    }

    fn save_history(&self, options: &RunOptions) -> SimResult<()> {
        let path = self.history_path(options.history_dir.as_deref());
        write_history(&path, &self.history)
    }
}
