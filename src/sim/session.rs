use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use super::context::{InteractionMemory, TickContext};
use super::decision::{self, TickOutcome};
use super::interaction::perform;
use super::{recruitment, setup};
use crate::command::{Command, parse_magnitude};
use crate::config::{EngineConfig, GameConfig, check_dial};
use crate::error::ConfigError;
use crate::model::{
    Action, ActionKind, ActionOutcome, ActionResult, Actor, Dial, FactionId, FactionRegistry,
    InteractionKind, LogEntry, PlayerInteraction, Snapshot,
};
use crate::playback::PlaybackControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Factions can be added, removed and tuned.
    Configuring,
    /// Configuration is frozen; interactions run.
    Running,
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub logs: Vec<LogEntry>,
}

/// One game: the registry, its phase, the RNG, and the journal of every log
/// line produced so far.
///
/// Every command returns the log lines it produced, in order, after the
/// registry has been updated.
pub struct Session<R: RngCore = SmallRng> {
    registry: FactionRegistry,
    phase: Phase,
    rng: R,
    engine: EngineConfig,
    memory: InteractionMemory,
    journal: Vec<LogEntry>,
    playback: Option<PlaybackControl>,
}

impl Session<SmallRng> {
    /// Default two-faction setup, seeded.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Build from a validated configuration. The game is not started yet.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut registry = FactionRegistry::new();
        for setup in &config.factions {
            let id = registry.add_faction(Some(setup.name.clone()));
            if let Some(faction) = registry.get_mut(id) {
                for dial in Dial::ALL {
                    faction.dials.set(dial, setup.dial(dial) as f64);
                }
            }
        }
        Ok(Self::from_registry(registry, rng, false).with_engine(config.engine.clone()))
    }
}

impl<R: RngCore> Session<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::from_registry(FactionRegistry::with_default_factions(), rng, false)
    }

    /// Wrap an existing registry. With `started`, the registry is taken as-is
    /// and no derivation runs.
    pub fn from_registry(registry: FactionRegistry, rng: R, started: bool) -> Self {
        Self {
            registry,
            phase: if started {
                Phase::Running
            } else {
                Phase::Configuring
            },
            rng,
            engine: EngineConfig::default(),
            memory: InteractionMemory::default(),
            journal: Vec::new(),
            playback: None,
        }
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Resetting the session will also invalidate whatever this playback
    /// still has queued.
    pub fn attach_playback(&mut self, control: PlaybackControl) {
        self.playback = Some(control);
    }

    // --- Queries ---

    pub fn registry(&self) -> &FactionRegistry {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn journal(&self) -> &[LogEntry] {
        &self.journal
    }

    pub fn last_player_interaction(&self) -> Option<PlayerInteraction> {
        self.memory.last_player
    }

    pub fn last_initiator(&self) -> Option<FactionId> {
        self.memory.last_initiator
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.registry, self.is_started())
    }

    // --- Configuration ---

    fn ensure_configuring(&self) -> Result<(), ConfigError> {
        match self.phase {
            Phase::Configuring => Ok(()),
            Phase::Running => Err(ConfigError::AlreadyStarted),
        }
    }

    pub fn add_faction(&mut self, name: Option<String>) -> Result<FactionId, ConfigError> {
        self.ensure_configuring()?;
        let id = self.registry.add_faction(name);
        info!(faction = %id, "faction added");
        Ok(id)
    }

    pub fn remove_faction(&mut self, id: FactionId) -> Result<(), ConfigError> {
        self.ensure_configuring()?;
        if !self.registry.contains(id) {
            return Err(ConfigError::UnknownFaction(id));
        }
        if self.registry.len() <= 2 {
            return Err(ConfigError::TooFewFactions(self.registry.len() - 1));
        }
        self.registry.remove(id);
        info!(faction = %id, "faction removed");
        Ok(())
    }

    pub fn set_dial(&mut self, id: FactionId, dial: Dial, value: u8) -> Result<(), ConfigError> {
        self.ensure_configuring()?;
        check_dial(dial, i64::from(value))?;
        let faction = self
            .registry
            .get_mut(id)
            .ok_or(ConfigError::UnknownFaction(id))?;
        faction.dials.set(dial, f64::from(value));
        info!(faction = %id, %dial, value, "dial set");
        Ok(())
    }

    /// Names can change in any phase.
    pub fn rename(&mut self, id: FactionId, name: impl Into<String>) -> Result<(), ConfigError> {
        let faction = self
            .registry
            .get_mut(id)
            .ok_or(ConfigError::UnknownFaction(id))?;
        faction.name = name.into();
        info!(faction = %id, name = %faction.name, "faction renamed");
        Ok(())
    }

    /// Derive starting manpower, resources and relationships, then freeze
    /// configuration.
    pub fn start_game(&mut self) -> Result<(), ConfigError> {
        self.ensure_configuring()?;
        if self.registry.len() < 2 {
            return Err(ConfigError::TooFewFactions(self.registry.len()));
        }
        setup::start_game(&mut self.registry);
        self.phase = Phase::Running;
        Ok(())
    }

    /// Back to the default two-faction configuration. Clears the journal and
    /// all interaction memory, and drops pending playback.
    pub fn reset(&mut self) {
        self.registry = FactionRegistry::with_default_factions();
        self.phase = Phase::Configuring;
        self.memory = InteractionMemory::default();
        self.journal.clear();
        if let Some(playback) = &self.playback {
            playback.reset();
        }
        info!("session reset");
    }

    // --- Play ---

    fn record(&mut self, logs: Vec<LogEntry>) -> Vec<LogEntry> {
        self.journal.extend(logs.iter().cloned());
        logs
    }

    fn not_started(&mut self, kind: &str) -> Vec<LogEntry> {
        debug!(kind, "interaction before start");
        self.record(vec![LogEntry::warning(format!(
            "{kind} denied: The game has not started"
        ))])
    }

    /// Run a typed action through the engine. Player actions update the
    /// last-interaction memory.
    pub fn perform(&mut self, action: Action) -> ActionResult {
        if !self.is_started() {
            let label = match action.kind.interaction() {
                InteractionKind::Attack => "Attack",
                InteractionKind::Trade => "Trade",
                InteractionKind::Alliance => "Alliance",
            };
            let logs = self.not_started(label);
            let reason = logs.first().map(|l| l.message.clone()).unwrap_or_default();
            return ActionResult {
                action,
                outcome: ActionOutcome::Denied { reason },
                logs,
            };
        }
        let mut logs = Vec::new();
        let result = {
            let mut ctx = TickContext {
                registry: &mut self.registry,
                rng: &mut self.rng,
                memory: &mut self.memory,
                logs: &mut logs,
            };
            perform(&mut ctx, action)
        };
        self.record(logs);
        result
    }

    fn with_magnitude(
        &mut self,
        actor: Actor,
        target: FactionId,
        magnitude: &str,
        kind: InteractionKind,
    ) -> Vec<LogEntry> {
        let (label, noun) = match kind {
            InteractionKind::Attack => ("Attack", "attack"),
            _ => ("Trade", "trade"),
        };
        let value = match parse_magnitude(magnitude) {
            Ok(v) => v as f64,
            Err(err) => {
                debug!(%err, "magnitude rejected");
                return self.record(vec![LogEntry::warning(format!(
                    "{label} denied: Invalid {noun} value"
                ))]);
            }
        };
        let kind = match kind {
            InteractionKind::Attack => ActionKind::Attack { troops: value },
            _ => ActionKind::Trade { amount: value },
        };
        self.perform(Action {
            actor,
            target,
            kind,
        })
        .logs
    }

    /// `actor` attacks `target` with `magnitude` troops, given as text.
    pub fn attack(&mut self, actor: Actor, target: FactionId, magnitude: &str) -> Vec<LogEntry> {
        self.with_magnitude(actor, target, magnitude, InteractionKind::Attack)
    }

    /// `actor` offers `magnitude` resources to `target`, given as text.
    pub fn trade(&mut self, actor: Actor, target: FactionId, magnitude: &str) -> Vec<LogEntry> {
        self.with_magnitude(actor, target, magnitude, InteractionKind::Trade)
    }

    pub fn alliance_request(&mut self, actor: Actor, target: FactionId) -> Vec<LogEntry> {
        self.perform(Action {
            actor,
            target,
            kind: ActionKind::Alliance,
        })
        .logs
    }

    /// Run one decision cycle.
    pub fn tick(&mut self) -> TickReport {
        if !self.is_started() {
            return TickReport {
                outcome: TickOutcome::Idle,
                logs: self.not_started("Simulation"),
            };
        }
        let mut logs = Vec::new();
        let outcome = {
            let mut ctx = TickContext {
                registry: &mut self.registry,
                rng: &mut self.rng,
                memory: &mut self.memory,
                logs: &mut logs,
            };
            decision::tick(&mut ctx, &self.engine)
        };
        TickReport {
            outcome,
            logs: self.record(logs),
        }
    }

    /// [`Session::tick`], returning only the log lines.
    pub fn simulate_consequences(&mut self) -> Vec<LogEntry> {
        self.tick().logs
    }

    /// Let a willing faction recruit right now, outside the tick cycle.
    pub fn trigger_recruitment(&mut self) -> Vec<LogEntry> {
        if !self.is_started() {
            return self.not_started("Recruitment");
        }
        let mut logs = Vec::new();
        {
            let mut ctx = TickContext {
                registry: &mut self.registry,
                rng: &mut self.rng,
                memory: &mut self.memory,
                logs: &mut logs,
            };
            match recruitment::choose_recruiter(&mut ctx) {
                Some(id) => {
                    recruitment::recruit(&mut ctx, id);
                }
                None => ctx
                    .logs
                    .push(LogEntry::info("No faction is looking to recruit right now")),
            }
        }
        self.record(logs)
    }

    /// Run a parsed text command as the player.
    pub fn execute(&mut self, command: &Command) -> Vec<LogEntry> {
        match command {
            Command::Attack { target, magnitude } => self.attack(Actor::Player, *target, magnitude),
            Command::Trade { target, magnitude } => self.trade(Actor::Player, *target, magnitude),
            Command::Alliance { target } => self.alliance_request(Actor::Player, *target),
            Command::Tick => self.simulate_consequences(),
        }
    }
}
