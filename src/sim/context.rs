use rand::RngCore;

use crate::model::{FactionId, FactionRegistry, LogEntry, PlayerInteraction};

/// Cross-tick memory the decision engine reads. Everything else is recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionMemory {
    /// Most recent player command that reached the engine.
    pub last_player: Option<PlayerInteraction>,
    /// Faction that initiated on the previous tick.
    pub last_initiator: Option<FactionId>,
}

/// Context passed to every handler and to the decision engine.
///
/// Handlers read the registry, mutate private copies, and commit all affected
/// factions in one call. Game log lines go to `logs` in narration order.
pub struct TickContext<'a> {
    pub registry: &'a mut FactionRegistry,
    pub rng: &'a mut dyn RngCore,
    pub memory: &'a mut InteractionMemory,
    pub logs: &'a mut Vec<LogEntry>,
}
