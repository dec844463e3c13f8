//! Action types shared by player commands and the autonomous decision engine.
//!
//! Every interaction is an `Action` (who, against whom, what). Handlers
//! answer with an `ActionResult` carrying the outcome and the ordered log.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::faction::{Counterpart, FactionId};
use super::log::LogEntry;

/// Who started an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// External player input
    Player,
    /// A faction chosen by the decision engine
    Faction(FactionId),
}

impl From<Actor> for Counterpart {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Player => Counterpart::Player,
            Actor::Faction(id) => Counterpart::Faction(id),
        }
    }
}

/// Interaction family, without its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Attack,
    Trade,
    Alliance,
}

impl InteractionKind {
    /// Verb phrase used in narration ("decided to attack X").
    pub fn verb(self) -> &'static str {
        match self {
            InteractionKind::Attack => "attack",
            InteractionKind::Trade => "trade with",
            InteractionKind::Alliance => "form an alliance with",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InteractionKind::Attack => "attack",
            InteractionKind::Trade => "trade",
            InteractionKind::Alliance => "alliance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    /// Commit `troops` manpower to an assault.
    Attack { troops: f64 },
    /// Offer `amount` resources.
    Trade { amount: f64 },
    Alliance,
}

impl ActionKind {
    pub fn interaction(&self) -> InteractionKind {
        match self {
            ActionKind::Attack { .. } => InteractionKind::Attack,
            ActionKind::Trade { .. } => InteractionKind::Trade,
            ActionKind::Alliance => InteractionKind::Alliance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub actor: Actor,
    pub target: FactionId,
    pub kind: ActionKind,
}

/// Most recent player-initiated action. Overwritten by every player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInteraction {
    pub faction: FactionId,
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The interaction ran. `success` is true when the initiator got what it
    /// wanted: the attack was won, or the proposal was accepted.
    Resolved { success: bool },
    /// A precondition failed; nothing changed.
    Denied { reason: String },
}

impl ActionOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, ActionOutcome::Denied { .. })
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, ActionOutcome::Resolved { success: true })
    }
}

#[derive(Debug, Clone)]
pub struct ActionResult {
    pub action: Action,
    pub outcome: ActionOutcome,
    pub logs: Vec<LogEntry>,
}
