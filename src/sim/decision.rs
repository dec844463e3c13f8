//! Autonomous decision engine: one greedy choice per tick.
//!
//! A tick may first hand over to recruitment. Otherwise it picks an initiator,
//! then a target for it, then the best of attack/trade/alliance for that pair,
//! each step a weighted score with a bounded random term drawn last.

use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use super::interaction::perform;
use super::recruitment::{self, Recruitment};
use crate::config::EngineConfig;
use crate::model::{
    Action, ActionKind, ActionOutcome, Actor, Faction, FactionId, InteractionKind, LogEntry,
    PlayerInteraction,
};

// --- Initiator selection ---
const INITIATOR_NOISE: f64 = 0.4;
const REPEAT_INITIATOR_PENALTY: f64 = -1.5;
const PLAYER_TOUCHED_PENALTY: f64 = -0.5;
const PLAYER_UNTOUCHED_BONUS: f64 = 0.1;

// --- Target selection ---
const TARGET_NOISE: f64 = 0.3;

// --- Action choice ---
const ACTION_NOISE: f64 = 0.2;

/// What a tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing ran (fewer than two factions, or the game is not running).
    Idle,
    Recruitment(Recruitment),
    Interaction {
        initiator: FactionId,
        target: FactionId,
        kind: InteractionKind,
        reason: String,
        outcome: ActionOutcome,
    },
}

/// Unperturbed desirability of each action for one initiator/target pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionScores {
    pub attack: f64,
    pub trade: f64,
    pub alliance: f64,
}

impl ActionScores {
    /// Highest score wins; ties go to attack, then trade.
    pub fn best(&self) -> InteractionKind {
        if self.attack >= self.trade && self.attack >= self.alliance {
            InteractionKind::Attack
        } else if self.trade >= self.alliance {
            InteractionKind::Trade
        } else {
            InteractionKind::Alliance
        }
    }
}

fn initiator_score(
    f: &Faction,
    memory_initiator: Option<FactionId>,
    last_player: Option<PlayerInteraction>,
) -> f64 {
    let d = &f.dials;
    let base = d.aggression * 0.25
        + d.influence * 0.2
        + d.tech * 0.15
        + d.endurance * 0.1
        + d.wealth * 0.1;
    let resources = if f.resources < 10.0 {
        0.3
    } else if f.resources > 50.0 {
        0.2
    } else {
        0.0
    };
    let repeat = if memory_initiator == Some(f.id) {
        REPEAT_INITIATOR_PENALTY
    } else {
        0.0
    };
    let player = if last_player.map(|p| p.faction) == Some(f.id) {
        PLAYER_TOUCHED_PENALTY
    } else {
        PLAYER_UNTOUCHED_BONUS
    };
    base + resources + repeat + player
}

fn target_score(initiator: &Faction, target: &Faction) -> f64 {
    let trust = initiator.trust(target.id);
    let ratio = initiator.dials.power() / target.dials.power();
    let disparity = (initiator.resources - target.resources).abs() / 50.0;
    (1.0 - trust) * 0.4 + (ratio - 1.0).abs() * 0.3 + disparity * 0.2
}

pub fn score_actions(
    init: &Faction,
    recp: &Faction,
    last_player: Option<PlayerInteraction>,
) -> ActionScores {
    let i = &init.dials;
    let r = &recp.dials;
    let i_trust = init.trust(recp.id);
    let r_trust = recp.trust(init.id);
    let i_power = i.power();
    let r_power = r.power();
    let ratio = i_power / r_power;
    let last = |kind: InteractionKind| last_player.filter(|p| p.kind == kind);

    let mut attack = i.aggression * 0.3 + (1.0 - i_trust) * 0.25;
    if init.resources < 10.0 {
        attack += 0.2;
    }
    if init.resources > 50.0 {
        attack -= 0.15;
    }
    if ratio > 1.2 {
        attack += 0.2;
    } else if ratio < 0.8 {
        attack -= 0.3;
    }
    if r.endurance < 1.5 {
        attack += 0.15;
    }
    if r.wealth > 2.5 {
        attack += 0.1;
    }
    if init.manpower < 20.0 {
        attack -= 0.3;
    }
    if init.resources < recp.resources * 1.2 {
        attack += 0.15;
    }
    // The player just attacked this faction.
    if last(InteractionKind::Attack).is_some_and(|p| p.faction == init.id) {
        attack += 0.1;
    }
    attack += if i.influence < 1.5 { 0.1 } else { -0.1 };
    if i.tech > 2.5 {
        attack += 0.1;
    }

    let mut trade = i.wealth * 0.2 + (4.0 - i.aggression) * 0.15 + i_trust * 0.25;
    if init.resources > 25.0 {
        trade += 0.2;
    }
    if init.resources < 10.0 {
        trade -= 0.2;
    }
    if i.tech < 2.0 && r.tech > 2.5 {
        trade += 0.2;
    }
    if i.tech > 2.5 && r.tech < 2.0 {
        trade += 0.15;
    }
    if (i.wealth - r.wealth).abs() > 1.0 {
        trade += 0.15;
    }
    if i_trust > 0.6 && r_trust > 0.6 {
        trade += 0.15;
    }
    if i.influence > 2.0 {
        trade += 0.15;
    }
    if i.wealth < 1.5 && init.resources < 15.0 {
        trade += 0.2;
    }
    if last(InteractionKind::Trade).is_some_and(|p| p.faction == recp.id) {
        trade += 0.1;
    }

    let mut alliance = i.influence * 0.2 + (4.0 - i.aggression) * 0.15 + i_trust * 0.3;
    if i.endurance < 1.5 {
        alliance += 0.25;
    }
    if init.manpower < 15.0 {
        alliance += 0.2;
    }
    if (i.tech - r.tech).abs() < 0.5 {
        alliance += 0.1;
    }
    if ratio > 0.8 && ratio < 1.2 {
        alliance += 0.2;
    }
    if i.endurance < 1.5 && init.manpower < 20.0 {
        alliance += 0.3;
    }
    if i_trust < 0.4 || r_trust < 0.4 {
        alliance -= 0.5;
    }
    if r_power > i_power * 1.5 {
        alliance += 0.15;
    }
    if i.tech + r.tech > 5.0 {
        alliance += 0.1;
    }
    if i.aggression + r.aggression > 5.0 {
        alliance -= 0.2;
    }
    if last(InteractionKind::Alliance).is_some() {
        alliance += 0.15;
    }

    ActionScores {
        attack,
        trade,
        alliance,
    }
}

/// Narrative reason for the chosen action, first matching rule wins.
pub fn decision_reason(kind: InteractionKind, init: &Faction, recp: &Faction) -> &'static str {
    let i = &init.dials;
    let r = &recp.dials;
    let i_trust = init.trust(recp.id);
    let r_trust = recp.trust(init.id);
    let ratio = i.power() / r.power();
    match kind {
        InteractionKind::Attack => {
            if i_trust < 0.4 {
                "deep distrust and hostility"
            } else if ratio > 1.2 {
                "significant power advantage"
            } else if init.resources < 10.0 {
                "desperate need for resources"
            } else if r.wealth > 2.5 && i.wealth < 1.5 {
                "economic jealousy"
            } else if i.aggression > 2.5 {
                "aggressive military doctrine"
            } else {
                "opportunistic expansion"
            }
        }
        InteractionKind::Trade => {
            if i_trust > 0.6 {
                "established trade relationship"
            } else if (i.tech - r.tech).abs() > 1.0 {
                "beneficial technology exchange"
            } else if init.resources > 25.0 {
                "resource surplus"
            } else if i.influence > 2.0 {
                "economic diplomacy"
            } else if i.wealth < 1.5 {
                "economic necessity"
            } else {
                "mutually beneficial commerce"
            }
        }
        InteractionKind::Alliance => {
            if i_trust > 0.6 && r_trust > 0.6 {
                "strong mutual trust"
            } else if i.endurance < 1.5 || init.manpower < 15.0 {
                "need for protection"
            } else if ratio > 0.8 && ratio < 1.2 {
                "balanced power relationship"
            } else if i.tech + r.tech > 5.0 {
                "technological cooperation"
            } else if i.influence > 2.5 {
                "diplomatic initiative"
            } else {
                "strategic security concerns"
            }
        }
    }
}

fn trust_decided(kind: InteractionKind, trust: f64) -> bool {
    match kind {
        InteractionKind::Attack => trust < 0.4,
        InteractionKind::Trade | InteractionKind::Alliance => trust > 0.6,
    }
}

/// Troops committed to an attack: 10% of manpower at aggression 1, up to 40% at 3.
pub fn attack_magnitude(f: &Faction) -> f64 {
    (f.manpower * (0.1 + (f.dials.aggression - 1.0) * 0.15)).round()
}

/// Resources offered in a trade: 5% at wealth 1, up to 20% at 3.
pub fn trade_magnitude(f: &Faction) -> f64 {
    (f.resources * (0.05 + (f.dials.wealth - 1.0) * 0.075)).round()
}

/// Highest score, first one on ties.
fn pick_highest(scored: impl IntoIterator<Item = (FactionId, f64)>) -> Option<FactionId> {
    let mut best: Option<(FactionId, f64)> = None;
    for (id, score) in scored {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Run one decision cycle.
pub fn tick(ctx: &mut TickContext, engine: &EngineConfig) -> TickOutcome {
    if ctx.registry.len() < 2 {
        ctx.logs.push(LogEntry::warning(
            "Faction interaction requires at least two factions",
        ));
        return TickOutcome::Idle;
    }

    if ctx.rng.random::<f64>() < engine.recruitment_chance {
        if let Some(id) = recruitment::choose_recruiter(ctx) {
            debug!(faction = %id, "tick turned to recruitment");
            return TickOutcome::Recruitment(recruitment::recruit(ctx, id));
        }
    }

    let memory = *ctx.memory;
    let factions: Vec<Faction> = ctx.registry.iter().cloned().collect();

    let initiator_scores: Vec<(FactionId, f64)> = factions
        .iter()
        .map(|f| {
            let score = initiator_score(f, memory.last_initiator, memory.last_player)
                + ctx.rng.random_range(0.0..INITIATOR_NOISE);
            (f.id, score)
        })
        .collect();
    let Some(initiator_id) = pick_highest(initiator_scores) else {
        return TickOutcome::Idle;
    };
    let Some(initiator) = factions.iter().find(|f| f.id == initiator_id) else {
        return TickOutcome::Idle;
    };

    let target_scores: Vec<(FactionId, f64)> = factions
        .iter()
        .filter(|f| f.id != initiator_id)
        .map(|f| {
            let score = target_score(initiator, f) + ctx.rng.random_range(0.0..TARGET_NOISE);
            (f.id, score)
        })
        .collect();
    let Some(recipient) =
        pick_highest(target_scores).and_then(|id| factions.iter().find(|f| f.id == id))
    else {
        ctx.logs.push(LogEntry::warning("No available target faction found"));
        return TickOutcome::Idle;
    };

    let raw = score_actions(initiator, recipient, memory.last_player);
    let perturbed = ActionScores {
        attack: raw.attack + ctx.rng.random_range(0.0..ACTION_NOISE),
        trade: raw.trade + ctx.rng.random_range(0.0..ACTION_NOISE),
        alliance: raw.alliance + ctx.rng.random_range(0.0..ACTION_NOISE),
    };
    let kind = perturbed.best();
    let reason = decision_reason(kind, initiator, recipient);
    let trust = initiator.trust(recipient.id);
    debug!(
        initiator = %initiator.id,
        target = %recipient.id,
        ?kind,
        attack = perturbed.attack,
        trade = perturbed.trade,
        alliance = perturbed.alliance,
        "decision made"
    );

    ctx.logs.push(LogEntry::info(format!(
        "{} decided to {} {} due to {reason}.",
        initiator.name,
        kind.verb(),
        recipient.name
    )));
    ctx.logs.push(LogEntry::info(format!(
        "Decision factors - Attack: {:.2}, Trade: {:.2}, Alliance: {:.2}",
        raw.attack, raw.trade, raw.alliance
    )));
    if trust_decided(kind, trust) {
        ctx.logs.push(LogEntry::info(format!(
            "Trust level ({trust:.2}) was a decisive factor in this decision."
        )));
    }

    let action_kind = match kind {
        InteractionKind::Attack => ActionKind::Attack {
            troops: attack_magnitude(initiator),
        },
        InteractionKind::Trade => ActionKind::Trade {
            amount: trade_magnitude(initiator),
        },
        InteractionKind::Alliance => ActionKind::Alliance,
    };
    let result = perform(
        ctx,
        Action {
            actor: Actor::Faction(initiator.id),
            target: recipient.id,
            kind: action_kind,
        },
    );
    ctx.memory.last_initiator = Some(initiator.id);

    TickOutcome::Interaction {
        initiator: initiator.id,
        target: recipient.id,
        kind,
        reason: reason.to_string(),
        outcome: result.outcome,
    }
}
