//! Dispatch from an [`Action`] to the handler for its pairing.

use tracing::debug;

use super::context::TickContext;
use super::{alliance, combat, trade};
use crate::model::{Action, ActionKind, ActionOutcome, ActionResult, Actor, PlayerInteraction};

/// Run one interaction and collect the log lines it produced.
///
/// Player actions are remembered for the decision engine even when the
/// handler denies them.
pub fn perform(ctx: &mut TickContext, action: Action) -> ActionResult {
    let start = ctx.logs.len();
    if action.actor == Actor::Player {
        ctx.memory.last_player = Some(PlayerInteraction {
            faction: action.target,
            kind: action.kind.interaction(),
        });
    }
    let outcome = execute(ctx, action);
    debug!(?action, ?outcome, "interaction finished");
    ActionResult {
        action,
        outcome,
        logs: ctx.logs[start..].to_vec(),
    }
}

fn execute(ctx: &mut TickContext, action: Action) -> ActionOutcome {
    let target = action.target;
    match (action.actor, action.kind) {
        (Actor::Player, ActionKind::Attack { troops }) => {
            combat::player_attack(ctx, target, troops)
        }
        (Actor::Faction(id), ActionKind::Attack { troops }) => {
            combat::faction_attack(ctx, id, target, troops)
        }
        (Actor::Player, ActionKind::Trade { amount }) => trade::player_trade(ctx, target, amount),
        (Actor::Faction(id), ActionKind::Trade { amount }) => {
            trade::faction_trade(ctx, id, target, amount)
        }
        (Actor::Player, ActionKind::Alliance) => alliance::player_alliance(ctx, target),
        (Actor::Faction(id), ActionKind::Alliance) => alliance::faction_alliance(ctx, id, target),
    }
}
