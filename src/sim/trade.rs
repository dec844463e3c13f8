//! Trade proposals: willingness scoring, explanation, and consequences.

use tracing::debug;

use super::assessment::Assessment;
use super::context::TickContext;
use super::mutator::{Voice, fmt_amount, mutate_dial, mutate_dials, narrate_value, severity};
use crate::model::{ActionOutcome, Counterpart, Dial, Faction, FactionId, LogEntry, normalized};

const ACCEPT_THRESHOLD: f64 = 0.5;
const LOW_TRUST: f64 = 0.3;
const MAX_SHARE_OF_RESOURCES: f64 = 0.5;

// --- Faction willingness ---
const W_WEALTH: f64 = 0.2;
const W_INFLUENCE: f64 = 0.15;
const W_AGGRESSION: f64 = -0.15;
const W_TECH: f64 = 0.1;
const W_TRUST: f64 = 0.25;
const W_TRADE_VALUE: f64 = 0.2;
const TRADE_VALUE_SCALE: f64 = 3.0;
const W_CALM_INITIATOR: f64 = 0.1;
const W_RELATIONSHIP_TRUST: f64 = 0.15;
const W_TECH_GAP: f64 = 0.05;

// --- Faction consequences ---
const SEVERITY_CAP: f64 = 0.7;
const BASE_IMPACT: f64 = 0.25;
const INITIATOR_TRUST_GAIN: f64 = 1.5;
const RECIPIENT_TRUST_GAIN: f64 = 1.3;
const BASE_BONUS: f64 = 1.2;
const TECH_GAP_BONUS: f64 = 0.1;
const TECH_GAP_BONUS_CAP: f64 = 0.3;
const REJECT_IMPACT: f64 = 0.08;
const INITIATOR_REJECT_TRUST: f64 = 0.3;
const RECIPIENT_REJECT_TRUST: f64 = 0.15;
const REJECT_FRUSTRATION: f64 = 0.25;

const INITIATOR_GAINS: [(Dial, f64); 4] = [
    (Dial::Wealth, 1.0),
    (Dial::Influence, 0.7),
    (Dial::Aggression, -0.5),
    (Dial::Tech, 0.6),
];
const RECIPIENT_GAINS: [(Dial, f64); 4] = [
    (Dial::Wealth, 1.0),
    (Dial::Influence, 0.6),
    (Dial::Aggression, -0.4),
    (Dial::Tech, 0.5),
];

// --- Player trade ---
const PW_TRUST: f64 = 0.35;
const PW_WEALTH: f64 = 0.2;
const PW_INFLUENCE: f64 = 0.15;
const PW_AGGRESSION: f64 = -0.1;
const PW_TECH: f64 = 0.1;
const PW_RESOURCES: f64 = 0.2;
const PLAYER_RESOURCE_SCALE: f64 = 4.0;
const HIGH_TRUST: f64 = 0.7;
const HIGH_TRUST_BONUS: f64 = 0.15;
const PLAYER_SEVERITY_CAP: f64 = 0.75;
const PLAYER_REJECT_TRUST: f64 = 0.3;
const PLAYER_TECH_BONUS: f64 = 0.1;

const FACTION_GAINS_FROM_PLAYER: [(Dial, f64); 4] = [
    (Dial::Wealth, 1.0),
    (Dial::Influence, 0.8),
    (Dial::Aggression, -0.5),
    (Dial::Tech, 0.7),
];

/// Score a faction-to-faction offer from the recipient's side.
pub fn assess_faction_trade(initiator: &Faction, recipient: &Faction, amount: f64) -> Assessment {
    let trust = recipient.trust(initiator.id);
    let tech_gap = initiator.dials.tech - recipient.dials.tech;
    let trade_value = if recipient.resources > 0.0 {
        (amount / (recipient.resources * TRADE_VALUE_SCALE)).min(1.0)
    } else {
        1.0
    };
    let relationship = ((3.0 - initiator.dials.aggression) / 2.0).clamp(0.0, 1.0) * W_CALM_INITIATOR
        + trust.clamp(0.0, 1.0) * W_RELATIONSHIP_TRUST;

    Assessment::new(0.0)
        .with("Wealth Status", normalized(recipient.dials.wealth) * W_WEALTH)
        .with("Influence", normalized(recipient.dials.influence) * W_INFLUENCE)
        .with("Aggression", normalized(recipient.dials.aggression) * W_AGGRESSION)
        .with("Tech", normalized(recipient.dials.tech) * W_TECH)
        .with("Tech Exchange", tech_gap.abs() * W_TECH_GAP)
        .with("Trade Value", trade_value * W_TRADE_VALUE)
        .with("Relationship", relationship)
        .with("Trust Level", trust * W_TRUST)
}

/// Score a player offer from the faction's side.
pub fn assess_player_trade(faction: &Faction, amount: f64) -> Assessment {
    let trust = faction.trust(Counterpart::Player);
    let size = if faction.resources > 0.0 {
        (amount / (faction.resources * PLAYER_RESOURCE_SCALE)).min(1.0)
    } else {
        1.0
    };
    let trust_bonus = if trust > HIGH_TRUST { HIGH_TRUST_BONUS } else { 0.0 };

    Assessment::new(0.0)
        .with("Trust", trust * PW_TRUST + trust_bonus)
        .with("Wealth", normalized(faction.dials.wealth) * PW_WEALTH)
        .with("Influence", normalized(faction.dials.influence) * PW_INFLUENCE)
        .with("Aggression", normalized(faction.dials.aggression) * PW_AGGRESSION)
        .with("Tech", normalized(faction.dials.tech) * PW_TECH)
        .with("Resources", (1.0 - size) * PW_RESOURCES)
}

/// Multiplier on the amount the recipient receives in an accepted trade.
pub fn bonus_multiplier(initiator: &Faction, recipient: &Faction) -> f64 {
    let gap = (initiator.dials.tech - recipient.dials.tech).abs();
    BASE_BONUS + (gap * TECH_GAP_BONUS).min(TECH_GAP_BONUS_CAP)
}

/// Multiplier on the amount a faction receives from the player. Never below 1.
pub fn player_bonus_multiplier(faction: &Faction) -> f64 {
    1.0 + (3.0 - faction.dials.tech) * PLAYER_TECH_BONUS
}

fn faction_reason(assessment: &Assessment, accepted: bool, trust: f64) -> String {
    if accepted {
        return match assessment.top() {
            Some(f) if f.name == "Trust Level" => {
                "high level of trust facilitated agreement".into()
            }
            Some(f) => format!("high {} was the deciding factor", f.name.to_lowercase()),
            None => "mutual interest".into(),
        };
    }
    if let Some(f) = assessment.most_negative() {
        format!("unfavorable {} discouraged the deal", f.name.to_lowercase())
    } else if trust < LOW_TRUST {
        "lack of trust impeded negotiations".into()
    } else {
        "insufficient trading incentives".into()
    }
}

fn player_reason(assessment: &Assessment, accepted: bool, trust: f64) -> String {
    if accepted {
        return match assessment.top() {
            Some(f) if f.name == "Trust" => "strong trust in the player".into(),
            Some(f) => format!("favorable {}", f.name.to_lowercase()),
            None => "mutual interest".into(),
        };
    }
    if let Some(f) = assessment.most_negative() {
        format!("{} weighed against the deal", f.name.to_lowercase())
    } else if trust < LOW_TRUST {
        "low trust prevented agreement".into()
    } else {
        "insufficient trading desire".into()
    }
}

fn deny(logs: &mut Vec<LogEntry>, reason: String) -> ActionOutcome {
    debug!(%reason, "trade denied");
    logs.push(LogEntry::warning(reason.clone()));
    ActionOutcome::Denied { reason }
}

/// One faction offers `amount` of its resources to another.
pub fn faction_trade(
    ctx: &mut TickContext,
    initiator_id: FactionId,
    recipient_id: FactionId,
    amount: f64,
) -> ActionOutcome {
    let (Some(mut initiator), Some(mut recipient)) = (
        ctx.registry.get(initiator_id).cloned(),
        ctx.registry.get(recipient_id).cloned(),
    ) else {
        return deny(ctx.logs, "Trade denied: One or more factions not found".into());
    };
    if initiator_id == recipient_id {
        return deny(ctx.logs, "Trade denied: A faction cannot trade with itself".into());
    }
    if !(amount.is_finite() && amount > 0.0) {
        return deny(ctx.logs, "Trade denied: Trade amount must be greater than 0".into());
    }
    if amount > initiator.resources * MAX_SHARE_OF_RESOURCES {
        return deny(
            ctx.logs,
            "Trade denied: Cannot trade more than 50% of available resources".into(),
        );
    }

    let assessment = assess_faction_trade(&initiator, &recipient, amount);
    let score = assessment.score();
    let accepted = score > ACCEPT_THRESHOLD;
    let t_init = initiator.trust(recipient_id);
    let t_recv = recipient.trust(initiator_id);
    let reason = faction_reason(&assessment, accepted, t_recv);
    debug!(
        initiator = %initiator_id,
        recipient = %recipient_id,
        amount,
        score,
        accepted,
        "faction trade resolved"
    );

    let logs = &mut *ctx.logs;
    logs.push(LogEntry::warning(format!(
        "Trade proposal from {} to {} with value {}: {} ({reason})",
        initiator.name,
        recipient.name,
        fmt_amount(amount),
        if accepted { "Accepted" } else { "Rejected" },
    )));

    if accepted {
        let bonus = bonus_multiplier(&initiator, &recipient);
        let cp_init = severity(amount, initiator.resources, SEVERITY_CAP) * BASE_IMPACT;
        let cp_recv = severity(amount, recipient.resources, SEVERITY_CAP) * BASE_IMPACT;

        let (i_before, r_before) = (initiator.resources, recipient.resources);
        initiator.set_resources(i_before - amount);
        recipient.set_resources(r_before + amount * bonus);
        narrate_value(logs, format!("{} resources", initiator.name), i_before, initiator.resources);
        narrate_value(logs, format!("{} resources", recipient.name), r_before, recipient.resources);

        // Factions that trust each other less have more to gain.
        let factor = (1.0 - (t_init + t_recv) / 2.0).clamp(0.5, 1.0);
        initiator.set_trust(recipient_id, t_init + factor * cp_init * INITIATOR_TRUST_GAIN);
        recipient.set_trust(initiator_id, t_recv + factor * cp_recv * RECIPIENT_TRUST_GAIN);
        narrate_value(
            logs,
            format!("{}'s trust in {}", initiator.name, recipient.name),
            t_init,
            initiator.trust(recipient_id),
        );
        narrate_value(
            logs,
            format!("{}'s trust in {}", recipient.name, initiator.name),
            t_recv,
            recipient.trust(initiator_id),
        );

        mutate_dials(&mut initiator, &INITIATOR_GAINS, cp_init, Voice::Named, logs);
        mutate_dials(&mut recipient, &RECIPIENT_GAINS, cp_recv, Voice::Named, logs);
    } else {
        let factor = (t_init + t_recv).min(1.0);
        initiator.set_trust(
            recipient_id,
            t_init - t_init * REJECT_IMPACT * INITIATOR_REJECT_TRUST * factor,
        );
        recipient.set_trust(
            initiator_id,
            t_recv - t_recv * REJECT_IMPACT * RECIPIENT_REJECT_TRUST * factor,
        );
        for f in [&initiator, &recipient] {
            let other = if f.id == initiator_id { recipient_id } else { initiator_id };
            logs.push(LogEntry::error(format!(
                "{}'s trust slightly decreased to {:.2}",
                f.name,
                f.trust(other)
            )));
        }
        mutate_dial(
            &mut initiator,
            Dial::Aggression,
            REJECT_FRUSTRATION,
            REJECT_IMPACT,
            Voice::Named,
            logs,
        );
    }

    ctx.registry.commit(vec![initiator, recipient]);
    ActionOutcome::Resolved { success: accepted }
}

/// The player offers `amount` resources to a faction.
pub fn player_trade(ctx: &mut TickContext, target: FactionId, amount: f64) -> ActionOutcome {
    let Some(mut faction) = ctx.registry.get(target).cloned() else {
        return deny(ctx.logs, "Trade denied: Faction not found".into());
    };
    if !(amount.is_finite() && amount > 0.0) {
        return deny(ctx.logs, "Trade denied: Trade amount must be greater than 0".into());
    }

    let assessment = assess_player_trade(&faction, amount);
    let score = assessment.score();
    let accepted = score > ACCEPT_THRESHOLD;
    let trust = faction.trust(Counterpart::Player);
    let reason = player_reason(&assessment, accepted, trust);
    debug!(faction = %target, amount, score, accepted, "player trade resolved");

    let logs = &mut *ctx.logs;
    logs.push(LogEntry::warning(format!(
        "Trade with value {}: {} ({reason})",
        fmt_amount(amount),
        if accepted { "Accepted" } else { "Rejected" },
    )));

    let change_percent = severity(amount, faction.resources, PLAYER_SEVERITY_CAP) * BASE_IMPACT;
    if accepted {
        let gain = change_percent * (1.0 - trust) * (2.0 - 2.0 * trust).max(1.0);
        faction.set_trust(Counterpart::Player, trust + gain);
        narrate_value(
            logs,
            "Player Trust".into(),
            trust,
            faction.trust(Counterpart::Player),
        );

        let bonus = player_bonus_multiplier(&faction);
        mutate_dials(
            &mut faction,
            &FACTION_GAINS_FROM_PLAYER,
            change_percent,
            Voice::Implied,
            logs,
        );

        let before = faction.resources;
        faction.set_resources(before + amount * bonus);
        narrate_value(logs, "Resources".into(), before, faction.resources);
    } else {
        faction.set_trust(
            Counterpart::Player,
            trust - change_percent * trust * PLAYER_REJECT_TRUST,
        );
        narrate_value(
            logs,
            "Player Trust".into(),
            trust,
            faction.trust(Counterpart::Player),
        );
        mutate_dial(
            &mut faction,
            Dial::Aggression,
            REJECT_FRUSTRATION,
            change_percent,
            Voice::Implied,
            logs,
        );
    }

    ctx.registry.commit(vec![faction]);
    ActionOutcome::Resolved { success: accepted }
}
