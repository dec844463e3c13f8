//! Alliance requests. All-or-nothing: no magnitude, a hard trust gate.

use tracing::debug;

use super::assessment::Assessment;
use super::context::TickContext;
use super::mutator::{Voice, mutate_dial, mutate_dials, narrate_value};
use crate::model::{ActionOutcome, Counterpart, Dial, Faction, FactionId, LogEntry, normalized};

const TRUST_GATE: f64 = 0.3;
const TRUST_GATE_PENALTY: f64 = -1.0;

// --- Faction willingness ---
const ACCEPT_THRESHOLD: f64 = 0.5;
const BASE_WILLINGNESS: f64 = 0.35;
const W_AGGRESSION: f64 = -0.3;
const W_INFLUENCE: f64 = 0.2;
const W_TECH: f64 = 0.15;
const W_WEALTH: f64 = 0.15;
const W_ENDURANCE: f64 = 0.1;
const W_TRUST: f64 = 0.3;
const W_POWER_BALANCE: f64 = 0.2;
const W_TECH_COMPAT: f64 = 0.1;
const RECOVERY_BONUS: f64 = 0.2;
const RECOVERY_THRESHOLD: f64 = 1.5;

// --- Faction consequences ---
const ACCEPT_IMPACT: f64 = 0.35;
const TRUST_GAIN_CAP: f64 = 0.8;
const INITIATOR_TRUST_GAIN: f64 = 2.5;
const RECIPIENT_TRUST_GAIN: f64 = 2.8;
const COOPERATION_BONUS: f64 = 0.05;
const REJECT_IMPACT: f64 = 0.1;
const INITIATOR_REJECT_TRUST: f64 = 0.4;
const RECIPIENT_REJECT_TRUST: f64 = 0.35;
const INITIATOR_FRUSTRATION: f64 = 0.5;
const RECIPIENT_FRUSTRATION: f64 = 0.3;

const INITIATOR_GAINS: [(Dial, f64); 5] = [
    (Dial::Aggression, -1.0),
    (Dial::Influence, 1.5),
    (Dial::Tech, 1.0),
    (Dial::Endurance, 0.8),
    (Dial::Wealth, 0.7),
];
const RECIPIENT_GAINS: [(Dial, f64); 5] = [
    (Dial::Aggression, -1.1),
    (Dial::Influence, 1.4),
    (Dial::Tech, 1.1),
    (Dial::Endurance, 0.9),
    (Dial::Wealth, 0.6),
];

// --- Player alliance ---
const PLAYER_ACCEPT_THRESHOLD: f64 = 0.55;
const PW_TRUST: f64 = 0.45;
const PW_AGGRESSION: f64 = -0.15;
const PW_INFLUENCE: f64 = 0.15;
const PW_TECH: f64 = 0.05;
const PW_ENDURANCE: f64 = 0.05;
const PLAYER_POWER: f64 = 2.0;
const POWER_FACTOR: f64 = 0.15;
const POWER_RATIO_MIN: f64 = 0.5;
const POWER_RATIO_MAX: f64 = 2.0;
const DESPERATION_BONUS: f64 = 0.2;
const DESPERATION_MANPOWER: f64 = 20.0;
const HOSTILITY_THRESHOLD: f64 = 2.5;
const HOSTILITY_PENALTY: f64 = -0.1;
const PLAYER_REJECT_TRUST: f64 = 0.7;
const PLAYER_REJECT_FRUSTRATION: f64 = 0.6;
const PLAYER_REJECT_INFLUENCE: f64 = -0.4;

const FACTION_JOINS_PLAYER: [(Dial, f64); 5] = [
    (Dial::Aggression, -1.2),
    (Dial::Influence, 1.5),
    (Dial::Tech, 1.0),
    (Dial::Endurance, 0.8),
    (Dial::Wealth, 0.6),
];

/// Score a faction-to-faction request from the recipient's side.
pub fn assess_faction_alliance(initiator: &Faction, recipient: &Faction) -> Assessment {
    let t_recv = recipient.trust(initiator.id);
    let t_init = initiator.trust(recipient.id);
    let gated = t_recv < TRUST_GATE || t_init < TRUST_GATE;

    let ratio = initiator.dials.mean() / recipient.dials.mean();
    let power_balance = (1.0 - (ratio - 1.0).abs()).max(0.0);
    let tech_gap = (initiator.dials.tech - recipient.dials.tech).abs();
    let recovering = recipient.dials.endurance < RECOVERY_THRESHOLD
        || recipient.dials.wealth < RECOVERY_THRESHOLD;

    let d = &recipient.dials;
    Assessment::new(BASE_WILLINGNESS)
        .with("Aggression Level", normalized(d.aggression) * W_AGGRESSION)
        .with("Influence Status", normalized(d.influence) * W_INFLUENCE)
        .with(
            "Tech Compatibility",
            normalized(d.tech) * W_TECH + (1.0 - tech_gap / 2.0) * W_TECH_COMPAT,
        )
        .with("Economic Standing", normalized(d.wealth) * W_WEALTH)
        .with("Resilience", normalized(d.endurance) * W_ENDURANCE)
        .with("Power Balance", power_balance * W_POWER_BALANCE)
        .with("Need for Recovery", if recovering { RECOVERY_BONUS } else { 0.0 })
        .with(
            "Trust Level",
            t_recv * W_TRUST + if gated { TRUST_GATE_PENALTY } else { 0.0 },
        )
}

/// Score a player request from the faction's side.
pub fn assess_player_alliance(faction: &Faction) -> Assessment {
    let trust = faction.trust(Counterpart::Player);
    let d = &faction.dials;
    let ratio = PLAYER_POWER / d.mean();
    let power = if (POWER_RATIO_MIN..=POWER_RATIO_MAX).contains(&ratio) {
        POWER_FACTOR
    } else {
        -POWER_FACTOR
    };
    let desperate = d.endurance < RECOVERY_THRESHOLD || faction.manpower < DESPERATION_MANPOWER;
    let hostility = if d.aggression > HOSTILITY_THRESHOLD {
        HOSTILITY_PENALTY
    } else {
        0.0
    };

    Assessment::new(0.0)
        .with(
            "Trust",
            trust * PW_TRUST + if trust < TRUST_GATE { TRUST_GATE_PENALTY } else { 0.0 },
        )
        .with("Aggression", normalized(d.aggression) * PW_AGGRESSION + hostility)
        .with("Influence", normalized(d.influence) * PW_INFLUENCE)
        .with(
            "Capabilities",
            normalized(d.tech) * PW_TECH + normalized(d.endurance) * PW_ENDURANCE,
        )
        .with("Power Balance", power)
        .with("Need for Help", if desperate { DESPERATION_BONUS } else { 0.0 })
}

fn faction_reason(assessment: &Assessment, accepted: bool, gated: bool) -> String {
    if accepted {
        return match assessment.top() {
            Some(f) if f.name == "Trust Level" => "high levels of trust between factions".into(),
            Some(f) => format!("favorable {} was decisive", f.name.to_lowercase()),
            None => "mutual benefit".into(),
        };
    }
    if gated {
        return "historical distrust impeded cooperation".into();
    }
    match assessment.most_negative() {
        Some(f) => format!("unfavorable {} prevented alliance", f.name.to_lowercase()),
        None => "insufficient mutual benefit perceived".into(),
    }
}

fn player_reason(assessment: &Assessment, accepted: bool, faction: &Faction) -> String {
    if accepted {
        return match assessment.top() {
            Some(f) if f.name == "Trust" => "high mutual trust".into(),
            Some(f) if f.name == "Need for Help" => "desperate need for protection".into(),
            Some(f) => format!("favorable {}", f.name.to_lowercase()),
            None => "mutual benefit".into(),
        };
    }
    if faction.trust(Counterpart::Player) < TRUST_GATE {
        "insufficient trust".into()
    } else if faction.dials.aggression > HOSTILITY_THRESHOLD {
        "aggressive stance".into()
    } else {
        "strategic considerations".into()
    }
}

fn deny(logs: &mut Vec<LogEntry>, reason: String) -> ActionOutcome {
    debug!(%reason, "alliance denied");
    logs.push(LogEntry::warning(reason.clone()));
    ActionOutcome::Denied { reason }
}

pub fn faction_alliance(
    ctx: &mut TickContext,
    initiator_id: FactionId,
    recipient_id: FactionId,
) -> ActionOutcome {
    let (Some(mut initiator), Some(mut recipient)) = (
        ctx.registry.get(initiator_id).cloned(),
        ctx.registry.get(recipient_id).cloned(),
    ) else {
        return deny(ctx.logs, "Alliance denied: One or more factions not found".into());
    };
    if initiator_id == recipient_id {
        return deny(ctx.logs, "Alliance denied: A faction cannot ally with itself".into());
    }

    let t_init = initiator.trust(recipient_id);
    let t_recv = recipient.trust(initiator_id);
    let gated = t_init < TRUST_GATE || t_recv < TRUST_GATE;
    let assessment = assess_faction_alliance(&initiator, &recipient);
    let score = assessment.score();
    let accepted = score > ACCEPT_THRESHOLD;
    let reason = faction_reason(&assessment, accepted, gated);
    debug!(
        initiator = %initiator_id,
        recipient = %recipient_id,
        score,
        gated,
        accepted,
        "faction alliance resolved"
    );

    let logs = &mut *ctx.logs;
    logs.push(LogEntry::warning(format!(
        "Alliance proposal from {} to {}: {} ({reason})",
        initiator.name,
        recipient.name,
        if accepted { "Accepted" } else { "Rejected" },
    )));

    if accepted {
        let cp = ACCEPT_IMPACT;
        initiator.set_trust(
            recipient_id,
            t_init + (1.0 - t_init).min(TRUST_GAIN_CAP) * cp * INITIATOR_TRUST_GAIN,
        );
        recipient.set_trust(
            initiator_id,
            t_recv + (1.0 - t_recv).min(TRUST_GAIN_CAP) * cp * RECIPIENT_TRUST_GAIN,
        );
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

        mutate_dials(&mut initiator, &INITIATOR_GAINS, cp, Voice::Named, logs);
        mutate_dials(&mut recipient, &RECIPIENT_GAINS, cp, Voice::Named, logs);

        for f in [&mut initiator, &mut recipient] {
            let before = f.resources;
            f.set_resources(before * (1.0 + COOPERATION_BONUS));
            narrate_value(logs, format!("{} resources", f.name), before, f.resources);
        }
    } else {
        let cp = REJECT_IMPACT;
        initiator.set_trust(recipient_id, t_init - t_init * cp * INITIATOR_REJECT_TRUST);
        recipient.set_trust(initiator_id, t_recv - t_recv * cp * RECIPIENT_REJECT_TRUST);
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
        mutate_dial(
            &mut initiator,
            Dial::Aggression,
            INITIATOR_FRUSTRATION,
            cp,
            Voice::Named,
            logs,
        );
        mutate_dial(
            &mut recipient,
            Dial::Aggression,
            RECIPIENT_FRUSTRATION,
            cp,
            Voice::Named,
            logs,
        );
    }

    ctx.registry.commit(vec![initiator, recipient]);
    ActionOutcome::Resolved { success: accepted }
}

pub fn player_alliance(ctx: &mut TickContext, target: FactionId) -> ActionOutcome {
    let Some(mut faction) = ctx.registry.get(target).cloned() else {
        return deny(ctx.logs, "Alliance denied: Faction not found".into());
    };

    let assessment = assess_player_alliance(&faction);
    let score = assessment.score();
    let accepted = score > PLAYER_ACCEPT_THRESHOLD;
    let reason = player_reason(&assessment, accepted, &faction);
    debug!(faction = %target, score, accepted, "player alliance resolved");

    let logs = &mut *ctx.logs;
    logs.push(LogEntry::warning(format!(
        "Alliance request: {} ({reason})",
        if accepted { "Accepted" } else { "Rejected" },
    )));

    let cp = ACCEPT_IMPACT;
    let trust = faction.trust(Counterpart::Player);
    if accepted {
        let gain = cp * (1.0 - trust) * 2.0 * (2.0 - 2.0 * trust).max(1.0);
        faction.set_trust(Counterpart::Player, trust + gain);
        narrate_value(logs, "Player Trust".into(), trust, faction.trust(Counterpart::Player));
        mutate_dials(&mut faction, &FACTION_JOINS_PLAYER, cp, Voice::Implied, logs);
    } else {
        faction.set_trust(Counterpart::Player, trust - cp * trust * PLAYER_REJECT_TRUST);
        narrate_value(logs, "Player Trust".into(), trust, faction.trust(Counterpart::Player));
        mutate_dial(
            &mut faction,
            Dial::Aggression,
            PLAYER_REJECT_FRUSTRATION,
            cp,
            Voice::Implied,
            logs,
        );
        mutate_dial(
            &mut faction,
            Dial::Influence,
            PLAYER_REJECT_INFLUENCE,
            cp,
            Voice::Implied,
            logs,
        );
    }

    ctx.registry.commit(vec![faction]);
    ActionOutcome::Resolved { success: accepted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dials;

    fn favorable_pair() -> (Faction, Faction) {
        let mut a = Faction::new(FactionId::new(1), "A");
        let mut b = Faction::new(FactionId::new(2), "B");
        a.dials = Dials::uniform(2.0);
        b.dials = Dials::uniform(2.0);
        b.dials.aggression = 1.0;
        b.dials.influence = 3.0;
        a.set_trust(b.id, 0.8);
        b.set_trust(a.id, 0.8);
        (a, b)
    }

    #[test]
    fn friendly_peers_accept() {
        let (a, b) = favorable_pair();
        assert!(assess_faction_alliance(&a, &b).score() > ACCEPT_THRESHOLD);
    }

    #[test]
    fn trust_gate_overrides_everything() {
        let (mut a, mut b) = favorable_pair();
        b.dials = Dials::uniform(3.0);
        b.dials.aggression = 1.0;
        b.dials.endurance = 1.0;
        a.set_trust(b.id, 0.1);
        b.set_trust(a.id, 0.1);
        let assessment = assess_faction_alliance(&a, &b);
        assert!(assessment.score() < ACCEPT_THRESHOLD);
        assert_eq!(
            faction_reason(&assessment, false, true),
            "historical distrust impeded cooperation"
        );
    }

    #[test]
    fn one_sided_distrust_still_gates() {
        let (a, mut b) = favorable_pair();
        b.set_trust(a.id, 0.2);
        assert!(assess_faction_alliance(&a, &b).score() < ACCEPT_THRESHOLD);
    }

    #[test]
    fn desperate_faction_leans_towards_player() {
        let mut f = Faction::new(FactionId::new(1), "A");
        f.manpower = 5.0;
        f.set_trust(Counterpart::Player, 0.6);
        let with_need = assess_player_alliance(&f);
        assert_eq!(with_need.value_of("Need for Help"), DESPERATION_BONUS);
        f.manpower = 50.0;
        f.dials.endurance = 2.0;
        assert_eq!(assess_player_alliance(&f).value_of("Need for Help"), 0.0);
    }

    #[test]
    fn hostile_faction_gives_aggressive_stance() {
        let mut f = Faction::new(FactionId::new(1), "A");
        f.dials.aggression = 3.0;
        f.set_trust(Counterpart::Player, 0.5);
        let assessment = assess_player_alliance(&f);
        assert_eq!(player_reason(&assessment, false, &f), "aggressive stance");
    }
}
