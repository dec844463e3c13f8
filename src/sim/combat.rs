//! Attack resolution and handlers, faction-vs-faction and player-vs-faction.

use tracing::debug;

use super::context::TickContext;
use super::mutator::{Multipliers, Voice, mutate_dials, narrate_value, revenge_multiplier, severity};
use crate::model::{ActionOutcome, Counterpart, Dial, Faction, FactionId, LogEntry};

// --- Faction strength ---
const W_AGGRESSION: f64 = 0.2;
const W_TECH: f64 = 0.2;
const W_ENDURANCE: f64 = 0.15;
const W_WEALTH: f64 = 0.15;
const W_INFLUENCE: f64 = 0.1;
const W_MANPOWER: f64 = 0.1;
const TRUST_WEIGHT: f64 = 0.1;

// --- Attack boost ---
const BOOST_EXPONENT: f64 = 0.8;
const BOOST_COEFFICIENT: f64 = 0.5;

// --- Faction-vs-faction consequences ---
const SEVERITY_CAP: f64 = 0.9;
const BASE_IMPACT: f64 = 0.4;
const DEFENDER_TRUST_LOSS: f64 = 0.5;
const ATTACKER_TRUST_LOSS: f64 = 0.2;
const ATTACKER_CASUALTIES: f64 = 0.7;
const DEFENDER_CASUALTIES_ON_LOSS: f64 = 0.5;
const LOOT_RATE: f64 = 0.25;
const WINNER_WAR_COST: f64 = 0.4;
const DEFENDER_LOSS_COST: f64 = 0.6;
const LOSER_WAR_COST: f64 = 0.7;
const HOLDOUT_WAR_COST: f64 = 0.4;

const ATTACKER_WINS: [(Dial, f64); 5] = [
    (Dial::Aggression, 1.2),
    (Dial::Tech, 1.0),
    (Dial::Endurance, -1.0),
    (Dial::Wealth, -1.5),
    (Dial::Influence, 1.5),
];
const DEFENDER_WINS: [(Dial, f64); 5] = [
    (Dial::Aggression, 1.0),
    (Dial::Tech, 0.8),
    (Dial::Endurance, -0.7),
    (Dial::Wealth, -1.2),
    (Dial::Influence, 1.5),
];
/// Aggression magnitude is unsigned; see [`revenge_multiplier`].
const DEFENDER_LOSES: [(Dial, f64); 5] = [
    (Dial::Aggression, 2.0),
    (Dial::Tech, 1.2),
    (Dial::Endurance, -1.8),
    (Dial::Wealth, -2.5),
    (Dial::Influence, -2.0),
];
const ATTACKER_LOSES: [(Dial, f64); 5] = [
    (Dial::Aggression, 1.5),
    (Dial::Tech, 1.5),
    (Dial::Endurance, -2.0),
    (Dial::Wealth, -2.5),
    (Dial::Influence, -2.0),
];

// --- Player-vs-faction ---
const PW_AGGRESSION: f64 = 0.25;
const PW_TECH: f64 = 0.2;
const PW_ENDURANCE: f64 = 0.2;
const PW_WEALTH: f64 = 0.15;
const PW_INFLUENCE: f64 = 0.1;
const PW_MANPOWER: f64 = 0.1;
const PLAYER_SEVERITY_CAP: f64 = 0.85;
const PLAYER_TRUST_LOSS_WON: f64 = 0.9;
const PLAYER_TRUST_LOSS_LOST: f64 = 2.0;
const PLAYER_WAR_COST_WON: f64 = 0.35;
const PLAYER_WAR_COST_LOST: f64 = 0.7;

const FACTION_REPELS_PLAYER: [(Dial, f64); 5] = [
    (Dial::Aggression, 1.5),
    (Dial::Tech, 1.2),
    (Dial::Endurance, -1.3),
    (Dial::Wealth, -1.8),
    (Dial::Influence, 1.8),
];
const FACTION_FALLS_TO_PLAYER: [(Dial, f64); 5] = [
    (Dial::Aggression, 1.8),
    (Dial::Tech, 1.5),
    (Dial::Endurance, -2.0),
    (Dial::Wealth, -2.8),
    (Dial::Influence, -2.2),
];

/// Intermediate numbers of a faction-vs-faction battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatOdds {
    pub attacker_strength: f64,
    pub defender_strength: f64,
    pub advantage: f64,
    pub boost: f64,
    pub win_odds: f64,
}

impl CombatOdds {
    /// Strict: an exact 0.5 goes to the defender.
    pub fn attacker_wins(&self) -> bool {
        self.win_odds > 0.5
    }
}

fn strength(f: &Faction) -> f64 {
    f.dials.aggression * W_AGGRESSION
        + f.dials.tech * W_TECH
        + f.dials.endurance * W_ENDURANCE
        + f.dials.wealth * W_WEALTH
        + f.dials.influence * W_INFLUENCE
        + f.manpower * W_MANPOWER
}

/// Diminishing-returns weight of the troops committed.
pub fn attack_boost(troops: f64) -> f64 {
    troops.max(0.0).powf(BOOST_EXPONENT) * BOOST_COEFFICIENT
}

pub fn resolve_faction_combat(attacker: &Faction, defender: &Faction, troops: f64) -> CombatOdds {
    let attacker_trust = attacker.trust(defender.id);
    let defender_trust = defender.trust(attacker.id);
    let attacker_strength = strength(attacker);
    let defender_strength = strength(defender) + (defender_trust - attacker_trust) * TRUST_WEIGHT;

    let total = attacker_strength + defender_strength;
    let advantage = attacker_strength / total;
    let boost = attack_boost(troops);
    let scaled = boost / total;
    let win_odds = (advantage + scaled) / (1.0 + scaled);

    CombatOdds {
        attacker_strength,
        defender_strength,
        advantage,
        boost,
        win_odds,
    }
}

/// Win odds of a faction defending against the player. The faction holds iff
/// this exceeds 0.5.
pub fn resolve_player_combat(defender: &Faction, troops: f64) -> f64 {
    let faction = defender.dials.aggression * PW_AGGRESSION
        + defender.dials.tech * PW_TECH
        + defender.dials.endurance * PW_ENDURANCE
        + defender.dials.wealth * PW_WEALTH
        + defender.dials.influence * PW_INFLUENCE
        + defender.manpower * PW_MANPOWER;
    let player = attack_boost(troops);
    faction / (faction + player)
}

fn deny(logs: &mut Vec<LogEntry>, reason: String) -> ActionOutcome {
    debug!(%reason, "attack denied");
    logs.push(LogEntry::warning(reason.clone()));
    ActionOutcome::Denied { reason }
}

fn valid_troops(troops: f64) -> bool {
    troops.is_finite() && troops >= 0.0
}

/// One faction attacks another with `troops` of its manpower.
pub fn faction_attack(
    ctx: &mut TickContext,
    attacker_id: FactionId,
    defender_id: FactionId,
    troops: f64,
) -> ActionOutcome {
    let (Some(mut attacker), Some(mut defender)) = (
        ctx.registry.get(attacker_id).cloned(),
        ctx.registry.get(defender_id).cloned(),
    ) else {
        return deny(ctx.logs, "Attack denied: One or more factions not found".into());
    };
    if attacker_id == defender_id {
        return deny(ctx.logs, "Attack denied: A faction cannot attack itself".into());
    }
    if !valid_troops(troops) {
        return deny(ctx.logs, "Attack denied: Invalid attack value".into());
    }
    if troops > attacker.manpower {
        return deny(
            ctx.logs,
            format!("Attack denied: {} does not have enough manpower", attacker.name),
        );
    }

    let odds = resolve_faction_combat(&attacker, &defender, troops);
    let won = odds.attacker_wins();
    debug!(
        attacker = %attacker_id,
        defender = %defender_id,
        troops,
        win_odds = odds.win_odds,
        won,
        "faction attack resolved"
    );

    let logs = &mut *ctx.logs;
    let sev = severity(troops, defender.manpower, SEVERITY_CAP);
    let change_percent = sev * BASE_IMPACT;

    logs.push(LogEntry::warning(format!(
        "War outcome: {} {} against {}",
        attacker.name,
        if won { "Won" } else { "Lost" },
        defender.name
    )));

    // Manpower: both sides bleed.
    attacker.set_manpower(attacker.manpower - troops * ATTACKER_CASUALTIES);
    let defender_losses = if won {
        troops
    } else {
        troops * DEFENDER_CASUALTIES_ON_LOSS
    };
    defender.set_manpower(defender.manpower - defender_losses);
    for f in [&attacker, &defender] {
        logs.push(LogEntry::error(format!(
            "{} manpower reduced to {:.2}",
            f.name, f.manpower
        )));
    }

    // Trust always sours, more so on the defender's side.
    let d_trust = defender.trust(attacker_id) - sev * DEFENDER_TRUST_LOSS;
    defender.set_trust(attacker_id, d_trust);
    let a_trust = attacker.trust(defender_id) - sev * ATTACKER_TRUST_LOSS;
    attacker.set_trust(defender_id, a_trust);
    logs.push(LogEntry::error(format!(
        "{}'s trust in {} decreased to {:.2}",
        defender.name,
        attacker.name,
        defender.trust(attacker_id)
    )));
    logs.push(LogEntry::error(format!(
        "{}'s trust in {} decreased to {:.2}",
        attacker.name,
        defender.name,
        attacker.trust(defender_id)
    )));

    if won {
        mutate_dials(&mut attacker, &ATTACKER_WINS, change_percent, Voice::Named, logs);
        let table = with_revenge(&DEFENDER_LOSES, defender.dials.aggression);
        mutate_dials(&mut defender, &table, change_percent, Voice::Named, logs);
    } else {
        let table = with_revenge(&ATTACKER_LOSES, attacker.dials.aggression);
        mutate_dials(&mut attacker, &table, change_percent, Voice::Named, logs);
        mutate_dials(&mut defender, &DEFENDER_WINS, change_percent, Voice::Named, logs);
    }

    // Resources: the winner pays for the war but loots the loser.
    let a_before = attacker.resources;
    let d_before = defender.resources;
    if won {
        let loot = sev * d_before * LOOT_RATE;
        attacker.set_resources(a_before - sev * troops * WINNER_WAR_COST + loot);
        defender.set_resources(d_before - (sev * troops * DEFENDER_LOSS_COST + loot));
    } else {
        attacker.set_resources(a_before - sev * troops * LOSER_WAR_COST);
        defender.set_resources(d_before - sev * troops * HOLDOUT_WAR_COST);
    }
    let rose = attacker.resources > a_before;
    logs.push(LogEntry::change(
        rose,
        format!("{} resources changed to {:.2}", attacker.name, attacker.resources),
    ));
    logs.push(LogEntry::error(format!(
        "{} resources decreased to {:.2}",
        defender.name, defender.resources
    )));

    ctx.registry.commit(vec![attacker, defender]);
    ActionOutcome::Resolved { success: won }
}

/// The player attacks a faction with `troops`. Only the faction's side is
/// tracked; the outcome is reported from the faction's point of view.
pub fn player_attack(ctx: &mut TickContext, target: FactionId, troops: f64) -> ActionOutcome {
    let Some(mut faction) = ctx.registry.get(target).cloned() else {
        return deny(ctx.logs, "Attack denied: Faction not found".into());
    };
    if !valid_troops(troops) {
        return deny(ctx.logs, "Attack denied: Invalid attack value".into());
    }
    if troops > faction.manpower {
        return deny(
            ctx.logs,
            "Attack denied: Faction does not have enough manpower".into(),
        );
    }

    let odds = resolve_player_combat(&faction, troops);
    let faction_won = odds > 0.5;
    debug!(faction = %target, troops, win_odds = odds, faction_won, "player attack resolved");

    let logs = &mut *ctx.logs;
    let sev = severity(troops, faction.manpower, PLAYER_SEVERITY_CAP);
    let change_percent = sev * BASE_IMPACT;

    logs.push(LogEntry::warning(format!(
        "War outcome: Faction {}",
        if faction_won { "Won" } else { "Lost" }
    )));

    faction.set_manpower(faction.manpower - troops);
    logs.push(LogEntry::error(format!(
        "Manpower reduced to {:.2}",
        faction.manpower
    )));

    let trust = faction.trust(Counterpart::Player);
    let loss_rate = if faction_won {
        PLAYER_TRUST_LOSS_WON
    } else {
        PLAYER_TRUST_LOSS_LOST
    };
    faction.set_trust(Counterpart::Player, trust - change_percent * trust * loss_rate);
    narrate_value(
        logs,
        "Player Trust".into(),
        trust,
        faction.trust(Counterpart::Player),
    );

    let (table, war_cost) = if faction_won {
        (FACTION_REPELS_PLAYER, PLAYER_WAR_COST_WON)
    } else {
        (
            with_revenge(&FACTION_FALLS_TO_PLAYER, faction.dials.aggression),
            PLAYER_WAR_COST_LOST,
        )
    };
    mutate_dials(&mut faction, &table, change_percent, Voice::Implied, logs);

    let before = faction.resources;
    faction.set_resources(before - sev * troops * war_cost);
    narrate_value(logs, "Resources".into(), before, faction.resources);

    ctx.registry.commit(vec![faction]);
    ActionOutcome::Resolved {
        success: !faction_won,
    }
}

/// Copy `table`, signing its aggression row by the revenge branch.
fn with_revenge(table: &Multipliers, aggression: f64) -> [(Dial, f64); 5] {
    let mut out = [(Dial::Aggression, 0.0); 5];
    for (slot, &(dial, m)) in out.iter_mut().zip(table) {
        *slot = match dial {
            Dial::Aggression => (dial, revenge_multiplier(aggression, m)),
            _ => (dial, m),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dials;

    fn pair() -> (Faction, Faction) {
        let mut a = Faction::new(FactionId::new(1), "A");
        let mut b = Faction::new(FactionId::new(2), "B");
        a.dials = Dials::uniform(2.0);
        b.dials = Dials::uniform(2.0);
        a.manpower = 50.0;
        b.manpower = 50.0;
        (a, b)
    }

    #[test]
    fn equal_strength_without_boost_goes_to_defender() {
        let (a, b) = pair();
        let odds = resolve_faction_combat(&a, &b, 0.0);
        assert_eq!(odds.advantage, 0.5);
        assert_eq!(odds.boost, 0.0);
        assert_eq!(odds.win_odds, 0.5);
        assert!(!odds.attacker_wins());
    }

    #[test]
    fn committed_troops_tip_an_even_fight() {
        let (a, b) = pair();
        let odds = resolve_faction_combat(&a, &b, 10.0);
        assert!(odds.win_odds > 0.5);
        assert!((odds.boost - 10f64.powf(0.8) * 0.5).abs() < 1e-12);
    }

    #[test]
    fn defender_trusting_less_than_attacker_is_weaker() {
        let (mut a, mut b) = pair();
        a.set_trust(b.id, 0.9);
        b.set_trust(a.id, 0.1);
        let odds = resolve_faction_combat(&a, &b, 0.0);
        assert!(odds.defender_strength < odds.attacker_strength);
        assert!(odds.attacker_wins());
    }

    #[test]
    fn revenge_table_signs_only_aggression() {
        let angry = with_revenge(&DEFENDER_LOSES, 2.5);
        let calm = with_revenge(&DEFENDER_LOSES, 1.5);
        assert_eq!(angry[0], (Dial::Aggression, 2.0));
        assert_eq!(calm[0], (Dial::Aggression, -2.0));
        assert_eq!(calm[1], (Dial::Tech, 1.2));
    }

    #[test]
    fn player_odds_fall_with_more_troops() {
        let (a, _) = pair();
        assert!(resolve_player_combat(&a, 1.0) > resolve_player_combat(&a, 40.0));
    }
}
