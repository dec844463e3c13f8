//! Resource → manpower conversion.

use rand::Rng;
use tracing::debug;

use super::context::TickContext;
use crate::model::{ActionOutcome, Faction, FactionId, LogEntry};

// --- Eligibility ---
const ELIGIBILITY_THRESHOLD: f64 = 0.7;
const ELIGIBILITY_NOISE: f64 = 0.3;

// --- Cost and yield ---
const BASE_RATE: f64 = 5.0;
const COST_BASE: f64 = 0.8;

/// What one recruitment produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Recruitment {
    pub faction: FactionId,
    pub outcome: ActionOutcome,
    pub gained: f64,
    pub cost: f64,
}

/// Deterministic part of the eligibility score.
pub fn eligibility(f: &Faction) -> f64 {
    let need = if f.manpower < 30.0 {
        0.7
    } else if f.manpower < 50.0 {
        0.3
    } else {
        0.1
    };
    let aggression = if f.dials.aggression > 2.0 {
        0.4
    } else if f.dials.aggression > 1.5 {
        0.2
    } else {
        0.1
    };
    let surplus = if f.resources > 15.0 { 0.3 } else { 0.0 };
    let wealth = if f.dials.wealth > 2.0 {
        0.3
    } else if f.dials.wealth > 1.5 {
        0.2
    } else {
        0.1
    };
    need + aggression + surplus + wealth
}

pub fn recruitment_cost(manpower: f64) -> f64 {
    (BASE_RATE * (COST_BASE + manpower / 100.0)).ceil()
}

/// Manpower gained for one recruitment, after quality.
pub fn recruitment_yield(f: &Faction) -> f64 {
    let d = &f.dials;
    let amount = (BASE_RATE * (1.0 + (d.wealth - 1.0) / 2.0)
        + ((d.influence - 1.5) * 2.0).max(0.0)
        + (d.tech - 1.5).max(0.0))
    .round();
    let quality = (0.9 + d.tech / 6.0 + d.wealth / 8.0).clamp(0.8, 1.5);
    (amount * quality).round()
}

fn efficiency_label(gained: f64, cost: f64) -> &'static str {
    let ratio = gained / cost * BASE_RATE;
    if ratio > 1.5 {
        "highly efficient"
    } else if ratio > 1.0 {
        "efficient"
    } else if ratio > 0.7 {
        "adequate"
    } else {
        "inefficient"
    }
}

/// Pick a faction that wants to recruit, if any. Draws one noise sample per
/// faction in id order, then one for the choice.
pub fn choose_recruiter(ctx: &mut TickContext) -> Option<FactionId> {
    let eligible: Vec<FactionId> = ctx
        .registry
        .iter()
        .map(|f| (f.id, eligibility(f)))
        .collect::<Vec<_>>()
        .into_iter()
        .filter(|&(_, base)| {
            base + ctx.rng.random_range(0.0..ELIGIBILITY_NOISE) > ELIGIBILITY_THRESHOLD
        })
        .map(|(id, _)| id)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    let pick = ctx.rng.random_range(0..eligible.len());
    Some(eligible[pick])
}

/// Spend resources on troops for `id`. Denied, without any state change, when
/// the faction cannot pay.
pub fn recruit(ctx: &mut TickContext, id: FactionId) -> Recruitment {
    let Some(mut faction) = ctx.registry.get(id).cloned() else {
        let reason = "Recruitment denied: Faction not found".to_string();
        ctx.logs.push(LogEntry::warning(reason.clone()));
        return Recruitment {
            faction: id,
            outcome: ActionOutcome::Denied { reason },
            gained: 0.0,
            cost: 0.0,
        };
    };

    ctx.logs.push(LogEntry::info(format!(
        "{} is seeking to expand their forces...",
        faction.name
    )));

    let cost = recruitment_cost(faction.manpower);
    if faction.resources < cost {
        let reason = format!(
            "{} lacks resources for recruitment ({cost} needed)",
            faction.name
        );
        debug!(faction = %id, cost, resources = faction.resources, "recruitment denied");
        ctx.logs.push(LogEntry::warning(reason.clone()));
        return Recruitment {
            faction: id,
            outcome: ActionOutcome::Denied { reason },
            gained: 0.0,
            cost,
        };
    }

    let gained = recruitment_yield(&faction);
    faction.set_manpower(faction.manpower + gained);
    faction.set_resources(faction.resources - cost);
    debug!(faction = %id, gained, cost, "recruited");

    ctx.logs.push(LogEntry::success(format!(
        "{} recruited {gained} manpower ({})",
        faction.name,
        efficiency_label(gained, cost)
    )));
    ctx.logs.push(LogEntry::success(format!(
        "{} manpower increased to {:.1}",
        faction.name, faction.manpower
    )));
    ctx.logs.push(LogEntry::info(format!(
        "{} spent {cost} resources on recruitment",
        faction.name
    )));
    ctx.logs.push(LogEntry::error(format!(
        "{} resources decreased to {:.1}",
        faction.name, faction.resources
    )));

    ctx.registry.commit(vec![faction]);
    Recruitment {
        faction: id,
        outcome: ActionOutcome::Resolved { success: true },
        gained,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dials;

    #[test]
    fn cost_scales_with_manpower() {
        assert_eq!(recruitment_cost(0.0), 4.0);
        assert_eq!(recruitment_cost(33.0), 6.0);
        assert_eq!(recruitment_cost(100.0), 9.0);
    }

    #[test]
    fn yield_at_minimum_dials() {
        let f = Faction::new(FactionId::new(1), "A");
        // amount 5, quality 0.9 + 1/6 + 1/8 ≈ 1.19
        assert_eq!(recruitment_yield(&f), 6.0);
    }

    #[test]
    fn yield_at_maximum_dials() {
        let mut f = Faction::new(FactionId::new(1), "A");
        f.dials = Dials::uniform(3.0);
        // amount round(10 + 3 + 1.5) = 15 (ties away from zero), quality clamped 1.5
        assert_eq!(recruitment_yield(&f), 23.0);
    }

    #[test]
    fn weak_hawkish_faction_is_eligible_without_noise() {
        let mut f = Faction::new(FactionId::new(1), "A");
        f.manpower = 10.0;
        f.resources = 20.0;
        f.dials.aggression = 2.5;
        assert!(eligibility(&f) > ELIGIBILITY_THRESHOLD);
    }

    #[test]
    fn strong_content_faction_never_qualifies() {
        let mut f = Faction::new(FactionId::new(1), "A");
        f.manpower = 80.0;
        f.resources = 5.0;
        assert!(eligibility(&f) + ELIGIBILITY_NOISE <= ELIGIBILITY_THRESHOLD);
    }

    #[test]
    fn labels() {
        assert_eq!(efficiency_label(6.0, 4.0), "highly efficient");
        assert_eq!(efficiency_label(1.0, 4.0), "efficient");
        assert_eq!(efficiency_label(1.0, 6.0), "adequate");
        assert_eq!(efficiency_label(1.0, 9.0), "inefficient");
    }
}
