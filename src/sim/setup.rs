//! Derive starting state from the configured dials.

use tracing::info;

use crate::model::{Counterpart, Dials, Faction, FactionRegistry};

/// `round((aggression + endurance) / 6 * 100)`
pub fn starting_manpower(d: &Dials) -> f64 {
    ((d.aggression + d.endurance) / 6.0 * 100.0).round()
}

/// `round((2 * wealth + tech + influence) / 12 * 100)`
pub fn starting_resources(d: &Dials) -> f64 {
    ((2.0 * d.wealth + d.tech + d.influence) / 12.0 * 100.0).round()
}

pub fn starting_player_trust(d: &Dials) -> f64 {
    (d.wealth / 3.0 * 0.3 + d.tech / 3.0 * 0.2 - d.aggression / 3.0 * 0.2 + 0.2).clamp(0.0, 1.0)
}

pub fn starting_faction_trust(d: &Dials) -> f64 {
    (d.endurance / 3.0 * 0.3 + d.influence / 3.0 * 0.3 - d.aggression / 3.0 * 0.3 + 0.3)
        .clamp(0.0, 1.0)
}

fn materialize(faction: &mut Faction, others: &[Counterpart]) {
    faction.manpower = starting_manpower(&faction.dials);
    faction.resources = starting_resources(&faction.dials);

    let towards_player = starting_player_trust(&faction.dials);
    let towards_factions = starting_faction_trust(&faction.dials);
    faction.trust_towards.clear();
    faction.rivalry_with.clear();
    for &key in others {
        let trust = match key {
            Counterpart::Player => towards_player,
            Counterpart::Faction(_) => towards_factions,
        };
        faction.trust_towards.insert(key, trust);
        faction.rivalry_with.insert(key, 1.0 - trust);
    }
}

/// Compute manpower, resources, and the trust/rivalry matrices for every
/// faction from its dials. Existing relationship values are replaced.
pub fn start_game(registry: &mut FactionRegistry) {
    let ids = registry.ids();
    let updated: Vec<Faction> = registry
        .iter()
        .map(|f| {
            let mut f = f.clone();
            let others: Vec<Counterpart> = std::iter::once(Counterpart::Player)
                .chain(
                    ids.iter()
                        .filter(|&&id| id != f.id)
                        .map(|&id| Counterpart::Faction(id)),
                )
                .collect();
            materialize(&mut f, &others);
            f
        })
        .collect();
    registry.commit(updated);
    info!(factions = registry.len(), "game started");
}
