//! Read-only view of the registry for rendering.

use std::collections::BTreeMap;

use serde::Serialize;

use super::faction::{Counterpart, Dials, FactionId};
use super::registry::FactionRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactionView {
    pub id: FactionId,
    pub name: String,
    pub dials: Dials,
    pub manpower: f64,
    pub resources: f64,
    pub trust_towards_player: f64,
    pub trust_towards_factions: BTreeMap<FactionId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub started: bool,
    pub factions: Vec<FactionView>,
}

impl Snapshot {
    pub fn capture(registry: &FactionRegistry, started: bool) -> Self {
        let factions = registry
            .iter()
            .map(|f| FactionView {
                id: f.id,
                name: f.name.clone(),
                dials: f.dials,
                manpower: f.manpower,
                resources: f.resources,
                trust_towards_player: f.trust(Counterpart::Player),
                trust_towards_factions: f
                    .trust_towards
                    .iter()
                    .filter_map(|(k, v)| match k {
                        Counterpart::Faction(id) => Some((*id, *v)),
                        Counterpart::Player => None,
                    })
                    .collect(),
            })
            .collect();
        Self { started, factions }
    }

    pub fn faction(&self, id: FactionId) -> Option<&FactionView> {
        self.factions.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_expected_shape() {
        let registry = FactionRegistry::with_default_factions();
        let snap = Snapshot::capture(&registry, false);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["started"], false);
        assert_eq!(json["factions"][0]["id"], "faction-1");
        assert_eq!(json["factions"][0]["trust_towards_player"], 0.5);
        assert_eq!(json["factions"][0]["trust_towards_factions"]["faction-2"], 0.5);
        assert_eq!(json["factions"][1]["dials"]["aggression"], 1.0);
    }
}
