use std::collections::BTreeMap;

use serde::Serialize;

use super::faction::{Counterpart, Faction, FactionId};
use crate::id::IdGenerator;

/// Canonical id → faction mapping. The single source of truth for the session.
///
/// Iteration is in id order, which is creation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FactionRegistry {
    factions: BTreeMap<FactionId, Faction>,
    #[serde(skip)]
    id_gen: IdGenerator,
}

impl FactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two-faction setup every new game starts from.
    pub fn with_default_factions() -> Self {
        let mut registry = Self::new();
        registry.add_faction(None);
        registry.add_faction(None);
        registry
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }

    pub fn contains(&self, id: FactionId) -> bool {
        self.factions.contains_key(&id)
    }

    pub fn get(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values()
    }

    pub fn ids(&self) -> Vec<FactionId> {
        self.factions.keys().copied().collect()
    }

    /// Create a faction with default dials and neutral relations, retrofitting
    /// every existing faction with a neutral entry for it.
    pub fn add_faction(&mut self, name: Option<String>) -> FactionId {
        let id = self.id_gen.next_id();
        let name = name.unwrap_or_else(|| format!("Faction {}", id.number()));
        self.insert(Faction::new(id, name));
        id
    }

    /// Insert a fully built faction. Relationship maps on both sides are
    /// topped up with neutral entries; values already present are kept.
    pub fn insert(&mut self, mut faction: Faction) {
        let id = faction.id;
        faction.ensure_relation(Counterpart::Player);
        for (other_id, other) in self.factions.iter_mut() {
            if *other_id == id {
                continue;
            }
            other.ensure_relation(Counterpart::Faction(id));
            faction.ensure_relation(Counterpart::Faction(*other_id));
        }
        if id.number() >= self.id_gen.peek() {
            self.id_gen = IdGenerator::starting_from(id.number() + 1);
        }
        self.factions.insert(id, faction);
    }

    /// Remove a faction and scrub it from everyone else's relationship maps.
    pub fn remove(&mut self, id: FactionId) -> Option<Faction> {
        let removed = self.factions.remove(&id)?;
        for other in self.factions.values_mut() {
            other.forget_relation(Counterpart::Faction(id));
        }
        Some(removed)
    }

    /// Replace every given faction in one step. Either all are written or,
    /// if any id is unknown, none are.
    pub fn commit(&mut self, updated: Vec<Faction>) -> bool {
        if updated.iter().any(|f| !self.factions.contains_key(&f.id)) {
            return false;
        }
        for faction in updated {
            self.factions.insert(faction.id, faction);
        }
        true
    }

    /// Trust `from` holds towards `to`, neutral when either side is unknown.
    pub fn trust(&self, from: FactionId, to: impl Into<Counterpart>) -> f64 {
        self.factions
            .get(&from)
            .map(|f| f.trust(to))
            .unwrap_or(super::faction::NEUTRAL_TRUST)
    }
}
