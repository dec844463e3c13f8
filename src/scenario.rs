use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::{Counterpart, Dial, Faction, FactionId, FactionRegistry};
use crate::sim::{Session, setup};

/// Builder for hand-tuned registries, mostly for tests and demos.
///
/// ```ignore
/// let mut s = Scenario::new();
/// let red = s.faction("Red").aggression(3.0).manpower(50.0).id();
/// let blue = s.faction("Blue").tech(3.0).id();
/// s.mutual_trust(red, blue, 0.2);
/// let session = s.into_session(42);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    registry: FactionRegistry,
}

// -- Builder-style ref types --

/// Typed reference to a faction in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::faction`] (creation) or [`Scenario::faction_mut`] (mutation).
/// Call [`.id()`](FactionRef::id) to terminate the chain and extract the faction id.
pub struct FactionRef<'a> {
    scenario: &'a mut Scenario,
    id: FactionId,
}

impl FactionRef<'_> {
    fn edit(mut self, f: impl FnOnce(&mut Faction)) -> Self {
        if let Some(faction) = self.scenario.registry.get_mut(self.id) {
            f(faction);
        }
        self
    }

    fn dial(self, dial: Dial, v: f64) -> Self {
        self.edit(|f| f.dials.set(dial, v))
    }

    pub fn aggression(self, v: f64) -> Self {
        self.dial(Dial::Aggression, v)
    }

    pub fn influence(self, v: f64) -> Self {
        self.dial(Dial::Influence, v)
    }

    pub fn wealth(self, v: f64) -> Self {
        self.dial(Dial::Wealth, v)
    }

    pub fn tech(self, v: f64) -> Self {
        self.dial(Dial::Tech, v)
    }

    pub fn endurance(self, v: f64) -> Self {
        self.dial(Dial::Endurance, v)
    }

    pub fn manpower(self, v: f64) -> Self {
        self.edit(|f| f.set_manpower(v))
    }

    pub fn resources(self, v: f64) -> Self {
        self.edit(|f| f.set_resources(v))
    }

    /// Trust this faction holds towards `other`. One direction only.
    pub fn trust_in(self, other: FactionId, v: f64) -> Self {
        self.edit(|f| f.set_trust(other, v))
    }

    pub fn trust_in_player(self, v: f64) -> Self {
        self.edit(|f| f.set_trust(Counterpart::Player, v))
    }

    /// Escape hatch: apply an arbitrary closure to the faction.
    pub fn with(self, f: impl FnOnce(&mut Faction)) -> Self {
        self.edit(f)
    }

    /// Terminate the chain and return the faction id.
    pub fn id(self) -> FactionId {
        self.id
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a faction with minimum dials and neutral relations.
    pub fn faction(&mut self, name: &str) -> FactionRef<'_> {
        let id = self.registry.add_faction(Some(name.to_string()));
        FactionRef { scenario: self, id }
    }

    /// Continue editing a faction added earlier.
    pub fn faction_mut(&mut self, id: FactionId) -> FactionRef<'_> {
        FactionRef { scenario: self, id }
    }

    /// Set trust in both directions between `a` and `b`.
    pub fn mutual_trust(&mut self, a: FactionId, b: FactionId, v: f64) -> &mut Self {
        self.faction_mut(a).trust_in(b, v);
        self.faction_mut(b).trust_in(a, v);
        self
    }

    /// Derive starting manpower, resources and relationships from the dials
    /// set so far. Later edits override the derived values.
    pub fn start_game(&mut self) -> &mut Self {
        setup::start_game(&mut self.registry);
        self
    }

    pub fn registry(&self) -> &FactionRegistry {
        &self.registry
    }

    // -- Output --

    /// Consume the scenario and return the constructed registry.
    pub fn build(self) -> FactionRegistry {
        self.registry
    }

    /// Seeded session in the running phase. The registry is used as built;
    /// call [`Scenario::start_game`] first to derive starting values.
    pub fn into_session(self, seed: u64) -> Session {
        Session::from_registry(self.registry, SmallRng::seed_from_u64(seed), true)
    }
}
