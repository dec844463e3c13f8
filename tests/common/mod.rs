#![allow(dead_code)]

use faction_sim::model::{Counterpart, FactionRegistry, LogEntry};
use faction_sim::{FactionId, Scenario, Session};

/// Two started factions at minimum dials, "A" and "B".
pub fn started_pair(seed: u64) -> (Session, FactionId, FactionId) {
    let mut s = Scenario::new();
    let a = s.faction("A").id();
    let b = s.faction("B").id();
    s.start_game();
    (s.into_session(seed), a, b)
}

pub fn messages(logs: &[LogEntry]) -> Vec<&str> {
    logs.iter().map(|l| l.message.as_str()).collect()
}

/// Structural copy of the registry, for before/after comparisons.
pub fn registry_state(registry: &FactionRegistry) -> serde_json::Value {
    serde_json::to_value(registry).unwrap()
}

pub fn assert_in_bounds(registry: &FactionRegistry) {
    for f in registry.iter() {
        for (dial, v) in [
            ("aggression", f.dials.aggression),
            ("influence", f.dials.influence),
            ("wealth", f.dials.wealth),
            ("tech", f.dials.tech),
            ("endurance", f.dials.endurance),
        ] {
            assert!(
                (1.0..=3.0).contains(&v),
                "faction '{}' {dial} {v} out of bounds",
                f.name
            );
        }
        for (key, t) in &f.trust_towards {
            assert!(
                (0.0..=1.0).contains(t),
                "faction '{}' trust towards {key} {t} out of bounds",
                f.name
            );
        }
        assert!(f.manpower >= 0.0, "faction '{}' manpower {}", f.name, f.manpower);
        assert!(f.resources >= 0.0, "faction '{}' resources {}", f.name, f.resources);
        assert!(f.trust_towards.contains_key(&Counterpart::Player));
    }
}
