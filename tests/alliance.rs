mod common;

use common::{messages, started_pair};
use faction_sim::model::{Actor, Counterpart};
use faction_sim::{FactionId, Scenario, Session};

fn strong(s: &mut Scenario, name: &str) -> FactionId {
    s.faction(name)
        .influence(3.0)
        .tech(3.0)
        .wealth(3.0)
        .endurance(3.0)
        .resources(40.0)
        .id()
}

fn strong_pair(trust: f64) -> (Session, FactionId, FactionId) {
    let mut s = Scenario::new();
    let a = strong(&mut s, "A");
    let b = strong(&mut s, "B");
    s.mutual_trust(a, b, trust);
    (s.into_session(31), a, b)
}

#[test]
fn trusted_partners_ally_and_prosper() {
    let (mut session, a, b) = strong_pair(0.9);

    let logs = session.alliance_request(Actor::Faction(a), b);
    let lines = messages(&logs);

    assert_eq!(
        lines[0],
        "Alliance proposal from A to B: Accepted (high levels of trust between factions)"
    );
    assert!(lines[1].starts_with("A's trust in B increased to"));
    assert!(lines[2].starts_with("B's trust in A increased to"));
    assert_eq!(lines[lines.len() - 2], "A resources increased to 42.00");
    assert_eq!(lines[lines.len() - 1], "B resources increased to 42.00");

    let registry = session.registry();
    assert!((registry.get(a).unwrap().trust(b) - 0.9875).abs() < 1e-9);
    assert!((registry.get(b).unwrap().trust(a) - 0.998).abs() < 1e-9);
}

#[test]
fn one_sided_distrust_still_gates() {
    let mut s = Scenario::new();
    let a = s.faction("A").resources(40.0).id();
    let b = s.faction("B").resources(40.0).id();
    // The recipient is happy to ally; the initiator is not.
    s.faction_mut(a).trust_in(b, 0.2);
    s.faction_mut(b).trust_in(a, 0.9);
    let mut session = s.into_session(32);

    let logs = session.alliance_request(Actor::Faction(a), b);

    assert!(logs[0]
        .message
        .ends_with("Rejected (historical distrust impeded cooperation)"));
    assert_eq!(session.registry().get(a).unwrap().resources, 40.0);
}

#[test]
fn desperate_faction_welcomes_trusted_player() {
    let mut s = Scenario::new();
    let a = s.faction("A").trust_in_player(0.9).manpower(10.0).id();
    s.faction("B");
    let mut session = s.into_session(33);

    let logs = session.alliance_request(Actor::Player, a);

    assert_eq!(logs[0].message, "Alliance request: Accepted (high mutual trust)");
    assert_eq!(logs[1].message, "Player Trust increased to 0.97");
    let f = session.registry().get(a).unwrap();
    assert!((f.trust(Counterpart::Player) - 0.97).abs() < 1e-9);
    assert_eq!(f.resources, 1.0);
}

#[test]
fn hostile_faction_turns_the_player_away() {
    let mut s = Scenario::new();
    let a = s.faction("A").aggression(3.0).id();
    s.faction("B");
    let mut session = s.into_session(34);

    let logs = session.alliance_request(Actor::Player, a);

    assert_eq!(
        messages(&logs),
        [
            "Alliance request: Rejected (aggressive stance)",
            "Player Trust decreased to 0.38",
            "Aggression increased to 3.00",
            "Influence decreased to 1.00",
        ]
    );
}

#[test]
fn alliance_before_start_is_denied() {
    let mut session = Session::new(35);
    let ids = session.registry().ids();
    let logs = session.alliance_request(Actor::Faction(ids[0]), ids[1]);
    assert_eq!(messages(&logs), ["Alliance denied: The game has not started"]);

    let (mut started, a, _) = started_pair(36);
    let logs = started.alliance_request(Actor::Faction(a), a);
    assert_eq!(messages(&logs), ["Alliance denied: A faction cannot ally with itself"]);
}
