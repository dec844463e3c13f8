mod common;

use common::{assert_in_bounds, messages, registry_state, started_pair};
use faction_sim::Scenario;
use faction_sim::model::{Actor, Counterpart, Severity};

#[test]
fn trusting_faction_accepts_player_offer() {
    let mut s = Scenario::new();
    let a = s.faction("A").resources(50.0).trust_in_player(0.9).id();
    s.faction("B");
    let mut session = s.into_session(21);

    let logs = session.trade(Actor::Player, a, "5");
    let lines = messages(&logs);

    assert_eq!(lines[0], "Trade with value 5: Accepted (strong trust in the player)");
    assert_eq!(lines[1], "Player Trust increased to 0.90");
    assert_eq!(
        &lines[2..6].iter().map(|l| l.split(' ').next().unwrap()).collect::<Vec<_>>(),
        &["Wealth", "Influence", "Aggression", "Tech"]
    );
    assert_eq!(lines[6], "Resources increased to 56.00");

    let f = session.registry().get(a).unwrap();
    // Minimum tech: the faction gets 20% on top.
    assert!((f.resources - 56.0).abs() < 1e-9);
    assert!((f.trust(Counterpart::Player) - 0.9025).abs() < 1e-9);
}

#[test]
fn distrustful_faction_rejects_player_offer() {
    let mut s = Scenario::new();
    let a = s.faction("A").resources(50.0).trust_in_player(0.1).id();
    s.faction("B");
    let mut session = s.into_session(22);

    let logs = session.trade(Actor::Player, a, "5");

    assert_eq!(
        messages(&logs),
        [
            "Trade with value 5: Rejected (low trust prevented agreement)",
            "Player Trust decreased to 0.10",
            "Aggression increased to 1.01",
        ]
    );
    let f = session.registry().get(a).unwrap();
    assert_eq!(f.resources, 50.0);
    assert!(f.trust(Counterpart::Player) < 0.1);
}

#[test]
fn lukewarm_factions_reject_and_cool_off() {
    let (mut session, a, b) = started_pair(23);

    let logs = session.trade(Actor::Faction(a), b, "5");
    let lines = messages(&logs);

    assert_eq!(
        lines[0],
        "Trade proposal from A to B with value 5: Rejected (insufficient trading incentives)"
    );
    assert!(lines[1].starts_with("A's trust slightly decreased to"));
    assert!(lines[2].starts_with("B's trust slightly decreased to"));
    assert_eq!(lines[3], "A aggression increased to 1.02");

    let registry = session.registry();
    assert_eq!(registry.get(a).unwrap().resources, 33.0);
    assert_eq!(registry.get(b).unwrap().resources, 33.0);
    assert!(registry.get(a).unwrap().trust(b) < 0.4);
    assert!(registry.get(b).unwrap().trust(a) < 0.4);
}

#[test]
fn offers_above_half_the_treasury_are_denied() {
    let (mut session, a, b) = started_pair(24);
    let before = registry_state(session.registry());

    let logs = session.trade(Actor::Faction(a), b, "20");

    assert_eq!(
        messages(&logs),
        ["Trade denied: Cannot trade more than 50% of available resources"]
    );
    assert_eq!(logs[0].severity, Severity::Warning);
    assert_eq!(registry_state(session.registry()), before);
}

#[test]
fn accepted_trade_moves_exactly_the_offered_amount() {
    let mut s = Scenario::new();
    let a = s.faction("A").tech(3.0).wealth(2.0).resources(60.0).id();
    let b = s.faction("B").wealth(3.0).influence(3.0).resources(30.0).id();
    s.mutual_trust(a, b, 0.9);
    let mut session = s.into_session(25);

    let logs = session.trade(Actor::Faction(a), b, "12");
    assert!(logs[0].message.contains("Accepted"), "{:?}", messages(&logs));

    let registry = session.registry();
    assert_eq!(registry.get(a).unwrap().resources, 48.0);
    // Tech gap of 2: bonus 1.4.
    assert!((registry.get(b).unwrap().resources - (30.0 + 12.0 * 1.4)).abs() < 1e-9);
    assert!(registry.get(a).unwrap().trust(b) > 0.9);
    assert!(registry.get(b).unwrap().trust(a) > 0.9);
    assert_in_bounds(registry);
}
