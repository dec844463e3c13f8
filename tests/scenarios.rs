mod common;

use common::{messages, registry_state, started_pair};
use faction_sim::model::{Action, ActionKind, ActionOutcome, Actor, Severity};
use faction_sim::sim::{InteractionMemory, TickContext, recruitment};
use faction_sim::{Scenario, Session};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn minimum_dials_start_with_a_third_of_everything() {
    let mut session = Session::new(1);
    session.start_game().unwrap();
    for f in session.registry().iter() {
        assert_eq!(f.manpower, 33.0);
        assert_eq!(f.resources, 33.0);
    }
}

#[test]
fn attack_with_more_troops_than_manpower_is_denied() {
    let mut s = Scenario::new();
    let a = s.faction("A").manpower(50.0).id();
    let b = s.faction("B").manpower(50.0).id();
    let mut session = s.into_session(7);
    let before = registry_state(session.registry());

    let logs = session.attack(Actor::Faction(a), b, "60");

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].severity, Severity::Warning);
    assert!(logs[0].message.contains("does not have enough manpower"));
    assert_eq!(registry_state(session.registry()), before);
}

#[test]
fn trusted_trade_with_tech_gap_is_accepted() {
    let mut s = Scenario::new();
    let a = s.faction("A").wealth(3.0).tech(3.0).resources(40.0).id();
    let b = s.faction("B").resources(33.0).id();
    s.faction_mut(b).trust_in(a, 0.8);
    let mut session = s.into_session(3);

    let logs = session.trade(Actor::Faction(a), b, "10");

    assert!(
        logs[0].message.starts_with("Trade proposal from A to B with value 10: Accepted"),
        "{:?}",
        messages(&logs)
    );
    let registry = session.registry();
    assert_eq!(registry.get(a).unwrap().resources, 30.0);
    // Bonus is 1.2 plus 0.1 per point of tech gap, capped at 0.3.
    assert!((registry.get(b).unwrap().resources - 47.0).abs() < 1e-9);
}

#[test]
fn distrust_blocks_an_otherwise_ideal_alliance() {
    let mut s = Scenario::new();
    let a = s
        .faction("A")
        .influence(3.0)
        .tech(3.0)
        .wealth(3.0)
        .endurance(3.0)
        .resources(40.0)
        .id();
    let b = s
        .faction("B")
        .influence(3.0)
        .tech(3.0)
        .wealth(3.0)
        .endurance(3.0)
        .resources(40.0)
        .id();
    s.mutual_trust(a, b, 0.1);
    let mut session = s.into_session(4);

    let logs = session.alliance_request(Actor::Faction(a), b);

    assert_eq!(
        logs[0].message,
        "Alliance proposal from A to B: Rejected (historical distrust impeded cooperation)"
    );
    let registry = session.registry();
    assert!(registry.get(a).unwrap().trust(b) < 0.1);
    assert!(registry.get(b).unwrap().trust(a) < 0.1);
    assert_eq!(registry.get(a).unwrap().resources, 40.0);
}

#[test]
fn exact_tie_goes_to_the_defender() {
    let (mut session, a, b) = started_pair(5);
    let before = registry_state(session.registry());

    let result = session.perform(Action {
        actor: Actor::Faction(a),
        target: b,
        kind: ActionKind::Attack { troops: 0.0 },
    });

    assert_eq!(result.outcome, ActionOutcome::Resolved { success: false });
    assert_eq!(result.logs[0].message, "War outcome: A Lost against B");
    // No troops committed: nothing to lose, nothing to mutate.
    assert_eq!(registry_state(session.registry()), before);
}

#[test]
fn broke_faction_cannot_recruit() {
    let mut s = Scenario::new();
    let a = s.faction("A").manpower(33.0).resources(5.0).id();
    s.faction("B");
    let mut registry = s.build();
    let before = registry_state(&registry);

    let mut rng = SmallRng::seed_from_u64(6);
    let mut memory = InteractionMemory::default();
    let mut logs = Vec::new();
    let mut ctx = TickContext {
        registry: &mut registry,
        rng: &mut rng,
        memory: &mut memory,
        logs: &mut logs,
    };
    let result = recruitment::recruit(&mut ctx, a);

    assert!(result.outcome.is_denied());
    assert_eq!(result.gained, 0.0);
    assert_eq!(result.cost, 6.0);
    assert_eq!(
        messages(&logs),
        [
            "A is seeking to expand their forces...",
            "A lacks resources for recruitment (6 needed)",
        ]
    );
    assert_eq!(logs[1].severity, Severity::Warning);
    assert_eq!(registry_state(&registry), before);
}
