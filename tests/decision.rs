mod common;

use common::{messages, registry_state, started_pair};
use faction_sim::model::ActionOutcome;
use faction_sim::{EngineConfig, Scenario, Session, TickOutcome, run};

fn started(seed: u64, engine: EngineConfig) -> Session {
    let mut session = Session::new(seed).with_engine(engine);
    session.add_faction(Some("Guild".into())).unwrap();
    session.start_game().unwrap();
    session
}

#[test]
fn same_seed_same_history() {
    let mut first = started(99, EngineConfig::default());
    let mut second = started(99, EngineConfig::default());

    let a = run(&mut first, 40);
    let b = run(&mut second, 40);

    assert_eq!(a, b);
    assert_eq!(registry_state(first.registry()), registry_state(second.registry()));
    assert_eq!(first.journal(), second.journal());
}

#[test]
fn tick_before_start_does_nothing() {
    let mut session = Session::new(1);
    let report = session.tick();
    assert_eq!(report.outcome, TickOutcome::Idle);
    assert_eq!(messages(&report.logs), ["Simulation denied: The game has not started"]);
}

#[test]
fn lone_faction_has_nobody_to_deal_with() {
    let mut s = Scenario::new();
    s.faction("Hermits");
    let mut session = s.into_session(2);

    let report = session.tick();

    assert_eq!(report.outcome, TickOutcome::Idle);
    assert_eq!(
        messages(&report.logs),
        ["Faction interaction requires at least two factions"]
    );
}

#[test]
fn certain_recruitment_at_minimum_dials() {
    let engine = EngineConfig {
        recruitment_chance: 1.0,
        ..EngineConfig::default()
    };
    let mut session = started(3, engine);

    let report = session.tick();

    let TickOutcome::Recruitment(r) = &report.outcome else {
        panic!("expected recruitment, got {:?}", report.outcome);
    };
    assert_eq!(r.outcome, ActionOutcome::Resolved { success: true });
    assert_eq!(r.gained, 6.0);
    assert_eq!(r.cost, 6.0);
    assert!(report.logs[0].message.ends_with("is seeking to expand their forces..."));
    let f = session.registry().get(r.faction).unwrap();
    assert_eq!(f.manpower, 39.0);
    assert_eq!(f.resources, 27.0);
}

#[test]
fn interaction_ticks_narrate_the_decision_first() {
    let engine = EngineConfig {
        recruitment_chance: 0.0,
        ..EngineConfig::default()
    };
    let mut session = started(4, engine);

    for _ in 0..15 {
        let report = session.tick();
        let TickOutcome::Interaction {
            initiator, target, ..
        } = report.outcome
        else {
            panic!("expected an interaction, got {:?}", report.outcome);
        };
        assert_ne!(initiator, target);
        assert!(report.logs[0].message.contains(" decided to "));
        assert!(report.logs[1].message.starts_with("Decision factors - Attack: "));
        assert_eq!(session.last_initiator(), Some(initiator));
    }
}

#[test]
fn journal_collects_every_tick() {
    let (mut session, _, _) = started_pair(6);
    let reports = run(&mut session, 10);
    let total: usize = reports.iter().map(|r| r.logs.len()).sum();
    assert_eq!(session.journal().len(), total);
}
