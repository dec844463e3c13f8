use rand::RngCore;
use tracing::{info, info_span};

use super::decision::TickOutcome;
use super::session::{Session, TickReport};

/// Drive `ticks` decision cycles on a started session.
///
/// With a seeded session the same registry always produces the same reports.
pub fn run<R: RngCore>(session: &mut Session<R>, ticks: usize) -> Vec<TickReport> {
    let span = info_span!("run", ticks);
    let _enter = span.enter();

    let reports: Vec<TickReport> = (0..ticks).map(|_| session.tick()).collect();

    let interactions = reports
        .iter()
        .filter(|r| matches!(r.outcome, TickOutcome::Interaction { .. }))
        .count();
    let recruitments = reports
        .iter()
        .filter(|r| matches!(r.outcome, TickOutcome::Recruitment(_)))
        .count();
    info!(interactions, recruitments, "run finished");
    reports
}
