pub mod alliance;
pub mod assessment;
pub mod combat;
mod context;
pub mod decision;
mod interaction;
pub mod mutator;
pub mod recruitment;
mod runner;
mod session;
pub mod setup;
pub mod trade;

pub use context::{InteractionMemory, TickContext};
pub use decision::{ActionScores, TickOutcome};
pub use interaction::perform;
pub use recruitment::Recruitment;
pub use runner::run;
pub use session::{Phase, Session, TickReport};
