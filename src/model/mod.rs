pub mod action;
pub mod faction;
pub mod log;
pub mod registry;
pub mod snapshot;

pub use action::{
    Action, ActionKind, ActionOutcome, ActionResult, Actor, InteractionKind, PlayerInteraction,
};
pub use faction::{
    Counterpart, DIAL_MAX, DIAL_MIDPOINT, DIAL_MIN, Dial, Dials, Faction, FactionId, NEUTRAL_TRUST,
    normalized,
};
pub use log::{LogEntry, Severity};
pub use registry::FactionRegistry;
pub use snapshot::{FactionView, Snapshot};
