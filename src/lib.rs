pub mod command;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod playback;
pub mod scenario;
pub mod sim;

pub use command::Command;
pub use config::{EngineConfig, FactionSetup, GameConfig};
pub use error::{CommandError, ConfigError, PlaybackError};
pub use id::IdGenerator;
pub use model::{
    Action, ActionKind, ActionOutcome, ActionResult, Actor, Counterpart, Dial, Faction, FactionId,
    FactionRegistry, InteractionKind, LogEntry, Severity, Snapshot,
};
pub use playback::{DisplaySink, JsonlSink, LogPanel, LogPlayback, PlaybackControl};
pub use scenario::Scenario;
pub use sim::{Phase, Session, TickOutcome, TickReport, run};
