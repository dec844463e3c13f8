use thiserror::Error;

use crate::model::FactionId;

/// Rejected configuration. Only raised before the game starts (or by
/// configuration calls made after it).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a game needs at least 2 factions, got {0}")]
    TooFewFactions(usize),
    #[error("{dial} must be an integer between 1 and 3, got {value}")]
    DialOutOfRange { dial: &'static str, value: i64 },
    #[error("faction {0} does not exist")]
    UnknownFaction(FactionId),
    #[error("the game has already started; configuration is frozen")]
    AlreadyStarted,
    #[error("invalid game configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejected player input, caught before it reaches the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("value must be a positive whole number, got {0}")]
    NotPositive(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a faction id")]
    UnknownTarget(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("log playback has stopped")]
    Closed,
    #[error("log playback task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
