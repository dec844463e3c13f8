use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::Dial;

/// Engine knobs that are not part of a faction's configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chance per tick that the decision engine considers recruitment first.
    pub recruitment_chance: f64,
    /// Delay between two revealed log entries.
    pub log_interval_ms: u64,
    /// Capacity of the playback queue.
    pub log_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recruitment_chance: 0.2,
            log_interval_ms: 1000,
            log_queue_capacity: 256,
        }
    }
}

/// One faction as entered on the setup screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionSetup {
    pub name: String,
    pub aggression: i64,
    pub influence: i64,
    pub wealth: i64,
    pub tech: i64,
    pub endurance: i64,
}

impl FactionSetup {
    /// All dials at the minimum.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggression: 1,
            influence: 1,
            wealth: 1,
            tech: 1,
            endurance: 1,
        }
    }

    pub fn dial(&self, dial: Dial) -> i64 {
        match dial {
            Dial::Aggression => self.aggression,
            Dial::Influence => self.influence,
            Dial::Wealth => self.wealth,
            Dial::Tech => self.tech,
            Dial::Endurance => self.endurance,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for dial in Dial::ALL {
            check_dial(dial, self.dial(dial))?;
        }
        Ok(())
    }
}

/// Full pre-game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the session RNG. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    pub factions: Vec<FactionSetup>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl GameConfig {
    pub fn new(seed: u64, factions: Vec<FactionSetup>) -> Self {
        Self {
            seed: Some(seed),
            factions,
            engine: EngineConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.factions.len() < 2 {
            return Err(ConfigError::TooFewFactions(self.factions.len()));
        }
        self.factions.iter().try_for_each(FactionSetup::validate)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            factions: vec![FactionSetup::named("Faction 1"), FactionSetup::named("Faction 2")],
            engine: EngineConfig::default(),
        }
    }
}

pub(crate) fn check_dial(dial: Dial, value: i64) -> Result<(), ConfigError> {
    if (1..=3).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::DialOutOfRange {
            dial: dial.as_str(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_with_defaults() {
        let config = GameConfig::from_json(
            r#"{
                "seed": 7,
                "factions": [
                    {"name": "Red", "aggression": 3, "influence": 1, "wealth": 2, "tech": 2, "endurance": 1},
                    {"name": "Blue", "aggression": 1, "influence": 3, "wealth": 1, "tech": 1, "endurance": 3}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.factions[0].aggression, 3);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn rejects_out_of_range_dial() {
        let mut config = GameConfig::default();
        config.factions[1].wealth = 4;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DialOutOfRange { dial: "wealth", value: 4 }
        ));
    }

    #[test]
    fn rejects_single_faction() {
        let config = GameConfig {
            factions: vec![FactionSetup::named("Alone")],
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TooFewFactions(1))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
