use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lower bound of every dial attribute.
pub const DIAL_MIN: f64 = 1.0;
/// Upper bound of every dial attribute.
pub const DIAL_MAX: f64 = 3.0;
/// Midpoint used by the revenge-vs-demoralization branch after a defeat.
pub const DIAL_MIDPOINT: f64 = 2.0;
/// Trust/rivalry value for any relationship that has no entry yet.
pub const NEUTRAL_TRUST: f64 = 0.5;

const ID_PREFIX: &str = "faction-";

/// Stable faction identifier, rendered as `faction-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactionId(u64);

impl FactionId {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn number(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

impl FromStr for FactionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(FactionId)
            .ok_or_else(|| format!("invalid faction id '{s}'"))
    }
}

impl Serialize for FactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// The other side of a relationship: the human player or another faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counterpart {
    Player,
    Faction(FactionId),
}

impl fmt::Display for Counterpart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counterpart::Player => f.write_str("player"),
            Counterpart::Faction(id) => write!(f, "{id}"),
        }
    }
}

impl From<FactionId> for Counterpart {
    fn from(id: FactionId) -> Self {
        Counterpart::Faction(id)
    }
}

impl Serialize for Counterpart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Counterpart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "player" => Ok(Counterpart::Player),
            other => other
                .parse()
                .map(Counterpart::Faction)
                .map_err(de::Error::custom),
        }
    }
}

/// The five user-set attributes, each living in `[1, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dial {
    Aggression,
    Influence,
    Wealth,
    Tech,
    Endurance,
}

impl Dial {
    pub const ALL: [Dial; 5] = [
        Dial::Aggression,
        Dial::Influence,
        Dial::Wealth,
        Dial::Tech,
        Dial::Endurance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dial::Aggression => "aggression",
            Dial::Influence => "influence",
            Dial::Wealth => "wealth",
            Dial::Tech => "tech",
            Dial::Endurance => "endurance",
        }
    }
}

impl fmt::Display for Dial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dials {
    pub aggression: f64,
    pub influence: f64,
    pub wealth: f64,
    pub tech: f64,
    pub endurance: f64,
}

impl Dials {
    pub fn uniform(v: f64) -> Self {
        Self {
            aggression: v,
            influence: v,
            wealth: v,
            tech: v,
            endurance: v,
        }
    }

    pub fn get(&self, dial: Dial) -> f64 {
        match dial {
            Dial::Aggression => self.aggression,
            Dial::Influence => self.influence,
            Dial::Wealth => self.wealth,
            Dial::Tech => self.tech,
            Dial::Endurance => self.endurance,
        }
    }

    pub fn set(&mut self, dial: Dial, value: f64) {
        let slot = match dial {
            Dial::Aggression => &mut self.aggression,
            Dial::Influence => &mut self.influence,
            Dial::Wealth => &mut self.wealth,
            Dial::Tech => &mut self.tech,
            Dial::Endurance => &mut self.endurance,
        };
        *slot = value.clamp(DIAL_MIN, DIAL_MAX);
    }

    /// Unweighted mean of the five dials, used for alliance power balance.
    pub fn mean(&self) -> f64 {
        (self.aggression + self.tech + self.endurance + self.wealth + self.influence) / 5.0
    }

    /// Weighted power estimate used by the decision engine.
    pub fn power(&self) -> f64 {
        (self.aggression * 1.0
            + self.tech * 1.2
            + self.endurance * 0.8
            + self.wealth * 0.9
            + self.influence * 1.0)
            / 5.0
    }
}

impl Default for Dials {
    fn default() -> Self {
        Self::uniform(DIAL_MIN)
    }
}

/// Normalize a dial from `[1, 3]` onto `[0, 1]`.
pub fn normalized(value: f64) -> f64 {
    (value - DIAL_MIN) / (DIAL_MAX - DIAL_MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub dials: Dials,
    /// Troop count. Never negative, no upper bound.
    pub manpower: f64,
    /// Treasury. Never negative, no upper bound.
    pub resources: f64,
    pub trust_towards: BTreeMap<Counterpart, f64>,
    pub rivalry_with: BTreeMap<Counterpart, f64>,
}

impl Faction {
    /// A freshly configured faction: minimum dials and neutral feelings towards the player.
    pub fn new(id: FactionId, name: impl Into<String>) -> Self {
        let mut trust_towards = BTreeMap::new();
        let mut rivalry_with = BTreeMap::new();
        trust_towards.insert(Counterpart::Player, NEUTRAL_TRUST);
        rivalry_with.insert(Counterpart::Player, NEUTRAL_TRUST);
        Self {
            id,
            name: name.into(),
            dials: Dials::default(),
            manpower: 1.0,
            resources: 1.0,
            trust_towards,
            rivalry_with,
        }
    }

    pub fn dial(&self, dial: Dial) -> f64 {
        self.dials.get(dial)
    }

    /// Trust towards `other`, neutral when no entry exists.
    pub fn trust(&self, other: impl Into<Counterpart>) -> f64 {
        self.trust_towards
            .get(&other.into())
            .copied()
            .unwrap_or(NEUTRAL_TRUST)
    }

    pub fn set_trust(&mut self, other: impl Into<Counterpart>, value: f64) {
        self.trust_towards
            .insert(other.into(), value.clamp(0.0, 1.0));
    }

    /// Rivalry with `other`, neutral when no entry exists.
    pub fn rivalry(&self, other: impl Into<Counterpart>) -> f64 {
        self.rivalry_with
            .get(&other.into())
            .copied()
            .unwrap_or(NEUTRAL_TRUST)
    }

    pub fn set_manpower(&mut self, value: f64) {
        self.manpower = value.max(0.0);
    }

    pub fn set_resources(&mut self, value: f64) {
        self.resources = value.max(0.0);
    }

    /// Add neutral entries for `other` if absent. Existing values are kept.
    pub fn ensure_relation(&mut self, other: Counterpart) {
        self.trust_towards.entry(other).or_insert(NEUTRAL_TRUST);
        self.rivalry_with.entry(other).or_insert(NEUTRAL_TRUST);
    }

    pub fn forget_relation(&mut self, other: Counterpart) {
        self.trust_towards.remove(&other);
        self.rivalry_with.remove(&other);
    }
}
