//! Bounded percentage changes to faction attributes.
//!
//! Every interaction funnels its dial changes through [`apply_change`]; the
//! only thing that differs between call sites is the multiplier table.

use crate::model::{DIAL_MAX, DIAL_MIDPOINT, DIAL_MIN, Dial, Faction, LogEntry};

/// One row of a multiplier table: which dial, and the signed multiplier.
pub type Multipliers = [(Dial, f64)];

/// `delta = change_percent * current * multiplier`, result clamped to the dial range.
///
/// Returns the clamped value and the raw (unclamped) delta.
pub fn apply_change(current: f64, multiplier: f64, change_percent: f64) -> (f64, f64) {
    let delta = change_percent * current * multiplier;
    ((current + delta).clamp(DIAL_MIN, DIAL_MAX), delta)
}

/// Apply a single dial change to `faction` and narrate it.
pub fn mutate_dial(
    faction: &mut Faction,
    dial: Dial,
    multiplier: f64,
    change_percent: f64,
    voice: Voice,
    logs: &mut Vec<LogEntry>,
) {
    let (updated, delta) = apply_change(faction.dial(dial), multiplier, change_percent);
    faction.dials.set(dial, updated);
    let direction = if delta > 0.0 { "increased" } else { "decreased" };
    logs.push(LogEntry::change(
        delta > 0.0,
        format!(
            "{} {direction} to {updated:.2}",
            voice.label(&faction.name, dial.as_str())
        ),
    ));
}

/// Apply every row of `table` in order.
pub fn mutate_dials(
    faction: &mut Faction,
    table: &Multipliers,
    change_percent: f64,
    voice: Voice,
    logs: &mut Vec<LogEntry>,
) {
    for &(dial, multiplier) in table {
        mutate_dial(faction, dial, multiplier, change_percent, voice, logs);
    }
}

/// Resolve the revenge-vs-demoralization branch: a loser above the midpoint
/// gets angrier, one at or below it loses heart. `magnitude` is unsigned.
pub fn revenge_multiplier(aggression: f64, magnitude: f64) -> f64 {
    if aggression > DIAL_MIDPOINT {
        magnitude
    } else {
        -magnitude
    }
}

/// How log lines name the faction being changed.
///
/// Faction-vs-faction logs carry the faction name; player interactions are
/// narrated from the player's side of the card, so the name is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Named,
    Implied,
}

impl Voice {
    pub fn label(self, name: &str, attribute: &str) -> String {
        match self {
            Voice::Named => format!("{name} {attribute}"),
            Voice::Implied => capitalize(attribute),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Impact severity: `value / base`, capped. Nothing committed has no impact;
/// otherwise a non-positive base means the action was as large as it can be.
pub fn severity(value: f64, base: f64, cap: f64) -> f64 {
    if value <= 0.0 {
        0.0
    } else if base <= 0.0 {
        cap
    } else {
        (value / base).clamp(0.0, cap)
    }
}

/// Render a trust/resource change the way the game log does.
pub fn narrate_value(logs: &mut Vec<LogEntry>, label: String, before: f64, after: f64) {
    let direction = if after > before { "increased" } else { "decreased" };
    logs.push(LogEntry::change(
        after > before,
        format!("{label} {direction} to {after:.2}"),
    ));
}

/// Whole amounts print without decimals ("10"), fractional ones with two.
pub fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
