//! Parse layer between raw player input and the engine.
//!
//! Magnitudes arrive as text. Anything that is not a positive whole number is
//! rejected here and never reaches a handler.

use std::str::FromStr;

use crate::error::CommandError;
use crate::model::FactionId;

/// Parse a magnitude such as `"10"`.
pub fn parse_magnitude(raw: &str) -> Result<u64, CommandError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CommandError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(CommandError::NotPositive(trimmed.to_string()));
    }
    Ok(value as u64)
}

/// A player command in its textual form, e.g. `attack faction-2 10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Attack { target: FactionId, magnitude: String },
    Trade { target: FactionId, magnitude: String },
    Alliance { target: FactionId },
    /// Run one autonomous tick.
    Tick,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let command = match verb.as_str() {
            "attack" => {
                let target = next_target(&mut words)?;
                Command::Attack {
                    target,
                    magnitude: next_magnitude(&mut words)?,
                }
            }
            "trade" => {
                let target = next_target(&mut words)?;
                Command::Trade {
                    target,
                    magnitude: next_magnitude(&mut words)?,
                }
            }
            "ally" | "alliance" => Command::Alliance {
                target: next_target(&mut words)?,
            },
            "tick" | "simulate" => Command::Tick,
            _ => return Err(CommandError::UnknownCommand(s.trim().to_string())),
        };
        Ok(command)
    }
}

fn next_target<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<FactionId, CommandError> {
    let raw = words.next().ok_or(CommandError::MissingArgument("target"))?;
    raw.parse()
        .map_err(|_| CommandError::UnknownTarget(raw.to_string()))
}

fn next_magnitude<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<String, CommandError> {
    words
        .next()
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument("magnitude"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_magnitude("10"), Ok(10));
        assert_eq!(parse_magnitude(" 7 "), Ok(7));
        assert_eq!(parse_magnitude("3.0"), Ok(3));
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        assert_eq!(
            parse_magnitude("ten"),
            Err(CommandError::NotANumber("ten".into()))
        );
        assert_eq!(parse_magnitude(""), Err(CommandError::NotANumber("".into())));
        assert_eq!(parse_magnitude("0"), Err(CommandError::NotPositive("0".into())));
        assert_eq!(parse_magnitude("-5"), Err(CommandError::NotPositive("-5".into())));
        assert_eq!(parse_magnitude("2.5"), Err(CommandError::NotPositive("2.5".into())));
        assert_eq!(parse_magnitude("NaN"), Err(CommandError::NotPositive("NaN".into())));
    }

    #[test]
    fn parses_text_commands() {
        assert_eq!(
            "attack faction-2 10".parse::<Command>(),
            Ok(Command::Attack {
                target: FactionId::new(2),
                magnitude: "10".into()
            })
        );
        assert_eq!(
            "ally faction-1".parse::<Command>(),
            Ok(Command::Alliance {
                target: FactionId::new(1)
            })
        );
        assert_eq!("tick".parse::<Command>(), Ok(Command::Tick));
    }

    #[test]
    fn reports_what_is_missing() {
        assert_eq!(
            "trade faction-1".parse::<Command>(),
            Err(CommandError::MissingArgument("magnitude"))
        );
        assert_eq!(
            "attack rebels 5".parse::<Command>(),
            Err(CommandError::UnknownTarget("rebels".into()))
        );
        assert!(matches!(
            "dance".parse::<Command>(),
            Err(CommandError::UnknownCommand(_))
        ));
    }
}
