//! Bar formation policies.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{PeriodParseError, Result, ValidationError};

/// How ticks are partitioned into bars, together with the policy parameters.
///
/// The set of policies is closed; every consumer matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Period {
    /// Bars spanning a fixed number of seconds from the session start.
    Second {
        /// Bar length in seconds.
        seconds: u32,
    },
    /// Bars spanning a fixed number of minutes from the session start.
    Minute {
        /// Bar length in minutes.
        minutes: u32,
    },
    /// Bars holding a fixed number of ticks.
    Tick {
        /// Ticks per bar.
        ticks: u32,
    },
    /// Bars spanning a fixed number of price increments.
    Range {
        /// Bar span in price increments.
        ticks: u32,
    },
    /// Trend/reversal swing bars.
    PriceAction {
        /// Increments from the open that continue the trend.
        trend_ticks: u32,
        /// Increments from the open that reverse the trend.
        reversal_ticks: u32,
        /// Whether the sizes adapt to recent bar behaviour.
        auto_adjust: bool,
    },
}

impl Period {
    /// Returns the policy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Second { .. } => "Second",
            Self::Minute { .. } => "Minute",
            Self::Tick { .. } => "Tick",
            Self::Range { .. } => "Range",
            Self::PriceAction { .. } => "PriceAction",
        }
    }

    /// Returns true if bars of this period are evenly spaced in time.
    #[must_use]
    pub const fn is_even_time_spacing(&self) -> bool {
        matches!(self, Self::Second { .. } | Self::Minute { .. })
    }

    /// Returns the bar length in seconds for time based periods.
    #[must_use]
    pub const fn seconds(&self) -> Option<u64> {
        match self {
            Self::Second { seconds } => Some(*seconds as u64),
            Self::Minute { minutes } => Some(*minutes as u64 * 60),
            _ => None,
        }
    }

    /// Returns a period with every size multiplied by `factor` and truncated,
    /// never below one.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        let scale = |value: u32| -> u32 {
            let scaled = (f64::from(value) * factor).trunc();
            if scaled.is_finite() && scaled >= 1.0 {
                scaled.min(f64::from(u32::MAX)) as u32
            } else {
                1
            }
        };
        match *self {
            Self::Second { seconds } => Self::Second {
                seconds: scale(seconds),
            },
            Self::Minute { minutes } => Self::Minute {
                minutes: scale(minutes),
            },
            Self::Tick { ticks } => Self::Tick {
                ticks: scale(ticks),
            },
            Self::Range { ticks } => Self::Range {
                ticks: scale(ticks),
            },
            Self::PriceAction {
                trend_ticks,
                reversal_ticks,
                auto_adjust,
            } => Self::PriceAction {
                trend_ticks: scale(trend_ticks),
                reversal_ticks: scale(reversal_ticks),
                auto_adjust,
            },
        }
    }

    /// Checks that every size is at least one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPeriod`] for a zero size.
    pub fn validate(&self) -> Result<()> {
        let zero = match *self {
            Self::Second { seconds: n }
            | Self::Minute { minutes: n }
            | Self::Tick { ticks: n }
            | Self::Range { ticks: n } => n == 0,
            Self::PriceAction {
                trend_ticks,
                reversal_ticks,
                ..
            } => trend_ticks == 0 || reversal_ticks == 0,
        };
        if zero {
            return Err(ValidationError::InvalidPeriod {
                period: self.to_string(),
                reason: "sizes must be at least 1",
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Second { seconds } => write!(f, "{seconds}-Second"),
            Self::Minute { minutes } => write!(f, "{minutes}-Minute"),
            Self::Tick { ticks } => write!(f, "{ticks}-Tick"),
            Self::Range { ticks } => write!(f, "{ticks}-Range"),
            Self::PriceAction {
                trend_ticks,
                reversal_ticks,
                auto_adjust,
            } => {
                let mode = if *auto_adjust { "Auto" } else { "Fixed" };
                write!(f, "{trend_ticks}/{reversal_ticks}/({mode})-PriceAction")
            }
        }
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || PeriodParseError(s.to_string());
        let num = |v: &str| v.trim().parse::<u32>().map_err(|_| err());
        let trimmed = s.trim();

        if let Some((value, kind)) = trimmed.split_once('-') {
            return match kind.to_lowercase().as_str() {
                "second" => Ok(Self::Second { seconds: num(value)? }),
                "minute" => Ok(Self::Minute { minutes: num(value)? }),
                "tick" => Ok(Self::Tick { ticks: num(value)? }),
                "range" => Ok(Self::Range { ticks: num(value)? }),
                "priceaction" => {
                    let mut parts = value.split('/');
                    let trend = num(parts.next().ok_or_else(err)?)?;
                    let reversal = num(parts.next().ok_or_else(err)?)?;
                    let auto_adjust = match parts.next().map(str::to_lowercase).as_deref() {
                        Some("(auto)") => true,
                        Some("(fixed)") => false,
                        _ => return Err(err()),
                    };
                    if parts.next().is_some() {
                        return Err(err());
                    }
                    Ok(Self::PriceAction {
                        trend_ticks: trend,
                        reversal_ticks: reversal,
                        auto_adjust,
                    })
                }
                _ => Err(err()),
            };
        }

        let lower = trimmed.to_lowercase();
        if let Some(rest) = lower.strip_prefix("pa") {
            let (rest, auto_adjust) = match rest.strip_suffix('a') {
                Some(r) => (r, true),
                None => (rest, false),
            };
            let (trend, reversal) = rest.split_once('/').ok_or_else(err)?;
            return Ok(Self::PriceAction {
                trend_ticks: num(trend)?,
                reversal_ticks: num(reversal)?,
                auto_adjust,
            });
        }
        let (prefix, value) = lower.split_at(lower.find(|c: char| c.is_ascii_digit()).ok_or_else(err)?);
        match prefix {
            "s" => Ok(Self::Second { seconds: num(value)? }),
            "m" => Ok(Self::Minute { minutes: num(value)? }),
            "t" => Ok(Self::Tick { ticks: num(value)? }),
            "r" => Ok(Self::Range { ticks: num(value)? }),
            _ => Err(err()),
        }
    }
}
