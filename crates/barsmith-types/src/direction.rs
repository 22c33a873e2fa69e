//! Price movement direction.

use serde::{Deserialize, Serialize};

/// Direction of a price move or of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rising prices.
    Up,
    /// Falling prices.
    Down,
    /// No direction established yet.
    #[default]
    Unknown,
}

impl Direction {
    /// Returns the opposite direction. `Unknown` stays `Unknown`.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Returns `1`, `-1` or `0`.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
            Self::Unknown => 0,
        }
    }

    /// Direction from a signed quantity.
    #[must_use]
    pub const fn from_sign(sign: i64) -> Self {
        match sign {
            s if s > 0 => Self::Up,
            s if s < 0 => Self::Down,
            _ => Self::Unknown,
        }
    }

    /// Direction of the move from `first` to `second`.
    #[must_use]
    pub fn from_values(first: f64, second: f64) -> Self {
        if second > first {
            Self::Up
        } else if second < first {
            Self::Down
        } else {
            Self::Unknown
        }
    }

    /// Returns the direction as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Unknown => "unknown",
        }
    }
}

impl std::ops::Mul for Direction {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_sign(self.sign() * rhs.sign())
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
