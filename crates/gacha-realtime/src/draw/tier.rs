//! Outcome tiers and the fixed cumulative distribution that maps rolls to them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest roll (inclusive) that yields [`Tier::Common`].
pub const COMMON_CEILING: u8 = 70;
/// Highest roll (inclusive) that yields [`Tier::Rare`].
pub const RARE_CEILING: u8 = 95;
/// Upper bound (inclusive) of the uniform roll.
pub const ROLL_MAX: u8 = 100;

/// The categorical result of a single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 70% of draws.
    Common,
    /// 25% of draws.
    Rare,
    /// 5% of draws.
    UltraRare,
}

impl Tier {
    /// Map a roll in `1..=100` onto the cumulative distribution.
    pub fn from_roll(roll: u8) -> Self {
        match roll {
            r if r <= COMMON_CEILING => Self::Common,
            r if r <= RARE_CEILING => Self::Rare,
            _ => Self::UltraRare,
        }
    }

    /// Frame text sent to the client for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Common => "🎴 Common",
            Self::Rare => "✨ Rare",
            Self::UltraRare => "🌟 Ultra Rare",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(Tier::from_roll(1), Tier::Common);
        assert_eq!(Tier::from_roll(70), Tier::Common);
        assert_eq!(Tier::from_roll(71), Tier::Rare);
        assert_eq!(Tier::from_roll(95), Tier::Rare);
        assert_eq!(Tier::from_roll(96), Tier::UltraRare);
        assert_eq!(Tier::from_roll(100), Tier::UltraRare);
    }

    #[test]
    fn test_bucket_widths() {
        let mut counts = [0u32; 3];
        for roll in 1..=ROLL_MAX {
            match Tier::from_roll(roll) {
                Tier::Common => counts[0] += 1,
                Tier::Rare => counts[1] += 1,
                Tier::UltraRare => counts[2] += 1,
            }
        }
        assert_eq!(counts, [70, 25, 5]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Tier::Common.to_string(), "🎴 Common");
        assert_eq!(Tier::Rare.label(), "✨ Rare");
        assert_eq!(Tier::UltraRare.label(), "🌟 Ultra Rare");
    }
}
