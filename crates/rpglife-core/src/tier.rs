//! The 1-5 tier scale used for task difficulty and reward value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base points per difficulty tier, before the level multiplier.
pub const BASE_POINTS: [i64; 5] = [10, 25, 50, 100, 200];

/// Point cost per reward value tier.
pub const REWARD_COSTS: [i64; 5] = [50, 150, 400, 1000, 2500];

const DIFFICULTY_LABELS: [&str; 5] = ["Trivial", "Easy", "Medium", "Hard", "Epic"];

/// Rejected tier input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tier must be between 1 and 5 (got {0})")]
pub struct TierError(pub i64);

/// A validated tier in `1..=5`.
///
/// Stored and serialized as its plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Tier(u8);

impl Tier {
    pub const MIN: Tier = Tier(1);
    pub const MAX: Tier = Tier(5);

    /// Builds a tier, rejecting anything outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, TierError> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TierError(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Base points for completing a task of this difficulty.
    pub fn base_points(self) -> i64 {
        BASE_POINTS[self.index()]
    }

    /// Point cost of a reward of this value.
    pub fn reward_cost(self) -> i64 {
        REWARD_COSTS[self.index()]
    }

    /// Difficulty name ("Trivial" .. "Epic").
    pub fn difficulty_label(self) -> &'static str {
        DIFFICULTY_LABELS[self.index()]
    }
}

impl TryFrom<i64> for Tier {
    type Error = TierError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tier> for i64 {
    fn from(tier: Tier) -> Self {
        i64::from(tier.0)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Tier::new(0), Err(TierError(0)));
        assert_eq!(Tier::new(6), Err(TierError(6)));
        assert!(Tier::new(-3).is_err());
    }

    #[test]
    fn tables_line_up() {
        let t = Tier::new(3).unwrap();
        assert_eq!(t.base_points(), 50);
        assert_eq!(t.reward_cost(), 400);
        assert_eq!(t.difficulty_label(), "Medium");
        assert_eq!(Tier::MAX.reward_cost(), 2500);
        assert_eq!(Tier::MIN.base_points(), 10);
    }

    #[test]
    fn serde_uses_plain_integer() {
        let json = serde_json::to_string(&Tier::new(4).unwrap()).unwrap();
        assert_eq!(json, "4");
        assert!(serde_json::from_str::<Tier>("9").is_err());
    }
}
