//! Closed string-backed enums used across the domain.
//!
//! Each enum has:
//! - Serialize/Deserialize as its snake_case name
//! - `as_str()`, `ALL`, `Display` and `FromStr` impls
//!
//! Unknown names are rejected with [`UnknownVariant`] rather than carried
//! along, so a `match` on any of these is exhaustive.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Returned when a string does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// The enum being parsed (e.g., "requirement kind").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with fixed string names.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:expr,
        variants: [
            $( $(#[$vmeta:meta])* ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Returns the string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $str => Ok(Self::$variant), )+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ===========================================================================
// RequirementKind
// ===========================================================================

define_enum! {
    /// What an achievement measures.
    RequirementKind, kind = "requirement kind",
    variants: [
        (Streak, "streak"),
        (TasksCompleted, "tasks_completed"),
        (CategoryTasks, "category_tasks"),
        (Level, "level"),
        (RewardsRedeemed, "rewards_redeemed"),
        (PointsSaved, "points_saved"),
    ]
}

// ===========================================================================
// AchievementGroup
// ===========================================================================

define_enum! {
    /// Display grouping for achievements.
    AchievementGroup, kind = "achievement group",
    variants: [
        (Consistency, "consistency"),
        (Economy, "economy"),
        (Intensity, "intensity"),
        (Leveling, "leveling"),
        (Specialization, "specialization"),
    ]
}

// ===========================================================================
// TransactionKind
// ===========================================================================

define_enum! {
    /// The reason a point ledger entry was written.
    TransactionKind, kind = "transaction kind",
    variants: [
        /// Points earned by completing a task.
        (Earned, "earned"),
        /// Points converted into XP.
        (SpentXp, "spent_xp"),
        /// Points spent redeeming a reward.
        (SpentReward, "spent_reward"),
    ]
}

impl TransactionKind {
    /// Returns `true` if entries of this kind carry a negative amount.
    pub fn is_spend(&self) -> bool {
        !matches!(self, Self::Earned)
    }
}

// ===========================================================================
// Feature
// ===========================================================================

define_enum! {
    /// A level-gated feature.
    Feature, kind = "feature",
    variants: [
        (CustomCategories, "custom_categories"),
        (RecurringTasks, "recurring_tasks"),
        (DetailedAnalytics, "detailed_analytics"),
        (PowerUps, "power_ups"),
    ]
}

impl Feature {
    /// Human-readable name for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CustomCategories => "Custom categories",
            Self::RecurringTasks => "Recurring tasks",
            Self::DetailedAnalytics => "Detailed analytics",
            Self::PowerUps => "Power-ups",
        }
    }
}
