//! Level-gated limits and features.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::enums::Feature;

/// How many active tasks a user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSlots {
    Limited(u32),
    Unlimited,
}

impl TaskSlots {
    /// Returns `true` if one more active task fits alongside `active`.
    pub fn has_room(self, active: usize) -> bool {
        match self {
            Self::Limited(n) => active < n as usize,
            Self::Unlimited => true,
        }
    }
}

impl fmt::Display for TaskSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl Serialize for TaskSlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(n) => serializer.serialize_u32(*n),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// `(minimum level, slots)` pairs, ascending by level.
pub const TASK_SLOT_LIMITS: &[(u32, TaskSlots)] = &[
    (1, TaskSlots::Limited(3)),
    (3, TaskSlots::Limited(5)),
    (10, TaskSlots::Unlimited),
];

/// Slots below the first threshold.
const BASE_TASK_SLOTS: TaskSlots = TaskSlots::Limited(3);

/// Task slots available at `level`.
pub fn get_task_slots(level: u32) -> TaskSlots {
    slots_from_table(TASK_SLOT_LIMITS, level)
}

/// Walks `table` in ascending threshold order and keeps the last match.
pub fn slots_from_table(table: &[(u32, TaskSlots)], level: u32) -> TaskSlots {
    let mut sorted = table.to_vec();
    sorted.sort_by_key(|(threshold, _)| *threshold);

    let mut slots = BASE_TASK_SLOTS;
    for (threshold, s) in sorted {
        if level >= threshold {
            slots = s;
        }
    }
    slots
}

/// Level at which `feature` unlocks.
pub fn required_level(feature: Feature) -> u32 {
    match feature {
        Feature::CustomCategories => 3,
        Feature::RecurringTasks => 5,
        Feature::DetailedAnalytics => 10,
        Feature::PowerUps => 15,
    }
}

pub fn is_feature_unlocked(level: u32, feature: Feature) -> bool {
    level >= required_level(feature)
}

/// Whether one gated feature is available yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub feature: Feature,
    pub required_level: u32,
    pub unlocked: bool,
}

/// Every feature with its lock state at `level`, in unlock order.
pub fn feature_statuses(level: u32) -> Vec<FeatureStatus> {
    let mut statuses: Vec<FeatureStatus> = Feature::ALL
        .iter()
        .map(|&feature| FeatureStatus {
            feature,
            required_level: required_level(feature),
            unlocked: is_feature_unlocked(level, feature),
        })
        .collect();
    statuses.sort_by_key(|s| s.required_level);
    statuses
}

/// A gated action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("{} unlock at level {required} (current level {level})", .feature.label())]
    FeatureLocked {
        feature: Feature,
        required: u32,
        level: u32,
    },

    #[error("task slot limit reached ({limit} active). Level up to unlock more")]
    NoTaskSlots { limit: u32 },
}

/// Checks that `feature` is available at `level`.
pub fn require_feature(level: u32, feature: Feature) -> Result<(), GateError> {
    if is_feature_unlocked(level, feature) {
        Ok(())
    } else {
        Err(GateError::FeatureLocked {
            feature,
            required: required_level(feature),
            level,
        })
    }
}

/// Checks that a user at `level` with `active` tasks may create another.
pub fn can_create_task(level: u32, active: usize) -> Result<(), GateError> {
    match get_task_slots(level) {
        slots if slots.has_room(active) => Ok(()),
        TaskSlots::Limited(limit) => Err(GateError::NoTaskSlots { limit }),
        TaskSlots::Unlimited => Ok(()),
    }
}
