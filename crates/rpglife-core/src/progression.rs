//! Experience and level math.
//!
//! Level thresholds grow quadratically: reaching level `L` takes
//! `100 * L^2` cumulative XP. Points earned from tasks scale linearly with
//! level at 10% per level above 1.

use crate::tier::Tier;

/// Cumulative XP threshold for level `level`.
pub fn xp_for_level(level: u32) -> i64 {
    let l = i64::from(level);
    100 * l * l
}

/// The level reached with `total_xp` experience, never below 1.
///
/// Scans upward from level 1 while the threshold is met and keeps the last
/// level that qualified, so 100 XP is still level 1 and 400 XP is level 2.
pub fn level_from_xp(total_xp: i64) -> u32 {
    let mut level: u32 = 1;
    while xp_for_level(level) <= total_xp {
        level += 1;
    }
    if level > 1 { level - 1 } else { 1 }
}

/// Fraction of the way from `level`'s threshold to the next one, in `[0, 1]`.
pub fn xp_progress(total_xp: i64, level: u32) -> f64 {
    let current = xp_for_level(level);
    let next = xp_for_level(level + 1);
    let needed = next - current;
    if needed <= 0 {
        return 1.0;
    }
    let into_level = (total_xp - current) as f64;
    (into_level / needed as f64).clamp(0.0, 1.0)
}

/// Point multiplier at `level`: 1.0 at level 1, +0.1 per level after.
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + f64::from(level.saturating_sub(1)) * 0.1
}

/// Points awarded for completing a task of `difficulty` at `level`.
///
/// Computed in tenths so the result is the exact floor of
/// `base * level_multiplier(level)` with no float rounding.
pub fn calc_points_earned(difficulty: Tier, level: u32) -> i64 {
    let tenths = 10 + i64::from(level.saturating_sub(1));
    difficulty.base_points() * tenths / 10
}
