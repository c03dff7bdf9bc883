//! Point economy decisions.
//!
//! These functions never touch storage. Each takes the current stats and
//! returns either the stats to write back or a rejection, so callers can
//! apply the result atomically or not at all.

use crate::model::UserStats;
use crate::progression::level_from_xp;

/// A spend the economy refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    #[error("amount must be positive (got {0})")]
    NonPositiveAmount(i64),

    #[error("not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: i64, available: i64 },
}

fn check_spend(stats: &UserStats, amount: i64) -> Result<(), EconomyError> {
    if amount <= 0 {
        return Err(EconomyError::NonPositiveAmount(amount));
    }
    if amount > stats.available_points {
        return Err(EconomyError::InsufficientPoints {
            needed: amount,
            available: stats.available_points,
        });
    }
    Ok(())
}

/// Stats after earning `points` from a task completion.
pub fn apply_earning(stats: &UserStats, points: i64) -> UserStats {
    UserStats {
        available_points: stats.available_points + points.max(0),
        ..stats.clone()
    }
}

/// Stats after converting `amount` points into XP at 1:1.
///
/// Rejects non-positive amounts and amounts above the balance. The level is
/// recomputed from the new XP total.
pub fn plan_conversion(stats: &UserStats, amount: i64) -> Result<UserStats, EconomyError> {
    check_spend(stats, amount)?;
    let total_xp = stats.total_xp + amount;
    Ok(UserStats {
        available_points: stats.available_points - amount,
        total_xp,
        level: level_from_xp(total_xp),
        ..stats.clone()
    })
}

/// Stats after spending `cost` points on a reward.
pub fn plan_redemption(stats: &UserStats, cost: i64) -> Result<UserStats, EconomyError> {
    check_spend(stats, cost)?;
    Ok(UserStats {
        available_points: stats.available_points - cost,
        ..stats.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stats_with(points: i64) -> UserStats {
        UserStats {
            available_points: points,
            ..UserStats::new(1)
        }
    }

    #[test]
    fn earning_adds_points() {
        let after = apply_earning(&stats_with(10), 27);
        assert_eq!(after.available_points, 37);
        assert_eq!(after.total_xp, 0);
    }

    #[test]
    fn convert_more_than_balance_is_rejected() {
        let stats = stats_with(50);
        assert_eq!(
            plan_conversion(&stats, 51),
            Err(EconomyError::InsufficientPoints {
                needed: 51,
                available: 50
            })
        );
    }

    #[test]
    fn convert_non_positive_is_rejected() {
        let stats = stats_with(50);
        assert_eq!(
            plan_conversion(&stats, 0),
            Err(EconomyError::NonPositiveAmount(0))
        );
        assert_eq!(
            plan_conversion(&stats, -5),
            Err(EconomyError::NonPositiveAmount(-5))
        );
    }

    #[test]
    fn convert_entire_balance() {
        let stats = stats_with(450);
        let after = plan_conversion(&stats, 450).unwrap();
        assert_eq!(after.available_points, 0);
        assert_eq!(after.total_xp, 450);
        assert_eq!(after.level, 2);
    }

    #[test]
    fn redemption_checks_balance() {
        let stats = stats_with(149);
        assert!(matches!(
            plan_redemption(&stats, 150),
            Err(EconomyError::InsufficientPoints { .. })
        ));
        let after = plan_redemption(&stats_with(150), 150).unwrap();
        assert_eq!(after.available_points, 0);
        assert_eq!(after.total_xp, 0);
    }
}
