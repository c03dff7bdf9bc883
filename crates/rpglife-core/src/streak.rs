//! Daily completion streaks.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::UserStats;

/// What a completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// Already counted today.
    Unchanged,
    /// Continued from yesterday.
    Extended,
    /// First completion, or the first after a gap.
    Started,
}

/// Applies one completion on `today` to the streak fields of `stats`.
///
/// Idempotent within a day: a second call with the same `today` changes
/// nothing. `longest_streak` never decreases.
pub fn update_streak(stats: &mut UserStats, today: NaiveDate) -> StreakChange {
    let last = stats.last_completion_date;
    if last == Some(today) {
        return StreakChange::Unchanged;
    }

    let change = if last.is_some() && last == today.pred_opt() {
        stats.current_streak += 1;
        StreakChange::Extended
    } else {
        stats.current_streak = 1;
        StreakChange::Started
    };

    stats.longest_streak = stats.longest_streak.max(stats.current_streak);
    stats.last_completion_date = Some(today);
    change
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_completion_starts_streak() {
        let mut stats = UserStats::new(1);
        assert_eq!(update_streak(&mut stats, day(1)), StreakChange::Started);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.last_completion_date, Some(day(1)));
    }

    #[test]
    fn same_day_is_idempotent() {
        let mut stats = UserStats::new(1);
        update_streak(&mut stats, day(1));
        let before = stats.clone();
        assert_eq!(update_streak(&mut stats, day(1)), StreakChange::Unchanged);
        assert_eq!(stats, before);
    }

    #[test]
    fn consecutive_days_extend() {
        let mut stats = UserStats::new(1);
        for d in 1..=5 {
            update_streak(&mut stats, day(d));
            update_streak(&mut stats, day(d));
        }
        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.longest_streak, 5);
    }

    #[test]
    fn gap_resets_but_longest_survives() {
        let mut stats = UserStats::new(1);
        for d in 1..=4 {
            update_streak(&mut stats, day(d));
        }
        assert_eq!(update_streak(&mut stats, day(9)), StreakChange::Started);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 4);
    }

    #[test]
    fn longest_never_decreases() {
        let mut stats = UserStats::new(1);
        let days = [1, 2, 3, 5, 6, 10, 11, 12, 13, 20];
        let mut longest = 0;
        for d in days {
            update_streak(&mut stats, day(d));
            assert!(stats.longest_streak >= longest);
            assert!(stats.longest_streak >= stats.current_streak);
            longest = stats.longest_streak;
        }
        assert_eq!(longest, 4);
    }

    #[test]
    fn crosses_month_boundary() {
        let mut stats = UserStats::new(1);
        update_streak(&mut stats, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        update_streak(&mut stats, day(1));
        assert_eq!(stats.current_streak, 2);
    }
}
