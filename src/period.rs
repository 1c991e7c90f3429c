// 📅 Period Bucketing - shared calendar helper
// Weekly buckets start on Monday, monthly buckets on the 1st.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// PERIOD KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// ISO week, Monday through Sunday
    WeeklyMon,

    /// Calendar month
    Monthly,
}

impl PeriodKind {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            PeriodKind::WeeklyMon => "Weekly",
            PeriodKind::Monthly => "Monthly",
        }
    }
}

/// First calendar day of the period containing `date`.
///
/// Both the aggregator and the service level calculator go through this
/// function so their week and month boundaries cannot drift apart.
pub fn period_start(date: NaiveDate, kind: PeriodKind) -> NaiveDate {
    match kind {
        PeriodKind::WeeklyMon => {
            let offset = date.weekday().num_days_from_monday() as i64;
            date - Duration::days(offset)
        }
        // day 1 exists in every month
        PeriodKind::Monthly => date.with_day(1).unwrap_or(date),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_monday_maps_to_itself() {
        let monday = ymd(2024, 1, 1);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(period_start(monday, PeriodKind::WeeklyMon), monday);
    }

    #[test]
    fn test_weekly_sunday_maps_to_previous_monday() {
        assert_eq!(period_start(ymd(2024, 1, 7), PeriodKind::WeeklyMon), ymd(2024, 1, 1));
    }

    #[test]
    fn test_weekly_crosses_month_and_year() {
        // Wednesday 2025-01-01 belongs to the week starting Monday 2024-12-30
        assert_eq!(period_start(ymd(2025, 1, 1), PeriodKind::WeeklyMon), ymd(2024, 12, 30));
    }

    #[test]
    fn test_weekly_always_monday_for_a_full_year() {
        let mut date = ymd(2024, 1, 1);
        while date < ymd(2025, 1, 1) {
            let start = period_start(date, PeriodKind::WeeklyMon);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= date);
            assert!((date - start).num_days() < 7);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_monthly_start() {
        assert_eq!(period_start(ymd(2024, 2, 29), PeriodKind::Monthly), ymd(2024, 2, 1));
        assert_eq!(period_start(ymd(2024, 12, 31), PeriodKind::Monthly), ymd(2024, 12, 1));
        assert_eq!(period_start(ymd(2024, 3, 1), PeriodKind::Monthly), ymd(2024, 3, 1));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(PeriodKind::WeeklyMon.name(), "Weekly");
        assert_eq!(PeriodKind::Monthly.name(), "Monthly");
    }
}
