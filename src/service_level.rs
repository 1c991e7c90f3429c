// 📦 Service Level Calculator - monthly in-stock ratio per store
//
// A store is "in stock" on a day if any of its products sold at least one
// unit that day. service_level = in-stock days / observed days, per month.

use crate::period::{period_start, PeriodKind};
use crate::records::{DailyRecord, ServiceLevelRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct DayCounter {
    in_stock_days: usize,
    observed_days: usize,
}

impl DayCounter {
    fn ratio(&self) -> f64 {
        if self.observed_days == 0 {
            return 0.0;
        }
        self.in_stock_days as f64 / self.observed_days as f64
    }
}

pub struct ServiceLevelCalculator {
    /// Bucket used for the ratio (calendar month)
    pub kind: PeriodKind,
}

impl ServiceLevelCalculator {
    pub fn new() -> Self {
        ServiceLevelCalculator {
            kind: PeriodKind::Monthly,
        }
    }

    pub fn compute(&self, records: &[DailyRecord]) -> Vec<ServiceLevelRecord> {
        // Step 1: collapse products into one flag per (date, store)
        let mut daily: BTreeMap<(NaiveDate, &str), bool> = BTreeMap::new();
        for record in records {
            let in_stock = daily
                .entry((record.date, record.store_id.as_str()))
                .or_insert(false);
            *in_stock |= record.units_sold > 0;
        }

        // Step 2: count flagged days per (month, store)
        let mut monthly: BTreeMap<(NaiveDate, &str), DayCounter> = BTreeMap::new();
        for ((date, store_id), in_stock) in daily {
            let counter = monthly
                .entry((period_start(date, self.kind), store_id))
                .or_default();
            counter.observed_days += 1;
            if in_stock {
                counter.in_stock_days += 1;
            }
        }

        monthly
            .into_iter()
            .map(|((period_start, store_id), counter)| ServiceLevelRecord {
                period_start,
                store_id: store_id.to_string(),
                service_level: counter.ratio(),
            })
            .collect()
    }
}

impl Default for ServiceLevelCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `ServiceLevelCalculator::new().compute(records)`
pub fn compute_service_level(records: &[DailyRecord]) -> Vec<ServiceLevelRecord> {
    ServiceLevelCalculator::new().compute(records)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration};

    const EPS: f64 = 1e-9;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(date: NaiveDate, store: &str, product: &str, units: i64) -> DailyRecord {
        DailyRecord::new(date, store, product).with_sales(units, 1.0)
    }

    #[test]
    fn test_ten_of_thirty_days_in_stock() {
        // April has 30 days; sell on the first 10
        let records: Vec<_> = (0..30)
            .map(|i| {
                let units = if i < 10 { 3 } else { 0 };
                sale(ymd(2024, 4, 1) + Duration::days(i), "S1", "P1", units)
            })
            .collect();

        let levels = compute_service_level(&records);

        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].period_start, ymd(2024, 4, 1));
        assert!((levels[0].service_level - 10.0 / 30.0).abs() < EPS);
    }

    #[test]
    fn test_zero_sales_month_is_zero_not_omitted() {
        let records: Vec<_> = (0..5)
            .map(|i| sale(ymd(2024, 5, 1) + Duration::days(i), "S7", "P1", 0))
            .collect();

        let levels = compute_service_level(&records);

        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].store_id, "S7");
        assert_eq!(levels[0].service_level, 0.0);
    }

    #[test]
    fn test_any_product_selling_marks_day_in_stock() {
        let day1 = ymd(2024, 6, 3);
        let day2 = ymd(2024, 6, 4);
        let records = vec![
            sale(day1, "S1", "P1", 0),
            sale(day1, "S1", "P2", 2),
            sale(day2, "S1", "P1", 0),
            sale(day2, "S1", "P2", 0),
        ];

        let levels = compute_service_level(&records);

        // Two distinct days, one in stock
        assert!((levels[0].service_level - 0.5).abs() < EPS);
    }

    #[test]
    fn test_stores_and_months_are_separate() {
        let records = vec![
            sale(ymd(2024, 1, 31), "S1", "P1", 1),
            sale(ymd(2024, 2, 1), "S1", "P1", 0),
            sale(ymd(2024, 1, 31), "S2", "P1", 0),
        ];

        let levels = compute_service_level(&records);
        let rows: Vec<_> = levels
            .iter()
            .map(|r| (r.period_start, r.store_id.as_str(), r.service_level))
            .collect();

        assert_eq!(
            rows,
            vec![
                (ymd(2024, 1, 1), "S1", 1.0),
                (ymd(2024, 1, 1), "S2", 0.0),
                (ymd(2024, 2, 1), "S1", 0.0),
            ]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(compute_service_level(&[]).is_empty());
    }

    #[test]
    fn test_levels_within_unit_interval() {
        let mut records = Vec::new();
        for i in 0..90 {
            let date = ymd(2024, 1, 1) + Duration::days(i);
            records.push(sale(date, "S1", "P1", i % 3 - 1));
            records.push(sale(date, "S2", "P1", i % 5));
        }

        let levels = compute_service_level(&records);

        assert!(!levels.is_empty());
        for level in &levels {
            assert!((0.0..=1.0).contains(&level.service_level));
            assert_eq!(level.period_start.day(), 1);
        }
    }

    #[test]
    fn test_negative_units_count_as_out_of_stock() {
        let records = vec![sale(ymd(2024, 8, 1), "S1", "P1", -3)];

        assert_eq!(compute_service_level(&records)[0].service_level, 0.0);
    }
}
