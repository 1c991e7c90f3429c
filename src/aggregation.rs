// 📊 Period Aggregator - daily rows → weekly / monthly summaries
//
// One pass over the input, one accumulator per (period, store, product).
// Output is sorted by that key.

use crate::period::{period_start, PeriodKind};
use crate::records::{DailyRecord, PeriodSummary};
use chrono::NaiveDate;
use std::collections::BTreeMap;

type GroupKey = (NaiveDate, String, String);

// ============================================================================
// ACCUMULATOR
// ============================================================================

#[derive(Debug, Default)]
struct SalesAccumulator {
    count: usize,
    units_sold: i64,
    revenue: f64,
    unit_price_sum: f64,
    inventory_sum: f64,
}

impl SalesAccumulator {
    fn add(&mut self, record: &DailyRecord) {
        self.count += 1;
        self.units_sold += record.units_sold;
        self.revenue += record.revenue;
        self.unit_price_sum += record.unit_price;
        self.inventory_sum += record.inventory_level;
    }

    fn into_summary(self, key: GroupKey) -> PeriodSummary {
        let (period_start, store_id, product_id) = key;
        // count >= 1: accumulators only exist once a record was added
        let n = self.count as f64;
        PeriodSummary {
            period_start,
            store_id,
            product_id,
            total_units_sold: self.units_sold,
            total_revenue: self.revenue,
            avg_unit_price: self.unit_price_sum / n,
            avg_inventory_level: self.inventory_sum / n,
        }
    }
}

// ============================================================================
// PERIOD AGGREGATOR
// ============================================================================

pub struct PeriodAggregator {
    pub kind: PeriodKind,
}

impl PeriodAggregator {
    pub fn new(kind: PeriodKind) -> Self {
        PeriodAggregator { kind }
    }

    pub fn weekly() -> Self {
        Self::new(PeriodKind::WeeklyMon)
    }

    pub fn monthly() -> Self {
        Self::new(PeriodKind::Monthly)
    }

    /// Summarize records per (period_start, store_id, product_id).
    ///
    /// Duplicate (date, store, product) rows are not rejected; they simply
    /// contribute twice to the sums and means.
    pub fn aggregate(&self, records: &[DailyRecord]) -> Vec<PeriodSummary> {
        let mut groups: BTreeMap<GroupKey, SalesAccumulator> = BTreeMap::new();

        for record in records {
            let key = (
                period_start(record.date, self.kind),
                record.store_id.clone(),
                record.product_id.clone(),
            );
            groups.entry(key).or_default().add(record);
        }

        groups
            .into_iter()
            .map(|(key, acc)| acc.into_summary(key))
            .collect()
    }
}

/// Shorthand for `PeriodAggregator::new(kind).aggregate(records)`
pub fn aggregate(records: &[DailyRecord], kind: PeriodKind) -> Vec<PeriodSummary> {
    PeriodAggregator::new(kind).aggregate(records)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    const EPS: f64 = 1e-9;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_record(date: NaiveDate, store: &str, product: &str, units: i64, price: f64) -> DailyRecord {
        DailyRecord::new(date, store, product)
            .with_sales(units, price)
            .with_inventory(100.0)
    }

    /// Two stores, two products, spread over January and February 2024
    fn sample_records() -> Vec<DailyRecord> {
        let mut records = Vec::new();
        for day in 0..45 {
            let date = ymd(2024, 1, 1) + chrono::Duration::days(day);
            for (store, product) in [("S1", "P1"), ("S1", "P2"), ("S2", "P1")] {
                let units = (day % 4) as i64;
                records.push(
                    create_test_record(date, store, product, units, 2.5 + (day % 3) as f64)
                        .with_inventory(50.0 - day as f64),
                );
            }
        }
        records
    }

    #[test]
    fn test_two_rows_same_week() {
        let records = vec![
            create_test_record(ymd(2024, 1, 2), "S1", "P1", 3, 10.0),
            create_test_record(ymd(2024, 1, 4), "S1", "P1", 5, 12.0),
        ];

        let weekly = aggregate(&records, PeriodKind::WeeklyMon);

        assert_eq!(weekly.len(), 1);
        let row = &weekly[0];
        assert_eq!(row.period_start, ymd(2024, 1, 1));
        assert_eq!(row.total_units_sold, 8);
        assert!((row.avg_unit_price - 11.0).abs() < EPS);
        assert!((row.total_revenue - 90.0).abs() < EPS);
        assert!((row.avg_inventory_level - 100.0).abs() < EPS);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(aggregate(&[], PeriodKind::WeeklyMon).is_empty());
        assert!(aggregate(&[], PeriodKind::Monthly).is_empty());
    }

    #[test]
    fn test_total_units_preserved() {
        let records = sample_records();
        let input_total: i64 = records.iter().map(|r| r.units_sold).sum();

        for kind in [PeriodKind::WeeklyMon, PeriodKind::Monthly] {
            let output_total: i64 = aggregate(&records, kind)
                .iter()
                .map(|s| s.total_units_sold)
                .sum();
            assert_eq!(output_total, input_total, "{} lost units", kind.name());
        }
    }

    #[test]
    fn test_total_revenue_preserved() {
        let records = sample_records();
        let input_total: f64 = records.iter().map(|r| r.revenue).sum();
        let output_total: f64 = PeriodAggregator::monthly()
            .aggregate(&records)
            .iter()
            .map(|s| s.total_revenue)
            .sum();

        assert!((output_total - input_total).abs() < 1e-6);
    }

    #[test]
    fn test_weekly_periods_start_on_monday() {
        for summary in PeriodAggregator::weekly().aggregate(&sample_records()) {
            assert_eq!(summary.period_start.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn test_monthly_periods_start_on_first() {
        let monthly = PeriodAggregator::monthly().aggregate(&sample_records());

        assert!(monthly.iter().all(|s| s.period_start.day() == 1));
        // January + February for each of the 3 pairs
        assert_eq!(monthly.len(), 6);
    }

    #[test]
    fn test_pair_in_single_period_appears_once() {
        let mut records = sample_records();
        records.push(create_test_record(ymd(2024, 1, 10), "S9", "P9", 4, 1.0));

        let weekly = aggregate(&records, PeriodKind::WeeklyMon);
        let rows: Vec<_> = weekly
            .iter()
            .filter(|s| s.store_id == "S9" && s.product_id == "P9")
            .collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period_start, ymd(2024, 1, 8));
        assert_eq!(rows[0].total_units_sold, 4);
    }

    #[test]
    fn test_output_sorted_by_key() {
        let records = vec![
            create_test_record(ymd(2024, 2, 5), "S2", "P1", 1, 1.0),
            create_test_record(ymd(2024, 1, 5), "S2", "P1", 1, 1.0),
            create_test_record(ymd(2024, 1, 5), "S1", "P2", 1, 1.0),
            create_test_record(ymd(2024, 1, 5), "S1", "P1", 1, 1.0),
        ];

        let keys: Vec<_> = aggregate(&records, PeriodKind::Monthly)
            .into_iter()
            .map(|s| (s.period_start, s.store_id, s.product_id))
            .collect();

        assert_eq!(
            keys,
            vec![
                (ymd(2024, 1, 1), "S1".to_string(), "P1".to_string()),
                (ymd(2024, 1, 1), "S1".to_string(), "P2".to_string()),
                (ymd(2024, 1, 1), "S2".to_string(), "P1".to_string()),
                (ymd(2024, 2, 1), "S2".to_string(), "P1".to_string()),
            ]
        );
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let records = sample_records();
        let aggregator = PeriodAggregator::weekly();

        assert_eq!(aggregator.aggregate(&records), aggregator.aggregate(&records));
    }

    #[test]
    fn test_duplicate_rows_are_combined() {
        let date = ymd(2024, 3, 13);
        let records = vec![
            create_test_record(date, "S1", "P1", 2, 4.0).with_inventory(10.0),
            create_test_record(date, "S1", "P1", 6, 8.0).with_inventory(20.0),
        ];

        let monthly = aggregate(&records, PeriodKind::Monthly);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].total_units_sold, 8);
        assert!((monthly[0].avg_unit_price - 6.0).abs() < EPS);
        assert!((monthly[0].avg_inventory_level - 15.0).abs() < EPS);
    }

    #[test]
    fn test_negative_values_propagate() {
        let date = ymd(2024, 3, 13);
        let records = vec![
            create_test_record(date, "S1", "P1", 5, 2.0),
            create_test_record(date, "S1", "P1", -7, 2.0).with_revenue(-14.0),
        ];

        let weekly = aggregate(&records, PeriodKind::WeeklyMon);

        assert_eq!(weekly[0].total_units_sold, -2);
        assert!((weekly[0].total_revenue - (-4.0)).abs() < EPS);
    }

    #[test]
    fn test_weekly_bucket_crosses_month_boundary() {
        // Wed 2024-01-31 and Fri 2024-02-02 share the week of Mon 2024-01-29
        let records = vec![
            create_test_record(ymd(2024, 1, 31), "S1", "P1", 1, 1.0),
            create_test_record(ymd(2024, 2, 2), "S1", "P1", 1, 1.0),
        ];

        assert_eq!(aggregate(&records, PeriodKind::WeeklyMon).len(), 1);
        assert_eq!(aggregate(&records, PeriodKind::Monthly).len(), 2);
    }
}
