// 🧾 Records - input rows and output summary rows
//
// Field names double as CSV column names (serde), so the on-disk tables
// and the structs cannot disagree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// INPUT
// ============================================================================

/// One day of sales and stock for a (store, product) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub store_id: String,
    pub product_id: String,
    pub units_sold: i64,
    pub unit_price: f64,
    pub revenue: f64,
    pub inventory_level: f64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, store_id: &str, product_id: &str) -> Self {
        DailyRecord {
            date,
            store_id: store_id.to_string(),
            product_id: product_id.to_string(),
            units_sold: 0,
            unit_price: 0.0,
            revenue: 0.0,
            inventory_level: 0.0,
        }
    }

    /// Builder pattern: units sold and unit price (revenue = units * price)
    pub fn with_sales(mut self, units_sold: i64, unit_price: f64) -> Self {
        self.units_sold = units_sold;
        self.unit_price = unit_price;
        self.revenue = units_sold as f64 * unit_price;
        self
    }

    /// Builder pattern: explicit revenue, for rows where it is not units * price
    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }

    /// Builder pattern: closing inventory for the day
    pub fn with_inventory(mut self, inventory_level: f64) -> Self {
        self.inventory_level = inventory_level;
        self
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Summary statistics for one (period, store, product) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period_start: NaiveDate,
    pub store_id: String,
    pub product_id: String,
    pub total_units_sold: i64,
    pub total_revenue: f64,
    pub avg_unit_price: f64,
    pub avg_inventory_level: f64,
}

/// Share of observed days a store sold anything, for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLevelRecord {
    pub period_start: NaiveDate,
    pub store_id: String,
    /// In [0.0, 1.0]
    pub service_level: f64,
}
