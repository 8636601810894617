//! Derived display values shared by forms and pages.
//!
//! Every page that shows a current value, a utilization bar or an expiry badge
//! goes through these functions so the numbers agree across screens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_object::Money;

/// Residual value never drops below this share of the purchase price.
pub const DEPRECIATION_FLOOR_PERCENT: i64 = 10;

const DAYS_PER_YEAR: i64 = 365;

/// Straight-line depreciated value of an asset on `today`.
///
/// Returns `price` at age 0 (and for purchase dates in the future) and never
/// less than 10% of `price`. A useful life of zero years is treated as fully
/// depreciated.
pub fn depreciated_value(
    price: Money,
    purchase_date: NaiveDate,
    useful_life_years: u32,
    today: NaiveDate,
) -> Money {
    let floor = price.scale(DEPRECIATION_FLOOR_PERCENT, 100);
    let age_days = (today - purchase_date).num_days().max(0);
    if age_days == 0 {
        return price;
    }
    if useful_life_years == 0 {
        return floor;
    }

    let life_days = i64::from(useful_life_years) * DAYS_PER_YEAR;
    let consumed = price.scale(age_days.min(life_days), life_days);
    (price - consumed).max(floor)
}

/// `used` as a percentage of `total`; 0 when `total` is 0.
///
/// Not clamped: over-allocation shows up as a value above 100.
pub fn utilization_percent(used: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() || !used.is_finite() {
        return 0.0;
    }
    used * 100.0 / total
}

/// Signed number of days from `today` until `date` (negative once passed).
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Badge shown next to anything with an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Active,
    ExpiringSoon,
    Expired,
}

pub fn expiry_status(date: NaiveDate, today: NaiveDate, window_days: i64) -> ExpiryStatus {
    let remaining = days_until(date, today);
    if remaining < 0 {
        ExpiryStatus::Expired
    } else if remaining <= window_days {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Active
    }
}

/// Stock-level bucket derived from quantity on hand and the reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    Adequate,
    Healthy,
}

pub fn stock_level(quantity: u32, reorder_level: u32) -> StockLevel {
    if quantity == 0 {
        StockLevel::OutOfStock
    } else if quantity <= reorder_level {
        StockLevel::Low
    } else if u64::from(quantity) <= u64::from(reorder_level) * 2 {
        StockLevel::Adequate
    } else {
        StockLevel::Healthy
    }
}

pub const USAGE_WARNING_PERCENT: f64 = 75.0;
pub const USAGE_CRITICAL_PERCENT: f64 = 90.0;

/// Colour band for a resource-usage gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageHealth {
    Healthy,
    Warning,
    Critical,
}

pub fn usage_health(percent: f64) -> UsageHealth {
    if percent >= USAGE_CRITICAL_PERCENT {
        UsageHealth::Critical
    } else if percent >= USAGE_WARNING_PERCENT {
        UsageHealth::Warning
    } else {
        UsageHealth::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn depreciation_at_age_zero_is_purchase_price() {
        let price = Money::from_major(1200);
        let bought = date(2024, 3, 1);
        assert_eq!(depreciated_value(price, bought, 5, bought), price);
    }

    #[test]
    fn depreciation_is_straight_line() {
        let price = Money::from_major(1000);
        let bought = date(2023, 1, 1);
        // 365 days into a 5-year life: 20% consumed.
        let value = depreciated_value(price, bought, 5, date(2024, 1, 1));
        assert_eq!(value, Money::from_major(800));
    }

    #[test]
    fn depreciation_floors_at_ten_percent() {
        let price = Money::from_major(1000);
        let value = depreciated_value(price, date(2000, 1, 1), 3, date(2024, 1, 1));
        assert_eq!(value, Money::from_major(100));
    }

    #[test]
    fn future_purchase_date_is_not_depreciated() {
        let price = Money::from_major(500);
        assert_eq!(depreciated_value(price, date(2030, 1, 1), 5, date(2024, 1, 1)), price);
    }

    #[test]
    fn zero_life_is_fully_depreciated() {
        let price = Money::from_major(500);
        let value = depreciated_value(price, date(2024, 1, 1), 0, date(2024, 1, 2));
        assert_eq!(value, Money::from_major(50));
    }

    #[test]
    fn utilization_handles_zero_total_and_overallocation() {
        assert_eq!(utilization_percent(5.0, 0.0), 0.0);
        assert_eq!(utilization_percent(5.0, 10.0), 50.0);
        assert_eq!(utilization_percent(15.0, 10.0), 150.0);
    }

    #[test]
    fn expiry_status_boundaries() {
        let today = date(2024, 6, 1);
        assert_eq!(expiry_status(date(2024, 5, 31), today, 30), ExpiryStatus::Expired);
        assert_eq!(expiry_status(today, today, 30), ExpiryStatus::ExpiringSoon);
        assert_eq!(expiry_status(date(2024, 7, 1), today, 30), ExpiryStatus::ExpiringSoon);
        assert_eq!(expiry_status(date(2024, 7, 2), today, 30), ExpiryStatus::Active);
    }

    #[test]
    fn stock_level_buckets() {
        assert_eq!(stock_level(0, 10), StockLevel::OutOfStock);
        assert_eq!(stock_level(10, 10), StockLevel::Low);
        assert_eq!(stock_level(20, 10), StockLevel::Adequate);
        assert_eq!(stock_level(21, 10), StockLevel::Healthy);
        assert_eq!(stock_level(1, 0), StockLevel::Healthy);
    }

    #[test]
    fn usage_health_bands() {
        assert_eq!(usage_health(74.9), UsageHealth::Healthy);
        assert_eq!(usage_health(75.0), UsageHealth::Warning);
        assert_eq!(usage_health(90.0), UsageHealth::Critical);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: depreciated value stays within [10% of price, price].
            #[test]
            fn depreciated_value_is_bounded(
                cents in 1i64..10_000_000_00,
                age_days in 0i64..20_000,
                life in 0u32..50,
            ) {
                let price = Money::from_cents(cents);
                let bought = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
                let today = bought + chrono::Duration::days(age_days);
                let value = depreciated_value(price, bought, life, today);

                prop_assert!(value <= price);
                prop_assert!(value >= price.scale(DEPRECIATION_FLOOR_PERCENT, 100));
            }

            /// Property: depreciation never increases with age.
            #[test]
            fn depreciated_value_is_monotonic(
                cents in 1i64..1_000_000_00,
                age_days in 0i64..10_000,
                step in 1i64..1_000,
                life in 1u32..20,
            ) {
                let price = Money::from_cents(cents);
                let bought = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
                let earlier = depreciated_value(price, bought, life, bought + chrono::Duration::days(age_days));
                let later = depreciated_value(price, bought, life, bought + chrono::Duration::days(age_days + step));
                prop_assert!(later <= earlier);
            }

            /// Property: every (quantity, reorder) pair lands in exactly the expected bucket.
            #[test]
            fn stock_level_is_consistent(quantity in 0u32..10_000, reorder in 0u32..5_000) {
                let level = stock_level(quantity, reorder);
                match level {
                    StockLevel::OutOfStock => prop_assert_eq!(quantity, 0),
                    StockLevel::Low => prop_assert!(quantity > 0 && quantity <= reorder),
                    StockLevel::Adequate => prop_assert!(quantity > reorder && quantity <= reorder * 2),
                    StockLevel::Healthy => prop_assert!(quantity > reorder * 2),
                }
            }
        }
    }
}
