//! Software licenses page.

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_assets::{License, LicenseForm};
use opsdesk_core::{ExpiryStatus, Money, calc};

use crate::RecordPage;
use crate::mock::{day, id, usd};

pub type LicensesPage = RecordPage<LicenseForm>;

pub fn mock_licenses() -> Vec<License> {
    let license = |n, software: &str, vendor: &str, total_seats, used_seats, cost| License {
        id: id(2, n),
        software: software.to_string(),
        vendor: vendor.to_string(),
        license_key: None,
        total_seats,
        used_seats,
        purchase_date: day(2024, 1, 1),
        expiry_date: day(2025, 1, 1),
        annual_cost: usd(cost),
    };

    vec![
        License {
            license_key: Some("M365-BP-7731-XK2Q".to_string()),
            ..license(1, "Microsoft 365 Business", "Microsoft", 50, 42, 11_000)
        },
        License {
            purchase_date: day(2023, 6, 15),
            expiry_date: day(2024, 6, 15),
            ..license(2, "Adobe Creative Cloud", "Adobe", 10, 10, 7_200)
        },
        // Over-allocated on purpose; seat counts are never cross-checked.
        License {
            purchase_date: day(2023, 3, 1),
            expiry_date: day(2025, 3, 1),
            ..license(3, "JetBrains All Products", "JetBrains", 20, 23, 5_780)
        },
        License {
            purchase_date: day(2023, 5, 1),
            expiry_date: day(2024, 5, 1),
            ..license(4, "Slack Pro", "Salesforce", 60, 38, 6_300)
        },
        License {
            purchase_date: day(2024, 2, 1),
            expiry_date: day(2025, 2, 1),
            ..license(5, "Figma Professional", "Figma", 8, 6, 1_440)
        },
    ]
}

pub fn licenses_page() -> LicensesPage {
    RecordPage::new(mock_licenses())
}

/// Licenses expiring within `window_days` (not yet expired), soonest first.
pub fn expiring(page: &LicensesPage, today: NaiveDate, window_days: i64) -> Vec<&License> {
    let mut rows = page.visible_by(|l| l.status(today, window_days) == ExpiryStatus::ExpiringSoon);
    rows.sort_by_key(|l| l.expiry_date);
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseSummary {
    pub total: usize,
    pub total_seats: u64,
    pub used_seats: u64,
    /// Across all licenses; above 100 when over-allocated overall.
    pub utilization_percent: f64,
    pub over_allocated: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub annual_cost: Money,
}

impl LicenseSummary {
    pub fn of(licenses: &[License], today: NaiveDate, window_days: i64) -> Self {
        let total_seats: u64 = licenses.iter().map(|l| u64::from(l.total_seats)).sum();
        let used_seats: u64 = licenses.iter().map(|l| u64::from(l.used_seats)).sum();
        let count_status = |status| {
            licenses
                .iter()
                .filter(|l| l.status(today, window_days) == status)
                .count()
        };

        Self {
            total: licenses.len(),
            total_seats,
            used_seats,
            utilization_percent: calc::utilization_percent(used_seats as f64, total_seats as f64),
            over_allocated: licenses.iter().filter(|l| l.is_over_allocated()).count(),
            expiring_soon: count_status(ExpiryStatus::ExpiringSoon),
            expired: count_status(ExpiryStatus::Expired),
            annual_cost: licenses.iter().map(|l| l.annual_cost).sum(),
        }
    }
}
