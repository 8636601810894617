use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsdesk_core::calc::{self, ExpiryStatus};
use opsdesk_core::form::{ensure_after, format_date};
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// Software license with a fixed number of seats.
///
/// `used_seats` is not checked against `total_seats`; over-allocation is
/// surfaced through `utilization_percent` going above 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: RecordId,
    pub software: String,
    pub vendor: String,
    pub license_key: Option<String>,
    pub total_seats: u32,
    pub used_seats: u32,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub annual_cost: Money,
}

impl License {
    pub fn utilization_percent(&self) -> f64 {
        calc::utilization_percent(f64::from(self.used_seats), f64::from(self.total_seats))
    }

    pub fn available_seats(&self) -> u32 {
        self.total_seats.saturating_sub(self.used_seats)
    }

    pub fn is_over_allocated(&self) -> bool {
        self.used_seats > self.total_seats
    }

    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        calc::days_until(self.expiry_date, today)
    }

    pub fn status(&self, today: NaiveDate, window_days: i64) -> ExpiryStatus {
        calc::expiry_status(self.expiry_date, today, window_days)
    }

    /// Annual cost spread over the seats actually bought.
    pub fn cost_per_seat(&self) -> Money {
        self.annual_cost.scale(1, i64::from(self.total_seats))
    }
}

impl Entity for License {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for License {
    const KIND: &'static str = "licenses";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.software.as_str(), self.vendor.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseForm;

impl FormSchema for LicenseForm {
    type Record = License;
    const TITLE: &'static str = "Add License";

    fn build(state: &FormState, ctx: &FormContext) -> Result<License, FieldErrors> {
        let mut errors = FieldErrors::new();

        let software = state.required_text("software", "Software name", &mut errors);
        let vendor = state.required_text("vendor", "Vendor", &mut errors);

        let total_seats = state.count("total_seats", "Total seats", None, &mut errors);
        if total_seats == Some(0) {
            errors.insert("total_seats", "Total seats must be at least 1");
        }
        let used_seats = state.count("used_seats", "Used seats", Some(0), &mut errors);

        let purchase_date = state.date("purchase_date", "Purchase date", &mut errors);
        let expiry_date = state.date("expiry_date", "Expiry date", &mut errors);
        ensure_after(
            purchase_date,
            expiry_date,
            "expiry_date",
            "Expiry date must be after purchase date",
            &mut errors,
        );

        let annual_cost = state.non_negative_money("annual_cost", "Annual cost", &mut errors);

        let (
            Some(software),
            Some(vendor),
            Some(total_seats),
            Some(used_seats),
            Some(purchase_date),
            Some(expiry_date),
            Some(annual_cost),
        ) = (software, vendor, total_seats, used_seats, purchase_date, expiry_date, annual_cost)
        else {
            return Err(errors);
        };

        errors.into_result(License {
            id: ctx.record_id,
            software,
            vendor,
            license_key: state.optional_text("license_key"),
            total_seats,
            used_seats,
            purchase_date,
            expiry_date,
            annual_cost,
        })
    }

    fn fill(license: &License) -> FormState {
        let mut state = FormState::new()
            .with("software", license.software.clone())
            .with("vendor", license.vendor.clone())
            .with("total_seats", license.total_seats.to_string())
            .with("used_seats", license.used_seats.to_string())
            .with("purchase_date", format_date(license.purchase_date))
            .with("expiry_date", format_date(license.expiry_date))
            .with("annual_cost", license.annual_cost.to_string());
        if let Some(key) = &license.license_key {
            state.set("license_key", key.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn ctx() -> FormContext {
        FormContext::with_id(today(), RecordId::from_u128(7))
    }

    fn state() -> FormState {
        FormState::new()
            .with("software", "Figma Professional")
            .with("vendor", "Figma")
            .with("total_seats", "20")
            .with("used_seats", "17")
            .with("purchase_date", "2024-01-15")
            .with("expiry_date", "2025-01-15")
            .with("annual_cost", "3600")
    }

    #[test]
    fn builds_license_and_derives_utilization() {
        let license = LicenseForm::build(&state(), &ctx()).unwrap();

        assert_eq!(license.utilization_percent(), 85.0);
        assert_eq!(license.available_seats(), 3);
        assert_eq!(license.cost_per_seat(), Money::from_major(180));
        assert_eq!(license.days_until_expiry(today()), 228);
        assert_eq!(license.status(today(), 30), ExpiryStatus::Active);
    }

    #[test]
    fn used_seats_above_total_are_accepted() {
        let license = LicenseForm::build(&state().with("used_seats", "25"), &ctx()).unwrap();

        assert!(license.is_over_allocated());
        assert_eq!(license.available_seats(), 0);
        assert_eq!(license.utilization_percent(), 125.0);
    }

    #[test]
    fn expiry_before_purchase_is_rejected() {
        let errors = LicenseForm::build(&state().with("expiry_date", "2023-12-31"), &ctx()).unwrap_err();
        assert_eq!(errors.get("expiry_date"), Some("Expiry date must be after purchase date"));
    }

    #[test]
    fn zero_seats_is_rejected() {
        let errors = LicenseForm::build(&state().with("total_seats", "0"), &ctx()).unwrap_err();
        assert_eq!(errors.get("total_seats"), Some("Total seats must be at least 1"));
    }

    #[test]
    fn expiring_soon_inside_window() {
        let license = LicenseForm::build(&state(), &ctx()).unwrap();
        let near = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(license.status(near, 30), ExpiryStatus::ExpiringSoon);
        let after = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(license.status(after, 30), ExpiryStatus::Expired);
        assert_eq!(license.days_until_expiry(after), -17);
    }
}
