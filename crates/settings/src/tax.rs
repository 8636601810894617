use serde::{Deserialize, Serialize};

use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

opsdesk_core::text_enum! {
    pub enum TaxType {
        Vat => "vat",
        Gst => "gst",
        SalesTax => "sales_tax",
        Withholding => "withholding",
        Other => "other",
    }
}

/// A named tax percentage that applies in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    pub id: RecordId,
    pub name: String,
    /// Percentage, 0–100.
    pub rate: f64,
    pub region: String,
    pub tax_type: TaxType,
    pub is_default: bool,
    pub active: bool,
}

impl TaxRate {
    /// Tax due on `amount`, rounded to the nearest cent.
    pub fn tax_on(&self, amount: Money) -> Money {
        amount.percent_of(self.rate)
    }

    pub fn gross(&self, amount: Money) -> Money {
        amount + self.tax_on(amount)
    }

    /// Label used in select boxes, e.g. `VAT (DE) 19%`.
    pub fn label(&self) -> String {
        format!("{} ({}) {}%", self.name, self.region, self.rate)
    }
}

impl Entity for TaxRate {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for TaxRate {
    const KIND: &'static str = "tax_rates";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.region.as_str(), self.tax_type.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaxRateForm;

impl FormSchema for TaxRateForm {
    type Record = TaxRate;
    const TITLE: &'static str = "Add Tax Rate";

    fn build(state: &FormState, ctx: &FormContext) -> Result<TaxRate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = state.required_text("name", "Tax name", &mut errors);
        let rate = state.percent("rate", "Rate", &mut errors);
        let region = state.required_text("region", "Region", &mut errors);
        let tax_type = state.choice("tax_type", "Tax type", Some(TaxType::Vat), &mut errors);

        let (Some(name), Some(rate), Some(region), Some(tax_type)) = (name, rate, region, tax_type) else {
            return Err(errors);
        };

        // A new rate is active unless the form explicitly says otherwise.
        let active = state.get("active").is_none_or(|_| state.flag("active"));

        errors.into_result(TaxRate {
            id: ctx.record_id,
            name,
            rate,
            region,
            tax_type,
            is_default: state.flag("is_default"),
            active,
        })
    }

    fn fill(tax: &TaxRate) -> FormState {
        FormState::new()
            .with("name", tax.name.clone())
            .with("rate", tax.rate.to_string())
            .with("region", tax.region.clone())
            .with("tax_type", tax.tax_type.as_str())
            .with("is_default", tax.is_default.to_string())
            .with("active", tax.active.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> FormContext {
        FormContext::with_id(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), RecordId::from_u128(41))
    }

    fn state() -> FormState {
        FormState::new()
            .with("name", "VAT")
            .with("rate", "19")
            .with("region", "DE")
    }

    #[test]
    fn builds_rate_with_defaults() {
        let tax = TaxRateForm::build(&state(), &ctx()).unwrap();

        assert_eq!(tax.tax_type, TaxType::Vat);
        assert!(tax.active);
        assert!(!tax.is_default);
        assert_eq!(tax.label(), "VAT (DE) 19%");
        assert_eq!(tax.tax_on(Money::from_major(100)), Money::from_major(19));
        assert_eq!(tax.gross(Money::from_major(100)), Money::from_major(119));
    }

    #[test]
    fn rate_must_be_between_0_and_100() {
        for bad in ["-0.5", "100.01", "1e9"] {
            let errors = TaxRateForm::build(&state().with("rate", bad), &ctx()).unwrap_err();
            assert_eq!(errors.get("rate"), Some("Rate must be between 0 and 100"), "input {bad}");
        }
        for ok in ["0", "100", "7.25"] {
            assert!(TaxRateForm::build(&state().with("rate", ok), &ctx()).is_ok(), "input {ok}");
        }
    }

    #[test]
    fn non_numeric_rate_is_reported() {
        let errors = TaxRateForm::build(&state().with("rate", "nineteen"), &ctx()).unwrap_err();
        assert_eq!(errors.get("rate"), Some("Rate must be a number"));
    }

    #[test]
    fn inactive_flag_is_respected() {
        let tax = TaxRateForm::build(&state().with("active", "false"), &ctx()).unwrap();
        assert!(!tax.active);
        assert_eq!(TaxRateForm::build(&TaxRateForm::fill(&tax), &ctx()).unwrap(), tax);
    }
}
