use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsdesk_core::calc::{self, ExpiryStatus};
use opsdesk_core::form::{ensure_after, format_date};
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

opsdesk_core::text_enum! {
    pub enum ContractType {
        Client => "client",
        Vendor => "vendor",
        Service => "service",
        Employment => "employment",
        Lease => "lease",
    }
}

/// Lifecycle badge shown on the contracts table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Signed, not started yet.
    Upcoming,
    Active,
    ExpiringSoon,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: RecordId,
    pub title: String,
    pub counterparty: String,
    pub contract_type: ContractType,
    pub value: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub auto_renew: bool,
    pub notes: Option<String>,
}

impl Contract {
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        calc::days_until(self.end_date, today)
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn status(&self, today: NaiveDate, window_days: i64) -> ContractStatus {
        if today < self.start_date {
            return ContractStatus::Upcoming;
        }
        match calc::expiry_status(self.end_date, today, window_days) {
            ExpiryStatus::Active => ContractStatus::Active,
            ExpiryStatus::ExpiringSoon => ContractStatus::ExpiringSoon,
            ExpiryStatus::Expired => ContractStatus::Expired,
        }
    }

    /// Share of the contract term already elapsed, 0–100.
    pub fn elapsed_percent(&self, today: NaiveDate) -> f64 {
        let elapsed = (today - self.start_date).num_days().clamp(0, self.duration_days());
        calc::utilization_percent(elapsed as f64, self.duration_days() as f64)
    }

    /// Contract value spread evenly over each month of the term.
    pub fn monthly_value(&self) -> Money {
        let months = (self.duration_days() as f64 / 30.4375).round().max(1.0) as i64;
        self.value.scale(1, months)
    }
}

impl Entity for Contract {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Contract {
    const KIND: &'static str = "contracts";

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.counterparty.as_str(),
            self.contract_type.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContractForm;

impl FormSchema for ContractForm {
    type Record = Contract;
    const TITLE: &'static str = "New Contract";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Contract, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = state.required_text("title", "Contract title", &mut errors);
        let counterparty = state.required_text("counterparty", "Counterparty", &mut errors);
        let contract_type = state.choice::<ContractType>("contract_type", "Contract type", None, &mut errors);
        let value = state.non_negative_money("value", "Contract value", &mut errors);
        let start_date = state.date("start_date", "Start date", &mut errors);
        let end_date = state.date("end_date", "End date", &mut errors);
        ensure_after(
            start_date,
            end_date,
            "end_date",
            "End date must be after start date",
            &mut errors,
        );

        let (Some(title), Some(counterparty), Some(contract_type), Some(value), Some(start_date), Some(end_date)) =
            (title, counterparty, contract_type, value, start_date, end_date)
        else {
            return Err(errors);
        };

        errors.into_result(Contract {
            id: ctx.record_id,
            title,
            counterparty,
            contract_type,
            value,
            start_date,
            end_date,
            auto_renew: state.flag("auto_renew"),
            notes: state.optional_text("notes"),
        })
    }

    fn fill(contract: &Contract) -> FormState {
        let mut state = FormState::new()
            .with("title", contract.title.clone())
            .with("counterparty", contract.counterparty.clone())
            .with("contract_type", contract.contract_type.as_str())
            .with("value", contract.value.to_string())
            .with("start_date", format_date(contract.start_date))
            .with("end_date", format_date(contract.end_date))
            .with("auto_renew", contract.auto_renew.to_string());
        if let Some(notes) = &contract.notes {
            state.set("notes", notes.clone());
        }
        state
    }
}
