use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsdesk_core::calc;
use opsdesk_core::form::format_date;
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// Payment terms applied when the due date is left blank.
pub const DEFAULT_PAYMENT_TERMS_DAYS: u64 = 30;

opsdesk_core::text_enum! {
    pub enum InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Cancelled => "cancelled",
    }
}

/// Status as displayed: stored status, with `Overdue` derived from the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Draft,
    Sent,
    Overdue,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: RecordId,
    pub number: String,
    pub customer: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal: Money,
    /// Tax percentage applied on top of the subtotal (0–100).
    pub tax_rate: f64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl Invoice {
    pub fn tax_amount(&self) -> Money {
        self.subtotal.percent_of(self.tax_rate)
    }

    pub fn total(&self) -> Money {
        self.subtotal + self.tax_amount()
    }

    /// Sent but not paid after the due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent && today > self.due_date
    }

    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.is_overdue(today) {
            -calc::days_until(self.due_date, today)
        } else {
            0
        }
    }

    /// Amount still expected from the customer.
    pub fn outstanding(&self) -> Money {
        match self.status {
            InvoiceStatus::Sent => self.total(),
            _ => Money::ZERO,
        }
    }

    pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
        match self.status {
            InvoiceStatus::Draft => DisplayStatus::Draft,
            InvoiceStatus::Sent if self.is_overdue(today) => DisplayStatus::Overdue,
            InvoiceStatus::Sent => DisplayStatus::Sent,
            InvoiceStatus::Paid => DisplayStatus::Paid,
            InvoiceStatus::Cancelled => DisplayStatus::Cancelled,
        }
    }
}

impl Entity for Invoice {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Invoice {
    const KIND: &'static str = "invoices";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.number.as_str(), self.customer.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceForm;

impl FormSchema for InvoiceForm {
    type Record = Invoice;
    const TITLE: &'static str = "Create Invoice";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Invoice, FieldErrors> {
        let mut errors = FieldErrors::new();

        let number = state.required_text("number", "Invoice number", &mut errors);
        let customer = state.required_text("customer", "Customer", &mut errors);
        let subtotal = state.positive_money("subtotal", "Subtotal", &mut errors);
        let tax_rate = if state.get("tax_rate").is_some_and(|v| !v.trim().is_empty()) {
            state.percent("tax_rate", "Tax rate", &mut errors)
        } else {
            Some(0.0)
        };

        let issue_date = state
            .optional_date("issue_date", "Issue date", &mut errors)
            .map(|d| d.unwrap_or(ctx.today));
        let due_date = match (state.optional_date("due_date", "Due date", &mut errors), issue_date) {
            (Some(Some(due)), _) => Some(due),
            (Some(None), Some(issue)) => issue.checked_add_days(chrono::Days::new(DEFAULT_PAYMENT_TERMS_DAYS)),
            _ => None,
        };
        if let (Some(issue), Some(due)) = (issue_date, due_date) {
            if due < issue {
                errors.insert("due_date", "Due date cannot be before the issue date");
            }
        }

        let status = state.choice("status", "Status", Some(InvoiceStatus::Draft), &mut errors);

        let (Some(number), Some(customer), Some(subtotal), Some(tax_rate), Some(issue_date), Some(due_date), Some(status)) =
            (number, customer, subtotal, tax_rate, issue_date, due_date, status)
        else {
            return Err(errors);
        };

        errors.into_result(Invoice {
            id: ctx.record_id,
            number,
            customer,
            issue_date,
            due_date,
            subtotal,
            tax_rate,
            status,
            notes: state.optional_text("notes"),
        })
    }

    fn fill(invoice: &Invoice) -> FormState {
        let mut state = FormState::new()
            .with("number", invoice.number.clone())
            .with("customer", invoice.customer.clone())
            .with("subtotal", invoice.subtotal.to_string())
            .with("tax_rate", invoice.tax_rate.to_string())
            .with("issue_date", format_date(invoice.issue_date))
            .with("due_date", format_date(invoice.due_date))
            .with("status", invoice.status.as_str());
        if let Some(notes) = &invoice.notes {
            state.set("notes", notes.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> FormContext {
        FormContext::with_id(date(2024, 6, 1), RecordId::from_u128(21))
    }

    fn state() -> FormState {
        FormState::new()
            .with("number", "INV-2024-0031")
            .with("customer", "Contoso Ltd")
            .with("subtotal", "2,500")
            .with("tax_rate", "8.25")
            .with("issue_date", "2024-05-01")
            .with("due_date", "2024-05-31")
            .with("status", "sent")
    }

    #[test]
    fn computes_tax_and_total() {
        let invoice = InvoiceForm::build(&state(), &ctx()).unwrap();

        assert_eq!(invoice.tax_amount(), Money::from_cents(20_625));
        assert_eq!(invoice.total(), Money::from_cents(270_625));
        assert_eq!(invoice.outstanding(), invoice.total());
    }

    #[test]
    fn sent_invoice_past_due_is_overdue() {
        let invoice = InvoiceForm::build(&state(), &ctx()).unwrap();

        assert!(invoice.is_overdue(date(2024, 6, 1)));
        assert_eq!(invoice.days_overdue(date(2024, 6, 1)), 1);
        assert_eq!(invoice.display_status(date(2024, 6, 1)), DisplayStatus::Overdue);
        assert_eq!(invoice.display_status(date(2024, 5, 31)), DisplayStatus::Sent);

        let paid = Invoice {
            status: InvoiceStatus::Paid,
            ..invoice
        };
        assert!(!paid.is_overdue(date(2024, 7, 1)));
        assert_eq!(paid.outstanding(), Money::ZERO);
    }

    #[test]
    fn blank_dates_default_to_today_and_net_30() {
        let mut state = state();
        state.set("issue_date", "");
        state.set("due_date", "");
        state.set("tax_rate", "");
        let invoice = InvoiceForm::build(&state, &ctx()).unwrap();

        assert_eq!(invoice.issue_date, date(2024, 6, 1));
        assert_eq!(invoice.due_date, date(2024, 7, 1));
        assert_eq!(invoice.tax_rate, 0.0);
    }

    #[test]
    fn rejects_due_before_issue_and_bad_tax() {
        let errors = InvoiceForm::build(
            &state().with("due_date", "2024-04-30").with("tax_rate", "120"),
            &ctx(),
        )
        .unwrap_err();

        assert_eq!(errors.get("due_date"), Some("Due date cannot be before the issue date"));
        assert_eq!(errors.get("tax_rate"), Some("Tax rate must be between 0 and 100"));
    }

    #[test]
    fn rejects_zero_subtotal() {
        let errors = InvoiceForm::build(&state().with("subtotal", "0"), &ctx()).unwrap_err();
        assert_eq!(errors.get("subtotal"), Some("Subtotal must be greater than 0"));
    }
}
