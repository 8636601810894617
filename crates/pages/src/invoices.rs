//! Invoices page.

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_billing::{DisplayStatus, Invoice, InvoiceForm, InvoiceStatus};
use opsdesk_core::{DomainError, DomainResult, Money};

use crate::RecordPage;
use crate::mock::{day, id, usd};

pub type InvoicesPage = RecordPage<InvoiceForm>;

pub fn mock_invoices() -> Vec<Invoice> {
    let invoice = |n, number: &str, customer: &str, issue_date: NaiveDate, subtotal, tax_rate, status| Invoice {
        id: id(6, n),
        number: number.to_string(),
        customer: customer.to_string(),
        issue_date,
        due_date: issue_date + chrono::Days::new(30),
        subtotal: usd(subtotal),
        tax_rate,
        status,
        notes: None,
    };

    vec![
        invoice(1, "INV-2024-001", "Acme Corp", day(2024, 4, 1), 4_500, 19.0, InvoiceStatus::Paid),
        invoice(2, "INV-2024-002", "Globex", day(2024, 4, 15), 2_000, 10.0, InvoiceStatus::Sent),
        invoice(3, "INV-2024-003", "Initech", day(2024, 5, 20), 1_250, 0.0, InvoiceStatus::Sent),
        invoice(4, "INV-2024-004", "Umbrella Ltd", day(2024, 5, 28), 800, 20.0, InvoiceStatus::Draft),
        Invoice {
            notes: Some("Duplicate of INV-2024-001".to_string()),
            ..invoice(5, "INV-2024-005", "Hooli", day(2024, 3, 1), 3_000, 0.0, InvoiceStatus::Cancelled)
        },
    ]
}

pub fn invoices_page() -> InvoicesPage {
    RecordPage::new(mock_invoices())
}

pub fn with_display_status(page: &InvoicesPage, status: DisplayStatus, today: NaiveDate) -> Vec<&Invoice> {
    page.visible_by(|i| i.display_status(today) == status)
}

/// Next number in the `INV-YYYY-NNN` sequence for `today`'s year.
pub fn next_invoice_number(page: &InvoicesPage, today: NaiveDate) -> DomainResult<String> {
    use chrono::Datelike;

    let prefix = format!("INV-{}-", today.year());
    let last = page
        .records()
        .iter()
        .filter_map(|i| i.number.strip_prefix(&prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = last
        .checked_add(1)
        .ok_or_else(|| DomainError::conflict(format!("invoice sequence {prefix}* is exhausted")))?;
    Ok(format!("{prefix}{next:03}"))
}

/// Open the create modal with the next invoice number filled in.
pub fn open_new_invoice(page: &mut InvoicesPage, today: NaiveDate) -> DomainResult<()> {
    let number = next_invoice_number(page, today)?;
    page.open_new();
    page.modal_mut().set("number", number);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub total: usize,
    pub outstanding: Money,
    pub overdue: usize,
    pub overdue_amount: Money,
    pub paid: Money,
    pub drafts: usize,
}

impl InvoiceSummary {
    pub fn of(invoices: &[Invoice], today: NaiveDate) -> Self {
        let overdue: Vec<&Invoice> = invoices.iter().filter(|i| i.is_overdue(today)).collect();
        Self {
            total: invoices.len(),
            outstanding: invoices.iter().map(Invoice::outstanding).sum(),
            overdue: overdue.len(),
            overdue_amount: overdue.iter().map(|i| i.total()).sum(),
            paid: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Paid)
                .map(Invoice::total)
                .sum(),
            drafts: invoices
                .iter()
                .filter(|i| i.status == InvoiceStatus::Draft)
                .count(),
        }
    }
}
