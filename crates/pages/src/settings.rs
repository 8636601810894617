//! Settings pages: tax rates, currencies and integrations.

use serde::Serialize;

use opsdesk_core::{Money, RecordId};
use opsdesk_settings::{Currency, CurrencyForm, Integration, IntegrationForm, TaxRate, TaxRateForm, TaxType};

use crate::RecordPage;
use crate::mock::id;

pub type TaxRatesPage = RecordPage<TaxRateForm>;
pub type CurrenciesPage = RecordPage<CurrencyForm>;
pub type IntegrationsPage = RecordPage<IntegrationForm>;

pub fn mock_tax_rates() -> Vec<TaxRate> {
    let tax = |n, name: &str, rate, region: &str, tax_type| TaxRate {
        id: id(8, n),
        name: name.to_string(),
        rate,
        region: region.to_string(),
        tax_type,
        is_default: false,
        active: true,
    };

    vec![
        TaxRate {
            is_default: true,
            ..tax(1, "VAT", 19.0, "DE", TaxType::Vat)
        },
        tax(2, "VAT reduced", 7.0, "DE", TaxType::Vat),
        tax(3, "GST", 10.0, "AU", TaxType::Gst),
        tax(4, "Sales Tax", 7.25, "CA-US", TaxType::SalesTax),
        TaxRate {
            active: false,
            ..tax(5, "Withholding", 5.0, "NG", TaxType::Withholding)
        },
    ]
}

pub fn mock_currencies() -> Vec<Currency> {
    let currency = |n, code: &str, name: &str, symbol: &str, exchange_rate| Currency {
        id: id(9, n),
        code: code.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        exchange_rate,
        is_base: false,
    };

    vec![
        Currency {
            is_base: true,
            ..currency(1, "USD", "US Dollar", "$", 1.0)
        },
        currency(2, "EUR", "Euro", "€", 0.92),
        currency(3, "GBP", "British Pound", "£", 0.79),
        currency(4, "JPY", "Japanese Yen", "¥", 156.8),
        currency(5, "INR", "Indian Rupee", "₹", 83.4),
    ]
}

pub fn mock_integrations() -> Vec<Integration> {
    let integration = |n, name: &str, provider: &str, api_key: &str, webhook_url: Option<&str>, enabled| Integration {
        id: id(10, n),
        name: name.to_string(),
        provider: provider.to_string(),
        api_key: api_key.to_string(),
        webhook_url: webhook_url.map(str::to_string),
        enabled,
    };

    vec![
        integration(
            1,
            "Payments",
            "Stripe",
            "sk_test_4eC39HqLyjWDarjtT1zdp7dc",
            Some("https://erp.example.com/hooks/stripe"),
            true,
        ),
        integration(2, "Transactional Email", "SendGrid", "SG.ngeVfQFYQlKU0ufo8x5d1A", None, true),
        integration(
            3,
            "CRM Sync",
            "HubSpot",
            "pat-na1-11111111-2222-3333",
            Some("https://erp.example.com/hooks/hubspot"),
            false,
        ),
        integration(4, "Accounting", "QuickBooks", "qbo_prod_9f8e7d6c5b4a", None, true),
    ]
}

pub fn tax_rates_page() -> TaxRatesPage {
    RecordPage::new(mock_tax_rates())
}

pub fn currencies_page() -> CurrenciesPage {
    RecordPage::new(mock_currencies())
}

pub fn integrations_page() -> IntegrationsPage {
    RecordPage::new(mock_integrations())
}

/// Flip an integration's enabled switch; `None` when the id is unknown.
pub fn toggle_integration(page: &mut IntegrationsPage, id: &RecordId) -> Option<bool> {
    page.update(id, |integration| {
        integration.toggle();
        integration.enabled
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSummary {
    pub tax_rates: usize,
    pub active_tax_rates: usize,
    pub default_tax: Option<String>,
    pub currencies: usize,
    pub base_currency: Option<String>,
    pub integrations: usize,
    pub enabled_integrations: usize,
}

impl SettingsSummary {
    pub fn of(taxes: &[TaxRate], currencies: &[Currency], integrations: &[Integration]) -> Self {
        Self {
            tax_rates: taxes.len(),
            active_tax_rates: taxes.iter().filter(|t| t.active).count(),
            default_tax: taxes.iter().find(|t| t.is_default && t.active).map(TaxRate::label),
            currencies: currencies.len(),
            base_currency: currencies.iter().find(|c| c.is_base).map(|c| c.code.clone()),
            integrations: integrations.len(),
            enabled_integrations: integrations.iter().filter(|i| i.enabled).count(),
        }
    }
}

pub fn find_currency<'a>(currencies: &'a [Currency], code: &str) -> Option<&'a Currency> {
    currencies.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// The currency amounts are shown in: `code` if listed, else the base currency.
pub fn display_currency<'a>(currencies: &'a [Currency], code: &str) -> Option<&'a Currency> {
    find_currency(currencies, code).or_else(|| {
        tracing::warn!(currency = code, "display currency not listed; falling back to base");
        currencies.iter().find(|c| c.is_base)
    })
}

/// Format `amount` (in the base currency) in the currency with `code`.
pub fn format_in(currencies: &[Currency], code: &str, amount: Money) -> Option<String> {
    let target = find_currency(currencies, code)?;
    Some(target.format(target.convert_from_base(amount)))
}
