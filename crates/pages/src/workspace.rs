//! Every page, as one signed-in browser session holds them.

use crate::assets::{AssetsPage, assets_page};
use crate::campaigns::{CampaignsPage, campaigns_page};
use crate::contracts::{ContractsPage, contracts_page};
use crate::invoices::{InvoicesPage, invoices_page};
use crate::licenses::{LicensesPage, licenses_page};
use crate::servers::{ServersPage, servers_page};
use crate::settings::{
    CurrenciesPage, IntegrationsPage, TaxRatesPage, currencies_page, integrations_page, tax_rates_page,
};
use crate::stock::{StockPage, stock_page};
use crate::users::{UsersPage, users_page};

pub const DEFAULT_DISPLAY_CURRENCY: &str = "USD";

/// The pages share nothing: each owns its records and its modal.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub expiry_window_days: i64,
    /// ISO code dashboard amounts are formatted in.
    pub display_currency: String,
    pub assets: AssetsPage,
    pub licenses: LicensesPage,
    pub servers: ServersPage,
    pub stock: StockPage,
    pub contracts: ContractsPage,
    pub invoices: InvoicesPage,
    pub campaigns: CampaignsPage,
    pub tax_rates: TaxRatesPage,
    pub currencies: CurrenciesPage,
    pub users: UsersPage,
    pub integrations: IntegrationsPage,
}

impl Workspace {
    pub fn with_mock_data(expiry_window_days: i64) -> Self {
        Self {
            expiry_window_days,
            display_currency: DEFAULT_DISPLAY_CURRENCY.to_string(),
            assets: assets_page(),
            licenses: licenses_page(),
            servers: servers_page(),
            stock: stock_page(),
            contracts: contracts_page(),
            invoices: invoices_page(),
            campaigns: campaigns_page(),
            tax_rates: tax_rates_page(),
            currencies: currencies_page(),
            users: users_page(),
            integrations: integrations_page(),
        }
    }

    pub fn with_display_currency(mut self, code: impl Into<String>) -> Self {
        self.display_currency = code.into();
        self
    }

    /// Full reload: every page back to its mock rows.
    pub fn reset(&mut self) {
        self.assets.reset();
        self.licenses.reset();
        self.servers.reset();
        self.stock.reset();
        self.contracts.reset();
        self.invoices.reset();
        self.campaigns.reset();
        self.tax_rates.reset();
        self.currencies.reset();
        self.users.reset();
        self.integrations.reset();
    }
}
