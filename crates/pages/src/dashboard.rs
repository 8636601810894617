//! Cross-page snapshot shown on the landing page.

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_auth::Session;
use opsdesk_core::Money;

use crate::assets::AssetSummary;
use crate::campaigns::CampaignSummary;
use crate::contracts::ContractSummary;
use crate::invoices::InvoiceSummary;
use crate::licenses::LicenseSummary;
use crate::servers::ServerSummary;
use crate::settings::{SettingsSummary, display_currency};
use crate::stock::StockSummary;
use crate::users::UserSummary;
use crate::workspace::Workspace;

/// Something that wants attention today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub area: &'static str,
    pub message: String,
}

/// Headline amounts, formatted in the workspace's display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTotals {
    pub currency: String,
    pub asset_value: String,
    pub annual_license_cost: String,
    pub active_contracts: String,
    pub outstanding_invoices: String,
    pub campaign_spend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub signed_in_as: Option<String>,
    pub assets: AssetSummary,
    pub licenses: LicenseSummary,
    pub servers: ServerSummary,
    pub stock: StockSummary,
    pub contracts: ContractSummary,
    pub invoices: InvoiceSummary,
    pub campaigns: CampaignSummary,
    pub settings: SettingsSummary,
    pub users: UserSummary,
    pub totals: DisplayTotals,
    pub alerts: Vec<Alert>,
}

impl Dashboard {
    pub fn snapshot(workspace: &Workspace, session: Option<&Session>, today: NaiveDate) -> Self {
        let window = workspace.expiry_window_days;
        let assets = AssetSummary::of(workspace.assets.records(), today);
        let licenses = LicenseSummary::of(workspace.licenses.records(), today, window);
        let contracts = ContractSummary::of(workspace.contracts.records(), today, window);
        let invoices = InvoiceSummary::of(workspace.invoices.records(), today);
        let campaigns = CampaignSummary::of(workspace.campaigns.records(), today);

        let currency = display_currency(workspace.currencies.records(), &workspace.display_currency);
        let show = |amount: Money| match currency {
            Some(c) => c.format(c.convert_from_base(amount)),
            None => amount.to_string(),
        };
        let totals = DisplayTotals {
            currency: currency.map_or_else(|| workspace.display_currency.to_uppercase(), |c| c.code.clone()),
            asset_value: show(assets.current_value),
            annual_license_cost: show(licenses.annual_cost),
            active_contracts: show(contracts.active_value),
            outstanding_invoices: show(invoices.outstanding),
            campaign_spend: show(campaigns.spent),
        };

        let dashboard = Self {
            as_of: today,
            signed_in_as: session.map(|s| s.greeting_name().to_string()),
            assets,
            licenses,
            servers: ServerSummary::of(workspace.servers.records()),
            stock: StockSummary::of(workspace.stock.records()),
            contracts,
            invoices,
            campaigns,
            settings: SettingsSummary::of(
                workspace.tax_rates.records(),
                workspace.currencies.records(),
                workspace.integrations.records(),
            ),
            users: UserSummary::of(workspace.users.records()),
            totals,
            alerts: Vec::new(),
        };
        dashboard.with_alerts()
    }

    fn with_alerts(mut self) -> Self {
        let mut alerts = Vec::new();
        let mut push = |area, count: usize, what: &str| {
            if count > 0 {
                alerts.push(Alert {
                    area,
                    message: format!("{count} {what}"),
                });
            }
        };

        push("licenses", self.licenses.expiring_soon, "license(s) expiring soon");
        push("licenses", self.licenses.expired, "license(s) expired");
        push("licenses", self.licenses.over_allocated, "license(s) over-allocated");
        push("servers", self.servers.critical, "server(s) at critical usage");
        push("stock", self.stock.out_of_stock, "item(s) out of stock");
        push("stock", self.stock.low_stock, "item(s) low on stock");
        push("contracts", self.contracts.expiring_soon, "contract(s) expiring soon");
        push("contracts", self.contracts.expired, "contract(s) expired");
        push("invoices", self.invoices.overdue, "invoice(s) overdue");
        push("campaigns", self.campaigns.over_budget, "campaign(s) over budget");

        self.alerts = alerts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_of_mock_workspace() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let dashboard = Dashboard::snapshot(&Workspace::with_mock_data(30), None, today);

        assert_eq!(dashboard.signed_in_as, None);
        assert_eq!(dashboard.assets.total, 5);
        assert_eq!(dashboard.invoices.overdue, 1);
        assert_eq!(dashboard.alerts.len(), 10);
        assert_eq!(dashboard.alerts[0].message, "1 license(s) expiring soon");
    }

    #[test]
    fn expired_licenses_and_contracts_raise_alerts() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let dashboard = Dashboard::snapshot(&Workspace::with_mock_data(30), None, today);

        assert_eq!(dashboard.licenses.expired, 1);
        assert_eq!(dashboard.contracts.expired, 1);
        for area in ["licenses", "contracts"] {
            assert!(
                dashboard
                    .alerts
                    .iter()
                    .any(|a| a.area == area && a.message.ends_with("expired")),
                "no expired alert for {area}"
            );
        }
    }

    #[test]
    fn totals_follow_display_currency() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let usd = Dashboard::snapshot(&Workspace::with_mock_data(30), None, today);
        assert_eq!(usd.totals.currency, "USD");
        assert_eq!(usd.totals.outstanding_invoices, "$3,450.00");

        let workspace = Workspace::with_mock_data(30).with_display_currency("EUR");
        let eur = Dashboard::snapshot(&workspace, None, today);
        assert_eq!(eur.totals.currency, "EUR");
        // 3,450.00 USD at 0.92.
        assert_eq!(eur.totals.outstanding_invoices, "€3,174.00");
        assert_eq!(eur.totals.active_contracts, "€320,160.00");
    }

    #[test]
    fn serializes_to_json() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let dashboard = Dashboard::snapshot(&Workspace::with_mock_data(30), None, today);
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["as_of"], "2024-06-01");
        assert_eq!(json["assets"]["by_type"]["laptop"], 2);
        assert_eq!(json["invoices"]["outstanding"], 345_000);
    }
}
