//! Contracts page.

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_contracts::{Contract, ContractForm, ContractStatus, ContractType};
use opsdesk_core::Money;

use crate::RecordPage;
use crate::mock::{day, id, usd};

pub type ContractsPage = RecordPage<ContractForm>;

pub fn mock_contracts() -> Vec<Contract> {
    let contract = |n, title: &str, counterparty: &str, contract_type, value, start, end| Contract {
        id: id(5, n),
        title: title.to_string(),
        counterparty: counterparty.to_string(),
        contract_type,
        value: usd(value),
        start_date: start,
        end_date: end,
        auto_renew: false,
        notes: None,
    };

    vec![
        Contract {
            notes: Some("Break clause after year 3".to_string()),
            ..contract(
                1,
                "Office Lease - HQ",
                "Northgate Properties",
                ContractType::Lease,
                240_000,
                day(2022, 1, 1),
                day(2026, 12, 31),
            )
        },
        Contract {
            auto_renew: true,
            ..contract(
                2,
                "Cloud Hosting MSA",
                "Hetzner Online",
                ContractType::Vendor,
                12_000,
                day(2023, 7, 1),
                day(2024, 6, 30),
            )
        },
        contract(
            3,
            "Acme Corp Retainer",
            "Acme Corp",
            ContractType::Client,
            96_000,
            day(2024, 1, 1),
            day(2024, 12, 31),
        ),
        contract(
            4,
            "Janitorial Services",
            "CleanCo",
            ContractType::Service,
            18_000,
            day(2023, 1, 1),
            day(2024, 1, 1),
        ),
        contract(
            5,
            "Security Audit",
            "Redline Security",
            ContractType::Vendor,
            25_000,
            day(2024, 7, 1),
            day(2024, 9, 30),
        ),
    ]
}

pub fn contracts_page() -> ContractsPage {
    RecordPage::new(mock_contracts())
}

pub fn with_status(
    page: &ContractsPage,
    status: ContractStatus,
    today: NaiveDate,
    window_days: i64,
) -> Vec<&Contract> {
    page.visible_by(|c| c.status(today, window_days) == status)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSummary {
    pub total: usize,
    /// Value of contracts in force today (including those about to expire).
    pub active_value: Money,
    pub active: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub upcoming: usize,
}

impl ContractSummary {
    pub fn of(contracts: &[Contract], today: NaiveDate, window_days: i64) -> Self {
        let count = |status| {
            contracts
                .iter()
                .filter(|c| c.status(today, window_days) == status)
                .count()
        };
        let in_force = |c: &&Contract| {
            matches!(
                c.status(today, window_days),
                ContractStatus::Active | ContractStatus::ExpiringSoon
            )
        };

        Self {
            total: contracts.len(),
            active_value: contracts.iter().filter(in_force).map(|c| c.value).sum(),
            active: count(ContractStatus::Active),
            expiring_soon: count(ContractStatus::ExpiringSoon),
            expired: count(ContractStatus::Expired),
            upcoming: count(ContractStatus::Upcoming),
        }
    }
}
