//! Hardware assets page.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_assets::{Asset, AssetForm, AssetStatus, AssetType};
use opsdesk_core::Money;

use crate::RecordPage;
use crate::mock::{day, id, usd};

pub type AssetsPage = RecordPage<AssetForm>;

pub fn mock_assets() -> Vec<Asset> {
    let asset = |n, tag: &str, asset_type, brand: &str, model: &str, serial: &str| Asset {
        id: id(1, n),
        tag: tag.to_string(),
        asset_type,
        brand: brand.to_string(),
        model: Some(model.to_string()),
        serial_number: serial.to_string(),
        purchase_date: day(2024, 6, 1),
        purchase_price: Money::ZERO,
        useful_life_years: 5,
        assigned_to: None,
        status: AssetStatus::InUse,
    };

    vec![
        Asset {
            purchase_price: usd(2_499),
            assigned_to: Some("Sarah Chen".to_string()),
            ..asset(1, "MBP-001", AssetType::Laptop, "Apple", "MacBook Pro 14", "C02XK1ZZJG5H")
        },
        Asset {
            purchase_date: day(2022, 6, 1),
            purchase_price: usd(600),
            assigned_to: Some("Marcus Lee".to_string()),
            ..asset(2, "DEL-002", AssetType::Monitor, "Dell", "U2723QE", "CN0H7Y3N74261")
        },
        Asset {
            purchase_date: day(2019, 1, 15),
            purchase_price: usd(8_200),
            ..asset(3, "SRV-003", AssetType::Server, "Dell", "PowerEdge R650", "7XK9PL3")
        },
        Asset {
            purchase_date: day(2023, 9, 20),
            purchase_price: usd(999),
            useful_life_years: 3,
            assigned_to: Some("Priya Patel".to_string()),
            ..asset(4, "PHN-004", AssetType::Phone, "Apple", "iPhone 15", "F2LXQ0HJN72P")
        },
        Asset {
            purchase_date: day(2021, 3, 10),
            purchase_price: usd(1_850),
            useful_life_years: 4,
            status: AssetStatus::InRepair,
            ..asset(5, "LAP-005", AssetType::Laptop, "Lenovo", "ThinkPad X1 Carbon", "PF3ABC12")
        },
    ]
}

pub fn assets_page() -> AssetsPage {
    RecordPage::new(mock_assets())
}

/// Status tab filter, combined with the search box.
pub fn with_status(page: &AssetsPage, status: AssetStatus) -> Vec<&Asset> {
    page.visible_by(|a| a.status == status)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub total: usize,
    pub assigned: usize,
    pub purchase_total: Money,
    pub current_value: Money,
    pub by_type: BTreeMap<AssetType, usize>,
}

impl AssetSummary {
    pub fn of(assets: &[Asset], today: NaiveDate) -> Self {
        let mut by_type = BTreeMap::new();
        for asset in assets {
            *by_type.entry(asset.asset_type).or_insert(0) += 1;
        }
        Self {
            total: assets.len(),
            assigned: assets.iter().filter(|a| a.is_assigned()).count(),
            purchase_total: assets.iter().map(|a| a.purchase_price).sum(),
            current_value: assets.iter().map(|a| a.current_value(today)).sum(),
            by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn summary_cards() {
        let page = assets_page();
        let summary = AssetSummary::of(page.records(), today());

        assert_eq!(summary.total, 5);
        assert_eq!(summary.assigned, 3);
        assert_eq!(summary.purchase_total, Money::from_major(14_148));
        assert!(summary.current_value < summary.purchase_total);
        assert_eq!(summary.by_type.get(&AssetType::Laptop), Some(&2));
        assert_eq!(summary.by_type.get(&AssetType::Furniture), None);
    }

    #[test]
    fn new_and_fully_depreciated_assets() {
        let assets = mock_assets();
        // Bought today: full price.
        assert_eq!(assets[0].current_value(today()), Money::from_major(2_499));
        // Past its useful life: 10% floor.
        assert_eq!(assets[2].current_value(today()), Money::from_major(820));
    }

    #[test]
    fn status_tab_respects_search() {
        let mut page = assets_page();
        assert_eq!(with_status(&page, AssetStatus::InUse).len(), 4);

        page.set_search("apple");
        assert_eq!(with_status(&page, AssetStatus::InUse).len(), 2);
        assert!(with_status(&page, AssetStatus::InRepair).is_empty());
    }
}
