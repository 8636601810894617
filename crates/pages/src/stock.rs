//! Stock items page.

use serde::Serialize;

use opsdesk_assets::{StockItem, StockItemForm};
use opsdesk_core::{Money, StockLevel};

use crate::RecordPage;
use crate::mock::id;

pub type StockPage = RecordPage<StockItemForm>;

pub fn mock_stock() -> Vec<StockItem> {
    let item = |n, sku: &str, name: &str, category: &str, quantity, reorder_level, unit_cents| StockItem {
        id: id(4, n),
        sku: sku.to_string(),
        name: name.to_string(),
        category: Some(category.to_string()),
        quantity,
        reorder_level,
        unit_cost: Money::from_cents(unit_cents),
        location: Some("Warehouse A".to_string()),
    };

    vec![
        item(1, "CBL-USB-C", "USB-C Cable 2m", "Cables", 120, 25, 850),
        item(2, "KB-MX-KEYS", "Logitech MX Keys", "Peripherals", 8, 10, 9_900),
        item(3, "MS-MX3", "MX Master 3S Mouse", "Peripherals", 0, 10, 8_900),
        item(4, "TNR-HP-26A", "HP 26A Toner", "Printing", 15, 10, 11_200),
        StockItem {
            location: Some("Warehouse B".to_string()),
            ..item(5, "SSD-1TB", "Samsung 990 Pro 1TB", "Components", 34, 10, 12_900)
        },
    ]
}

pub fn stock_page() -> StockPage {
    RecordPage::new(mock_stock())
}

/// Reorder list: (item, suggested quantity), empty shelves first.
pub fn reorder_list(page: &StockPage) -> Vec<(&StockItem, u32)> {
    let mut rows: Vec<_> = page
        .visible_by(StockItem::needs_reorder)
        .into_iter()
        .map(|item| (item, item.suggested_order_quantity()))
        .collect();
    rows.sort_by_key(|(item, _)| (item.level(), item.quantity));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub total_items: usize,
    pub total_units: u64,
    pub total_value: Money,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl StockSummary {
    pub fn of(items: &[StockItem]) -> Self {
        let count = |level| items.iter().filter(|i| i.level() == level).count();
        Self {
            total_items: items.len(),
            total_units: items.iter().map(|i| u64::from(i.quantity)).sum(),
            total_value: items.iter().map(StockItem::stock_value).sum(),
            low_stock: count(StockLevel::Low),
            out_of_stock: count(StockLevel::OutOfStock),
        }
    }
}
