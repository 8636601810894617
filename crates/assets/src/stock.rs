use serde::{Deserialize, Serialize};

use opsdesk_core::calc::{stock_level, StockLevel};
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// Reorder level applied when the form leaves it blank.
pub const DEFAULT_REORDER_LEVEL: u32 = 10;

/// A stocked consumable or spare part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: RecordId,
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub quantity: u32,
    pub reorder_level: u32,
    pub unit_cost: Money,
    pub location: Option<String>,
}

impl StockItem {
    pub fn level(&self) -> StockLevel {
        stock_level(self.quantity, self.reorder_level)
    }

    pub fn needs_reorder(&self) -> bool {
        self.level() <= StockLevel::Low
    }

    /// Value on hand (`unit_cost × quantity`).
    pub fn stock_value(&self) -> Money {
        self.unit_cost.scale(i64::from(self.quantity), 1)
    }

    /// Units needed to get back to twice the reorder level.
    pub fn suggested_order_quantity(&self) -> u32 {
        if !self.needs_reorder() {
            return 0;
        }
        self.reorder_level.saturating_mul(2).saturating_sub(self.quantity).max(1)
    }
}

impl Entity for StockItem {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for StockItem {
    const KIND: &'static str = "stock_items";

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.sku.as_str(), self.name.as_str()];
        fields.extend(self.category.as_deref());
        fields.extend(self.location.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StockItemForm;

impl FormSchema for StockItemForm {
    type Record = StockItem;
    const TITLE: &'static str = "Add Stock Item";

    fn build(state: &FormState, ctx: &FormContext) -> Result<StockItem, FieldErrors> {
        let mut errors = FieldErrors::new();

        let sku = state
            .required_text("sku", "SKU", &mut errors)
            .map(|s| s.to_ascii_uppercase());
        let name = state.required_text("name", "Item name", &mut errors);
        let quantity = state.count("quantity", "Quantity", None, &mut errors);
        let reorder_level = state.count(
            "reorder_level",
            "Reorder level",
            Some(DEFAULT_REORDER_LEVEL),
            &mut errors,
        );
        let unit_cost = state.non_negative_money("unit_cost", "Unit cost", &mut errors);

        let (Some(sku), Some(name), Some(quantity), Some(reorder_level), Some(unit_cost)) =
            (sku, name, quantity, reorder_level, unit_cost)
        else {
            return Err(errors);
        };

        errors.into_result(StockItem {
            id: ctx.record_id,
            sku,
            name,
            category: state.optional_text("category"),
            quantity,
            reorder_level,
            unit_cost,
            location: state.optional_text("location"),
        })
    }

    fn fill(item: &StockItem) -> FormState {
        let mut state = FormState::new()
            .with("sku", item.sku.clone())
            .with("name", item.name.clone())
            .with("quantity", item.quantity.to_string())
            .with("reorder_level", item.reorder_level.to_string())
            .with("unit_cost", item.unit_cost.to_string());
        if let Some(category) = &item.category {
            state.set("category", category.clone());
        }
        if let Some(location) = &item.location {
            state.set("location", location.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ctx() -> FormContext {
        FormContext::with_id(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), RecordId::from_u128(11))
    }

    fn state() -> FormState {
        FormState::new()
            .with("sku", "cbl-hdmi-2m")
            .with("name", "HDMI cable 2m")
            .with("category", "Cables")
            .with("quantity", "6")
            .with("unit_cost", "4.75")
    }

    #[test]
    fn builds_item_with_default_reorder_level() {
        let item = StockItemForm::build(&state(), &ctx()).unwrap();

        assert_eq!(item.sku, "CBL-HDMI-2M");
        assert_eq!(item.reorder_level, DEFAULT_REORDER_LEVEL);
        assert_eq!(item.level(), StockLevel::Low);
        assert!(item.needs_reorder());
        assert_eq!(item.suggested_order_quantity(), 14);
        assert_eq!(item.stock_value(), Money::from_cents(2_850));
    }

    #[test]
    fn classifies_every_bucket() {
        let mut item = StockItemForm::build(&state(), &ctx()).unwrap();

        item.quantity = 0;
        assert_eq!(item.level(), StockLevel::OutOfStock);
        item.quantity = 15;
        assert_eq!(item.level(), StockLevel::Adequate);
        assert!(!item.needs_reorder());
        assert_eq!(item.suggested_order_quantity(), 0);
        item.quantity = 40;
        assert_eq!(item.level(), StockLevel::Healthy);
    }

    #[test]
    fn rejects_negative_cost_and_missing_quantity() {
        let mut state = state().with("unit_cost", "-1");
        state.set("quantity", "");
        let errors = StockItemForm::build(&state, &ctx()).unwrap_err();

        assert_eq!(errors.get("unit_cost"), Some("Unit cost cannot be negative"));
        assert_eq!(errors.get("quantity"), Some("Quantity is required"));
    }
}
