use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsdesk_core::calc::depreciated_value;
use opsdesk_core::form::format_date;
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// Useful life applied when the form leaves it blank.
pub const DEFAULT_USEFUL_LIFE_YEARS: u32 = 5;
pub const MAX_USEFUL_LIFE_YEARS: u32 = 50;

opsdesk_core::text_enum! {
    /// Hardware category shown in the asset type select.
    pub enum AssetType {
        Laptop => "laptop",
        Desktop => "desktop",
        Monitor => "monitor",
        Phone => "phone",
        Server => "server",
        Networking => "networking",
        Furniture => "furniture",
        Other => "other",
    }
}

opsdesk_core::text_enum! {
    pub enum AssetStatus {
        InUse => "in_use",
        InStorage => "in_storage",
        InRepair => "in_repair",
        Retired => "retired",
    }
}

/// A tagged piece of company hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: RecordId,
    pub tag: String,
    pub asset_type: AssetType,
    pub brand: String,
    pub model: Option<String>,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Money,
    pub useful_life_years: u32,
    pub assigned_to: Option<String>,
    pub status: AssetStatus,
}

impl Asset {
    /// Book value on `today` (straight-line, floored at 10% of the price).
    pub fn current_value(&self, today: NaiveDate) -> Money {
        depreciated_value(self.purchase_price, self.purchase_date, self.useful_life_years, today)
    }

    pub fn accumulated_depreciation(&self, today: NaiveDate) -> Money {
        self.purchase_price - self.current_value(today)
    }

    /// Age in fractional years, 0 for purchase dates in the future.
    pub fn age_years(&self, today: NaiveDate) -> f64 {
        (today - self.purchase_date).num_days().max(0) as f64 / 365.0
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

impl Entity for Asset {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Asset {
    const KIND: &'static str = "assets";

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.tag.as_str(),
            self.brand.as_str(),
            self.serial_number.as_str(),
            self.asset_type.as_str(),
        ];
        fields.extend(self.model.as_deref());
        fields.extend(self.assigned_to.as_deref());
        fields
    }
}

/// "Add Asset" modal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetForm;

impl FormSchema for AssetForm {
    type Record = Asset;
    const TITLE: &'static str = "Add Asset";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Asset, FieldErrors> {
        let mut errors = FieldErrors::new();

        let tag = state.required_text("tag", "Asset tag", &mut errors);
        let asset_type = state.choice::<AssetType>("asset_type", "Asset type", None, &mut errors);
        let brand = state.required_text("brand", "Brand", &mut errors);
        let serial_number = state.required_text("serial_number", "Serial number", &mut errors);
        let purchase_price = state.positive_money("purchase_price", "Purchase price", &mut errors);

        let purchase_date = state.date("purchase_date", "Purchase date", &mut errors);
        if purchase_date.is_some_and(|d| d > ctx.today) {
            errors.insert("purchase_date", "Purchase date cannot be in the future");
        }

        let useful_life_years = state.count(
            "useful_life_years",
            "Useful life",
            Some(DEFAULT_USEFUL_LIFE_YEARS),
            &mut errors,
        );
        if useful_life_years.is_some_and(|y| !(1..=MAX_USEFUL_LIFE_YEARS).contains(&y)) {
            errors.insert(
                "useful_life_years",
                format!("Useful life must be between 1 and {MAX_USEFUL_LIFE_YEARS} years"),
            );
        }

        let status = state.choice("status", "Status", Some(AssetStatus::InUse), &mut errors);

        let (
            Some(tag),
            Some(asset_type),
            Some(brand),
            Some(serial_number),
            Some(purchase_price),
            Some(purchase_date),
            Some(useful_life_years),
            Some(status),
        ) = (
            tag,
            asset_type,
            brand,
            serial_number,
            purchase_price,
            purchase_date,
            useful_life_years,
            status,
        )
        else {
            return Err(errors);
        };

        errors.into_result(Asset {
            id: ctx.record_id,
            tag,
            asset_type,
            brand,
            model: state.optional_text("model"),
            serial_number,
            purchase_date,
            purchase_price,
            useful_life_years,
            assigned_to: state.optional_text("assigned_to"),
            status,
        })
    }

    fn fill(asset: &Asset) -> FormState {
        let mut state = FormState::new()
            .with("tag", asset.tag.clone())
            .with("asset_type", asset.asset_type.as_str())
            .with("brand", asset.brand.clone())
            .with("serial_number", asset.serial_number.clone())
            .with("purchase_date", format_date(asset.purchase_date))
            .with("purchase_price", asset.purchase_price.to_string())
            .with("useful_life_years", asset.useful_life_years.to_string())
            .with("status", asset.status.as_str());
        if let Some(model) = &asset.model {
            state.set("model", model.clone());
        }
        if let Some(assignee) = &asset.assigned_to {
            state.set("assigned_to", assignee.clone());
        }
        state
    }
}
