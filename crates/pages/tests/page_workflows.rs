use chrono::NaiveDate;
use proptest::prelude::*;

use opsdesk_assets::AssetType;
use opsdesk_contracts::ContractStatus;
use opsdesk_core::{DomainError, Money, RecordId};
use opsdesk_pages::assets::{AssetSummary, assets_page};
use opsdesk_pages::contracts::{ContractSummary, contracts_page};
use opsdesk_pages::{Dashboard, Workspace};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn fill_asset(page: &mut opsdesk_pages::assets::AssetsPage, price: &str) {
    page.open_new();
    let modal = page.modal_mut();
    modal.set("tag", "MON-010");
    modal.set("asset_type", "monitor");
    modal.set("brand", "LG");
    modal.set("serial_number", "LG27UK850");
    modal.set("purchase_date", "2024-05-01");
    modal.set("purchase_price", price);
}

#[test]
fn adding_an_asset_updates_the_summary() {
    let mut page = assets_page();
    fill_asset(&mut page, "450.00");

    let id = page.submit(today()).unwrap();

    let summary = AssetSummary::of(page.records(), today());
    assert_eq!(summary.total, 6);
    assert_eq!(summary.purchase_total, Money::from_major(14_598));
    assert_eq!(summary.by_type.get(&AssetType::Monitor), Some(&2));
    assert_eq!(page.get(&id).unwrap().tag, "MON-010");
}

#[test]
fn non_positive_price_is_rejected_and_nothing_is_added() {
    for price in ["0", "-12.50"] {
        let mut page = assets_page();
        fill_asset(&mut page, price);

        let err = page.submit(today()).unwrap_err();

        assert_eq!(
            err.field_errors().and_then(|e| e.get("purchase_price")),
            Some("Purchase price must be greater than 0"),
            "price {price}"
        );
        assert_eq!(page.len(), 5);
        assert!(page.modal().is_open());
        assert_eq!(page.modal().state().get("purchase_price"), Some(price));
    }
}

#[test]
fn contract_ending_before_it_starts_is_rejected() {
    let mut page = contracts_page();
    page.open_new();
    let modal = page.modal_mut();
    modal.set("title", "Printer Lease");
    modal.set("counterparty", "Xerox");
    modal.set("contract_type", "lease");
    modal.set("value", "3600");
    modal.set("start_date", "2024-07-01");
    modal.set("end_date", "2024-06-01");

    let err = page.submit(today()).unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|e| e.get("end_date")),
        Some("End date must be after start date")
    );

    // Correcting the field clears its error and the submit goes through.
    page.modal_mut().set("end_date", "2025-06-30");
    assert!(page.modal().errors().is_empty());
    page.submit(today()).unwrap();

    let summary = ContractSummary::of(page.records(), today(), 30);
    assert_eq!(summary.upcoming, 2);
}

#[test]
fn editing_keeps_the_record_id() {
    let mut page = contracts_page();
    let id = page.records()[2].id;

    page.open_edit(&id).unwrap();
    page.modal_mut().set("value", "120000");
    page.submit(today()).unwrap();

    assert_eq!(page.len(), 5);
    assert_eq!(page.get(&id).unwrap().value, Money::from_major(120_000));
    assert_eq!(page.get(&id).unwrap().status(today(), 30), ContractStatus::Active);
}

#[test]
fn reload_discards_session_edits() {
    let mut workspace = Workspace::with_mock_data(30);
    fill_asset(&mut workspace.assets, "99");
    workspace.assets.submit(today()).unwrap();
    let first_invoice = workspace.invoices.records()[0].id;
    workspace.invoices.remove(&first_invoice);
    workspace.users.set_search("sarah");

    workspace.reset();

    assert_eq!(workspace.assets.len(), 5);
    assert_eq!(workspace.invoices.len(), 5);
    assert_eq!(workspace.users.visible().len(), 5);
}

#[test]
fn dashboard_reflects_page_state() {
    let mut workspace = Workspace::with_mock_data(30);
    let before = Dashboard::snapshot(&workspace, None, today());

    let overdue = workspace
        .invoices
        .records()
        .iter()
        .find(|i| i.is_overdue(today()))
        .map(|i| i.id)
        .unwrap();
    workspace.invoices.remove(&overdue);

    let after = Dashboard::snapshot(&workspace, None, today());
    assert_eq!(before.invoices.overdue, 1);
    assert_eq!(after.invoices.overdue, 0);
    assert_eq!(after.alerts.len(), before.alerts.len() - 1);
}

#[test]
fn unknown_record_cannot_be_edited() {
    let mut page = assets_page();
    assert_eq!(page.open_edit(&RecordId::from_u128(404)), Err(DomainError::NotFound));
}

proptest! {
    #[test]
    fn asset_value_stays_between_floor_and_price(
        cents in 1i64..10_000_000,
        life in 1u32..=50,
        age_days in 0i64..40_000,
    ) {
        let mut asset = assets_page().records()[0].clone();
        asset.purchase_price = Money::from_cents(cents);
        asset.useful_life_years = life;
        let today = asset.purchase_date + chrono::Duration::days(age_days);

        let value = asset.current_value(today);

        prop_assert!(value <= asset.purchase_price);
        prop_assert!(value >= asset.purchase_price.scale(10, 100));
        if age_days == 0 {
            prop_assert_eq!(value, asset.purchase_price);
        }
    }
}
