//! Database-backed tests
//!
//! Each test gets a fresh database with the crate migrations applied
//! (`#[sqlx::test]` reads `DATABASE_URL`).

use chrono::{Days, NaiveDate};
use gastro_server::checkout;
use gastro_server::db::{
    availability, cart, clients, companies, dashboard, dishes, inventory, movements,
    order_history, receipts, users,
};
use gastro_server::error::{ServiceError, ServiceResult};
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{
    AvailabilityInput, ClientCreate, CompanyCreate, Dish, DishCreate, InventoryCreate,
    MovementCreate, MovementType, Weekday,
};
use shared::money::MAX_QUANTITY;
use sqlx::PgPool;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

fn error_code<T>(result: ServiceResult<T>) -> ErrorCode {
    match result.err() {
        Some(ServiceError::App(e)) => e.code,
        other => panic!("expected a business error, got {other:?}"),
    }
}

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    users::create(pool, username, None, "hash", false)
        .await
        .unwrap()
        .id
}

fn dish_input(code: &str, price: Decimal) -> DishCreate {
    DishCreate {
        code: code.into(),
        name: format!("Plato {code}"),
        description: None,
        price,
        image: None,
        weight_kg: None,
        group: None,
        ingredients: None,
        allergens: None,
        shelf_life: None,
        calories: None,
        proteins: None,
        fat: None,
        carbohydrates: None,
        sodium: None,
        status: None,
    }
}

async fn new_dish(pool: &PgPool, code: &str, price: Decimal) -> Dish {
    dishes::create(pool, &dish_input(code, price)).await.unwrap()
}

fn company_input(code: &str, cif: &str) -> CompanyCreate {
    CompanyCreate {
        code: code.into(),
        name: format!("Empresa {code}"),
        address: Some("Calle Mayor 1".into()),
        cif: cif.into(),
    }
}

// ── Cart ──

#[sqlx::test]
async fn test_add_merges_same_dish_and_day(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let dish = new_dish(&pool, "P001", Decimal::new(850, 2)).await;

    let first = cart::add(&pool, user_id, dish.id, 2, Weekday::Lun).await.unwrap();
    let second = cart::add(&pool, user_id, dish.id, 1, Weekday::Lun).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 3);

    let other_day = cart::add(&pool, user_id, dish.id, 1, Weekday::Mar).await.unwrap();
    assert_ne!(other_day.id, first.id);

    assert_eq!(cart::list_for_user(&pool, user_id).await.unwrap().len(), 2);
    assert_eq!(cart::total(&pool, user_id).await.unwrap(), Decimal::new(3400, 2));
}

#[sqlx::test]
async fn test_add_rejects_merged_quantity_over_maximum(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let dish = new_dish(&pool, "P001", Decimal::new(500, 2)).await;

    cart::add(&pool, user_id, dish.id, MAX_QUANTITY, Weekday::Lun)
        .await
        .unwrap();
    let result = cart::add(&pool, user_id, dish.id, 1, Weekday::Lun).await;
    assert_eq!(error_code(result), ErrorCode::InvalidQuantity);

    let items = cart::list_for_user(&pool, user_id).await.unwrap();
    assert_eq!(items[0].quantity, MAX_QUANTITY);
}

#[sqlx::test]
async fn test_add_unknown_dish(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let result = cart::add(&pool, user_id, 999, 1, Weekday::Lun).await;
    assert_eq!(error_code(result), ErrorCode::DishNotFound);
}

#[sqlx::test]
async fn test_cart_lines_are_scoped_to_owner(pool: PgPool) {
    let owner = new_user(&pool, "ana").await;
    let stranger = new_user(&pool, "luis").await;
    let dish = new_dish(&pool, "P001", Decimal::new(500, 2)).await;
    let item = cart::add(&pool, owner, dish.id, 1, Weekday::Lun).await.unwrap();

    let result = cart::get(&pool, item.id, Some(stranger)).await;
    assert_eq!(error_code(result), ErrorCode::CartItemNotFound);
    let result = cart::remove(&pool, item.id, Some(stranger)).await;
    assert_eq!(error_code(result), ErrorCode::CartItemNotFound);
    assert!(cart::get(&pool, item.id, Some(owner)).await.is_ok());

    cart::remove(&pool, item.id, Some(owner)).await.unwrap();
    assert!(cart::list_for_user(&pool, owner).await.unwrap().is_empty());
}

// ── Checkout ──

#[sqlx::test]
async fn test_checkout_moves_cart_into_receipt(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let stew = new_dish(&pool, "P001", Decimal::new(850, 2)).await;
    let salad = new_dish(&pool, "P002", Decimal::new(400, 2)).await;
    cart::add(&pool, user_id, stew.id, 3, Weekday::Lun).await.unwrap();
    cart::add(&pool, user_id, salad.id, 1, Weekday::Mar).await.unwrap();

    let receipt = checkout::checkout(&pool, user_id, today()).await.unwrap();
    assert_eq!(receipt.total, Decimal::new(2950, 2));
    assert!(!receipt.paid);
    assert_eq!(receipt.company_id, None);

    let lines = receipts::items(&pool, receipt.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    let sum: Decimal = lines.iter().map(|l| l.subtotal()).sum();
    assert_eq!(sum, receipt.total);

    assert!(cart::list_for_user(&pool, user_id).await.unwrap().is_empty());
    assert_eq!(order_history::count(&pool).await.unwrap(), 2);
}

#[sqlx::test]
async fn test_checkout_empty_cart_changes_nothing(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let result = checkout::checkout(&pool, user_id, today()).await;
    assert_eq!(error_code(result), ErrorCode::CartEmpty);

    let stats = receipts::stats(&pool, Some(user_id)).await.unwrap();
    assert_eq!(stats.total_receipts, 0);
}

#[sqlx::test]
async fn test_checkout_keeps_company_of_private_client(pool: PgPool) {
    let user_id = new_user(&pool, "ana").await;
    let company = companies::create(&pool, &company_input("EMP001", "B12345678"))
        .await
        .unwrap();
    let profile = ClientCreate {
        full_name: "Ana Pérez".into(),
        company_id: Some(company.id),
        is_private: Some(true),
        ..Default::default()
    };
    clients::create(&pool, user_id, &profile).await.unwrap();
    let dish = new_dish(&pool, "P001", Decimal::new(850, 2)).await;
    cart::add(&pool, user_id, dish.id, 1, Weekday::Lun).await.unwrap();

    let receipt = checkout::checkout(&pool, user_id, today()).await.unwrap();
    assert_eq!(receipt.company_id, Some(company.id));
}

// ── Uniqueness ──

#[sqlx::test]
async fn test_unique_constraints_reject_duplicates(pool: PgPool) {
    new_user(&pool, "ana").await;
    let result = users::create(&pool, "ana", None, "hash", false).await;
    assert_eq!(error_code(result), ErrorCode::UsernameExists);

    companies::create(&pool, &company_input("EMP001", "B1")).await.unwrap();
    let result = companies::create(&pool, &company_input("EMP001", "B2")).await;
    assert_eq!(error_code(result), ErrorCode::CompanyCodeExists);
    let result = companies::create(&pool, &company_input("EMP002", "B1")).await;
    assert_eq!(error_code(result), ErrorCode::CompanyCifExists);

    new_dish(&pool, "P001", Decimal::new(500, 2)).await;
    let result = dishes::create(&pool, &dish_input("P001", Decimal::new(600, 2))).await;
    assert_eq!(error_code(result), ErrorCode::DishCodeExists);
}

#[sqlx::test]
async fn test_availability_duplicates(pool: PgPool) {
    let dish = new_dish(&pool, "P001", Decimal::new(500, 2)).await;
    let monday = AvailabilityInput {
        dish_id: dish.id,
        weekday: Weekday::Lun,
    };
    let tuesday = AvailabilityInput {
        dish_id: dish.id,
        weekday: Weekday::Mar,
    };
    let row = availability::create(&pool, &monday).await.unwrap();
    let other = availability::create(&pool, &tuesday).await.unwrap();

    let result = availability::create(&pool, &monday).await;
    assert_eq!(error_code(result), ErrorCode::AvailabilityExists);
    let result = availability::update(&pool, other.id, &monday).await;
    assert_eq!(error_code(result), ErrorCode::AvailabilityExists);

    assert!(availability::update(&pool, row.id, &monday).await.is_ok());
}

#[sqlx::test]
async fn test_dish_price_without_vat_is_derived(pool: PgPool) {
    let dish = new_dish(&pool, "P001", Decimal::new(1100, 2)).await;
    assert_eq!(dish.price_without_vat, Decimal::new(1000, 2));
}

// ── Inventory ──

#[sqlx::test]
async fn test_movement_below_zero_is_rejected(pool: PgPool) {
    let dish = new_dish(&pool, "P001", Decimal::new(500, 2)).await;
    let lot = inventory::create(
        &pool,
        &InventoryCreate {
            dish_id: dish.id,
            production_id: None,
            location: None,
            available_quantity: 5,
            reserved_quantity: None,
            produced_on: today(),
            expires_on: today().checked_add_days(Days::new(3)).unwrap(),
        },
    )
    .await
    .unwrap();

    let outgoing = |quantity| MovementCreate {
        lot_id: lot.id,
        movement_type: MovementType::Salida,
        quantity,
        reason: "Venta".into(),
    };

    let result = movements::record(&pool, &outgoing(-8), None).await;
    assert_eq!(error_code(result), ErrorCode::InsufficientStock);
    assert_eq!(inventory::get(&pool, lot.id).await.unwrap().available_quantity, 5);

    movements::record(&pool, &outgoing(-3), None).await.unwrap();
    assert_eq!(inventory::get(&pool, lot.id).await.unwrap().available_quantity, 2);
    assert_eq!(movements::list(&pool, Some(lot.id)).await.unwrap().len(), 1);
}

// ── Dashboard ──

#[sqlx::test]
async fn test_dashboard_counts_unpaid_and_client_profiles(pool: PgPool) {
    let with_profile = new_user(&pool, "ana").await;
    let without_profile = new_user(&pool, "luis").await;
    let profile = ClientCreate {
        full_name: "Ana Pérez".into(),
        ..Default::default()
    };
    clients::create(&pool, with_profile, &profile).await.unwrap();
    let dish = new_dish(&pool, "P001", Decimal::new(500, 2)).await;

    for user_id in [with_profile, without_profile] {
        cart::add(&pool, user_id, dish.id, 1, Weekday::Lun).await.unwrap();
    }
    let failed = checkout::checkout(&pool, with_profile, today()).await.unwrap();
    receipts::mark_failed(&pool, failed.id, with_profile).await.unwrap();
    let paid = checkout::checkout(&pool, without_profile, today()).await.unwrap();
    receipts::mark_paid(&pool, paid.id, without_profile).await.unwrap();

    let stats = dashboard::stats(&pool, today()).await.unwrap();
    assert_eq!(stats.pending_receipts, 1);
    assert_eq!(stats.completed_receipts, 1);
    assert_eq!(stats.total_sales, Decimal::new(500, 2));
    assert_eq!(stats.active_clients, 1);
}
