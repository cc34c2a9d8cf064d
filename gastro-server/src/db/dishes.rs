//! Dish database operations

use shared::error::{AppError, ErrorCode};
use shared::models::{
    AvailableDish, BestSeller, DEFAULT_SHELF_LIFE, Dish, DishCreate, DishGroup, DishStatus,
    DishUpdate, Weekday,
};
use shared::money;
use shared::util::non_blank;
use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::util::{MAX_CODE_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

const DISH_COLUMNS: &str = r#"
    d.id, d.code, d.name, d.description, d.price, d.image, d.weight_kg,
    d.dish_group, d.ingredients, d.allergens, d.shelf_life, d.price_without_vat,
    d.calories, d.proteins, d.fat, d.carbohydrates, d.sodium, d.status, d.created_at
"#;

// ── Read ──

/// Dishes ordered by name, optionally filtered by group and status
pub async fn list(
    pool: &PgPool,
    group: Option<DishGroup>,
    status: Option<DishStatus>,
) -> ServiceResult<Vec<Dish>> {
    let sql = format!(
        r#"
        SELECT {DISH_COLUMNS}
        FROM dishes d
        WHERE ($1::dish_group IS NULL OR d.dish_group = $1)
          AND ($2::dish_status IS NULL OR d.status = $2)
        ORDER BY d.name
        "#
    );
    let rows: Vec<Dish> = sqlx::query_as(&sql)
        .bind(group)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Option<Dish>> {
    let sql = format!("SELECT {DISH_COLUMNS} FROM dishes d WHERE d.id = $1");
    let row: Option<Dish> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Like [`get`], failing with `DishNotFound`
pub async fn require(pool: &PgPool, id: i64) -> ServiceResult<Dish> {
    get(pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found")).into()
    })
}

/// Dishes offered on `weekday`, optionally restricted to one group
pub async fn available_on(
    pool: &PgPool,
    weekday: Weekday,
    group: Option<DishGroup>,
) -> ServiceResult<Vec<AvailableDish>> {
    let sql = format!(
        r#"
        SELECT a.id AS availability_id, a.weekday, {DISH_COLUMNS}
        FROM dish_availability a
        JOIN dishes d ON d.id = a.dish_id
        WHERE a.weekday = $1
          AND ($2::dish_group IS NULL OR d.dish_group = $2)
        ORDER BY d.name
        "#
    );
    let rows: Vec<AvailableDish> = sqlx::query_as(&sql)
        .bind(weekday)
        .bind(group)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Distinct groups that have at least one dish
pub async fn groups_in_use(pool: &PgPool) -> ServiceResult<Vec<DishGroup>> {
    let groups: Vec<DishGroup> =
        sqlx::query_scalar("SELECT DISTINCT dish_group FROM dishes ORDER BY dish_group")
            .fetch_all(pool)
            .await?;
    Ok(groups)
}

/// Top dishes by total ordered quantity in the order history
pub async fn best_sellers(pool: &PgPool, limit: i64) -> ServiceResult<Vec<BestSeller>> {
    let rows: Vec<BestSeller> = sqlx::query_as(
        r#"
        SELECT d.id AS dish_id, d.name, SUM(h.quantity)::BIGINT AS total_quantity
        FROM order_history h
        JOIN dishes d ON d.id = h.dish_id
        GROUP BY d.id, d.name
        ORDER BY total_quantity DESC, d.name
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count(pool: &PgPool) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dishes")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

// ── Write ──

fn validate_fields(code: &str, name: &str, price: rust_decimal::Decimal) -> Result<(), AppError> {
    validate_required_text(code, "code", MAX_CODE_LEN)?;
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    money::validate_price(price)
}

pub async fn create(pool: &PgPool, data: &DishCreate) -> ServiceResult<Dish> {
    validate_fields(&data.code, &data.name, data.price)?;
    let shelf_life = non_blank(data.shelf_life.clone()).unwrap_or_else(|| DEFAULT_SHELF_LIFE.into());
    validate_required_text(&shelf_life, "shelf_life", MAX_SHORT_TEXT_LEN)?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO dishes (
            code, name, description, price, image, weight_kg, dish_group,
            ingredients, allergens, shelf_life, price_without_vat,
            calories, proteins, fat, carbohydrates, sodium, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING id
        "#,
    )
    .bind(data.code.trim())
    .bind(data.name.trim())
    .bind(data.description.clone().unwrap_or_default())
    .bind(data.price)
    .bind(non_blank(data.image.clone()))
    .bind(data.weight_kg.unwrap_or_default())
    .bind(data.group.unwrap_or_default())
    .bind(data.ingredients.clone().unwrap_or_default())
    .bind(data.allergens.clone().unwrap_or_default())
    .bind(&shelf_life)
    .bind(money::price_without_vat(data.price))
    .bind(data.calories)
    .bind(data.proteins)
    .bind(data.fat)
    .bind(data.carbohydrates)
    .bind(data.sodium)
    .bind(data.status.unwrap_or_default())
    .fetch_one(pool)
    .await?;

    tracing::info!(dish_id = id, code = %data.code, "Dish created");
    require(pool, id).await
}

/// Merge the update into the stored dish; the VAT-exclusive price is recomputed
pub async fn update(pool: &PgPool, id: i64, data: &DishUpdate) -> ServiceResult<Dish> {
    let mut dish = require(pool, id).await?;

    if let Some(v) = &data.code {
        dish.code = v.trim().to_string();
    }
    if let Some(v) = &data.name {
        dish.name = v.trim().to_string();
    }
    if let Some(v) = &data.description {
        dish.description = v.clone();
    }
    if let Some(v) = data.price {
        dish.price = v;
    }
    if data.image.is_some() {
        dish.image = non_blank(data.image.clone());
    }
    if let Some(v) = data.weight_kg {
        dish.weight_kg = v;
    }
    if let Some(v) = data.group {
        dish.dish_group = v;
    }
    if let Some(v) = &data.ingredients {
        dish.ingredients = v.clone();
    }
    if let Some(v) = &data.allergens {
        dish.allergens = v.clone();
    }
    if let Some(v) = non_blank(data.shelf_life.clone()) {
        dish.shelf_life = v;
    }
    if data.calories.is_some() {
        dish.calories = data.calories;
    }
    if data.proteins.is_some() {
        dish.proteins = data.proteins;
    }
    if data.fat.is_some() {
        dish.fat = data.fat;
    }
    if data.carbohydrates.is_some() {
        dish.carbohydrates = data.carbohydrates;
    }
    if data.sodium.is_some() {
        dish.sodium = data.sodium;
    }
    if let Some(v) = data.status {
        dish.status = v;
    }

    validate_fields(&dish.code, &dish.name, dish.price)?;
    validate_required_text(&dish.shelf_life, "shelf_life", MAX_SHORT_TEXT_LEN)?;

    sqlx::query(
        r#"
        UPDATE dishes SET
            code = $1, name = $2, description = $3, price = $4, image = $5,
            weight_kg = $6, dish_group = $7, ingredients = $8, allergens = $9,
            shelf_life = $10, price_without_vat = $11, calories = $12, proteins = $13,
            fat = $14, carbohydrates = $15, sodium = $16, status = $17
        WHERE id = $18
        "#,
    )
    .bind(&dish.code)
    .bind(&dish.name)
    .bind(&dish.description)
    .bind(dish.price)
    .bind(&dish.image)
    .bind(dish.weight_kg)
    .bind(dish.dish_group)
    .bind(&dish.ingredients)
    .bind(&dish.allergens)
    .bind(&dish.shelf_life)
    .bind(money::price_without_vat(dish.price))
    .bind(dish.calories)
    .bind(dish.proteins)
    .bind(dish.fat)
    .bind(dish.carbohydrates)
    .bind(dish.sodium)
    .bind(dish.status)
    .bind(id)
    .execute(pool)
    .await?;

    require(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::DishNotFound).into());
    }
    tracing::info!(dish_id = id, "Dish deleted");
    Ok(())
}
