//! Client profile database operations

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{ActiveClient, Client, ClientCreate, ClientUpdate};
use shared::util::non_blank;
use sqlx::{PgExecutor, PgPool};
use validator::ValidateEmail;

use crate::error::ServiceResult;
use crate::util::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, validate_optional_text,
    validate_required_text,
};

const MAX_NATIONAL_ID_LEN: usize = 20;

const CLIENT_SELECT: &str = r#"
    SELECT c.id, c.full_name, c.created_at, c.important, c.user_id, c.company_id,
           co.name AS company_name, c.is_private, c.private_address, c.phone,
           c.national_id, c.email
    FROM clients c
    LEFT JOIN companies co ON co.id = c.company_id
"#;

/// Field rules shared by create, update and the profile form
fn validate_fields(
    full_name: &str,
    private_address: &Option<String>,
    phone: &Option<String>,
    national_id: &Option<String>,
    email: &Option<String>,
) -> Result<(), AppError> {
    validate_required_text(full_name, "full_name", MAX_NAME_LEN)?;
    validate_optional_text(private_address, "private_address", MAX_ADDRESS_LEN)?;
    validate_optional_text(phone, "phone", MAX_PHONE_LEN)?;
    validate_optional_text(national_id, "national_id", MAX_NATIONAL_ID_LEN)?;
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    if let Some(e) = email
        && !e.validate_email()
    {
        return Err(AppError::with_message(ErrorCode::InvalidFormat, "Invalid email address")
            .with_detail("field", "email"));
    }
    Ok(())
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Client>> {
    let sql = format!("{CLIENT_SELECT} ORDER BY c.full_name");
    let rows: Vec<Client> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Client> {
    let sql = format!("{CLIENT_SELECT} WHERE c.id = $1");
    let row: Option<Client> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::new(ErrorCode::ClientNotFound).into())
}

pub async fn find_by_user(pool: &PgPool, user_id: i64) -> ServiceResult<Option<Client>> {
    let sql = format!("{CLIENT_SELECT} WHERE c.user_id = $1");
    let row: Option<Client> = sqlx::query_as(&sql).bind(user_id).fetch_optional(pool).await?;
    Ok(row)
}

/// Insert a profile for `user_id`; a second profile surfaces as `ClientProfileExists`
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
    data: &ClientCreate,
) -> ServiceResult<i64> {
    let email = non_blank(data.email.clone());
    validate_fields(
        &data.full_name,
        &data.private_address,
        &data.phone,
        &data.national_id,
        &email,
    )?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO clients (
            full_name, important, user_id, company_id, is_private,
            private_address, phone, national_id, email
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(data.full_name.trim())
    .bind(data.important.unwrap_or(false))
    .bind(user_id)
    .bind(data.company_id)
    .bind(data.is_private.unwrap_or(false))
    .bind(non_blank(data.private_address.clone()))
    .bind(non_blank(data.phone.clone()))
    .bind(non_blank(data.national_id.clone()))
    .bind(email)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

pub async fn update(pool: &PgPool, id: i64, data: &ClientUpdate) -> ServiceResult<Client> {
    let mut client = get(pool, id).await?;
    if let Some(v) = &data.full_name {
        client.full_name = v.trim().to_string();
    }
    if let Some(v) = data.important {
        client.important = v;
    }
    if data.company_id.is_some() {
        client.company_id = data.company_id;
    }
    if let Some(v) = data.is_private {
        client.is_private = v;
    }
    if data.private_address.is_some() {
        client.private_address = non_blank(data.private_address.clone());
    }
    if data.phone.is_some() {
        client.phone = non_blank(data.phone.clone());
    }
    if data.national_id.is_some() {
        client.national_id = non_blank(data.national_id.clone());
    }
    if data.email.is_some() {
        client.email = non_blank(data.email.clone());
    }
    validate_fields(
        &client.full_name,
        &client.private_address,
        &client.phone,
        &client.national_id,
        &client.email,
    )?;

    sqlx::query(
        r#"
        UPDATE clients SET
            full_name = $1, important = $2, company_id = $3, is_private = $4,
            private_address = $5, phone = $6, national_id = $7, email = $8
        WHERE id = $9
        "#,
    )
    .bind(&client.full_name)
    .bind(client.important)
    .bind(client.company_id)
    .bind(client.is_private)
    .bind(&client.private_address)
    .bind(&client.phone)
    .bind(&client.national_id)
    .bind(&client.email)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Create or replace the profile of `user_id` (web profile form)
pub async fn save_profile(pool: &PgPool, user_id: i64, data: &ClientCreate) -> ServiceResult<Client> {
    let email = non_blank(data.email.clone());
    validate_fields(
        &data.full_name,
        &data.private_address,
        &data.phone,
        &data.national_id,
        &email,
    )?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO clients (
            full_name, user_id, company_id, is_private,
            private_address, phone, national_id, email
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT ON CONSTRAINT uq_clients_user DO UPDATE SET
            full_name = EXCLUDED.full_name,
            company_id = EXCLUDED.company_id,
            is_private = EXCLUDED.is_private,
            private_address = EXCLUDED.private_address,
            phone = EXCLUDED.phone,
            national_id = EXCLUDED.national_id,
            email = EXCLUDED.email
        RETURNING id
        "#,
    )
    .bind(data.full_name.trim())
    .bind(user_id)
    .bind(data.company_id)
    .bind(data.is_private.unwrap_or(false))
    .bind(non_blank(data.private_address.clone()))
    .bind(non_blank(data.phone.clone()))
    .bind(non_blank(data.national_id.clone()))
    .bind(email)
    .fetch_one(pool)
    .await?;

    tracing::info!(client_id = id, user_id, "Client profile saved");
    get(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ClientNotFound).into());
    }
    Ok(())
}

pub async fn count(pool: &PgPool) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Clients with at least one order issued on or after `since`
pub async fn active_since(pool: &PgPool, since: NaiveDate) -> ServiceResult<Vec<ActiveClient>> {
    let rows: Vec<ActiveClient> = sqlx::query_as(
        r#"
        SELECT c.id, c.full_name, u.username, co.name AS company_name,
               COUNT(h.id) AS order_count
        FROM clients c
        JOIN users u ON u.id = c.user_id
        JOIN order_history h ON h.user_id = c.user_id
        LEFT JOIN companies co ON co.id = c.company_id
        WHERE h.issued_on >= $1
        GROUP BY c.id, c.full_name, u.username, co.name
        ORDER BY order_count DESC, c.full_name
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
