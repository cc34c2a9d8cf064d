//! Company database operations

use shared::error::{AppError, ErrorCode};
use shared::models::{Company, CompanyCreate, CompanyUpdate};
use shared::util::non_blank;
use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::util::{
    MAX_ADDRESS_LEN, MAX_CODE_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

const MAX_CIF_LEN: usize = 20;

fn validate(code: &str, name: &str, address: &Option<String>, cif: &str) -> Result<(), AppError> {
    validate_required_text(code, "code", MAX_CODE_LEN)?;
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(cif, "cif", MAX_CIF_LEN)
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Company>> {
    let rows: Vec<Company> =
        sqlx::query_as("SELECT id, code, name, address, cif FROM companies ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Company> {
    let row: Option<Company> =
        sqlx::query_as("SELECT id, code, name, address, cif FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound).into())
}

pub async fn create(pool: &PgPool, data: &CompanyCreate) -> ServiceResult<Company> {
    validate(&data.code, &data.name, &data.address, &data.cif)?;
    let company: Company = sqlx::query_as(
        r#"
        INSERT INTO companies (code, name, address, cif)
        VALUES ($1, $2, $3, $4)
        RETURNING id, code, name, address, cif
        "#,
    )
    .bind(data.code.trim())
    .bind(data.name.trim())
    .bind(non_blank(data.address.clone()))
    .bind(data.cif.trim())
    .fetch_one(pool)
    .await?;
    tracing::info!(company_id = company.id, code = %company.code, "Company created");
    Ok(company)
}

/// Insert unless a company with the same code exists; returns whether a row was added
pub async fn create_if_missing(pool: &PgPool, data: &CompanyCreate) -> ServiceResult<bool> {
    validate(&data.code, &data.name, &data.address, &data.cif)?;
    let result = sqlx::query(
        r#"
        INSERT INTO companies (code, name, address, cif)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.cif)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update(pool: &PgPool, id: i64, data: &CompanyUpdate) -> ServiceResult<Company> {
    let mut company = get(pool, id).await?;
    if let Some(v) = &data.code {
        company.code = v.trim().to_string();
    }
    if let Some(v) = &data.name {
        company.name = v.trim().to_string();
    }
    if data.address.is_some() {
        company.address = non_blank(data.address.clone());
    }
    if let Some(v) = &data.cif {
        company.cif = v.trim().to_string();
    }
    validate(&company.code, &company.name, &company.address, &company.cif)?;

    let company: Company = sqlx::query_as(
        r#"
        UPDATE companies SET code = $1, name = $2, address = $3, cif = $4
        WHERE id = $5
        RETURNING id, code, name, address, cif
        "#,
    )
    .bind(&company.code)
    .bind(&company.name)
    .bind(&company.address)
    .bind(&company.cif)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(company)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::CompanyNotFound).into());
    }
    Ok(())
}
