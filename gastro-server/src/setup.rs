//! `gastro-server setup`: one-shot installation tasks
//!
//! Runs migrations, then the requested optional steps, then prints the
//! production checklist. Safe to run repeatedly.

use shared::models::{ClientCreate, CompanyCreate};
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{clients, companies, users};
use crate::error::BoxError;
use crate::state;
use crate::util::{
    MAX_USERNAME_LEN, generate_secret_key, hash_password, validate_password,
    validate_required_text,
};

#[derive(Debug, Default, clap::Args)]
pub struct SetupArgs {
    /// Create a staff account (skipped when one already exists)
    #[arg(long, num_args = 3, value_names = ["USER", "EMAIL", "PASSWORD"])]
    pub create_superuser: Option<Vec<String>>,
    /// Insert the sample companies if they are missing
    #[arg(long)]
    pub load_sample_data: bool,
    /// Print a fresh 50-character secret
    #[arg(long)]
    pub generate_secret_key: bool,
}

pub async fn run(config: &Config, args: &SetupArgs) -> Result<(), BoxError> {
    println!("Setting up gastro-server ({})", config.environment);
    let pool = state::connect(config).await?;
    println!("Migrations applied");

    if args.generate_secret_key {
        println!("JWT_SECRET={}", generate_secret_key());
        println!("Store this value in your .env file");
    }

    if let Some([username, email, password]) = args.create_superuser.as_deref() {
        create_superuser(&pool, username, email, password).await?;
    }

    if args.load_sample_data {
        load_sample_data(&pool).await?;
    }

    println!("Configuration checklist:");
    let checks = config.verify();
    for check in &checks {
        println!("  {check}");
    }
    if checks.iter().all(|c| c.passed) {
        println!("Ready for production");
    } else {
        println!("Review the failing items before going live");
    }
    Ok(())
}

/// Profile created alongside the staff account
fn superuser_profile(username: &str, email: &str) -> ClientCreate {
    ClientCreate {
        full_name: format!("Admin {username}"),
        is_private: Some(true),
        email: Some(email.to_string()),
        ..Default::default()
    }
}

async fn create_superuser(
    pool: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), BoxError> {
    if users::staff_exists(pool).await? {
        println!("A staff account already exists, skipping");
        return Ok(());
    }
    validate_required_text(username, "username", MAX_USERNAME_LEN)?;
    validate_required_text(email, "email", crate::util::MAX_EMAIL_LEN)?;
    validate_password(password)?;
    let hash = hash_password(password).map_err(|e| format!("password hashing failed: {e}"))?;

    let mut tx = pool.begin().await?;
    let user = users::create(&mut *tx, username, Some(email), &hash, true).await?;
    clients::create(&mut *tx, user.id, &superuser_profile(username, email)).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %username, "Staff account created");
    println!("Staff account {username} created");
    Ok(())
}

fn sample_companies() -> Vec<CompanyCreate> {
    vec![
        CompanyCreate {
            code: "EMP001".into(),
            name: "Restaurante El Buen Sabor".into(),
            address: Some("Calle Mayor 123, Madrid".into()),
            cif: "B12345678".into(),
        },
        CompanyCreate {
            code: "EMP002".into(),
            name: "Catering Delicious".into(),
            address: Some("Avenida Principal 456, Barcelona".into()),
            cif: "B87654321".into(),
        },
    ]
}

async fn load_sample_data(pool: &PgPool) -> Result<(), BoxError> {
    for company in sample_companies() {
        if companies::create_if_missing(pool, &company).await? {
            println!("  Company created: {}", company.name);
        }
    }
    println!("Sample data loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superuser_profile_is_private() {
        let profile = superuser_profile("root", "root@example.com");
        assert_eq!(profile.full_name, "Admin root");
        assert_eq!(profile.is_private, Some(true));
        assert_eq!(profile.company_id, None);
        assert_eq!(profile.email.as_deref(), Some("root@example.com"));
    }

    #[test]
    fn test_sample_companies_have_unique_keys() {
        let companies = sample_companies();
        assert_eq!(companies.len(), 2);
        assert_ne!(companies[0].code, companies[1].code);
        assert_ne!(companies[0].cif, companies[1].cif);
    }
}
