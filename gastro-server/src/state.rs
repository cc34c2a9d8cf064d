//! Application state

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tera::Tera;

use crate::auth::rate_limit::RateLimiter;
use crate::cache::GroupCache;
use crate::config::Config;
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Compiled page templates
    pub templates: Arc<Tera>,
    /// Rate limiter for login/signup routes
    pub rate_limiter: RateLimiter,
    /// Distinct dish groups in use (1 hour TTL)
    pub group_cache: GroupCache,
}

impl AppState {
    /// Connect, run migrations and load templates
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = connect(config).await?;
        let templates = load_templates()?;
        Ok(Self::from_parts(pool, config.clone(), templates))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(pool: PgPool, config: Config, templates: Tera) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            templates: Arc::new(templates),
            rate_limiter: RateLimiter::new(),
            group_cache: GroupCache::new(),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}

/// Open the connection pool and apply pending migrations
pub async fn connect(config: &Config) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");
    Ok(pool)
}

/// Compile every template under `templates/`
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))?;
    tera.autoescape_on(vec![".html.tera", ".html"]);
    Ok(tera)
}
