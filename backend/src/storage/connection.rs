use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseConfig;

/// DbConnection owns the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if missing) the database at `url` and make sure the schema exists
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database at {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the database described by the configuration
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.url, config.max_connections).await
    }

    /// Private in-memory database for a single test.
    ///
    /// One connection that never expires, since an in-memory SQLite database
    /// lives only as long as its connection.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS donors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                age INTEGER NOT NULL CHECK (age BETWEEN 18 AND 65),
                blood_type TEXT NOT NULL,
                contact TEXT NOT NULL,
                email TEXT,
                last_donated TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create donors table")?;

        // Default listing is newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_donors_created_at
            ON donors(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS donations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                donor_id INTEGER NOT NULL,
                donation_date TEXT NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                created_at TEXT NOT NULL,
                FOREIGN KEY (donor_id) REFERENCES donors (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create donations table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_donations_donor_id
            ON donations(donor_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blood_inventory (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                donation_id INTEGER NOT NULL,
                blood_type TEXT NOT NULL,
                units INTEGER NOT NULL CHECK (units > 0),
                expiry_date TEXT NOT NULL,
                FOREIGN KEY (donation_id) REFERENCES donations (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create blood_inventory table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_blood_inventory_donation_id
            ON blood_inventory(donation_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
