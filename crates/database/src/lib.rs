//! SQLite persistence layer for Personal Assistant.
//!
//! This crate provides async database operations for users, blood pressure
//! readings, ordered skills and plan-it activities using SQLx with SQLite.
//! Every operation takes the acting user's id explicitly and only touches
//! rows that user owns.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::User, blood_pressure, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:personal_assistant.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user and record a reading
//!     let user = User {
//!         id: "c27fb365-0c84-4cf2-8555-814bb065e448".to_string(),
//!         username: "bob".to_string(),
//!         registration_accepted: true,
//!     };
//!     user::create_user(db.pool(), &user).await?;
//!     blood_pressure::create_reading(db.pool(), &user.id, 120, 80, 64).await?;
//!
//!     if let Some(summary) = blood_pressure::summary_for_user(db.pool(), &user.id).await? {
//!         println!("median systolic: {}", summary.averages.systolic_median);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod activity_location;
pub mod activity_type;
pub mod blood_pressure;
pub mod config;
pub mod error;
pub mod item;
pub mod models;
pub mod ordering;
pub mod skill;
pub mod user;
pub mod validation;

pub use activity::{DueStatus, NewActivity};
pub use config::{ConfigError, DatabaseConfig};
pub use error::{DatabaseError, Result};
pub use models::{
    Activity, ActivityInstance, ActivityLocation, ActivityType, BloodPressure, Item, Skill, User,
};
pub use ordering::Orderable;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/personal_assistant.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, config::DEFAULT_POOL_SIZE).await
    }

    /// Connect using settings loaded by [`DatabaseConfig::from_env`].
    pub async fn connect_with_config(config: &DatabaseConfig) -> Result<Self> {
        Self::connect_with_pool_size(&config.database_url, config.pool_size).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_connect_with_config() {
        let config = DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            pool_size: 2,
        };
        let db = Database::connect_with_config(&config).await.unwrap();
        db.migrate().await.unwrap();
        assert!(user::list_users(db.pool()).await.unwrap().is_empty());
        db.close().await;
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = test_db().await;
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let db = test_db().await;
        let user = test_user(&db, "cascade").await;

        blood_pressure::create_reading(db.pool(), &user.id, 120, 80, 60)
            .await
            .unwrap();
        skill::create_skill(db.pool(), &user.id, "Rust", None)
            .await
            .unwrap();

        user::delete_user(db.pool(), &user.id).await.unwrap();

        assert!(blood_pressure::list_readings(db.pool(), &user.id)
            .await
            .unwrap()
            .is_empty());
        assert!(skill::list_skills(db.pool(), &user.id)
            .await
            .unwrap()
            .is_empty());
    }
}
