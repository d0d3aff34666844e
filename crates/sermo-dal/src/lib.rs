pub mod error;
pub mod sample;
pub mod serializer;
pub mod store;

pub use error::{Error, SaveError};
pub use sample::{CreateSample, Sample, SampleData};
pub use serializer::SampleSerializer;
pub use sqlx::Error as SqlxError;
pub use store::{SampleRepository, SampleRepositoryImpl, SampleStore};

use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub async fn new_pool(database_url: &str) -> Result<Pool, Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Creates or upgrades the `sample` table.
pub async fn migrate(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    debug!("Database migrated");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Pool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}
