use sqlx::Pool;
use tracing::debug;

use crate::{
    Error,
    error::Result,
    sample::{Sample, SampleData},
};

/// Persistence backend for samples.
#[allow(async_fn_in_trait)]
pub trait SampleStore {
    async fn insert(&self, data: &SampleData) -> Result<Sample>;
    async fn get(&self, id: i64) -> Result<Sample>;
    /// Writes all columns of an existing record, keeping its id.
    async fn update_in_place(&self, sample: &Sample) -> Result<()>;
    async fn count(&self) -> Result<u64>;
}

pub type SampleRepository = SampleRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct SampleRepositoryImpl<E> {
    executor: E,
}

impl<E> SampleRepositoryImpl<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> SampleStore for SampleRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'a, Database = crate::ChosenDB>,
{
    async fn insert(&self, data: &SampleData) -> Result<Sample> {
        let result = sqlx::query(
            "INSERT INTO sample (text, number, is_something, email, slug, real, password, generated) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.text)
        .bind(data.number)
        .bind(data.is_something)
        .bind(&data.email)
        .bind(&data.slug)
        .bind(data.real)
        .bind(&data.password)
        .bind(&data.generated)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted sample {id}");
        self.get(id).await
    }

    async fn get(&self, id: i64) -> Result<Sample> {
        sqlx::query_as::<_, Sample>("SELECT * FROM sample WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound(format!("Sample {id}")))
    }

    async fn update_in_place(&self, sample: &Sample) -> Result<()> {
        let result = sqlx::query(
            "UPDATE sample SET text = ?, number = ?, is_something = ?, email = ?, slug = ?, real = ?, password = ?, generated = ? WHERE id = ?",
        )
        .bind(&sample.text)
        .bind(sample.number)
        .bind(sample.is_something)
        .bind(&sample.email)
        .bind(&sample.slug)
        .bind(sample.real)
        .bind(&sample.password)
        .bind(&sample.generated)
        .bind(sample.id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Sample {}", sample.id)))
        } else {
            debug!("Updated sample {}", sample.id);
            Ok(())
        }
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM sample")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }
}
