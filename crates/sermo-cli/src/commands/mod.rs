pub mod count;
pub mod create;
pub mod show;
pub mod update;

use anyhow::Context as _;
use sermo_dal::{SampleRepository, SampleSerializer, SaveError};
use sermo_types::config::BackendConfig;
use serde_json::{Map, Value};
use tracing::debug;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

pub(crate) async fn open_serializer(
    backend: &BackendConfig,
) -> anyhow::Result<SampleSerializer<SampleRepository>> {
    backend.ensure_data_dir()?;
    let db_url = backend.database_url();
    debug!("Opening database {db_url}");
    let pool = sermo_dal::new_pool(&db_url).await?;
    sermo_dal::migrate(&pool).await?;
    Ok(SampleSerializer::new(SampleRepository::new(pool)))
}

pub(crate) fn parse_input(data: &str) -> anyhow::Result<Value> {
    serde_json::from_str(data).context("Input data is not valid JSON")
}

/// Field errors go to stderr as JSON, anything else is propagated.
pub(crate) fn report_invalid(err: SaveError) -> anyhow::Error {
    if let Some(errors) = err.validation_errors() {
        match serde_json::to_string_pretty(errors) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("{errors} ({e})"),
        }
    }
    err.into()
}

pub(crate) fn print_json(value: &Map<String, Value>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
