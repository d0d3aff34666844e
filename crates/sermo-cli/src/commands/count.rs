use clap::Parser;
use sermo_dal::SampleStore as _;
use sermo_types::config::BackendConfig;

use crate::commands::{Executor, open_serializer};

#[derive(Parser, Debug)]
pub struct CountCmd {
    #[command(flatten)]
    backend: BackendConfig,
}

impl Executor for CountCmd {
    async fn run(self) -> anyhow::Result<()> {
        let serializer = open_serializer(&self.backend).await?;
        println!("{}", serializer.store().count().await?);
        Ok(())
    }
}
