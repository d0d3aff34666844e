use clap::Parser;
use sermo_dal::SampleStore as _;
use sermo_types::config::BackendConfig;

use crate::commands::{Executor, open_serializer, print_json};

#[derive(Parser, Debug)]
pub struct ShowCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Id of the sample")]
    pub id: i64,
}

impl Executor for ShowCmd {
    async fn run(self) -> anyhow::Result<()> {
        let serializer = open_serializer(&self.backend).await?;
        let sample = serializer.store().get(self.id).await?;
        print_json(&serializer.to_output(&sample))
    }
}
