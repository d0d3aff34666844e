use clap::Parser;
use sermo_types::config::BackendConfig;

use crate::commands::{Executor, open_serializer, parse_input, print_json, report_invalid};

#[derive(Parser, Debug)]
pub struct CreateCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Sample fields as JSON object")]
    pub data: String,
}

impl Executor for CreateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let input = parse_input(&self.data)?;
        let serializer = open_serializer(&self.backend).await?;
        let sample = serializer.create(&input).await.map_err(report_invalid)?;
        print_json(&serializer.to_output(&sample))
    }
}
