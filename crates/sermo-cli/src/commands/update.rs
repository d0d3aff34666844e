use clap::Parser;
use sermo_dal::SampleStore as _;
use sermo_types::config::BackendConfig;

use crate::commands::{Executor, open_serializer, parse_input, print_json, report_invalid};

#[derive(Parser, Debug)]
pub struct UpdateCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(long, help = "Id of the sample to replace")]
    pub id: i64,
    #[arg(short, long, help = "All writable sample fields as JSON object")]
    pub data: String,
}

impl Executor for UpdateCmd {
    async fn run(self) -> anyhow::Result<()> {
        let input = parse_input(&self.data)?;
        let serializer = open_serializer(&self.backend).await?;
        let mut sample = serializer.store().get(self.id).await?;
        let sample = serializer
            .update(&mut sample, &input)
            .await
            .map_err(report_invalid)?;
        print_json(&serializer.to_output(&sample))
    }
}
