use clap::{Parser, Subcommand};

use crate::commands::{
    count::CountCmd, create::CreateCmd, show::ShowCmd, update::UpdateCmd,
};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for sermo - validates, stores and displays sample records."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Create(CreateCmd),
    Update(UpdateCmd),
    Show(ShowCmd),
    Count(CountCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Create(cmd) => cmd.run().await,
            Command::Update(cmd) => cmd.run().await,
            Command::Show(cmd) => cmd.run().await,
            Command::Count(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        let config = CliConfig::try_parse_from([
            "sermo-cli",
            "update",
            "--database-url",
            "sqlite::memory:",
            "--id",
            "3",
            "--data",
            "{}",
        ])
        .unwrap();
        assert!(matches!(config.command, Command::Update(cmd) if cmd.id == 3));
    }

    #[test]
    fn test_update_requires_id() {
        let res = CliConfig::try_parse_from(["sermo-cli", "update", "--data", "{}"]);
        assert!(res.is_err());
    }
}
