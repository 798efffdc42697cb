mod export;
mod show;

use crate::error::Result;
use clap::{Parser, Subcommand};

pub use export::ExportArgs;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "billy-sheets-sync")]
#[command(about = "Export Billy balance sheets to Google Sheets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Export(args) => export::execute(args).await,
            Commands::Show { resource } => resource.execute().await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch balances from Billy and write them to the spreadsheet
    Export(ExportArgs),
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
