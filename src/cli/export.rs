use crate::billy::BillyClient;
use crate::config::{AccountRanges, Config, Overrides};
use crate::error::{AppError, Result};
use crate::export::{ExportContext, ExportEngine, collect};
use crate::sheets::{SheetsClient, format_amount, format_opening_amount};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Fetch and log the balances without touching the spreadsheet
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Kept as text and parsed by `overrides`, so a bad value is a config error
    #[arg(long = "year", env = "FINANCIAL_YEAR")]
    pub financial_year: Option<String>,

    /// Account number ranges to leave out, e.g. 62000-63000,70000-70100
    #[arg(long, env = "EXCLUDED_ACCOUNTS")]
    pub excluded_accounts: Option<String>,

    #[arg(long, env = "BILLY_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long, env = "GOOGLE_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Service account key as JSON text
    #[arg(long, env = "GOOGLE_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,
}

impl ExportArgs {
    fn overrides(&self) -> Result<Overrides> {
        let financial_year = self
            .financial_year
            .as_deref()
            .map(|year| {
                year.trim().parse::<i32>().map_err(|e| {
                    AppError::Config(format!("Invalid financial year '{}': {}", year, e))
                })
            })
            .transpose()?;
        let excluded_accounts = self
            .excluded_accounts
            .as_deref()
            .map(str::parse::<AccountRanges>)
            .transpose()?;

        Ok(Overrides {
            api_token: self.api_token.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            credentials: self.credentials.clone(),
            financial_year,
            excluded_accounts,
        })
    }
}

pub async fn execute(args: &ExportArgs) -> Result<()> {
    info!("Export started");

    let overrides = args.overrides()?;
    let config = Config::load(args.config.as_deref())?.with_overrides(overrides);
    config.validate(!args.dry_run)?;

    let billy_client = BillyClient::new(&config.billy)?;

    if args.dry_run {
        let context = collect(&billy_client, &config.export).await?;
        report(&context);
        return Ok(());
    }

    let sheets_client = SheetsClient::new(&config.google).await?;

    let engine = ExportEngine::new(config.export, config.layout, billy_client, sheets_client);
    engine.run().await
}

fn report(context: &ExportContext) {
    for account in &context.accounts {
        info!(
            account_no = account.account_no,
            account_text = %account.account_text,
            amount = %format_amount(account.amount),
            opening_amount = %format_opening_amount(account.opening_amount),
            "Account"
        );
    }

    info!(
        organization_id = %context.organization_id,
        accounts = context.accounts.len(),
        latest_entry_date = ?context.latest_entry_date,
        "Dry run, spreadsheet not updated"
    );
}
