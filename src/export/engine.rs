use crate::billy::{AccountingOperations, Period};
use crate::config::{ExportConfig, LayoutConfig};
use crate::error::Result;
use crate::export::balances::{exclude_accounts, join_opening_balances};
use crate::models::AccountBalance;
use crate::sheets::{CELLS_PER_ACCOUNT, SheetOperations, write_accounts, write_metadata};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, instrument};

/// Values gathered during one run and handed from stage to stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportContext {
    pub organization_id: String,
    pub accounts: Vec<AccountBalance>,
    pub latest_entry_date: Option<NaiveDate>,
}

/// Read everything needed from the accounting API: organization, year-end
/// balances joined with opening balances, and the latest entry date.
#[instrument(name = "Collecting balances", skip_all, fields(year = export.financial_year))]
pub async fn collect<AC>(accounting: &AC, export: &ExportConfig) -> Result<ExportContext>
where
    AC: AccountingOperations + Sync,
{
    let year = export.financial_year;

    let organization_id = accounting.organization_id().await?;
    info!(organization_id = %organization_id, "Organization loaded");

    let mut accounts = accounting
        .balance_list(&organization_id, &Period::fiscal_year(&organization_id, year))
        .await?;
    info!(accounts = accounts.len(), "Balance sheet loaded");

    let opening = accounting
        .balance_list(&organization_id, &Period::opening_day(year)?)
        .await?;
    join_opening_balances(&mut accounts, &opening);
    let accounts = exclude_accounts(accounts, |account_no| {
        export.excluded_accounts.contains(account_no)
    });
    info!(accounts = accounts.len(), "Opening balance loaded");

    let latest_entry_date = accounting
        .latest_entry_date(&organization_id, year)
        .await?;
    info!(latest_entry_date = ?latest_entry_date, "Latest postings loaded");

    Ok(ExportContext {
        organization_id,
        accounts,
        latest_entry_date,
    })
}

pub struct ExportEngine<AC, SC> {
    export: ExportConfig,
    layout: LayoutConfig,
    accounting_client: AC,
    sheets_client: SC,
}

impl<AC, SC> ExportEngine<AC, SC>
where
    AC: AccountingOperations + Sync,
    SC: SheetOperations + Sync,
{
    pub fn new(
        export: ExportConfig,
        layout: LayoutConfig,
        accounting_client: AC,
        sheets_client: SC,
    ) -> Self {
        Self {
            export,
            layout,
            accounting_client,
            sheets_client,
        }
    }

    #[instrument(name = "Export", skip_all)]
    pub async fn run(&self) -> Result<()> {
        let context = collect(&self.accounting_client, &self.export).await?;
        self.publish(&context, Utc::now()).await
    }

    /// Write the collected accounts and the run metadata to the worksheet.
    /// Each block is committed on its own, so a failure while stamping the
    /// metadata leaves the account block already written. Only the leading
    /// rows that were filled are sent; the rest of each block is untouched.
    #[instrument(name = "Publishing to spreadsheet", skip_all)]
    async fn publish(&self, context: &ExportContext, generated_at: DateTime<Utc>) -> Result<()> {
        info!("Loading document");
        self.sheets_client.authenticate().await?;

        let worksheet = self
            .sheets_client
            .worksheet(self.layout.worksheet_index)
            .await?;
        info!(title = %worksheet.title, "Sheet loaded");

        let mut cells = self
            .sheets_client
            .read_cells(&worksheet, &self.layout.data_range)
            .await?;
        info!("Cells loaded");

        let written = write_accounts(&mut cells, &context.accounts, self.layout.account_slots);
        if written < context.accounts.len() {
            debug!(
                written,
                total = context.accounts.len(),
                "Accounts beyond the last slot were not written"
            );
        }
        match cells.leading(written * CELLS_PER_ACCOUNT) {
            Some(rows) => self.sheets_client.write_cells(&worksheet, &rows).await?,
            None => debug!("No accounts to write"),
        }

        let mut meta = self
            .sheets_client
            .read_cells(&worksheet, &self.layout.metadata_range)
            .await?;
        info!("Last update cells loaded");

        let generated_at = generated_at.with_timezone(&self.layout.timezone);
        let stamped = write_metadata(&mut meta, &generated_at, context.latest_entry_date);
        if let Some(rows) = meta.leading(stamped) {
            self.sheets_client.write_cells(&worksheet, &rows).await?;
        }

        Ok(())
    }
}
