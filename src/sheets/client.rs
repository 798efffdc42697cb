use super::{CellBlock, CellRange, SheetOperations, Worksheet};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::sheets::auth::{AuthType, from_service_account, verify_authenticator};
use async_trait::async_trait;
use google_sheets4::api::{Scope, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use tracing::{debug, instrument};

// Read and write access to the user's spreadsheets
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    auth: AuthType,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = from_service_account(&config.credentials).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth.clone()),
            auth,
            spreadsheet_id: config.spreadsheet_id.clone(),
        })
    }
}

/// Render a cell value from the API as the text a user would type.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    async fn authenticate(&self) -> Result<()> {
        verify_authenticator(&self.auth).await
    }

    #[instrument(name = "Fetching worksheet", skip(self))]
    async fn worksheet(&self, index: usize) -> Result<Worksheet> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .include_grid_data(false)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to get spreadsheet: {}", e)))?;

        let properties = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .nth(index)
            .and_then(|sheet| sheet.properties)
            .ok_or_else(|| {
                AppError::Sheets(format!("Spreadsheet has no worksheet at index {}", index))
            })?;

        let worksheet = Worksheet {
            sheet_id: properties.sheet_id.unwrap_or_default(),
            title: properties.title.unwrap_or_default(),
        };
        debug!(sheet_id = worksheet.sheet_id, title = %worksheet.title, "Found worksheet");

        Ok(worksheet)
    }

    #[instrument(name = "Reading cells", skip(self, worksheet), fields(sheet = %worksheet.title))]
    async fn read_cells(&self, worksheet: &Worksheet, range: &CellRange) -> Result<CellBlock> {
        let a1 = range.to_a1(&worksheet.title);

        // Formulas are read as formulas so they survive being written back
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &a1)
            .major_dimension("ROWS")
            .value_render_option("FORMULA")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to read range '{}': {}", a1, e)))?;

        let rows = response
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();

        Ok(CellBlock::from_rows(*range, rows))
    }

    #[instrument(name = "Writing cells", skip(self, worksheet, block), fields(sheet = %worksheet.title))]
    async fn write_cells(&self, worksheet: &Worksheet, block: &CellBlock) -> Result<()> {
        let a1 = block.range().to_a1(&worksheet.title);

        let values = block
            .to_rows()
            .into_iter()
            .map(|row| row.into_iter().map(Value::String).collect())
            .collect();

        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(a1.clone()),
            values: Some(values),
        };

        self.hub
            .spreadsheets()
            .values_update(value_range, &self.spreadsheet_id, &a1)
            .value_input_option("USER_ENTERED")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to update range '{}': {}", a1, e)))?;

        Ok(())
    }
}
