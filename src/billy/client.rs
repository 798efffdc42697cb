use super::AccountingOperations;
use crate::billy::balance_list::parse_balance_list;
use crate::billy::types::{OrganizationResponse, Period, TransactionsResponse};
use crate::config::BillyConfig;
use crate::error::{AppError, Result};
use crate::models::AccountBalance;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";
// Controls number formatting and column labels in CSV exports
const ACCEPT_LANGUAGE: &str = "da_DK";

pub struct BillyClient {
    client: Client,
    api_token: String,
    api_base_url: Url,
}

impl BillyClient {
    pub fn new(config: &BillyConfig) -> Result<Self> {
        let mut api_base_url = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("Invalid Billy API URL: {}", e)))?;

        // Url::join replaces the last path segment unless the base ends in '/'
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        if !config.verify_tls {
            debug!("TLS certificate verification disabled for Billy API");
        }

        let client = reqwest::ClientBuilder::new()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build reqwest client: {}", e)))?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            api_base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Accounting(format!(
        "Failed to {}: {} - {}",
        action, status, body
    )))
}

#[async_trait]
impl AccountingOperations for BillyClient {
    #[instrument(name = "Fetching organization", skip_all)]
    async fn organization_id(&self) -> Result<String> {
        let url = self.endpoint("organization")?;

        let response = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.api_token)
            .send()
            .await?;
        let response = ensure_success(response, "load organization").await?;

        let body: OrganizationResponse = response.json().await?;

        Ok(body.organization.id)
    }

    #[instrument(name = "Fetching balance list", skip(self, period), fields(period = %period))]
    async fn balance_list(
        &self,
        organization_id: &str,
        period: &Period,
    ) -> Result<Vec<AccountBalance>> {
        let url = self.endpoint(&format!(
            "organizations/{}/balanceList.csv",
            organization_id
        ))?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("accessToken", self.api_token.clone()),
                ("acceptLanguage", ACCEPT_LANGUAGE.to_string()),
                ("period", period.to_string()),
            ])
            .send()
            .await?;
        let response = ensure_success(response, "load balance list").await?;

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Balance list downloaded");

        parse_balance_list(&body)
    }

    #[instrument(name = "Fetching latest transaction", skip(self))]
    async fn latest_entry_date(
        &self,
        organization_id: &str,
        financial_year: i32,
    ) -> Result<Option<NaiveDate>> {
        let url = self.endpoint("transactions")?;
        let period = Period::fiscal_year(organization_id, financial_year);

        let response = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.api_token)
            .query(&[
                ("organizationId", organization_id.to_string()),
                ("sortProperty", "entryDate".to_string()),
                ("sortDirection", "DESC".to_string()),
                ("pageSize", "1".to_string()),
                ("entryDatePeriod", period.to_string()),
            ])
            .send()
            .await?;
        let response = ensure_success(response, "load transactions").await?;

        let body: TransactionsResponse = response.json().await?;

        Ok(body.transactions.first().map(|t| t.entry_date))
    }
}
