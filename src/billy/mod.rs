mod balance_list;
mod client;
pub mod types;

pub use client::BillyClient;
pub use types::Period;

use crate::error::Result;
use crate::models::AccountBalance;

use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait AccountingOperations {
    async fn organization_id(&self) -> Result<String>;

    async fn balance_list(
        &self,
        organization_id: &str,
        period: &Period,
    ) -> Result<Vec<AccountBalance>>;

    /// Entry date of the most recent transaction in the fiscal year, if any.
    async fn latest_entry_date(
        &self,
        organization_id: &str,
        financial_year: i32,
    ) -> Result<Option<NaiveDate>>;
}
