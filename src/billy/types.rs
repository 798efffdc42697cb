use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub(super) struct OrganizationResponse {
    pub(super) organization: BillyOrganization,
}

// https://www.billy.dk/api/#organizations
#[derive(Debug, Deserialize)]
pub struct BillyOrganization {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TransactionsResponse {
    #[serde(default)]
    pub(super) transactions: Vec<BillyTransaction>,
}

// https://www.billy.dk/api/#transactions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillyTransaction {
    pub entry_date: NaiveDate,
}

/// Period filter understood by the balance list and transaction endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    FiscalYear { organization_id: String, year: i32 },
    Dates { from: NaiveDate, to: NaiveDate },
}

impl Period {
    pub fn fiscal_year(organization_id: &str, year: i32) -> Self {
        Period::FiscalYear {
            organization_id: organization_id.to_string(),
            year,
        }
    }

    /// The single day on which the fiscal year starts, January 1st.
    pub fn opening_day(year: i32) -> Result<Self> {
        let day = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::Config(format!("Invalid financial year {}", year)))?;

        Ok(Period::Dates { from: day, to: day })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::FiscalYear {
                organization_id,
                year,
            } => write!(f, "fiscalyear:{},{}", organization_id, year),
            Period::Dates { from, to } => write!(
                f,
                "dates:{}...{}",
                from.format("%Y-%m-%d"),
                to.format("%Y-%m-%d")
            ),
        }
    }
}
