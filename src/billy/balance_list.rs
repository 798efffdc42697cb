use crate::error::{AppError, Result};
use crate::models::AccountBalance;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::str::FromStr;

// The export starts with a title line and a column header line.
const HEADER_LINES: usize = 2;
const FIELDS: usize = 3;

/// Parse a `balanceList.csv` export body.
///
/// The endpoint emits ISO-8859-1, so the raw bytes are decoded before the CSV
/// reader sees them. Empty lines are skipped; every other line after the
/// headers must be `account no, account text, amount`.
pub(super) fn parse_balance_list(body: &[u8]) -> Result<Vec<AccountBalance>> {
    let text = decode_latin1(body);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut accounts = Vec::new();

    for (idx, result) in reader.records().enumerate().skip(HEADER_LINES) {
        let record =
            result.map_err(|e| AppError::Csv(format!("Failed to read row {}: {}", idx + 1, e)))?;
        accounts.push(parse_record(&record, idx + 1)?);
    }

    Ok(accounts)
}

fn parse_record(record: &StringRecord, row: usize) -> Result<AccountBalance> {
    if record.len() != FIELDS {
        return Err(AppError::Csv(format!(
            "Row {} has {} fields, expected {}",
            row,
            record.len(),
            FIELDS
        )));
    }

    let account_no = record[0].parse::<u32>().map_err(|e| {
        AppError::Csv(format!(
            "Invalid account number '{}' in row {}: {}",
            &record[0], row, e
        ))
    })?;
    let amount = parse_amount(&record[2]).ok_or_else(|| {
        AppError::Csv(format!("Invalid amount '{}' in row {}", &record[2], row))
    })?;

    Ok(AccountBalance::new(account_no, &record[1], amount))
}

/// Plain `1234.56` is taken as-is. Anything with a comma is Danish notation,
/// where `.` groups thousands and `,` is the decimal mark.
fn parse_amount(value: &str) -> Option<Decimal> {
    if value.contains(',') {
        let normalized = value.replace('.', "").replace(',', ".");
        return Decimal::from_str(&normalized).ok();
    }

    Decimal::from_str(value).ok()
}

// Every ISO-8859-1 byte maps to the Unicode code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
