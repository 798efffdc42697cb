use super::CellBlock;
use super::formatting::{format_amount, format_date, format_opening_amount, format_timestamp};
use crate::models::AccountBalance;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

pub const CELLS_PER_ACCOUNT: usize = 4;

const GENERATED_AT_CELL: usize = 0;
const LATEST_ENTRY_CELL: usize = 1;

/// Write one account per four consecutive cells: number, text, amount,
/// opening amount. At most `slots` accounts are written and never more than
/// fit in the block. Returns the number of accounts written.
pub fn write_accounts(block: &mut CellBlock, accounts: &[AccountBalance], slots: usize) -> usize {
    let capacity = slots.min(block.len() / CELLS_PER_ACCOUNT);

    for (slot, account) in accounts.iter().take(capacity).enumerate() {
        let offset = slot * CELLS_PER_ACCOUNT;
        block.set(offset, account.account_no.to_string());
        block.set(offset + 1, account.account_text.as_str());
        block.set(offset + 2, format_amount(account.amount));
        block.set(offset + 3, format_opening_amount(account.opening_amount));
    }

    accounts.len().min(capacity)
}

/// Stamp the run time and, when there is one, the latest entry date. Without
/// an entry date the second cell keeps its current contents. Returns how many
/// leading cells were set.
pub fn write_metadata(
    block: &mut CellBlock,
    generated_at: &DateTime<Tz>,
    latest_entry_date: Option<NaiveDate>,
) -> usize {
    block.set(GENERATED_AT_CELL, format_timestamp(generated_at));

    match latest_entry_date {
        Some(date) => {
            block.set(LATEST_ENTRY_CELL, format_date(date));
            LATEST_ENTRY_CELL + 1
        }
        None => GENERATED_AT_CELL + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::CellRange;
    use chrono::TimeZone;
    use chrono_tz::Europe::Copenhagen;
    use rust_decimal::prelude::dec;

    fn data_block() -> CellBlock {
        CellBlock::empty(CellRange::new(2, 150, 1, 4))
    }

    fn accounts(count: u32) -> Vec<AccountBalance> {
        (0..count)
            .map(|n| AccountBalance::new(1000 + n, format!("Account {n}"), dec!(100)))
            .collect()
    }

    #[test]
    fn test_write_accounts_cell_offsets() {
        let mut block = data_block();
        let mut sales = AccountBalance::new(1000, "Sales", dec!(150000.00));
        sales.opening_amount = Some(dec!(10000.00));
        let rent = AccountBalance::new(2000, "Rent", dec!(-500.25));

        let written = write_accounts(&mut block, &[sales, rent], 37);

        assert_eq!(written, 2);
        assert_eq!(block.get(0), Some("1000"));
        assert_eq!(block.get(1), Some("Sales"));
        assert_eq!(block.get(2), Some("150000"));
        assert_eq!(block.get(3), Some("10000"));
        assert_eq!(block.get(4), Some("2000"));
        assert_eq!(block.get(5), Some("Rent"));
        assert_eq!(block.get(6), Some("-500"));
        assert_eq!(block.get(7), Some("0"));
        assert_eq!(block.get(8), Some(""));
    }

    #[test]
    fn test_write_accounts_stops_after_last_slot() {
        let mut block = data_block();

        let written = write_accounts(&mut block, &accounts(40), 37);

        assert_eq!(written, 37);
        assert_eq!(block.get(36 * 4), Some("1036"));
        assert_eq!(block.get(37 * 4), Some(""));
        assert!((37 * 4..block.len()).all(|i| block.get(i) == Some("")));
    }

    #[test]
    fn test_write_accounts_limited_by_block_size() {
        let mut block = CellBlock::empty(CellRange::new(2, 3, 1, 4));

        let written = write_accounts(&mut block, &accounts(5), 37);

        assert_eq!(written, 2);
        assert_eq!(block.get(4), Some("1001"));
    }

    #[test]
    fn test_write_accounts_leaves_rest_of_block() {
        let rows = vec![vec!["x".to_string(); 4]; 3];
        let mut block = CellBlock::from_rows(CellRange::new(2, 150, 1, 4), rows);

        write_accounts(&mut block, &accounts(1), 37);

        assert_eq!(block.get(0), Some("1000"));
        assert_eq!(block.get(4), Some("x"));
        assert_eq!(block.get(11), Some("x"));
    }

    #[test]
    fn test_write_metadata() {
        let mut block = CellBlock::empty(CellRange::new(4, 5, 6, 6));
        let generated_at = Copenhagen.with_ymd_and_hms(2017, 3, 1, 8, 15, 0).unwrap();
        let latest = NaiveDate::from_ymd_opt(2017, 2, 28);

        let set = write_metadata(&mut block, &generated_at, latest);

        assert_eq!(set, 2);
        assert_eq!(block.get(0), Some("1. marts 2017 08:15"));
        assert_eq!(block.get(1), Some("28. februar 2017"));
    }

    #[test]
    fn test_write_metadata_without_entry_date_keeps_cell() {
        let rows = vec![vec!["old".to_string()], vec!["30. juni 2016".to_string()]];
        let mut block = CellBlock::from_rows(CellRange::new(4, 5, 6, 6), rows);
        let generated_at = Copenhagen.with_ymd_and_hms(2017, 1, 5, 14, 30, 0).unwrap();

        let set = write_metadata(&mut block, &generated_at, None);

        assert_eq!(set, 1);
        assert_eq!(block.get(0), Some("5. januar 2017 14:30"));
        assert_eq!(block.get(1), Some("30. juni 2016"));
    }
}
