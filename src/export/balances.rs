use crate::models::AccountBalance;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Attach opening balances to the year-end accounts with the same account
/// number. Opening balances for accounts missing from the year-end list are
/// dropped.
#[instrument(name = "Joining opening balances", skip_all)]
pub fn join_opening_balances(accounts: &mut [AccountBalance], opening: &[AccountBalance]) {
    // Later duplicates win, matching a plain overwrite-on-insert lookup table
    let lookup: HashMap<u32, usize> = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| (account.account_no, idx))
        .collect();

    let mut unmatched = 0;
    for balance in opening {
        match lookup.get(&balance.account_no) {
            Some(&idx) => accounts[idx].opening_amount = Some(balance.amount),
            None => unmatched += 1,
        }
    }

    debug!(unmatched, "Opening balances joined");
}

/// Drop accounts for which `is_excluded` holds, keeping the order of the rest.
pub fn exclude_accounts<F>(accounts: Vec<AccountBalance>, is_excluded: F) -> Vec<AccountBalance>
where
    F: Fn(u32) -> bool,
{
    accounts
        .into_iter()
        .filter(|account| !is_excluded(account.account_no))
        .collect()
}
