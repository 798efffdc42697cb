use rust_decimal::Decimal;

/// One line of the balance list, optionally enriched with the balance at the
/// start of the fiscal year.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    pub account_no: u32,
    pub account_text: String,
    pub amount: Decimal,
    pub opening_amount: Option<Decimal>,
}

impl AccountBalance {
    pub fn new(account_no: u32, account_text: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_no,
            account_text: account_text.into(),
            amount,
            opening_amount: None,
        }
    }
}
