use chrono::{DateTime, Locale, NaiveDate, NaiveTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

const LOCALE: Locale = Locale::da_DK;
const TIMESTAMP_FORMAT: &str = "%-d. %B %Y %H:%M";
const DATE_FORMAT: &str = "%-d. %B %Y";

/// Whole currency units, no decimal places, no grouping. Halves round up
/// toward positive infinity, so `2.5` becomes `3` and `-2.5` becomes `-2`.
pub fn format_amount(amount: Decimal) -> String {
    let strategy = match amount.is_sign_negative() {
        true => RoundingStrategy::MidpointTowardZero,
        false => RoundingStrategy::MidpointAwayFromZero,
    };
    let rounded = amount.round_dp_with_strategy(0, strategy);
    if rounded.is_zero() {
        // Avoid rendering "-0" for small negative balances
        return "0".to_string();
    }
    rounded.to_string()
}

/// Like [`format_amount`]; accounts without an opening balance show `0`.
pub fn format_opening_amount(amount: Option<Decimal>) -> String {
    format_amount(amount.unwrap_or(Decimal::ZERO))
}

/// `5. januar 2017 14:30`
pub(super) fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .format_localized(TIMESTAMP_FORMAT, LOCALE)
        .to_string()
}

/// `30. juni 2017`
pub(super) fn format_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(DATE_FORMAT, LOCALE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Europe::Copenhagen;
    use rust_decimal::prelude::dec;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(150000.00)), "150000");
        assert_eq!(format_amount(dec!(10000)), "10000");
        assert_eq!(format_amount(dec!(1234.49)), "1234");
        assert_eq!(format_amount(dec!(1234.50)), "1235");
        assert_eq!(format_amount(dec!(-0.4)), "0");
    }

    #[test]
    fn test_format_amount_rounds_halves_up() {
        assert_eq!(format_amount(dec!(2.5)), "3");
        assert_eq!(format_amount(dec!(-2.5)), "-2");
        assert_eq!(format_amount(dec!(-12000.50)), "-12000");
        assert_eq!(format_amount(dec!(-12000.51)), "-12001");
        assert_eq!(format_amount(dec!(-0.5)), "0");
        assert_eq!(format_amount(dec!(-0.6)), "-1");
    }

    #[test]
    fn test_format_opening_amount() {
        assert_eq!(format_opening_amount(Some(dec!(10000.00))), "10000");
        assert_eq!(format_opening_amount(None), "0");
    }

    #[test]
    fn test_format_timestamp_danish() {
        let timestamp = Copenhagen.with_ymd_and_hms(2017, 1, 5, 14, 30, 0).unwrap();
        assert_eq!(format_timestamp(&timestamp), "5. januar 2017 14:30");
    }

    #[test]
    fn test_format_timestamp_converts_to_copenhagen_time() {
        // Summer time, UTC+2
        let utc = Utc.with_ymd_and_hms(2017, 7, 1, 10, 5, 0).unwrap();
        let local = utc.with_timezone(&Copenhagen);
        assert_eq!(format_timestamp(&local), "1. juli 2017 12:05");
    }

    #[test]
    fn test_format_date_danish() {
        let date = NaiveDate::from_ymd_opt(2017, 12, 31).unwrap();
        assert_eq!(format_date(date), "31. december 2017");
    }
}
