//! Display helpers shared by every front end.

use chrono::NaiveDate;

use crate::{CurrencyFormat, Money};

/// Renders a major-unit amount with the currency symbol and thousands
/// separators, e.g. `R1,234.50`.
pub fn format_amount(amount: f64, currency: &CurrencyFormat) -> String {
    match Money::from_major(amount, currency.decimal_digits) {
        Some(money) => money.format(currency),
        None => format!("{}{amount}", currency.symbol),
    }
}

/// Renders a date as `May 1, 2023`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
