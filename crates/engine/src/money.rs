use std::{fmt, str::FromStr};

use crate::{CurrencyFormat, EngineError, ResultEngine};

/// Signed money amount represented as an integer number of **minor units**,
/// together with how many fraction digits those minor units stand for.
///
/// Records keep their amounts as `f64` (the persisted JSON format); `Money`
/// is the bridge used whenever an amount crosses a human boundary: parsing
/// user input and rendering totals.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34, 2);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more fraction digits than the currency has):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Money {
    minor: i64,
    digits: u8,
}

impl Money {
    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64, digits: u8) -> Self {
        Self { minor, digits }
    }

    /// Rounds a major-unit amount to the nearest minor unit.
    ///
    /// Returns `None` for NaN, infinities and values that do not fit `i64`.
    #[must_use]
    pub fn from_major(amount: f64, digits: u8) -> Option<Self> {
        let scaled = (amount * scale(digits) as f64).round();
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self {
            minor: scaled as i64,
            digits,
        })
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    /// Returns the number of fraction digits.
    #[must_use]
    pub const fn digits(self) -> u8 {
        self.digits
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.minor > 0
    }

    /// Converts back to a major-unit `f64`, the representation records use.
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.minor as f64 / scale(self.digits) as f64
    }

    /// Parses a decimal string into minor units with `digits` fraction digits.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - at most `digits` fractional digits
    /// - rejects empty/invalid strings
    pub fn parse(s: &str, digits: u8) -> ResultEngine<Self> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        if digits > CurrencyFormat::MAX_DECIMAL_DIGITS {
            return Err(EngineError::InvalidAmount(format!(
                "{digits} decimal digits are not supported"
            )));
        }

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let fraction_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let fraction: i64 = match fraction_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > usize::from(digits) {
                    return Err(EngineError::InvalidAmount("too many decimals".to_string()));
                }
                let missing = digits - frac.len() as u8;
                frac.parse::<i64>()
                    .map_err(|_| invalid())?
                    .checked_mul(scale(missing))
                    .ok_or_else(overflow)?
            }
        };

        let total = major
            .checked_mul(scale(digits))
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(overflow)?;

        let minor = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Self { minor, digits })
    }

    /// Renders the amount with the currency symbol and thousands separators,
    /// e.g. `R1,234.50` or `-R12.00`.
    #[must_use]
    pub fn format(self, currency: &CurrencyFormat) -> String {
        let sign = if self.minor < 0 { "-" } else { "" };
        format!("{sign}{}{}", currency.symbol, self.unsigned_digits(true))
    }

    fn unsigned_digits(self, grouped: bool) -> String {
        let abs = self.minor.unsigned_abs();
        let unit = scale(self.digits).unsigned_abs();
        let major = abs / unit;
        let major = if grouped {
            group_thousands(major)
        } else {
            major.to_string()
        };
        if self.digits == 0 {
            return major;
        }
        let fraction = abs % unit;
        format!(
            "{major}.{fraction:0width$}",
            width = usize::from(self.digits)
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        write!(f, "{sign}{}", self.unsigned_digits(false))
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses with two fraction digits; use [`Money::parse`] for other
    /// precisions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, 2)
    }
}

fn scale(digits: u8) -> i64 {
    10i64.checked_pow(u32::from(digits)).unwrap_or(i64::MAX)
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_fraction() {
        assert_eq!(Money::new(0, 2).to_string(), "0.00");
        assert_eq!(Money::new(1, 2).to_string(), "0.01");
        assert_eq!(Money::new(10, 2).to_string(), "0.10");
        assert_eq!(Money::new(1050, 2).to_string(), "10.50");
        assert_eq!(Money::new(-1050, 2).to_string(), "-10.50");
        assert_eq!(Money::new(7, 0).to_string(), "7");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_respects_currency_digits() {
        assert_eq!(Money::parse("1.5", 3).unwrap().minor(), 1500);
        assert!(Money::parse("1.5", 0).is_err());
        assert_eq!(Money::parse("42", 0).unwrap().minor(), 42);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn from_major_rounds_to_nearest_minor_unit() {
        assert_eq!(Money::from_major(33.333_333, 2).unwrap().minor(), 3333);
        assert_eq!(Money::from_major(0.005, 2).unwrap().minor(), 1);
        assert_eq!(Money::from_major(-12.0, 2).unwrap().minor(), -1200);
        assert!(Money::from_major(f64::NAN, 2).is_none());
        assert!(Money::from_major(f64::INFINITY, 2).is_none());
    }

    #[test]
    fn format_groups_thousands_with_symbol() {
        let zar = CurrencyFormat::zar();
        assert_eq!(Money::new(123_450, 2).format(&zar), "R1,234.50");
        assert_eq!(Money::new(-1200, 2).format(&zar), "-R12.00");
        assert_eq!(Money::new(100_000_000, 2).format(&zar), "R1,000,000.00");
        assert_eq!(Money::new(99, 2).format(&zar), "R0.99");
    }

    #[test]
    fn parse_rejects_unsupported_precision() {
        assert!(matches!(
            Money::parse("1", 19),
            Err(EngineError::InvalidAmount(_))
        ));
        assert_eq!(scale(19), i64::MAX);
        assert!(Money::from_major(10.0, 19).is_none());
    }
}
