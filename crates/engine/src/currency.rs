use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Display configuration for money amounts.
///
/// The application is mono-currency: whatever was persisted, the store
/// starts from the value handed to [`StoreBuilder::currency`] (default
/// [`CurrencyFormat::zar`]).
///
/// ## Minor units
///
/// `decimal_digits` is how many fraction digits are shown and accepted when
/// converting between major units (`10.50`) and minor units (`1050`).
///
/// [`StoreBuilder::currency`]: crate::StoreBuilder::currency
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub decimal_digits: u8,
    pub name_plural: String,
}

impl CurrencyFormat {
    /// Most fraction digits a currency may use. ISO 4217 tops out at 4.
    pub const MAX_DECIMAL_DIGITS: u8 = 4;

    /// South African Rand, the startup default.
    #[must_use]
    pub fn zar() -> Self {
        Self {
            code: "ZAR".to_string(),
            symbol: "R".to_string(),
            name: "South African Rand".to_string(),
            decimal_digits: 2,
            name_plural: "South African Rands".to_string(),
        }
    }

    /// `10^decimal_digits`, the number of minor units in one major unit.
    #[must_use]
    pub fn minor_per_major(&self) -> i64 {
        10i64
            .checked_pow(u32::from(self.decimal_digits))
            .unwrap_or(i64::MAX)
    }

    /// Rejects a precision above [`Self::MAX_DECIMAL_DIGITS`].
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.decimal_digits > Self::MAX_DECIMAL_DIGITS {
            return Err(EngineError::InvalidAmount(format!(
                "{} uses {} decimal digits, at most {} are supported",
                self.code,
                self.decimal_digits,
                Self::MAX_DECIMAL_DIGITS
            )));
        }
        Ok(())
    }

    /// Half of the smallest representable amount.
    ///
    /// Two amounts closer than this render identically.
    #[must_use]
    pub fn half_minor_unit(&self) -> f64 {
        0.5 / self.minor_per_major() as f64
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::zar()
    }
}

impl core::fmt::Display for CurrencyFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.code)
    }
}
