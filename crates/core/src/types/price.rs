//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts arrive from the product feed as decimal strings (`"899.00"`) and
//! stay as [`Decimal`] throughout so cart totals never pick up binary
//! floating point drift.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., lira, not kuruş).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn store(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Format for display with no fraction digits (e.g., `₺2.697`).
    ///
    /// Rounds half away from zero and groups thousands with the currency's
    /// conventional separator.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().trunc().to_string();
        let grouped = group_thousands(&digits, self.currency_code.group_separator());
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{grouped}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display())
    }
}

/// ISO 4217 currency codes. The store only sells in lira.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    TRY,
}

impl CurrencyCode {
    /// Currency symbol used as a display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::TRY => "₺",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TRY => "TRY",
        }
    }

    const fn group_separator(self) -> char {
        match self {
            Self::TRY => '.',
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::store(dec("2697.00")).display(), "₺2.697");
        assert_eq!(Price::store(dec("1249")).display(), "₺1.249");
        assert_eq!(Price::store(dec("1234567")).display(), "₺1.234.567");
    }

    #[test]
    fn test_display_small_amounts() {
        assert_eq!(Price::store(dec("0")).display(), "₺0");
        assert_eq!(Price::store(dec("329")).display(), "₺329");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::store(dec("899.50")).display(), "₺900");
        assert_eq!(Price::store(dec("899.49")).display(), "₺899");
    }

    #[test]
    fn test_store_currency_is_lira() {
        let price = Price::store(dec("1999.99"));
        assert_eq!(price.to_string(), "₺2.000");
        assert_eq!(price.currency_code.code(), "TRY");
        assert_eq!(format!("{price:>8}"), "  ₺2.000");
    }

    #[test]
    fn test_display_extreme_amount() {
        assert_eq!(
            Price::store(Decimal::MAX).display(),
            "₺79.228.162.514.264.337.593.543.950.335"
        );
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::store(dec("-1500")).display(), "-₺1.500");
    }
}
