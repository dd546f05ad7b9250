//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Catalog amounts arrive as bare numbers; the currency is a property of the
/// store, not of the item, so it is attached when a price is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, not centavos).
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
}

impl fmt::Display for Price {
    /// Formats with two decimals and the currency's grouping convention,
    /// e.g. `$ 1.234,50` for ARS or `$1,234.50` for USD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let (group_sep, decimal_sep) = self.currency_code.separators();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(c);
        }

        let sign = if negative { "-" } else { "" };
        let symbol = self.currency_code.symbol();
        if self.currency_code.spaced_symbol() {
            write!(f, "{sign}{symbol} {grouped}{decimal_sep}{cents}")
        } else {
            write!(f, "{sign}{symbol}{grouped}{decimal_sep}{cents}")
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ARS,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ARS | Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// (thousands separator, decimal separator)
    const fn separators(self) -> (char, char) {
        match self {
            Self::ARS | Self::EUR => ('.', ','),
            Self::USD => (',', '.'),
        }
    }

    const fn spaced_symbol(self) -> bool {
        matches!(self, Self::ARS)
    }
}
