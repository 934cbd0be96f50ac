//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as plain numbers with no currency attached; the
//! storefront pairs them with its configured [`CurrencyCode`] for display.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
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

    /// Format for display, rounded to two decimal places.
    ///
    /// ```rust
    /// # use rocketshoes_core::{CurrencyCode, Price};
    /// # use rust_decimal::Decimal;
    /// let price = Price::new(Decimal::new(129_990, 2), CurrencyCode::BRL);
    /// assert_eq!(price.format(), "R$ 1.299,90");
    ///
    /// let price = Price::new(Decimal::new(129_990, 2), CurrencyCode::USD);
    /// assert_eq!(price.format(), "$1,299.90");
    /// ```
    #[must_use]
    pub fn format(&self) -> String {
        let style = self.currency_code.style();
        let rounded = self.amount.round_dp(2);
        let fixed = format!("{:.2}", rounded.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(style.group_separator);
            }
            grouped.push(digit);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let space = if style.spaced { " " } else { "" };

        format!(
            "{sign}{}{space}{grouped}{}{fraction}",
            style.symbol, style.decimal_separator
        )
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyError(pub String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

struct CurrencyStyle {
    symbol: &'static str,
    decimal_separator: char,
    group_separator: char,
    spaced: bool,
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    const fn style(self) -> CurrencyStyle {
        match self {
            Self::BRL => CurrencyStyle {
                symbol: "R$",
                decimal_separator: ',',
                group_separator: '.',
                spaced: true,
            },
            Self::USD | Self::CAD | Self::AUD => CurrencyStyle {
                symbol: "$",
                decimal_separator: '.',
                group_separator: ',',
                spaced: false,
            },
            Self::EUR => CurrencyStyle {
                symbol: "€",
                decimal_separator: '.',
                group_separator: ',',
                spaced: false,
            },
            Self::GBP => CurrencyStyle {
                symbol: "£",
                decimal_separator: '.',
                group_separator: ',',
                spaced: false,
            },
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyError(s.to_string())),
        }
    }
}
