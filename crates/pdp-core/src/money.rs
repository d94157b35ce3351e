//! Currency formatting for whole-unit prices.
//!
//! Catalog prices are whole currency units (no minor units), so formatting
//! never rounds: it prefixes the currency symbol and groups the digits the
//! way the configured locale does.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    #[default]
    INR,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF",
            Currency::CNY => "CN\u{00a5}",
            Currency::INR => "\u{20b9}",
            Currency::MXN => "MX$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "CHF" => Some(Currency::CHF),
            "CNY" => Some(Currency::CNY),
            "INR" => Some(Currency::INR),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Digit grouping convention of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NumberLocale {
    /// Indian grouping: last three digits, then pairs (`1,00,000`).
    #[default]
    #[serde(rename = "en-IN")]
    EnIn,
    /// Western grouping: thousands (`100,000`).
    #[serde(rename = "en-US")]
    EnUs,
}

impl NumberLocale {
    /// BCP 47 tag of the locale.
    pub fn tag(&self) -> &'static str {
        match self {
            NumberLocale::EnIn => "en-IN",
            NumberLocale::EnUs => "en-US",
        }
    }

    /// Parse a locale tag (case-insensitive, `_` accepted for `-`).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_lowercase().replace('_', "-").as_str() {
            "en-in" => Some(NumberLocale::EnIn),
            "en-us" => Some(NumberLocale::EnUs),
            _ => None,
        }
    }

    /// Insert group separators into a run of ASCII digits.
    pub fn group_digits(&self, digits: &str) -> String {
        if digits.len() <= 3 {
            return digits.to_string();
        }

        let (head, tail) = digits.split_at(digits.len() - 3);
        let head_group = match self {
            NumberLocale::EnIn => 2,
            NumberLocale::EnUs => 3,
        };

        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(head_group);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        groups.push(tail);
        groups.join(",")
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Formats whole-unit amounts for one currency/locale pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurrencyFormatter {
    pub currency: Currency,
    pub locale: NumberLocale,
}

impl CurrencyFormatter {
    /// Create a formatter for the given pairing.
    pub fn new(currency: Currency, locale: NumberLocale) -> Self {
        Self { currency, locale }
    }

    /// Format an amount, e.g. `₹12,499`.
    pub fn format(&self, amount: u64) -> String {
        format!(
            "{}{}",
            self.currency.symbol(),
            self.locale.group_digits(&amount.to_string())
        )
    }
}

/// Format an amount with the default INR / en-IN pairing.
///
/// ```
/// use pdp_core::money::format_currency;
/// assert_eq!(format_currency(12499), "\u{20b9}12,499");
/// ```
pub fn format_currency(amount: u64) -> String {
    CurrencyFormatter::default().format(amount)
}
