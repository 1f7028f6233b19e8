//! Money & currency model (C1): the currency whitelist, amount validation,
//! and the predicates the rest of the core builds on.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// The fixed set of currencies the service supports (distilled spec I2).
/// Closed by design — unlike the open, string-keyed currency registries the
/// rest of the retrieval pack uses for general-purpose finance apps, this
/// service only ever needs to reject or accept these seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Rub,
    Jpy,
    Cny,
    Cad,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Rub,
        Currency::Jpy,
        Currency::Cny,
        Currency::Cad,
        Currency::Aud,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = WalletError;

    /// Case-insensitive on input, per I2 ("`currency ∈ WHITELIST` ...
    /// case-insensitive on input, stored uppercase").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RUB" => Ok(Currency::Rub),
            "JPY" => Ok(Currency::Jpy),
            "CNY" => Ok(Currency::Cny),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            other => Err(WalletError::WrongCurrency(other.to_string())),
        }
    }
}

/// `valid_currency(c) := upper(c) ∈ WHITELIST`.
pub fn valid_currency(code: &str) -> Result<Currency, WalletError> {
    Currency::from_str(code)
}

/// `valid_amount(m) := m > 0`.
pub fn valid_amount(amount: Decimal) -> Result<(), WalletError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(WalletError::WrongMoney)
    }
}

/// `valid_wallet_create(w) := w.name ≠ "" ∧ valid_currency(w.currency)`.
pub fn valid_wallet_name(name: &str) -> Result<(), WalletError> {
    if name.trim().is_empty() {
        Err(WalletError::EmptyName)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_is_case_insensitive_and_stores_uppercase() {
        assert_eq!(Currency::from_str("rub").unwrap().code(), "RUB");
        assert_eq!(Currency::from_str("RUB").unwrap().code(), "RUB");
    }

    #[test]
    fn rejects_currency_outside_whitelist() {
        assert!(matches!(
            Currency::from_str("XYZ"),
            Err(WalletError::WrongCurrency(_))
        ));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(valid_amount(Decimal::ZERO).is_err());
        assert!(valid_amount(Decimal::from(-1)).is_err());
        assert!(valid_amount(Decimal::from(1)).is_ok());
    }

    #[test]
    fn rejects_blank_wallet_names() {
        assert!(valid_wallet_name("").is_err());
        assert!(valid_wallet_name("   ").is_err());
        assert!(valid_wallet_name("Savings").is_ok());
    }
}
