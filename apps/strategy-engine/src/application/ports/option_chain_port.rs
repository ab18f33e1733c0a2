//! Option Chain Port (Driven Port)
//!
//! Read-only catalog of tradable option contracts. The catalog populates
//! client-side pickers and never feeds payoff computation.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::strategy::OptionType;

/// One tradable contract in the option chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Contract symbol.
    pub symbol: String,
    /// Underlying symbol.
    pub underlying: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Decimal,
    /// Quoted premium per unit.
    pub premium: Decimal,
    /// Expiration date.
    pub expiry: NaiveDate,
}

/// Option chain errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OptionChainError {
    /// The backing source could not be read.
    #[error("option chain unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The backing source could not be parsed.
    #[error("malformed option chain: {message}")]
    Malformed {
        /// Error details.
        message: String,
    },
}

/// Port for listing the option chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionChainPort: Send + Sync {
    /// All instruments, in catalog order.
    async fn list_instruments(&self) -> Result<Vec<OptionContract>, OptionChainError>;
}

/// In-memory option chain.
#[derive(Debug, Default)]
pub struct InMemoryOptionChain {
    contracts: RwLock<Vec<OptionContract>>,
}

impl InMemoryOptionChain {
    /// Create a chain holding `contracts`.
    #[must_use]
    pub const fn new(contracts: Vec<OptionContract>) -> Self {
        Self {
            contracts: RwLock::new(contracts),
        }
    }

    /// Append a contract.
    pub fn add(&self, contract: OptionContract) {
        self.contracts
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(contract);
    }

    /// Number of contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OptionChainPort for InMemoryOptionChain {
    async fn list_instruments(&self) -> Result<Vec<OptionContract>, OptionChainError> {
        let contracts = self
            .contracts
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(contracts.clone())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn contract(symbol: &str, option_type: OptionType, strike: Decimal) -> OptionContract {
        OptionContract {
            symbol: symbol.to_string(),
            underlying: "NIFTY".to_string(),
            option_type,
            strike,
            premium: dec!(120.5),
            expiry: NaiveDate::from_ymd_opt(2026, 11, 26).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_chain_preserves_order() {
        let chain = InMemoryOptionChain::new(vec![contract(
            "NIFTY26NOV25000CE",
            OptionType::Call,
            dec!(25000),
        )]);
        chain.add(contract("NIFTY26NOV24500PE", OptionType::Put, dec!(24500)));

        let listed = chain.list_instruments().await.unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(listed[0].symbol, "NIFTY26NOV25000CE");
        assert_eq!(listed[1].option_type, OptionType::Put);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = InMemoryOptionChain::default();
        assert!(chain.is_empty());
        assert!(chain.list_instruments().await.unwrap().is_empty());
    }

    #[test]
    fn test_contract_wire_format() {
        let json = serde_json::to_value(contract("X", OptionType::Call, dec!(25000))).unwrap();
        assert_eq!(json["option_type"], "CALL");
        assert_eq!(json["strike"], "25000");
        assert_eq!(json["expiry"], "2026-11-26");
    }
}
