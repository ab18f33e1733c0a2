//! Strategy DTOs
//!
//! Wire shapes for strategy requests and reports. Field names accept the
//! aliases used by existing clients (`type`, `position`, `strike_price`).

use serde::{Deserialize, Serialize};

use crate::domain::advisor::RiskPattern;
use crate::domain::payoff::{Bound, PayoffPoint, Summary};
use crate::domain::strategy::{Leg, LegError, OptionType, Position, Strategy, StrategyError};

/// DTO for one strategy leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegDto {
    /// Optional contract symbol, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// `call` or `put`.
    #[serde(alias = "type")]
    pub option_type: String,
    /// `long`/`buy` or `short`/`sell`.
    #[serde(alias = "position")]
    pub side: String,
    /// Strike price.
    #[serde(alias = "strike_price")]
    pub strike: f64,
    /// Premium per unit.
    pub premium: f64,
    /// Contract quantity.
    pub quantity: i64,
}

impl LegDto {
    /// Parse into a validated domain leg.
    ///
    /// # Errors
    ///
    /// Returns the first violated leg invariant.
    pub fn to_leg(&self) -> Result<Leg, LegError> {
        let option_type: OptionType = self.option_type.parse()?;
        let position: Position = self.side.parse()?;
        let quantity = match self.quantity {
            0 => return Err(LegError::ZeroQuantity),
            q => u32::try_from(q).map_err(|_| LegError::QuantityOutOfRange(q))?,
        };
        Leg::new(option_type, position, self.strike, self.premium, quantity)
    }

    /// Normalized wire form of a domain leg.
    #[must_use]
    pub fn from_leg(leg: &Leg, symbol: Option<String>) -> Self {
        let option_type = match leg.option_type() {
            OptionType::Call => "call",
            OptionType::Put => "put",
        };
        let side = match leg.position() {
            Position::Long => "long",
            Position::Short => "short",
        };
        Self {
            symbol,
            option_type: option_type.to_string(),
            side: side.to_string(),
            strike: leg.strike(),
            premium: leg.premium(),
            quantity: i64::from(leg.quantity()),
        }
    }
}

/// Request body for simulate and adjust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequestDto {
    /// Legs in client order.
    pub legs: Vec<LegDto>,
    /// Current underlying price.
    pub spot_price: f64,
}

impl StrategyRequestDto {
    /// Validate into a domain strategy.
    ///
    /// # Errors
    ///
    /// `InvalidLeg` carries the index of the first bad leg; empty legs and a
    /// bad spot price are `Validation` errors.
    pub fn to_strategy(&self) -> Result<Strategy, StrategyError> {
        let legs = self
            .legs
            .iter()
            .enumerate()
            .map(|(index, dto)| {
                dto.to_leg()
                    .map_err(|source| StrategyError::InvalidLeg { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Strategy::new(legs, self.spot_price)
    }

    /// Symbols in leg order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Option<String>> {
        self.legs.iter().map(|leg| leg.symbol.clone()).collect()
    }
}

/// Result of `POST /strategy/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Normalized legs, in request order.
    pub legs: Vec<LegDto>,
    /// Payoff curve, ascending by price.
    pub payoff: Vec<PayoffPoint>,
    /// Net premium (credit positive, debit negative).
    pub total_premium: f64,
    /// Maximum profit, or `"UNBOUNDED"`.
    pub max_profit: Bound,
    /// Maximum loss, or `"UNBOUNDED"`.
    pub max_loss: Bound,
    /// Breakeven prices, ascending.
    pub breakevens: Vec<f64>,
}

impl SimulationReport {
    /// Assemble a report from its parts.
    #[must_use]
    pub fn new(legs: Vec<LegDto>, payoff: Vec<PayoffPoint>, summary: Summary) -> Self {
        Self {
            legs,
            payoff,
            total_premium: summary.total_premium,
            max_profit: summary.max_profit,
            max_loss: summary.max_loss,
            breakevens: summary.breakevens,
        }
    }
}

/// Result of `POST /strategy/adjust`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustmentReport {
    /// Human-readable suggestions, in pattern priority order.
    pub suggestions: Vec<String>,
    /// Matched risk patterns.
    pub patterns: Vec<RiskPattern>,
}
