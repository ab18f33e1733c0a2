//! Strategy leg types.
//!
//! A leg is the atomic unit of a strategy: one option position with its
//! type, direction, strike, premium and contract quantity. Legs are
//! validated on construction and immutable afterwards.

use serde::{Deserialize, Serialize};

use super::errors::LegError;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionType {
    /// Intrinsic value at expiration for an underlying price.
    #[must_use]
    pub fn intrinsic(self, strike: f64, price: f64) -> f64 {
        match self {
            Self::Call => (price - strike).max(0.0),
            Self::Put => (strike - price).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

impl std::str::FromStr for OptionType {
    type Err = LegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            _ => Err(LegError::UnknownOptionType(s.to_string())),
        }
    }
}

/// Position direction for a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    /// Long position (bought).
    Long,
    /// Short position (sold/written).
    Short,
}

impl Position {
    /// +1 for long, -1 for short.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

impl std::str::FromStr for Position {
    type Err = LegError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Self::Long),
            "short" | "sell" => Ok(Self::Short),
            _ => Err(LegError::UnknownPosition(s.to_string())),
        }
    }
}

/// A single leg of an options strategy.
///
/// Invariants: `strike > 0`, `premium >= 0`, `quantity >= 1`, all finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    option_type: OptionType,
    position: Position,
    strike: f64,
    premium: f64,
    quantity: u32,
}

impl Leg {
    /// Create a validated leg.
    pub fn new(
        option_type: OptionType,
        position: Position,
        strike: f64,
        premium: f64,
        quantity: u32,
    ) -> Result<Self, LegError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(LegError::NonPositiveStrike(strike));
        }
        if !premium.is_finite() || premium < 0.0 {
            return Err(LegError::NegativePremium(premium));
        }
        if quantity == 0 {
            return Err(LegError::ZeroQuantity);
        }

        Ok(Self {
            option_type,
            position,
            strike,
            premium,
            quantity,
        })
    }

    /// Option type.
    #[must_use]
    pub const fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Position direction.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Strike price.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        self.strike
    }

    /// Premium per unit.
    #[must_use]
    pub const fn premium(&self) -> f64 {
        self.premium
    }

    /// Number of contracts.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Signed quantity (negative for short legs).
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        self.position.sign() * f64::from(self.quantity)
    }

    /// Net premium cash flow (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        -self.signed_quantity() * self.premium
    }

    /// Expiration P&L of this leg at an underlying price.
    #[must_use]
    pub fn pnl_at(&self, price: f64) -> f64 {
        self.signed_quantity() * (self.option_type.intrinsic(self.strike, price) - self.premium)
    }
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x {} {}",
            self.position, self.quantity, self.strike, self.option_type
        )
    }
}
