//! Strategy aggregate: an ordered set of legs plus the current spot price.

use serde::Serialize;

use super::errors::StrategyError;
use super::leg::Leg;

/// A multi-leg options strategy evaluated against one spot price.
///
/// Constructed per request and owned by that request's pipeline. Leg order
/// is irrelevant to the math but preserved for echoing back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    legs: Vec<Leg>,
    spot_price: f64,
}

impl Strategy {
    /// Create a strategy, rejecting an empty leg list or a non-positive spot.
    pub fn new(legs: Vec<Leg>, spot_price: f64) -> Result<Self, StrategyError> {
        if legs.is_empty() {
            return Err(StrategyError::validation(
                "legs",
                "strategy must contain at least one leg",
            ));
        }
        if !spot_price.is_finite() || spot_price <= 0.0 {
            return Err(StrategyError::validation(
                "spot_price",
                format!("spot price must be positive, got {spot_price}"),
            ));
        }

        Ok(Self { legs, spot_price })
    }

    /// Strategy legs in request order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Current underlying price.
    #[must_use]
    pub const fn spot_price(&self) -> f64 {
        self.spot_price
    }
}

/// Distinct strikes across legs, sorted ascending.
#[must_use]
pub fn distinct_strikes(legs: &[Leg]) -> Vec<f64> {
    let mut strikes: Vec<f64> = legs.iter().map(Leg::strike).collect();
    strikes.sort_by(f64::total_cmp);
    strikes.dedup();
    strikes
}
