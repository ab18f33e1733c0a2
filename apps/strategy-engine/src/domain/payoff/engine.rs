//! Expiration payoff computation.
//!
//! Per-leg payoff at underlying price `S`:
//! - CALL intrinsic = `max(S - K, 0)`, PUT intrinsic = `max(K - S, 0)`
//! - contribution = `sign(position) * quantity * (intrinsic - premium)`
//!
//! Aggregate P&L is the sum of contributions. Each grid point is evaluated
//! independently, so large grids are split across the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::PriceGrid;
use crate::domain::strategy::{Leg, StrategyError};

/// One sample of the payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    /// Underlying price at expiration.
    pub price: f64,
    /// Aggregate profit/loss at that price.
    pub pnl: f64,
}

/// Default grid size at which evaluation switches to the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4_096;

/// Computes per-leg and aggregate payoff across a price grid.
#[derive(Debug, Clone, Copy)]
pub struct PayoffEngine {
    parallel_threshold: usize,
}

impl Default for PayoffEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLEL_THRESHOLD)
    }
}

impl PayoffEngine {
    /// Create an engine that parallelizes grids of at least `parallel_threshold` points.
    #[must_use]
    pub const fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Aggregate payoff curve, ascending by price.
    ///
    /// Legs are re-checked before any point is evaluated; a single bad leg
    /// rejects the whole computation.
    pub fn compute(&self, legs: &[Leg], grid: &PriceGrid) -> Result<Vec<PayoffPoint>, StrategyError> {
        validate_legs(legs)?;

        let evaluate = |&price: &f64| PayoffPoint {
            price,
            pnl: aggregate_pnl(legs, price),
        };

        let curve = if grid.resolution() >= self.parallel_threshold {
            grid.prices().par_iter().map(evaluate).collect()
        } else {
            grid.prices().iter().map(evaluate).collect()
        };

        Ok(curve)
    }

    /// Payoff curve of each leg on its own, in leg order.
    pub fn per_leg(&self, legs: &[Leg], grid: &PriceGrid) -> Result<Vec<Vec<PayoffPoint>>, StrategyError> {
        validate_legs(legs)?;

        Ok(legs
            .iter()
            .map(|leg| {
                grid.prices()
                    .iter()
                    .map(|&price| PayoffPoint {
                        price,
                        pnl: leg.pnl_at(price),
                    })
                    .collect()
            })
            .collect())
    }

    /// Aggregate P&L at a single price, including prices outside any grid.
    #[must_use]
    pub fn pnl_at(&self, legs: &[Leg], price: f64) -> f64 {
        aggregate_pnl(legs, price)
    }
}

/// Aggregate P&L of all legs at one underlying price.
#[must_use]
pub fn aggregate_pnl(legs: &[Leg], price: f64) -> f64 {
    legs.iter().map(|leg| leg.pnl_at(price)).sum()
}

/// Re-checks leg invariants, reporting the first offending leg by index.
fn validate_legs(legs: &[Leg]) -> Result<(), StrategyError> {
    for (index, leg) in legs.iter().enumerate() {
        Leg::new(
            leg.option_type(),
            leg.position(),
            leg.strike(),
            leg.premium(),
            leg.quantity(),
        )
        .map_err(|source| StrategyError::InvalidLeg { index, source })?;
    }
    Ok(())
}
