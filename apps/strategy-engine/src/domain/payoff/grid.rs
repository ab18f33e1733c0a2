//! Price grid over which the expiration payoff is sampled.
//!
//! Bounds cover `spot * [lower_band, upper_band]` widened to reach every
//! strike plus a margin, floored at zero. Every distinct strike is injected
//! as an exact grid point so payoff kinks are captured exactly.

use serde::{Deserialize, Serialize};

use crate::domain::strategy::{Leg, StrategyError, distinct_strikes};

/// Grid construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Lower bound as a fraction of spot.
    #[serde(default = "default_lower_band")]
    pub lower_band: f64,
    /// Upper bound as a fraction of spot.
    #[serde(default = "default_upper_band")]
    pub upper_band: f64,
    /// Margin beyond the outermost strikes, as a fraction of spot.
    #[serde(default = "default_strike_margin")]
    pub strike_margin: f64,
    /// Target spacing between fill points, as a fraction of spot.
    #[serde(default = "default_step_fraction")]
    pub step_fraction: f64,
    /// Hard cap on fill points.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lower_band: default_lower_band(),
            upper_band: default_upper_band(),
            strike_margin: default_strike_margin(),
            step_fraction: default_step_fraction(),
            max_points: default_max_points(),
        }
    }
}

const fn default_lower_band() -> f64 {
    0.5
}

const fn default_upper_band() -> f64 {
    1.5
}

const fn default_strike_margin() -> f64 {
    0.10
}

const fn default_step_fraction() -> f64 {
    0.01
}

const fn default_max_points() -> usize {
    20_000
}

/// Fill points closer than this fraction of a step to a strike are dropped.
const STRIKE_SNAP_FRACTION: f64 = 1e-6;

/// Samples kept strictly above the highest strike, where the payoff is linear.
const MIN_UPPER_TAIL_SAMPLES: usize = 2;

/// Ordered, deduplicated underlying prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceGrid {
    prices: Vec<f64>,
    step: f64,
}

impl PriceGrid {
    /// Build the grid for a set of legs around a spot price.
    pub fn build(legs: &[Leg], spot_price: f64, config: &GridConfig) -> Result<Self, StrategyError> {
        if legs.is_empty() {
            return Err(StrategyError::invalid_range("cannot build a grid without legs"));
        }
        if !spot_price.is_finite() || spot_price <= 0.0 {
            return Err(StrategyError::invalid_range(format!(
                "spot price must be positive, got {spot_price}"
            )));
        }

        let strikes = distinct_strikes(legs);
        let (Some(&min_strike), Some(&max_strike)) = (strikes.first(), strikes.last()) else {
            return Err(StrategyError::invalid_range("legs carry no strikes"));
        };

        let margin = spot_price * config.strike_margin;
        let low = (spot_price * config.lower_band)
            .min(min_strike - margin)
            .max(0.0);
        let high = (spot_price * config.upper_band).max(max_strike + margin);

        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(StrategyError::invalid_range(format!(
                "degenerate bounds [{low}, {high}]"
            )));
        }

        let target_step = spot_price * config.step_fraction;
        let intervals = ((high - low) / target_step)
            .ceil()
            .min(config.max_points as f64) as usize;
        let resolution = intervals
            .saturating_add(1)
            .min(config.max_points)
            .max(strikes.len() + 2);
        let step = (high - low) / (resolution - 1) as f64;
        if !step.is_finite() || step <= 0.0 {
            return Err(StrategyError::invalid_range(format!(
                "cannot space {resolution} points over [{low}, {high}]"
            )));
        }

        let snap = step * STRIKE_SNAP_FRACTION;
        let mut prices: Vec<f64> = (0..resolution)
            .map(|i| if i + 1 == resolution { high } else { low + step * i as f64 })
            .filter(|price| {
                strikes
                    .iter()
                    .all(|strike| (price - strike).abs() > snap)
            })
            .collect();
        prices.extend_from_slice(&strikes);
        prices.sort_by(f64::total_cmp);
        prices.dedup();

        let beyond = prices.iter().filter(|price| **price > max_strike).count();
        let mut last = prices.last().copied().unwrap_or(high);
        for _ in beyond..MIN_UPPER_TAIL_SAMPLES {
            last += step;
            prices.push(last);
        }

        tracing::trace!(
            low,
            high,
            points = prices.len(),
            strikes = strikes.len(),
            "price grid built"
        );

        Ok(Self { prices, step })
    }

    /// Grid prices, ascending.
    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Lowest sampled price.
    #[must_use]
    pub fn min_price(&self) -> f64 {
        self.prices.first().copied().unwrap_or_default()
    }

    /// Highest sampled price.
    #[must_use]
    pub fn max_price(&self) -> f64 {
        self.prices.last().copied().unwrap_or_default()
    }

    /// Number of sample points.
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.prices.len()
    }

    /// Spacing of the evenly spaced fill points.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }
}
