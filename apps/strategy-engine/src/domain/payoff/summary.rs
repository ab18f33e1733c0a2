//! Summary statistics derived from a payoff curve.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::curve::{Tail, tail_slope};
use super::engine::{DEFAULT_PARALLEL_THRESHOLD, PayoffPoint, aggregate_pnl};
use crate::domain::strategy::Leg;

/// Wire sentinel for an unbounded extremum.
pub const UNBOUNDED_SENTINEL: &str = "UNBOUNDED";

/// Numeric tolerances for curve analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Tail slopes within this band of zero count as flat.
    #[serde(default = "default_slope_epsilon")]
    pub slope_epsilon: f64,
    /// P&L within this band of zero counts as exactly zero.
    #[serde(default = "default_zero_tolerance")]
    pub zero_tolerance: f64,
    /// Samples used to measure each tail slope.
    #[serde(default = "default_tail_points")]
    pub tail_points: usize,
    /// Grid size at which payoff evaluation is parallelized.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            slope_epsilon: default_slope_epsilon(),
            zero_tolerance: default_zero_tolerance(),
            tail_points: default_tail_points(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

const fn default_slope_epsilon() -> f64 {
    1e-6
}

const fn default_zero_tolerance() -> f64 {
    1e-9
}

const fn default_tail_points() -> usize {
    3
}

const fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Maximum profit or loss: a finite value or unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Finite extremum.
    Finite(f64),
    /// Grows without limit as price rises.
    Unbounded,
}

impl Bound {
    /// Finite value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Finite(v) => Some(v),
            Self::Unbounded => None,
        }
    }

    /// Whether the extremum is unbounded.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(v) => serializer.serialize_f64(*v),
            Self::Unbounded => serializer.serialize_str(UNBOUNDED_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Sentinel(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Self::Finite(v)),
            Repr::Sentinel(s) if s.eq_ignore_ascii_case(UNBOUNDED_SENTINEL) => Ok(Self::Unbounded),
            Repr::Sentinel(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"{UNBOUNDED_SENTINEL}\", got \"{s}\""
            ))),
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(v) => write!(f, "{v:.2}"),
            Self::Unbounded => write!(f, "{UNBOUNDED_SENTINEL}"),
        }
    }
}

/// Risk summary of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Net premium (positive = credit, negative = debit).
    pub total_premium: f64,
    /// Maximum profit at expiration.
    pub max_profit: Bound,
    /// Maximum loss at expiration (a non-positive P&L when finite).
    pub max_loss: Bound,
    /// Prices where the curve crosses zero, ascending.
    pub breakevens: Vec<f64>,
}

/// Derives premium, extrema and breakevens from a payoff curve.
#[derive(Debug, Clone, Default)]
pub struct SummaryEngine {
    config: AnalysisConfig,
}

impl SummaryEngine {
    /// Create a summary engine with the given tolerances.
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Summarize a curve produced for `legs`.
    ///
    /// The upper tail decides unboundedness. Its slope is measured only over
    /// samples at or above the highest strike, where the payoff is linear.
    /// The lower side is bounded by the zero price floor, so the curve is also evaluated at price 0; payoffs
    /// are linear below the lowest strike, making that value the exact
    /// lower-tail extremum.
    #[must_use]
    pub fn summarize(&self, legs: &[Leg], curve: &[PayoffPoint]) -> Summary {
        let total_premium = total_premium(legs);

        let floor_pnl = aggregate_pnl(legs, 0.0);
        let (lowest, highest) = curve
            .iter()
            .map(|p| p.pnl)
            .fold((floor_pnl, floor_pnl), |(lo, hi), pnl| (lo.min(pnl), hi.max(pnl)));

        let upper_slope = self.upper_tail_slope(legs, curve);
        let eps = self.config.slope_epsilon;

        let max_profit = if upper_slope > eps {
            Bound::Unbounded
        } else {
            Bound::Finite(highest)
        };
        let max_loss = if upper_slope < -eps {
            Bound::Unbounded
        } else {
            Bound::Finite(lowest)
        };

        Summary {
            total_premium,
            max_profit,
            max_loss,
            breakevens: self.breakevens(curve),
        }
    }

    fn upper_tail_slope(&self, legs: &[Leg], curve: &[PayoffPoint]) -> f64 {
        let max_strike = legs.iter().map(Leg::strike).fold(f64::NEG_INFINITY, f64::max);
        let start = curve.partition_point(|p| p.price < max_strike);
        tail_slope(&curve[start..], Tail::Upper, self.config.tail_points)
            .or_else(|| tail_slope(curve, Tail::Upper, self.config.tail_points))
            .unwrap_or(0.0)
    }

    /// Prices where the curve crosses zero.
    ///
    /// Adjacent samples of opposite sign are interpolated linearly. A run of
    /// samples at zero is a single crossing, reported at its first price,
    /// and only when the curve has opposite signs on either side of it.
    #[must_use]
    pub fn breakevens(&self, curve: &[PayoffPoint]) -> Vec<f64> {
        let tol = self.config.zero_tolerance;
        let mut breakevens = Vec::new();
        let mut previous: Option<(PayoffPoint, bool)> = None; // (last nonzero sample, was it the immediately preceding one)
        let mut zero_run: Option<f64> = None;

        for &point in curve {
            if point.pnl.abs() <= tol {
                zero_run.get_or_insert(point.price);
                if let Some((_, adjacent)) = previous.as_mut() {
                    *adjacent = false;
                }
                continue;
            }

            if let Some((prev, adjacent)) = previous {
                let crossed = prev.pnl.signum() != point.pnl.signum();
                if crossed {
                    match zero_run {
                        Some(start) if !adjacent => breakevens.push(start),
                        _ => {
                            if let Some(x) = interpolate_zero(prev, point) {
                                breakevens.push(x);
                            } else {
                                tracing::debug!(
                                    from = prev.price,
                                    to = point.price,
                                    "skipping degenerate breakeven interval"
                                );
                            }
                        }
                    }
                }
            }

            zero_run = None;
            previous = Some((point, true));
        }

        breakevens
    }
}

/// Net premium over all legs: long legs are debits, short legs credits.
#[must_use]
pub fn total_premium(legs: &[Leg]) -> f64 {
    legs.iter().map(Leg::net_premium).sum()
}

fn interpolate_zero(a: PayoffPoint, b: PayoffPoint) -> Option<f64> {
    let dx = b.price - a.price;
    let dy = b.pnl - a.pnl;
    if dx <= 0.0 || dy == 0.0 {
        return None;
    }
    let x = a.price - a.pnl * dx / dy;
    x.is_finite().then_some(x)
}
