//! Expiration payoff analysis.
//!
//! - [`PriceGrid`]: underlying prices to sample, with every strike exact
//! - [`PayoffEngine`]: per-leg and aggregate P&L over the grid
//! - [`SummaryEngine`]: premium, max profit/loss, breakevens

mod curve;
mod engine;
mod grid;
mod summary;

pub use curve::{Tail, interpolate_pnl, slope_at, tail_slope};
pub use engine::{DEFAULT_PARALLEL_THRESHOLD, PayoffEngine, PayoffPoint, aggregate_pnl};
pub use grid::{GridConfig, PriceGrid};
pub use summary::{AnalysisConfig, Bound, Summary, SummaryEngine, UNBOUNDED_SENTINEL, total_premium};
