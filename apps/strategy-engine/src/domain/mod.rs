//! Domain layer - pure, stateless strategy analytics.
//!
//! - `strategy`: legs and the per-request strategy aggregate
//! - `payoff`: price grid, payoff curve and summary statistics
//! - `advisor`: risk pattern classification and suggestions

pub mod advisor;
pub mod payoff;
pub mod strategy;
