//! Strategy model: legs, the strategy aggregate and validation errors.

mod errors;
mod leg;
mod strategy;

pub use errors::{LegError, StrategyError};
pub use leg::{Leg, OptionType, Position};
pub use strategy::{Strategy, distinct_strikes};
