//! Application Services
//!
//! Services coordinate domain engines behind the driver adapters.

mod strategy_service;

pub use strategy_service::StrategyService;
