//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and service inputs/outputs.

mod strategy_dto;

pub use strategy_dto::{AdjustmentReport, LegDto, SimulationReport, StrategyRequestDto};
