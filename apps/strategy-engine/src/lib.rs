// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Strategy Engine - Options Payoff & Adjustment Core
//!
//! Stateless engine that evaluates multi-leg options strategies at
//! expiration and suggests adjustments.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure computation, no I/O
//!   - `strategy`: Leg and Strategy value types with validation
//!   - `payoff`: Price grid, payoff curve, summary statistics
//!   - `advisor`: Rule-based risk patterns and suggestions
//!
//! - **Application**: Orchestration
//!   - `ports`: Option chain catalog interface
//!   - `services`: `StrategyService` (simulate, adjust)
//!   - `dto`: Wire shapes for requests and reports
//!
//! - **Infrastructure**: Adapters
//!   - `http`: axum REST API
//!   - `option_chain`: JSON file catalog
//!
//! Data flows one way per request:
//! validate -> grid -> payoff -> summary -> advisor.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core computation with no I/O.
pub mod domain;

/// Application layer - Services, DTOs and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Error codes and the service-boundary error type.
pub mod error;

/// Metrics and logging.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::dto::{AdjustmentReport, LegDto, SimulationReport, StrategyRequestDto};
pub use application::services::StrategyService;
pub use domain::advisor::{AdjustmentAdvisor, RiskPattern};
pub use domain::payoff::{Bound, PayoffEngine, PayoffPoint, PriceGrid, Summary, SummaryEngine};
pub use domain::strategy::{Leg, LegError, OptionType, Position, Strategy, StrategyError};
pub use error::{EngineError, ErrorCode};
