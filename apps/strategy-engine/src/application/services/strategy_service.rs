//! Strategy Service
//!
//! Orchestrates one request through the pipeline:
//! validate -> grid -> payoff -> summary (simulate) or advisor (adjust).
//! Holds only configuration; every call is independent.

use std::time::Instant;

use crate::application::dto::{AdjustmentReport, LegDto, SimulationReport, StrategyRequestDto};
use crate::config::Config;
use crate::domain::advisor::{AdjustmentAdvisor, AdvisorConfig};
use crate::domain::payoff::{
    AnalysisConfig, GridConfig, PayoffEngine, PayoffPoint, PriceGrid, Summary, SummaryEngine,
};
use crate::domain::strategy::Strategy;
use crate::error::EngineError;
use crate::observability::{record_grid_points, record_strategy_request};

/// Stateless strategy analysis service.
#[derive(Debug, Clone, Default)]
pub struct StrategyService {
    grid: GridConfig,
    payoff: PayoffEngine,
    summary: SummaryEngine,
    advisor: AdjustmentAdvisor,
}

impl StrategyService {
    /// Create a service from its component configurations.
    #[must_use]
    pub const fn new(grid: GridConfig, analysis: AnalysisConfig, advisor: AdvisorConfig) -> Self {
        Self {
            grid,
            payoff: PayoffEngine::new(analysis.parallel_threshold),
            summary: SummaryEngine::new(analysis),
            advisor: AdjustmentAdvisor::new(advisor),
        }
    }

    /// Create a service from the root configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.grid.clone(),
            config.analysis.clone(),
            config.advisor.clone(),
        )
    }

    /// Validate and simulate a wire request, echoing leg symbols.
    pub fn simulate_request(
        &self,
        request: &StrategyRequestDto,
    ) -> Result<SimulationReport, EngineError> {
        let started = Instant::now();
        let result = request
            .to_strategy()
            .map_err(EngineError::from)
            .and_then(|strategy| self.simulate(&strategy))
            .map(|mut report| {
                for (leg, symbol) in report.legs.iter_mut().zip(request.symbols()) {
                    leg.symbol = symbol;
                }
                report
            });
        record_outcome("simulate", &result, started);
        result
    }

    /// Validate and advise on a wire request.
    pub fn adjust_request(
        &self,
        request: &StrategyRequestDto,
    ) -> Result<AdjustmentReport, EngineError> {
        let started = Instant::now();
        let result = request
            .to_strategy()
            .map_err(EngineError::from)
            .and_then(|strategy| self.adjust(&strategy));
        record_outcome("adjust", &result, started);
        result
    }

    /// Payoff curve and risk summary of a strategy.
    pub fn simulate(&self, strategy: &Strategy) -> Result<SimulationReport, EngineError> {
        let span = tracing::info_span!(
            "strategy.simulate",
            legs = strategy.legs().len(),
            spot = strategy.spot_price()
        );
        let _guard = span.enter();

        let curve = self.evaluate(strategy)?;
        let summary = self.summary.summarize(strategy.legs(), &curve);

        ensure_finite(&summary)?;

        tracing::debug!(
            total_premium = summary.total_premium,
            max_profit = %summary.max_profit,
            max_loss = %summary.max_loss,
            breakevens = summary.breakevens.len(),
            "Strategy simulated"
        );

        let legs = strategy
            .legs()
            .iter()
            .map(|leg| LegDto::from_leg(leg, None))
            .collect();
        Ok(SimulationReport::new(legs, curve, summary))
    }

    /// Risk patterns and adjustment suggestions for a strategy.
    pub fn adjust(&self, strategy: &Strategy) -> Result<AdjustmentReport, EngineError> {
        let span = tracing::info_span!(
            "strategy.adjust",
            legs = strategy.legs().len(),
            spot = strategy.spot_price()
        );
        let _guard = span.enter();

        let curve = self.evaluate(strategy)?;
        let spot = strategy.spot_price();
        let patterns = self.advisor.classify(strategy.legs(), &curve, spot);
        let suggestions = patterns
            .iter()
            .flat_map(|pattern| pattern.suggestions(spot))
            .collect();

        Ok(AdjustmentReport {
            suggestions,
            patterns,
        })
    }

    /// Async wrapper for [`Self::simulate_request`] that keeps the CPU-bound
    /// work off the async executor.
    pub async fn simulate_blocking(
        &self,
        request: StrategyRequestDto,
    ) -> Result<SimulationReport, EngineError> {
        let service = self.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| service.simulate_request(&request)))
            .await
            .map_err(|e| EngineError::internal(format!("simulation task failed: {e}")))?
    }

    /// Async wrapper for [`Self::adjust_request`].
    pub async fn adjust_blocking(
        &self,
        request: StrategyRequestDto,
    ) -> Result<AdjustmentReport, EngineError> {
        let service = self.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| service.adjust_request(&request)))
            .await
            .map_err(|e| EngineError::internal(format!("adjustment task failed: {e}")))?
    }

    fn evaluate(&self, strategy: &Strategy) -> Result<Vec<PayoffPoint>, EngineError> {
        let grid = PriceGrid::build(strategy.legs(), strategy.spot_price(), &self.grid)?;
        record_grid_points(grid.resolution());

        let curve = self.payoff.compute(strategy.legs(), &grid)?;
        if let Some(point) = curve.iter().find(|p| !p.pnl.is_finite()) {
            tracing::error!(price = point.price, pnl = point.pnl, "Non-finite payoff value");
            return Err(EngineError::internal("payoff curve is not finite")
                .with_context("price", point.price.to_string()));
        }
        Ok(curve)
    }
}

fn ensure_finite(summary: &Summary) -> Result<(), EngineError> {
    let checked = [
        ("total_premium", Some(summary.total_premium)),
        ("max_profit", summary.max_profit.value()),
        ("max_loss", summary.max_loss.value()),
    ];
    for (name, value) in checked {
        if value.is_some_and(|v| !v.is_finite()) {
            tracing::error!(field = name, "Non-finite summary value");
            return Err(EngineError::internal("payoff summary is not finite")
                .with_context("field", name));
        }
    }
    Ok(())
}

fn record_outcome<T>(operation: &str, result: &Result<T, EngineError>, started: Instant) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => {
            tracing::debug!(operation, error = %e, "Strategy request rejected");
            e.code().reason()
        }
    };
    record_strategy_request(operation, outcome, started.elapsed().as_secs_f64());
}
