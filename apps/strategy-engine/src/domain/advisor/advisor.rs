//! Rule-based adjustment advisor.

use serde::{Deserialize, Serialize};

use super::rules::{Moneyness, RiskPattern, naked_legs};
use crate::domain::payoff::{PayoffPoint, interpolate_pnl, slope_at, total_premium};
use crate::domain::strategy::{Leg, OptionType, distinct_strikes};

/// Advisor thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Slope at spot at or below `-slope_threshold` counts as steep downside.
    #[serde(default = "default_slope_threshold")]
    pub slope_threshold: f64,
    /// Spot within this fraction of a strike counts as near the money.
    #[serde(default = "default_proximity_pct")]
    pub proximity_pct: f64,
    /// Spot beyond every strike by this fraction counts as deep in/out of the money.
    #[serde(default = "default_moneyness_buffer")]
    pub moneyness_buffer: f64,
    /// Slope at spot within this band of zero counts as balanced.
    #[serde(default = "default_balance_epsilon")]
    pub balance_epsilon: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            slope_threshold: default_slope_threshold(),
            proximity_pct: default_proximity_pct(),
            moneyness_buffer: default_moneyness_buffer(),
            balance_epsilon: default_balance_epsilon(),
        }
    }
}

const fn default_slope_threshold() -> f64 {
    0.5
}

const fn default_proximity_pct() -> f64 {
    0.02
}

const fn default_moneyness_buffer() -> f64 {
    0.02
}

const fn default_balance_epsilon() -> f64 {
    0.05
}

/// Classifies a strategy's risk shape and renders suggestions.
///
/// Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentAdvisor {
    config: AdvisorConfig,
}

impl AdjustmentAdvisor {
    /// Create an advisor with the given thresholds.
    #[must_use]
    pub const fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Suggestions for a strategy, in pattern priority order.
    #[must_use]
    pub fn suggest(&self, legs: &[Leg], curve: &[PayoffPoint], spot_price: f64) -> Vec<String> {
        self.classify(legs, curve, spot_price)
            .iter()
            .flat_map(|pattern| pattern.suggestions(spot_price))
            .collect()
    }

    /// Matched risk patterns, in priority order.
    ///
    /// `Balanced` is only reported when nothing else matched.
    #[must_use]
    pub fn classify(&self, legs: &[Leg], curve: &[PayoffPoint], spot_price: f64) -> Vec<RiskPattern> {
        let mut patterns = Vec::new();
        let slope = slope_at(curve, spot_price).unwrap_or(0.0);

        let mut naked = naked_legs(legs, OptionType::Call);
        naked.extend(naked_legs(legs, OptionType::Put));
        if !naked.is_empty() {
            patterns.push(RiskPattern::NakedExposure { legs: naked });
        }

        if slope <= -self.config.slope_threshold
            && let Some(pattern) = self.near_strike(legs, spot_price, slope)
        {
            patterns.push(pattern);
        }

        if let Some(pattern) = self.deep_moneyness(legs, curve, spot_price) {
            patterns.push(pattern);
        }

        let premium = total_premium(legs);
        if patterns.is_empty() && slope.abs() <= self.config.balance_epsilon && premium > 0.0 {
            patterns.push(RiskPattern::Balanced {
                slope,
                total_premium: premium,
            });
        }

        tracing::debug!(
            slope,
            patterns = patterns.len(),
            "strategy risk shape classified"
        );

        patterns
    }

    fn near_strike(&self, legs: &[Leg], spot_price: f64, slope: f64) -> Option<RiskPattern> {
        let (leg_index, leg) = legs
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.strike() - spot_price)
                    .abs()
                    .total_cmp(&(b.strike() - spot_price).abs())
            })?;

        let distance = (leg.strike() - spot_price).abs() / spot_price;
        (distance <= self.config.proximity_pct).then(|| RiskPattern::NearStrikeSlope {
            leg_index,
            leg: leg.to_string(),
            slope,
            distance,
        })
    }

    fn deep_moneyness(
        &self,
        legs: &[Leg],
        curve: &[PayoffPoint],
        spot_price: f64,
    ) -> Option<RiskPattern> {
        let strikes = distinct_strikes(legs);
        let (min_strike, max_strike) = (*strikes.first()?, *strikes.last()?);
        let buffer = self.config.moneyness_buffer;

        let moneyness = if spot_price >= max_strike * (1.0 + buffer) {
            Moneyness::AboveAllStrikes
        } else if spot_price <= min_strike * (1.0 - buffer) {
            Moneyness::BelowAllStrikes
        } else {
            return None;
        };

        Some(RiskPattern::DeepMoneyness {
            moneyness,
            pnl_at_spot: interpolate_pnl(curve, spot_price)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payoff::{GridConfig, PayoffEngine, PriceGrid};
    use crate::domain::strategy::Position;

    fn advise(legs: &[Leg], spot: f64) -> (Vec<RiskPattern>, Vec<String>) {
        let grid = PriceGrid::build(legs, spot, &GridConfig::default()).unwrap();
        let curve = PayoffEngine::default().compute(legs, &grid).unwrap();
        let advisor = AdjustmentAdvisor::default();
        (
            advisor.classify(legs, &curve, spot),
            advisor.suggest(legs, &curve, spot),
        )
    }

    fn leg(option_type: OptionType, position: Position, strike: f64, premium: f64) -> Leg {
        Leg::new(option_type, position, strike, premium, 1).unwrap()
    }

    #[test]
    fn test_naked_short_call_suggests_protection() {
        let legs = [leg(OptionType::Call, Position::Short, 26_000.0, 50.0)];
        let (patterns, suggestions) = advise(&legs, 25_000.0);

        assert!(matches!(patterns[0], RiskPattern::NakedExposure { .. }));
        assert!(suggestions[0].contains("buy a further OTM call above 26000"));
    }

    #[test]
    fn test_naked_short_put_suggests_protection() {
        let legs = [leg(OptionType::Put, Position::Short, 24_000.0, 50.0)];
        let (_, suggestions) = advise(&legs, 25_000.0);

        assert!(suggestions.iter().any(|s| s.contains("buy a further OTM put below 24000")));
    }

    #[test]
    fn test_near_strike_steep_downside() {
        // Bear call spread with spot sitting on the short strike
        let legs = [
            leg(OptionType::Call, Position::Short, 25_000.0, 120.0),
            leg(OptionType::Call, Position::Long, 25_500.0, 40.0),
        ];
        let (patterns, suggestions) = advise(&legs, 25_100.0);

        assert_eq!(patterns.len(), 1);
        match &patterns[0] {
            RiskPattern::NearStrikeSlope {
                leg_index, slope, ..
            } => {
                assert_eq!(*leg_index, 0);
                assert!((*slope + 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected pattern {other:?}"),
        }
        assert!(suggestions[0].contains("closing or rolling"));
    }

    #[test]
    fn test_iron_condor_in_range_is_balanced() {
        let legs = [
            leg(OptionType::Put, Position::Long, 23_500.0, 30.0),
            leg(OptionType::Put, Position::Short, 24_000.0, 80.0),
            leg(OptionType::Call, Position::Short, 26_000.0, 80.0),
            leg(OptionType::Call, Position::Long, 26_500.0, 30.0),
        ];
        let (patterns, suggestions) = advise(&legs, 25_000.0);

        assert_eq!(
            patterns,
            vec![RiskPattern::Balanced {
                slope: 0.0,
                total_premium: 100.0
            }]
        );
        assert_eq!(suggestions, vec!["Position is balanced; no adjustment needed"]);
    }

    #[test]
    fn test_spot_past_all_strikes() {
        let legs = [
            leg(OptionType::Call, Position::Long, 24_800.0, 120.0),
            leg(OptionType::Call, Position::Short, 25_200.0, 80.0),
        ];
        let (patterns, suggestions) = advise(&legs, 27_000.0);

        assert_eq!(
            patterns,
            vec![RiskPattern::DeepMoneyness {
                moneyness: Moneyness::AboveAllStrikes,
                pnl_at_spot: 360.0
            }]
        );
        assert!(suggestions[0].contains("+360.00"));
    }

    #[test]
    fn test_debit_position_without_risk_has_no_suggestion() {
        let legs = [
            leg(OptionType::Call, Position::Long, 24_800.0, 120.0),
            leg(OptionType::Call, Position::Short, 25_200.0, 80.0),
        ];
        let (patterns, _) = advise(&legs, 25_000.0);
        assert!(patterns.is_empty());
    }
}
