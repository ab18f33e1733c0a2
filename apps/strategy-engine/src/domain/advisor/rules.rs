//! Closed set of risk patterns recognized by the adjustment advisor.
//!
//! Patterns are evaluated in declaration order. Each renders to one or more
//! human-readable suggestions.

use serde::Serialize;

use crate::domain::strategy::{Leg, OptionType, Position};

/// A short leg whose quantity is not offset by long legs of the same type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NakedLeg {
    /// Index of the leg in the request.
    pub index: usize,
    /// Option type of the short leg.
    pub option_type: OptionType,
    /// Strike of the short leg.
    pub strike: f64,
    /// Contracts left without protection.
    pub uncovered_quantity: u32,
}

/// Which side of the strike range spot has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Moneyness {
    /// Spot is above every strike.
    AboveAllStrikes,
    /// Spot is below every strike.
    BelowAllStrikes,
}

/// Risk shape of a strategy relative to spot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum RiskPattern {
    /// Short legs without offsetting long protection.
    NakedExposure {
        /// Uncovered legs, most exposed first per option type.
        legs: Vec<NakedLeg>,
    },
    /// Losing steeply as price rises, with spot next to a strike.
    NearStrikeSlope {
        /// Index of the leg whose strike is nearest spot.
        leg_index: usize,
        /// Leg description.
        leg: String,
        /// P&L slope at spot.
        slope: f64,
        /// Distance from spot to the strike, as a fraction of spot.
        distance: f64,
    },
    /// Spot has moved past every strike on one side.
    DeepMoneyness {
        /// Side spot has moved to.
        moneyness: Moneyness,
        /// Expiration P&L at spot.
        pnl_at_spot: f64,
    },
    /// Flat around spot and collecting premium.
    Balanced {
        /// P&L slope at spot.
        slope: f64,
        /// Net premium collected.
        total_premium: f64,
    },
}

impl RiskPattern {
    /// Suggestions for this pattern.
    #[must_use]
    pub fn suggestions(&self, spot_price: f64) -> Vec<String> {
        match self {
            Self::NakedExposure { legs } => legs.iter().map(naked_leg_suggestion).collect(),
            Self::NearStrikeSlope {
                leg,
                slope,
                distance,
                ..
            } => vec![format!(
                "Spot {spot_price} is within {:.2}% of the {leg} leg and the position loses {:.2} per point as price rises; consider closing or rolling the near-the-money leg",
                distance * 100.0,
                slope.abs()
            )],
            Self::DeepMoneyness {
                moneyness,
                pnl_at_spot,
            } => {
                let side = match moneyness {
                    Moneyness::AboveAllStrikes => "above",
                    Moneyness::BelowAllStrikes => "below",
                };
                vec![format!(
                    "Strategy is deep in/out of the money (spot {spot_price} is {side} every strike); consider closing for realized P&L of {pnl_at_spot:+.2}"
                )]
            }
            Self::Balanced { .. } => vec!["Position is balanced; no adjustment needed".to_string()],
        }
    }
}

fn naked_leg_suggestion(naked: &NakedLeg) -> String {
    match naked.option_type {
        OptionType::Call => format!(
            "Naked short {}x {} CALL has unlimited upside risk; buy a further OTM call above {} to cap risk",
            naked.uncovered_quantity, naked.strike, naked.strike
        ),
        OptionType::Put => format!(
            "Naked short {}x {} PUT carries downside risk to a zero underlying; buy a further OTM put below {} to cap risk",
            naked.uncovered_quantity, naked.strike, naked.strike
        ),
    }
}

/// Short legs of `option_type` left uncovered after long legs of the same
/// type are matched against them.
///
/// Long quantity covers the most exposed shorts first: the lowest call
/// strikes or the highest put strikes.
#[must_use]
pub fn naked_legs(legs: &[Leg], option_type: OptionType) -> Vec<NakedLeg> {
    let mut cover: u32 = legs
        .iter()
        .filter(|leg| leg.option_type() == option_type && leg.position() == Position::Long)
        .map(Leg::quantity)
        .fold(0, u32::saturating_add);

    let mut shorts: Vec<(usize, &Leg)> = legs
        .iter()
        .enumerate()
        .filter(|(_, leg)| leg.option_type() == option_type && leg.position() == Position::Short)
        .collect();
    shorts.sort_by(|(_, a), (_, b)| match option_type {
        OptionType::Call => a.strike().total_cmp(&b.strike()),
        OptionType::Put => b.strike().total_cmp(&a.strike()),
    });

    let mut naked = Vec::new();
    for (index, leg) in shorts {
        let covered = cover.min(leg.quantity());
        cover -= covered;
        let uncovered = leg.quantity() - covered;
        if uncovered > 0 {
            naked.push(NakedLeg {
                index,
                option_type,
                strike: leg.strike(),
                uncovered_quantity: uncovered,
            });
        }
    }
    naked
}
