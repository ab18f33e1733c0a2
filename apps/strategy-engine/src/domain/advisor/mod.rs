//! Rule-based adjustment suggestions.

mod advisor;
mod rules;

pub use advisor::{AdjustmentAdvisor, AdvisorConfig};
pub use rules::{Moneyness, NakedLeg, RiskPattern, naked_legs};
