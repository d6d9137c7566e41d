use tracing::{debug, trace};

use super::engine::future_value;
use super::types::{DurationOutcome, DurationSolution, InvestmentInputs};

#[derive(Debug, Clone, Copy)]
pub struct DurationSolveConfig {
    pub initial_horizon_years: f64,
    pub max_horizon_years: f64,
    /// Currency distance from the target that ends the search early.
    pub value_tolerance: f64,
    /// Bracket width, in years, that counts as converged.
    pub year_tolerance: f64,
    pub max_iterations: u32,
}

impl Default for DurationSolveConfig {
    fn default() -> Self {
        Self {
            initial_horizon_years: 100.0,
            max_horizon_years: 200.0,
            value_tolerance: 0.01,
            year_tolerance: 0.001,
            max_iterations: 100,
        }
    }
}

/// Years of saving needed before the projected value reaches `target_value`.
pub fn required_duration(inputs: &InvestmentInputs, target_value: f64) -> f64 {
    solve_duration(inputs, target_value).years
}

pub fn solve_duration(inputs: &InvestmentInputs, target_value: f64) -> DurationSolution {
    solve_duration_with(inputs, target_value, DurationSolveConfig::default())
}

pub fn solve_duration_with(
    inputs: &InvestmentInputs,
    target_value: f64,
    config: DurationSolveConfig,
) -> DurationSolution {
    let starting_amount = inputs.starting_amount.max(0.0);
    if target_value.is_nan() || target_value <= starting_amount {
        return solution(0.0, 0, DurationOutcome::AlreadyMet);
    }

    let rate = inputs.investment.annual_rate();
    if rate <= 0.0 {
        let yearly_contribution =
            inputs.periodic_amount.max(0.0) * inputs.pay_period.periods_per_year() as f64;
        if yearly_contribution <= 0.0 {
            return solution(0.0, 0, DurationOutcome::Unreachable);
        }
        let years = (target_value - starting_amount) / yearly_contribution;
        return solution(years, 0, DurationOutcome::Linear);
    }

    let value_at = |years: f64| future_value(inputs, years).future_value;

    let mut low = 0.0;
    let mut high = config.initial_horizon_years;
    if value_at(high) < target_value {
        debug!(
            target_value,
            horizon = high,
            "target beyond initial horizon, widening search"
        );
        high = config.max_horizon_years;
        if value_at(high) < target_value {
            debug!(
                target_value,
                horizon = high,
                "target unreachable inside search horizon"
            );
            return solution(config.max_horizon_years, 0, DurationOutcome::Saturated);
        }
    }

    let mut iterations = 0;
    while iterations < config.max_iterations && high - low > config.year_tolerance {
        iterations += 1;
        let mid = (low + high) * 0.5;
        let value = value_at(mid);
        trace!(iterations, low, high, mid, value, "bisection step");

        if (value - target_value).abs() <= config.value_tolerance {
            return solution(mid, iterations, DurationOutcome::WithinTolerance);
        }
        if value < target_value {
            low = mid;
        } else {
            high = mid;
        }
    }

    let outcome = if high - low <= config.year_tolerance {
        DurationOutcome::Converged
    } else {
        DurationOutcome::IterationLimit
    };
    solution((low + high) * 0.5, iterations, outcome)
}

fn solution(years: f64, iterations: u32, outcome: DurationOutcome) -> DurationSolution {
    DurationSolution {
        years,
        iterations,
        outcome,
    }
}
