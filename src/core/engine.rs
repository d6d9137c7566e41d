use super::types::{InvestmentInputs, InvestmentProjection, OneYearGains};

/// Value of `amount` after compounding at `rate` for `years` (may be fractional).
fn compound(amount: f64, rate: f64, years: f64) -> f64 {
    amount * (1.0 + rate).powf(years)
}

/// Contributions land at the start of each sub-period, so the i-th of `n`
/// (1-indexed) compounds for `(n - i + 1) / n` of a year.
fn full_year_contributions(periodic_amount: f64, rate: f64, periods: u32) -> f64 {
    let n = periods as f64;
    (1..=periods)
        .map(|i| compound(periodic_amount, rate, (n - i as f64 + 1.0) / n))
        .sum()
}

/// `amount * factor`, keeping a zero amount at zero when the factor overflows.
fn scaled(amount: f64, factor: f64) -> f64 {
    if amount == 0.0 { 0.0 } else { amount * factor }
}

pub fn one_year_gains(inputs: &InvestmentInputs) -> OneYearGains {
    let rate = inputs.investment.annual_rate();
    let starting_amount = inputs.starting_amount.max(0.0);
    let periodic_amount = inputs.periodic_amount.max(0.0);
    let periods = inputs.pay_period.periods_per_year();

    let starting_gain = starting_amount * rate;
    let periodic_gains =
        full_year_contributions(periodic_amount, rate, periods) - periodic_amount * periods as f64;

    OneYearGains {
        starting_gain,
        periodic_gains,
        total_gain: starting_gain + periodic_gains,
    }
}

/// Projects `inputs` forward by `years`. Runs in constant time for any finite
/// horizon; very long horizons at a positive rate overflow to infinity.
pub fn future_value(inputs: &InvestmentInputs, years: f64) -> InvestmentProjection {
    if !years.is_finite() || years <= 0.0 {
        return InvestmentProjection::default();
    }

    let rate = inputs.investment.annual_rate();
    let starting_amount = inputs.starting_amount.max(0.0);
    let periodic_amount = inputs.periodic_amount.max(0.0);
    let periods = inputs.pay_period.periods_per_year();

    let whole_years = years.floor();
    let fractional_year = years - whole_years;

    // Whole years in closed form: S * g^k + C * (g^k - 1) / r, with C the
    // compounded value of one year of contributions.
    let log_growth = rate.ln_1p() * whole_years;
    let annuity_factor = if rate == 0.0 {
        whole_years
    } else {
        log_growth.exp_m1() / rate
    };
    let mut balance = scaled(starting_amount, log_growth.exp())
        + scaled(
            full_year_contributions(periodic_amount, rate, periods),
            annuity_factor,
        );
    let mut total_contributions =
        starting_amount + scaled(periodic_amount * periods as f64, whole_years);

    if fractional_year > 0.0 {
        balance = compound(balance, rate, fractional_year);

        // Only complete periods contribute; a trailing partial period adds nothing.
        let n = periods as f64;
        let periods_in_fraction = n * fractional_year;
        let complete_periods = periods_in_fraction.floor() as u32;
        for i in 1..=complete_periods {
            let time_remaining = (periods_in_fraction - i as f64 + 1.0) / n;
            balance += compound(periodic_amount, rate, time_remaining);
            total_contributions += periodic_amount;
        }
    }

    InvestmentProjection {
        future_value: balance,
        total_contributions,
        total_gains: balance - total_contributions,
    }
}
