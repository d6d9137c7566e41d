mod engine;
mod market;
mod rates;
mod solver;
mod tax;
mod types;

pub use engine::{future_value, one_year_gains};
pub use market::{
    INSTRUMENTS, Instrument, PriceChange, PricePeriod, PriceSeries, REFRESH_INTERVAL_SECS,
    instrument, period_start_price, price_at_time, price_change, price_changes,
};
pub use rates::annual_rate;
pub use solver::{DurationSolveConfig, required_duration, solve_duration, solve_duration_with};
pub use tax::{
    AU_2024_25_BRACKETS, annualize, compute_tax_breakdown, compute_tax_breakdown_with,
    per_period, take_home_pay,
};
pub use types::{
    BracketBreakdown, DurationOutcome, DurationSolution, InvestmentInputs, InvestmentProjection,
    InvestmentType, OneYearGains, PayPeriod, TakeHomePay, TaxBracket, TaxBreakdown,
};
