//! Shareable dashboard state, carried in the page URL's query string.
//!
//! Parsing is forgiving: a link with a mistyped or unknown parameter still
//! opens the dashboard, with that field left at its default.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{InvestmentInputs, InvestmentType, PayPeriod, PricePeriod};

/// Which unknown the investment calculator solves for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveFor {
    #[default]
    #[serde(alias = "value", alias = "futureValue")]
    FutureValue,
    Duration,
}

impl SolveFor {
    pub fn id(self) -> &'static str {
        match self {
            SolveFor::FutureValue => "value",
            SolveFor::Duration => "duration",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "value" | "future-value" | "futureValue" => Some(SolveFor::FutureValue),
            "duration" => Some(SolveFor::Duration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub price_period: PricePeriod,
    pub pay_period: PayPeriod,
    pub salary: Option<f64>,
    pub starting_amount: Option<f64>,
    pub periodic_amount: Option<f64>,
    pub investment: InvestmentType,
    pub solve_for: SolveFor,
    pub years: Option<f64>,
    pub target_value: Option<f64>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            price_period: PricePeriod::OneDay,
            pay_period: PayPeriod::Yearly,
            salary: None,
            starting_amount: None,
            periodic_amount: None,
            investment: InvestmentType::Vdhg,
            solve_for: SolveFor::FutureValue,
            years: None,
            target_value: None,
        }
    }
}

impl DashboardState {
    pub fn investment_inputs(&self) -> InvestmentInputs {
        InvestmentInputs {
            starting_amount: self.starting_amount.unwrap_or(0.0),
            periodic_amount: self.periodic_amount.unwrap_or(0.0),
            pay_period: self.pay_period,
            investment: self.investment,
        }
    }

    pub fn to_query(&self) -> String {
        serialize(self)
    }

    pub fn from_query(query: &str) -> Self {
        deserialize(query)
    }
}

pub fn serialize(state: &DashboardState) -> String {
    let mut pairs = vec![
        ("period", state.price_period.id().to_string()),
        ("pay", state.pay_period.id().to_string()),
    ];
    let amounts = [
        ("salary", state.salary),
        ("start", state.starting_amount),
        ("contrib", state.periodic_amount),
    ];
    pairs.extend(
        amounts
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_string()))),
    );
    pairs.push(("type", state.investment.id().to_string()));
    pairs.push(("mode", state.solve_for.id().to_string()));
    if let Some(years) = state.years {
        pairs.push(("years", years.to_string()));
    }
    if let Some(target) = state.target_value {
        pairs.push(("target", target.to_string()));
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn deserialize(query: &str) -> DashboardState {
    let mut state = DashboardState::default();
    let query = query.trim().trim_start_matches('?');

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
        let value = match urlencoding::decode(&raw.replace('+', " ")) {
            Ok(value) => value.into_owned(),
            Err(error) => {
                debug!(key, %error, "skipping undecodable query value");
                continue;
            }
        };

        match key {
            "period" => set_parsed(&mut state.price_period, key, PricePeriod::from_id(&value)),
            "pay" => set_parsed(&mut state.pay_period, key, PayPeriod::from_id(&value)),
            "salary" => state.salary = parse_amount(key, &value),
            "start" => state.starting_amount = parse_amount(key, &value),
            "contrib" => state.periodic_amount = parse_amount(key, &value),
            "type" => state.investment = InvestmentType::from_id(&value),
            "mode" => set_parsed(&mut state.solve_for, key, SolveFor::from_id(&value)),
            "years" => state.years = parse_amount(key, &value),
            "target" => state.target_value = parse_amount(key, &value),
            _ => debug!(key, "ignoring unknown query parameter"),
        }
    }

    state
}

fn set_parsed<T>(slot: &mut T, key: &str, parsed: Option<T>) {
    match parsed {
        Some(value) => *slot = value,
        None => debug!(key, "ignoring unrecognised query value"),
    }
}

fn parse_amount(key: &str, value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            debug!(key, value, "ignoring non-numeric query value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_state() -> DashboardState {
        DashboardState {
            price_period: PricePeriod::OneYear,
            pay_period: PayPeriod::Biweekly,
            salary: Some(3_250.5),
            starting_amount: Some(10_000.0),
            periodic_amount: Some(250.0),
            investment: InvestmentType::Bitcoin,
            solve_for: SolveFor::Duration,
            years: None,
            target_value: Some(1_000_000.0),
        }
    }

    #[test]
    fn serialize_writes_keys_in_fixed_order() {
        let query = serialize(&populated_state());
        assert_eq!(
            query,
            "period=1y&pay=biweekly&salary=3250.5&start=10000&contrib=250&type=bitcoin&mode=duration&target=1000000"
        );
    }

    #[test]
    fn deserialize_restores_serialized_state() {
        let state = populated_state();
        assert_eq!(DashboardState::from_query(&state.to_query()), state);
    }

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(deserialize(""), DashboardState::default());
        assert_eq!(deserialize("?"), DashboardState::default());
    }

    #[test]
    fn deserialize_tolerates_bad_values_and_unknown_keys() {
        let state = deserialize("?period=3d&pay=hourly&salary=abc&start=%2012000&utm_source=x&years=7.5&type=tulips&mode=sideways");

        assert_eq!(state.price_period, PricePeriod::OneDay);
        assert_eq!(state.pay_period, PayPeriod::Yearly);
        assert_eq!(state.salary, None);
        assert_eq!(state.starting_amount, Some(12_000.0));
        assert_eq!(state.years, Some(7.5));
        assert_eq!(state.investment, InvestmentType::Unlisted);
        assert_eq!(state.solve_for, SolveFor::FutureValue);
    }

    #[test]
    fn non_finite_amounts_are_dropped() {
        let state = deserialize("salary=NaN&target=inf&contrib=+150");
        assert_eq!(state.salary, None);
        assert_eq!(state.target_value, None);
        assert_eq!(state.periodic_amount, Some(150.0));
    }

    #[test]
    fn investment_inputs_default_missing_amounts_to_zero() {
        let inputs = deserialize("pay=weekly&type=gold").investment_inputs();
        assert_eq!(inputs.starting_amount, 0.0);
        assert_eq!(inputs.periodic_amount, 0.0);
        assert_eq!(inputs.pay_period, PayPeriod::Weekly);
        assert_eq!(inputs.investment, InvestmentType::Gold);
    }
}
