use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

const SECONDS_IN_DAY: i64 = 24 * 60 * 60;

/// How often the page re-pulls prices.
pub const REFRESH_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: &'static str,
    pub symbol: &'static str,
    pub label: &'static str,
}

pub const INSTRUMENTS: [Instrument; 5] = [
    Instrument {
        id: "vdhg",
        symbol: "VDHG.AX",
        label: "Vanguard Diversified High Growth",
    },
    Instrument {
        id: "asx200",
        symbol: "^AXJO",
        label: "ASX 200",
    },
    Instrument {
        id: "sp500",
        symbol: "^GSPC",
        label: "S&P 500",
    },
    Instrument {
        id: "gold",
        symbol: "GOLD.AX",
        label: "Gold",
    },
    Instrument {
        id: "bitcoin",
        symbol: "BTC-AUD",
        label: "Bitcoin (AUD)",
    },
];

pub fn instrument(id: &str) -> Option<&'static Instrument> {
    INSTRUMENTS.iter().find(|instrument| instrument.id == id)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
pub enum PricePeriod {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl PricePeriod {
    pub const ALL: [PricePeriod; 5] = [
        PricePeriod::OneDay,
        PricePeriod::OneWeek,
        PricePeriod::OneMonth,
        PricePeriod::OneYear,
        PricePeriod::FiveYears,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PricePeriod::OneDay => "1d",
            PricePeriod::OneWeek => "1w",
            PricePeriod::OneMonth => "1m",
            PricePeriod::OneYear => "1y",
            PricePeriod::FiveYears => "5y",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        PricePeriod::ALL
            .into_iter()
            .find(|period| period.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Seconds to look back from now. `None` for the five-year view, which
    /// uses the oldest price in the series instead.
    pub fn lookback_secs(self) -> Option<i64> {
        match self {
            PricePeriod::OneDay => Some(SECONDS_IN_DAY),
            PricePeriod::OneWeek => Some(7 * SECONDS_IN_DAY),
            PricePeriod::OneMonth => Some(30 * SECONDS_IN_DAY),
            PricePeriod::OneYear => Some(365 * SECONDS_IN_DAY),
            PricePeriod::FiveYears => None,
        }
    }
}

impl fmt::Display for PricePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Daily closes for one symbol, as delivered by the market feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeries {
    #[serde(default)]
    pub current_price: Option<f64>,
    pub timestamps: Vec<i64>,
    pub close_prices: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Builds a series from a Yahoo Finance v8 chart response body.
    pub fn from_chart_json(body: &str) -> Result<Self> {
        let response: ChartResponse = serde_json::from_str(body)?;
        let result = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DashboardError::MarketData("no chart data in response".to_string()))?;
        let close_prices = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|quote| quote.close)
            .ok_or_else(|| DashboardError::MarketData("no quote data".to_string()))?;

        Ok(Self {
            current_price: result.meta.and_then(|meta| meta.regular_market_price),
            timestamps: result.timestamp,
            close_prices,
        })
    }

    /// Live price when the feed reports one, else the latest close.
    pub fn resolved_current_price(&self) -> Option<f64> {
        self.current_price
            .or_else(|| self.close_prices.iter().rev().find_map(|price| *price))
    }

    pub fn first_price(&self) -> Option<f64> {
        self.close_prices.iter().find_map(|price| *price)
    }
}

/// Price nearest to `target_time`: the closest timestamp wins (earliest on a
/// tie), then the first non-null price from there forward, else the nearest
/// one behind it.
pub fn price_at_time(timestamps: &[i64], prices: &[Option<f64>], target_time: i64) -> Option<f64> {
    let len = timestamps.len().min(prices.len());
    if len == 0 {
        return None;
    }

    let mut closest = 0;
    for (idx, timestamp) in timestamps[..len].iter().enumerate() {
        if timestamp.abs_diff(target_time) < timestamps[closest].abs_diff(target_time) {
            closest = idx;
        }
    }

    prices[closest..len]
        .iter()
        .find_map(|price| *price)
        .or_else(|| prices[..=closest].iter().rev().find_map(|price| *price))
}

pub fn period_start_price(series: &PriceSeries, period: PricePeriod, now: i64) -> Option<f64> {
    match period.lookback_secs() {
        Some(lookback) => price_at_time(
            &series.timestamps,
            &series.close_prices,
            now.saturating_sub(lookback),
        ),
        None => series.first_price(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChange {
    pub period: PricePeriod,
    pub current_price: f64,
    pub start_price: f64,
    pub change: f64,
    pub change_percent: f64,
}

pub fn price_change(series: &PriceSeries, period: PricePeriod, now: i64) -> Result<PriceChange> {
    let start_price = period_start_price(series, period, now)
        .filter(|price| *price != 0.0)
        .ok_or(DashboardError::NoPriceData(period))?;
    let current_price = series
        .resolved_current_price()
        .ok_or(DashboardError::NoPriceData(period))?;

    let change = current_price - start_price;
    Ok(PriceChange {
        period,
        current_price,
        start_price,
        change,
        change_percent: change / start_price * 100.0,
    })
}

/// Changes for every lookback the series can answer.
pub fn price_changes(series: &PriceSeries, now: i64) -> Vec<PriceChange> {
    PricePeriod::ALL
        .into_iter()
        .filter_map(|period| price_change(series, period, now).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const NOW: i64 = 1_700_000_000;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn daily_series() -> PriceSeries {
        // Ten daily closes ending today, with a gap two days back.
        let timestamps = (0..10).map(|day| NOW - (9 - day) * SECONDS_IN_DAY).collect();
        let close_prices = vec![
            Some(100.0),
            Some(101.0),
            Some(102.0),
            Some(103.0),
            Some(104.0),
            Some(105.0),
            Some(106.0),
            None,
            Some(108.0),
            Some(110.0),
        ];
        PriceSeries {
            current_price: Some(111.0),
            timestamps,
            close_prices,
        }
    }

    #[test]
    fn price_at_time_picks_closest_timestamp() {
        let series = daily_series();
        let at = |target| price_at_time(&series.timestamps, &series.close_prices, target);

        assert_eq!(at(NOW - SECONDS_IN_DAY), Some(108.0));
        assert_eq!(at(NOW - 7 * SECONDS_IN_DAY - 60), Some(102.0));
    }

    #[test]
    fn price_at_time_skips_forward_over_gaps() {
        let series = daily_series();
        let price = price_at_time(
            &series.timestamps,
            &series.close_prices,
            NOW - 2 * SECONDS_IN_DAY,
        );
        assert_eq!(price, Some(108.0));
    }

    #[test]
    fn price_at_time_falls_back_to_earlier_prices() {
        let timestamps = vec![10, 20, 30];
        let prices = vec![Some(5.0), Some(6.0), None];
        assert_eq!(price_at_time(&timestamps, &prices, 29), Some(6.0));
        assert_eq!(price_at_time(&[], &[], 29), None);
        assert_eq!(price_at_time(&timestamps, &[None, None, None], 29), None);
    }

    #[test]
    fn price_at_time_prefers_earliest_on_ties() {
        let timestamps = vec![10, 20];
        let prices = vec![Some(1.0), Some(2.0)];
        assert_eq!(price_at_time(&timestamps, &prices, 15), Some(1.0));
    }

    #[test]
    fn extreme_clock_values_do_not_overflow() {
        let series = daily_series();
        let changes = price_changes(&series, i64::MIN);
        assert_eq!(changes.len(), PricePeriod::ALL.len());
        assert!(changes.iter().all(|change| change.start_price == 100.0));

        let timestamps = vec![i64::MAX - 1, i64::MAX];
        let prices = vec![Some(1.0), Some(2.0)];
        assert_eq!(price_at_time(&timestamps, &prices, i64::MIN), Some(1.0));
        assert_eq!(price_at_time(&timestamps, &prices, i64::MAX), Some(2.0));
        assert_eq!(price_at_time(&[i64::MIN, 0], &prices, i64::MAX), Some(2.0));
    }

    #[test]
    fn five_year_view_uses_oldest_price() {
        let mut series = daily_series();
        series.close_prices[0] = None;
        assert_eq!(
            period_start_price(&series, PricePeriod::FiveYears, NOW),
            Some(101.0)
        );
    }

    #[test]
    fn price_change_reports_absolute_and_percent() {
        let series = daily_series();
        let change = price_change(&series, PricePeriod::OneDay, NOW).expect("change expected");
        assert_approx(change.start_price, 108.0);
        assert_approx(change.current_price, 111.0);
        assert_approx(change.change, 3.0);
        assert_approx(change.change_percent, 3.0 / 108.0 * 100.0);
    }

    #[test]
    fn current_price_falls_back_to_latest_close() {
        let mut series = daily_series();
        series.current_price = None;
        let change = price_change(&series, PricePeriod::FiveYears, NOW).expect("change expected");
        assert_approx(change.current_price, 110.0);
        assert_approx(change.change_percent, 10.0);
    }

    #[test]
    fn empty_series_has_no_price_data() {
        let err = price_change(&PriceSeries::default(), PricePeriod::OneWeek, NOW)
            .expect_err("must fail without prices");
        assert!(matches!(err, DashboardError::NoPriceData(PricePeriod::OneWeek)));
        assert!(price_changes(&PriceSeries::default(), NOW).is_empty());
    }

    #[test]
    fn chart_json_is_parsed_into_series() {
        let body = r#"{
          "chart": {
            "result": [{
              "meta": { "regularMarketPrice": 42.5 },
              "timestamp": [1, 2, 3],
              "indicators": { "quote": [{ "close": [40.0, null, 41.0], "open": [1, 2, 3] }] }
            }],
            "error": null
          }
        }"#;
        let series = PriceSeries::from_chart_json(body).expect("chart should parse");
        assert_eq!(series.current_price, Some(42.5));
        assert_eq!(series.timestamps, vec![1, 2, 3]);
        assert_eq!(series.close_prices, vec![Some(40.0), None, Some(41.0)]);
    }

    #[test]
    fn chart_json_without_result_is_an_error() {
        let err = PriceSeries::from_chart_json(r#"{"chart":{"result":null,"error":"Not Found"}}"#)
            .expect_err("must fail");
        assert!(matches!(err, DashboardError::MarketData(_)));
    }

    #[test]
    fn period_ids_round_trip_through_lookup() {
        for period in PricePeriod::ALL {
            assert_eq!(PricePeriod::from_id(period.id()), Some(period));
        }
        assert_eq!(PricePeriod::from_id("1Y"), Some(PricePeriod::OneYear));
        assert_eq!(PricePeriod::from_id("3d"), None);
        assert_eq!(instrument("gold").map(|i| i.symbol), Some("GOLD.AX"));
    }
}
