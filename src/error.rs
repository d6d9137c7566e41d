use thiserror::Error;

use crate::core::PricePeriod;

/// Failures at the edges of the dashboard. The calculators themselves are
/// total and never produce one of these.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no price available for the {0} lookback")]
    NoPriceData(PricePeriod),
    #[error("market data error: {0}")]
    MarketData(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
