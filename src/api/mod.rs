use axum::{
    Router,
    extract::{Json, Query, RawQuery},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    DurationSolution, INSTRUMENTS, InvestmentInputs, InvestmentProjection, InvestmentType,
    OneYearGains, PayPeriod, PriceChange, PricePeriod, PriceSeries, REFRESH_INTERVAL_SECS,
    TakeHomePay, future_value, one_year_gains, price_change, price_changes, solve_duration,
    take_home_pay,
};
use crate::error::{DashboardError, Result};
use crate::state::{DashboardState, SolveFor};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest projection the API will run.
const MAX_PROJECTION_YEARS: f64 = 1_000.0;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    amount: Option<f64>,
    pay_period: Option<PayPeriod>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestPayload {
    starting_amount: Option<f64>,
    periodic_amount: Option<f64>,
    pay_period: Option<PayPeriod>,
    investment_type: Option<InvestmentType>,
    solve_for: Option<SolveFor>,
    years: Option<f64>,
    target_value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceChangePayload {
    series: Option<PriceSeries>,
    /// Raw chart response as returned by the market feed.
    chart: Option<serde_json::Value>,
    period: Option<PricePeriod>,
    now: Option<i64>,
}

#[derive(Debug)]
struct InvestRequest {
    inputs: InvestmentInputs,
    solve_for: SolveFor,
    years: f64,
    target_value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestResponse {
    solve_for: SolveFor,
    investment_type: InvestmentType,
    annual_rate: f64,
    pay_period: PayPeriod,
    one_year: OneYearGains,
    years: f64,
    projection: InvestmentProjection,
    duration: Option<DurationSolution>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResponse {
    state: DashboardState,
    share_query: String,
    take_home: TakeHomePay,
    investment: InvestResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentEntry {
    id: &'static str,
    symbol: &'static str,
    label: &'static str,
    annual_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentEntry {
    id: &'static str,
    label: &'static str,
    annual_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentsResponse {
    refresh_interval_secs: u64,
    instruments: Vec<InstrumentEntry>,
    investment_types: Vec<InvestmentEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceChangeResponse {
    now: i64,
    changes: Vec<PriceChange>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(bind: IpAddr, port: u16) -> Result<()> {
    let addr = SocketAddr::new(bind, port);
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/instruments", get(instruments_handler))
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .route("/api/invest", get(invest_get_handler).post(invest_post_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/price-change", post(price_change_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "dashboard listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn instruments_handler() -> Response {
    json_response(StatusCode::OK, instruments_response())
}

async fn tax_get_handler(Query(payload): Query<TaxPayload>) -> Response {
    json_response(StatusCode::OK, evaluate_tax(payload))
}

async fn tax_post_handler(Json(payload): Json<TaxPayload>) -> Response {
    json_response(StatusCode::OK, evaluate_tax(payload))
}

async fn invest_get_handler(Query(payload): Query<InvestPayload>) -> Response {
    invest_handler_impl(payload)
}

async fn invest_post_handler(Json(payload): Json<InvestPayload>) -> Response {
    invest_handler_impl(payload)
}

fn invest_handler_impl(payload: InvestPayload) -> Response {
    match invest_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, evaluate_investment(&request)),
        Err(err) => err.into_response(),
    }
}

async fn dashboard_handler(RawQuery(query): RawQuery) -> Response {
    let state = DashboardState::from_query(query.as_deref().unwrap_or(""));
    match build_dashboard_response(state) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => err.into_response(),
    }
}

async fn price_change_handler(Json(payload): Json<PriceChangePayload>) -> Response {
    match evaluate_price_change(payload, unix_now()) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::InvalidRequest(_) | DashboardError::Serde(_) => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::NoPriceData(_) | DashboardError::MarketData(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DashboardError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        } else {
            debug!(error = %self, "request rejected");
        }
        error_response(status, &self.to_string())
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

fn evaluate_tax(payload: TaxPayload) -> TakeHomePay {
    take_home_pay(payload.amount, payload.pay_period.unwrap_or(PayPeriod::Yearly))
}

fn invest_request_from_payload(payload: InvestPayload) -> Result<InvestRequest> {
    let years = payload.years.unwrap_or(0.0);
    if years.is_finite() && years > MAX_PROJECTION_YEARS {
        return Err(DashboardError::InvalidRequest(format!(
            "years must be at most {MAX_PROJECTION_YEARS}"
        )));
    }

    Ok(InvestRequest {
        inputs: InvestmentInputs {
            starting_amount: payload.starting_amount.unwrap_or(0.0),
            periodic_amount: payload.periodic_amount.unwrap_or(0.0),
            pay_period: payload.pay_period.unwrap_or(PayPeriod::Yearly),
            investment: payload.investment_type.unwrap_or(InvestmentType::Vdhg),
        },
        solve_for: payload.solve_for.unwrap_or_default(),
        years,
        target_value: payload.target_value.unwrap_or(0.0),
    })
}

fn evaluate_investment(request: &InvestRequest) -> InvestResponse {
    let inputs = &request.inputs;
    let (years, duration) = match request.solve_for {
        SolveFor::FutureValue => (request.years, None),
        SolveFor::Duration => {
            let solution = solve_duration(inputs, request.target_value);
            (solution.years, Some(solution))
        }
    };

    InvestResponse {
        solve_for: request.solve_for,
        investment_type: inputs.investment,
        annual_rate: inputs.investment.annual_rate(),
        pay_period: inputs.pay_period,
        one_year: one_year_gains(inputs),
        years,
        projection: future_value(inputs, years),
        duration,
    }
}

fn build_dashboard_response(state: DashboardState) -> Result<DashboardResponse> {
    let request = invest_request_from_payload(InvestPayload {
        starting_amount: state.starting_amount,
        periodic_amount: state.periodic_amount,
        pay_period: Some(state.pay_period),
        investment_type: Some(state.investment),
        solve_for: Some(state.solve_for),
        years: state.years,
        target_value: state.target_value,
    })?;

    Ok(DashboardResponse {
        share_query: state.to_query(),
        take_home: take_home_pay(state.salary, state.pay_period),
        investment: evaluate_investment(&request),
        state,
    })
}

fn instruments_response() -> InstrumentsResponse {
    InstrumentsResponse {
        refresh_interval_secs: REFRESH_INTERVAL_SECS,
        instruments: INSTRUMENTS
            .iter()
            .map(|instrument| InstrumentEntry {
                id: instrument.id,
                symbol: instrument.symbol,
                label: instrument.label,
                annual_rate: InvestmentType::from_id(instrument.id).annual_rate(),
            })
            .collect(),
        investment_types: InvestmentType::LISTED
            .into_iter()
            .chain([InvestmentType::Unlisted])
            .map(|kind| InvestmentEntry {
                id: kind.id(),
                label: kind.label(),
                annual_rate: kind.annual_rate(),
            })
            .collect(),
    }
}

fn evaluate_price_change(
    payload: PriceChangePayload,
    fallback_now: i64,
) -> Result<PriceChangeResponse> {
    let series = match (payload.series, payload.chart) {
        (Some(series), _) => series,
        (None, Some(chart)) => PriceSeries::from_chart_json(&serde_json::to_string(&chart)?)?,
        (None, None) => {
            return Err(DashboardError::InvalidRequest(
                "either series or chart is required".to_string(),
            ));
        }
    };
    let now = payload.now.unwrap_or(fallback_now);

    let changes = match payload.period {
        Some(period) => vec![price_change(&series, period, now)?],
        None => price_changes(&series, now),
    };
    Ok(PriceChangeResponse { now, changes })
}
