use crate::pricer::{calculate_utilization, years_until, Asset, QuoteRequest};
use crate::state::{AppState, PerfCounters};
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::{DateTime, Utc};
use std::sync::Arc;

fn default_call() -> bool {
    true
}

#[derive(Debug, serde::Deserialize)]
pub struct QuoteQuery {
    pub spot: f64,
    pub strike: f64,
    #[serde(default = "default_call")]
    pub call: bool,
    pub asset: Asset,
    #[serde(default)]
    pub token_locked: f64,
    #[serde(default)]
    pub token_owned: f64,
    /// Time to expiry in years; takes precedence over `expiry`.
    pub time_years: Option<f64>,
    pub expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BorrowRateQuery {
    pub asset: Asset,
    #[serde(default)]
    pub token_locked: f64,
    #[serde(default)]
    pub token_owned: f64,
}

fn unavailable(state: &AppState, reason: String) -> Json<serde_json::Value> {
    PerfCounters::bump(&state.counters.pricing_errors);
    tracing::warn!(reason = %reason, "price unavailable");
    Json(serde_json::json!({ "error": reason }))
}

/// GET /api/quote -- premium and Greeks for one option
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteQuery>,
) -> Json<serde_json::Value> {
    let ttl_years = match (params.time_years, params.expiry) {
        (Some(t), _) => t,
        (None, Some(expiry)) => years_until(expiry, Utc::now()),
        (None, None) => {
            return unavailable(&state, "one of time_years or expiry is required".into());
        }
    };

    let req = QuoteRequest {
        spot: params.spot,
        strike: params.strike,
        ttl_years,
        is_call: params.call,
        asset: params.asset,
        token_locked: params.token_locked,
        token_owned: params.token_owned,
    };

    match state.pricer.quote(&req) {
        Ok(quote) => {
            PerfCounters::bump(&state.counters.quotes_served);
            if quote.expired {
                PerfCounters::bump(&state.counters.expired_quotes);
            }
            Json(serde_json::json!(quote))
        }
        Err(e) => unavailable(&state, e.to_string()),
    }
}

/// GET /api/borrow-rate -- pool utilization and borrow rate for one asset
pub async fn get_borrow_rate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BorrowRateQuery>,
) -> Json<serde_json::Value> {
    match state
        .pricer
        .borrow_rate_for(params.asset, params.token_locked, params.token_owned)
    {
        Ok(rate) => {
            PerfCounters::bump(&state.counters.rates_served);
            Json(serde_json::json!({
                "asset": params.asset,
                "utilization_pct": calculate_utilization(params.token_locked, params.token_owned),
                "borrow_rate_pct": rate,
            }))
        }
        Err(e) => unavailable(&state, e.to_string()),
    }
}

/// GET /api/curves -- configured borrow curves (11 knots each)
pub async fn get_curves(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let table = state.pricer.risk_table();
    Json(serde_json::json!({
        "server_port": state.config.server_port,
        "volatility": state.config.volatility,
        "sol": table.curve(Asset::Sol).points(),
        "usdc": table.curve(Asset::Usdc).points(),
    }))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "quotes_served": state.counters.quotes_served.load(Relaxed),
        "rates_served": state.counters.rates_served.load(Relaxed),
        "expired_quotes": state.counters.expired_quotes.load(Relaxed),
        "pricing_errors": state.counters.pricing_errors.load(Relaxed),
    }))
}

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::server::router;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let pricer = config.pricer().unwrap();
        router(AppState::new(config, pricer))
    }

    async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_quote_route() {
        let body = get_json(
            app(),
            "/api/quote?spot=160&strike=150&time_years=0.25&asset=sol&token_locked=80&token_owned=100",
        )
        .await;
        assert_eq!(body["borrow_rate_pct"], 12.0);
        assert_eq!(body["expired"], false);
        assert!(body["premium"].as_f64().unwrap() > 10.0);
        assert!(body["greeks"]["delta"].as_f64().unwrap() > 0.5);
    }

    #[tokio::test]
    async fn test_quote_route_with_past_expiry() {
        let body = get_json(
            app(),
            "/api/quote?spot=160&strike=150&call=false&expiry=2020-01-01T00:00:00Z&asset=usdc",
        )
        .await;
        assert_eq!(body["expired"], true);
        assert_eq!(body["premium"], 0.0);
        assert!(body["greeks"].is_null());
    }

    #[tokio::test]
    async fn test_quote_route_degrades_on_error() {
        let body = get_json(app(), "/api/quote?spot=160&strike=150&asset=sol").await;
        assert!(body["error"].as_str().unwrap().contains("time_years"));

        let body = get_json(app(), "/api/quote?spot=0&strike=150&time_years=1&asset=sol").await;
        assert!(body["error"].as_str().unwrap().contains("invalid input"));
    }

    #[tokio::test]
    async fn test_borrow_rate_route() {
        let body = get_json(app(), "/api/borrow-rate?asset=sol&token_locked=0&token_owned=100").await;
        assert_eq!(body["borrow_rate_pct"], 3.0);
        assert_eq!(body["asset"], "sol");

        let body = get_json(app(), "/api/borrow-rate?asset=usdc&token_locked=5&token_owned=5").await;
        assert_eq!(body["utilization_pct"], 100.0);
        assert_eq!(body["borrow_rate_pct"], 25.0);
    }

    #[tokio::test]
    async fn test_curves_route() {
        let body = get_json(app(), "/api/curves").await;
        let sol = body["sol"].as_array().unwrap();
        assert_eq!(sol.len(), 11);
        assert_eq!(sol[1]["utilization_rate_bps"], 8000);
        assert_eq!(sol[1]["borrow_rate_bps"], 1200);
        assert_eq!(body["usdc"][0]["borrow_rate_bps"], 100);
        assert_eq!(body["server_port"], 3001);
        assert_eq!(body["volatility"], 0.5);
    }

    #[tokio::test]
    async fn test_counters_route() {
        let app = app();
        let _ = get_json(app.clone(), "/api/borrow-rate?asset=sol&token_owned=1").await;
        let body = get_json(app, "/api/counters").await;
        assert_eq!(body["rates_served"], 1);
        assert_eq!(body["pricing_errors"], 0);
    }
}
