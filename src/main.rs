use options_pricer::config::AppConfig;
use options_pricer::server;
use options_pricer::state::AppState;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("options pricer starting");

    // Load config
    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    // Curves are validated once here; a bad curve never reaches a quote
    let pricer = match cfg.pricer() {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("borrow curve error: {e}");
            std::process::exit(1);
        }
    };

    for asset in [options_pricer::Asset::Sol, options_pricer::Asset::Usdc] {
        let curve = pricer.risk_table().curve(asset);
        tracing::info!(
            asset = %asset,
            base_rate_bps = curve.base_rate_bps(),
            max_rate_bps = curve.max_rate_bps(),
            "borrow curve loaded"
        );
    }

    let port = cfg.server_port;
    let app = server::router(AppState::new(cfg, pricer));

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
