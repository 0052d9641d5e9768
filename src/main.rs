mod api;

use axum::Router;
use skalp::services::{AnalysisService, MarketDataService, MultiSymbolContextBuilder, SignalClassifier};
use skalp::sources::{BinanceClient, DeepSeekClient};
use skalp::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market: Arc<MarketDataService<BinanceClient>>,
    pub classifier: Arc<SignalClassifier>,
    pub analysis: Arc<AnalysisService<DeepSeekClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let binance = BinanceClient::new(config.binance_api_url.clone(), config.market_timeout);
        let deepseek = DeepSeekClient::new(
            config.deepseek_api_url.clone(),
            config.deepseek_api_key.clone(),
            config.deepseek_model.clone(),
            config.analysis_timeout,
        );
        let context = MultiSymbolContextBuilder::new(config.reference_symbols.clone());

        Self {
            market: Arc::new(MarketDataService::new(binance, &config.cache)),
            classifier: Arc::new(SignalClassifier::default()),
            analysis: Arc::new(AnalysisService::new(deepseek, context)),
            config: Arc::new(config),
        }
    }
}

/// Build the application router with its layers.
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skalp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting Skalp server on {}:{}", config.host, config.port);
    info!(
        "Defaults: {} {}, references: {}",
        config.default_symbol,
        config.default_timeframe,
        config.reference_symbols.join(",")
    );
    if config.deepseek_api_key.is_none() {
        warn!("DEEPSEEK_API_KEY not set, /api/deepseek will fail");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Skalp server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
