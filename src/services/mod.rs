pub mod aggregator;
pub mod analysis;
pub mod cache;
pub mod context;
pub mod market_data;
pub mod session;
pub mod signals;
pub mod synthesizer;

pub use aggregator::TradeBucketAggregator;
pub use analysis::AnalysisService;
pub use cache::Cache;
pub use context::{MarketContext, MultiSymbolContextBuilder, SymbolContext};
pub use market_data::MarketDataService;
pub use session::ChartSession;
pub use signals::{ClassifierConfig, SignalClassifier};
pub use synthesizer::KlineFallbackSynthesizer;
