use crate::error::Result;
use crate::sources::{MarketSource, TextGenerator};
use crate::types::{AnalysisResponse, Timeframe};
use tracing::info;

use super::context::{MarketContext, MultiSymbolContextBuilder};
use super::market_data::MarketDataService;

pub const SYSTEM_PROMPT: &str =
    "Sən Azərbaycan dilində cavab verən, qısa skalp treydi üzrə analitiksən.";

/// Render the user prompt from the context closes.
pub fn build_prompt(symbol: &str, timeframe: Timeframe, context: &MarketContext) -> String {
    let lines = context
        .entries
        .iter()
        .map(|entry| {
            let closes = entry
                .closes
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", entry.symbol, closes)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Sən qısa müddətli kripto treyd analitiksən. Zaman çərçivəsi: {}. Seçilmiş simvol: {}.\n\
         Aşağıda bir neçə əsas simvol üçün son 60 bağlanış qiyməti verilir (koma ilə ayrılıb):\n\
         {}\n\
         Bu simvolları birlikdə nəzərə alaraq ümumi trendi dəyərləndir, seçilmiş simvol üçün qısa skalp strategiyası çıxart: \
         giriş qiyməti, qazanc hədəfi (~+0.5%), zərər dayandır (~-0.3%), və tərəf (long/short). \
         Cavabı Azərbaycan dilində, qısa və actionable bəndlərlə ver.",
        timeframe.as_str(),
        symbol,
        lines
    )
}

/// Narrative analysis over the multi-symbol context.
pub struct AnalysisService<G> {
    generator: G,
    context: MultiSymbolContextBuilder,
}

impl<G: TextGenerator> AnalysisService<G> {
    pub fn new(generator: G, context: MultiSymbolContextBuilder) -> Self {
        Self { generator, context }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn analyze<S: MarketSource>(
        &self,
        market: &MarketDataService<S>,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<AnalysisResponse> {
        let context = self.context.build(market, symbol, timeframe).await;
        let prompt = build_prompt(symbol, timeframe, &context);

        info!(
            "Requesting analysis for {} {} ({} symbols)",
            symbol,
            timeframe.as_str(),
            context.entries.len()
        );
        let analysis = self.generator.complete(SYSTEM_PROMPT, &prompt).await?;

        Ok(AnalysisResponse {
            analysis,
            symbols: context.symbols(),
            stats: context.stats(),
        })
    }
}
