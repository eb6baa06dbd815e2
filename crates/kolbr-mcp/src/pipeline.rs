//! Presentation pipeline
//!
//! One analysis run: parse the trade text, normalize it, ask the analyst and
//! render the answer. The caller always sees exactly two states, `Loading`
//! first and the terminal presentation second, whatever happens in between.

use std::sync::Arc;

use kolbr_core::{build_request, render, AnalysisState, Presentation, RawTrade};

use crate::client::TradeSource;

pub struct AnalysisPipeline<S> {
    source: Arc<S>,
}

impl<S: TradeSource> AnalysisPipeline<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Run one analysis, emitting `Loading` before any work and the terminal
    /// presentation once the analyst round trip is over.
    pub async fn run_analysis<F>(&self, trade_text: &str, mut emit: F)
    where
        F: FnMut(AnalysisState),
    {
        emit(AnalysisState::Loading);
        let presentation = self.analyze_text(trade_text).await;
        emit(AnalysisState::Done(presentation));
    }

    /// Parse, normalize, analyze and render. Invalid text or a trade without a
    /// contract address short-circuits before the network.
    pub async fn analyze_text(&self, trade_text: &str) -> Presentation {
        let outcome = match RawTrade::parse(trade_text).and_then(|trade| build_request(&trade)) {
            Ok(request) => self.source.analyze(&request).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            tracing::warn!(error = %e, kind = e.kind(), "Analysis failed");
        }
        render(outcome)
    }
}
