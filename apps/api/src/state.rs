use std::sync::Arc;

use crate::analysis::matcher::MatchScorer;
use crate::config::Config;
use crate::sentiment::SentimentClassifier;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable match scorer. Default: KeywordMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// Sentiment classifier; its provider client is built on first use.
    pub sentiment: Arc<SentimentClassifier>,
}
