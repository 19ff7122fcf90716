//! Sentiment classification — an independent `text -> label` utility.
//!
//! Not part of the matching flow. The provider client is built on first use,
//! so a missing credential only fails this path, never startup.

pub mod handlers;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::prompts::{SENTIMENT_PROMPT_TEMPLATE, SENTIMENT_SYSTEM};
use crate::llm_client::{LlmClient, MODEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = AppError;

    /// Accepts exactly `Positive`, `Negative` or `Neutral`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Positive" => Ok(Sentiment::Positive),
            "Negative" => Ok(Sentiment::Negative),
            "Neutral" => Ok(Sentiment::Neutral),
            other => Err(AppError::Llm(format!(
                "unexpected sentiment label: {other:?}"
            ))),
        }
    }
}

/// Backend that returns a raw, unvalidated label for a text.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn raw_label(&self, text: &str) -> Result<String, AppError>;
}

#[async_trait]
impl SentimentProvider for LlmClient {
    async fn raw_label(&self, text: &str) -> Result<String, AppError> {
        let prompt = SENTIMENT_PROMPT_TEMPLATE.replace("{text}", text);
        self.call_text(&prompt, SENTIMENT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Sentiment request failed: {e}")))
    }
}

/// Classifies text through a lazily constructed provider.
pub struct SentimentClassifier {
    api_key: Option<String>,
    base_url: String,
    provider: OnceCell<Arc<dyn SentimentProvider>>,
}

impl SentimentClassifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            provider: OnceCell::new(),
        }
    }

    /// Classifier with an already-built provider.
    #[cfg(test)]
    pub fn with_provider(provider: Arc<dyn SentimentProvider>) -> Self {
        Self {
            api_key: None,
            base_url: String::new(),
            provider: OnceCell::new_with(Some(provider)),
        }
    }

    pub async fn classify(&self, text: &str) -> Result<Sentiment, AppError> {
        let provider = self
            .provider
            .get_or_try_init(|| async { self.build_provider() })
            .await?;

        provider.raw_label(text).await?.parse()
    }

    fn build_provider(&self) -> Result<Arc<dyn SentimentProvider>, AppError> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            AppError::Configuration(
                "OPENAI_API_KEY is not set; sentiment classification is unavailable".to_string(),
            )
        })?;

        let client = LlmClient::new(api_key, &self.base_url)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build LLM client: {e}")))?;
        info!("LLM client initialized (model: {MODEL})");

        Ok(Arc::new(client))
    }
}
