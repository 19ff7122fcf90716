// Prompt constants for provider-backed utilities.

/// System prompt for sentiment classification.
pub const SENTIMENT_SYSTEM: &str = "You are a sentiment analysis assistant.";

/// User prompt for sentiment classification. `{text}` is replaced with the input.
pub const SENTIMENT_PROMPT_TEMPLATE: &str = "\
Analyze the sentiment of the following text and respond with exactly one word:
Positive, Negative, or Neutral.

Text: {text}";
