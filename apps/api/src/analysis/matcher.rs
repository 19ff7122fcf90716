//! Matcher — keyword-overlap analysis of a resume against a job description.
//!
//! Default (and only) backend: `KeywordMatchScorer` (pure-Rust, deterministic,
//! no external calls). `AppState` holds an `Arc<dyn MatchScorer>`.

use serde::{Deserialize, Serialize};

use crate::analysis::snippets::rewrite_snippets;
use crate::analysis::tokenizer::tokenize;

/// Upper bound on the number of missing terms reported.
pub const MAX_MISSING_TERMS: usize = 10;

/// Static improvement tips returned with every analysis.
pub const SUGGESTIONS: [&str; 2] = [
    "Add or highlight relevant projects that show experience with key JD skills.",
    "Use metric-driven bullet points (e.g., improved X by Y%).",
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The two texts being compared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Extracted document content (the resume).
    pub candidate_text: String,
    /// Target description (the job description).
    pub reference_text: String,
}

impl AnalysisInput {
    pub fn new(candidate_text: impl Into<String>, reference_text: impl Into<String>) -> Self {
        Self {
            candidate_text: candidate_text.into(),
            reference_text: reference_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32, // 0 – 100
    pub missing_terms: Vec<String>,
    pub suggestions: Vec<String>,
    pub rewritten_snippets: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores a candidate text against a reference text.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
pub trait MatchScorer: Send + Sync {
    fn score(&self, input: &AnalysisInput) -> AnalysisResult;

    /// Backend label, for logs.
    fn backend(&self) -> &'static str;
}

/// Keyword-overlap scorer.
///
/// Algorithm:
/// 1. Tokenize both texts into lowercase token sets.
/// 2. score = ⌊100 × |candidate ∩ reference| / |reference|⌋, or 0 for an empty reference
/// 3. missing = first 10 reference tokens not in candidate, in reference order
pub struct KeywordMatchScorer;

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, input: &AnalysisInput) -> AnalysisResult {
        analyze(&input.candidate_text, &input.reference_text)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Compares `candidate_text` against `reference_text`. Total over all inputs.
pub fn analyze(candidate_text: &str, reference_text: &str) -> AnalysisResult {
    let candidate_tokens = tokenize(candidate_text);
    let reference_tokens = tokenize(reference_text);

    let score = if reference_tokens.is_empty() {
        0
    } else {
        let common = reference_tokens.intersection_count(&candidate_tokens);
        (100 * common / reference_tokens.len()) as u32
    };

    let missing_terms = reference_tokens
        .difference(&candidate_tokens)
        .take(MAX_MISSING_TERMS)
        .map(String::from)
        .collect();

    AnalysisResult {
        score,
        missing_terms,
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        rewritten_snippets: rewrite_snippets(candidate_text),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
