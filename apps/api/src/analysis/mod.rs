// Keyword match analysis: tokenizer, matcher, placeholder snippet rewriting.
// Everything here is pure and synchronous; handlers.rs is the only async edge.

pub mod handlers;
pub mod matcher;
pub mod snippets;
pub mod tokenizer;
