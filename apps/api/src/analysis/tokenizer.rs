//! Tokenizer — lowercases text and collects its distinct word tokens.
//!
//! A token is a maximal run of word characters, digits, `+` and `-`, with
//! leading `+`/`-` and trailing `-` stripped: `-Python` is `python`, while
//! `c++` and `5+` keep their suffix. Runs made only of `+`/`-` are not tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w+-]+").expect("valid token regex"));

/// Distinct tokens of a text, iterated in first-occurrence order.
///
/// Membership is what matters for matching; the order only exists so that
/// anything selected from the set is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.members.contains(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of tokens present in both sets.
    pub fn intersection_count(&self, other: &TokenSet) -> usize {
        self.iter().filter(|t| other.contains(t)).count()
    }

    /// Tokens of `self` absent from `other`, in `self`'s order.
    pub fn difference<'a>(&'a self, other: &'a TokenSet) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |t| !other.contains(t))
    }

    fn insert(&mut self, token: &str) {
        if self.members.insert(token.to_string()) {
            self.ordered.push(token.to_string());
        }
    }
}

/// Lowercases `text` and returns its distinct tokens.
pub fn tokenize(text: &str) -> TokenSet {
    let lowered = text.to_lowercase();
    let mut tokens = TokenSet::default();

    for m in TOKEN_RE.find_iter(&lowered) {
        let token = m
            .as_str()
            .trim_start_matches(['+', '-'])
            .trim_end_matches('-');
        if !token.is_empty() {
            tokens.insert(token);
        }
    }

    tokens
}
