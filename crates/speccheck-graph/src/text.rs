//! Token-level text matching shared by the builder and the detectors

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9]+(?:-[a-z0-9]+)*").expect("valid token pattern"));

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "into", "each", "every", "are", "was",
    "will", "have", "has", "its", "our", "all", "any", "via", "use", "uses", "using", "must",
    "shall", "should", "not", "never", "always", "can", "may",
];

/// Lowercased word tokens, hyphenated compounds kept whole
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokens worth comparing across layers
pub(crate) fn significant_tokens(text: &str) -> BTreeSet<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.len() > 2 && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Whether `phrase` occurs as a run of whole tokens starting at `at`
fn phrase_at(tokens: &[String], phrase: &[String], at: usize) -> bool {
    !phrase.is_empty()
        && at + phrase.len() <= tokens.len()
        && tokens[at..at + phrase.len()] == *phrase
}

/// Whether `phrase` occurs anywhere as whole tokens
pub(crate) fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let phrase = tokenize(phrase);
    (0..tokens.len()).any(|i| phrase_at(tokens, &phrase, i))
}

/// Whether `affirmative` occurs somewhere that is not the start of `negated`
pub(crate) fn contains_affirmative(tokens: &[String], affirmative: &str, negated: &str) -> bool {
    let affirmative = tokenize(affirmative);
    let negated = tokenize(negated);
    (0..tokens.len()).any(|i| phrase_at(tokens, &affirmative, i) && !phrase_at(tokens, &negated, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_tokens_stay_whole() {
        assert_eq!(
            tokenize("Non-Blocking I/O, always."),
            vec!["non-blocking", "i", "o", "always"]
        );
    }

    #[test]
    fn significant_tokens_drop_noise() {
        let tokens = significant_tokens("The agent must compose with the pipeline");
        assert!(tokens.contains("compose"));
        assert!(tokens.contains("pipeline"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("must"));
    }

    #[test]
    fn affirmative_excludes_negated_phrase() {
        let negated = tokenize("The agent must not cache");
        assert!(contains_phrase(&negated, "must not"));
        assert!(!contains_affirmative(&negated, "must", "must not"));

        let both = tokenize("must log; must not cache");
        assert!(contains_affirmative(&both, "must", "must not"));
    }

    #[test]
    fn blocking_does_not_match_non_blocking() {
        let tokens = tokenize("non-blocking reads");
        assert!(!contains_phrase(&tokens, "blocking"));
        assert!(contains_phrase(&tokens, "non-blocking"));
    }
}
