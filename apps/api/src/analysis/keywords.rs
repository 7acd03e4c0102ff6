//! Keyword extraction and the missing-keyword set difference.
//!
//! Tokens are maximal runs of word characters (`\w`) of at least
//! [`MIN_KEYWORD_LEN`] characters, taken from the lower-cased text.
//! Pure and allocation-only: safe to call from any number of requests at once.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum token length for a word run to count as a keyword.
pub const MIN_KEYWORD_LEN: usize = 4;

/// Unordered, deduplicated set of lowercase keywords.
pub type KeywordSet = HashSet<String>;

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b\w{{{MIN_KEYWORD_LEN},}}\b")).expect("keyword regex is valid")
});

/// Extracts the keyword set of `text`. Empty input yields an empty set.
pub fn extract_keywords(text: &str) -> KeywordSet {
    let lowered = text.to_lowercase();
    KEYWORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keywords present in the job description but absent from the resume.
///
/// Presence is exact token equality after lower-casing; a resume token that
/// merely contains a JD token as a substring does not cover it.
pub fn missing_keywords(resume: &str, jd: &str) -> KeywordSet {
    let resume_words = extract_keywords(resume);
    extract_keywords(jd)
        .into_iter()
        .filter(|word| !resume_words.contains(word))
        .collect()
}
