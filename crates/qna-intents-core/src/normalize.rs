//! Text normalization shared by the index builder and the matcher.
//!
//! Both sides of the system must reduce text to exactly the same form, so
//! there is a single implementation here and nothing else in the workspace
//! is allowed to re-derive keys.
//!
//! # Algorithm
//!
//! 1. Lowercase with the locale-independent Unicode mapping.
//! 2. Canonically decompose (NFD) and drop every combining mark, so that
//!    `é` becomes `e` and `Å` becomes `a`.
//! 3. Replace each maximal run of characters outside `[a-z0-9]` with a
//!    single space.
//! 4. Trim leading and trailing spaces.
//!
//! Whitespace is itself outside `[a-z0-9]`, so step 3 already leaves at
//! most one space between tokens.
//!
//! # Example
//!
//! ```rust
//! use qna_intents_core::normalize::{normalize, tokenize};
//!
//! assert_eq!(normalize("Café-123!"), "cafe 123");
//! assert_eq!(tokenize("  Où est   la commande ? "), vec!["ou", "est", "la", "commande"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

/// Reduce `text` to space-separated lowercase ASCII alphanumeric tokens.
///
/// Total and pure: any input (including the empty string) yields a
/// string, possibly empty. Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lower = text.to_lowercase();
    let stripped: String = lower
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    RE_NON_ALNUM
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Normalize `text` and split it into tokens.
///
/// Returns an empty vector when the text normalizes to the empty string.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
