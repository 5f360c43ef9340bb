use regex::Regex;
use std::{collections::HashSet, sync::LazyLock};

// Anything that is not a lowercase ascii letter or a separator gets stripped.
// The \x1c-\x1f control characters separate words too, even though they are
// not Unicode White_Space.
static NON_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z\s\x1c-\x1f]").expect("static tokenizer pattern is valid")
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// English stop words. Contractions are left out since the apostrophe never
/// survives normalization.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "d", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just",
    "ll", "m", "ma", "me", "might", "more", "most", "must", "my", "myself", "no", "nor", "not",
    "now", "o", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "she", "should", "shouldn", "so", "some", "such",
    "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
    "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won", "would", "y", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Splits raw message text into normalized word tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer {
    remove_stop_words: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop common English stop words from the output. Off by default.
    pub fn with_stop_words(mut self, remove: bool) -> Self {
        self.remove_stop_words = remove;
        self
    }

    pub fn removes_stop_words(&self) -> bool {
        self.remove_stop_words
    }

    /// Lowercases `text`, strips everything outside `[a-z]` and separators,
    /// then splits on separator runs.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = NON_WORD_REGEX.replace_all(&lowered, "");

        cleaned
            .split(is_separator)
            .filter(|word| !word.is_empty())
            .filter(|word| !(self.remove_stop_words && STOP_WORDS.contains(*word)))
            .map(str::to_string)
            .collect()
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Tokenizes with the default settings (stop words kept).
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("FREE money, NOW!!! Call 0800-123"),
            vec!["free", "money", "now", "call"]
        );
    }

    #[test]
    fn strips_accents_and_emoji() {
        assert_eq!(tokenize("Café déjà vu 🎉"), vec!["caf", "dj", "vu"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
        assert!(tokenize("1234 !!! ...").is_empty());
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(tokenize("lunch\t\tat \n noon"), vec!["lunch", "at", "noon"]);
    }

    #[test]
    fn ascii_control_separators_split_words() {
        assert_eq!(tokenize("free\x1cmoney\x1fnow"), vec!["free", "money", "now"]);
        assert_eq!(tokenize("win\x1d\x1e prize"), vec!["win", "prize"]);
        // other control characters are dropped, not split on
        assert_eq!(tokenize("fr\x07ee"), vec!["free"]);
    }

    #[test]
    fn unicode_whitespace_splits_words() {
        assert_eq!(tokenize("lunch\u{a0}at\u{3000}noon"), vec!["lunch", "at", "noon"]);
    }

    #[test]
    fn punctuation_inside_word_joins_it() {
        // "don't" loses the apostrophe, it does not split
        assert_eq!(tokenize("don't e-mail"), vec!["dont", "email"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(tokenize("win win WIN"), vec!["win", "win", "win"]);
    }

    #[test]
    fn tokenizing_rejoined_output_is_stable() {
        let inputs = [
            "Hey, are you around? I'm running a bit late with the lunch.",
            "Hi im Ana with a free offer meal",
            "URGENT!! You've WON £1000 cash -- claim @ www.win.com",
        ];
        for input in inputs {
            let first = tokenize(input);
            let second = tokenize(&first.join(" "));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn stop_words_are_kept_by_default() {
        assert!(!Tokenizer::new().removes_stop_words());
        assert_eq!(tokenize("the cat is here"), vec!["the", "cat", "is", "here"]);
    }

    #[test]
    fn stop_words_removed_when_enabled() {
        let tokenizer = Tokenizer::new().with_stop_words(true);
        assert_eq!(
            tokenizer.tokenize("The offer is FREE for you and your friends"),
            vec!["offer", "free", "friends"]
        );
    }
}
