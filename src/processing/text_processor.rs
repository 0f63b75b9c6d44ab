//! Text processing and normalization

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    whitespace_regex: Regex,
    term_separator: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        let term_separator = Regex::new(r"[,;/|\n]+").expect("Invalid separator regex");

        Self {
            stop_words: Self::create_stop_words(),
            whitespace_regex,
            term_separator,
        }
    }

    /// Lowercase, unify typographic punctuation and collapse whitespace
    pub fn normalize(&self, text: &str) -> String {
        let unified: String = text
            .chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                _ => c,
            })
            .collect();

        self.whitespace_regex
            .replace_all(&unified.to_lowercase(), " ")
            .trim()
            .to_string()
    }

    /// Split a comma/semicolon/slash separated list into normalized terms
    pub fn split_terms(&self, text: &str) -> Vec<String> {
        self.term_separator
            .split(text)
            .map(|term| self.normalize(term))
            .filter(|term| !term.is_empty())
            .collect()
    }

    /// Tokenize text into lowercase words using Unicode segmentation
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1 || word.chars().all(|c| c.is_ascii_digit()))
            .filter(|word| !self.stop_words.contains(word.as_str()))
            .filter(|word| word.chars().any(|c| c.is_alphanumeric()))
            .collect()
    }

    /// Tokens for an explicit list term. A term that tokenizes to nothing,
    /// such as "R" or "IT", is kept whole.
    pub fn term_tokens(&self, term: &str) -> Vec<String> {
        let tokens = self.tokenize(term);
        if !tokens.is_empty() {
            return tokens;
        }
        let whole = self.normalize(term);
        if whole.chars().any(|c| c.is_alphanumeric()) {
            vec![whole]
        } else {
            Vec::new()
        }
    }

    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }

    /// Unigrams followed by adjacent-word bigrams
    pub fn terms_with_bigrams(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let bigrams: Vec<String> = tokens
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();

        let mut terms = tokens;
        terms.extend(bigrams);
        terms
    }

    /// True when `phrase` occurs in `text` on word boundaries (both normalized)
    pub fn contains_phrase(&self, text: &str, phrase: &str) -> bool {
        if phrase.is_empty() {
            return false;
        }
        let padded_text = format!(" {} ", self.words_only(text));
        let padded_phrase = format!(" {} ", self.words_only(phrase));
        padded_text.contains(&padded_phrase)
    }

    fn words_only(&self, text: &str) -> String {
        text.unicode_words()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he",
            "in", "is", "it", "its", "of", "on", "or", "that", "the", "to", "was", "will",
            "with", "this", "but", "they", "have", "had", "what", "which", "she", "do",
            "how", "their", "if", "up", "out", "so", "some", "her", "would", "into",
            "him", "my", "me", "than", "been", "who", "now", "get", "may", "our", "just",
            "very", "also", "any", "such", "i", "im", "we", "you", "your", "am", "want",
            "like", "would", "become", "work", "working", "career", "job", "role",
            "interested", "someday", "eventually", "really", "love", "enjoy", "able",
        ]
        .into_iter()
        .collect()
    }
}
