//! Text processing and normalization

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<String>,
    email_regex: Regex,
    phone_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize text for vocabulary matching.
///
/// Lowercases, turns punctuation into token separators and collapses
/// whitespace so that every token is separated by exactly one space. `+`, `#`
/// and inner `.` are kept because they are part of skill names such as
/// `c++`, `c#` and `node.js`; a trailing `.` (end of sentence) is dropped.
pub fn normalize_for_matching(text: &str) -> String {
    let mapped: String = normalize_unicode(text)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '+' | '#' | '.') {
                c
            } else {
                ' '
            }
        })
        .collect();

    mapped
        .split_whitespace()
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace typographic characters with their ASCII counterparts.
pub fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'', // Smart quotes to regular quotes
            '\u{201C}' | '\u{201D}' => '"',  // Smart double quotes
            '\u{2013}' | '\u{2014}' => '-',  // En dash, em dash to hyphen
            '\u{2026}' => '.',               // Ellipsis to period
            '\u{00A0}' => ' ',
            '\u{000C}' => '\n',              // Form feed between PDF pages
            _ => c,
        })
        .collect()
}

impl TextProcessor {
    pub fn new() -> Self {
        let stop_words = Self::create_stop_words();

        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        // Covers +91 98765 43210, (555) 123-4567, 555.123.4567 and plain runs of digits.
        let phone_regex = Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\d{3,5}\)?[\s.-]?\d{3,5}(?:[\s.-]?\d{2,5})?")
            .expect("Invalid phone regex");

        Self {
            stop_words,
            email_regex,
            phone_regex,
        }
    }

    /// Tokenize text into lowercase words using Unicode segmentation.
    ///
    /// Stop words, single characters and purely numeric tokens are dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in text.unicode_words() {
            let normalized = word.to_lowercase();

            if !self.stop_words.contains(&normalized)
                && normalized.chars().count() > 1
                && normalized.chars().any(|c| c.is_alphabetic())
            {
                tokens.push(normalized);
            }
        }

        tokens
    }

    /// First well-formed email address in the text.
    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches('.'))
            .find(|email| {
                email
                    .split_once('@')
                    .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                    .unwrap_or(false)
            })
            .map(|email| email.to_string())
    }

    /// First phone number with 10 to 15 digits, normalized to digits with an
    /// optional leading `+`.
    pub fn extract_phone(&self, text: &str) -> Option<String> {
        // Emails can contain long digit runs; keep them out of the search.
        let without_emails = self.email_regex.replace_all(text, " ");

        self.phone_regex.find_iter(&without_emails).find_map(|m| {
            let raw = m.as_str();
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            if (10..=15).contains(&digits.len()) {
                if raw.starts_with('+') {
                    Some(format!("+{}", digits))
                } else {
                    Some(digits)
                }
            } else {
                None
            }
        })
    }

    /// Common English stop words plus resume boilerplate that carries no signal.
    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he",
            "in", "is", "it", "its", "of", "on", "that", "the", "to", "was", "will", "with",
            "this", "but", "they", "have", "had", "what", "which", "she", "do", "how",
            "their", "if", "up", "out", "then", "them", "these", "so", "some", "her",
            "would", "into", "him", "more", "no", "could", "my", "than", "been", "who",
            "now", "did", "get", "may", "over", "only", "me", "our", "just", "very",
            "after", "any", "same", "also", "here", "off", "should", "own", "under",
            "while", "both", "few", "those", "during", "such", "we", "you", "your", "or",
            "not", "all", "can", "were", "about", "each", "other", "must", "i", "am",
            "being", "because", "until", "against", "between", "through", "before",
            "above", "below", "again", "further", "once", "there", "when", "where", "why",
            "most", "nor", "too", "us", "etc", "using", "including", "within", "across",
            "per", "via", "well", "strong", "good", "plus", "required", "preferred",
            "ability", "knowledge", "years", "year", "experience", "work", "working",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}
