//! Lower-cased word view of a message with term matching.
//!
//! A term is one of:
//! - a plain word (`"thanks"`), matched against whole tokens;
//! - a stem ending in `*` (`"frustrat*"`), matched as a token prefix;
//! - a phrase containing a space (`"not working"`), matched on token boundaries.

#[derive(Debug, Clone)]
pub struct Tokens {
    words: Vec<String>,
    /// Tokens joined with single spaces and padded on both ends.
    padded: String,
}

impl Tokens {
    pub fn new(text: &str) -> Self {
        let normalized = text.to_lowercase().replace(['\u{2019}', '\u{2018}', '`'], "'");
        let words: Vec<String> = normalized
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let padded = format!(" {} ", words.join(" "));
        Self { words, padded }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn matches(&self, term: &str) -> bool {
        if term.contains(' ') {
            self.padded.contains(&format!(" {} ", term))
        } else if let Some(stem) = term.strip_suffix('*') {
            self.words.iter().any(|w| w.starts_with(stem))
        } else {
            self.words.iter().any(|w| w == term)
        }
    }

    /// Number of distinct terms from `terms` present in the message.
    pub fn count_matches(&self, terms: &[&str]) -> usize {
        terms.iter().filter(|t| self.matches(t)).count()
    }

    pub fn any_match(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| self.matches(t))
    }

    /// Number of token occurrences that equal one of `words`.
    pub fn count_occurrences(&self, words: &[&str]) -> usize {
        self.words
            .iter()
            .filter(|w| words.contains(&w.as_str()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization_keeps_contractions() {
        let tokens = Tokens::new("I CAN’T log in, it's   broken!");
        assert_eq!(
            tokens.words(),
            &["i", "can't", "log", "in", "it's", "broken"]
        );
    }

    #[test]
    fn test_term_kinds() {
        let tokens = Tokens::new("The VPN is not working and I'm frustrated");
        assert!(tokens.matches("vpn"));
        assert!(tokens.matches("not working"));
        assert!(tokens.matches("frustrat*"));
        assert!(!tokens.matches("work"));
        assert!(!tokens.matches("working not"));
    }

    #[test]
    fn test_word_boundaries() {
        let tokens = Tokens::new("I know the answer");
        assert!(!tokens.matches("now"));
        assert_eq!(tokens.count_occurrences(&["the", "i"]), 2);
    }
}
