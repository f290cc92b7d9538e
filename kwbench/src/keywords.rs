use serde::{Deserialize, Serialize};

use crate::errors::{BenchError, SearchResult};

/// Ordered, duplicate-free list of search terms for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Builds a keyword set, trimming each term and dropping blanks and repeats.
    ///
    /// Returns `BenchError::NoKeywords` when nothing usable remains.
    pub fn new<I, S>(words: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() && !unique.iter().any(|w| w == word) {
                unique.push(word.to_string());
            }
        }

        if unique.is_empty() {
            return Err(BenchError::NoKeywords);
        }
        Ok(Self { words: unique })
    }

    /// Parses comma-separated user input such as `"hello, world"`
    pub fn parse(input: &str) -> SearchResult<Self> {
        Self::new(input.split(','))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

impl TryFrom<Vec<String>> for KeywordSet {
    type Error = BenchError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(words)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.words
    }
}
