//! Stopword flagging
//!
//! Stopword sets come from the shared [`LinguisticResources`]: the NLTK
//! English list ships with the crate, other languages use the `stop-words`
//! crate. Tokens are flagged, never removed.

use crate::errors::{NormalizeError, Result};
use crate::nlp::STAGE_STOPWORDS;
use crate::resources::LinguisticResources;
use crate::types::{LanguageTag, Sentence, Token};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

/// What to do when a language has no registered stopword set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordMode {
    /// Missing set is an `UnsupportedLanguage` error
    #[default]
    Strict,
    /// Missing set flags nothing
    Permissive,
}

/// A set-membership stopword test
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: FxHashSet<String>,
    /// Whether the filter is case-sensitive
    case_sensitive: bool,
}

impl StopwordFilter {
    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self::from_words(words.iter().copied())
    }

    /// Create a stopword filter from any sequence of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|w| fold(w.as_ref().trim()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            stopwords,
            case_sensitive: false,
        }
    }

    /// Parse a word-per-line list. Blank lines and `#` comments are skipped.
    pub fn from_lines(source: &str) -> Self {
        Self::from_words(
            source
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Load the `stop-words` crate list for a language code.
    ///
    /// Returns `None` for languages the crate does not cover.
    pub fn from_stop_words_crate(language: &str) -> Option<Self> {
        let lang = match language.to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            _ => return None,
        };

        Some(Self::from_words(get(lang).iter().map(|s| s.to_string())))
    }

    /// Set case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(fold(word));
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.remove(&fold(word));
        }
    }

    /// Check if a word is a stopword.
    ///
    /// A typographic apostrophe (U+2019) matches `'`.
    pub fn is_stopword(&self, word: &str) -> bool {
        let word = word.replace('\u{2019}', "'");
        if self.case_sensitive {
            self.stopwords.contains(&word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    /// Set the stopword flag on every token.
    ///
    /// Punctuation and symbol tokens are never flagged. The token count is
    /// unchanged.
    pub fn flag(&self, tokens: &mut [Token]) {
        for token in tokens {
            token.is_stopword = token.is_wordlike() && self.is_stopword(&token.text);
        }
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

fn fold(word: &str) -> String {
    word.to_lowercase().replace('\u{2019}', "'")
}

/// Flag stopwords in every sentence using the set registered for `language`.
///
/// With [`StopwordMode::Permissive`] a missing set clears every flag instead
/// of failing. The check happens even when there are no sentences.
pub fn flag_stopwords(
    resources: &LinguisticResources,
    language: &LanguageTag,
    mode: StopwordMode,
    sentences: &mut [Sentence],
) -> Result<()> {
    match (resources.stopwords(language), mode) {
        (Some(filter), _) => {
            for sentence in sentences {
                filter.flag(&mut sentence.tokens);
            }
            Ok(())
        }
        (None, StopwordMode::Permissive) => {
            tracing::debug!(language = %language, "no stopword set; flagging nothing");
            for token in sentences.iter_mut().flat_map(|s| s.tokens.iter_mut()) {
                token.is_stopword = false;
            }
            Ok(())
        }
        (None, StopwordMode::Strict) => Err(NormalizeError::unsupported_language(
            language.as_str(),
            STAGE_STOPWORDS,
        )),
    }
}
