//! Core types for lexnorm
//!
//! This module defines the fundamental data structures that flow through the
//! pipeline: language tags, documents, sentences, tokens and the normalized
//! output handed back to callers.

use crate::errors::{NormalizeError, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Language Tag
// ============================================================================

/// A lower-case language code such as `"en"` or `"de"`.
///
/// Tags are compared exactly after normalization; no fallback from regional
/// variants (`en-GB`) to their base language is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse a language tag, trimming whitespace and lower-casing it.
    pub fn new(tag: impl AsRef<str>) -> Result<Self> {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() {
            return Err(NormalizeError::invalid_config("language tag must not be empty"));
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(NormalizeError::invalid_config(format!(
                "language tag '{}' must not contain whitespace",
                tag
            )));
        }
        Ok(Self(tag))
    }

    /// The English tag, which always has built-in resources.
    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = NormalizeError;

    fn from_str(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LanguageTag {
    type Error = NormalizeError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

// ============================================================================
// Part of speech
// ============================================================================

/// Part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Interjection,
    Numeral,
    Particle,
    Punctuation,
    Symbol,
    ProperNoun,
    Other,
}

impl PosTag {
    /// Check if this POS tag marks a content word
    pub fn is_content_word(&self) -> bool {
        matches!(
            self,
            PosTag::Noun | PosTag::Verb | PosTag::Adjective | PosTag::Adverb | PosTag::ProperNoun
        )
    }

    /// The dictionary category used to lemmatize words carrying this tag.
    ///
    /// Closed-class tags have no category; the lemmatizer treats them like
    /// an absent tag.
    pub fn lemma_category(&self) -> Option<LemmaCategory> {
        match self {
            PosTag::Noun | PosTag::ProperNoun => Some(LemmaCategory::Noun),
            PosTag::Verb => Some(LemmaCategory::Verb),
            PosTag::Adjective => Some(LemmaCategory::Adjective),
            PosTag::Adverb => Some(LemmaCategory::Adverb),
            _ => None,
        }
    }

    /// Parse a Universal Dependencies style tag (`NOUN`, `VERB`, ...)
    pub fn from_ud(tag: &str) -> Self {
        match tag.to_uppercase().as_str() {
            "NOUN" => PosTag::Noun,
            "VERB" | "AUX" => PosTag::Verb,
            "ADJ" => PosTag::Adjective,
            "ADV" => PosTag::Adverb,
            "PRON" => PosTag::Pronoun,
            "DET" => PosTag::Determiner,
            "ADP" => PosTag::Preposition,
            "CCONJ" | "SCONJ" => PosTag::Conjunction,
            "INTJ" => PosTag::Interjection,
            "NUM" => PosTag::Numeral,
            "PART" => PosTag::Particle,
            "PUNCT" => PosTag::Punctuation,
            "SYM" => PosTag::Symbol,
            "PROPN" => PosTag::ProperNoun,
            _ => PosTag::Other,
        }
    }

    /// Get the Universal Dependencies tag string for this enum.
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::Verb => "VERB",
            PosTag::Adjective => "ADJ",
            PosTag::Adverb => "ADV",
            PosTag::Pronoun => "PRON",
            PosTag::Determiner => "DET",
            PosTag::Preposition => "ADP",
            PosTag::Conjunction => "CCONJ",
            PosTag::Interjection => "INTJ",
            PosTag::Numeral => "NUM",
            PosTag::Particle => "PART",
            PosTag::Punctuation => "PUNCT",
            PosTag::Symbol => "SYM",
            PosTag::ProperNoun => "PROPN",
            PosTag::Other => "X",
        }
    }
}

/// Word categories the lemmatization dictionary is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LemmaCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl LemmaCategory {
    /// All categories, in dictionary order
    pub const ALL: [LemmaCategory; 4] = [
        LemmaCategory::Noun,
        LemmaCategory::Verb,
        LemmaCategory::Adjective,
        LemmaCategory::Adverb,
    ];

    /// Parse the one-letter dictionary code (`n`, `v`, `a`, `r`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "n" | "N" => Some(LemmaCategory::Noun),
            "v" | "V" => Some(LemmaCategory::Verb),
            "a" | "A" | "s" => Some(LemmaCategory::Adjective),
            "r" | "R" => Some(LemmaCategory::Adverb),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            LemmaCategory::Noun => 'n',
            LemmaCategory::Verb => 'v',
            LemmaCategory::Adjective => 'a',
            LemmaCategory::Adverb => 'r',
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// A word-level unit of a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface form (original text)
    pub text: String,
    /// The normalized form. Equals the surface form until the lemmatizer runs.
    pub lemma: String,
    /// Part-of-speech tag, when a tagger or the caller supplied one
    pub pos: Option<PosTag>,
    /// Byte offset (start) in the document text
    pub start: usize,
    /// Byte offset (end) in the document text
    pub end: usize,
    /// Sentence index this token belongs to
    pub sentence_idx: usize,
    /// Token index within the document
    pub token_idx: usize,
    /// Whether this token is a stopword
    pub is_stopword: bool,
}

impl Token {
    /// Create a raw token carrying only its surface form and position
    pub fn new(
        text: impl Into<String>,
        start: usize,
        end: usize,
        sentence_idx: usize,
        token_idx: usize,
    ) -> Self {
        let text = text.into();
        Self {
            lemma: text.clone(),
            text,
            pos: None,
            start,
            end,
            sentence_idx,
            token_idx,
            is_stopword: false,
        }
    }

    /// Builder method: attach a part-of-speech tag
    pub fn with_pos(mut self, pos: PosTag) -> Self {
        self.pos = Some(pos);
        self
    }

    /// True when the surface form has at least one letter or digit
    pub fn is_wordlike(&self) -> bool {
        self.text.chars().any(char::is_alphanumeric)
    }

    /// The serializable record for this token
    pub fn to_record(&self) -> TokenRecord {
        TokenRecord {
            surface: self.text.clone(),
            lemma: self.lemma.clone(),
            pos: self.pos.map(|p| p.as_str().to_string()),
            is_stopword: self.is_stopword,
        }
    }
}

/// The external representation of a normalized token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub surface: String,
    pub lemma: String,
    pub pos: Option<String>,
    pub is_stopword: bool,
}

// ============================================================================
// Sentence
// ============================================================================

/// A sentence from the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// The sentence text, trimmed
    pub text: String,
    /// Start byte offset in the document text
    pub start: usize,
    /// End byte offset in the document text
    pub end: usize,
    /// Sentence index within the document
    pub index: usize,
    /// Tokens in document order
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Create a new sentence without tokens
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            tokens: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ============================================================================
// Document
// ============================================================================

/// Raw text plus the language it is written in.
///
/// Fields are private so a document cannot change once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    language: LanguageTag,
}

impl Document {
    pub fn new(text: impl Into<String>, language: LanguageTag) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    /// Create a document from a raw language string
    pub fn parse(text: impl Into<String>, language: &str) -> Result<Self> {
        Ok(Self::new(text, LanguageTag::new(language)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> &LanguageTag {
        &self.language
    }
}

// ============================================================================
// Normalized Document
// ============================================================================

/// The terminal output of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub language: LanguageTag,
    pub sentences: Vec<Sentence>,
}

impl NormalizedDocument {
    pub fn new(language: LanguageTag, sentences: Vec<Sentence>) -> Self {
        Self {
            language,
            sentences,
        }
    }

    /// Total number of tokens across all sentences
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// All tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    /// Tokens that are neither stopwords nor punctuation
    pub fn content_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens().filter(|t| !t.is_stopword && t.is_wordlike())
    }

    /// Normalized forms of all tokens in document order
    pub fn lemmas(&self) -> Vec<&str> {
        self.tokens().map(|t| t.lemma.as_str()).collect()
    }

    /// Distinct content lemmas in order of first occurrence.
    ///
    /// Lemmas of two characters or fewer and lemmas without letters are
    /// skipped. At most `limit` keywords are returned (`0` = all).
    pub fn keywords(&self, limit: usize) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut keywords = Vec::new();

        for token in self.content_tokens() {
            if limit > 0 && keywords.len() >= limit {
                break;
            }
            let lemma = token.lemma.to_lowercase();
            if lemma.chars().count() <= 2 || !lemma.chars().any(char::is_alphabetic) {
                continue;
            }
            if seen.insert(lemma.clone()) {
                keywords.push(lemma);
            }
        }

        keywords
    }

    /// The external record form: one list of token records per sentence
    pub fn to_records(&self) -> Vec<Vec<TokenRecord>> {
        self.sentences
            .iter()
            .map(|s| s.tokens.iter().map(Token::to_record).collect())
            .collect()
    }

    /// Serialize [`to_records`](Self::to_records) as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedDocument {
        let mut sentence = Sentence::new("The cats sleep.", 0, 15, 0);
        let mut the = Token::new("The", 0, 3, 0, 0).with_pos(PosTag::Determiner);
        the.lemma = "the".into();
        the.is_stopword = true;
        let mut cats = Token::new("cats", 4, 8, 0, 1).with_pos(PosTag::Noun);
        cats.lemma = "cat".into();
        let sleep = Token::new("sleep", 9, 14, 0, 2);
        let dot = Token::new(".", 14, 15, 0, 3).with_pos(PosTag::Punctuation);
        sentence.tokens = vec![the, cats, sleep, dot];
        NormalizedDocument::new(LanguageTag::english(), vec![sentence])
    }

    #[test]
    fn test_language_tag_normalization() {
        let tag = LanguageTag::new("  EN ").unwrap();
        assert_eq!(tag.as_str(), "en");
        assert!(LanguageTag::new("").is_err());
        assert!(LanguageTag::new("e n").is_err());
    }

    #[test]
    fn test_language_tag_serde() {
        let tag: LanguageTag = serde_json::from_str("\"DE\"").unwrap();
        assert_eq!(tag.as_str(), "de");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"de\"");
        assert!(serde_json::from_str::<LanguageTag>("\"\"").is_err());
    }

    #[test]
    fn test_document_deserialize() {
        let doc: Document = serde_json::from_str(r#"{"text": "Hi.", "language": "en"}"#).unwrap();
        assert_eq!(doc.text(), "Hi.");
        assert_eq!(doc.language(), &LanguageTag::english());
    }

    #[test]
    fn test_pos_categories() {
        assert_eq!(PosTag::ProperNoun.lemma_category(), Some(LemmaCategory::Noun));
        assert_eq!(PosTag::Verb.lemma_category(), Some(LemmaCategory::Verb));
        assert_eq!(PosTag::Determiner.lemma_category(), None);
        assert_eq!(PosTag::from_ud("aux"), PosTag::Verb);
        assert_eq!(PosTag::from_ud("PROPN").as_str(), "PROPN");
    }

    #[test]
    fn test_category_codes() {
        for cat in LemmaCategory::ALL {
            let code = cat.code().to_string();
            assert_eq!(LemmaCategory::from_code(&code), Some(cat));
        }
        assert_eq!(LemmaCategory::from_code("x"), None);
    }

    #[test]
    fn test_new_token_lemma_defaults_to_surface() {
        let token = Token::new("Running", 0, 7, 0, 0);
        assert_eq!(token.lemma, "Running");
        assert!(token.pos.is_none());
        assert!(!token.is_stopword);
    }

    #[test]
    fn test_records_and_json() {
        let doc = sample();
        let records = doc.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0][1].surface, "cats");
        assert_eq!(records[0][1].lemma, "cat");
        assert_eq!(records[0][1].pos.as_deref(), Some("NOUN"));
        assert_eq!(records[0][2].pos, None);

        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value[0][0]["surface"], "The");
        assert_eq!(value[0][0]["is_stopword"], true);
        assert!(value[0][2]["pos"].is_null());
    }

    #[test]
    fn test_content_tokens_and_keywords() {
        let doc = sample();
        let content: Vec<_> = doc.content_tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(content, vec!["cats", "sleep"]);
        assert_eq!(doc.keywords(0), vec!["cat", "sleep"]);
        assert_eq!(doc.keywords(1), vec!["cat"]);
        assert_eq!(doc.token_count(), 4);
    }
}
