//! Natural Language Processing components
//!
//! This module provides tokenization, stopword flagging, heuristic POS
//! tagging and dictionary lemmatization.

pub mod lemmatizer;
pub mod stopwords;
pub mod tagger;
pub mod tokenizer;

/// Stage name reported by the tokenizer
pub const STAGE_TOKENIZE: &str = "tokenize";
/// Stage name reported by the stopword filter
pub const STAGE_STOPWORDS: &str = "stopwords";
/// Stage name reported by the lemmatizer
pub const STAGE_LEMMATIZE: &str = "lemmatize";
