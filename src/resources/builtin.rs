//! Linguistic data compiled into the crate
//!
//! English ships complete: tokenizer rules, the NLTK stopword list and a
//! lemmatization dictionary. Other languages get generic tokenizer rules
//! and the `stop-words` crate lists, but no dictionary.

use crate::errors::{NormalizeError, Result};
use crate::nlp::lemmatizer::LemmaDictionary;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::TokenizerRules;

const ENGLISH_TOKENIZER_RULES: &str = include_str!("../../data/en/tokenizer.json");
const ENGLISH_STOPWORDS: &str = include_str!("../../data/en/stopwords.txt");
const ENGLISH_LEMMAS: &str = include_str!("../../data/en/lemmas.tsv");

/// Languages with built-in tokenizer rules and stopword sets
pub const LANGUAGES: &[&str] = &[
    "en", "de", "fr", "es", "it", "pt", "nl", "ru", "sv", "no", "da", "fi", "hu", "tr", "pl", "ar",
];

/// Languages with a built-in lemmatization dictionary
pub const DICTIONARY_LANGUAGES: &[&str] = &["en"];

fn unknown(kind: &str, name: &str) -> NormalizeError {
    NormalizeError::resource_load(
        format!("{}[builtin:{}]", kind, name),
        "no built-in data for this language",
    )
}

/// Built-in tokenizer rules
pub fn tokenizer_rules(name: &str) -> Result<TokenizerRules> {
    let rules = match name {
        "en" => TokenizerRules::from_json(ENGLISH_TOKENIZER_RULES).map_err(|e| {
            NormalizeError::resource_load("tokenizer_rules[builtin:en]", e.to_string())
        })?,
        "de" => TokenizerRules::default()
            .with_abbreviations(&["z.b", "bzw", "usw", "d.h", "ca", "nr", "dr", "vgl", "u.a"]),
        "fr" => TokenizerRules::default().with_abbreviations(&["m", "mme", "mlle", "dr", "p.ex"]),
        "es" => TokenizerRules::default()
            .with_abbreviations(&["sr", "sra", "srta", "dr", "ud", "uds", "p.ej"]),
        other if LANGUAGES.contains(&other) => TokenizerRules::default(),
        other => return Err(unknown("tokenizer_rules", other)),
    };
    Ok(rules)
}

/// Built-in stopword set
pub fn stopwords(name: &str) -> Result<StopwordFilter> {
    if name == "en" {
        return Ok(StopwordFilter::from_lines(ENGLISH_STOPWORDS));
    }
    if !LANGUAGES.contains(&name) {
        return Err(unknown("stopwords", name));
    }
    StopwordFilter::from_stop_words_crate(name).ok_or_else(|| unknown("stopwords", name))
}

/// Built-in lemmatization dictionary
pub fn lemma_dictionary(name: &str) -> Result<LemmaDictionary> {
    match name {
        "en" => LemmaDictionary::parse(ENGLISH_LEMMAS)
            .map_err(|e| NormalizeError::resource_load("lemma_dictionary[builtin:en]", e)),
        other => Err(unknown("lemma_dictionary", other)),
    }
}
