//! Linguistic resources
//!
//! Tokenizer rules, stopword sets and lemmatization dictionaries are loaded
//! once at startup and are read-only afterwards. A loaded
//! [`LinguisticResources`] is shared by reference (or behind an `Arc`)
//! across every pipeline invocation and every worker thread.

pub mod builtin;
pub mod config;

pub use config::{ResourceConfig, ResourceSource};

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::errors::{NormalizeError, Result};
use crate::nlp::lemmatizer::LemmaDictionary;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::TokenizerRules;
use crate::types::LanguageTag;

/// Immutable per-language resource registry
#[derive(Debug, Clone, Default)]
pub struct LinguisticResources {
    tokenizer_rules: FxHashMap<LanguageTag, TokenizerRules>,
    stopwords: FxHashMap<LanguageTag, StopwordFilter>,
    dictionaries: FxHashMap<LanguageTag, LemmaDictionary>,
}

impl LinguisticResources {
    /// Load every resource named by `config`.
    ///
    /// Any unreadable or malformed resource aborts loading with
    /// `ResourceLoadFailure`.
    pub fn load(config: &ResourceConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::builder();

        for (language, source) in &config.tokenizer_rules {
            let rules = load_source(
                "tokenizer_rules",
                language,
                source,
                builtin::tokenizer_rules,
                |text| TokenizerRules::from_json(text).map_err(|e| e.to_string()),
            )?;
            builder = builder.with_tokenizer_rules(language.clone(), rules);
        }

        for (language, source) in &config.stopwords {
            let filter = load_source(
                "stopwords",
                language,
                source,
                builtin::stopwords,
                |text| Ok(StopwordFilter::from_lines(text)),
            )?;
            tracing::debug!(language = %language, words = filter.len(), "loaded stopwords");
            builder = builder.with_stopwords(language.clone(), filter);
        }

        for (language, source) in &config.lemma_dictionaries {
            let dictionary = load_source(
                "lemma_dictionary",
                language,
                source,
                builtin::lemma_dictionary,
                LemmaDictionary::parse,
            )?;
            tracing::debug!(
                language = %language,
                entries = dictionary.len(),
                "loaded lemma dictionary"
            );
            builder = builder.with_dictionary(language.clone(), dictionary);
        }

        let resources = builder.build();
        tracing::info!(
            languages = resources.tokenizer_rules.len(),
            stopword_sets = resources.stopwords.len(),
            dictionaries = resources.dictionaries.len(),
            "linguistic resources loaded"
        );
        Ok(resources)
    }

    /// Load the resource configuration stored at `path`
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(&ResourceConfig::from_path(path)?)
    }

    /// Built-in English resources
    pub fn builtin() -> Result<Self> {
        Self::load(&ResourceConfig::english())
    }

    /// Start an empty registry for programmatic construction
    pub fn builder() -> ResourcesBuilder {
        ResourcesBuilder::default()
    }

    pub fn tokenizer_rules(&self, language: &LanguageTag) -> Option<&TokenizerRules> {
        self.tokenizer_rules.get(language)
    }

    pub fn stopwords(&self, language: &LanguageTag) -> Option<&StopwordFilter> {
        self.stopwords.get(language)
    }

    pub fn dictionary(&self, language: &LanguageTag) -> Option<&LemmaDictionary> {
        self.dictionaries.get(language)
    }

    /// Whether documents in `language` can be tokenized at all
    pub fn supports(&self, language: &LanguageTag) -> bool {
        self.tokenizer_rules.contains_key(language)
    }

    /// Supported languages, sorted
    pub fn languages(&self) -> Vec<&LanguageTag> {
        let mut languages: Vec<_> = self.tokenizer_rules.keys().collect();
        languages.sort();
        languages
    }
}

fn load_source<T>(
    kind: &str,
    language: &LanguageTag,
    source: &ResourceSource,
    from_builtin: impl FnOnce(&str) -> Result<T>,
    parse: impl FnOnce(&str) -> std::result::Result<T, String>,
) -> Result<T> {
    match source {
        ResourceSource::Builtin(name) => from_builtin(name.as_str()),
        ResourceSource::File(path) => {
            let resource = format!("{}[{}] {}", kind, language, path.display());
            let text = std::fs::read_to_string(path)
                .map_err(|e| NormalizeError::resource_load(resource.as_str(), e.to_string()))?;
            tracing::debug!(resource = %resource, bytes = text.len(), "read resource file");
            parse(&text).map_err(|message| NormalizeError::resource_load(resource, message))
        }
    }
}

/// Programmatic construction of a [`LinguisticResources`]
#[derive(Debug, Default)]
pub struct ResourcesBuilder {
    resources: LinguisticResources,
}

impl ResourcesBuilder {
    pub fn with_tokenizer_rules(mut self, language: LanguageTag, rules: TokenizerRules) -> Self {
        self.resources.tokenizer_rules.insert(language, rules);
        self
    }

    pub fn with_stopwords(mut self, language: LanguageTag, filter: StopwordFilter) -> Self {
        self.resources.stopwords.insert(language, filter);
        self
    }

    pub fn with_dictionary(mut self, language: LanguageTag, dictionary: LemmaDictionary) -> Self {
        self.resources.dictionaries.insert(language, dictionary);
        self
    }

    pub fn build(self) -> LinguisticResources {
        self.resources
    }
}
