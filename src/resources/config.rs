//! Resource configuration consumed at startup.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "languages": ["en", "de"],
//!   "tokenizer_rules": { "en": { "builtin": "en" }, "de": { "file": "rules/de.json" } },
//!   "stopwords": { "en": { "builtin": "en" }, "de": { "builtin": "de" } },
//!   "lemma_dictionaries": { "en": { "file": "/srv/nlp/en.tsv" } }
//! }
//! ```
//!
//! Every supported language needs tokenizer rules. Stopwords and a
//! dictionary are optional per language; stages that need a missing one
//! fail with `UnsupportedLanguage` at run time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::builtin;
use crate::errors::{NormalizeError, Result};
use crate::types::LanguageTag;

/// Where one resource set comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceSource {
    /// Data compiled into the crate, by language name
    Builtin(String),
    /// A file on disk
    File(PathBuf),
}

impl ResourceSource {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self::Builtin(name.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Short description used in log lines and error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Builtin(name) => format!("builtin:{}", name),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Startup configuration for [`LinguisticResources`](super::LinguisticResources)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    /// The set of supported languages
    pub languages: Vec<LanguageTag>,

    #[serde(default)]
    pub tokenizer_rules: BTreeMap<LanguageTag, ResourceSource>,

    #[serde(default)]
    pub stopwords: BTreeMap<LanguageTag, ResourceSource>,

    #[serde(default)]
    pub lemma_dictionaries: BTreeMap<LanguageTag, ResourceSource>,
}

impl ResourceConfig {
    /// Built-in sources for the given languages.
    ///
    /// Each language gets every built-in resource that exists for it.
    pub fn builtin(languages: &[&str]) -> Result<Self> {
        let mut config = Self::default();
        for &name in languages {
            let tag = LanguageTag::new(name)?;
            let name = tag.as_str().to_string();
            if !builtin::LANGUAGES.contains(&name.as_str()) {
                return Err(NormalizeError::invalid_config(format!(
                    "no built-in resources for language '{}'",
                    name
                )));
            }
            config
                .tokenizer_rules
                .insert(tag.clone(), ResourceSource::builtin(&name));
            config
                .stopwords
                .insert(tag.clone(), ResourceSource::builtin(&name));
            if builtin::DICTIONARY_LANGUAGES.contains(&name.as_str()) {
                config
                    .lemma_dictionaries
                    .insert(tag.clone(), ResourceSource::builtin(&name));
            }
            config.languages.push(tag);
        }
        Ok(config)
    }

    /// Built-in English only
    pub fn english() -> Self {
        let tag = LanguageTag::english();
        let mut config = Self::default();
        config.languages.push(tag.clone());
        config
            .tokenizer_rules
            .insert(tag.clone(), ResourceSource::builtin("en"));
        config
            .stopwords
            .insert(tag.clone(), ResourceSource::builtin("en"));
        config
            .lemma_dictionaries
            .insert(tag, ResourceSource::builtin("en"));
        config
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ResourceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// Relative `file` sources are resolved against the config file's
    /// directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            NormalizeError::resource_load(format!("config {}", path.display()), e.to_string())
        })?;
        let mut config = Self::from_json(&json)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, dir: &Path) {
        let maps = [
            &mut self.tokenizer_rules,
            &mut self.stopwords,
            &mut self.lemma_dictionaries,
        ];
        for map in maps {
            for source in map.values_mut() {
                if let ResourceSource::File(file) = source {
                    if file.is_relative() {
                        *file = dir.join(&*file);
                    }
                }
            }
        }
    }

    /// Builder method: add a language with its tokenizer rules
    pub fn with_language(mut self, language: LanguageTag, rules: ResourceSource) -> Self {
        if !self.languages.contains(&language) {
            self.languages.push(language.clone());
        }
        self.tokenizer_rules.insert(language, rules);
        self
    }

    /// Builder method: set the stopword source of a language
    pub fn with_stopwords(mut self, language: LanguageTag, source: ResourceSource) -> Self {
        self.stopwords.insert(language, source);
        self
    }

    /// Builder method: set the dictionary source of a language
    pub fn with_lemma_dictionary(mut self, language: LanguageTag, source: ResourceSource) -> Self {
        self.lemma_dictionaries.insert(language, source);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(NormalizeError::invalid_config(
                "at least one supported language is required",
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for language in &self.languages {
            if !seen.insert(language) {
                return Err(NormalizeError::invalid_config(format!(
                    "language '{}' is listed twice",
                    language
                )));
            }
            if !self.tokenizer_rules.contains_key(language) {
                return Err(NormalizeError::invalid_config(format!(
                    "language '{}' has no tokenizer rules",
                    language
                )));
            }
        }

        let sections = [
            ("tokenizer_rules", &self.tokenizer_rules),
            ("stopwords", &self.stopwords),
            ("lemma_dictionaries", &self.lemma_dictionaries),
        ];
        for (section, map) in sections {
            if let Some(extra) = map.keys().find(|lang| !seen.contains(lang)) {
                return Err(NormalizeError::invalid_config(format!(
                    "{} lists '{}', which is not a supported language",
                    section, extra
                )));
            }
        }

        Ok(())
    }
}
