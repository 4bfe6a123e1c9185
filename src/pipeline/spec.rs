//! Pipeline configuration types.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "language": "en",
//!   "run_stopword_filter": true,
//!   "run_lemmatizer": true,
//!   "run_pos_tagger": true,
//!   "stopword_mode": "strict",
//!   "case_fold": true,
//!   "runtime": { "max_threads": 4 }
//! }
//! ```
//!
//! Every field is optional; omitted fields take the defaults shown above
//! (without the thread limit).

use serde::{Deserialize, Serialize};

use crate::errors::{NormalizeError, Result};
use crate::nlp::stopwords::StopwordMode;
use crate::types::LanguageTag;

/// Per-pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Language used by [`Pipeline::run_text`](super::Pipeline::run_text)
    pub language: LanguageTag,
    /// Flag stopwords after tokenization
    pub run_stopword_filter: bool,
    /// Reduce tokens to lemmas after stopword flagging
    pub run_lemmatizer: bool,
    /// Guess POS tags for untagged tokens before lemmatizing
    pub run_pos_tagger: bool,
    /// Behavior when the language has no stopword set
    pub stopword_mode: StopwordMode,
    /// Lower-case lemmas that fall back to the surface form
    pub case_fold: bool,
    /// Threading controls for batch runs
    pub runtime: RuntimeSpec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: LanguageTag::english(),
            run_stopword_filter: true,
            run_lemmatizer: true,
            run_pos_tagger: true,
            stopword_mode: StopwordMode::Strict,
            case_fold: true,
            runtime: RuntimeSpec::default(),
        }
    }
}

impl PipelineConfig {
    /// Tokenization only
    pub fn tokenize_only(language: LanguageTag) -> Self {
        Self {
            language,
            run_stopword_filter: false,
            run_lemmatizer: false,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_language(mut self, language: LanguageTag) -> Self {
        self.language = language;
        self
    }

    pub fn with_stopword_filter(mut self, enabled: bool) -> Self {
        self.run_stopword_filter = enabled;
        self
    }

    pub fn with_lemmatizer(mut self, enabled: bool) -> Self {
        self.run_lemmatizer = enabled;
        self
    }

    pub fn with_pos_tagger(mut self, enabled: bool) -> Self {
        self.run_pos_tagger = enabled;
        self
    }

    pub fn with_stopword_mode(mut self, mode: StopwordMode) -> Self {
        self.stopword_mode = mode;
        self
    }

    pub fn with_case_fold(mut self, case_fold: bool) -> Self {
        self.case_fold = case_fold;
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeSpec) -> Self {
        self.runtime = runtime;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.runtime.validate()
    }
}

// ─── Runtime spec ─────────────────────────────────────────────────────────

/// Threading controls for batch normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeSpec {
    /// Maximum number of Rayon threads for parallel work.
    /// `None` uses Rayon's default (all logical cores).
    pub max_threads: Option<usize>,

    /// Disable parallelism entirely (equivalent to `max_threads: 1`).
    /// When `true`, overrides `max_threads`.
    pub single_thread: bool,
}

impl RuntimeSpec {
    pub fn single_threaded() -> Self {
        Self {
            max_threads: None,
            single_thread: true,
        }
    }

    pub fn with_max_threads(threads: usize) -> Self {
        Self {
            max_threads: Some(threads),
            single_thread: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_threads == Some(0) {
            return Err(NormalizeError::invalid_config(
                "runtime.max_threads must be at least 1",
            ));
        }
        Ok(())
    }

    /// Resolve the effective thread count.
    ///
    /// - `single_thread == true` → `Some(1)`
    /// - `max_threads == Some(n)` → `Some(n)`
    /// - otherwise → `None` (use Rayon default)
    pub fn effective_threads(&self) -> Option<usize> {
        if self.single_thread {
            Some(1)
        } else {
            self.max_threads
        }
    }

    /// Build a scoped Rayon thread pool matching this config.
    ///
    /// Returns `Ok(None)` when no thread limit is set (use global pool).
    pub fn build_thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.effective_threads()
            .map(|n| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| {
                        NormalizeError::internal(format!("failed to build Rayon thread pool: {}", e))
                    })
            })
            .transpose()
    }

    /// Execute `f` within a scoped Rayon thread pool matching this config.
    ///
    /// If no thread limit is set, `f` runs directly (using the global pool).
    /// Otherwise `f` runs inside [`rayon::ThreadPool::install`], so any
    /// `par_iter()` within `f` uses the scoped pool.
    pub fn scoped<R: Send>(&self, f: impl FnOnce() -> R + Send) -> Result<R> {
        Ok(match self.build_thread_pool()? {
            Some(pool) => pool.install(f),
            None => f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.language, LanguageTag::english());
        assert!(config.run_stopword_filter);
        assert!(config.run_lemmatizer);
        assert!(config.case_fold);
        assert_eq!(config.stopword_mode, StopwordMode::Strict);
        config.validate().unwrap();
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{ "language": "DE", "run_lemmatizer": false, "stopword_mode": "permissive" }"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.language.as_str(), "de");
        assert!(!config.run_lemmatizer);
        assert!(config.run_stopword_filter);
        assert_eq!(config.stopword_mode, StopwordMode::Permissive);
    }

    #[test]
    fn test_empty_language_rejected() {
        assert!(PipelineConfig::from_json(r#"{ "language": "  " }"#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(PipelineConfig::from_json(r#"{ "stemmer": true }"#).is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = PipelineConfig::default().with_runtime(RuntimeSpec::with_max_threads(0));
        assert!(matches!(
            config.validate(),
            Err(NormalizeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_effective_threads() {
        assert_eq!(RuntimeSpec::default().effective_threads(), None);
        assert_eq!(RuntimeSpec::with_max_threads(3).effective_threads(), Some(3));
        let both = RuntimeSpec {
            max_threads: Some(8),
            single_thread: true,
        };
        assert_eq!(both.effective_threads(), Some(1));
    }

    #[test]
    fn test_scoped_runs_in_bounded_pool() {
        let threads = RuntimeSpec::with_max_threads(2)
            .scoped(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);

        let value = RuntimeSpec::default().scoped(|| 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = PipelineConfig::tokenize_only(LanguageTag::english())
            .with_runtime(RuntimeSpec::single_threaded());
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }
}
