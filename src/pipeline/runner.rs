//! Pipeline runner: orchestrates stage execution.
//!
//! A [`Pipeline`] pairs a shared [`LinguisticResources`] handle with a
//! [`PipelineConfig`]. [`Pipeline::run`] tokenizes unconditionally, then
//! flags stopwords and lemmatizes when enabled, always in that order, and
//! notifies an optional [`PipelineObserver`] at each boundary. A stage
//! failure aborts the run; no partial output is returned.

use std::sync::Arc;

use rayon::prelude::*;

use crate::errors::{NormalizeError, Result};
use crate::nlp::lemmatizer::Lemmatizer;
use crate::nlp::stopwords::flag_stopwords;
use crate::nlp::tagger::PosTagger;
use crate::nlp::tokenizer::Tokenizer;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, STAGE_LEMMATIZE, STAGE_STOPWORDS,
    STAGE_TOKENIZE,
};
use crate::pipeline::spec::PipelineConfig;
use crate::resources::LinguisticResources;
use crate::types::{Document, LanguageTag, NormalizedDocument, Sentence};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Run state
// ============================================================================

/// Progress of one pipeline invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    Tokenized,
    Filtered,
    Lemmatized,
    Done,
}

impl RunState {
    /// Move to `next`, rejecting out-of-order transitions.
    ///
    /// Optional stages may be skipped but never revisited.
    pub fn advance(self, next: RunState) -> Result<RunState> {
        use RunState::*;
        let allowed = matches!(
            (self, next),
            (Created, Tokenized)
                | (Tokenized, Filtered | Lemmatized | Done)
                | (Filtered, Lemmatized | Done)
                | (Lemmatized, Done)
        );
        if allowed {
            Ok(next)
        } else {
            Err(NormalizeError::internal(format!(
                "illegal pipeline transition {:?} -> {:?}",
                self, next
            )))
        }
    }

    pub fn is_done(&self) -> bool {
        *self == RunState::Done
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// A configured normalization pipeline.
///
/// Cheap to clone; clones share the same resources.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resources: Arc<LinguisticResources>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline after validating `config`
    pub fn new(resources: Arc<LinguisticResources>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { resources, config })
    }

    /// A pipeline over the built-in English resources with default settings
    pub fn english() -> Result<Self> {
        Self::new(
            Arc::new(LinguisticResources::builtin()?),
            PipelineConfig::default(),
        )
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn resources(&self) -> &Arc<LinguisticResources> {
        &self.resources
    }

    /// Normalize a document in its own language
    pub fn run(&self, doc: &Document) -> Result<NormalizedDocument> {
        self.run_with_observer(doc, &mut NoopObserver)
    }

    /// Normalize raw text in the configured language
    pub fn run_text(&self, text: &str) -> Result<NormalizedDocument> {
        self.run(&Document::new(text, self.config.language.clone()))
    }

    /// Normalize many documents in parallel.
    ///
    /// Each document is an independent invocation with its own result;
    /// results keep input order. The outer error is reserved for failing to
    /// set up the thread pool.
    pub fn run_batch(&self, docs: &[Document]) -> Result<Vec<Result<NormalizedDocument>>> {
        tracing::debug!(documents = docs.len(), "normalizing batch");
        self.config
            .runtime
            .scoped(|| docs.par_iter().map(|doc| self.run(doc)).collect())
    }

    /// Normalize a document, reporting every stage to `observer`
    pub fn run_with_observer(
        &self,
        doc: &Document,
        observer: &mut impl PipelineObserver,
    ) -> Result<NormalizedDocument> {
        let language = doc.language();
        let mut state = RunState::Created;

        // Stage 1: Tokenize
        let mut sentences = {
            trace_stage!(STAGE_TOKENIZE);
            observer.on_stage_start(STAGE_TOKENIZE);
            let clock = StageClock::start();
            let sentences = Tokenizer::new(&self.resources).tokenize(doc)?;
            let report = StageReport::new(clock.elapsed(), token_count(&sentences));
            observer.on_stage_end(STAGE_TOKENIZE, &report);
            sentences
        };
        observer.on_sentences(STAGE_TOKENIZE, &sentences);
        state = state.advance(RunState::Tokenized)?;

        // Stage 2: Flag stopwords
        if self.config.run_stopword_filter {
            trace_stage!(STAGE_STOPWORDS);
            observer.on_stage_start(STAGE_STOPWORDS);
            let clock = StageClock::start();
            flag_stopwords(
                &self.resources,
                language,
                self.config.stopword_mode,
                &mut sentences,
            )?;
            let report = StageReport::new(clock.elapsed(), token_count(&sentences));
            observer.on_stage_end(STAGE_STOPWORDS, &report);
            observer.on_sentences(STAGE_STOPWORDS, &sentences);
            state = state.advance(RunState::Filtered)?;
        }

        // Stage 3: Lemmatize
        if self.config.run_lemmatizer {
            trace_stage!(STAGE_LEMMATIZE);
            observer.on_stage_start(STAGE_LEMMATIZE);
            let clock = StageClock::start();
            self.lemmatize(language, &mut sentences)?;
            let report = StageReport::new(clock.elapsed(), token_count(&sentences));
            observer.on_stage_end(STAGE_LEMMATIZE, &report);
            observer.on_sentences(STAGE_LEMMATIZE, &sentences);
            state = state.advance(RunState::Lemmatized)?;
        }

        state = state.advance(RunState::Done)?;
        debug_assert!(state.is_done());
        tracing::debug!(
            language = %language,
            sentences = sentences.len(),
            tokens = token_count(&sentences),
            "document normalized"
        );
        Ok(NormalizedDocument::new(language.clone(), sentences))
    }

    fn lemmatize(&self, language: &LanguageTag, sentences: &mut [Sentence]) -> Result<()> {
        let lemmatizer =
            Lemmatizer::for_language(&self.resources, language)?.with_case_fold(self.config.case_fold);
        let tagger = self.config.run_pos_tagger.then(|| PosTagger::new(language));

        for sentence in sentences {
            if let Some(tagger) = &tagger {
                tagger.tag_sentence(&mut sentence.tokens);
            }
            for token in &mut sentence.tokens {
                lemmatizer.lemmatize_token(token);
            }
        }
        Ok(())
    }
}

fn token_count(sentences: &[Sentence]) -> usize {
    sentences.iter().map(Sentence::len).sum()
}
